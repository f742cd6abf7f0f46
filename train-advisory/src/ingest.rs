//! Sensor recording parser
//!
//! Reads recorded sensor data from CSV files using the `csv` crate. The file
//! carries a header row; columns are matched by name so their order does not
//! matter.
//!
//! ## Columns
//! - `Object Distance`, `Wheel Speed`, `Humidity`, `Precipitation Level`,
//!   `Temperature`: numbers, all required
//! - `GPS Speed`: number, empty when the receiver had no fix
//! - `Gate`: flag
//! - `GPS Connected`: optional flag column, defaults to connected
//!
//! Flags accept `true`/`false`, `yes`/`no` and `1`/`0` in any case.

use crate::sensors::{DistanceSensor, GpsSensor, HumiditySensor, PrecipitationSensor, WheelSensor};
use crate::types::{AdvisoryError, Result, SensorSnapshot};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// What to do with a row that cannot be turned into a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
    /// Log a warning and continue with the next row
    #[default]
    Skip,
    /// Stop at the first malformed row
    Abort,
}

/// One row of a sensor recording
#[derive(Debug, Clone, PartialEq)]
pub struct SensorRow {
    /// Line number in the source file (header is line 1)
    pub line: u64,
    pub distance: f64,
    pub wheel_speed: f64,
    pub humidity: f64,
    pub precipitation_level: f64,
    pub temperature: f64,
    /// `None` when the recording has no GPS speed for this row
    pub gps_speed: Option<f64>,
    pub gps_connected: bool,
    pub gate: bool,
}

impl SensorRow {
    pub fn distance_sensor(&self) -> DistanceSensor {
        DistanceSensor::new(self.distance)
    }

    pub fn wheel_sensor(&self) -> WheelSensor {
        WheelSensor::new(self.wheel_speed)
    }

    pub fn humidity_sensor(&self) -> HumiditySensor {
        HumiditySensor::new(self.humidity)
    }

    pub fn precipitation_sensor(&self) -> PrecipitationSensor {
        PrecipitationSensor::new(self.precipitation_level, self.temperature)
    }

    /// GPS reader; a missing speed counts as a lost connection
    pub fn gps_sensor(&self) -> GpsSensor {
        let connected = self.gps_connected && self.gps_speed.is_some();
        GpsSensor::new(self.gps_speed.unwrap_or(0.0), connected, self.gate)
    }

    /// Read every sensor for this row
    pub fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot::from_sensors(
            &self.distance_sensor(),
            &self.wheel_sensor(),
            &self.humidity_sensor(),
            &self.precipitation_sensor(),
            &self.gps_sensor(),
        )
    }
}

/// Row layout as it appears in the file
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Object Distance")]
    distance: f64,
    #[serde(rename = "Wheel Speed")]
    wheel_speed: f64,
    #[serde(rename = "Humidity")]
    humidity: f64,
    #[serde(rename = "Precipitation Level")]
    precipitation_level: f64,
    #[serde(rename = "Temperature")]
    temperature: f64,
    #[serde(rename = "GPS Speed")]
    gps_speed: Option<f64>,
    #[serde(rename = "Gate", deserialize_with = "flag")]
    gate: bool,
    #[serde(rename = "GPS Connected", default, deserialize_with = "optional_flag")]
    gps_connected: Option<bool>,
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_flag(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid flag value {:?}", value)))
}

fn optional_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => parse_flag(&value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid flag value {:?}", value))),
    }
}

impl RawRow {
    fn validate(self, line: u64) -> Result<SensorRow> {
        let malformed = |reason: String| AdvisoryError::MalformedRow { line, reason };

        let finite = [
            ("Object Distance", self.distance),
            ("Wheel Speed", self.wheel_speed),
            ("Humidity", self.humidity),
            ("Precipitation Level", self.precipitation_level),
            ("Temperature", self.temperature),
        ];
        for (column, value) in finite {
            if !value.is_finite() {
                return Err(malformed(format!("{} is not a finite number", column)));
            }
        }

        let non_negative = [
            ("Object Distance", self.distance),
            ("Wheel Speed", self.wheel_speed),
            ("Humidity", self.humidity),
        ];
        for (column, value) in non_negative {
            if value < 0.0 {
                return Err(malformed(format!("{} is negative ({})", column, value)));
            }
        }

        if let Some(speed) = self.gps_speed {
            if !speed.is_finite() || speed < 0.0 {
                return Err(malformed(format!("GPS Speed is invalid ({})", speed)));
            }
        }

        Ok(SensorRow {
            line,
            distance: self.distance,
            wheel_speed: self.wheel_speed,
            humidity: self.humidity,
            precipitation_level: self.precipitation_level,
            temperature: self.temperature,
            gps_speed: self.gps_speed,
            gps_connected: self.gps_connected.unwrap_or(true),
            gate: self.gate,
        })
    }
}

/// CSV sensor recording parser
pub struct CsvSensorReader;

impl CsvSensorReader {
    /// Open a recording and return an iterator over its rows
    pub fn open(path: &Path) -> Result<SensorRowIterator<File>> {
        log::info!("Opening sensor recording: {:?}", path);

        if !path.exists() {
            return Err(AdvisoryError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("sensor recording not found: {:?}", path),
            )));
        }

        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse a recording from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<SensorRowIterator<R>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        log::debug!("Recording columns: {:?}", headers);

        Ok(SensorRowIterator {
            reader,
            headers,
            record: csv::StringRecord::new(),
        })
    }
}

/// Iterator over the rows of a sensor recording, in file order
pub struct SensorRowIterator<R> {
    reader: csv::Reader<R>,
    headers: csv::StringRecord,
    record: csv::StringRecord,
}

impl<R: Read> Iterator for SensorRowIterator<R> {
    type Item = Result<SensorRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let line = self.record.position().map(|p| p.line()).unwrap_or(0);
                let row = self
                    .record
                    .deserialize::<RawRow>(Some(&self.headers))
                    .map_err(|e| AdvisoryError::MalformedRow {
                        line,
                        reason: e.to_string(),
                    })
                    .and_then(|raw| raw.validate(line));
                Some(row)
            }
            Err(e) => {
                let malformed = match e.kind() {
                    csv::ErrorKind::UnequalLengths { pos, expected_len, len } => {
                        Some(AdvisoryError::MalformedRow {
                            line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
                            reason: format!("expected {} fields, found {}", expected_len, len),
                        })
                    }
                    _ => None,
                };
                Some(Err(malformed.unwrap_or(AdvisoryError::Csv(e))))
            }
        }
    }
}

/// Rows read from a recording, after applying a [`RowPolicy`]
#[derive(Debug, Clone, Default)]
pub struct LoadedRecording {
    pub rows: Vec<SensorRow>,
    /// Malformed rows that were dropped
    pub skipped: usize,
}

/// Read every row of a recording, dropping or failing on malformed rows
pub fn load_rows<I>(rows: I, policy: RowPolicy) -> Result<LoadedRecording>
where
    I: IntoIterator<Item = Result<SensorRow>>,
{
    let mut loaded = LoadedRecording::default();

    for row in rows {
        match row {
            Ok(row) => loaded.rows.push(row),
            Err(e @ AdvisoryError::MalformedRow { .. }) => match policy {
                RowPolicy::Skip => {
                    log::warn!("Skipping row: {}", e);
                    loaded.skipped += 1;
                }
                RowPolicy::Abort => return Err(e),
            },
            Err(e) => return Err(e),
        }
    }

    log::info!(
        "Loaded {} sensor rows ({} skipped)",
        loaded.rows.len(),
        loaded.skipped
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GpsSpeed;

    const HEADER: &str =
        "Object Distance,Wheel Speed,Humidity,Precipitation Level,Temperature,GPS Speed,Gate\n";

    fn parse(body: &str) -> Vec<Result<SensorRow>> {
        let data = format!("{}{}", HEADER, body);
        CsvSensorReader::from_reader(data.as_bytes())
            .unwrap()
            .collect()
    }

    #[test]
    fn test_parse_rows_in_order() {
        let rows = parse("1800,500,30,0,70,51.4,False\n800, 450 ,60,5,20,44,True\n");
        assert_eq!(rows.len(), 2);

        let first = rows[0].as_ref().unwrap();
        assert_eq!(first.line, 2);
        assert_eq!(first.distance, 1800.0);
        assert!(!first.gate);
        assert_eq!(first.gps_speed, Some(51.4));

        let second = rows[1].as_ref().unwrap();
        assert_eq!(second.line, 3);
        assert_eq!(second.wheel_speed, 450.0);
        assert!(second.gate);
        assert!(second.snapshot().snow());
    }

    #[test]
    fn test_flag_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("yes"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag(" No "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_empty_gps_speed_is_unavailable() {
        let rows = parse("900,500,30,0,70,,1\n");
        let row = rows[0].as_ref().unwrap();
        assert_eq!(row.gps_speed, None);
        assert_eq!(row.snapshot().gps, GpsSpeed::Unavailable);
    }

    #[test]
    fn test_gps_connected_column() {
        let data = "Gate,GPS Speed,GPS Connected,Temperature,Precipitation Level,Humidity,Wheel Speed,Object Distance\n\
                    no,40,false,70,0,30,400,2000\n\
                    no,40,,70,0,30,400,2000\n";
        let rows: Vec<_> = CsvSensorReader::from_reader(data.as_bytes()).unwrap().collect();
        assert_eq!(rows[0].as_ref().unwrap().snapshot().gps, GpsSpeed::Unavailable);
        assert_eq!(rows[1].as_ref().unwrap().snapshot().gps, GpsSpeed::Available(40.0));
    }

    #[test]
    fn test_malformed_rows_are_reported_with_line() {
        let rows = parse("abc,500,30,0,70,40,no\n-5,500,30,0,70,40,no\n900,500,30,0,70,40,perhaps\n");
        for (i, row) in rows.iter().enumerate() {
            match row {
                Err(AdvisoryError::MalformedRow { line, .. }) => assert_eq!(*line, i as u64 + 2),
                other => panic!("expected malformed row, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let rows = parse("900,500,30\n");
        assert!(matches!(rows[0], Err(AdvisoryError::MalformedRow { line: 2, .. })));
    }

    #[test]
    fn test_load_rows_policy() {
        let body = "900,500,30,0,70,40,no\nbad,500,30,0,70,40,no\n1000,500,30,0,70,40,no\n";

        let loaded = load_rows(parse(body), RowPolicy::Skip).unwrap();
        assert_eq!(loaded.rows.len(), 2);
        assert_eq!(loaded.skipped, 1);
        assert_eq!(loaded.rows[1].distance, 1000.0);

        let aborted = load_rows(parse(body), RowPolicy::Abort);
        assert!(matches!(aborted, Err(AdvisoryError::MalformedRow { line: 3, .. })));
    }
}
