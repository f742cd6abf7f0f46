//! Trip log
//!
//! Append-only record of the readings processed during a trip, one entry per
//! tick, keyed by the tick timestamp. Entries are never changed or removed
//! once written.

use crate::types::{AdvisoryError, Result, SensorSnapshot, Timestamp};
use serde::Serialize;

/// Readings captured at one tick, already formatted for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    timestamp: Timestamp,
    rain: String,
    snow: String,
    distance: String,
    humidity: String,
    wheel_speed: String,
    gps_speed: String,
}

impl LogEntry {
    /// Format the readings of a snapshot taken at `timestamp`
    pub fn from_snapshot(timestamp: Timestamp, snapshot: &SensorSnapshot) -> Self {
        Self {
            timestamp,
            rain: format!("Rain Data: {}", snapshot.rain()),
            snow: format!("Snow Data: {}", snapshot.snow()),
            distance: format!("Distance Data: {}", snapshot.distance),
            humidity: format!("Humidity Data: {}", snapshot.humidity),
            wheel_speed: format!("Wheel Speed Data: {}", snapshot.wheel_rpm),
            gps_speed: format!("GPS Speed Data: {}", snapshot.gps),
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// The six formatted fields in display order
    pub fn lines(&self) -> [&str; 6] {
        [
            self.rain.as_str(),
            self.snow.as_str(),
            self.distance.as_str(),
            self.humidity.as_str(),
            self.wheel_speed.as_str(),
            self.gps_speed.as_str(),
        ]
    }
}

/// Ordered, append-only collection of log entries
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct TripLog {
    entries: Vec<LogEntry>,
}

impl TripLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    ///
    /// Timestamps must be strictly increasing, which keeps the log sorted and
    /// gives every entry a distinct key.
    pub fn append(&mut self, entry: LogEntry) -> Result<()> {
        if let Some(last) = self.entries.last() {
            if entry.timestamp <= last.timestamp {
                return Err(AdvisoryError::NonMonotonicTimestamp {
                    last: last.timestamp,
                    new: entry.timestamp,
                });
            }
        }

        log::trace!("Trip log entry recorded at {}", entry.timestamp);
        self.entries.push(entry);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.last()
    }
}
