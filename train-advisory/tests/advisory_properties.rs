// End-to-end checks of the advisory rules and the trip log
use chrono::{Duration, TimeZone, Utc};
use std::io::Write;
use train_advisory::{
    load_rows, AdvisoryEngine, CsvSensorReader, GpsSpeed, LogEntry, PrecipitationSensor,
    RowPolicy, SensorSnapshot, Severity, TripLog,
};

fn clear_snapshot() -> SensorSnapshot {
    SensorSnapshot {
        distance: 2000.0,
        wheel_rpm: 0.0,
        humidity: 10.0,
        gps: GpsSpeed::Available(0.0),
        gate_nearby: false,
        precip_level: 0.0,
        temperature: 70.0,
    }
}

#[test]
fn distance_severity_follows_limit() {
    let engine = AdvisoryEngine::default();

    for distance in [1600.01, 1700.0, 5000.0, 1_000_000.0] {
        assert_eq!(engine.compute_distance(distance).severity, Severity::Ok);
    }

    for distance in [0.0, 12.5, 800.0, 1599.0, 1600.0] {
        let advisory = engine.compute_distance(distance);
        assert_eq!(advisory.severity, Severity::Alert);
        assert!(
            advisory.message.contains(&distance.to_string()),
            "{:?} does not mention {}",
            advisory.message,
            distance
        );
    }
}

#[test]
fn gate_bands_with_and_without_gate() {
    let engine = AdvisoryEngine::default();

    assert!(engine.compute_gate(1600.0, true).message.contains("15 seconds"));
    assert!(engine.compute_gate(50.0, true).message.contains("5 seconds"));
    assert_eq!(engine.compute_gate(800.0, true).message, "Gate is 800 meters away.");

    for distance in [0.0, 50.0, 800.0, 1600.0, 3000.0] {
        assert_eq!(engine.compute_gate(distance, false).severity, Severity::Ok);
    }
}

#[test]
fn humidity_alone_triggers_slippage() {
    let engine = AdvisoryEngine::default();
    let matched = GpsSpeed::Available(engine.wheel_speed_mph(400.0));

    let advisory = engine.compute_slippage(400.0, matched, 60.0, false, false);
    assert_eq!(advisory.severity, Severity::Alert);

    let advisory = engine.compute_slippage(400.0, matched, 40.0, false, false);
    assert_eq!(advisory.severity, Severity::Ok);
}

#[test]
fn precipitation_classification() {
    let snow = PrecipitationSensor::new(5.0, 20.0);
    assert!(snow.snow() && !snow.rain());

    let rain = PrecipitationSensor::new(5.0, 40.0);
    assert!(rain.rain() && !rain.snow());
}

#[test]
fn evaluate_combines_all_rules() {
    let engine = AdvisoryEngine::default();
    let mut snapshot = clear_snapshot();
    snapshot.distance = 50.0;
    snapshot.gate_nearby = true;
    snapshot.gps = GpsSpeed::Unavailable;

    let state = engine.evaluate(&snapshot);
    assert_eq!(state.distance.severity, Severity::Alert);
    assert_eq!(state.gate.severity, Severity::Alert);
    assert_eq!(state.slippage.severity, Severity::Alert);
    assert_eq!(state.worst_severity(), Severity::Alert);
}

#[test]
fn log_grows_by_one_entry_per_tick() {
    let engine = AdvisoryEngine::default();
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
    let mut log = TripLog::new();

    let distances = [2000.0, 1650.0, 900.0, 40.0];
    for (tick, distance) in distances.iter().enumerate() {
        let mut snapshot = clear_snapshot();
        snapshot.distance = *distance;
        engine.evaluate(&snapshot);

        let timestamp = start + Duration::seconds(5 * tick as i64);
        log.append(LogEntry::from_snapshot(timestamp, &snapshot)).unwrap();
    }

    assert_eq!(log.len(), distances.len());
    for (entry, distance) in log.iter().zip(distances.iter()) {
        assert_eq!(entry.lines()[2], format!("Distance Data: {}", distance));
    }
    let stamps: Vec<_> = log.iter().map(|e| e.timestamp()).collect();
    assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn recording_file_is_read_in_order() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "Object Distance,Wheel Speed,Humidity,Precipitation Level,Temperature,GPS Speed,Gate"
    )
    .unwrap();
    writeln!(file, "2000,500,20,0,70,49,False").unwrap();
    writeln!(file, "1600,500,20,0,70,,True").unwrap();
    writeln!(file, "oops,500,20,0,70,49,False").unwrap();
    writeln!(file, "80,100,20,6,10,10,True").unwrap();
    file.flush().unwrap();

    let rows = CsvSensorReader::open(file.path()).unwrap();
    let loaded = load_rows(rows, RowPolicy::Skip).unwrap();
    assert_eq!(loaded.skipped, 1);
    let distances: Vec<_> = loaded.rows.iter().map(|r| r.distance).collect();
    assert_eq!(distances, vec![2000.0, 1600.0, 80.0]);

    let engine = AdvisoryEngine::default();
    let second = engine.evaluate(&loaded.rows[1].snapshot());
    assert!(second.gate.message.contains("15 seconds"));
    assert_eq!(loaded.rows[1].snapshot().gps, GpsSpeed::Unavailable);

    let last = loaded.rows[2].snapshot();
    assert!(last.snow());
}

#[test]
fn missing_recording_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = CsvSensorReader::open(&dir.path().join("absent.csv"));
    assert!(result.is_err());
}
