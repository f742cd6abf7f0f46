//! Train Advisory Library
//!
//! A stateless, reusable library that turns recorded train sensor readings into
//! conductor advisories: wheel slippage, obstacle distance and crossing gate
//! proximity, each with a severity.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on the advisory rules:
//! - Parses sensor recordings (CSV) into rows, lazily and in file order
//! - Builds immutable sensor snapshots from the individual sensor readers
//! - Evaluates the advisory rules against configurable thresholds
//! - Keeps an append-only trip log of processed readings
//!
//! The library does NOT:
//! - Authenticate users or track login sessions
//! - Pace the replay in real time
//! - Render anything to a terminal
//!
//! All higher-level functionality is in the application layer (train-monitor-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use train_advisory::{AdvisoryEngine, CsvSensorReader, EngineConfig, LogEntry, TripLog};
//! use chrono::Utc;
//! use std::path::Path;
//!
//! let engine = AdvisoryEngine::new(EngineConfig::new());
//! let mut log = TripLog::new();
//!
//! for row in CsvSensorReader::open(Path::new("sensordata.csv")).unwrap() {
//!     match row {
//!         Ok(row) => {
//!             let snapshot = row.snapshot();
//!             let state = engine.evaluate(&snapshot);
//!             println!("{} | {} | {}", state.slippage.message, state.distance.message, state.gate.message);
//!             log.append(LogEntry::from_snapshot(Utc::now(), &snapshot)).unwrap();
//!         }
//!         Err(e) => eprintln!("Bad row: {}", e),
//!     }
//! }
//! ```

// Public modules
pub mod config;
pub mod engine;
pub mod history;
pub mod ingest;
pub mod sensors;
pub mod types;

// Re-export main types for convenience
pub use config::{Band, EngineConfig};
pub use engine::AdvisoryEngine;
pub use history::{LogEntry, TripLog};
pub use ingest::{load_rows, CsvSensorReader, LoadedRecording, RowPolicy, SensorRow, SensorRowIterator};
pub use sensors::{DistanceSensor, GpsSensor, HumiditySensor, PrecipitationSensor, WheelSensor};
pub use types::{
    Advisory, AdvisoryError, AdvisoryState, GateBand, GpsSpeed, Result, SensorSnapshot,
    Severity, SlipCause, Timestamp,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
