//! Core types for the train advisory library
//!
//! This module defines the values the advisory engine consumes and produces.
//! The engine is stateless: it turns one sensor snapshot into one advisory
//! state, and keeps no memory between ticks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sensors::{
    DistanceSensor, GpsSensor, HumiditySensor, PrecipitationSensor, WheelSensor,
};

/// Timestamp type used throughout the library
pub type Timestamp = DateTime<Utc>;

/// Result type for advisory operations
pub type Result<T> = std::result::Result<T, AdvisoryError>;

/// Errors that can occur while ingesting readings or maintaining the trip log
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    #[error("Malformed sensor row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("Failed to read sensor recording: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Log timestamp {new} is not after the last entry at {last}")]
    NonMonotonicTimestamp { last: Timestamp, new: Timestamp },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// GPS ground speed as reported by the receiver
///
/// A disconnected receiver has no speed at all; it is never coerced to a
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "mph")]
pub enum GpsSpeed {
    /// Receiver connected, speed in miles per hour
    Available(f64),
    /// Receiver disconnected or no fix
    Unavailable,
}

impl GpsSpeed {
    /// Speed in mph, if the receiver had one
    pub fn mph(&self) -> Option<f64> {
        match self {
            GpsSpeed::Available(v) => Some(*v),
            GpsSpeed::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, GpsSpeed::Available(_))
    }
}

impl fmt::Display for GpsSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpsSpeed::Available(v) => write!(f, "{}", v),
            GpsSpeed::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// One immutable set of readings taken at a single tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Distance to the closest object ahead, in meters
    pub distance: f64,
    /// Wheel rotations per minute
    pub wheel_rpm: f64,
    /// Relative humidity
    pub humidity: f64,
    /// GPS ground speed
    pub gps: GpsSpeed,
    /// True if a crossing gate lies on the path ahead
    pub gate_nearby: bool,
    /// Precipitation level reported by the precipitation sensor
    pub precip_level: f64,
    /// Outside temperature in °F
    pub temperature: f64,
}

impl SensorSnapshot {
    /// Collect a snapshot from the individual sensor readers
    pub fn from_sensors(
        distance: &DistanceSensor,
        wheel: &WheelSensor,
        humidity: &HumiditySensor,
        precipitation: &PrecipitationSensor,
        gps: &GpsSensor,
    ) -> Self {
        Self {
            distance: distance.distance(),
            wheel_rpm: wheel.rotations_per_min(),
            humidity: humidity.humidity(),
            gps: gps.speed(),
            gate_nearby: gps.gate(),
            precip_level: precipitation.level(),
            temperature: precipitation.temperature(),
        }
    }

    fn precipitation(&self) -> PrecipitationSensor {
        PrecipitationSensor::new(self.precip_level, self.temperature)
    }

    /// True if the precipitation is falling as rain
    pub fn rain(&self) -> bool {
        self.precipitation().rain()
    }

    /// True if the precipitation is falling as snow
    pub fn snow(&self) -> bool {
        self.precipitation().snow()
    }
}

/// Severity of an advisory, shown to the conductor as a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Nothing to do (green)
    Ok,
    /// Conductor action recommended (orange)
    Caution,
    /// Immediate action required (red)
    Alert,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Ok => write!(f, "OK"),
            Severity::Caution => write!(f, "CAUTION"),
            Severity::Alert => write!(f, "ALERT"),
        }
    }
}

/// A single advisory: the text shown to the conductor and its severity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub message: String,
    pub severity: Severity,
}

impl Advisory {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// Reasons the engine considers the wheels to be slipping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlipCause {
    /// Wheel-derived speed disagrees with GPS speed
    SpeedMismatch,
    /// Humidity above the configured limit
    Humidity,
    Rain,
    Snow,
    /// No GPS speed to compare the wheel speed against
    GpsUnavailable,
}

impl fmt::Display for SlipCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlipCause::SpeedMismatch => write!(f, "speed mismatch"),
            SlipCause::Humidity => write!(f, "humidity"),
            SlipCause::Rain => write!(f, "rain"),
            SlipCause::Snow => write!(f, "snow"),
            SlipCause::GpsUnavailable => write!(f, "GPS unavailable"),
        }
    }
}

/// Distance band relative to a crossing gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateBand {
    /// Far enough out to start the long horn signal
    Horn,
    /// At the crossing
    Arrived,
    /// Approaching, no horn yet
    Near,
}

/// All three advisories computed for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryState {
    pub slippage: Advisory,
    pub distance: Advisory,
    pub gate: Advisory,
    /// Causes behind the slippage advisory (empty when not slipping)
    pub slip_causes: Vec<SlipCause>,
}

impl AdvisoryState {
    /// Highest severity across the three advisories
    pub fn worst_severity(&self) -> Severity {
        self.slippage
            .severity
            .max(self.distance.severity)
            .max(self.gate.severity)
    }
}
