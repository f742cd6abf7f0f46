//! Engine configuration types
//!
//! Thresholds used by the advisory rules. Every field has a serde default so
//! an empty `[thresholds]` table yields the standard rule set.

use crate::types::{AdvisoryError, Result};
use serde::{Deserialize, Serialize};

/// Thresholds for the advisory engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Objects farther than this (meters) need no action
    #[serde(default = "default_distance_alert")]
    pub distance_alert_m: f64,

    /// Wheel diameter in inches, used to turn RPM into mph
    #[serde(default = "default_wheel_diameter")]
    pub wheel_diameter_in: f64,

    /// Allowed difference between wheel speed and GPS speed (mph)
    #[serde(default = "default_speed_mismatch")]
    pub speed_mismatch_mph: f64,

    /// Humidity above this value is treated as slippery
    #[serde(default = "default_humidity_limit")]
    pub humidity_limit: f64,

    /// Band in which the long horn signal is due
    #[serde(default = "default_horn_band")]
    pub horn_band: Band,

    /// Band in which the gate is approaching
    #[serde(default = "default_near_band")]
    pub near_band: Band,

    /// Distances below this count as arrived at the gate
    #[serde(default = "default_arrival")]
    pub arrival_m: f64,

    /// Horn duration (seconds) announced in the horn band
    #[serde(default = "default_long_horn")]
    pub long_horn_secs: u32,

    /// Horn duration (seconds) announced on arrival
    #[serde(default = "default_short_horn")]
    pub short_horn_secs: u32,
}

/// Open distance interval `(lower, upper)` in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
}

impl Band {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Both bounds are exclusive
    pub fn contains(&self, distance: f64) -> bool {
        self.lower < distance && distance < self.upper
    }
}

fn default_distance_alert() -> f64 {
    1600.0
}

fn default_wheel_diameter() -> f64 {
    33.0
}

fn default_speed_mismatch() -> f64 {
    5.0
}

fn default_humidity_limit() -> f64 {
    50.0
}

fn default_horn_band() -> Band {
    Band::new(1500.0, 1700.0)
}

fn default_near_band() -> Band {
    Band::new(100.0, 1500.0)
}

fn default_arrival() -> f64 {
    100.0
}

fn default_long_horn() -> u32 {
    15
}

fn default_short_horn() -> u32 {
    5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            distance_alert_m: default_distance_alert(),
            wheel_diameter_in: default_wheel_diameter(),
            speed_mismatch_mph: default_speed_mismatch(),
            humidity_limit: default_humidity_limit(),
            horn_band: default_horn_band(),
            near_band: default_near_band(),
            arrival_m: default_arrival(),
            long_horn_secs: default_long_horn(),
            short_horn_secs: default_short_horn(),
        }
    }
}

impl EngineConfig {
    /// Create an engine configuration with the standard thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the object distance alert limit
    pub fn with_distance_alert(mut self, meters: f64) -> Self {
        self.distance_alert_m = meters;
        self
    }

    /// Builder method: set the wheel diameter
    pub fn with_wheel_diameter(mut self, inches: f64) -> Self {
        self.wheel_diameter_in = inches;
        self
    }

    /// Builder method: set the wheel/GPS speed tolerance
    pub fn with_speed_mismatch(mut self, mph: f64) -> Self {
        self.speed_mismatch_mph = mph;
        self
    }

    /// Builder method: set the humidity limit
    pub fn with_humidity_limit(mut self, limit: f64) -> Self {
        self.humidity_limit = limit;
        self
    }

    /// Builder method: set the gate bands
    pub fn with_gate_bands(mut self, arrival_m: f64, near: Band, horn: Band) -> Self {
        self.arrival_m = arrival_m;
        self.near_band = near;
        self.horn_band = horn;
        self
    }

    /// Check that every threshold is usable
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("distance_alert_m", self.distance_alert_m),
            ("wheel_diameter_in", self.wheel_diameter_in),
            ("speed_mismatch_mph", self.speed_mismatch_mph),
            ("humidity_limit", self.humidity_limit),
            ("arrival_m", self.arrival_m),
            ("horn_band.lower", self.horn_band.lower),
            ("horn_band.upper", self.horn_band.upper),
            ("near_band.lower", self.near_band.lower),
            ("near_band.upper", self.near_band.upper),
        ];
        for (name, value) in finite {
            if !value.is_finite() || value < 0.0 {
                return Err(AdvisoryError::InvalidConfig(format!(
                    "{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
        }

        if self.wheel_diameter_in == 0.0 {
            return Err(AdvisoryError::InvalidConfig(
                "wheel_diameter_in must be greater than zero".to_string(),
            ));
        }

        for (name, band) in [("horn_band", self.horn_band), ("near_band", self.near_band)] {
            if band.lower >= band.upper {
                return Err(AdvisoryError::InvalidConfig(format!(
                    "{} lower bound {} must be below upper bound {}",
                    name, band.lower, band.upper
                )));
            }
        }

        if self.arrival_m > self.near_band.lower || self.near_band.upper > self.horn_band.lower {
            return Err(AdvisoryError::InvalidConfig(
                "gate bands must be ordered: arrival <= near <= horn".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = EngineConfig::new();
        assert_eq!(config.distance_alert_m, 1600.0);
        assert_eq!(config.wheel_diameter_in, 33.0);
        assert_eq!(config.horn_band, Band::new(1500.0, 1700.0));
        assert_eq!(config.long_horn_secs, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_band_bounds_are_exclusive() {
        let band = Band::new(100.0, 1500.0);
        assert!(band.contains(800.0));
        assert!(!band.contains(100.0));
        assert!(!band.contains(1500.0));
    }

    #[test]
    fn test_builder_and_validation() {
        let config = EngineConfig::new()
            .with_distance_alert(1200.0)
            .with_humidity_limit(70.0);
        assert_eq!(config.distance_alert_m, 1200.0);
        assert_eq!(config.humidity_limit, 70.0);
        assert!(config.validate().is_ok());

        let bad = EngineConfig::new().with_wheel_diameter(0.0);
        assert!(bad.validate().is_err());

        let overlapping = EngineConfig::new().with_gate_bands(
            100.0,
            Band::new(100.0, 1600.0),
            Band::new(1500.0, 1700.0),
        );
        assert!(overlapping.validate().is_err());

        let nan = EngineConfig::new().with_speed_mismatch(f64::NAN);
        assert!(nan.validate().is_err());
    }
}
