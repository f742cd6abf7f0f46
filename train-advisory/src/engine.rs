//! Advisory engine
//!
//! This module provides the rules that turn a sensor snapshot into the three
//! advisories shown to the conductor. The [`AdvisoryEngine`] owns its
//! thresholds and keeps no state between calls.

use crate::config::EngineConfig;
use crate::types::{Advisory, AdvisoryState, GateBand, GpsSpeed, SensorSnapshot, Severity, SlipCause};
use std::f64::consts::PI;

/// Inches in a mile
const INCHES_PER_MILE: f64 = 63360.0;

/// Minutes in an hour
const MINUTES_PER_HOUR: f64 = 60.0;

pub const SLIPPING_MESSAGE: &str = "Slippage is occurring. Brake to slow down.";
pub const NO_SLIP_MESSAGE: &str = "No slippage. Continue speed.";
pub const NO_GATES_MESSAGE: &str = "No gates nearby. Continue speed.";

/// The advisory engine - entry point for all advisory computations
#[derive(Debug, Clone, Default)]
pub struct AdvisoryEngine {
    config: EngineConfig,
}

impl AdvisoryEngine {
    /// Create an engine with the given thresholds
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute all three advisories for one snapshot
    ///
    /// # Example
    /// ```
    /// use train_advisory::{AdvisoryEngine, GpsSpeed, SensorSnapshot, Severity};
    ///
    /// let engine = AdvisoryEngine::default();
    /// let snapshot = SensorSnapshot {
    ///     distance: 800.0,
    ///     wheel_rpm: 0.0,
    ///     humidity: 10.0,
    ///     gps: GpsSpeed::Available(0.0),
    ///     gate_nearby: true,
    ///     precip_level: 0.0,
    ///     temperature: 70.0,
    /// };
    /// let state = engine.evaluate(&snapshot);
    /// assert_eq!(state.distance.severity, Severity::Alert);
    /// assert_eq!(state.gate.severity, Severity::Caution);
    /// ```
    pub fn evaluate(&self, snapshot: &SensorSnapshot) -> AdvisoryState {
        let rain = snapshot.rain();
        let snow = snapshot.snow();
        let slip_causes = self.slip_causes(
            snapshot.wheel_rpm,
            snapshot.gps,
            snapshot.humidity,
            rain,
            snow,
        );

        AdvisoryState {
            slippage: Self::slip_advisory(!slip_causes.is_empty()),
            distance: self.compute_distance(snapshot.distance),
            gate: self.compute_gate(snapshot.distance, snapshot.gate_nearby),
            slip_causes,
        }
    }

    /// Object distance advisory
    pub fn compute_distance(&self, distance: f64) -> Advisory {
        if distance > self.config.distance_alert_m {
            Advisory::new(
                format!(
                    "Object more than {} meters away. Do not change speed.",
                    self.config.distance_alert_m
                ),
                Severity::Ok,
            )
        } else {
            Advisory::new(
                format!("Object is {} meters away. Brake to slow down.", distance),
                Severity::Alert,
            )
        }
    }

    /// Linear speed in mph for a wheel turning at `wheel_rpm`
    pub fn wheel_speed_mph(&self, wheel_rpm: f64) -> f64 {
        wheel_rpm * self.config.wheel_diameter_in * PI * MINUTES_PER_HOUR / INCHES_PER_MILE
    }

    /// Every condition that indicates wheel slip, in a fixed order
    pub fn slip_causes(
        &self,
        wheel_rpm: f64,
        gps: GpsSpeed,
        humidity: f64,
        rain: bool,
        snow: bool,
    ) -> Vec<SlipCause> {
        let mut causes = Vec::new();

        match gps {
            GpsSpeed::Available(gps_mph) => {
                let wheel_mph = self.wheel_speed_mph(wheel_rpm);
                if (wheel_mph - gps_mph).abs() > self.config.speed_mismatch_mph {
                    causes.push(SlipCause::SpeedMismatch);
                }
            }
            // Nothing to compare against, so slip cannot be ruled out
            GpsSpeed::Unavailable => causes.push(SlipCause::GpsUnavailable),
        }

        if humidity > self.config.humidity_limit {
            causes.push(SlipCause::Humidity);
        }
        if rain {
            causes.push(SlipCause::Rain);
        }
        if snow {
            causes.push(SlipCause::Snow);
        }

        causes
    }

    /// Wheel slippage advisory
    pub fn compute_slippage(
        &self,
        wheel_rpm: f64,
        gps: GpsSpeed,
        humidity: f64,
        rain: bool,
        snow: bool,
    ) -> Advisory {
        let causes = self.slip_causes(wheel_rpm, gps, humidity, rain, snow);
        Self::slip_advisory(!causes.is_empty())
    }

    fn slip_advisory(slipping: bool) -> Advisory {
        if slipping {
            Advisory::new(SLIPPING_MESSAGE, Severity::Alert)
        } else {
            Advisory::new(NO_SLIP_MESSAGE, Severity::Ok)
        }
    }

    /// Gate band for a distance, checked in priority order horn > arrived > near
    pub fn gate_band(&self, distance: f64) -> Option<GateBand> {
        if self.config.horn_band.contains(distance) {
            Some(GateBand::Horn)
        } else if distance < self.config.arrival_m {
            Some(GateBand::Arrived)
        } else if self.config.near_band.contains(distance) {
            Some(GateBand::Near)
        } else {
            None
        }
    }

    /// Crossing gate advisory
    pub fn compute_gate(&self, distance: f64, gate_nearby: bool) -> Advisory {
        if !gate_nearby {
            return Advisory::new(NO_GATES_MESSAGE, Severity::Ok);
        }

        match self.gate_band(distance) {
            Some(GateBand::Horn) => Advisory::new(
                format!(
                    "Gate is {} meters away. Blow horn for {} seconds.",
                    distance, self.config.long_horn_secs
                ),
                Severity::Caution,
            ),
            Some(GateBand::Arrived) => Advisory::new(
                format!(
                    "Gate is {} meters away. Blow horn for {} seconds.",
                    distance, self.config.short_horn_secs
                ),
                Severity::Alert,
            ),
            Some(GateBand::Near) => Advisory::new(
                format!("Gate is {} meters away.", distance),
                Severity::Caution,
            ),
            None => Advisory::new(NO_GATES_MESSAGE, Severity::Ok),
        }
    }
}
