//! Sensor readers
//!
//! Plain value holders for the onboard sensors. Each reader wraps the value
//! recorded for one tick; the precipitation reader additionally works out
//! whether the precipitation is rain or snow.

use crate::types::GpsSpeed;

/// Precipitation level above which cold precipitation counts as snow
pub const SNOW_LEVEL: f64 = 4.0;

/// Temperature (°F) below which precipitation freezes
pub const FREEZING_POINT_F: f64 = 32.0;

/// Distance to the closest object ahead
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceSensor {
    distance: f64,
}

impl DistanceSensor {
    pub fn new(distance: f64) -> Self {
        Self { distance }
    }

    /// Distance in meters
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumiditySensor {
    humidity: f64,
}

impl HumiditySensor {
    pub fn new(humidity: f64) -> Self {
        Self { humidity }
    }

    pub fn humidity(&self) -> f64 {
        self.humidity
    }
}

/// Wheel rotation sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelSensor {
    rotations_per_min: f64,
}

impl WheelSensor {
    pub fn new(rotations_per_min: f64) -> Self {
        Self { rotations_per_min }
    }

    pub fn rotations_per_min(&self) -> f64 {
        self.rotations_per_min
    }
}

/// Precipitation sensor with rain/snow classification
///
/// Snow is reported when the level is above [`SNOW_LEVEL`] and the
/// temperature is below [`FREEZING_POINT_F`]; every other reading counts as
/// rain. Exactly one of `rain()` and `snow()` is true.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecipitationSensor {
    level: f64,
    temperature: f64,
}

impl PrecipitationSensor {
    pub fn new(level: f64, temperature: f64) -> Self {
        Self { level, temperature }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Temperature in °F
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn snow(&self) -> bool {
        self.level > SNOW_LEVEL && self.temperature < FREEZING_POINT_F
    }

    pub fn rain(&self) -> bool {
        !self.snow()
    }
}

/// GPS receiver: ground speed, connection state and gate lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsSensor {
    speed: f64,
    connected: bool,
    gate: bool,
}

impl GpsSensor {
    pub fn new(speed: f64, connected: bool, gate: bool) -> Self {
        Self {
            speed,
            connected,
            gate,
        }
    }

    /// A receiver without a connection reports no speed
    pub fn speed(&self) -> GpsSpeed {
        if self.connected {
            GpsSpeed::Available(self.speed)
        } else {
            GpsSpeed::Unavailable
        }
    }

    /// True if a crossing gate lies on the path ahead
    pub fn gate(&self) -> bool {
        self.gate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cold_heavy_precipitation_is_snow() {
        let sensor = PrecipitationSensor::new(5.0, 20.0);
        assert!(sensor.snow());
        assert!(!sensor.rain());
    }

    #[test]
    fn test_warm_precipitation_is_rain() {
        let sensor = PrecipitationSensor::new(5.0, 40.0);
        assert!(sensor.rain());
        assert!(!sensor.snow());
    }

    #[test]
    fn test_light_cold_precipitation_is_rain() {
        // Level exactly at the threshold is not snow
        let sensor = PrecipitationSensor::new(4.0, 10.0);
        assert!(sensor.rain());
    }

    #[test]
    fn test_disconnected_gps_has_no_speed() {
        let gps = GpsSensor::new(55.0, false, true);
        assert_eq!(gps.speed(), GpsSpeed::Unavailable);
        assert!(gps.gate());

        let gps = GpsSensor::new(55.0, true, false);
        assert_eq!(gps.speed(), GpsSpeed::Available(55.0));
    }
}
