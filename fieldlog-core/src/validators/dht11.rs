//! DHT11 Temperature/Humidity Validation
//!
//! ## Sensor Characteristics
//!
//! - Temperature: 0–50 °C, ±2 °C
//! - Humidity: 20–90 %RH, ±5 %RH
//! - One sample per second at most; a read faster than that returns the
//!   previous value or fails
//!
//! A failed checksum or timeout comes back from the driver as NaN.

use crate::constants::sensors::{
    DHT11_HUMIDITY_MAX_PCT, DHT11_HUMIDITY_MIN_PCT, DHT11_TEMP_MAX_C, DHT11_TEMP_MIN_C,
};
use crate::errors::ValidationResult;

use super::utils;

/// Validates a temperature/humidity pair against an operating envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingValidator {
    min_temp_c: f32,
    max_temp_c: f32,
    min_humidity_pct: f32,
    max_humidity_pct: f32,
}

impl Default for ReadingValidator {
    fn default() -> Self {
        Self {
            min_temp_c: DHT11_TEMP_MIN_C,
            max_temp_c: DHT11_TEMP_MAX_C,
            min_humidity_pct: DHT11_HUMIDITY_MIN_PCT,
            max_humidity_pct: DHT11_HUMIDITY_MAX_PCT,
        }
    }
}

impl ReadingValidator {
    /// Validator with a custom envelope (e.g. a DHT22 or a cold room)
    pub fn new_with_limits(temp_c: (f32, f32), humidity_pct: (f32, f32)) -> Self {
        Self {
            min_temp_c: temp_c.0,
            max_temp_c: temp_c.1,
            min_humidity_pct: humidity_pct.0,
            max_humidity_pct: humidity_pct.1,
        }
    }

    /// Check a temperature reading
    pub fn validate_temperature(&self, temp_c: f32) -> ValidationResult<()> {
        utils::check_finite(temp_c)?;
        utils::check_range(temp_c, self.min_temp_c, self.max_temp_c)
    }

    /// Check a humidity reading
    pub fn validate_humidity(&self, humidity_pct: f32) -> ValidationResult<()> {
        utils::check_finite(humidity_pct)?;
        utils::check_range(humidity_pct, self.min_humidity_pct, self.max_humidity_pct)
    }

    /// Check both halves of a sample; temperature is reported first
    pub fn validate(&self, temp_c: f32, humidity_pct: f32) -> ValidationResult<()> {
        self.validate_temperature(temp_c)?;
        self.validate_humidity(humidity_pct)
    }
}
