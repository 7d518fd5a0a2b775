//! DHT11 Sensor Specifications
//!
//! Source: Aosong DHT11 datasheet. The part is a budget sensor, so the
//! envelope is narrow and accuracy coarse.

// ===== TEMPERATURE =====

/// Lowest temperature the DHT11 reports (°C).
pub const DHT11_TEMP_MIN_C: f32 = 0.0;

/// Highest temperature the DHT11 reports (°C).
pub const DHT11_TEMP_MAX_C: f32 = 50.0;

/// Temperature accuracy (±°C).
pub const DHT11_TEMP_ACCURACY_C: f32 = 2.0;

// ===== HUMIDITY =====

/// Lowest relative humidity the DHT11 reports (%).
pub const DHT11_HUMIDITY_MIN_PCT: f32 = 20.0;

/// Highest relative humidity the DHT11 reports (%).
pub const DHT11_HUMIDITY_MAX_PCT: f32 = 90.0;

/// Humidity accuracy (±%RH).
pub const DHT11_HUMIDITY_ACCURACY_PCT: f32 = 5.0;
