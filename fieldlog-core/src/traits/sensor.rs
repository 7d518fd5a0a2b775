//! DHT Sensor Capability

/// Single-wire DHT temperature/humidity sensor
///
/// Drivers report a failed read as NaN, matching the common DHT libraries.
pub trait DhtSensor {
    /// Temperature in °C, NaN on a failed read
    fn read_temperature(&mut self) -> f32;

    /// Relative humidity in %, NaN on a failed read
    fn read_humidity(&mut self) -> f32;
}
