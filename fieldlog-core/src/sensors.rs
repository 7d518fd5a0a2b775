//! DHT11 Sampling
//!
//! Reads one temperature/humidity pair, validates it and stamps it with the
//! wall clock, producing the payload the server expects.

use crate::errors::ValidationResult;
use crate::records::SensorRecord;
use crate::traits::{Clock, DhtSensor};
use crate::validators::ReadingValidator;

/// Validated pair from one DHT11 read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dht11Reading {
    /// Temperature in °C
    pub temperature: f32,
    /// Relative humidity in %
    pub humidity: f32,
}

/// Turns raw DHT11 reads into [`SensorRecord`]s
pub struct Dht11Sampler<S> {
    sensor: S,
    validator: ReadingValidator,
    session: String,
    number: i32,
}

impl<S: DhtSensor> Dht11Sampler<S> {
    /// Sampler for sensor `number` within recording `session`
    pub fn new(sensor: S, session: impl Into<String>, number: i32) -> Self {
        Self {
            sensor,
            validator: ReadingValidator::default(),
            session: session.into(),
            number,
        }
    }

    /// Use a different operating envelope
    pub fn with_validator(mut self, validator: ReadingValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Read and validate one pair
    pub fn read(&mut self) -> ValidationResult<Dht11Reading> {
        let temperature = self.sensor.read_temperature();
        let humidity = self.sensor.read_humidity();

        self.validator.validate(temperature, humidity).map_err(|e| {
            log::warn!("DHT11 | sensor {} rejected reading: {}", self.number, e);
            e
        })?;

        Ok(Dht11Reading { temperature, humidity })
    }

    /// Read, validate and stamp a payload
    pub fn sample<C: Clock + ?Sized>(&mut self, clock: &C) -> ValidationResult<SensorRecord> {
        let reading = self.read()?;
        let now = clock.now();
        Ok(SensorRecord {
            record_session: self.session.clone(),
            dht11_number: self.number,
            temperature: reading.temperature,
            humidity: reading.humidity,
            date: now.map(|t| t.date()),
            time: now.map(|t| t.time()),
        })
    }

    /// Which sensor this is on the node
    pub fn number(&self) -> i32 {
        self.number
    }

    /// The wrapped driver
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}
