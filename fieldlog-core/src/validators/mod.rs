//! Sensor Reading Validators
//!
//! The DHT11 is a budget sensor with a narrow envelope, and its driver
//! reports a failed single-wire transfer as NaN. Validation catches both
//! before a reading is turned into a payload:
//!
//! 1. **Finite check**: NaN or infinity means the read itself failed
//! 2. **Range check**: values outside the datasheet envelope are glitches
//!
//! ```rust
//! use fieldlog_core::validators::ReadingValidator;
//! use fieldlog_core::ValidationError;
//!
//! let validator = ReadingValidator::default();
//! assert!(validator.validate(22.0, 45.0).is_ok());
//! assert_eq!(validator.validate(f32::NAN, 45.0), Err(ValidationError::InvalidValue));
//! ```

pub mod dht11;
pub mod utils;

pub use dht11::ReadingValidator;
