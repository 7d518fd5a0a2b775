//! Error Types for the Store-and-Forward Core
//!
//! ## Error Categories
//!
//! Nothing in this crate is fatal to the node. Every failure degrades to
//! "try again later" or "drop and log":
//!
//! ### Transient I/O
//! - `SinkError::OpenFailed`: the file could not be opened for append after
//!   the bounded retry loop. The line is not written.
//!
//! ### Missing Resources
//! - An absent buffer file is *not* an error. The replay engine reports
//!   `ReplayReport::NothingToRetry` instead.
//!
//! ### Delivery Failures
//! - Individual redelivery failures never surface as errors; the record is
//!   kept in the buffer for the next pass.
//!
//! ### Engine Setup Failures
//! - `ReplayError::TempFile`: the staging file could not be created. The
//!   pass aborts and the buffer file is left untouched.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use fieldlog_core::SinkError;
//!
//! fn report(result: Result<(), SinkError>) {
//!     match result {
//!         Ok(()) => {}
//!         Err(SinkError::OpenFailed { .. }) => {
//!             // SD card busy or missing - the caller may buffer elsewhere
//!         }
//!         Err(_) => {
//!             // Log and move on
//!         }
//!     }
//! }
//! ```

use std::io;

use thiserror_no_std::Error;

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Result type for replay passes
pub type ReplayResult<T> = Result<T, ReplayError>;

/// Result type for reading validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Errors raised by the durable log sink
#[derive(Error, Debug)]
pub enum SinkError {
    /// Every open attempt failed; nothing was written
    #[error("could not open {path} after {attempts} attempts: {source}")]
    OpenFailed {
        /// Target file
        path: String,
        /// Number of open attempts made
        attempts: u32,
        /// Error from the last attempt
        source: io::Error,
    },

    /// The file opened but the write itself failed
    #[error("write to {path} failed: {source}")]
    Write {
        /// Target file
        path: String,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A line must never contain its own terminator
    #[error("line contains an embedded newline")]
    EmbeddedNewline,
}

/// Engine-level failures that abort a replay pass
///
/// None of these mutate the persisted buffer.
#[derive(Error, Debug)]
pub enum ReplayError {
    /// The staging file could not be created
    #[error("could not create temporary file {path}: {source}")]
    TempFile {
        /// Staging path
        path: String,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Reading the buffer or writing the staging file failed mid-pass
    #[error("I/O error during replay of {path}: {source}")]
    Io {
        /// File being processed
        path: String,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The staging file could not be swapped in
    #[error("could not replace {target} with {staged}: {source}")]
    Swap {
        /// Staging path
        staged: String,
        /// Buffer path
        target: String,
        /// Underlying I/O error
        source: io::Error,
    },
}

/// Errors constructing a payload record
#[derive(Error, Debug)]
pub enum RecordError {
    /// Buffer records are single lines
    #[error("record contains an embedded newline")]
    EmbeddedNewline,

    /// Blank records are never buffered
    #[error("record is empty")]
    Empty,

    /// Payload could not be encoded as JSON
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors loading node configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required key absent from the configuration file
    #[error("missing configuration key `{0}`")]
    Missing(&'static str),

    /// Key present but its value could not be parsed
    #[error("invalid value for `{key}`: {value}")]
    Invalid {
        /// Configuration key
        key: &'static str,
        /// Raw value found in the file
        value: String,
    },

    /// The configuration file could not be read
    #[error("could not read {path}: {source}")]
    Io {
        /// Configuration path
        path: String,
        /// Underlying I/O error
        source: io::Error,
    },
}

/// A sample could be neither delivered nor buffered
#[derive(Error, Debug)]
pub enum PublishError {
    /// The sample could not be encoded
    #[error("could not encode sample: {0}")]
    Record(#[from] RecordError),

    /// Delivery failed and so did the buffer append; the sample is lost
    #[error("could not buffer sample: {0}")]
    Buffer(#[from] SinkError),
}

/// Sensor reading validation errors - kept small and `Copy`
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ValidationError {
    /// Value outside the sensor's operating envelope
    #[error("Value {value} outside range [{min}, {max}]")]
    OutOfRange {
        /// The reading that failed validation
        value: f32,
        /// Lower bound of the envelope
        min: f32,
        /// Upper bound of the envelope
        max: f32,
    },

    /// NaN or infinity, which is how the DHT driver reports a failed read
    #[error("Invalid value: not a valid number")]
    InvalidValue,
}
