//! Store-and-forward core for battery-powered sensing nodes
//!
//! A node samples a DHT11, posts JSON to a collector over WiFi and keeps an
//! event log on an SD card. The network is unreliable, so every payload that
//! cannot be delivered is appended to a buffer file and replayed later.
//!
//! Key constraints:
//! - The SD card can be busy or briefly absent; opens are retried
//! - Power can drop at any moment; a replay pass never loses buffered data
//! - The radio is off most of the time; delivery is always best effort
//!
//! ```rust
//! use fieldlog_core::buffer::{BufferStore, ReplayEngine};
//! use fieldlog_core::records::BufferRecord;
//! use fieldlog_core::sink::{LogSink, RetryPolicy};
//! use fieldlog_core::storage::MemoryStorage;
//! use fieldlog_core::time::StdDelay;
//! use fieldlog_core::traits::Transport;
//!
//! struct Collector;
//!
//! impl Transport for Collector {
//!     type Error = core::convert::Infallible;
//!     fn post(&mut self, _url: &str, _payload: &str) -> Result<u16, Self::Error> {
//!         Ok(201)
//!     }
//! }
//!
//! let mut sink = LogSink::new(MemoryStorage::new(), StdDelay).with_policy(RetryPolicy::new(1, 0));
//! BufferStore::default().store(&mut sink, &BufferRecord::new("{\"humidity\":40}")?)?;
//!
//! let report = ReplayEngine::new("https://collector.example/sensor")
//!     .retry_buffered_sends(sink.storage_mut(), &mut Collector)?;
//! assert_eq!(report.remaining(), 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod buffer;
pub mod buzzer;
pub mod config;
pub mod constants;
pub mod errors;
pub mod node;
pub mod records;
pub mod sensors;
pub mod sink;
pub mod storage;
pub mod time;
pub mod traits;
pub mod validators;

// Public API
pub use errors::{
    ConfigError, PublishError, RecordError, ReplayError, ReplayResult, SinkError, SinkResult,
    ValidationError, ValidationResult,
};
pub use node::{Delivery, Node};
pub use storage::Storage;
pub use traits::{Clock, DhtSensor, Link, Transport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
