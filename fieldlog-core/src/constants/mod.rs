//! Constants for the fieldlog core
//!
//! Centralized values shared by the sink, the replay engine, the sampler and
//! the buzzer. Units are part of every name.
//!
//! ## Organization
//!
//! - **Files**: Default SD-card paths
//! - **Sensors**: DHT11 operating envelope
//! - **Time**: Retry, backoff, network and signalling intervals

/// Default SD-card file layout.
pub mod files;

/// DHT11 operating envelope from the sensor datasheet.
pub mod sensors;

/// Retry counts, backoff delays and signalling timings.
pub mod time;
