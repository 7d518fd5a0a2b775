//! Capability Traits
//!
//! The node core never talks to hardware directly. Every external
//! collaborator sits behind one of these narrow traits so the
//! store-and-forward logic can run against real devices, host
//! implementations, or in-memory fakes.
//!
//! ## Module Organization
//!
//! - [`transport`] - One HTTPS POST per call
//! - [`link`] - WiFi association state
//! - [`sensor`] - DHT temperature/humidity sampling
//! - [`time`] - Wall clock (NTP-synced on the device)
//!
//! Filesystem access lives in [`crate::storage`] because it carries host and
//! in-memory implementations alongside the trait.
//!
//! ## Usage Example
//!
//! ```rust
//! use fieldlog_core::traits::Transport;
//!
//! struct AlwaysOk;
//!
//! impl Transport for AlwaysOk {
//!     type Error = core::convert::Infallible;
//!
//!     fn post(&mut self, _url: &str, _payload: &str) -> Result<u16, Self::Error> {
//!         Ok(201)
//!     }
//! }
//!
//! let mut transport = AlwaysOk;
//! assert!(transport.send("https://api.example.com/sensor", "{}"));
//! ```

pub mod link;
pub mod sensor;
pub mod time;
pub mod transport;

pub use link::{wait_for_link, Link, LinkWait};
pub use sensor::DhtSensor;
pub use time::Clock;
pub use transport::{is_success, Transport};
