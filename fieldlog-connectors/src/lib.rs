//! Network Connectors for fieldlog Nodes
//!
//! ## Overview
//!
//! The core crate only knows the [`Transport`](fieldlog_core::Transport)
//! capability: one JSON POST, one status code back. This crate provides the
//! implementations that actually touch the network.
//!
//! ### HTTP/HTTPS
//!
//! **When to use:**
//! - The collector is a plain REST service
//! - The node is on WiFi with a route to the internet
//!
//! **Characteristics:**
//! - Blocking requests with a bounded timeout (10 s by default)
//! - TLS through the client's default root store
//! - Error statuses come back as status codes; only requests that never
//!   completed are errors
//!
//! ## Retry Logic
//!
//! Connectors never retry on their own. A failed delivery is buffered by the
//! node and replayed later, so a retry loop here would only delay the
//! buffering and drain the battery.
//!
//! ## Example Usage
//!
//! ```no_run
//! use fieldlog_connectors::http::{HttpConfig, HttpsTransport};
//! use fieldlog_core::Transport;
//!
//! let mut http = HttpsTransport::new(HttpConfig::default().bearer_token("node-7"));
//! let delivered = http.send("https://collector.example/sensor", r#"{"humidity":40}"#);
//! println!("delivered: {delivered}, stats: {:?}", http.stats());
//! ```

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{HttpConfig, HttpError, HttpsTransport};

/// Delivery counters kept by every connector
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConnectionStats {
    /// Requests answered with a 2xx status
    pub messages_sent: u64,
    /// Requests rejected by the server or never completed
    pub messages_failed: u64,
    /// Payload bytes of accepted requests
    pub bytes_sent: u64,
    /// Last error message
    pub last_error: Option<String>,
}

impl ConnectionStats {
    /// Account for one request
    pub fn record(&mut self, payload_len: usize, outcome: Result<u16, &str>) {
        match outcome {
            Ok(status) if fieldlog_core::traits::is_success(status) => {
                self.messages_sent += 1;
                self.bytes_sent += payload_len as u64;
            }
            Ok(status) => {
                self.messages_failed += 1;
                self.last_error = Some(format!("HTTP status {status}"));
            }
            Err(e) => {
                self.messages_failed += 1;
                self.last_error = Some(e.to_owned());
            }
        }
    }
}
