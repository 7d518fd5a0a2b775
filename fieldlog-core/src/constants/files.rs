//! Default SD-Card File Layout
//!
//! Paths are absolute from the card root, the way the SD driver addresses
//! them. Host storage backends resolve them under their own root directory.

/// Human-readable event log, one `tag | message` line per event.
pub const LOG_FILE: &str = "/log.txt";

/// Undelivered JSON payloads, one per line.
pub const BUFFER_FILE: &str = "/buffer.jsonl";

/// Staging file written during a replay pass.
pub const TEMP_FILE: &str = "/temp.jsonl";

/// `key=value` node configuration.
pub const CONFIG_FILE: &str = "/config.conf";

/// Root CA certificate for the HTTPS endpoints.
pub const CERT_FILE: &str = "/cert.pem";
