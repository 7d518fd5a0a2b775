//! Time-Related Constants
//!
//! Intervals and retry budgets for blocking operations on the node. All of
//! them run inside the single cooperative main loop.

// ===== SD CARD =====

/// Open attempts before an append gives up.
pub const SD_OPEN_ATTEMPTS: u32 = 3;

/// Fixed delay between SD open attempts (milliseconds).
pub const SD_OPEN_BACKOFF_MS: u32 = 1000;

// ===== NETWORK =====

/// HTTPS request timeout (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// How long to wait for WiFi association (milliseconds).
pub const WIFI_CONNECT_TIMEOUT_MS: u32 = 10_000;

/// Poll interval while waiting for WiFi association (milliseconds).
pub const WIFI_POLL_INTERVAL_MS: u32 = 500;

/// Poll interval while waiting for NTP sync (milliseconds).
pub const NTP_POLL_INTERVAL_MS: u32 = 500;

/// NTP polls before giving up on a sync.
pub const NTP_SYNC_ATTEMPTS: u32 = 60;

// ===== BUZZER =====

/// Silence after every tone (milliseconds).
pub const BEEP_GAP_MS: u32 = 50;
