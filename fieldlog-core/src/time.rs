//! Time management for the node
//!
//! - Wall clock sources (system clock, fixed clock for tests)
//! - Timestamp formatting for log lines and payloads
//! - Bounded NTP sync wait
//! - Blocking delay for hosts
//!
//! On the device, WiFi comes up first, then SNTP sets the RTC. Until that
//! happens `Clock::now()` is `None` and payloads go out without a date.

use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use embedded_hal::delay::DelayNs;

use crate::constants::time::{NTP_POLL_INTERVAL_MS, NTP_SYNC_ATTEMPTS};
pub use crate::traits::Clock;

/// Format used for log lines and the `/time` field of payloads
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `YYYY-MM-DD HH:MM:SS`
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current time formatted, or a marker when the clock is not synced
pub fn current_timestamp<C: Clock + ?Sized>(clock: &C) -> String {
    match clock.now() {
        Some(now) => format_timestamp(&now),
        None => "unsynced".to_owned(),
    }
}

/// Host local time
///
/// Treats anything before 2020 as "not synced", which is what an ESP32 RTC
/// reports before SNTP has run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Option<NaiveDateTime> {
        let now = Local::now().naive_local();
        (now.and_utc().timestamp() > MIN_SYNCED_UNIX).then_some(now)
    }
}

/// 2020-01-01T00:00:00Z
const MIN_SYNCED_UNIX: i64 = 1_577_836_800;

/// Fixed time source for testing
#[derive(Debug, Clone, Default)]
pub struct FixedClock {
    at: Option<NaiveDateTime>,
}

impl FixedClock {
    /// Clock frozen at `at`
    pub fn new(at: NaiveDateTime) -> Self {
        Self { at: Some(at) }
    }

    /// Clock that was never synced
    pub fn unsynced() -> Self {
        Self { at: None }
    }

    /// Move the clock
    pub fn set(&mut self, at: NaiveDateTime) {
        self.at = Some(at);
    }

    /// Advance by `secs` seconds (no-op while unsynced)
    pub fn advance(&mut self, secs: i64) {
        if let Some(at) = self.at.as_mut() {
            *at += chrono::Duration::seconds(secs);
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Option<NaiveDateTime> {
        self.at
    }
}

/// How long to wait for the clock after starting SNTP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWait {
    /// Polls before giving up
    pub attempts: u32,
    /// Delay between polls in milliseconds
    pub interval_ms: u32,
}

impl Default for SyncWait {
    fn default() -> Self {
        Self {
            attempts: NTP_SYNC_ATTEMPTS,
            interval_ms: NTP_POLL_INTERVAL_MS,
        }
    }
}

/// Poll `clock` until it reports a valid time
///
/// Returns the synced time, or `None` once the attempts are used up. The
/// node keeps running unsynced in that case.
pub fn wait_for_sync<C, D>(clock: &C, delay: &mut D, wait: SyncWait) -> Option<NaiveDateTime>
where
    C: Clock + ?Sized,
    D: DelayNs,
{
    log::info!("NTP | Synchronising time...");
    for attempt in 0..wait.attempts {
        if let Some(now) = clock.now() {
            log::info!("NTP | Time synchronised: {}", format_timestamp(&now));
            return Some(now);
        }
        if attempt + 1 < wait.attempts {
            delay.delay_ms(wait.interval_ms);
        }
    }
    log::warn!("NTP | No time after {} attempts.", wait.attempts);
    None
}

/// Blocking delay backed by `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
