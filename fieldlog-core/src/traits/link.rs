//! WiFi Link Capability

use embedded_hal::delay::DelayNs;

use crate::constants::time::{WIFI_CONNECT_TIMEOUT_MS, WIFI_POLL_INTERVAL_MS};

/// Station-mode network link
///
/// Implementations wrap the radio driver.
pub trait Link {
    /// Whether the station is associated and has an address
    fn is_connected(&self) -> bool;

    /// Start associating with a network; `password` is `None` for open networks
    ///
    /// Returns `false` if the driver refused to start. Association may still
    /// be in progress when this returns; see [`wait_for_link`].
    fn connect(&mut self, ssid: &str, password: Option<&str>) -> bool;

    /// Re-associate after a drop
    fn reconnect(&mut self);

    /// Turn the radio off to save power
    fn power_off(&mut self);

    /// Turn the radio back on in station mode
    fn power_on(&mut self);
}

/// Bounded wait for association after [`Link::connect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkWait {
    /// Give up after this long (milliseconds)
    pub timeout_ms: u32,
    /// Delay between status polls (milliseconds)
    pub interval_ms: u32,
}

impl Default for LinkWait {
    fn default() -> Self {
        Self {
            timeout_ms: WIFI_CONNECT_TIMEOUT_MS,
            interval_ms: WIFI_POLL_INTERVAL_MS,
        }
    }
}

/// Poll `link` until it is up or the wait runs out
pub fn wait_for_link<L, D>(link: &L, delay: &mut D, wait: LinkWait) -> bool
where
    L: Link + ?Sized,
    D: DelayNs,
{
    let mut waited = 0;
    while !link.is_connected() {
        if waited >= wait.timeout_ms {
            return false;
        }
        log::debug!("WIFI | waiting for association ({} ms)", waited);
        delay.delay_ms(wait.interval_ms);
        waited = waited.saturating_add(wait.interval_ms.max(1));
    }
    true
}
