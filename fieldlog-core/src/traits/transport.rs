//! Transport Capability
//!
//! Performs one HTTPS POST with `Content-Type: application/json`. The
//! transport owns its own timeout; callers see a status code or an error.

use core::fmt;

/// `true` only for 2xx status codes
///
/// Anything else, including redirects and negative/transport-level codes on
/// the device, counts as a failed delivery.
pub const fn is_success(status: u16) -> bool {
    status >= 200 && status < 300
}

/// One-shot JSON POST
pub trait Transport {
    /// Transport-level failure (DNS, TLS, timeout, connection refused)
    type Error: fmt::Display;

    /// POST `payload` to `url` and return the HTTP status code
    ///
    /// Error statuses (4xx/5xx) are returned as `Ok(code)`; `Err` is reserved
    /// for requests that never completed.
    fn post(&mut self, url: &str, payload: &str) -> Result<u16, Self::Error>;

    /// POST and collapse the outcome to delivered / not delivered
    fn send(&mut self, url: &str, payload: &str) -> bool {
        match self.post(url, payload) {
            Ok(status) if is_success(status) => {
                log::debug!("HTTP_CLIENT | {} accepted payload ({})", url, status);
                true
            }
            Ok(status) => {
                log::warn!("HTTP_CLIENT | {} rejected payload with status {}", url, status);
                false
            }
            Err(e) => {
                log::warn!("HTTP_CLIENT | request to {} failed: {}", url, e);
                false
            }
        }
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn post(&mut self, url: &str, payload: &str) -> Result<u16, Self::Error> {
        (**self).post(url, payload)
    }
}
