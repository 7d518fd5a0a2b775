//! Wall Clock Abstraction
//!
//! On the device the clock is set over NTP after WiFi comes up; until then
//! there is no meaningful time of day and `now()` returns `None`.

use chrono::NaiveDateTime;

/// Source of local wall-clock time
pub trait Clock {
    /// Current local time, or `None` if the clock has not been synced
    fn now(&self) -> Option<NaiveDateTime>;

    /// Whether the clock currently holds a valid time
    fn is_synced(&self) -> bool {
        self.now().is_some()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Option<NaiveDateTime> {
        (**self).now()
    }
}
