//! Buzzer Status Codes
//!
//! The node has no display, so it reports state changes with short beep
//! patterns on a piezo buzzer driven from a GPIO.
//!
//! | Code | Meaning          | Pattern                      |
//! |------|------------------|------------------------------|
//! | 0    | Ready            | 50, ·50, 50, ·50             |
//! | 1    | Success          | 100, ·100, 100               |
//! | 2    | Error            | 300, ·200, 100               |
//! | 3    | Entering sleep   | 50, ·50, 50, ·50, 50         |
//! | *    | Anything else    | 100                          |
//!
//! Tones are in milliseconds; `·` marks a pause. Every tone is followed by a
//! fixed 50 ms gap.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::Vec;

use crate::constants::time::BEEP_GAP_MS;

/// One element of a beep pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Buzzer on for the given milliseconds
    Tone(u32),
    /// Silence for the given milliseconds
    Pause(u32),
}

/// Longest built-in pattern
pub const MAX_PATTERN_STEPS: usize = 8;

/// Fixed-capacity beep sequence
pub type Pattern = Vec<Step, MAX_PATTERN_STEPS>;

/// Status the node can signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeepCode {
    /// Boot finished
    Ready,
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
    /// About to deep-sleep
    Sleep,
    /// Unrecognised numeric code
    Other,
}

impl BeepCode {
    /// Map the numeric codes used in the firmware
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Ready,
            1 => Self::Success,
            2 => Self::Error,
            3 => Self::Sleep,
            _ => Self::Other,
        }
    }

    /// Tone/pause sequence for this code
    pub fn pattern(self) -> Pattern {
        Pattern::from_slice(self.steps()).unwrap_or_default()
    }

    const fn steps(self) -> &'static [Step] {
        use Step::{Pause, Tone};
        match self {
            Self::Ready => &[Tone(50), Pause(50), Tone(50), Pause(50)],
            Self::Success => &[Tone(100), Pause(100), Tone(100)],
            Self::Error => &[Tone(300), Pause(200), Tone(100)],
            Self::Sleep => &[Tone(50), Pause(50), Tone(50), Pause(50), Tone(50)],
            Self::Other => &[Tone(100)],
        }
    }
}

/// Piezo buzzer on a push-pull output
///
/// A buzzer built with [`Buzzer::silent`] never drives a pin, for boards
/// without one fitted. It skips tones and their gaps and only waits out
/// [`Step::Pause`] steps.
pub struct Buzzer<P, D> {
    pin: Option<P>,
    delay: D,
}

impl<P, D> Buzzer<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// Buzzer driving `pin`; the pin is set low immediately
    pub fn new(mut pin: P, delay: D) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self { pin: Some(pin), delay })
    }

    /// Buzzer with no pin attached
    pub fn silent(delay: D) -> Self {
        Self { pin: None, delay }
    }

    /// One tone of `duration_ms` followed by the fixed gap
    pub fn beep(&mut self, duration_ms: u32) -> Result<(), P::Error> {
        let Some(pin) = self.pin.as_mut() else {
            return Ok(());
        };
        pin.set_high()?;
        self.delay.delay_ms(duration_ms);
        pin.set_low()?;
        self.delay.delay_ms(BEEP_GAP_MS);
        Ok(())
    }

    /// Play the pattern for `code`
    pub fn signal(&mut self, code: BeepCode) -> Result<(), P::Error> {
        self.play(&code.pattern())
    }

    /// Play an arbitrary pattern
    pub fn play(&mut self, pattern: &[Step]) -> Result<(), P::Error> {
        for step in pattern {
            match *step {
                Step::Tone(ms) => self.beep(ms)?,
                Step::Pause(ms) => self.delay.delay_ms(ms),
            }
        }
        Ok(())
    }

    /// Release the pin and delay
    pub fn release(self) -> (Option<P>, D) {
        (self.pin, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        High,
        Low,
        Wait(u32),
    }

    type Trace = Rc<RefCell<std::vec::Vec<Event>>>;

    struct Pin(Trace);

    impl embedded_hal::digital::ErrorType for Pin {
        type Error = Infallible;
    }

    impl OutputPin for Pin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.0.borrow_mut().push(Event::Low);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.0.borrow_mut().push(Event::High);
            Ok(())
        }
    }

    struct Delay(Trace);

    impl DelayNs for Delay {
        fn delay_ns(&mut self, ns: u32) {
            self.0.borrow_mut().push(Event::Wait(ns / 1_000_000));
        }

        fn delay_ms(&mut self, ms: u32) {
            self.0.borrow_mut().push(Event::Wait(ms));
        }
    }

    fn buzzer() -> (Buzzer<Pin, Delay>, Trace) {
        let trace = Trace::default();
        let buzzer = Buzzer::new(Pin(trace.clone()), Delay(trace.clone())).unwrap();
        trace.borrow_mut().clear();
        (buzzer, trace)
    }

    #[test]
    fn numeric_codes() {
        assert_eq!(BeepCode::from_code(0), BeepCode::Ready);
        assert_eq!(BeepCode::from_code(2), BeepCode::Error);
        assert_eq!(BeepCode::from_code(42), BeepCode::Other);
    }

    #[test]
    fn error_pattern_drives_pin() {
        let (mut buzzer, trace) = buzzer();
        buzzer.signal(BeepCode::Error).unwrap();

        use Event::*;
        assert_eq!(
            *trace.borrow(),
            vec![
                High, Wait(300), Low, Wait(50),
                Wait(200),
                High, Wait(100), Low, Wait(50),
            ]
        );
    }

    #[test]
    fn every_pattern_fits() {
        for code in 0..5 {
            let code = BeepCode::from_code(code);
            assert_eq!(code.pattern().as_slice(), code.steps());
        }
    }

    #[test]
    fn new_sets_pin_low() {
        let trace = Trace::default();
        let _ = Buzzer::new(Pin(trace.clone()), Delay(trace.clone())).unwrap();
        assert_eq!(*trace.borrow(), vec![Event::Low]);
    }

    #[test]
    fn silent_buzzer_keeps_pauses_only() {
        let trace = Trace::default();
        let mut buzzer: Buzzer<Pin, Delay> = Buzzer::silent(Delay(trace.clone()));
        buzzer.signal(BeepCode::Success).unwrap();
        assert_eq!(*trace.borrow(), vec![Event::Wait(100)]);
    }
}
