//! Click versus drag timing.

use std::time::Duration;

use bevy_input::mouse::MouseButton;

/// Remembers when each centering button went down, so that the matching release can be classified
/// as a click or as the end of a drag.
///
/// Timestamps are durations since an arbitrary, monotonic epoch chosen by the host.
#[derive(Debug, Clone, Default)]
pub struct GestureClock {
    primary: Option<Duration>,
    tertiary: Option<Duration>,
}

impl GestureClock {
    /// Record a press of `button` at `time`. Only the primary and tertiary buttons start centering
    /// interactions; other buttons are ignored.
    pub fn press(&mut self, button: MouseButton, time: Duration) {
        if let Some(slot) = self.slot_mut(button) {
            *slot = Some(time);
        }
    }

    /// Time elapsed between the last press of `button` and `time`, if the button was pressed.
    pub fn elapsed(&self, button: MouseButton, time: Duration) -> Option<Duration> {
        let pressed = match button {
            MouseButton::Left => self.primary,
            MouseButton::Middle => self.tertiary,
            _ => None,
        }?;
        Some(time.saturating_sub(pressed))
    }

    /// Is a release of `button` at `time` a click, given the double-actuation `interval`?
    pub fn is_click(&self, button: MouseButton, time: Duration, interval: Duration) -> bool {
        self.elapsed(button, time)
            .is_some_and(|elapsed| elapsed < interval)
    }

    fn slot_mut(&mut self, button: MouseButton) -> Option<&mut Option<Duration>> {
        match button {
            MouseButton::Left => Some(&mut self.primary),
            MouseButton::Middle => Some(&mut self.tertiary),
            _ => None,
        }
    }
}
