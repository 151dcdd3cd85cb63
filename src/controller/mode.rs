//! Navigation modes and the table that picks the next mode from the buttons and modifiers held.

use bevy_input::mouse::MouseButton;
use bevy_reflect::Reflect;
use bevy_window::SystemCursorIcon;

use super::event::Modifiers;

/// What the controller is currently doing with the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum NavigationMode {
    /// Nothing is happening.
    #[default]
    Idle,
    /// The user is picking things. Events go to the fallback consumer.
    Selection,
    /// Orbiting with the trackball.
    Dragging,
    /// Translating in the focal plane.
    Panning,
    /// Zooming with vertical pointer motion.
    Zooming,
    /// Orbiting on its own after a flick.
    Spinning,
    /// Waiting for a click to pick a seek target.
    SeekWait,
    /// Flying towards a seek target.
    Seek,
}

impl NavigationMode {
    /// Modes where the camera follows the user or keeps moving by itself.
    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            Self::Dragging | Self::Panning | Self::Zooming | Self::Spinning
        )
    }

    /// Modes belonging to a seek interaction.
    pub fn is_seeking(self) -> bool {
        matches!(self, Self::SeekWait | Self::Seek)
    }

    /// The cursor to show while in this mode.
    pub fn cursor_icon(self) -> SystemCursorIcon {
        match self {
            Self::Idle | Self::Selection => SystemCursorIcon::Default,
            Self::Dragging => SystemCursorIcon::Grabbing,
            Self::Spinning => SystemCursorIcon::Grab,
            Self::Panning => SystemCursorIcon::Move,
            Self::Zooming => SystemCursorIcon::ZoomIn,
            Self::SeekWait => SystemCursorIcon::Crosshair,
            Self::Seek => SystemCursorIcon::Progress,
        }
    }
}

/// Which mouse buttons are currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons {
    /// Left.
    pub primary: bool,
    /// Right.
    pub secondary: bool,
    /// Middle.
    pub tertiary: bool,
}

impl Buttons {
    /// Record `button` going down or up. Buttons other than the three above are ignored.
    pub fn set(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.primary = pressed,
            MouseButton::Right => self.secondary = pressed,
            MouseButton::Middle => self.tertiary = pressed,
            _ => {}
        }
    }

    /// Is any button held?
    pub fn any_pressed(&self) -> bool {
        self.primary || self.secondary || self.tertiary
    }
}

/// The combination of buttons and modifiers that decides the next mode.
///
/// `button1` is the primary (left) button, `button2` the secondary (right) and `button3` the
/// tertiary (middle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Combo {
    pub button1: bool,
    pub button2: bool,
    pub button3: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl Combo {
    pub fn new(buttons: Buttons, modifiers: Modifiers) -> Self {
        Self {
            button1: buttons.primary,
            button2: buttons.secondary,
            button3: buttons.tertiary,
            ctrl: modifiers.ctrl,
            shift: modifiers.shift,
        }
    }

    /// Primary held together with another button. Such chords are always consumed.
    pub fn is_chord(&self) -> bool {
        self.button1 && (self.button2 || self.button3)
    }
}

/// Pick the next mode for `combo`, given the `current` one.
///
/// `should_spin` is only called when a drag ends with nothing held, and decides whether the drag
/// turns into a spin. Combos the table doesn't list keep the current mode.
pub fn resolve(
    current: NavigationMode,
    combo: Combo,
    should_spin: impl FnOnce() -> bool,
) -> NavigationMode {
    use NavigationMode::*;

    let Combo {
        button1: b1,
        button2: b2,
        button3: b3,
        ctrl,
        shift,
    } = combo;
    match (b1, b2, b3, ctrl, shift) {
        (false, false, false, false, false) => match current {
            Spinning => Spinning,
            Dragging if should_spin() => Spinning,
            _ => Idle,
        },
        (true, false, false, false, false) => match current {
            Selection => Selection,
            _ => Dragging,
        },
        (false, false, true, false, false)
        | (false, false, false, true, true)
        | (true, false, false, true, true) => Panning,
        (false, false, false, true, false)
        | (true, false, false, true, false)
        | (false, false, false, false, true)
        | (true, false, false, false, true) => Selection,
        (true, false, true, false, false)
        | (false, false, true, true, false)
        | (false, true, false, true, true) => Zooming,
        _ => current,
    }
}

/// Apply the overrides that sit on top of [`resolve`].
///
/// Chords are always consumed. While the host is editing, an ongoing selection stays a selection
/// until everything is released, and its events are left for the fallback consumer.
pub fn apply_guards(
    current: NavigationMode,
    next: NavigationMode,
    combo: Combo,
    editing: bool,
    consumed: bool,
) -> (NavigationMode, bool) {
    let mut next = next;
    let mut consumed = consumed || combo.is_chord();
    if editing && current == NavigationMode::Selection && next != NavigationMode::Idle {
        next = NavigationMode::Selection;
        consumed = false;
    }
    (next, consumed)
}
