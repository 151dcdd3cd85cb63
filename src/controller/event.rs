//! Input events as seen by the navigation controller.

use std::time::Duration;

use bevy_input::{keyboard::KeyCode, mouse::MouseButton, ButtonState};
use bevy_math::prelude::*;

/// Modifier keys held while an event happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Either control key.
    pub ctrl: bool,
    /// Either shift key.
    pub shift: bool,
}

impl Modifiers {
    /// Control held.
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
    };
    /// Shift held.
    pub const SHIFT: Self = Self {
        ctrl: false,
        shift: true,
    };
}

/// What kind of input arrived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavEventKind {
    /// A key went up or down.
    Keyboard { key: KeyCode, state: ButtonState },
    /// A mouse button went up or down.
    Button {
        button: MouseButton,
        state: ButtonState,
    },
    /// The pointer moved to [`NavEvent::position`].
    PointerMoved,
    /// A six degree of freedom device reported motion, in camera space.
    Motion3d { translation: Vec3, rotation: Quat },
    /// The scroll wheel turned.
    Wheel { delta: Vec2 },
    /// Anything else. Never changes the navigation mode, only gets forwarded.
    Other,
}

impl NavEventKind {
    /// True for key and button presses.
    pub fn is_press(&self) -> bool {
        matches!(
            self,
            Self::Keyboard {
                state: ButtonState::Pressed,
                ..
            } | Self::Button {
                state: ButtonState::Pressed,
                ..
            }
        )
    }
}

/// A single input event with the pointer position and modifiers at the time it happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavEvent {
    /// What happened.
    pub kind: NavEventKind,
    /// Pointer position in logical viewport pixels, origin at the top-left.
    pub position: Vec2,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// Monotonic timestamp.
    pub time: Duration,
}

impl NavEvent {
    /// An event of `kind` at `position`, with no modifiers held.
    pub fn new(kind: NavEventKind, position: Vec2, time: Duration) -> Self {
        Self {
            kind,
            position,
            modifiers: Modifiers::default(),
            time,
        }
    }

    /// A mouse button press or release.
    pub fn button(button: MouseButton, state: ButtonState, position: Vec2, time: Duration) -> Self {
        Self::new(NavEventKind::Button { button, state }, position, time)
    }

    /// A key press or release.
    pub fn key(key: KeyCode, state: ButtonState, position: Vec2, time: Duration) -> Self {
        Self::new(NavEventKind::Keyboard { key, state }, position, time)
    }

    /// The pointer moving to `position`.
    pub fn moved(position: Vec2, time: Duration) -> Self {
        Self::new(NavEventKind::PointerMoved, position, time)
    }

    /// A scroll wheel event.
    pub fn wheel(delta: Vec2, position: Vec2, time: Duration) -> Self {
        Self::new(NavEventKind::Wheel { delta }, position, time)
    }

    /// Motion from a six degree of freedom device.
    pub fn motion3d(translation: Vec3, rotation: Quat, position: Vec2, time: Duration) -> Self {
        Self::new(
            NavEventKind::Motion3d {
                translation,
                rotation,
            },
            position,
            time,
        )
    }

    /// The same event, with `modifiers` held.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
