//! The primary [`Component`] of the controller, [`ExaminerCam`].

use std::time::Duration;

use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_reflect::prelude::*;

use super::{
    camera::CameraAdapter,
    event::{NavEvent, NavEventKind},
    mode::{apply_guards, resolve, Combo, NavigationMode},
    motion3d::Motion3dSettings,
    orbit::{SpinSettings, Trackball},
    rig::FocalDistance,
    seek::{RecenterSettings, SeekSettings},
    state::InteractionState,
    viewer::{NavigationStyle, Viewer},
    zoom::ZoomSettings,
};

/// Tunable behavior of an [`ExaminerCam`].
#[derive(Debug, Clone, Reflect)]
pub struct NavigationSettings {
    /// Cursor, keyboard and wheel zoom.
    pub zoom: ZoomSettings,
    /// When a released drag keeps spinning.
    pub spin: SpinSettings,
    /// Shape of the virtual trackball used for orbiting.
    pub trackball: Trackball,
    /// Orbit about the scene point under the cursor when a drag starts, instead of the focal point.
    pub orbit_about_cursor: bool,
    /// Seek to point.
    pub seek: SeekSettings,
    /// Click to recenter.
    pub recenter: RecenterSettings,
    /// Space mice and other six degree of freedom devices.
    pub motion3d: Motion3dSettings,
    /// How far one arrow key press pans, as a fraction of the viewport.
    pub arrow_pan_step: f32,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            zoom: Default::default(),
            spin: Default::default(),
            trackball: Default::default(),
            orbit_about_cursor: false,
            seek: Default::default(),
            recenter: Default::default(),
            motion3d: Default::default(),
            arrow_pan_step: 0.1,
        }
    }
}

/// An examiner style navigation controller: the left button orbits, the middle button pans, left
/// and middle together zoom, and a flick leaves the view spinning.
///
/// Holding control or shift turns the primary button over to selection, and clicking with the
/// middle button (or shift and left) recenters the view on the point under the cursor.
///
/// # Moving the Camera
///
/// The [`NavigationPlugin`](crate::input::NavigationPlugin) feeds Bevy input to this component
/// automatically. Hosts with their own event loop call [`ExaminerCam::handle`] for every input
/// event and [`ExaminerCam::tick`] once per frame, passing their camera through a
/// [`CameraAdapter`] and themselves through a [`Viewer`].
#[derive(Debug, Clone, Default, Reflect, Component)]
#[require(FocalDistance)]
pub struct ExaminerCam {
    /// See the documentation on the contained types for each setting.
    pub settings: NavigationSettings,
    /// Managed by the controller.
    #[reflect(ignore)]
    state: InteractionState,
}

impl ExaminerCam {
    /// Create a new controller with the given settings.
    pub fn new(settings: NavigationSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Read-only view of the interaction state.
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// The current navigation mode.
    pub fn mode(&self) -> NavigationMode {
        self.state.mode
    }

    /// True while a button is held or a drag, pan or zoom is in progress.
    pub fn is_engaged(&self) -> bool {
        self.state.buttons.any_pressed()
            || matches!(
                self.state.mode,
                NavigationMode::Dragging | NavigationMode::Panning | NavigationMode::Zooming
            )
    }

    /// True while the camera moves without user input.
    pub fn is_animating(&self) -> bool {
        self.state.is_animating()
    }

    /// Stop spinning and cancel any recenter or seek in flight.
    pub fn stop_animating(&mut self) {
        self.state.spin = None;
        self.state.animation = None;
        if matches!(
            self.state.mode,
            NavigationMode::Spinning | NavigationMode::Seek
        ) {
            debug!("navigation mode {:?} -> Idle", self.state.mode);
            self.state.mode = NavigationMode::Idle;
        }
    }

    /// Process one input event. Returns true when the event was consumed, either by navigation or
    /// by the viewer's fallback handling.
    pub fn handle(
        &mut self,
        event: &NavEvent,
        camera: &mut dyn CameraAdapter,
        viewer: &mut dyn Viewer,
    ) -> bool {
        let Self { settings, state } = self;

        if state.mode.is_seeking() {
            return state.seek_event(event, settings, camera, viewer);
        }

        if viewer.is_viewing() && !state.is_animating() {
            viewer.set_viewing(false);
        }

        state.pointer.update(camera, event.position);
        state.modifiers = event.modifiers;

        if !viewer.is_editing() && viewer.offer_to_foreground(event) {
            return true;
        }

        // Any key or button ends a spin. Presses end it before they are handled, so they can
        // start a new interaction.
        let interrupts_spin = state.mode == NavigationMode::Spinning
            && matches!(
                event.kind,
                NavEventKind::Keyboard { .. } | NavEventKind::Button { .. }
            );
        if interrupts_spin && event.kind.is_press() {
            state.transition(NavigationMode::Idle, settings, camera, viewer);
        }
        let current = state.mode;

        let consumed = match event.kind {
            NavEventKind::Keyboard { key, state: key_state } => {
                state.keyboard_event(key, key_state.is_pressed(), settings, camera, viewer)
            }
            NavEventKind::Button {
                button,
                state: button_state,
            } => state.button_event(
                event,
                button,
                button_state.is_pressed(),
                settings,
                camera,
                viewer,
            ),
            NavEventKind::PointerMoved => state.pointer_moved(event, settings, camera),
            NavEventKind::Motion3d {
                translation,
                rotation,
            } => state.motion3d_event(translation, rotation, settings, camera),
            NavEventKind::Wheel { .. } => false,
            NavEventKind::Other => {
                trace!("unrecognized event passed through");
                return Self::forward(event, current, current, false, viewer);
            }
        };

        // The handler started a seek, which the combo table knows nothing about.
        if state.mode.is_seeking() {
            return consumed;
        }

        let combo = Combo::new(state.buttons, state.modifiers);
        let mut spin = None;
        let resolved = resolve(current, combo, || {
            spin = state.spin_on_release(event.time, settings, camera);
            spin.is_some()
        });
        let (mut next, consumed) =
            apply_guards(current, resolved, combo, viewer.is_editing(), consumed);
        if interrupts_spin && next == NavigationMode::Spinning {
            next = NavigationMode::Idle;
        }

        state.transition(next, settings, camera, viewer);
        if next == NavigationMode::Spinning && current == NavigationMode::Dragging {
            debug!("spinning at {:?} rad/s", spin.map(|s| s.angular_velocity));
            state.spin = spin;
        }

        Self::forward(event, current, next, consumed, viewer)
    }

    /// Decide what the caller sees once navigation is done with an event.
    fn forward(
        event: &NavEvent,
        current: NavigationMode,
        next: NavigationMode,
        consumed: bool,
        viewer: &mut dyn Viewer,
    ) -> bool {
        if matches!(event.kind, NavEventKind::Wheel { .. }) {
            return viewer.forward(event);
        }
        let selecting = current == NavigationMode::Selection || next == NavigationMode::Selection;
        if (selecting || viewer.is_editing()) && !consumed {
            return viewer.forward(event);
        }
        true
    }

    /// Advance spin and animations by `delta`. Returns true if the camera moved.
    pub fn tick(&mut self, delta: Duration, camera: &mut dyn CameraAdapter) -> bool {
        let state = &mut self.state;
        let mut moved = false;
        if state.mode == NavigationMode::Spinning {
            if let Some(spin) = state.spin {
                moved |= spin.advance(camera, delta);
            }
        }
        if let Some(animation) = &mut state.animation {
            let finished = animation.advance(camera, delta);
            moved = true;
            if finished {
                state.animation = None;
                state.finish_seek();
            }
        }
        state.camera_moved |= moved;
        moved
    }
}

impl NavigationStyle for ExaminerCam {
    fn name(&self) -> &'static str {
        "Examiner"
    }

    fn mouse_buttons(&self, mode: NavigationMode) -> Option<&'static str> {
        match mode {
            NavigationMode::Selection => Some("Press CTRL and left mouse button"),
            NavigationMode::Panning => Some("Press middle mouse button"),
            NavigationMode::Dragging => Some("Press left mouse button"),
            NavigationMode::Zooming => Some("Press left and middle mouse buttons"),
            _ => None,
        }
    }

    fn mode(&self) -> NavigationMode {
        self.mode()
    }

    fn is_engaged(&self) -> bool {
        self.is_engaged()
    }

    fn process_event(
        &mut self,
        event: &NavEvent,
        camera: &mut dyn CameraAdapter,
        viewer: &mut dyn Viewer,
    ) -> bool {
        self.handle(event, camera, viewer)
    }

    fn tick(&mut self, delta: Duration, camera: &mut dyn CameraAdapter) -> bool {
        ExaminerCam::tick(self, delta, camera)
    }

    fn is_animating(&self) -> bool {
        ExaminerCam::is_animating(self)
    }
}
