//! [`InteractionState`], everything the controller remembers between events, and the per-kind
//! event handlers that update it.

use std::time::Duration;

use bevy_input::{keyboard::KeyCode, mouse::MouseButton};
use bevy_log::prelude::*;
use bevy_math::prelude::*;

use super::{
    camera::{focal_point, normalize_position, CameraAdapter, PanningPlane},
    clock::GestureClock,
    component::NavigationSettings,
    event::{Modifiers, NavEvent, NavEventKind},
    mode::{Buttons, NavigationMode},
    motion3d,
    motion_log::MotionLog,
    orbit::{orbit_between, Spin},
    pan::{pan, pan_by_screen_offset},
    seek::{recenter_target, seek_target, CameraAnimation},
    viewer::Viewer,
    zoom::{zoom_about, zoom_by_cursor, ZoomAnchor},
};

/// The pointer as the controller last saw it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerTrack {
    /// Raw position in logical viewport pixels.
    pub position: Vec2,
    /// Normalized position of the latest event.
    pub current: Vec2,
    /// Normalized position of the event before that.
    pub previous: Vec2,
}

impl PointerTrack {
    /// Record a new raw position. A degenerate viewport leaves the normalized samples untouched.
    pub fn update(&mut self, camera: &dyn CameraAdapter, position: Vec2) {
        self.position = position;
        match normalize_position(camera, position) {
            Some(normalized) => {
                self.previous = self.current;
                self.current = normalized;
            }
            None => warn_once!("Viewport has no area, pointer motion is ignored."),
        }
    }
}

/// All mutable state of one navigation controller.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    /// Current navigation mode.
    pub mode: NavigationMode,
    /// Mouse buttons held.
    pub buttons: Buttons,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// Latest pointer samples.
    pub pointer: PointerTrack,
    /// Press times of the centering buttons.
    pub clock: GestureClock,
    /// Suppresses the recenter a quick centering release would otherwise trigger.
    pub lock_recenter: bool,
    /// The shift+primary press that started a centering interaction, still waiting for release.
    pub shift_centering: bool,
    /// Something moved the camera since the last secondary press.
    pub camera_moved: bool,
    /// Pointer history of the current drag.
    pub log: MotionLog,
    /// Plane panned along, captured when panning or centering starts.
    pub panning_plane: Option<PanningPlane>,
    /// World point kept under the pointer while zooming.
    pub zoom_anchor: Option<ZoomAnchor>,
    /// World space point the current drag or spin turns about.
    pub orbit_center: Option<Vec3>,
    /// Velocity of a running spin.
    pub spin: Option<Spin>,
    /// A running recenter or seek animation.
    pub animation: Option<CameraAnimation>,
}

impl InteractionState {
    /// True while the camera moves without user input.
    pub fn is_animating(&self) -> bool {
        self.mode == NavigationMode::Spinning || self.animation.is_some()
    }

    /// The orbit center, falling back to the focal point.
    fn orbit_center(&self, camera: &dyn CameraAdapter) -> Vec3 {
        self.orbit_center
            .unwrap_or_else(|| focal_point(camera))
    }

    /// Switch to `next`, running the exit actions of the current mode and the entry actions of the
    /// new one.
    pub(crate) fn transition(
        &mut self,
        next: NavigationMode,
        settings: &NavigationSettings,
        camera: &dyn CameraAdapter,
        viewer: &dyn Viewer,
    ) {
        use NavigationMode::*;

        let previous = self.mode;
        if previous == next {
            return;
        }
        match previous {
            Dragging => self.log.clear(),
            Spinning => self.spin = None,
            Seek => self.animation = None,
            Zooming => self.zoom_anchor = None,
            _ => {}
        }
        if !matches!(next, Dragging | Spinning) {
            self.orbit_center = None;
        }
        match next {
            Dragging => {
                self.log.clear();
                self.start_orbit(settings, camera, viewer);
            }
            Panning => self.panning_plane = PanningPlane::at_focal_distance(camera),
            Zooming => self.zoom_anchor = ZoomAnchor::capture(camera, self.pointer.current),
            _ => {}
        }
        if next.is_interactive() && self.animation.take().is_some() {
            trace!("recenter animation cancelled by {next:?}");
        }
        debug!("navigation mode {previous:?} -> {next:?}");
        self.mode = next;
    }

    fn start_orbit(
        &mut self,
        settings: &NavigationSettings,
        camera: &dyn CameraAdapter,
        viewer: &dyn Viewer,
    ) {
        let picked = settings
            .orbit_about_cursor
            .then(|| viewer.pick(camera, self.pointer.position))
            .flatten();
        self.orbit_center = Some(picked.unwrap_or_else(|| focal_point(camera)));
    }

    /// A centering press: remember when it happened and where the focal plane is.
    fn begin_centering(&mut self, button: MouseButton, time: Duration, camera: &dyn CameraAdapter) {
        self.clock.press(button, time);
        self.panning_plane = PanningPlane::at_focal_distance(camera);
        self.lock_recenter = false;
    }

    /// Recenter on release if the press and release were a click.
    fn end_centering(
        &mut self,
        button: MouseButton,
        time: Duration,
        settings: &NavigationSettings,
        camera: &mut dyn CameraAdapter,
        viewer: &dyn Viewer,
    ) -> bool {
        if self.lock_recenter || !self.clock.is_click(button, time, viewer.double_click_interval())
        {
            return false;
        }
        self.recenter(settings, camera, viewer);
        true
    }

    /// Move the picked point under the pointer to the focal point.
    fn recenter(
        &mut self,
        settings: &NavigationSettings,
        camera: &mut dyn CameraAdapter,
        viewer: &dyn Viewer,
    ) {
        let Some(point) = viewer.pick(camera, self.pointer.position) else {
            trace!("nothing under the pointer to recenter on");
            return;
        };
        let target = recenter_target(camera, point);
        self.camera_moved = true;
        if settings.recenter.animate {
            self.animation = Some(CameraAnimation::new(
                camera,
                target,
                camera.focal_distance(),
                settings.recenter.duration,
                EaseFunction::CubicInOut,
            ));
        } else {
            camera.set_transform(target);
        }
    }

    /// Start flying towards the picked point under the pointer, or give up and go idle.
    fn seek_to_point(
        &mut self,
        settings: &NavigationSettings,
        camera: &mut dyn CameraAdapter,
        viewer: &dyn Viewer,
    ) {
        let target = viewer
            .pick(camera, self.pointer.position)
            .and_then(|point| seek_target(&*camera, point, &settings.seek));
        let Some((transform, focal_distance)) = target else {
            debug!("seek target missed, leaving seek mode");
            self.transition(NavigationMode::Idle, settings, camera, viewer);
            return;
        };
        self.transition(NavigationMode::Seek, settings, camera, viewer);
        self.animation = Some(CameraAnimation::new(
            camera,
            transform,
            focal_distance,
            settings.seek.duration,
            EaseFunction::SineInOut,
        ));
    }

    /// Finish a seek whose animation has run out.
    pub(crate) fn finish_seek(&mut self) {
        if self.mode == NavigationMode::Seek {
            debug!("navigation mode Seek -> Idle");
            self.mode = NavigationMode::Idle;
        }
    }

    /// Handle events while seeking. Returns whether the event was consumed.
    pub(crate) fn seek_event(
        &mut self,
        event: &NavEvent,
        settings: &NavigationSettings,
        camera: &mut dyn CameraAdapter,
        viewer: &mut dyn Viewer,
    ) -> bool {
        self.pointer.update(camera, event.position);
        self.modifiers = event.modifiers;
        match event.kind {
            NavEventKind::Button { button, state } => {
                if self.mode == NavigationMode::SeekWait
                    && button == MouseButton::Left
                    && state.is_pressed()
                {
                    return self.button_event(event, button, true, settings, camera, viewer);
                }
                self.buttons.set(button, state.is_pressed());
            }
            NavEventKind::Keyboard {
                key: KeyCode::Escape | KeyCode::KeyS,
                state,
            } if self.mode == NavigationMode::SeekWait && state.is_pressed() => {
                self.transition(NavigationMode::Idle, settings, camera, viewer);
                return true;
            }
            _ => {}
        }
        viewer.forward(event)
    }

    /// Keys that control navigation. Returns whether the key was consumed.
    pub(crate) fn keyboard_event(
        &mut self,
        key: KeyCode,
        pressed: bool,
        settings: &NavigationSettings,
        camera: &mut dyn CameraAdapter,
        viewer: &dyn Viewer,
    ) -> bool {
        match key {
            KeyCode::ControlLeft | KeyCode::ControlRight => {
                self.modifiers.ctrl = pressed;
                false
            }
            KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                self.modifiers.shift = pressed;
                false
            }
            KeyCode::KeyS if pressed && self.mode == NavigationMode::Idle => {
                self.transition(NavigationMode::SeekWait, settings, camera, viewer);
                true
            }
            KeyCode::PageUp | KeyCode::PageDown if pressed => {
                let step = settings.zoom.keyboard_step;
                let log_factor = if key == KeyCode::PageUp { -step } else { step };
                if let Some(anchor) = ZoomAnchor::capture(camera, self.pointer.current) {
                    self.camera_moved |=
                        zoom_about(camera, log_factor, &anchor, &settings.zoom.limits);
                }
                true
            }
            KeyCode::ArrowLeft | KeyCode::ArrowRight | KeyCode::ArrowUp | KeyCode::ArrowDown
                if pressed =>
            {
                let step = settings.arrow_pan_step;
                let offset = match key {
                    KeyCode::ArrowLeft => Vec2::new(-step, 0.0),
                    KeyCode::ArrowRight => Vec2::new(step, 0.0),
                    KeyCode::ArrowUp => Vec2::new(0.0, step),
                    _ => Vec2::new(0.0, -step),
                };
                self.camera_moved |= pan_by_screen_offset(camera, offset);
                true
            }
            _ => false,
        }
    }

    /// Mouse buttons. Returns whether the button event was consumed.
    pub(crate) fn button_event(
        &mut self,
        event: &NavEvent,
        button: MouseButton,
        pressed: bool,
        settings: &NavigationSettings,
        camera: &mut dyn CameraAdapter,
        viewer: &mut dyn Viewer,
    ) -> bool {
        use NavigationMode::*;

        let mut consumed = false;
        match button {
            MouseButton::Left => {
                let shift = event.modifiers.shift;
                if pressed && self.mode == SeekWait {
                    self.seek_to_point(settings, camera, viewer);
                    consumed = true;
                    self.lock_recenter = true;
                } else if pressed && shift && self.mode != Selection {
                    self.begin_centering(button, event.time, camera);
                    self.shift_centering = true;
                } else if !pressed && shift && self.shift_centering {
                    consumed = self.end_centering(button, event.time, settings, camera, viewer);
                } else if pressed && self.mode == Idle && !event.modifiers.ctrl {
                    viewer.set_viewing(true);
                    consumed = true;
                    self.lock_recenter = true;
                } else if !pressed && self.mode == Dragging {
                    viewer.set_viewing(false);
                    consumed = true;
                    self.lock_recenter = true;
                } else if viewer.is_editing() && self.mode == Spinning {
                    consumed = true;
                    self.lock_recenter = true;
                } else {
                    consumed = viewer.click(event);
                }
                if !pressed {
                    self.shift_centering = false;
                }
            }
            MouseButton::Right => {
                self.lock_recenter = true;
                if pressed {
                    self.camera_moved = false;
                } else if self.camera_moved {
                    consumed = true;
                } else if !viewer.is_editing()
                    && !matches!(self.mode, Zooming | Panning | Dragging)
                    && viewer.popup_menu_enabled()
                {
                    viewer.open_popup_menu(event.position);
                }
            }
            MouseButton::Middle => {
                if pressed {
                    self.begin_centering(button, event.time, camera);
                } else {
                    consumed = self.end_centering(button, event.time, settings, camera, viewer);
                }
            }
            _ => {}
        }
        self.buttons.set(button, pressed);
        consumed
    }

    /// Pointer motion drives whichever manipulator the current mode selects. Returns whether the
    /// motion was consumed.
    pub(crate) fn pointer_moved(
        &mut self,
        event: &NavEvent,
        settings: &NavigationSettings,
        camera: &mut dyn CameraAdapter,
    ) -> bool {
        self.lock_recenter = true;
        let PointerTrack {
            current, previous, ..
        } = self.pointer;
        let moved = match self.mode {
            NavigationMode::Zooming => self.zoom_anchor.is_some_and(|anchor| {
                zoom_by_cursor(camera, &anchor, current, previous, &settings.zoom)
            }),
            NavigationMode::Panning => self
                .panning_plane
                .is_some_and(|plane| pan(camera, &plane, current, previous)),
            NavigationMode::Dragging => {
                self.log.push(current, event.time);
                self.orbit_step(settings, camera)
            }
            _ => return false,
        };
        if moved {
            self.camera_moved = true;
        } else {
            trace!("{:?} had nothing to do for this motion", self.mode);
        }
        true
    }

    /// Orbit by the pointer motion since the previous event.
    fn orbit_step(
        &mut self,
        settings: &NavigationSettings,
        camera: &mut dyn CameraAdapter,
    ) -> bool {
        let PointerTrack {
            current, previous, ..
        } = self.pointer;
        let center = self.orbit_center(camera);
        orbit_between(camera, &settings.trackball, center, previous, current)
    }

    /// Six degree of freedom input. Always consumed.
    pub(crate) fn motion3d_event(
        &mut self,
        translation: Vec3,
        rotation: Quat,
        settings: &NavigationSettings,
        camera: &mut dyn CameraAdapter,
    ) -> bool {
        if settings.motion3d.enabled
            && motion3d::apply(
                camera,
                translation,
                rotation,
                &settings.motion3d,
                &settings.zoom.limits,
            )
        {
            self.camera_moved = true;
        }
        true
    }

    /// Estimate the spin a drag released at `time` should continue with.
    pub(crate) fn spin_on_release(
        &self,
        time: Duration,
        settings: &NavigationSettings,
        camera: &dyn CameraAdapter,
    ) -> Option<Spin> {
        let aspect = camera.aspect_ratio()?;
        self.log.estimate_spin(
            time,
            aspect,
            &settings.trackball,
            &settings.spin,
            self.orbit_center(camera),
        )
    }
}
