//! The two seams between the navigation controller and its host.

use std::time::Duration;

use bevy_math::prelude::*;

use super::camera::CameraAdapter;
use super::event::NavEvent;
use super::mode::NavigationMode;

/// Everything the controller needs from the viewer it drives: editing and viewing state, picking,
/// menus, and somewhere to send the events navigation doesn't want.
pub trait Viewer {
    /// True while the host is editing an object. Editing keeps selections alive and lets the
    /// fallback consumer see unconsumed events.
    fn is_editing(&self) -> bool;

    /// True while the host is in viewing mode, as opposed to interacting with the scene.
    fn is_viewing(&self) -> bool;

    fn set_viewing(&mut self, viewing: bool);

    /// Offer the event to foreground content such as draggers. Returns true if it was taken.
    fn offer_to_foreground(&mut self, _event: &NavEvent) -> bool {
        false
    }

    /// Hand the event to the fallback consumer. Returns whether it was consumed.
    fn forward(&mut self, event: &NavEvent) -> bool;

    /// A primary button event that navigation had no use for, e.g. a selection click. Returns
    /// whether it was consumed.
    fn click(&mut self, _event: &NavEvent) -> bool {
        false
    }

    fn popup_menu_enabled(&self) -> bool {
        true
    }

    /// Open the context menu at `position`, in logical viewport pixels.
    fn open_popup_menu(&mut self, position: Vec2);

    /// The closest scene point under `position` (logical viewport pixels), if any.
    fn pick(&self, camera: &dyn CameraAdapter, position: Vec2) -> Option<Vec3>;

    /// A press and release closer together than this is a click.
    fn double_click_interval(&self) -> Duration {
        Duration::from_millis(400)
    }
}

/// A navigation style: a strategy that turns input events into camera motion.
pub trait NavigationStyle {
    /// Human readable name.
    fn name(&self) -> &'static str;

    /// A hint describing how to enter `mode` in this style, if it can be entered with the mouse.
    fn mouse_buttons(&self, mode: NavigationMode) -> Option<&'static str>;

    /// The current mode.
    fn mode(&self) -> NavigationMode;

    /// True while the style is in the middle of a pointer gesture, and should keep receiving
    /// input even when the pointer leaves its viewport.
    fn is_engaged(&self) -> bool;

    /// Handle one input event. Returns whether the event was consumed.
    fn process_event(
        &mut self,
        event: &NavEvent,
        camera: &mut dyn CameraAdapter,
        viewer: &mut dyn Viewer,
    ) -> bool;

    /// Advance spin and animations by `delta`. Returns true if the camera moved.
    fn tick(&mut self, delta: Duration, camera: &mut dyn CameraAdapter) -> bool;

    /// True while the camera moves without user input.
    fn is_animating(&self) -> bool;
}
