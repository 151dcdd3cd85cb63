//! A `bevy_examiner_cam` extension that zooms on the scroll wheel.
//!
//! Examiner navigation leaves the wheel to the application: every wheel event comes back as a
//! [`ForwardedInput`]. This plugin picks those up and zooms the camera about the point under the
//! cursor, using the camera's [`ZoomSettings`](crate::controller::zoom::ZoomSettings).

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_reflect::prelude::*;
use bevy_render::prelude::*;
use bevy_transform::prelude::*;
use bevy_window::RequestRedraw;

use crate::{
    controller::{
        camera::normalize_position,
        zoom::{zoom_about, ZoomAnchor},
    },
    input::{drive, ForwardedInput, NavigationSystems},
    prelude::*,
};

/// See the [module](self) docs.
pub struct WheelZoomPlugin;

impl Plugin for WheelZoomPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreUpdate, zoom_on_wheel.after(NavigationSystems))
            .register_type::<WheelZoom>();
    }
}

/// Optional. Turns wheel zooming off for a single camera. Wheel zoom is enabled if this component
/// is not present.
#[derive(Debug, Component, Reflect)]
pub struct WheelZoom {
    pub enabled: bool,
}

impl Default for WheelZoom {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Zoom cameras on forwarded wheel events.
pub fn zoom_on_wheel(
    mut forwarded: EventReader<ForwardedInput>,
    mut cameras: Query<(
        &Camera,
        &ExaminerCam,
        &mut Transform,
        &mut Projection,
        &mut FocalDistance,
        Option<&WheelZoom>,
    )>,
    mut redraw: EventWriter<RequestRedraw>,
) {
    for ForwardedInput { camera, event } in forwarded.read() {
        let NavEventKind::Wheel { delta } = event.kind else {
            continue;
        };
        let Ok((camera, examiner_cam, mut transform, mut projection, mut focal, wheel_zoom)) =
            cameras.get_mut(*camera)
        else {
            continue;
        };
        if !wheel_zoom.is_none_or(|w| w.enabled) {
            continue;
        }
        let Some(viewport) = camera.logical_viewport_size() else {
            continue;
        };
        let settings = &examiner_cam.settings.zoom;
        let mut log_factor = delta.y * settings.wheel_step;
        if settings.invert {
            log_factor = -log_factor;
        }

        let zoomed = drive(viewport, &mut transform, &mut projection, &mut focal, |rig| {
            let anchor = normalize_position(rig, event.position)
                .and_then(|screen| ZoomAnchor::capture(rig, screen))?;
            Some(zoom_about(rig, log_factor, &anchor, &settings.limits))
        });
        if zoomed == Some(Some(true)) {
            redraw.write(RequestRedraw);
        }
    }
}
