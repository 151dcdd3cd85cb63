//! Translating the camera within the focal plane.

use bevy_math::prelude::*;

use super::camera::{CameraAdapter, PanningPlane};

/// Move the camera so the point of `plane` under `previous` ends up under `current`.
pub fn pan(
    camera: &mut dyn CameraAdapter,
    plane: &PanningPlane,
    current: Vec2,
    previous: Vec2,
) -> bool {
    if current == previous {
        return false;
    }
    let (Some(now), Some(before)) = (
        plane.project(camera, current),
        plane.project(camera, previous),
    ) else {
        return false;
    };
    let mut transform = camera.transform();
    transform.translation -= now - before;
    camera.set_transform(transform);
    true
}

/// Shift the view by a normalized screen `offset`, measured on the current focal plane. Used for
/// keyboard panning, where there is no pointer motion to follow.
pub fn pan_by_screen_offset(camera: &mut dyn CameraAdapter, offset: Vec2) -> bool {
    let Some(plane) = PanningPlane::at_focal_distance(camera) else {
        return false;
    };
    let center = Vec2::splat(0.5);
    pan(camera, &plane, center + offset, center)
}
