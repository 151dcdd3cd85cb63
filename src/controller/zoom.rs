//! Provides [`ZoomSettings`], [`ZoomLimits`] and the zoom manipulators.

use core::f32;

use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::Reflect;

use super::camera::{
    length_per_pixel_at_depth, local_point_at_depth, view_direction, CameraAdapter, PanningPlane,
    ViewVolume,
};

/// Zoom factors whose magnitude, as a logarithm, exceeds this are ignored as bogus input.
const MAX_LOG_FACTOR: f32 = 4.0;

/// How zooming responds to input.
#[derive(Debug, Clone, Reflect)]
pub struct ZoomSettings {
    /// Logarithmic zoom per unit of vertical pointer travel, in normalized viewport heights.
    pub speed: f32,
    /// Flip the direction of cursor and wheel zoom. When true, moving the pointer up zooms in.
    pub invert: bool,
    /// Logarithmic zoom applied by a single key press.
    pub keyboard_step: f32,
    /// Logarithmic zoom applied per line of scroll wheel travel, for hosts that zoom on the wheel.
    pub wheel_step: f32,
    /// Bounds on how far in or out the camera can zoom.
    pub limits: ZoomLimits,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            speed: 10.0,
            invert: true,
            keyboard_step: 0.2,
            wheel_step: 0.2,
            limits: ZoomLimits::default(),
        }
    }
}

/// How far in and out the camera may zoom, measured as the world size of one pixel at the focal
/// distance.
#[derive(Debug, Clone, Reflect)]
pub struct ZoomLimits {
    /// Zooming in stops once a pixel at the focal point covers this little of the world. With
    /// meters as units, `1e-3` means a millimeter-sized detail at the focal point fills at most one
    /// pixel.
    ///
    /// Very small values run into floating point precision problems while rendering.
    pub min_size_per_pixel: f32,
    /// Zooming out stops once a pixel at the focal point covers this much of the world.
    pub max_size_per_pixel: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min_size_per_pixel: 1e-7,
            max_size_per_pixel: f32::MAX,
        }
    }
}

impl ZoomLimits {
    /// Would zooming by `log_factor` push past a limit the camera is already at?
    fn blocks(&self, camera: &dyn CameraAdapter, log_factor: f32) -> bool {
        let Some(size) = length_per_pixel_at_depth(camera, camera.focal_distance()) else {
            return false;
        };
        (log_factor < 0.0 && size <= self.min_size_per_pixel)
            || (log_factor > 0.0 && size >= self.max_size_per_pixel)
    }
}

/// Scale the view about the focal point by `exp(log_factor)`. Positive factors zoom out.
///
/// Perspective cameras move along their view direction, keeping the focal point fixed.
/// Orthographic cameras change their view height instead.
pub fn zoom(camera: &mut dyn CameraAdapter, log_factor: f32, limits: &ZoomLimits) -> bool {
    if !log_factor.is_finite() || log_factor == 0.0 || limits.blocks(camera, log_factor) {
        return false;
    }
    let factor = log_factor.exp();
    match camera.view_volume() {
        ViewVolume::Orthographic { height } => {
            let height = height * factor;
            if !height.is_finite() || height <= 0.0 {
                return false;
            }
            camera.set_view_height(height);
        }
        ViewVolume::Perspective { .. } => {
            let old_distance = camera.focal_distance();
            let distance = old_distance * factor;
            let mut transform = camera.transform();
            let position =
                transform.translation - view_direction(&transform) * (distance - old_distance);
            if !position.is_finite() || position.length() > f32::MAX.sqrt() || distance <= 0.0 {
                trace!("zoom ignored, camera would leave the representable range");
                return false;
            }
            transform.translation = position;
            camera.set_transform(transform);
            camera.set_focal_distance(distance);
        }
    }
    true
}

/// The world point a zoom gesture keeps fixed under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomAnchor {
    /// Normalized screen position of the anchor.
    pub screen: Vec2,
    /// Where the anchor sits in the world, on the focal plane.
    pub world: Vec3,
}

impl ZoomAnchor {
    /// Anchor a zoom at `screen`, on the plane through the focal point.
    pub fn capture(camera: &dyn CameraAdapter, screen: Vec2) -> Option<Self> {
        let world = PanningPlane::at_focal_distance(camera)?.project(camera, screen)?;
        Some(Self { screen, world })
    }
}

/// Zoom by `exp(log_factor)` while keeping `anchor` under the same screen position.
pub fn zoom_about(
    camera: &mut dyn CameraAdapter,
    log_factor: f32,
    anchor: &ZoomAnchor,
    limits: &ZoomLimits,
) -> bool {
    if log_factor.abs() > MAX_LOG_FACTOR {
        debug!("zoom factor {log_factor} out of range, ignored");
        return false;
    }
    if !zoom(camera, log_factor, limits) {
        return false;
    }
    keep_under(camera, anchor.world, anchor.screen);
    true
}

/// Translate the camera sideways so `world` projects to `screen` again.
fn keep_under(camera: &mut dyn CameraAdapter, world: Vec3, screen: Vec2) {
    let mut transform = camera.transform();
    let depth = (world - transform.translation).dot(view_direction(&transform));
    if matches!(camera.view_volume(), ViewVolume::Perspective { .. }) && depth <= 0.0 {
        return;
    }
    let Some(local) = local_point_at_depth(camera, screen, depth) else {
        return;
    };
    let translation = world - transform.rotation * local;
    if translation.is_finite() {
        transform.translation = translation;
        camera.set_transform(transform);
    }
}

/// Zoom from vertical pointer motion between two normalized positions, about `anchor`.
pub fn zoom_by_cursor(
    camera: &mut dyn CameraAdapter,
    anchor: &ZoomAnchor,
    current: Vec2,
    previous: Vec2,
    settings: &ZoomSettings,
) -> bool {
    let mut log_factor = (current.y - previous.y) * settings.speed;
    if settings.invert {
        log_factor = -log_factor;
    }
    if log_factor == 0.0 {
        return false;
    }
    zoom_about(camera, log_factor, anchor, &settings.limits)
}
