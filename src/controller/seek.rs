//! Animated camera moves: recentering on a picked point, and seeking towards one.

use std::time::Duration;

use bevy_math::prelude::*;
use bevy_reflect::Reflect;
use bevy_transform::prelude::*;

use super::camera::{view_direction, CameraAdapter};

/// How a seek ends up relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum SeekDistance {
    /// Stop at this fraction of the starting distance to the target.
    Relative(f32),
    /// Stop this far from the target, in world units.
    Absolute(f32),
}

/// Settings for seeking to a point.
#[derive(Debug, Clone, Reflect)]
pub struct SeekSettings {
    /// How long the flight takes.
    pub duration: Duration,
    /// Where the flight ends.
    pub distance: SeekDistance,
    /// Turn to face the target while flying. Otherwise only the position changes.
    pub orient_to_point: bool,
}

impl Default for SeekSettings {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(2),
            distance: SeekDistance::Relative(0.5),
            orient_to_point: true,
        }
    }
}

/// Settings for recentering the view on a clicked point.
#[derive(Debug, Clone, Reflect)]
pub struct RecenterSettings {
    /// Move smoothly instead of jumping.
    pub animate: bool,
    /// Length of the smooth move.
    pub duration: Duration,
}

impl Default for RecenterSettings {
    fn default() -> Self {
        Self {
            animate: true,
            duration: Duration::from_millis(250),
        }
    }
}

/// A camera move from where the camera was when it started, to a target pose.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraAnimation {
    start: Transform,
    start_focal_distance: f32,
    target: Transform,
    target_focal_distance: f32,
    elapsed: Duration,
    duration: Duration,
    ease: EaseFunction,
}

impl CameraAnimation {
    pub fn new(
        camera: &dyn CameraAdapter,
        target: Transform,
        target_focal_distance: f32,
        duration: Duration,
        ease: EaseFunction,
    ) -> Self {
        Self {
            start: camera.transform(),
            start_focal_distance: camera.focal_distance(),
            target,
            target_focal_distance,
            elapsed: Duration::ZERO,
            duration,
            ease,
        }
    }

    /// Step the animation forward by `delta` and write the new pose into the camera. Returns true
    /// once the target has been reached.
    pub fn advance(&mut self, camera: &mut dyn CameraAdapter, delta: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(delta);
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
        };
        let t = self.ease.sample_clamped(progress);

        let transform = Transform {
            translation: self.start.translation.lerp(self.target.translation, t),
            rotation: self
                .start
                .rotation
                .slerp(self.target.rotation, t)
                .normalize(),
            scale: self.start.scale,
        };
        let focal_distance = self.start_focal_distance
            + (self.target_focal_distance - self.start_focal_distance) * t;
        camera.set_transform(transform);
        camera.set_focal_distance(focal_distance);
        progress >= 1.0
    }
}

/// The camera pose that puts `point` at the focal point without turning the camera.
pub fn recenter_target(camera: &dyn CameraAdapter, point: Vec3) -> Transform {
    let mut transform = camera.transform();
    transform.translation = point - view_direction(&transform) * camera.focal_distance();
    transform
}

/// The pose a seek towards `point` ends at, and the focal distance there.
pub fn seek_target(
    camera: &dyn CameraAdapter,
    point: Vec3,
    settings: &SeekSettings,
) -> Option<(Transform, f32)> {
    let start = camera.transform();
    let offset = point - start.translation;
    let to_point = offset.try_normalize()?;
    let distance = match settings.distance {
        SeekDistance::Relative(fraction) => offset.length() * fraction.clamp(0.0, 1.0),
        SeekDistance::Absolute(distance) => distance.max(0.0),
    };
    let mut target = start;
    if settings.orient_to_point {
        let turn = Quat::from_rotation_arc(view_direction(&start).normalize(), to_point);
        target.rotation = (turn * start.rotation).normalize();
    }
    target.translation = point - view_direction(&target) * distance;
    (target.is_finite() && distance > 0.0).then_some((target, distance))
}
