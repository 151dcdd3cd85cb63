//! Trackball rotation about a center point, and free spinning after a flick.

use std::time::Duration;

use bevy_math::prelude::*;
use bevy_reflect::Reflect;

use super::camera::CameraAdapter;

/// Rotations smaller than this are treated as no rotation at all.
const MIN_ROTATION: f32 = 1e-6;

/// Maps normalized screen positions onto a virtual trackball.
///
/// The ball is a sphere near the middle of the viewport that blends into a hyperbolic sheet towards
/// the edges, so dragging anywhere produces a well defined rotation. Dragging across the ball rotates
/// about an axis perpendicular to the drag, by an angle that grows with the drag length.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Trackball {
    /// Radius of the ball, relative to half the viewport height.
    pub radius: f32,
}

impl Default for Trackball {
    fn default() -> Self {
        Self { radius: 0.8 }
    }
}

impl Trackball {
    /// Project a normalized screen position onto the ball. `aspect` stretches the horizontal axis
    /// so the ball stays round on non-square viewports.
    pub fn project(&self, screen: Vec2, aspect: f32) -> Vec3 {
        let mut p = (screen - Vec2::splat(0.5)) * 2.0;
        p.x *= aspect;
        let r2 = self.radius * self.radius;
        let d2 = p.length_squared();
        let z = if d2 <= r2 * 0.5 {
            (r2 - d2).sqrt()
        } else {
            r2 * 0.5 / d2.sqrt()
        };
        p.extend(z)
    }

    /// The rotation carrying the ball from under `from` to under `to`, in camera space.
    pub fn rotation(&self, from: Vec2, to: Vec2, aspect: f32) -> Quat {
        let (Some(a), Some(b)) = (
            self.project(from, aspect).try_normalize(),
            self.project(to, aspect).try_normalize(),
        ) else {
            return Quat::IDENTITY;
        };
        Quat::from_rotation_arc(a, b)
    }
}

/// Rotate the scene by `rotation` (in camera space) about the world space `center`. The camera
/// itself moves by the inverse rotation, so the scene appears to turn with the cursor.
pub fn orbit(camera: &mut dyn CameraAdapter, center: Vec3, rotation: Quat) -> bool {
    if !rotation.is_finite() || rotation.xyz().length() < MIN_ROTATION {
        return false;
    }
    let mut transform = camera.transform();
    let world = transform.rotation * rotation.inverse() * transform.rotation.inverse();
    transform.rotate_around(center, world);
    transform.rotation = transform.rotation.normalize();
    if !transform.translation.is_finite() {
        return false;
    }
    camera.set_transform(transform);
    true
}

/// Orbit by the trackball rotation between two normalized screen positions.
pub fn orbit_between(
    camera: &mut dyn CameraAdapter,
    trackball: &Trackball,
    center: Vec3,
    previous: Vec2,
    current: Vec2,
) -> bool {
    let Some(aspect) = camera.aspect_ratio() else {
        return false;
    };
    orbit(camera, center, trackball.rotation(previous, current, aspect))
}

/// Controls when a released drag keeps the view spinning.
#[derive(Debug, Clone, Reflect)]
pub struct SpinSettings {
    /// When false, releasing a drag never starts a spin.
    pub enabled: bool,
    /// The slowest angular velocity, in radians per second, that still counts as a flick.
    pub min_angular_velocity: f32,
    /// The button must be released within this long of the last recorded motion.
    pub max_release_delay: Duration,
    /// The motion samples used to estimate the spin must span less than this.
    pub max_sample_window: Duration,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_angular_velocity: 0.05,
            max_release_delay: Duration::from_millis(100),
            max_sample_window: Duration::from_millis(300),
        }
    }
}

/// A view that keeps turning on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Unit rotation axis in camera space.
    pub axis: Vec3,
    /// Radians per second.
    pub angular_velocity: f32,
    /// World space point the view turns about.
    pub center: Vec3,
}

impl Spin {
    /// Turn the camera by however far the spin travels in `delta`.
    pub fn advance(&self, camera: &mut dyn CameraAdapter, delta: Duration) -> bool {
        let angle = self.angular_velocity * delta.as_secs_f32();
        if !angle.is_finite() {
            return false;
        }
        orbit(camera, self.center, Quat::from_axis_angle(self.axis, angle))
    }
}
