//! Camera access for the navigation core, see [`CameraAdapter`].
//!
//! The controller never owns the camera. It reads and writes the camera through this trait, and
//! derives everything else it needs (screen rays, the focal plane, world size of a pixel) from the
//! handful of values the trait exposes.

use bevy_math::prelude::*;
use bevy_reflect::Reflect;
use bevy_transform::prelude::*;

/// The shape of a camera's view volume, as far as navigation needs to know it.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum ViewVolume {
    /// A perspective camera.
    Perspective {
        /// Vertical field of view, in radians.
        fov: f32,
    },
    /// An orthographic camera.
    Orthographic {
        /// Visible height of the view volume in world units.
        height: f32,
    },
}

/// Read and write access to the camera being navigated.
///
/// Implemented by the Bevy integration for `Transform` + `Projection`, and by [`ViewCamera`] for
/// hosts that keep their own camera state.
pub trait CameraAdapter {
    /// Position and orientation of the camera. The camera looks down its local -Z axis.
    fn transform(&self) -> Transform;
    /// Overwrite the camera's position and orientation.
    fn set_transform(&mut self, transform: Transform);
    /// Distance from the camera to the point it orbits and zooms about.
    fn focal_distance(&self) -> f32;
    /// Overwrite the focal distance.
    fn set_focal_distance(&mut self, distance: f32);
    /// The current view volume.
    fn view_volume(&self) -> ViewVolume;
    /// Set the visible height of an orthographic camera. Ignored by perspective cameras.
    fn set_view_height(&mut self, height: f32);
    /// Logical size of the viewport in pixels.
    fn viewport_size(&self) -> Vec2;

    /// Width over height of the viewport, `None` when the viewport is degenerate.
    fn aspect_ratio(&self) -> Option<f32> {
        let size = self.viewport_size();
        let ratio = size.x / size.y;
        (size.x > 0.0 && size.y > 0.0 && ratio.is_finite()).then_some(ratio)
    }
}

/// A self-contained camera for hosts that don't store one in a Bevy `Transform`.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct ViewCamera {
    /// Position and orientation.
    pub transform: Transform,
    /// See [`CameraAdapter::focal_distance`].
    pub focal_distance: f32,
    /// See [`CameraAdapter::view_volume`].
    pub view_volume: ViewVolume,
    /// Logical viewport size in pixels.
    pub viewport: Vec2,
}

impl Default for ViewCamera {
    fn default() -> Self {
        Self {
            transform: Transform::from_xyz(0.0, 0.0, 10.0),
            focal_distance: 10.0,
            view_volume: ViewVolume::Perspective {
                fov: std::f32::consts::FRAC_PI_4,
            },
            viewport: Vec2::new(800.0, 600.0),
        }
    }
}

impl CameraAdapter for ViewCamera {
    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn focal_distance(&self) -> f32 {
        self.focal_distance
    }

    fn set_focal_distance(&mut self, distance: f32) {
        self.focal_distance = distance;
    }

    fn view_volume(&self) -> ViewVolume {
        self.view_volume
    }

    fn set_view_height(&mut self, height: f32) {
        if let ViewVolume::Orthographic { height: ref mut h } = self.view_volume {
            *h = height;
        }
    }

    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }
}

/// Convert a viewport-space position (logical pixels, origin top-left) into the unit square with
/// the origin at the bottom-left. `None` for a degenerate viewport.
pub fn normalize_position(camera: &dyn CameraAdapter, position: Vec2) -> Option<Vec2> {
    let size = camera.viewport_size();
    if size.x <= 0.0 || size.y <= 0.0 {
        return None;
    }
    let normalized = Vec2::new(position.x / size.x, 1.0 - position.y / size.y);
    normalized.is_finite().then_some(normalized)
}

/// The world space direction the camera is looking in.
pub fn view_direction(transform: &Transform) -> Vec3 {
    transform.rotation * Vec3::NEG_Z
}

/// The world space point the camera is focused on.
pub fn focal_point(camera: &dyn CameraAdapter) -> Vec3 {
    let transform = camera.transform();
    transform.translation + view_direction(&transform) * camera.focal_distance()
}

/// A ray through a normalized screen position in the camera's local space.
///
/// The direction is not normalized; its z component is always -1, so `origin + direction * depth`
/// is the point at `depth` in front of the camera.
pub fn local_ray(camera: &dyn CameraAdapter, screen: Vec2) -> Option<(Vec3, Vec3)> {
    let aspect = camera.aspect_ratio()?;
    let centered = screen - Vec2::splat(0.5);
    let (origin, direction) = match camera.view_volume() {
        ViewVolume::Perspective { fov } => {
            let half_height = (fov * 0.5).tan();
            let direction = Vec3::new(
                centered.x * 2.0 * half_height * aspect,
                centered.y * 2.0 * half_height,
                -1.0,
            );
            (Vec3::ZERO, direction)
        }
        ViewVolume::Orthographic { height } => {
            let origin = Vec3::new(centered.x * height * aspect, centered.y * height, 0.0);
            (origin, Vec3::NEG_Z)
        }
    };
    (origin.is_finite() && direction.is_finite()).then_some((origin, direction))
}

/// The camera-local point under `screen`, at `depth` in front of the camera.
pub fn local_point_at_depth(camera: &dyn CameraAdapter, screen: Vec2, depth: f32) -> Option<Vec3> {
    let (origin, direction) = local_ray(camera, screen)?;
    Some(origin + direction * depth)
}

/// The world space ray through a normalized screen position.
pub fn screen_ray(camera: &dyn CameraAdapter, screen: Vec2) -> Option<Ray3d> {
    let (origin, direction) = local_ray(camera, screen)?;
    let transform = camera.transform();
    let direction = Dir3::new(transform.rotation * direction).ok()?;
    Some(Ray3d::new(
        transform.translation + transform.rotation * origin,
        direction,
    ))
}

/// Where a world space point lands on screen, as a normalized position. `None` for points behind a
/// perspective camera.
pub fn world_to_screen(camera: &dyn CameraAdapter, point: Vec3) -> Option<Vec2> {
    let aspect = camera.aspect_ratio()?;
    let transform = camera.transform();
    let local = transform.rotation.inverse() * (point - transform.translation);
    let half_extent = match camera.view_volume() {
        ViewVolume::Perspective { fov } => {
            let depth = -local.z;
            if depth <= 0.0 {
                return None;
            }
            Vec2::new(aspect, 1.0) * (fov * 0.5).tan() * depth
        }
        ViewVolume::Orthographic { height } => Vec2::new(aspect, 1.0) * height * 0.5,
    };
    let screen = local.truncate() / (half_extent * 2.0) + Vec2::splat(0.5);
    screen.is_finite().then_some(screen)
}

/// World space size of one viewport pixel at `depth` in front of the camera.
pub fn length_per_pixel_at_depth(camera: &dyn CameraAdapter, depth: f32) -> Option<f32> {
    let pixels = camera.viewport_size().y;
    if pixels <= 0.0 {
        return None;
    }
    let visible_height = match camera.view_volume() {
        ViewVolume::Perspective { fov } => 2.0 * depth.abs() * (fov * 0.5).tan(),
        ViewVolume::Orthographic { height } => height,
    };
    let length = visible_height / pixels;
    length.is_finite().then_some(length)
}

/// A plane through the focal point, facing the camera. Screen space motion is projected onto it
/// when panning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanningPlane {
    /// A point on the plane.
    pub origin: Vec3,
    /// The plane's orientation.
    pub plane: InfinitePlane3d,
}

impl PanningPlane {
    /// The plane at the camera's focal distance, perpendicular to its view direction.
    pub fn at_focal_distance(camera: &dyn CameraAdapter) -> Option<Self> {
        let transform = camera.transform();
        let normal = Dir3::new(view_direction(&transform)).ok()?;
        Some(Self {
            origin: transform.translation + *normal * camera.focal_distance(),
            plane: InfinitePlane3d { normal },
        })
    }

    /// Where the ray through `screen` meets the plane.
    pub fn project(&self, camera: &dyn CameraAdapter, screen: Vec2) -> Option<Vec3> {
        let ray = screen_ray(camera, screen)?;
        let distance = ray.intersect_plane(self.origin, self.plane)?;
        let point = ray.get_point(distance);
        point.is_finite().then_some(point)
    }
}
