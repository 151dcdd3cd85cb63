//! Navigation with six degree of freedom devices such as space mice.

use bevy_math::prelude::*;
use bevy_reflect::Reflect;

use super::camera::{focal_point, CameraAdapter, ViewVolume};
use super::orbit::orbit;
use super::zoom::{zoom, ZoomLimits};

#[derive(Debug, Clone, Reflect)]
pub struct Motion3dSettings {
    /// Ignore 3D motion events entirely when false.
    pub enabled: bool,
    /// Multiplier on reported translation.
    pub translation_scale: f32,
    /// Multiplier on reported rotation angles.
    pub rotation_scale: f32,
    /// Logarithmic zoom per unit of forward translation, used by orthographic cameras which can't
    /// move closer to the scene.
    pub orthographic_zoom_scale: f32,
}

impl Default for Motion3dSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            translation_scale: 1.0,
            rotation_scale: 1.0,
            orthographic_zoom_scale: 0.1,
        }
    }
}

/// Apply one 3D motion sample. `translation` moves the camera in its own frame; `rotation` turns
/// the scene about the focal point.
pub fn apply(
    camera: &mut dyn CameraAdapter,
    translation: Vec3,
    rotation: Quat,
    settings: &Motion3dSettings,
    limits: &ZoomLimits,
) -> bool {
    let mut translation = translation * settings.translation_scale;
    let mut moved = false;

    if matches!(camera.view_volume(), ViewVolume::Orthographic { .. }) {
        moved |= zoom(
            camera,
            translation.z * settings.orthographic_zoom_scale,
            limits,
        );
        translation.z = 0.0;
    }

    if translation.is_finite() && translation != Vec3::ZERO {
        let mut transform = camera.transform();
        transform.translation += transform.rotation * translation;
        camera.set_transform(transform);
        moved = true;
    }

    let rotation = Quat::IDENTITY.slerp(rotation, settings.rotation_scale);
    let center = focal_point(camera);
    moved |= orbit(camera, center, rotation.normalize());
    moved
}
