//! A `bevy_examiner_cam` extension that draws an indicator in the scene at the orbit center while
//! the view is being dragged or is spinning, so it is obvious what point the camera turns about.

use bevy_app::prelude::*;
use bevy_color::Color;
use bevy_ecs::prelude::*;
use bevy_gizmos::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;
use bevy_render::prelude::*;
use bevy_transform::{prelude::*, TransformSystem};

use crate::prelude::*;

/// See the [module](self) docs.
pub struct OrbitIndicatorPlugin;

impl Plugin for OrbitIndicatorPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PostUpdate,
            draw_orbit_center.after(TransformSystem::TransformPropagate),
        )
        .register_type::<OrbitIndicator>();
    }
}

/// Optional. Configures whether or not an [`ExaminerCam`] should show the orbit indicator. The
/// indicator will be enabled if this component is not present.
#[derive(Debug, Component, Reflect)]
pub struct OrbitIndicator {
    /// Draw the indicator for this camera.
    pub enabled: bool,
}

impl Default for OrbitIndicator {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Use gizmos to draw the orbit center in world space.
pub fn draw_orbit_center(
    cameras: Query<(
        &ExaminerCam,
        &Projection,
        &GlobalTransform,
        Option<&OrbitIndicator>,
    )>,
    mut gizmos: Gizmos,
) {
    for (examiner_cam, projection, cam_transform, _) in cameras
        .iter()
        .filter(|(.., indicator)| indicator.is_none_or(|i| i.enabled))
    {
        if !matches!(
            examiner_cam.mode(),
            NavigationMode::Dragging | NavigationMode::Spinning
        ) {
            continue;
        }
        let Some(orbit_center) = examiner_cam.state().orbit_center else {
            continue;
        };
        let distance = cam_transform.translation().distance(orbit_center);
        let scale = match projection {
            Projection::Perspective(perspective) => distance * perspective.fov,
            Projection::Orthographic(ortho) => ortho.area.height(),
            Projection::Custom(_) => continue,
        } * 0.01;

        // Pulled toward the camera so surfaces through the center don't hide it.
        let Some(towards_camera) = (cam_transform.translation() - orbit_center).try_normalize()
        else {
            continue;
        };
        let center = orbit_center + towards_camera * scale;

        let color = Color::WHITE;
        let arm_length = 0.4;
        let offset = 1.5 * scale;
        gizmos.circle(
            Isometry3d::new(center, cam_transform.rotation()),
            scale,
            color,
        );
        for direction in [
            cam_transform.left(),
            cam_transform.right(),
            cam_transform.up(),
            cam_transform.down(),
        ] {
            gizmos.ray(
                center + offset * direction,
                offset * arm_length * direction,
                color,
            );
        }
    }
}
