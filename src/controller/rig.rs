//! [`CameraAdapter`] for Bevy cameras: a [`Transform`], a [`Projection`] and a [`FocalDistance`].

use bevy_derive::{Deref, DerefMut};
use bevy_ecs::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;
use bevy_render::prelude::*;
use bevy_transform::prelude::*;

use super::camera::{CameraAdapter, ViewVolume};

/// Distance from a camera to the point it orbits and zooms about, along its view direction.
#[derive(Debug, Clone, Copy, PartialEq, Component, Reflect, Deref, DerefMut)]
pub struct FocalDistance(pub f32);

impl Default for FocalDistance {
    fn default() -> Self {
        Self(10.0)
    }
}

/// Borrowed camera components, viewed as a [`CameraAdapter`].
pub struct CameraRig<'a> {
    transform: &'a mut Transform,
    projection: &'a mut Projection,
    focal_distance: &'a mut FocalDistance,
    view_volume: ViewVolume,
    viewport: Vec2,
}

impl<'a> CameraRig<'a> {
    /// `None` for custom projections, which navigation can't reason about.
    pub fn new(
        transform: &'a mut Transform,
        projection: &'a mut Projection,
        focal_distance: &'a mut FocalDistance,
        viewport: Vec2,
    ) -> Option<Self> {
        let view_volume = match &*projection {
            Projection::Perspective(perspective) => ViewVolume::Perspective {
                fov: perspective.fov,
            },
            Projection::Orthographic(orthographic) => ViewVolume::Orthographic {
                height: orthographic.area.height(),
            },
            Projection::Custom(_) => return None,
        };
        Some(Self {
            transform,
            projection,
            focal_distance,
            view_volume,
            viewport,
        })
    }
}

impl CameraAdapter for CameraRig<'_> {
    fn transform(&self) -> Transform {
        *self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        *self.transform = transform;
    }

    fn focal_distance(&self) -> f32 {
        **self.focal_distance
    }

    fn set_focal_distance(&mut self, distance: f32) {
        **self.focal_distance = distance;
    }

    fn view_volume(&self) -> ViewVolume {
        self.view_volume
    }

    fn set_view_height(&mut self, height: f32) {
        let Projection::Orthographic(orthographic) = &mut *self.projection else {
            return;
        };
        let old_height = orthographic.area.height();
        let ratio = height / old_height;
        if !ratio.is_finite() || ratio <= 0.0 {
            return;
        }
        // The area is normally recomputed from the scale by the camera system; keep it in step so
        // the rest of this frame sees the new height.
        orthographic.scale *= ratio;
        orthographic.area = Rect {
            min: orthographic.area.min * ratio,
            max: orthographic.area.max * ratio,
        };
        self.view_volume = ViewVolume::Orthographic { height };
    }

    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }
}
