//! An examiner style camera controller for CAD viewers and editors.
//!
//! - The left mouse button orbits with a virtual trackball. Let go while still moving and the view
//!   keeps spinning.
//! - The middle mouse button pans, left and middle together zoom.
//! - Control or shift hand the left button over to selection.
//! - A quick middle click, or shift and left click, recenters the view on the point under the
//!   cursor. `S` followed by a click flies towards a point.
//! - Page up and page down zoom, arrow keys pan.
//!
//! Add [`DefaultExaminerCamPlugins`] and put an [`ExaminerCam`](prelude::ExaminerCam) on your
//! camera. Recentering and orbiting about the cursor use [`bevy_picking`] hover data, so add a
//! picking backend too.
//!
//! The controller itself doesn't need Bevy's ECS: see [`controller`] for using it from another
//! event loop.

pub mod controller;
pub mod extensions;
pub mod input;

/// Common imports.
pub mod prelude {
    pub use crate::{
        controller::{
            camera::{CameraAdapter, ViewCamera, ViewVolume},
            component::{ExaminerCam, NavigationSettings},
            event::{Modifiers, NavEvent, NavEventKind},
            mode::NavigationMode,
            rig::FocalDistance,
            viewer::{NavigationStyle, Viewer},
        },
        input::{
            ContextMenuRequest, ForegroundContent, ForwardedInput, NavigationPlugin,
            ViewerContext, ViewportClick,
        },
        DefaultExaminerCamPlugins,
    };
}

/// Adds navigation for [`ExaminerCam`](prelude::ExaminerCam) cameras, wheel zoom, and the orbit
/// indicator when its feature is enabled.
pub struct DefaultExaminerCamPlugins;

impl bevy_app::PluginGroup for DefaultExaminerCamPlugins {
    #[allow(unused_mut)]
    fn build(self) -> bevy_app::PluginGroupBuilder {
        let mut group = bevy_app::PluginGroupBuilder::start::<Self>()
            .add(input::NavigationPlugin::<controller::component::ExaminerCam>::default())
            .add(extensions::wheel_zoom::WheelZoomPlugin);

        #[cfg(feature = "extension_orbit_indicator")]
        {
            group = group.add(extensions::orbit_indicator::OrbitIndicatorPlugin);
        }

        group
    }
}
