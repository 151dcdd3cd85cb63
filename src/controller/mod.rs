//! The navigation state machine and the camera manipulators it drives.
//!
//! Everything in here is plain data and functions over a [`camera::CameraAdapter`] and a
//! [`viewer::Viewer`], so it can be used without an ECS. [`component::ExaminerCam`] ties it
//! together.

pub mod camera;
pub mod clock;
pub mod component;
pub mod event;
pub mod mode;
pub mod motion3d;
pub mod motion_log;
pub mod orbit;
pub mod pan;
pub mod rig;
pub mod seek;
pub mod state;
pub mod viewer;
pub mod zoom;
