//! Recent pointer motion during a drag, used to decide whether a released drag should keep
//! spinning.

use std::collections::VecDeque;
use std::time::Duration;

use bevy_math::prelude::*;

use super::orbit::{Spin, SpinSettings, Trackball};

/// How many samples the log keeps.
pub const MOTION_LOG_CAPACITY: usize = 16;

/// A pointer position at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// Normalized screen position.
    pub position: Vec2,
    /// When the pointer was there.
    pub time: Duration,
}

/// A bounded, newest-first history of pointer samples.
#[derive(Debug, Clone, Default)]
pub struct MotionLog {
    samples: VecDeque<MotionSample>,
}

impl MotionLog {
    /// Record a sample, evicting the oldest one once the log is full.
    pub fn push(&mut self, position: Vec2, time: Duration) {
        self.samples.push_front(MotionSample { position, time });
        self.samples.truncate(MOTION_LOG_CAPACITY);
    }

    /// Forget all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no samples are held.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The `age`th most recent sample; `0` is the newest.
    pub fn get(&self, age: usize) -> Option<&MotionSample> {
        self.samples.get(age)
    }

    /// Decide whether a drag released at `release` was a flick, and if so how fast the view should
    /// keep turning about `center`.
    ///
    /// The estimate uses the three newest samples. The release must follow the last motion closely,
    /// and the samples must be close together in time, otherwise the drag is treated as having come
    /// to rest before it was released.
    pub fn estimate_spin(
        &self,
        release: Duration,
        aspect: f32,
        trackball: &Trackball,
        settings: &SpinSettings,
        center: Vec3,
    ) -> Option<Spin> {
        if !settings.enabled {
            return None;
        }
        let newest = self.get(0)?;
        let oldest = self.get(2)?;
        if release.saturating_sub(newest.time) >= settings.max_release_delay {
            return None;
        }
        let window = newest.time.checked_sub(oldest.time)?;
        if window.is_zero() || window >= settings.max_sample_window {
            return None;
        }
        let (axis, angle) = trackball
            .rotation(oldest.position, newest.position, aspect)
            .to_axis_angle();
        let angular_velocity = angle / window.as_secs_f32();
        (axis.is_normalized() && angular_velocity > settings.min_angular_velocity).then_some(Spin {
            axis,
            angular_velocity,
            center,
        })
    }
}
