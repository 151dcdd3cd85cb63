//! Optional extensions to the base camera controller.

#[cfg(feature = "extension_orbit_indicator")]
pub mod orbit_indicator;
pub mod wheel_zoom;
