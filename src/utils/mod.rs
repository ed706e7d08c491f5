//! Utility Module
//!
//! - [`OrbitControls`]: spherical orbit camera used by the viewport
//! - [`FrameStats`]: frame counting and FPS reporting
//! - [`time`]: the [`Clock`] abstraction with wall-clock and fixed-step clocks
//! - [`color`]: HSL and hex color conversion

pub mod color;
pub mod frame_stats;
pub mod orbit_control;
pub mod time;

pub use frame_stats::FrameStats;
pub use orbit_control::OrbitControls;
pub use time::{Clock, FixedClock, Timer};
