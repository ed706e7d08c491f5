//! Sun & Sky Model
//!
//! Converts abstract time-of-day parameters into a sun direction and the
//! uniforms consumed by the sky shaders:
//!
//! - [`TimeOfDayState`]: the scalar parameters, with clamping/wrapping writes
//! - [`compute_sun`]: pure mapping to a unit [`SunSample`]
//! - [`SkyModel`]: gradient dome or atmospheric sky, chosen at assembly time
//!
//! A full day is a single azimuth sweep from 0 to 1, so the day cycle is
//! just a wrapped accumulator on `azimuth`.

pub mod model;
pub mod sun;
pub mod time_of_day;

pub use model::{AtmosphericSky, GradientSky, GradientSkyUniforms, SkyModel, SkyStrategy, SkyUniforms};
pub use sun::{AtmosphereParams, SunSample, compute_sun, sun_direction};
pub use time_of_day::{TimeOfDayParam, TimeOfDayState, wrap_unit};
