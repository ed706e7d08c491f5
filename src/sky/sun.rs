use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::sky::time_of_day::TimeOfDayState;

/// Uniforms for the atmospheric scattering sky shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct AtmosphereParams {
    /// Unit direction towards the sun
    pub sun_position: Vec3,
    pub turbidity: f32,
    pub rayleigh: f32,
    pub mie_coefficient: f32,
    pub mie_directional_g: f32,
    pub(crate) _pad: f32,
}

impl AtmosphereParams {
    #[must_use]
    pub fn new(state: &TimeOfDayState, sun_position: Vec3) -> Self {
        Self {
            sun_position,
            turbidity: state.turbidity,
            rayleigh: state.rayleigh,
            mie_coefficient: state.mie_coefficient,
            mie_directional_g: state.mie_directional_g,
            _pad: 0.0,
        }
    }
}

/// Sun direction plus the matching atmosphere uniforms for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunSample {
    pub direction: Vec3,
    pub atmosphere: AtmosphereParams,
}

/// Maps time-of-day parameters to a sun direction.
///
/// With `theta = π·(inclination − 0.5)` and `phi = 2π·(azimuth − 0.5)` the
/// direction is `(cos φ, sin φ·sin θ, sin φ·cos θ)`, which is unit length for
/// any input so no renormalisation happens here.
#[must_use]
pub fn sun_direction(inclination: f32, azimuth: f32) -> Vec3 {
    let theta = PI * (inclination - 0.5);
    let phi = 2.0 * PI * (azimuth - 0.5);

    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    Vec3::new(cos_phi, sin_phi * sin_theta, sin_phi * cos_theta)
}

/// Computes the sun direction and atmospheric uniforms for `state`.
#[must_use]
pub fn compute_sun(state: &TimeOfDayState) -> SunSample {
    let direction = sun_direction(state.inclination, state.azimuth);
    SunSample {
        direction,
        atmosphere: AtmosphereParams::new(state, direction),
    }
}
