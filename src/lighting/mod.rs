//! Lighting Rig
//!
//! A static hemisphere light plus one shadow-casting directional light that
//! follows the sun. The rig only holds state; the renderer reads it from the
//! frame submission.

use glam::{Mat4, Quat, Vec3};

use crate::config::LightingConfig;
use crate::scene::transform::look_rotation;
use crate::sky::SunSample;
use crate::utils::color::hsl_array;

/// Sky/ground ambient light. Never changes after initialisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereLight {
    pub sky_color: Vec3,
    pub ground_color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
}

/// Orthographic shadow camera of the directional light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowFrustum {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    pub bias: f32,
    pub normal_bias: f32,
    pub map_size: u32,
}

impl ShadowFrustum {
    /// Symmetric frustum spanning `[-d, d]` on both axes.
    #[must_use]
    pub fn from_half_extent(d: f32, near: f32, far: f32) -> Self {
        Self {
            left: -d,
            right: d,
            top: d,
            bottom: -d,
            near,
            far,
            bias: 0.0,
            normal_bias: 0.0,
            map_size: 1024,
        }
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    /// Always aims at `target`; derived from `position` on every sync
    pub orientation: Quat,
    pub target: Vec3,
    pub cast_shadows: bool,
    pub shadow: ShadowFrustum,
}

impl DirectionalLight {
    /// Unit vector from the light towards its target.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Y)
    }
}

/// Snapshot of all light parameters for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightState {
    pub ambient: HemisphereLight,
    pub directional: DirectionalLight,
    /// Tone-mapping exposure
    pub exposure: f32,
}

/// Owns the [`LightState`] and keeps it in step with the sun.
#[derive(Debug, Clone)]
pub struct LightingRig {
    state: LightState,
    distance: f32,
}

impl LightingRig {
    #[must_use]
    pub fn new(config: &LightingConfig) -> Self {
        let hemi = &config.hemisphere;
        let dir = &config.directional;

        let mut shadow = ShadowFrustum::from_half_extent(dir.shadow.half_extent, dir.shadow.near, dir.shadow.far);
        shadow.bias = dir.shadow.bias;
        shadow.normal_bias = dir.shadow.normal_bias;
        shadow.map_size = dir.shadow.map_size;

        let position = Vec3::from_array(dir.initial_position);

        Self {
            state: LightState {
                ambient: HemisphereLight {
                    sky_color: hsl_array(hemi.sky_hsl),
                    ground_color: hsl_array(hemi.ground_hsl),
                    intensity: hemi.intensity,
                    position: Vec3::from_array(hemi.position),
                },
                directional: DirectionalLight {
                    color: hsl_array(dir.color_hsl),
                    intensity: dir.intensity,
                    position,
                    orientation: aim_at_origin(position).unwrap_or(Quat::IDENTITY),
                    target: Vec3::ZERO,
                    cast_shadows: dir.cast_shadows,
                    shadow,
                },
                exposure: 0.5,
            },
            distance: dir.distance,
        }
    }

    /// Places the directional light along the sun vector and re-aims it.
    ///
    /// Only position, orientation and exposure change; calling this twice
    /// with the same inputs leaves the state identical.
    pub fn sync(&mut self, sun: &SunSample, exposure: f32) {
        let light = &mut self.state.directional;
        light.position = sun.direction * self.distance;
        if let Some(orientation) = aim_at_origin(light.position) {
            light.orientation = orientation;
        }
        self.state.exposure = if exposure.is_nan() { self.state.exposure } else { exposure.clamp(0.0, 1.0) };
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &LightState {
        &self.state
    }

    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }
}

fn aim_at_origin(position: Vec3) -> Option<Quat> {
    // Straight overhead or underfoot the Y axis cannot serve as `up`.
    look_rotation(position, Vec3::ZERO, Vec3::Y).or_else(|| look_rotation(position, Vec3::ZERO, Vec3::Z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sky::{TimeOfDayState, compute_sun};

    #[test]
    fn overhead_sun_still_gets_an_orientation() {
        let mut rig = LightingRig::new(&LightingConfig::default());
        let state = TimeOfDayState {
            azimuth: 0.25,
            ..TimeOfDayState::default()
        };
        rig.sync(&compute_sun(&state), 0.5);
        let forward = rig.state().directional.orientation * Vec3::NEG_Z;
        assert!((forward - Vec3::NEG_Y).length() < 1e-4, "got {forward}");
    }
}
