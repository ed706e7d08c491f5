use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::app::events::OrbitInput;
use crate::config::OrbitConfig;
use crate::scene::transform::Transform;

/// Keeps the polar angle off the poles, where `look_at` with +Y up degenerates.
const POLE_EPS: f32 = 0.0001;
/// Radius used as the zoom base when zooming out from zero distance.
const MIN_ZOOM_BASE: f32 = 0.001;

/// Spherical orbit camera around `center`.
///
/// `theta` is the azimuth around +Y, `phi` the polar angle from +Y. Distance
/// and polar angle are clamped to their bounds after every change.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    pub center: Vec3,
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,

    rotate_delta: Vec2,
}

impl OrbitControls {
    /// Builds controls whose initial state reproduces `eye` looking at `center`.
    #[must_use]
    pub fn new(center: Vec3, eye: Vec3, config: &OrbitConfig) -> Self {
        let offset = eye - center;
        let radius = offset.length();
        let (theta, phi) = if radius > f32::EPSILON {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, PI / 2.0)
        };

        let mut controls = Self {
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            pan_speed: config.pan_speed,
            damping_factor: config.damping_factor,
            enable_damping: config.enable_damping,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            min_polar_angle: config.min_polar_angle,
            max_polar_angle: config.max_polar_angle,

            center,
            radius,
            theta,
            phi,

            rotate_delta: Vec2::ZERO,
        };
        controls.clamp_state();
        controls
    }

    /// Applies one batch of user input.
    ///
    /// Rotation is queued and integrated by [`update`](Self::update); zoom
    /// and pan take effect immediately. `fov` (radians) and `screen_height`
    /// convert pan pixels into world units at the current distance.
    pub fn apply_input(&mut self, input: &OrbitInput, fov: f32, screen_height: f32) {
        if input.rotate.is_finite() {
            self.rotate_delta += input.rotate * self.rotate_speed;
        }

        if input.zoom.is_finite() && input.zoom != 0.0 {
            let scale = (1.0 - self.zoom_speed).powf(input.zoom.abs());
            if input.zoom > 0.0 {
                self.radius *= scale;
            } else if scale > 0.0 {
                self.radius = self.radius.max(MIN_ZOOM_BASE) / scale;
            }
        }

        if input.pan.is_finite() && input.pan != Vec2::ZERO {
            let target_world_height = 2.0 * self.radius * (fov / 2.0).tan();
            let pixels_to_world = target_world_height / screen_height.max(1.0);

            let forward = -self.unit_offset();
            let right = forward.cross(Vec3::Y).normalize_or_zero();
            let up = right.cross(forward).normalize_or_zero();

            self.center += (right * -input.pan.x + up * input.pan.y) * pixels_to_world * self.pan_speed;
        }

        self.clamp_state();
    }

    /// Integrates queued rotation; with damping the remainder decays over time.
    pub fn update(&mut self, dt: f32) {
        if self.enable_damping {
            let target_fps = 60.0;
            let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
            let retention = (1.0 - self.damping_factor).powf(dt * target_fps);

            let delta_apply = self.rotate_delta * (1.0 - retention);
            self.theta += delta_apply.x;
            self.phi += delta_apply.y;

            self.rotate_delta *= retention;
        } else {
            self.theta += self.rotate_delta.x;
            self.phi += self.rotate_delta.y;
            self.rotate_delta = Vec2::ZERO;
        }

        self.clamp_state();
    }

    /// Forces distance and polar angle back inside their bounds.
    pub fn clamp_state(&mut self) {
        let min_phi = self.min_polar_angle.max(POLE_EPS);
        let max_phi = self.max_polar_angle.min(PI - POLE_EPS).max(min_phi);
        self.phi = self.phi.clamp(min_phi, max_phi);
        self.radius = self.radius.clamp(self.min_distance, self.max_distance);
        self.theta = self.theta.rem_euclid(2.0 * PI);
    }

    /// Places `transform` on the orbit and aims it at the center.
    pub fn apply_to(&self, transform: &mut Transform) {
        transform.position = self.center + self.unit_offset() * self.radius;
        transform.look_at(self.center, Vec3::Y);
    }

    fn unit_offset(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_from_the_eye_position() {
        let controls = OrbitControls::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 250.0), &OrbitConfig::default());
        assert!((controls.radius - 250.0).abs() < 1e-4);
        assert!((controls.phi - PI / 2.0).abs() < 1e-4);
        assert!(controls.theta.abs() < 1e-6);
    }

    #[test]
    fn zoom_out_from_zero_distance_moves_away() {
        let config = OrbitConfig::default();
        let mut controls = OrbitControls::new(Vec3::ZERO, Vec3::ZERO, &config);
        assert_eq!(controls.radius, 0.0);
        controls.apply_input(
            &OrbitInput {
                zoom: -1.0,
                ..OrbitInput::default()
            },
            1.0,
            720.0,
        );
        assert!(controls.radius > 0.0);
    }
}
