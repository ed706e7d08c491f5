//! Sun & Sky Model Tests
//!
//! Tests for:
//! - Sun direction formula and unit length
//! - TimeOfDayState clamping and azimuth wrapping
//! - Modular azimuth accumulation
//! - Gradient vs atmospheric sky strategies

use glam::Vec3;

use skydome::scene::geometry::{GeometryDesc, MaterialDesc, Side};
use skydome::sky::{
    AtmosphericSky, GradientSky, GradientSkyUniforms, SkyModel, SkyStrategy, SkyUniforms, TimeOfDayParam,
    TimeOfDayState, compute_sun, sun_direction, wrap_unit,
};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

// ============================================================================
// Sun Direction
// ============================================================================

#[test]
fn default_state_points_along_negative_x() {
    let sun = compute_sun(&TimeOfDayState::default());
    assert!(vec3_approx(sun.direction, Vec3::new(-1.0, 0.0, 0.0)), "got {}", sun.direction);
}

#[test]
fn sun_direction_is_unit_for_a_grid_of_inputs() {
    for i in 0..=20 {
        for j in 0..=20 {
            let inclination = i as f32 / 20.0;
            let azimuth = j as f32 / 20.0;
            let dir = sun_direction(inclination, azimuth);
            assert!(
                (dir.length() - 1.0).abs() < 1e-5,
                "inclination {inclination}, azimuth {azimuth}: |{dir}| = {}",
                dir.length()
            );
        }
    }
}

#[test]
fn half_azimuth_points_along_positive_x() {
    let dir = sun_direction(0.0, 0.5);
    assert!(vec3_approx(dir, Vec3::X), "got {dir}");
}

#[test]
fn sun_is_continuous_across_the_azimuth_wrap() {
    let before = sun_direction(0.3, 0.99999);
    let after = sun_direction(0.3, 0.0);
    assert!((before - after).length() < 1e-3);
}

#[test]
fn atmosphere_params_pass_through_state() {
    let state = TimeOfDayState {
        turbidity: 4.0,
        rayleigh: 1.5,
        mie_coefficient: 0.02,
        mie_directional_g: 0.9,
        ..TimeOfDayState::default()
    };
    let sun = compute_sun(&state);
    assert_eq!(sun.atmosphere.turbidity, 4.0);
    assert_eq!(sun.atmosphere.rayleigh, 1.5);
    assert_eq!(sun.atmosphere.mie_coefficient, 0.02);
    assert_eq!(sun.atmosphere.mie_directional_g, 0.9);
    assert_eq!(sun.atmosphere.sun_position, sun.direction);
}

// ============================================================================
// TimeOfDayState Writes
// ============================================================================

#[test]
fn set_clamps_ranged_fields() {
    let mut state = TimeOfDayState::default();
    assert_eq!(state.set(TimeOfDayParam::Exposure, 1.5), 1.0);
    assert_eq!(state.set(TimeOfDayParam::Inclination, -0.2), 0.0);
    assert_eq!(state.set(TimeOfDayParam::Turbidity, -3.0), 0.0);
    assert_eq!(state.set(TimeOfDayParam::Rayleigh, 1000.0), 1000.0);
}

#[test]
fn set_wraps_azimuth() {
    let mut state = TimeOfDayState::default();
    assert!(approx(state.set(TimeOfDayParam::Azimuth, 1.25), 0.25));
    assert!(approx(state.set(TimeOfDayParam::Azimuth, -0.25), 0.75));
    assert_eq!(state.set(TimeOfDayParam::Azimuth, 1.0), 0.0);
}

#[test]
fn set_ignores_nan_and_infinite_azimuth() {
    let mut state = TimeOfDayState::default();
    state.set(TimeOfDayParam::Azimuth, 0.4);
    assert!(approx(state.set(TimeOfDayParam::Azimuth, f32::NAN), 0.4));
    assert!(approx(state.set(TimeOfDayParam::Azimuth, f32::INFINITY), 0.4));
    assert_eq!(state.set(TimeOfDayParam::Turbidity, f32::NAN), 10.0);
}

#[test]
fn azimuth_accumulates_modulo_one() {
    let mut state = TimeOfDayState::default();
    for _ in 0..25 {
        state.advance_azimuth(0.1);
        assert!((0.0..1.0).contains(&state.azimuth));
    }
    assert!((state.azimuth - 0.5).abs() < 1e-4, "got {}", state.azimuth);
}

#[test]
fn get_returns_what_set_stored() {
    let mut state = TimeOfDayState::default();
    for param in TimeOfDayParam::ALL {
        let stored = state.set(param, 0.3);
        assert_eq!(state.get(param), stored, "{}", param.name());
    }
}

// ============================================================================
// Sky Strategies
// ============================================================================

fn gradient() -> SkyModel {
    SkyModel::Gradient(GradientSky {
        radius: 4000.0,
        width_segments: 32,
        height_segments: 15,
        uniforms: GradientSkyUniforms {
            top_color: Vec3::new(0.2, 0.52, 1.0),
            offset: 33.0,
            bottom_color: Vec3::ONE,
            exponent: 0.6,
        },
    })
}

#[test]
fn gradient_sky_ignores_the_sun() {
    let sky = gradient();
    let a = sky.uniforms(&compute_sun(&TimeOfDayState::default()));
    let b = sky.uniforms(&compute_sun(&TimeOfDayState {
        azimuth: 0.3,
        ..TimeOfDayState::default()
    }));
    assert_eq!(a, b);
    assert!(!sky.is_dynamic());
    assert_eq!(sky.strategy(), SkyStrategy::Gradient);
}

#[test]
fn gradient_sky_mesh_is_a_back_faced_sphere() {
    let (mesh, scale) = gradient().mesh(&compute_sun(&TimeOfDayState::default()));
    assert_eq!(scale, 1.0);
    assert_eq!(mesh.side, Side::Back);
    assert!(matches!(mesh.geometry, GeometryDesc::Sphere { radius, .. } if radius == 4000.0));
    assert!(matches!(mesh.material, MaterialDesc::SkyGradient(_)));
}

#[test]
fn atmospheric_sky_tracks_the_sun() {
    let sky = SkyModel::Atmospheric(AtmosphericSky { scale: 450_000.0 });
    let sun = compute_sun(&TimeOfDayState {
        azimuth: 0.3,
        ..TimeOfDayState::default()
    });
    match sky.uniforms(&sun) {
        SkyUniforms::Atmosphere(params) => assert_eq!(params.sun_position, sun.direction),
        SkyUniforms::Gradient(_) => panic!("expected atmosphere uniforms"),
    }
    let (mesh, scale) = sky.mesh(&sun);
    assert_eq!(scale, 450_000.0);
    assert!(matches!(mesh.geometry, GeometryDesc::Cube { .. }));
}

#[test]
fn wrap_unit_never_returns_one() {
    for v in [-2.0, -1.0, -1e-9, 0.0, 1.0, 2.0, 3.999_999_9] {
        let w = wrap_unit(v);
        assert!((0.0..1.0).contains(&w), "{v} -> {w}");
    }
}
