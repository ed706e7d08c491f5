//! Viewport Controller Tests
//!
//! Tests for:
//! - Resize handling (aspect, pending renderer resize, zero-size events)
//! - Lazy projection rebuild
//! - Orbit distance and polar angle clamping
//! - Pointer drag and scroll gestures

use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};

use skydome::app::{ButtonState, MouseButton};
use skydome::config::{CameraConfig, OrbitConfig, ViewportSize};
use skydome::{OrbitInput, ViewportController, ViewportEvent};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn controller() -> ViewportController {
    ViewportController::new(
        &CameraConfig::default(),
        &OrbitConfig::default(),
        ViewportSize {
            width: 1280,
            height: 720,
        },
    )
}

fn zoom(amount: f32) -> OrbitInput {
    OrbitInput {
        zoom: amount,
        ..OrbitInput::default()
    }
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn zero_resize_keeps_the_previous_aspect() {
    let mut viewport = controller();
    let before = viewport.aspect();
    assert!(approx(before, 1280.0 / 720.0));

    assert!(!viewport.on_resize(0, 0));
    assert_eq!(viewport.aspect(), before);
    assert_eq!(viewport.size(), (1280, 720));

    viewport.handle_event(&ViewportEvent::Resized { width: 0, height: 400 });
    assert_eq!(viewport.aspect(), before);
}

#[test]
fn resize_updates_aspect_and_marks_projection() {
    let mut viewport = controller();
    assert_eq!(viewport.take_pending_resize(), Some((1280, 720)));
    assert!(!viewport.prepare_projection());

    assert!(viewport.on_resize(1000, 500));
    assert!(approx(viewport.aspect(), 2.0));
    assert_eq!(viewport.take_pending_resize(), Some((1000, 500)));
    assert_eq!(viewport.take_pending_resize(), None);

    assert!(viewport.prepare_projection());
    assert!(!viewport.prepare_projection());
}

#[test]
fn ignored_resize_queues_nothing() {
    let mut viewport = controller();
    viewport.take_pending_resize();
    viewport.on_resize(0, 0);
    assert_eq!(viewport.take_pending_resize(), None);
    assert!(!viewport.prepare_projection());
}

// ============================================================================
// Orbit
// ============================================================================

#[test]
fn initial_camera_matches_configuration() {
    let viewport = controller();
    assert!(approx(viewport.distance(), 250.0));
    assert!((viewport.position() - Vec3::new(0.0, 0.0, 250.0)).length() < 1e-2);
    assert!(approx(viewport.camera().fov, 120.0_f32.to_radians()));
}

#[test]
fn distance_is_pinned_to_bounds() {
    let config = OrbitConfig {
        min_distance: 10.0,
        max_distance: 400.0,
        ..OrbitConfig::default()
    };
    let mut viewport = ViewportController::new(&CameraConfig::default(), &config, ViewportSize::default());

    viewport.apply_user_input(&zoom(-500.0));
    assert!(approx(viewport.distance(), 400.0));

    viewport.apply_user_input(&zoom(10_000.0));
    assert!(approx(viewport.distance(), 10.0));

    for step in [-3.0, 7.5, -40.0, 0.25, 120.0] {
        viewport.apply_user_input(&zoom(step));
        assert!((10.0..=400.0).contains(&viewport.distance()));
    }
}

#[test]
fn polar_angle_stays_above_the_ground() {
    let mut viewport = controller();

    viewport.apply_user_input(&OrbitInput {
        rotate: Vec2::new(0.0, 10.0),
        ..OrbitInput::default()
    });
    viewport.tick(1.0 / 60.0);
    assert!(viewport.polar_angle() <= FRAC_PI_2 + 1e-6);

    viewport.apply_user_input(&OrbitInput {
        rotate: Vec2::new(0.0, -10.0),
        ..OrbitInput::default()
    });
    viewport.tick(1.0 / 60.0);
    assert!(viewport.polar_angle() > 0.0);
    assert!(viewport.position().y > 0.0);
}

#[test]
fn camera_stays_on_the_orbit_sphere() {
    let mut viewport = controller();
    viewport.apply_user_input(&OrbitInput {
        rotate: Vec2::new(1.3, -0.4),
        ..OrbitInput::default()
    });
    viewport.tick(1.0 / 60.0);
    let center = viewport.orbit().center;
    assert!(((viewport.position() - center).length() - viewport.distance()).abs() < 1e-2);
}

// ============================================================================
// Pointer Gestures
// ============================================================================

#[test]
fn left_drag_rotates_around_the_target() {
    let mut viewport = controller();
    let theta_before = viewport.orbit().theta;

    viewport.handle_event(&ViewportEvent::CursorMoved { x: 100.0, y: 100.0 });
    viewport.handle_event(&ViewportEvent::MouseButton {
        button: MouseButton::Left,
        state: ButtonState::Pressed,
    });
    viewport.handle_event(&ViewportEvent::CursorMoved { x: 160.0, y: 100.0 });
    viewport.tick(1.0 / 60.0);

    assert!(!approx(viewport.orbit().theta, theta_before));
    assert!(approx(viewport.distance(), 250.0));
}

#[test]
fn released_button_does_not_rotate() {
    let mut viewport = controller();
    let theta_before = viewport.orbit().theta;

    viewport.handle_event(&ViewportEvent::CursorMoved { x: 100.0, y: 100.0 });
    viewport.handle_event(&ViewportEvent::CursorMoved { x: 300.0, y: 50.0 });
    viewport.tick(1.0 / 60.0);

    assert!(approx(viewport.orbit().theta, theta_before));
    assert_eq!(viewport.pointer(), Some(Vec2::new(300.0, 50.0)));
}

#[test]
fn scroll_zooms_in() {
    let mut viewport = controller();
    viewport.handle_event(&ViewportEvent::Scroll {
        delta: Vec2::new(0.0, 2.0),
    });
    viewport.tick(1.0 / 60.0);
    assert!(viewport.distance() < 250.0);

    // The scroll delta is consumed by the tick.
    let after = viewport.distance();
    viewport.tick(1.0 / 60.0);
    assert!(approx(viewport.distance(), after));
}
