//! Viewport Controller
//!
//! Owns the camera, its orbit controls and the pointer state. Resize events
//! change the aspect ratio and mark the projection dirty; the projection is
//! rebuilt once, right before the frame that needs it.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::app::events::{OrbitInput, ViewportEvent};
use crate::app::input::{Input, MouseButton};
use crate::config::{CameraConfig, OrbitConfig, ViewportSize};
use crate::scene::camera::Camera;
use crate::scene::transform::Transform;
use crate::utils::orbit_control::OrbitControls;

pub struct ViewportController {
    camera: Camera,
    transform: Transform,
    orbit: OrbitControls,
    input: Input,

    width: u32,
    height: u32,
    pending_resize: Option<(u32, u32)>,
}

impl ViewportController {
    #[must_use]
    pub fn new(camera: &CameraConfig, orbit: &OrbitConfig, size: ViewportSize) -> Self {
        let width = size.width.max(1);
        let height = size.height.max(1);

        let cam = Camera::new_perspective(camera.fov_degrees, width as f32 / height as f32, camera.near, camera.far);

        let eye = Vec3::from_array(camera.position);
        let target = Vec3::from_array(camera.target);
        let orbit = OrbitControls::new(target, eye, orbit);

        let mut controller = Self {
            camera: cam,
            transform: Transform::new(),
            orbit,
            input: Input::new(),
            width,
            height,
            pending_resize: Some((width, height)),
        };
        controller.sync_camera();
        controller
    }

    /// Records a new viewport size.
    ///
    /// Zero-sized viewports (minimised windows) are ignored and the previous
    /// aspect is kept. Returns whether the size was accepted.
    pub fn on_resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize to {width}x{height}");
            return false;
        }
        self.width = width;
        self.height = height;
        self.camera.set_aspect(width as f32 / height as f32);
        self.pending_resize = Some((width, height));
        log::debug!("Viewport resized to {width}x{height}");
        true
    }

    pub fn handle_event(&mut self, event: &ViewportEvent) {
        match *event {
            ViewportEvent::Resized { width, height } => {
                self.on_resize(width, height);
            }
            ViewportEvent::CursorMoved { x, y } => self.input.inject_mouse_position(x, y),
            ViewportEvent::MouseButton { button, state } => self.input.inject_mouse_button(button, state),
            ViewportEvent::Scroll { delta } => self.input.inject_scroll(delta.x, delta.y),
            ViewportEvent::Orbit(input) => self.apply_user_input(&input),
        }
    }

    /// Mutates orbit angles, distance and pivot, with clamping.
    pub fn apply_user_input(&mut self, input: &OrbitInput) {
        self.orbit.apply_input(input, self.camera.fov, self.height as f32);
    }

    /// Converts accumulated pointer input into orbit motion, integrates
    /// damping and refreshes the camera view.
    pub fn tick(&mut self, dt: f32) {
        let mut gesture = OrbitInput::default();
        let delta = self.input.mouse_delta();

        if self.input.get_mouse_button(MouseButton::Left) {
            let rotate_per_pixel = 2.0 * PI / self.height as f32;
            gesture.rotate = -delta * rotate_per_pixel;
        }
        if self.input.get_mouse_button(MouseButton::Right) {
            gesture.pan = delta;
        }
        gesture.zoom = self.input.scroll_delta().y;

        if !gesture.is_zero() {
            self.apply_user_input(&gesture);
        }
        self.input.end_frame();

        self.orbit.update(dt);
        self.sync_camera();
    }

    fn sync_camera(&mut self) {
        self.orbit.apply_to(&mut self.transform);
        self.transform.update_local_matrix();
        let local = *self.transform.local_matrix();
        self.transform.set_world_matrix(local);
        self.camera.update_view(&local);
    }

    /// Rebuilds the projection matrix if it is dirty. Returns whether it was.
    pub fn prepare_projection(&mut self) -> bool {
        if self.camera.is_projection_dirty() {
            self.camera.update_projection_matrix();
            true
        } else {
            false
        }
    }

    /// Size to forward to the renderer, once per accepted resize.
    pub fn take_pending_resize(&mut self) -> Option<(u32, u32)> {
        self.pending_resize.take()
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[must_use]
    pub fn orbit(&self) -> &OrbitControls {
        &self.orbit
    }

    pub fn orbit_mut(&mut self) -> &mut OrbitControls {
        &mut self.orbit
    }

    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.camera.aspect
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn distance(&self) -> f32 {
        self.orbit.radius
    }

    #[must_use]
    pub fn polar_angle(&self) -> f32 {
        self.orbit.phi
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    #[must_use]
    pub fn pointer(&self) -> Option<Vec2> {
        self.input.mouse_position()
    }
}
