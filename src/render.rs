//! Renderer Seam
//!
//! The core never talks to a GPU. A host supplies a [`RenderBackend`], which
//! receives the render settings once, every accepted viewport resize, and one
//! [`FrameSubmission`] per tick.

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::lighting::LightState;
use crate::scene::camera::Camera;
use crate::scene::scene::Scene;
use crate::sky::SkyUniforms;

/// Color encoding of the final output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputEncoding {
    #[default]
    Srgb,
    Linear,
}

/// Backend configuration, handed over once on start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Physical pixels per logical viewport pixel
    pub pixel_ratio: f32,
    pub antialias: bool,
    pub shadows: bool,
    pub output_encoding: OutputEncoding,
    pub vsync: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            pixel_ratio: 2.0,
            antialias: true,
            shadows: true,
            output_encoding: OutputEncoding::Srgb,
            vsync: true,
        }
    }
}

impl RenderSettings {
    /// Converts a logical size to the physical size the backend renders at.
    #[must_use]
    pub fn physical_size(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = |v: u32| ((v as f32 * self.pixel_ratio).round() as u32).max(1);
        (scale(width), scale(height))
    }
}

/// Everything the backend needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameSubmission<'a> {
    pub frame: u64,
    /// Seconds since the scheduler started
    pub time: f64,
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    pub lights: &'a LightState,
    pub sky: &'a SkyUniforms,
    /// Whether the projection matrix changed since the previous submission
    pub projection_updated: bool,
}

/// Interface to an external renderer.
pub trait RenderBackend {
    /// Receives the render settings before the first frame.
    fn configure(&mut self, settings: &RenderSettings) -> Result<()> {
        let _ = settings;
        Ok(())
    }

    /// Resizes the drawing surface, in physical pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Draws one frame. An error here stops the scheduler.
    fn submit_frame(&mut self, submission: &FrameSubmission<'_>) -> Result<()>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn configure(&mut self, settings: &RenderSettings) -> Result<()> {
        (**self).configure(settings)
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height);
    }

    fn submit_frame(&mut self, submission: &FrameSubmission<'_>) -> Result<()> {
        (**self).submit_frame(submission)
    }
}

/// Backend that draws nothing and only logs what it would draw.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    pub settings: Option<RenderSettings>,
    pub size: (u32, u32),
    pub frames: u64,
}

impl HeadlessBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for HeadlessBackend {
    fn configure(&mut self, settings: &RenderSettings) -> Result<()> {
        log::info!("Headless backend configured: {settings:?}");
        self.settings = Some(*settings);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        log::debug!("Headless surface resized to {width}x{height}");
        self.size = (width, height);
    }

    fn submit_frame(&mut self, submission: &FrameSubmission<'_>) -> Result<()> {
        self.frames += 1;
        log::trace!(
            "Frame {}: {} drawables, sun at {}",
            submission.frame,
            submission.scene.renderables().count(),
            submission.lights.directional.position
        );
        Ok(())
    }
}
