//! Frame Scheduler
//!
//! The single driver of the viewer. Every other component is passive and is
//! invoked synchronously from [`FrameScheduler::tick`], in this order:
//!
//! 1. read the clock delta
//! 2. drain host events and completed asset loads
//! 3. advance the day cycle
//! 4. recompute the sun, sky uniforms and lighting
//! 5. advance animation
//! 6. update the camera and world matrices, then submit the frame
//! 7. record frame statistics
//!
//! Only a renderer failure aborts a tick; everything else degrades, logs and
//! carries on.

use glam::Vec3;

use crate::animation::AnimationPlayer;
use crate::app::events::{EventSource, HostEvent, NoEvents};
use crate::assets::{AssetLoader, CompletionReceiver, LoadCompletion};
use crate::config::ViewerConfig;
use crate::control::{self, ControlChange, ParamDescriptor};
use crate::errors::{AssetError, Error, Result};
use crate::lighting::{LightState, LightingRig};
use crate::render::{FrameSubmission, RenderBackend};
use crate::scene::assembler::SceneAssembler;
use crate::scene::scene::Scene;
use crate::sky::{SkyUniforms, SunSample, TimeOfDayParam, TimeOfDayState, compute_sun};
use crate::utils::frame_stats::FrameStats;
use crate::utils::time::{Clock, Timer};
use crate::viewport::ViewportController;

/// Lifecycle of a [`FrameScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Uninitialized,
    Running,
    Stopped,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub delta: f32,
    pub azimuth: f32,
    pub sun_direction: Vec3,
    /// Clip bindings whose pose was applied
    pub animated_bindings: usize,
    /// Completed assets attached this tick
    pub integrated_assets: usize,
    pub projection_updated: bool,
    /// `false` when the tick ended early because of a stop request
    pub submitted: bool,
    /// Present once per FPS window
    pub fps: Option<f32>,
}

pub struct FrameScheduler {
    state: SchedulerState,
    config: ViewerConfig,

    time_of_day: TimeOfDayState,
    sun: SunSample,
    sky_uniforms: SkyUniforms,

    lighting: LightingRig,
    animation: AnimationPlayer,
    viewport: ViewportController,
    assembler: SceneAssembler,

    clock: Box<dyn Clock>,
    events: Box<dyn EventSource>,
    completions: Option<CompletionReceiver>,

    stats: FrameStats,
    last_asset_error: Option<AssetError>,
}

impl FrameScheduler {
    /// Creates an unassembled scheduler driven by a wall-clock [`Timer`].
    #[must_use]
    pub fn new(config: ViewerConfig) -> Self {
        let config = config.sanitized();
        let time_of_day = config.time_of_day;
        let sun = compute_sun(&time_of_day);

        let mut lighting = LightingRig::new(&config.lighting);
        lighting.sync(&sun, time_of_day.exposure);

        let assembler = SceneAssembler::new();
        let sky_uniforms = assembler.sky().uniforms(&sun);
        let viewport = ViewportController::new(&config.camera, &config.orbit, config.viewport);

        Self {
            state: SchedulerState::Uninitialized,
            config,
            time_of_day,
            sun,
            sky_uniforms,
            lighting,
            animation: AnimationPlayer::new(),
            viewport,
            assembler,
            clock: Box::new(Timer::new()),
            events: Box::new(NoEvents),
            completions: None,
            stats: FrameStats::new(),
            last_asset_error: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn with_events(mut self, events: impl EventSource + 'static) -> Self {
        self.events = Box::new(events);
        self
    }

    /// Attaches the consumer end of the asset completion channel.
    #[must_use]
    pub fn with_completions(mut self, completions: CompletionReceiver) -> Self {
        self.completions = Some(completions);
        self
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Builds the static scene (sky, ground, helpers).
    pub fn assemble(&mut self) {
        self.refresh_sun();
        self.assembler
            .assemble(&self.config, self.lighting.state(), &self.sun, &mut self.animation);
        self.sky_uniforms = self.assembler.refresh_sky(&self.sun);
    }

    /// Issues loads for every configured character.
    pub fn request_assets(&self, loader: &AssetLoader) -> Vec<u64> {
        self.assembler.request_characters(&self.config, loader)
    }

    /// Configures the renderer and enters [`SchedulerState::Running`].
    pub fn start<R: RenderBackend + ?Sized>(&mut self, renderer: &mut R) -> Result<()> {
        if self.state != SchedulerState::Uninitialized {
            return Err(Error::InvalidState {
                operation: "start",
                state: self.state,
            });
        }
        if !self.assembler.is_assembled() {
            return Err(Error::NotAssembled);
        }

        renderer.configure(&self.config.render)?;
        let (width, height) = self.viewport.take_pending_resize().unwrap_or_else(|| self.viewport.size());
        let (pw, ph) = self.config.render.physical_size(width, height);
        renderer.resize(pw, ph);

        self.refresh_sun();
        self.state = SchedulerState::Running;
        log::info!("Frame scheduler started ({width}x{height}, {pw}x{ph} physical)");
        Ok(())
    }

    /// Stops the loop and tears the scene down. Stopping twice is a no-op.
    pub fn stop(&mut self) {
        if self.state == SchedulerState::Stopped {
            return;
        }
        self.assembler.teardown(&mut self.animation);
        self.state = SchedulerState::Stopped;
        log::info!("Frame scheduler stopped after {} frames", self.stats.frame_count);
    }

    // ========================================================================
    // Per-frame
    // ========================================================================

    /// Runs one frame. See the module docs for the step order.
    ///
    /// Returns an error when not running, or when the renderer rejects the
    /// frame; the latter also moves the scheduler to `Stopped`.
    pub fn tick<R: RenderBackend + ?Sized>(&mut self, renderer: &mut R) -> Result<FrameReport> {
        if self.state != SchedulerState::Running {
            return Err(Error::InvalidState {
                operation: "tick",
                state: self.state,
            });
        }

        let raw = self.clock.delta();
        let delta = if raw.is_finite() && raw >= 0.0 { raw } else { 0.0 };

        if !self.drain_events() {
            return Ok(self.report(delta, 0, 0, false, false, None));
        }
        let integrated = self.integrate_completions();

        if self.config.day_cycle.auto_advance {
            self.time_of_day.advance_azimuth(self.config.day_cycle.azimuth_step);
        }
        self.refresh_sun();

        let animated = self.animation.update(delta, self.assembler.scene_mut());

        self.viewport.tick(delta);
        self.assembler.scene_mut().update_world_matrices();

        if let Some((width, height)) = self.viewport.take_pending_resize() {
            let (pw, ph) = self.config.render.physical_size(width, height);
            renderer.resize(pw, ph);
        }
        let projection_updated = self.viewport.prepare_projection();

        let submission = FrameSubmission {
            frame: self.stats.frame_count + 1,
            time: self.stats.elapsed + f64::from(delta),
            scene: self.assembler.scene(),
            camera: self.viewport.camera(),
            lights: self.lighting.state(),
            sky: &self.sky_uniforms,
            projection_updated,
        };
        if let Err(e) = renderer.submit_frame(&submission) {
            log::error!("Renderer failed on frame {}: {e}", submission.frame);
            self.stop();
            return Err(e);
        }

        let fps = self.stats.record(delta);
        if let Some(fps) = fps {
            log::debug!("FPS: {fps:.1} ({:.2} ms)", self.stats.frame_time_ms());
        }

        Ok(self.report(delta, animated, integrated, projection_updated, true, fps))
    }

    fn report(
        &self,
        delta: f32,
        animated_bindings: usize,
        integrated_assets: usize,
        projection_updated: bool,
        submitted: bool,
        fps: Option<f32>,
    ) -> FrameReport {
        FrameReport {
            frame: self.stats.frame_count,
            delta,
            azimuth: self.time_of_day.azimuth,
            sun_direction: self.sun.direction,
            animated_bindings,
            integrated_assets,
            projection_updated,
            submitted,
            fps,
        }
    }

    /// Applies queued host events. Returns `false` if a stop was requested.
    fn drain_events(&mut self) -> bool {
        let mut pending = Vec::new();
        while let Some(event) = self.events.poll_event() {
            pending.push(event);
        }

        for event in pending {
            match event {
                HostEvent::Viewport(e) => self.viewport.handle_event(&e),
                HostEvent::Control(change) => {
                    control::apply(&mut self.time_of_day, change);
                }
                HostEvent::Stop => {
                    self.stop();
                    return false;
                }
            }
        }
        true
    }

    /// Attaches every completed load meant for the current scene.
    fn integrate_completions(&mut self) -> usize {
        let completed: Vec<LoadCompletion> = self
            .completions
            .as_ref()
            .map(|rx| rx.drain().collect())
            .unwrap_or_default();

        let mut integrated = 0;
        for LoadCompletion { request, result } in completed {
            if request.scene != self.assembler.scene_id() {
                log::warn!("Dropping asset '{}' loaded for a torn-down scene", request.uri);
                continue;
            }

            let outcome = result.map_err(Error::from).and_then(|payload| {
                self.assembler
                    .integrate_asset(&payload, &request.placement, &mut self.animation)
            });

            match outcome {
                Ok(_) => integrated += 1,
                Err(e) => {
                    log::warn!("Asset '{}' failed: {e}", request.uri);
                    self.last_asset_error = Some(match e {
                        Error::Asset(asset) => asset,
                        other => AssetError::InvalidData(other.to_string()),
                    });
                }
            }
        }
        integrated
    }

    fn refresh_sun(&mut self) {
        self.sun = compute_sun(&self.time_of_day);
        self.lighting.sync(&self.sun, self.time_of_day.exposure);
        self.sky_uniforms = self.assembler.refresh_sky(&self.sun);
        self.assembler.sync_helpers(self.lighting.state());
    }

    // ========================================================================
    // Control surface
    // ========================================================================

    /// Writes one time-of-day parameter and recomputes the sun immediately.
    ///
    /// Returns the value actually stored.
    pub fn set_param(&mut self, param: TimeOfDayParam, value: f32) -> f32 {
        let stored = control::apply(&mut self.time_of_day, ControlChange::new(param, value));
        self.refresh_sun();
        stored
    }

    #[must_use]
    pub fn control_panel(&self) -> Vec<ParamDescriptor> {
        control::describe(&self.time_of_day)
    }

    /// Most recent asset failure, if any.
    #[must_use]
    pub fn last_asset_error(&self) -> Option<&AssetError> {
        self.last_asset_error.as_ref()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[must_use]
    pub fn time_of_day(&self) -> &TimeOfDayState {
        &self.time_of_day
    }

    #[must_use]
    pub fn sun(&self) -> &SunSample {
        &self.sun
    }

    #[must_use]
    pub fn sky_uniforms(&self) -> &SkyUniforms {
        &self.sky_uniforms
    }

    #[must_use]
    pub fn lights(&self) -> &LightState {
        self.lighting.state()
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        self.assembler.scene()
    }

    #[must_use]
    pub fn assembler(&self) -> &SceneAssembler {
        &self.assembler
    }

    #[must_use]
    pub fn animation(&self) -> &AnimationPlayer {
        &self.animation
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    #[must_use]
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }
}
