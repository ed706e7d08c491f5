#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Skydome viewer core
//!
//! A real-time scene simulation with a procedural sun and sky: the
//! [`FrameScheduler`] advances the day cycle, keeps the lighting in step
//! with the sun, plays character animation and hands each frame to an
//! external [`RenderBackend`].
//!
//! ```rust,ignore
//! use skydome::{FrameScheduler, HeadlessBackend, ViewerConfig};
//!
//! let mut scheduler = FrameScheduler::new(ViewerConfig::stock());
//! scheduler.assemble();
//!
//! let mut backend = HeadlessBackend::new();
//! scheduler.start(&mut backend)?;
//! for _ in 0..600 {
//!     scheduler.tick(&mut backend)?;
//! }
//! ```

pub mod animation;
pub mod app;
pub mod assets;
pub mod config;
pub mod control;
pub mod errors;
pub mod lighting;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod sky;
pub mod utils;
pub mod viewport;

pub use animation::{AnimationClip, AnimationClipBinding, AnimationPlayer, Binder, LoopMode};
pub use app::{EventSender, EventSource, HostEvent, OrbitInput, ViewportEvent, event_queue};
pub use assets::{AssetLoader, AssetPayload, AssetSource, MemoryAssetSource, completion_channel};
pub use config::ViewerConfig;
pub use control::{ControlChange, ParamDescriptor};
pub use errors::{AssetError, Error, RenderError, Result};
pub use lighting::{LightState, LightingRig};
pub use render::{FrameSubmission, HeadlessBackend, RenderBackend, RenderSettings};
pub use scene::{Node, NodeHandle, Scene, SceneAssembler, SceneId};
pub use scheduler::{FrameReport, FrameScheduler, SchedulerState};
pub use sky::{SkyModel, SkyStrategy, SunSample, TimeOfDayParam, TimeOfDayState, compute_sun};
pub use utils::{Clock, FixedClock, OrbitControls, Timer};
pub use viewport::ViewportController;
