//! Winit Host
//!
//! Runs a [`FrameScheduler`] inside a winit event loop. Window events are
//! translated into [`ViewportEvent`]s and queued for the next tick; every
//! redraw runs exactly one tick.
//!
//! ```rust,ignore
//! use skydome::app::winit::App;
//!
//! let mut scheduler = FrameScheduler::new(ViewerConfig::stock());
//! scheduler.assemble();
//! App::new(scheduler, |window| MyBackend::new(window)).run()?;
//! ```

use std::sync::Arc;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
pub use winit::window::{Window, WindowId};

use crate::app::events::{EventSender, ViewportEvent, event_queue};
use crate::app::input::{ButtonState, MouseButton};
use crate::errors::{Error, Result};
use crate::render::RenderBackend;
use crate::scheduler::{FrameScheduler, SchedulerState};

/// Pixel scroll deltas are scaled to roughly match wheel lines.
const PIXEL_SCROLL_SCALE: f32 = 0.01;

/// Windowed application driving one scheduler.
///
/// The backend is created lazily from the window once the event loop
/// resumes.
pub struct App<B, F>
where
    B: RenderBackend,
    F: FnOnce(Arc<Window>) -> Result<B>,
{
    title: String,
    scheduler: FrameScheduler,
    events: EventSender,
    factory: Option<F>,
    backend: Option<B>,
    window: Option<Arc<Window>>,
    error: Option<Error>,
}

impl<B, F> App<B, F>
where
    B: RenderBackend,
    F: FnOnce(Arc<Window>) -> Result<B>,
{
    #[must_use]
    pub fn new(scheduler: FrameScheduler, factory: F) -> Self {
        let (events, receiver) = event_queue();
        Self {
            title: "Skydome Viewer".into(),
            scheduler: scheduler.with_events(receiver),
            events,
            factory: Some(factory),
            backend: None,
            window: None,
            error: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sender for queuing control changes from other threads.
    #[must_use]
    pub fn event_sender(&self) -> EventSender {
        self.events.clone()
    }

    /// Runs until the window closes or the scheduler stops.
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;

        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        log::error!("Fatal: {error}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let viewport = self.scheduler.config().viewport;
        let attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(viewport.width, viewport.height));

        let window = Arc::new(event_loop.create_window(attributes)?);
        self.window = Some(Arc::clone(&window));

        let Some(factory) = self.factory.take() else {
            return Ok(());
        };
        log::info!("Initializing renderer backend...");
        let mut backend = factory(Arc::clone(&window))?;
        self.scheduler.start(&mut backend)?;
        self.backend = Some(backend);
        Ok(())
    }
}

#[must_use]
pub fn translate_mouse_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        winit::event::MouseButton::Back => MouseButton::Other(3),
        winit::event::MouseButton::Forward => MouseButton::Other(4),
        winit::event::MouseButton::Other(id) => MouseButton::Other(id),
    }
}

#[must_use]
pub fn translate_element_state(state: ElementState) -> ButtonState {
    match state {
        ElementState::Pressed => ButtonState::Pressed,
        ElementState::Released => ButtonState::Released,
    }
}

/// Maps a window event onto a viewport event, if it is one.
#[must_use]
pub fn translate_window_event(event: &WindowEvent) -> Option<ViewportEvent> {
    Some(match event {
        WindowEvent::Resized(size) => ViewportEvent::Resized {
            width: size.width,
            height: size.height,
        },
        WindowEvent::CursorMoved { position, .. } => ViewportEvent::CursorMoved {
            x: position.x as f32,
            y: position.y as f32,
        },
        WindowEvent::MouseInput { state, button, .. } => ViewportEvent::MouseButton {
            button: translate_mouse_button(*button),
            state: translate_element_state(*state),
        },
        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => Vec2::new(*x, *y),
                MouseScrollDelta::PixelDelta(pos) => Vec2::new(pos.x as f32, pos.y as f32) * PIXEL_SCROLL_SCALE,
            };
            ViewportEvent::Scroll { delta }
        }
        _ => return None,
    })
}

impl<B, F> ApplicationHandler for App<B, F>
where
    B: RenderBackend,
    F: FnOnce(Arc<Window>) -> Result<B>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.scheduler.stop();
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let Some(backend) = self.backend.as_mut() else {
                    return;
                };
                if let Err(e) = self.scheduler.tick(backend) {
                    self.fail(event_loop, e);
                    return;
                }
                if self.scheduler.state() == SchedulerState::Stopped {
                    event_loop.exit();
                }
            }
            other => {
                if let Some(viewport_event) = translate_window_event(&other) {
                    self.events.send(viewport_event);
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
