//! Host Events
//!
//! Everything that reaches the frame scheduler from outside the tick goes
//! through an [`EventSource`]. Other threads push into an [`EventSender`];
//! the scheduler drains the matching receiver at the start of each tick.

use glam::Vec2;

use crate::app::input::{ButtonState, MouseButton};
use crate::control::ControlChange;

/// Direct orbit manipulation, already converted from pointer gestures.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrbitInput {
    /// Azimuthal and polar angle deltas in radians
    pub rotate: Vec2,
    /// Zoom steps; positive moves closer
    pub zoom: f32,
    /// Pan in screen pixels
    pub pan: Vec2,
}

impl OrbitInput {
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.rotate == Vec2::ZERO && self.zoom == 0.0 && self.pan == Vec2::ZERO
    }
}

/// Viewport and pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEvent {
    Resized { width: u32, height: u32 },
    CursorMoved { x: f32, y: f32 },
    MouseButton { button: MouseButton, state: ButtonState },
    /// Scroll in wheel lines
    Scroll { delta: Vec2 },
    Orbit(OrbitInput),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Viewport(ViewportEvent),
    /// Queued control-surface write
    Control(ControlChange),
    /// Stop the scheduler and tear the scene down
    Stop,
}

impl From<ViewportEvent> for HostEvent {
    fn from(event: ViewportEvent) -> Self {
        Self::Viewport(event)
    }
}

impl From<ControlChange> for HostEvent {
    fn from(change: ControlChange) -> Self {
        Self::Control(change)
    }
}

/// Supplies host events to the scheduler without blocking.
pub trait EventSource {
    fn poll_event(&mut self) -> Option<HostEvent>;
}

/// Event source that never yields anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEvents;

impl EventSource for NoEvents {
    fn poll_event(&mut self) -> Option<HostEvent> {
        None
    }
}

/// Writer half of the host event queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: flume::Sender<HostEvent>,
}

impl EventSender {
    /// Queues an event. Returns `false` when the scheduler is gone.
    pub fn send(&self, event: impl Into<HostEvent>) -> bool {
        self.tx.send(event.into()).is_ok()
    }
}

/// Reader half of the host event queue.
#[derive(Debug)]
pub struct EventReceiver {
    rx: flume::Receiver<HostEvent>,
}

impl EventSource for EventReceiver {
    fn poll_event(&mut self) -> Option<HostEvent> {
        self.rx.try_recv().ok()
    }
}

/// Creates an unbounded host event queue.
#[must_use]
pub fn event_queue() -> (EventSender, EventReceiver) {
    let (tx, rx) = flume::unbounded();
    (EventSender { tx }, EventReceiver { rx })
}
