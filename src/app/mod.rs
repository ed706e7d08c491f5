//! Host Integration
//!
//! - [`input`]: platform-agnostic pointer state
//! - [`events`]: host event types and the event queue feeding the scheduler
//! - [`winit`]: windowed host driving the scheduler from a winit event loop
//!   (`winit` feature)

pub mod events;
pub mod input;

#[cfg(feature = "winit")]
pub mod winit;

pub use events::{EventReceiver, EventSender, EventSource, HostEvent, NoEvents, OrbitInput, ViewportEvent, event_queue};
pub use input::{ButtonState, Input, MouseButton};
