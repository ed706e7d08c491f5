//! Error Types
//!
//! This module defines the error types used throughout the viewer core.
//!
//! # Overview
//!
//! The main error type [`Error`] groups failures by subsystem:
//! - [`AssetError`]: asset fetch or payload validation failures
//! - [`RenderError`]: renderer backend failures (fatal to the current run)
//! - Configuration errors (JSON and file IO)
//! - Scheduler lifecycle misuse
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`.
//!
//! ```rust,ignore
//! use skydome::errors::Result;
//!
//! fn load_config() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::scheduler::SchedulerState;

/// The main error type for the viewer core.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Subsystem Errors
    // ========================================================================
    /// Asset loading or attachment failed.
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// The renderer backend rejected a frame or lost its context.
    #[error(transparent)]
    Render(#[from] RenderError),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create the asset loader runtime.
    #[error("Asset runtime error: {0}")]
    Runtime(String),

    // ========================================================================
    // Scheduler Lifecycle Errors
    // ========================================================================
    /// An operation was attempted in a scheduler state that does not allow it.
    #[error("Cannot {operation} while the scheduler is {state:?}")]
    InvalidState {
        /// The rejected operation
        operation: &'static str,
        /// The state the scheduler was in
        state: SchedulerState,
    },

    /// The scheduler was started before static scene construction finished.
    #[error("Scene has not been assembled")]
    NotAssembled,

    // ========================================================================
    // Windowing Errors
    // ========================================================================
    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Window creation error (winit).
    #[cfg(feature = "winit")]
    #[error("Window creation error: {0}")]
    WindowCreation(#[from] winit::error::OsError),
}

/// Asset loading errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The asset source has nothing registered under this URI.
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The source failed while fetching the asset.
    #[error("Failed to fetch '{uri}': {reason}")]
    Fetch {
        /// URI of the failed request
        uri: String,
        /// Human-readable failure reason
        reason: String,
    },

    /// The delivered payload is structurally invalid.
    #[error("Invalid asset data: {0}")]
    InvalidData(String),

    /// The requested animation clip does not exist in the payload.
    #[error("Clip index out of bounds for '{uri}' (index: {index}, clips: {count})")]
    ClipIndexOutOfBounds {
        /// URI of the asset
        uri: String,
        /// The requested clip index
        index: usize,
        /// Number of clips in the payload
        count: usize,
    },
}

/// Renderer backend errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The backend could not draw the submitted frame.
    #[error("Frame submission failed: {0}")]
    SubmissionFailed(String),

    /// The graphics context is gone and must be recreated by the host.
    #[error("Graphics context lost")]
    ContextLost,
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
