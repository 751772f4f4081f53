//! Window management subsystem
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     GameLoop / Game hooks       │
//! └─────────────┬───────────────────┘
//!               │ Uses
//!        ┌──────▼──────┐
//!        │ GameWindow  │ ← Public API (handle.rs)
//!        └──────┬──────┘
//!               │ Uses
//!      ┌────────▼────────┐
//!      │ WindowBackend   │ ← Internal trait (backend.rs)
//!      └────────┬────────┘
//!               │ Implemented by
//!   ┌───────────▼───────────┐
//!   │ GlfwBackend           │ ← GLFW window + GL context (glfw_backend.rs)
//!   │ HeadlessBackend       │ ← Scripted test double (tests only)
//!   └───────────────────────┘
//! ```
//!
//! Every native window shares one GLFW library instance per thread
//! ([`GlfwLibrary`]); it is initialized by the first window and terminated
//! when the last one is dropped.

pub(crate) mod backend;
pub mod config;
pub(crate) mod glfw_backend;
pub mod handle;
pub mod library;

#[cfg(test)]
pub(crate) mod headless;

pub use config::WindowConfig;
pub use handle::GameWindow;
pub use library::{GlfwLibrary, SharedInstance};

use thiserror::Error;

use crate::config::ConfigError;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// GLFW could not be initialized
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    /// GLFW refused to create the window or its context
    #[error("Window creation failed: {title} ({width}x{height}, OpenGL {major}.{minor})")]
    CreationFailed {
        /// Requested title
        title: String,
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Requested GL major version
        major: u32,
        /// Requested GL minor version
        minor: u32,
    },

    /// The configuration was rejected before any GLFW call
    #[error("Invalid window configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The operation is not allowed in the window's current lifecycle state
    #[error("Window is {actual:?}, expected {expected:?}")]
    InvalidState {
        /// State the operation requires
        expected: WindowState,
        /// State the window is in
        actual: WindowState,
    },
}

/// Result alias for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// Lifecycle of a [`GameWindow`]
///
/// `Created → Loaded → Running ⇄ Closing → Closed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Window and GL context exist, no hook has run yet
    Created,
    /// `load` has completed
    Loaded,
    /// The frame loop is active
    Running,
    /// A close was requested and the `closing` hook is deciding
    Closing,
    /// The loop has ended; the window can no longer be run
    Closed,
}

impl WindowState {
    /// Whether moving from `self` to `next` is a legal lifecycle step
    pub fn can_transition_to(self, next: Self) -> bool {
        use WindowState::{Closed, Closing, Created, Loaded, Running};
        matches!(
            (self, next),
            (Created, Loaded)
                | (Loaded, Running)
                | (Running, Closing)
                | (Closing, Running | Closed)
                // Hook failures end the loop from wherever it was
                | (Created | Loaded | Running, Closed)
        )
    }
}
