//! High-level window handle for applications

use glfw::WindowEvent;

use super::backend::WindowBackend;
use super::glfw_backend::GlfwBackend;
use super::{WindowConfig, WindowError, WindowResult, WindowState};

/// One native window with its OpenGL context
///
/// Created by [`GameWindow::open`] and driven by
/// [`GameLoop`](crate::GameLoop). Dropping it destroys the window; the GLFW
/// library goes away with the last window on the thread.
pub struct GameWindow {
    backend: Box<dyn WindowBackend>,
    config: WindowConfig,
    state: WindowState,
}

impl GameWindow {
    /// Open a window and make its GL context current on this thread
    ///
    /// The configuration is validated before GLFW is touched.
    pub fn open(config: WindowConfig) -> WindowResult<Self> {
        config.validate()?;
        let backend = GlfwBackend::new(&config)?;
        Ok(Self::from_backend(Box::new(backend), config))
    }

    pub(crate) fn from_backend(backend: Box<dyn WindowBackend>, config: WindowConfig) -> Self {
        Self {
            backend,
            config,
            state: WindowState::Created,
        }
    }

    /// Configuration the window was opened with
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> WindowState {
        self.state
    }

    /// Move to `next`, rejecting steps the lifecycle does not allow
    pub(crate) fn transition(&mut self, next: WindowState) -> WindowResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(WindowError::InvalidState {
                expected: next,
                actual: self.state,
            });
        }
        log::trace!("Window state {:?} -> {:?}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Check if the window should close
    pub fn should_close(&self) -> bool {
        self.backend.should_close()
    }

    /// Ask the window to close; the loop consults the `closing` hook first
    pub fn request_close(&mut self) {
        self.backend.set_should_close(true);
    }

    /// Withdraw a pending close request
    pub fn cancel_close(&mut self) {
        self.backend.set_should_close(false);
    }

    /// Process OS events and return those addressed to this window
    pub fn poll_events(&mut self) -> Vec<(f64, WindowEvent)> {
        self.backend.poll_events()
    }

    /// Present the back buffer
    pub fn swap_buffers(&mut self) {
        self.backend.swap_buffers();
    }

    /// Client area size in screen coordinates
    pub fn size(&self) -> (u32, u32) {
        self.backend.size()
    }

    /// Framebuffer size in pixels (differs from `size` on HiDPI displays)
    pub fn framebuffer_size(&self) -> (u32, u32) {
        self.backend.framebuffer_size()
    }

    /// Current window title
    pub fn title(&self) -> String {
        self.backend.title()
    }

    /// Set the window title
    pub fn set_title(&mut self, title: &str) {
        self.backend.set_title(title);
    }

    /// Window clock in seconds
    pub fn time(&self) -> f64 {
        self.backend.time()
    }

    /// The window's GL function table
    ///
    /// `None` only for windows without a native context.
    pub fn gl(&self) -> Option<&glow::Context> {
        self.backend.gl()
    }
}

impl std::fmt::Debug for GameWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameWindow")
            .field("title", &self.backend.title())
            .field("size", &self.backend.size())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
