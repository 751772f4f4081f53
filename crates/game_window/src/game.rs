//! Game trait and lifecycle hooks

use glfw::WindowEvent;
use thiserror::Error;

use crate::config::ConfigError;
use crate::foundation::time::FrameTime;
use crate::window::{GameWindow, WindowError};

/// Game lifecycle trait
///
/// Implement this trait and hand it to [`GameLoop::run`](crate::GameLoop::run).
/// Every hook has a no-op default; override the ones you need.
///
/// Hook order for one run:
///
/// ```text
/// load → start → { event* → [closing] → tick → render }* → closed
/// ```
pub trait Game {
    /// Called once after the window and GL context exist, before the loop.
    ///
    /// Create GL objects and load data here.
    fn load(&mut self, ctx: &mut GameContext<'_>) -> Result<(), GameError> {
        let _ = ctx;
        Ok(())
    }

    /// Called once right before the first frame
    fn start(&mut self, ctx: &mut GameContext<'_>) -> Result<(), GameError> {
        let _ = ctx;
        Ok(())
    }

    /// Called every frame with the frame timing. Update game state here.
    fn tick(&mut self, ctx: &mut GameContext<'_>, time: FrameTime) -> Result<(), GameError> {
        let _ = (ctx, time);
        Ok(())
    }

    /// Called every frame after `tick`, before the buffers are swapped
    fn render(&mut self, ctx: &mut GameContext<'_>, time: FrameTime) -> Result<(), GameError> {
        let _ = (ctx, time);
        Ok(())
    }

    /// Called for each raw GLFW event polled this frame
    fn event(&mut self, ctx: &mut GameContext<'_>, event: &WindowEvent) -> Result<(), GameError> {
        let _ = (ctx, event);
        Ok(())
    }

    /// Called when the framebuffer changes size (after the GL viewport is updated)
    fn resized(&mut self, ctx: &mut GameContext<'_>, width: u32, height: u32) -> Result<(), GameError> {
        let _ = (ctx, width, height);
        Ok(())
    }

    /// Called when the window was asked to close
    ///
    /// Return [`CloseResponse::Cancel`] to keep running.
    fn closing(&mut self, ctx: &mut GameContext<'_>) -> CloseResponse {
        let _ = ctx;
        CloseResponse::Allow
    }

    /// Called once after the loop ended normally
    ///
    /// The window and its GL context still exist; release GL objects here.
    fn closed(&mut self, ctx: &mut GameContext<'_>) {
        let _ = ctx;
    }
}

/// Answer of the `closing` hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloseResponse {
    /// Let the window close and end the loop
    #[default]
    Allow,
    /// Ignore this close request and keep running
    Cancel,
}

/// What the hooks see of the running game
pub struct GameContext<'a> {
    window: &'a mut GameWindow,
    time: FrameTime,
}

impl<'a> GameContext<'a> {
    pub(crate) fn new(window: &'a mut GameWindow, time: FrameTime) -> Self {
        Self { window, time }
    }

    /// The window being driven
    pub fn window(&self) -> &GameWindow {
        &*self.window
    }

    /// Mutable access to the window being driven
    pub fn window_mut(&mut self) -> &mut GameWindow {
        &mut *self.window
    }

    /// The window's GL function table, or [`GameError::Gl`] if it has none
    pub fn gl(&self) -> Result<&glow::Context, GameError> {
        self.window
            .gl()
            .ok_or_else(|| GameError::Gl("window has no OpenGL context".to_string()))
    }

    /// Timing of the current frame (zeroed before the first frame)
    pub fn time(&self) -> FrameTime {
        self.time
    }

    /// Framebuffer size in pixels
    pub fn framebuffer_size(&self) -> (u32, u32) {
        self.window.framebuffer_size()
    }

    /// Set the window title
    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    /// Ask the loop to stop; goes through the `closing` hook like any close
    pub fn request_close(&mut self) {
        log::debug!("Close requested by game");
        self.window.request_close();
    }
}

/// Game-level errors
#[derive(Error, Debug)]
pub enum GameError {
    /// Window error propagated to game level
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// OpenGL error (shader compile, link, missing context)
    #[error("OpenGL error: {0}")]
    Gl(String),

    /// Custom game error
    #[error("Game error: {0}")]
    Custom(String),
}
