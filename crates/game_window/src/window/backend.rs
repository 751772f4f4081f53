//! Internal window backend contract
//!
//! [`GameWindow`](super::GameWindow) talks to the native window only through
//! this trait. The GLFW backend is the one real implementation; tests plug in a
//! scripted headless backend so the loop can run without a display.

use glfw::WindowEvent;

/// Internal trait for window backend implementations
///
/// Not `Send`: GLFW windows and GL contexts belong to the thread that created
/// them.
pub(crate) trait WindowBackend {
    /// Whether a close was requested (close button, Alt+F4, or programmatic)
    fn should_close(&self) -> bool;

    /// Set or clear the close request flag
    fn set_should_close(&mut self, should_close: bool);

    /// Process pending OS events and drain the ones queued for this window
    fn poll_events(&mut self) -> Vec<(f64, WindowEvent)>;

    /// Present the back buffer
    fn swap_buffers(&mut self);

    /// Client area size in screen coordinates
    fn size(&self) -> (u32, u32);

    /// Framebuffer size in pixels
    fn framebuffer_size(&self) -> (u32, u32);

    /// Current window title
    fn title(&self) -> String;

    /// Set the window title text
    fn set_title(&mut self, title: &str);

    /// Monotonic clock in seconds
    fn time(&self) -> f64;

    /// GL function table for the window's context, if it has one
    fn gl(&self) -> Option<&glow::Context>;
}
