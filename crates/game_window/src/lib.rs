//! # Game Window
//!
//! A minimal window and game loop on top of GLFW and OpenGL.
//!
//! ## Features
//!
//! - **One window, one GL context**: GLFW window with a current OpenGL context
//!   and a loaded [`glow`] function table
//! - **Lifecycle hooks**: `load`, `start`, `tick`, `render`, `closing`, `closed`
//! - **Frame timing**: delta and elapsed time from the GLFW clock
//! - **Shared GLFW lifetime**: initialized by the first window, terminated with the last
//! - **Config files**: window and loop settings from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use game_window::prelude::*;
//!
//! struct MyGame;
//!
//! impl Game for MyGame {
//!     fn tick(&mut self, ctx: &mut GameContext<'_>, time: FrameTime) -> Result<(), GameError> {
//!         if time.elapsed > 10.0 {
//!             ctx.request_close();
//!         }
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), GameError> {
//!     game_window::foundation::logging::init();
//!     let config = AppConfig::default();
//!     let mut game_loop = GameLoop::open(&config)?;
//!     game_loop.run(&mut MyGame)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod foundation;
pub mod window;

mod game;
mod game_loop;

pub use game::{CloseResponse, Game, GameContext, GameError};
pub use game_loop::{GameLoop, LoopConfig, LoopStats};
pub use window::{GameWindow, WindowConfig, WindowError, WindowState};

// Re-exported so games can match on raw events and issue GL calls without
// pinning their own versions.
pub use glfw;
pub use glow;

/// Common imports for games
pub mod prelude {
    pub use crate::{
        config::{AppConfig, Config},
        foundation::time::FrameTime,
        CloseResponse, Game, GameContext, GameError, GameLoop, GameWindow, LoopConfig,
        WindowConfig, WindowState,
    };
}
