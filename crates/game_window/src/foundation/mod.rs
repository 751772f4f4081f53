//! Foundation module - Core utilities shared by the window and the loop
//!
//! - Frame timing
//! - Logging setup

pub mod logging;
pub mod time;
