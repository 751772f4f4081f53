//! Window and GL context configuration

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,

    /// Window width in screen coordinates
    pub width: u32,

    /// Window height in screen coordinates
    pub height: u32,

    /// Whether window is resizable
    pub resizable: bool,

    /// Whether to open fullscreen on the primary monitor
    pub fullscreen: bool,

    /// Swap on vertical retrace (swap interval 1)
    pub vsync: bool,

    /// Requested OpenGL context version as (major, minor)
    pub gl_version: (u32, u32),

    /// Request a core profile context (forward compatible on macOS)
    pub core_profile: bool,

    /// MSAA sample count for the default framebuffer
    pub samples: Option<u32>,

    /// Color the loop clears to before each `render` hook, if any
    pub clear_color: Option<[f32; 4]>,

    /// Treat an Escape key press as a close request
    pub close_on_escape: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Game Window".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
            fullscreen: false,
            vsync: true,
            gl_version: (3, 3),
            core_profile: true,
            samples: None,
            clear_color: None,
            close_on_escape: false,
        }
    }
}

impl WindowConfig {
    /// Create a config with the given title and size, other fields default
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }

    /// Set the clear color (builder pattern)
    #[must_use]
    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = Some(color);
        self
    }

    /// Set vsync (builder pattern)
    #[must_use]
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Reject values GLFW would refuse or silently misinterpret
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid {
                field: "window.size",
                reason: format!("{}x{} has a zero dimension", self.width, self.height),
            });
        }
        if self.gl_version.0 == 0 {
            return Err(ConfigError::Invalid {
                field: "window.gl_version",
                reason: format!("{}.{} is not an OpenGL version", self.gl_version.0, self.gl_version.1),
            });
        }
        // Profiles only exist from 3.2 onwards
        if self.core_profile && self.gl_version < (3, 2) {
            return Err(ConfigError::Invalid {
                field: "window.core_profile",
                reason: format!(
                    "core profile needs OpenGL 3.2 or newer, got {}.{}",
                    self.gl_version.0, self.gl_version.1
                ),
            });
        }
        if let Some(color) = self.clear_color {
            if color.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(ConfigError::Invalid {
                    field: "window.clear_color",
                    reason: format!("{color:?} has components outside 0..=1"),
                });
            }
        }
        Ok(())
    }
}
