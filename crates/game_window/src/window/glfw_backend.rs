//! Window management using GLFW
//!
//! One GLFW window with a current OpenGL context and a loaded `glow` function
//! table.

use std::rc::Rc;

use glfw::{Context as _, WindowEvent};
use glow::HasContext as _;

use super::backend::WindowBackend;
use super::{GlfwLibrary, WindowConfig, WindowError, WindowResult};

/// GLFW window wrapper with proper resource management
///
/// Field order matters: the GL table and window are dropped before the
/// library handle, so GLFW is never terminated under a live window.
pub(crate) struct GlfwBackend {
    gl: glow::Context,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, WindowEvent)>,
    title: String,
    library: Rc<GlfwLibrary>,
}

impl GlfwBackend {
    pub(crate) fn new(config: &WindowConfig) -> WindowResult<Self> {
        let library = GlfwLibrary::acquire()?;
        let (major, minor) = config.gl_version;

        let (mut window, events) = {
            let mut glfw = library.glfw();
            glfw.default_window_hints();
            glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::OpenGl));
            glfw.window_hint(glfw::WindowHint::ContextVersion(major, minor));
            if config.core_profile {
                glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
                glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(cfg!(target_os = "macos")));
            }
            glfw.window_hint(glfw::WindowHint::Resizable(config.resizable));
            glfw.window_hint(glfw::WindowHint::Samples(config.samples));

            glfw.with_primary_monitor(|glfw, monitor| {
                let mode = match monitor {
                    Some(monitor) if config.fullscreen => glfw::WindowMode::FullScreen(monitor),
                    _ => glfw::WindowMode::Windowed,
                };
                glfw.create_window(config.width, config.height, &config.title, mode)
            })
        }
        .ok_or_else(|| WindowError::CreationFailed {
            title: config.title.clone(),
            width: config.width,
            height: config.height,
            major,
            minor,
        })?;

        window.make_current();
        library.glfw().set_swap_interval(if config.vsync {
            glfw::SwapInterval::Sync(1)
        } else {
            glfw::SwapInterval::None
        });
        window.set_all_polling(true);

        #[allow(unsafe_code)]
        // SAFETY: the window's context was made current on this thread above
        // and stays current for the lifetime of the backend.
        let gl = unsafe {
            glow::Context::from_loader_function(|name| window.get_proc_address(name) as *const _)
        };

        #[allow(unsafe_code)]
        // SAFETY: `gl` was loaded from the current context.
        let version = unsafe { gl.get_parameter_string(glow::VERSION) };
        log::info!(
            "Window '{}' created ({}x{}, {}), OpenGL {}",
            config.title,
            config.width,
            config.height,
            if config.fullscreen { "fullscreen" } else { "windowed" },
            version
        );

        Ok(Self {
            gl,
            window,
            events,
            title: config.title.clone(),
            library,
        })
    }
}

impl WindowBackend for GlfwBackend {
    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn set_should_close(&mut self, should_close: bool) {
        self.window.set_should_close(should_close);
    }

    fn poll_events(&mut self) -> Vec<(f64, WindowEvent)> {
        self.library.glfw().poll_events();
        glfw::flush_messages(&self.events).collect()
    }

    fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    fn size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_size();
        (width.max(0) as u32, height.max(0) as u32)
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (width.max(0) as u32, height.max(0) as u32)
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
        self.title = title.to_string();
    }

    fn time(&self) -> f64 {
        self.library.time()
    }

    fn gl(&self) -> Option<&glow::Context> {
        Some(&self.gl)
    }
}

impl Drop for GlfwBackend {
    fn drop(&mut self) {
        log::debug!("Destroying window '{}'", self.title);
    }
}
