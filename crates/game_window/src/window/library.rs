//! Reference-counted GLFW library lifecycle
//!
//! GLFW must be initialized before the first window is created and should be
//! terminated once no window is left. Each [`GlfwBackend`](super::glfw_backend::GlfwBackend)
//! holds an `Rc<GlfwLibrary>`; the per-thread slot only keeps a `Weak`, so the
//! library is torn down with the last window and brought back up by the next.

use std::cell::{RefCell, RefMut};
use std::rc::{Rc, Weak};

use super::{WindowError, WindowResult};

/// Per-thread slot for a lazily created, shared instance
///
/// Holds only a weak reference: the instance lives exactly as long as some
/// caller keeps the `Rc` returned by [`acquire`](Self::acquire).
pub struct SharedInstance<T> {
    slot: RefCell<Weak<T>>,
}

impl<T> Default for SharedInstance<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SharedInstance<T> {
    /// Create an empty slot
    pub const fn new() -> Self {
        Self {
            slot: RefCell::new(Weak::new()),
        }
    }

    /// Return the live instance, or create one with `init`
    ///
    /// `init` only runs when no handle is alive. If it fails, the slot stays
    /// empty and the next call retries.
    pub fn acquire<E>(&self, init: impl FnOnce() -> Result<T, E>) -> Result<Rc<T>, E> {
        if let Some(live) = self.slot.borrow().upgrade() {
            return Ok(live);
        }

        let instance = Rc::new(init()?);
        *self.slot.borrow_mut() = Rc::downgrade(&instance);
        Ok(instance)
    }

    /// Whether an instance is currently alive
    pub fn is_live(&self) -> bool {
        self.handle_count() > 0
    }

    /// Number of outstanding strong handles
    pub fn handle_count(&self) -> usize {
        self.slot.borrow().strong_count()
    }
}

thread_local! {
    static LIBRARY: SharedInstance<GlfwLibrary> = const { SharedInstance::new() };
}

/// Shared GLFW library handle
pub struct GlfwLibrary {
    glfw: RefCell<glfw::Glfw>,
}

impl GlfwLibrary {
    /// Get the thread's GLFW instance, initializing GLFW if no window holds it
    pub fn acquire() -> WindowResult<Rc<Self>> {
        LIBRARY.with(|shared| shared.acquire(Self::init))
    }

    /// Whether GLFW is currently initialized on this thread
    pub fn is_initialized() -> bool {
        LIBRARY.with(SharedInstance::is_live)
    }

    fn init() -> WindowResult<Self> {
        let glfw = glfw::init(log_glfw_error)
            .map_err(|e| WindowError::InitializationFailed(format!("{e:?}")))?;
        log::info!("GLFW {} initialized", glfw::get_version_string());

        Ok(Self {
            glfw: RefCell::new(glfw),
        })
    }

    /// Mutable access to the GLFW handle
    ///
    /// Borrows are scoped to single GLFW calls; hooks never see this.
    pub(crate) fn glfw(&self) -> RefMut<'_, glfw::Glfw> {
        self.glfw.borrow_mut()
    }

    /// Seconds since GLFW was initialized
    pub fn time(&self) -> f64 {
        self.glfw.borrow().get_time()
    }
}

impl Drop for GlfwLibrary {
    fn drop(&mut self) {
        log::info!("Last window released, terminating GLFW");
    }
}

/// GLFW error callback
///
/// Errors are logged rather than panicking; the failing call still reports
/// failure through its return value.
fn log_glfw_error(error: glfw::Error, description: String) {
    log::error!("GLFW error {error:?}: {description}");
}
