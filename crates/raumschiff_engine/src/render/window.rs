//! Window management using GLFW
//!
//! Creates the window with an OpenGL 3.3 core context, hands out the
//! [`GlDevice`] bound to it and samples keyboard state once per frame.

use glfw::{Action, Context, Key};
use thiserror::Error;

use crate::config::WindowConfig;
use crate::input::InputSnapshot;
use crate::render::device::GlDevice;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// GLFW could not be initialized
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    /// The window or its context could not be created
    #[error("Window creation failed ({width}x{height})")]
    CreationFailed {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

/// Result alias for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// GLFW window owning the GL context
pub struct WindowHandle {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl WindowHandle {
    /// Open a window and make its context current
    pub fn new(config: &WindowConfig) -> WindowResult<Self> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| WindowError::InitializationFailed(e.to_string()))?;

        glfw.window_hint(glfw::WindowHint::ContextVersion(3, 3));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
        #[cfg(target_os = "macos")]
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed {
                width: config.width,
                height: config.height,
            })?;

        window.make_current();
        window.set_key_polling(true);
        window.set_framebuffer_size_polling(true);

        log::info!("Window opened: {}x{} \"{}\"", config.width, config.height, config.title);
        Ok(Self { glfw, window, events })
    }

    /// Load GL entry points for the current context
    pub fn create_device(&mut self) -> GlDevice {
        GlDevice::from_loader(|symbol| self.window.get_proc_address(symbol) as *const _)
    }

    /// Whether a close was requested
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Request or cancel closing
    pub fn set_should_close(&mut self, should_close: bool) {
        self.window.set_should_close(should_close);
    }

    /// Pump the event queue
    ///
    /// Returns the last framebuffer size reported this frame, if any.
    pub fn poll_events(&mut self) -> Option<(u32, u32)> {
        self.glfw.poll_events();
        let mut resized = None;
        for (_, event) in glfw::flush_messages(&self.events) {
            if let glfw::WindowEvent::FramebufferSize(width, height) = event {
                resized = Some((clamp_extent(width), clamp_extent(height)));
            }
        }
        resized
    }

    /// Current framebuffer size in pixels
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (clamp_extent(width), clamp_extent(height))
    }

    /// Sample the keys the demo reacts to
    pub fn input_snapshot(&self) -> InputSnapshot {
        let pressed = |key| self.window.get_key(key) == Action::Press;
        InputSnapshot {
            close: pressed(Key::Escape),
            up: pressed(Key::Up),
            down: pressed(Key::Down),
            left: pressed(Key::Left),
            right: pressed(Key::Right),
            yaw_left: pressed(Key::Q),
            yaw_right: pressed(Key::E),
            confirm: pressed(Key::Enter),
        }
    }

    /// Present the back buffer
    pub fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }
}

// Minimized windows report zero; keep the aspect ratio finite
fn clamp_extent(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0).max(1)
}
