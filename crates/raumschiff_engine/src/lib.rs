//! # Raumschiff Engine
//!
//! Loads a triangulated OBJ spaceship, uploads it to an OpenGL 3.3 context and
//! renders it under a fixed camera with Phong lighting, an axis gizmo and a
//! handful of text screens.
//!
//! ## Flow
//!
//! - **Import**: [`assets::ObjLoader`] flattens faces into an [`render::IndexedMesh`]
//! - **Upload**: [`render::BufferSet`] moves geometry into device buffers
//! - **Frame**: [`screen::AppState`] advances on input, then
//!   [`render::FrameRenderer`] draws the active [`screen::Screen`]
//!
//! ```rust,no_run
//! use raumschiff_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DemoConfig::default();
//!     let mut window = WindowHandle::new(&config.window)?;
//!     let mut device = window.create_device();
//!     let mesh = ObjLoader::load_obj(&config.assets.mesh_path)?;
//!     let glyphs = GlyphCache::empty(config.text.pixel_size);
//!     let mut renderer = FrameRenderer::new(&mut device, &mesh, &config, glyphs)?;
//!
//!     let mut state = AppState::new(Screen::Game(TransformState::default()), config.controls);
//!     while !state.should_close {
//!         window.poll_events();
//!         state = state.update(&window.input_snapshot(), 0.016);
//!         renderer.render(&mut device, &state.screen);
//!         window.swap_buffers();
//!     }
//!     renderer.teardown(&mut device);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod input;
pub mod render;
pub mod screen;

#[cfg(test)]
mod tests;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{ImportError, ObjLoader},
        config::{Config, DemoConfig},
        foundation::{
            math::{Mat4, Vec3},
            time::FrameClock,
        },
        input::InputSnapshot,
        render::{
            check_errors, text::GlyphCache, BufferSet, FrameRenderer, GlDevice, GraphicsDevice,
            IndexedMesh, TransformState, WindowHandle,
        },
        screen::{AppState, Screen},
    };
}
