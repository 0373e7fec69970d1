//! # Rendering
//!
//! Everything between an imported mesh and pixels on screen:
//! - **Device**: the [`GraphicsDevice`] seam, with an OpenGL implementation
//! - **Buffers**: vertex array, vertex and index buffer ownership
//! - **Shaders**: the three embedded programs
//! - **Transform**: model, view and projection matrices
//! - **Text**: glyph textures, layout and screen text effects
//! - **Frame**: per-screen draw dispatch

pub mod buffers;
pub mod device;
pub mod frame;
pub mod geometry;
pub mod mesh;
pub mod shader;
pub mod text;
pub mod transform;
pub mod window;

pub use buffers::{BufferSet, UploadError, VertexLayout};
pub use device::{check_errors, DeviceError, GlDevice, GraphicsDevice};
pub use frame::FrameRenderer;
pub use mesh::{IndexedMesh, Vertex};
pub use shader::{ProgramSet, ShaderProgram};
pub use transform::{CameraRig, FrameMatrices, TransformState};
pub use window::{WindowError, WindowHandle};
