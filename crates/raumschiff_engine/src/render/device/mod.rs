//! Graphics device abstraction
//!
//! Every draw, upload and state change in the engine goes through
//! [`GraphicsDevice`]. The OpenGL implementation lives in [`gl`]; tests run the
//! same code paths against a recording device.

pub mod gl;
#[cfg(test)]
pub mod recording;

pub use gl::GlDevice;

use bitflags::bitflags;
use thiserror::Error;

/// Result type for device operations
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Errors reported by the device when an object cannot be created
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The driver refused to allocate an object
    #[error("Failed to allocate {kind}: {message}")]
    Allocation {
        /// Kind of object requested
        kind: &'static str,
        /// Driver message
        message: String,
    },
}

macro_rules! device_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub u32);
    };
}

device_handle!(
    /// Handle to a vertex array object
    VertexArrayId
);
device_handle!(
    /// Handle to a buffer object
    BufferId
);
device_handle!(
    /// Handle to a single shader stage
    ShaderId
);
device_handle!(
    /// Handle to a linked program
    ProgramId
);
device_handle!(
    /// Handle to a 2D texture
    TextureId
);

/// Binding point of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    /// Per-vertex attribute data
    Vertex,
    /// Element indices
    Index,
}

/// Expected update frequency of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Written once
    Static,
    /// Rewritten frequently
    Dynamic,
}

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex stage
    Vertex,
    /// Fragment stage
    Fragment,
}

/// Primitive topology for draw calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Independent triangles
    Triangles,
    /// Independent line segments
    Lines,
}

bitflags! {
    /// Buffers affected by a clear
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearMask: u8 {
        /// Color attachment
        const COLOR = 0b01;
        /// Depth attachment
        const DEPTH = 0b10;
    }
}

/// Value assigned to a named uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// Column-major 4x4 matrix
    Mat4([f32; 16]),
    /// Three-component vector
    Vec3([f32; 3]),
    /// Integer, also used for sampler units
    Int(i32),
}

/// One float attribute inside an interleaved vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location
    pub location: u32,
    /// Number of float components
    pub components: u32,
    /// Byte offset inside the vertex
    pub offset: usize,
}

/// Outcome of compiling a stage or linking a program
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildStatus {
    /// Whether the driver accepted the source
    pub success: bool,
    /// Driver info log, possibly empty
    pub log: String,
}

/// Opaque graphics device the renderer issues its calls to
///
/// Calls operate on implicit bound state exactly like the underlying API:
/// `vertex_attribute` and index uploads apply to the bound vertex array,
/// `set_uniform` expects its program to be in use.
pub trait GraphicsDevice {
    /// Allocate a vertex array
    fn create_vertex_array(&mut self) -> DeviceResult<VertexArrayId>;
    /// Bind a vertex array, or unbind with `None`
    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>);
    /// Release a vertex array
    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId);

    /// Allocate a buffer
    fn create_buffer(&mut self) -> DeviceResult<BufferId>;
    /// Bind `buffer` to `target` and replace its contents
    fn buffer_data(&mut self, target: BufferTarget, buffer: BufferId, data: &[u8], usage: BufferUsage);
    /// Bind `buffer` to `target` and overwrite part of its contents
    fn buffer_sub_data(&mut self, target: BufferTarget, buffer: BufferId, offset: usize, data: &[u8]);
    /// Release a buffer
    fn delete_buffer(&mut self, buffer: BufferId);
    /// Describe and enable one float attribute of the bound vertex buffer
    fn vertex_attribute(&mut self, attribute: &VertexAttribute, stride: usize);

    /// Allocate a shader stage
    fn create_shader(&mut self, stage: ShaderStage) -> DeviceResult<ShaderId>;
    /// Compile `source` into `shader`
    fn compile_shader(&mut self, shader: ShaderId, source: &str) -> BuildStatus;
    /// Release a shader stage
    fn delete_shader(&mut self, shader: ShaderId);
    /// Allocate a program
    fn create_program(&mut self) -> DeviceResult<ProgramId>;
    /// Attach `shaders` and link
    fn link_program(&mut self, program: ProgramId, shaders: &[ShaderId]) -> BuildStatus;
    /// Make a program current, or none
    fn use_program(&mut self, program: Option<ProgramId>);
    /// Assign a uniform of the current program; unknown names are ignored
    fn set_uniform(&mut self, program: ProgramId, name: &str, value: UniformValue);
    /// Release a program
    fn delete_program(&mut self, program: ProgramId);

    /// Allocate a texture
    fn create_texture(&mut self) -> DeviceResult<TextureId>;
    /// Upload single-channel 8-bit pixels, clamped and linearly filtered
    fn upload_texture_r8(&mut self, texture: TextureId, width: u32, height: u32, pixels: &[u8]);
    /// Bind a texture to a texture unit
    fn bind_texture(&mut self, unit: u32, texture: Option<TextureId>);
    /// Release a texture
    fn delete_texture(&mut self, texture: TextureId);

    /// Set the viewport to cover `width` x `height` pixels
    fn set_viewport(&mut self, width: u32, height: u32);
    /// Toggle depth testing
    fn set_depth_test(&mut self, enabled: bool);
    /// Toggle source-alpha blending
    fn set_alpha_blending(&mut self, enabled: bool);
    /// Set the rasterized line width
    fn set_line_width(&mut self, width: f32);
    /// Clear the selected buffers
    fn clear(&mut self, color: [f32; 4], mask: ClearMask);

    /// Draw non-indexed vertices from the bound vertex array
    fn draw_arrays(&mut self, primitive: Primitive, first: u32, count: u32);
    /// Draw `count` `u32` indices from the bound vertex array
    fn draw_elements(&mut self, primitive: Primitive, count: u32);

    /// Drain pending error codes
    fn take_errors(&mut self) -> Vec<u32>;
}

/// Drain and log pending device errors
///
/// Errors are diagnostics only; execution continues. Returns how many were
/// reported.
pub fn check_errors(device: &mut dyn GraphicsDevice, context: &str) -> usize {
    let errors = device.take_errors();
    for code in &errors {
        log::error!("{}: device error 0x{:04X}", context, code);
    }
    errors.len()
}
