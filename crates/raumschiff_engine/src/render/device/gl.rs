//! OpenGL implementation of [`GraphicsDevice`] on top of `glow`
//!
//! All calls require the context created with the device to be current on the
//! calling thread; the demo only ever renders from its single main thread.

use std::ffi::c_void;
use std::num::NonZeroU32;

use glow::HasContext;

use super::{
    BufferId, BufferTarget, BufferUsage, BuildStatus, ClearMask, DeviceError, DeviceResult,
    GraphicsDevice, Primitive, ProgramId, ShaderId, ShaderStage, TextureId, UniformValue,
    VertexArrayId, VertexAttribute,
};

/// Upper bound on error codes drained per check; a lost context can keep
/// reporting forever
const MAX_DRAINED_ERRORS: usize = 32;

/// Device backed by an OpenGL 3.3 core context
pub struct GlDevice {
    gl: glow::Context,
}

impl GlDevice {
    /// Load GL entry points through `loader`
    ///
    /// The context `loader` resolves symbols for must be current.
    pub fn from_loader<F>(loader: F) -> Self
    where
        F: FnMut(&str) -> *const c_void,
    {
        let gl = unsafe { glow::Context::from_loader_function(loader) };
        let device = Self { gl };
        log::info!("OpenGL context: {}", device.version_string());
        device
    }

    /// Driver version string
    pub fn version_string(&self) -> String {
        unsafe { self.gl.get_parameter_string(glow::VERSION) }
    }
}

fn allocation(kind: &'static str) -> impl FnOnce(String) -> DeviceError {
    move |message| DeviceError::Allocation { kind, message }
}

fn vertex_array(id: VertexArrayId) -> Option<glow::NativeVertexArray> {
    NonZeroU32::new(id.0).map(glow::NativeVertexArray)
}

fn buffer(id: BufferId) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(id.0).map(glow::NativeBuffer)
}

fn shader(id: ShaderId) -> Option<glow::NativeShader> {
    NonZeroU32::new(id.0).map(glow::NativeShader)
}

fn program(id: ProgramId) -> Option<glow::NativeProgram> {
    NonZeroU32::new(id.0).map(glow::NativeProgram)
}

fn texture(id: TextureId) -> Option<glow::NativeTexture> {
    NonZeroU32::new(id.0).map(glow::NativeTexture)
}

const fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Vertex => glow::ARRAY_BUFFER,
        BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
    }
}

const fn primitive_mode(primitive: Primitive) -> u32 {
    match primitive {
        Primitive::Triangles => glow::TRIANGLES,
        Primitive::Lines => glow::LINES,
    }
}

fn gl_count(count: u32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

fn gl_size(size: usize) -> i32 {
    i32::try_from(size).unwrap_or(i32::MAX)
}

impl GraphicsDevice for GlDevice {
    fn create_vertex_array(&mut self) -> DeviceResult<VertexArrayId> {
        let native = unsafe { self.gl.create_vertex_array() }.map_err(allocation("vertex array"))?;
        Ok(VertexArrayId(native.0.get()))
    }

    fn bind_vertex_array(&mut self, vertex_array_id: Option<VertexArrayId>) {
        unsafe { self.gl.bind_vertex_array(vertex_array_id.and_then(vertex_array)) };
    }

    fn delete_vertex_array(&mut self, vertex_array_id: VertexArrayId) {
        if let Some(native) = vertex_array(vertex_array_id) {
            unsafe { self.gl.delete_vertex_array(native) };
        }
    }

    fn create_buffer(&mut self) -> DeviceResult<BufferId> {
        let native = unsafe { self.gl.create_buffer() }.map_err(allocation("buffer"))?;
        Ok(BufferId(native.0.get()))
    }

    fn buffer_data(&mut self, target: BufferTarget, buffer_id: BufferId, data: &[u8], usage: BufferUsage) {
        let usage = match usage {
            BufferUsage::Static => glow::STATIC_DRAW,
            BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
        };
        let target = buffer_target(target);
        unsafe {
            self.gl.bind_buffer(target, buffer(buffer_id));
            self.gl.buffer_data_u8_slice(target, data, usage);
        }
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, buffer_id: BufferId, offset: usize, data: &[u8]) {
        let target = buffer_target(target);
        unsafe {
            self.gl.bind_buffer(target, buffer(buffer_id));
            self.gl.buffer_sub_data_u8_slice(target, gl_size(offset), data);
        }
    }

    fn delete_buffer(&mut self, buffer_id: BufferId) {
        if let Some(native) = buffer(buffer_id) {
            unsafe { self.gl.delete_buffer(native) };
        }
    }

    fn vertex_attribute(&mut self, attribute: &VertexAttribute, stride: usize) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                attribute.location,
                gl_count(attribute.components),
                glow::FLOAT,
                false,
                gl_size(stride),
                gl_size(attribute.offset),
            );
            self.gl.enable_vertex_attrib_array(attribute.location);
        }
    }

    fn create_shader(&mut self, stage: ShaderStage) -> DeviceResult<ShaderId> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        let native = unsafe { self.gl.create_shader(kind) }.map_err(allocation("shader"))?;
        Ok(ShaderId(native.0.get()))
    }

    fn compile_shader(&mut self, shader_id: ShaderId, source: &str) -> BuildStatus {
        let Some(native) = shader(shader_id) else {
            return BuildStatus::default();
        };
        unsafe {
            self.gl.shader_source(native, source);
            self.gl.compile_shader(native);
            BuildStatus {
                success: self.gl.get_shader_compile_status(native),
                log: self.gl.get_shader_info_log(native),
            }
        }
    }

    fn delete_shader(&mut self, shader_id: ShaderId) {
        if let Some(native) = shader(shader_id) {
            unsafe { self.gl.delete_shader(native) };
        }
    }

    fn create_program(&mut self) -> DeviceResult<ProgramId> {
        let native = unsafe { self.gl.create_program() }.map_err(allocation("program"))?;
        Ok(ProgramId(native.0.get()))
    }

    fn link_program(&mut self, program_id: ProgramId, shaders: &[ShaderId]) -> BuildStatus {
        let Some(native) = program(program_id) else {
            return BuildStatus::default();
        };
        let stages: Vec<_> = shaders.iter().copied().filter_map(shader).collect();
        unsafe {
            for &stage in &stages {
                self.gl.attach_shader(native, stage);
            }
            self.gl.link_program(native);
            let status = BuildStatus {
                success: self.gl.get_program_link_status(native),
                log: self.gl.get_program_info_log(native),
            };
            for &stage in &stages {
                self.gl.detach_shader(native, stage);
            }
            status
        }
    }

    fn use_program(&mut self, program_id: Option<ProgramId>) {
        unsafe { self.gl.use_program(program_id.and_then(program)) };
    }

    fn set_uniform(&mut self, program_id: ProgramId, name: &str, value: UniformValue) {
        let Some(native) = program(program_id) else {
            return;
        };
        unsafe {
            let location = self.gl.get_uniform_location(native, name);
            match value {
                UniformValue::Mat4(matrix) => {
                    self.gl.uniform_matrix_4_f32_slice(location.as_ref(), false, &matrix);
                }
                UniformValue::Vec3([x, y, z]) => self.gl.uniform_3_f32(location.as_ref(), x, y, z),
                UniformValue::Int(v) => self.gl.uniform_1_i32(location.as_ref(), v),
            }
        }
    }

    fn delete_program(&mut self, program_id: ProgramId) {
        if let Some(native) = program(program_id) {
            unsafe { self.gl.delete_program(native) };
        }
    }

    fn create_texture(&mut self) -> DeviceResult<TextureId> {
        let native = unsafe { self.gl.create_texture() }.map_err(allocation("texture"))?;
        Ok(TextureId(native.0.get()))
    }

    fn upload_texture_r8(&mut self, texture_id: TextureId, width: u32, height: u32, pixels: &[u8]) {
        let pixels = (!pixels.is_empty()).then_some(pixels);
        unsafe {
            // Glyph rows are tightly packed single bytes
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.bind_texture(glow::TEXTURE_2D, texture(texture_id));
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RED as i32,
                gl_count(width),
                gl_count(height),
                0,
                glow::RED,
                glow::UNSIGNED_BYTE,
                pixels,
            );
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            self.gl.bind_texture(glow::TEXTURE_2D, None);
        }
    }

    fn bind_texture(&mut self, unit: u32, texture_id: Option<TextureId>) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, texture_id.and_then(texture));
        }
    }

    fn delete_texture(&mut self, texture_id: TextureId) {
        if let Some(native) = texture(texture_id) {
            unsafe { self.gl.delete_texture(native) };
        }
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        unsafe { self.gl.viewport(0, 0, gl_count(width), gl_count(height)) };
    }

    fn set_depth_test(&mut self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::DEPTH_TEST);
            } else {
                self.gl.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn set_alpha_blending(&mut self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::BLEND);
                self.gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            } else {
                self.gl.disable(glow::BLEND);
            }
        }
    }

    fn set_line_width(&mut self, width: f32) {
        unsafe { self.gl.line_width(width) };
    }

    fn clear(&mut self, color: [f32; 4], mask: ClearMask) {
        let mut bits = 0;
        if mask.contains(ClearMask::COLOR) {
            bits |= glow::COLOR_BUFFER_BIT;
        }
        if mask.contains(ClearMask::DEPTH) {
            bits |= glow::DEPTH_BUFFER_BIT;
        }
        let [r, g, b, a] = color;
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(bits);
        }
    }

    fn draw_arrays(&mut self, primitive: Primitive, first: u32, count: u32) {
        unsafe {
            self.gl
                .draw_arrays(primitive_mode(primitive), gl_count(first), gl_count(count));
        }
    }

    fn draw_elements(&mut self, primitive: Primitive, count: u32) {
        unsafe {
            self.gl
                .draw_elements(primitive_mode(primitive), gl_count(count), glow::UNSIGNED_INT, 0);
        }
    }

    fn take_errors(&mut self) -> Vec<u32> {
        let mut errors = Vec::new();
        while errors.len() < MAX_DRAINED_ERRORS {
            let code = unsafe { self.gl.get_error() };
            if code == glow::NO_ERROR {
                break;
            }
            errors.push(code);
        }
        errors
    }
}
