//! Recording device for tests
//!
//! Hands out sequential ids and records every call so tests can assert on the
//! exact command stream a component issues.

#![allow(missing_docs)]

use super::{
    BufferId, BufferTarget, BufferUsage, BuildStatus, ClearMask, DeviceError, DeviceResult,
    GraphicsDevice, Primitive, ProgramId, ShaderId, ShaderStage, TextureId, UniformValue,
    VertexArrayId, VertexAttribute,
};

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateVertexArray(VertexArrayId),
    BindVertexArray(Option<VertexArrayId>),
    DeleteVertexArray(VertexArrayId),
    CreateBuffer(BufferId),
    BufferData { target: BufferTarget, buffer: BufferId, len: usize, usage: BufferUsage },
    BufferSubData { target: BufferTarget, buffer: BufferId, offset: usize, data: Vec<f32> },
    DeleteBuffer(BufferId),
    VertexAttribute { attribute: VertexAttribute, stride: usize },
    CreateShader(ShaderId, ShaderStage),
    CompileShader(ShaderId),
    DeleteShader(ShaderId),
    CreateProgram(ProgramId),
    LinkProgram(ProgramId, Vec<ShaderId>),
    UseProgram(Option<ProgramId>),
    SetUniform { program: ProgramId, name: String, value: UniformValue },
    DeleteProgram(ProgramId),
    CreateTexture(TextureId),
    UploadTexture { texture: TextureId, width: u32, height: u32 },
    BindTexture { unit: u32, texture: Option<TextureId> },
    DeleteTexture(TextureId),
    Viewport(u32, u32),
    DepthTest(bool),
    AlphaBlending(bool),
    LineWidth(f32),
    Clear([f32; 4], ClearMask),
    DrawArrays { primitive: Primitive, first: u32, count: u32 },
    DrawElements { primitive: Primitive, count: u32 },
}

/// Device that records calls instead of executing them
#[derive(Debug, Default)]
pub struct RecordingDevice {
    pub calls: Vec<Call>,
    pub(crate) next_id: u32,
    /// Number of allocations to allow before every further one fails
    pub allocation_budget: Option<usize>,
    /// Sources containing this marker fail to compile
    pub failing_marker: Option<String>,
    /// Error codes returned by the next `take_errors`
    pub pending_errors: Vec<u32>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, kind: &'static str) -> DeviceResult<u32> {
        if let Some(budget) = self.allocation_budget.as_mut() {
            if *budget == 0 {
                return Err(DeviceError::Allocation {
                    kind,
                    message: "out of memory".to_string(),
                });
            }
            *budget -= 1;
        }
        self.next_id += 1;
        Ok(self.next_id)
    }

    pub fn draws(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::DrawArrays { .. } | Call::DrawElements { .. }))
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.calls.iter().rev().find_map(|call| match call {
            Call::SetUniform { name: n, value, .. } if n == name => Some(*value),
            _ => None,
        })
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl GraphicsDevice for RecordingDevice {
    fn create_vertex_array(&mut self) -> DeviceResult<VertexArrayId> {
        let id = VertexArrayId(self.allocate("vertex array")?);
        self.calls.push(Call::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>) {
        self.calls.push(Call::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId) {
        self.calls.push(Call::DeleteVertexArray(vertex_array));
    }

    fn create_buffer(&mut self) -> DeviceResult<BufferId> {
        let id = BufferId(self.allocate("buffer")?);
        self.calls.push(Call::CreateBuffer(id));
        Ok(id)
    }

    fn buffer_data(&mut self, target: BufferTarget, buffer: BufferId, data: &[u8], usage: BufferUsage) {
        self.calls.push(Call::BufferData { target, buffer, len: data.len(), usage });
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, buffer: BufferId, offset: usize, data: &[u8]) {
        let data = data
            .chunks_exact(4)
            .map(|bytes| f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            .collect();
        self.calls.push(Call::BufferSubData { target, buffer, offset, data });
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.calls.push(Call::DeleteBuffer(buffer));
    }

    fn vertex_attribute(&mut self, attribute: &VertexAttribute, stride: usize) {
        self.calls.push(Call::VertexAttribute { attribute: *attribute, stride });
    }

    fn create_shader(&mut self, stage: ShaderStage) -> DeviceResult<ShaderId> {
        let id = ShaderId(self.allocate("shader")?);
        self.calls.push(Call::CreateShader(id, stage));
        Ok(id)
    }

    fn compile_shader(&mut self, shader: ShaderId, source: &str) -> BuildStatus {
        self.calls.push(Call::CompileShader(shader));
        match &self.failing_marker {
            Some(marker) if source.contains(marker.as_str()) => BuildStatus {
                success: false,
                log: format!("0:1(1): error: unexpected {}", marker),
            },
            _ => BuildStatus { success: true, log: String::new() },
        }
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        self.calls.push(Call::DeleteShader(shader));
    }

    fn create_program(&mut self) -> DeviceResult<ProgramId> {
        let id = ProgramId(self.allocate("program")?);
        self.calls.push(Call::CreateProgram(id));
        Ok(id)
    }

    fn link_program(&mut self, program: ProgramId, shaders: &[ShaderId]) -> BuildStatus {
        self.calls.push(Call::LinkProgram(program, shaders.to_vec()));
        BuildStatus { success: true, log: String::new() }
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        self.calls.push(Call::UseProgram(program));
    }

    fn set_uniform(&mut self, program: ProgramId, name: &str, value: UniformValue) {
        self.calls.push(Call::SetUniform { program, name: name.to_string(), value });
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.calls.push(Call::DeleteProgram(program));
    }

    fn create_texture(&mut self) -> DeviceResult<TextureId> {
        let id = TextureId(self.allocate("texture")?);
        self.calls.push(Call::CreateTexture(id));
        Ok(id)
    }

    fn upload_texture_r8(&mut self, texture: TextureId, width: u32, height: u32, _pixels: &[u8]) {
        self.calls.push(Call::UploadTexture { texture, width, height });
    }

    fn bind_texture(&mut self, unit: u32, texture: Option<TextureId>) {
        self.calls.push(Call::BindTexture { unit, texture });
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.calls.push(Call::DeleteTexture(texture));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.calls.push(Call::Viewport(width, height));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.calls.push(Call::DepthTest(enabled));
    }

    fn set_alpha_blending(&mut self, enabled: bool) {
        self.calls.push(Call::AlphaBlending(enabled));
    }

    fn set_line_width(&mut self, width: f32) {
        self.calls.push(Call::LineWidth(width));
    }

    fn clear(&mut self, color: [f32; 4], mask: ClearMask) {
        self.calls.push(Call::Clear(color, mask));
    }

    fn draw_arrays(&mut self, primitive: Primitive, first: u32, count: u32) {
        self.calls.push(Call::DrawArrays { primitive, first, count });
    }

    fn draw_elements(&mut self, primitive: Primitive, count: u32) {
        self.calls.push(Call::DrawElements { primitive, count });
    }

    fn take_errors(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.pending_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::device::check_errors;

    #[test]
    fn test_allocation_budget_is_enforced() {
        let mut device = RecordingDevice {
            allocation_budget: Some(1),
            ..RecordingDevice::default()
        };
        assert!(device.create_buffer().is_ok());
        assert!(matches!(
            device.create_buffer(),
            Err(DeviceError::Allocation { kind: "buffer", .. })
        ));
    }

    #[test]
    fn test_check_errors_drains_pending_codes() {
        let mut device = RecordingDevice {
            pending_errors: vec![0x0500, 0x0502],
            ..RecordingDevice::default()
        };
        assert_eq!(check_errors(&mut device, "test"), 2);
        assert_eq!(check_errors(&mut device, "test"), 0);
    }
}
