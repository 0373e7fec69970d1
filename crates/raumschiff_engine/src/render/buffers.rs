//! GPU buffer uploads
//!
//! A [`BufferSet`] owns one vertex array, its vertex buffer and an optional
//! index buffer. Geometry is uploaded once at creation; only the text quad
//! buffer is rewritten afterwards.

use thiserror::Error;

use super::device::{
    BufferId, BufferTarget, BufferUsage, DeviceError, GraphicsDevice, VertexArrayId,
    VertexAttribute,
};
use super::mesh::{IndexedMesh, Vertex};

const FLOAT_SIZE: usize = std::mem::size_of::<f32>();

/// Upload failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The device could not allocate one of the objects
    #[error("Buffer upload failed: {0}")]
    Device(#[from] DeviceError),
}

/// Interleaved float layout shared by every attribute of a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    /// Floats per vertex
    pub stride_floats: usize,
    /// Attributes in location order
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Build a layout from per-location component counts, packed in order
    pub fn interleaved(components: &[u32]) -> Self {
        let mut offset = 0;
        let attributes = components
            .iter()
            .zip(0u32..)
            .map(|(&count, location)| {
                let attribute = VertexAttribute {
                    location,
                    components: count,
                    offset: offset * FLOAT_SIZE,
                };
                offset += count as usize;
                attribute
            })
            .collect();

        Self {
            stride_floats: offset,
            attributes,
        }
    }

    /// Position (location 0) and normal (location 1)
    pub fn position_normal() -> Self {
        Self::interleaved(&[3, 3])
    }

    /// Position (location 0) and color (location 1)
    pub fn position_color() -> Self {
        Self::interleaved(&[3, 3])
    }

    /// One vec4 holding screen position and texture coordinates
    pub fn text_quad() -> Self {
        Self::interleaved(&[4])
    }

    /// Stride in bytes
    pub fn stride_bytes(&self) -> usize {
        self.stride_floats * FLOAT_SIZE
    }
}

/// Device objects for one piece of geometry
///
/// The empty set (see [`BufferSet::empty`]) owns nothing; drawing with it is
/// not meaningful but tearing it down is allowed.
#[derive(Debug, Default)]
pub struct BufferSet {
    vertex_array: Option<VertexArrayId>,
    vertex_buffer: Option<BufferId>,
    index_buffer: Option<BufferId>,
    vertex_count: usize,
    index_count: usize,
}

impl BufferSet {
    /// A set that owns no device objects
    pub fn empty() -> Self {
        Self::default()
    }

    /// Upload an imported mesh with the position/normal layout
    pub fn from_mesh(device: &mut dyn GraphicsDevice, mesh: &IndexedMesh) -> Result<Self, UploadError> {
        log::debug!(
            "Uploading mesh: {} vertices ({} bytes), {} indices",
            mesh.vertex_count(),
            mesh.vertex_count() * std::mem::size_of::<Vertex>(),
            mesh.index_count()
        );
        Self::upload(
            device,
            mesh.as_floats(),
            Some(&mesh.indices),
            &VertexLayout::position_normal(),
            BufferUsage::Static,
        )
    }

    /// Allocate the vertex array and buffers, copy the data and record the layout
    ///
    /// Nothing stays allocated when this fails.
    pub fn upload(
        device: &mut dyn GraphicsDevice,
        vertices: &[f32],
        indices: Option<&[u32]>,
        layout: &VertexLayout,
        usage: BufferUsage,
    ) -> Result<Self, UploadError> {
        let mut set = Self::empty();
        if let Err(e) = set.allocate(device, indices.is_some()) {
            log::error!("Buffer allocation failed, releasing partial set: {}", e);
            set.teardown(device);
            return Err(e);
        }

        device.bind_vertex_array(set.vertex_array);
        if let Some(vertex_buffer) = set.vertex_buffer {
            device.buffer_data(BufferTarget::Vertex, vertex_buffer, bytemuck::cast_slice(vertices), usage);
        }
        if let (Some(index_buffer), Some(indices)) = (set.index_buffer, indices) {
            device.buffer_data(BufferTarget::Index, index_buffer, bytemuck::cast_slice(indices), usage);
            set.index_count = indices.len();
        }
        for attribute in &layout.attributes {
            device.vertex_attribute(attribute, layout.stride_bytes());
        }
        device.bind_vertex_array(None);

        set.vertex_count = vertices.len() / layout.stride_floats.max(1);
        Ok(set)
    }

    fn allocate(&mut self, device: &mut dyn GraphicsDevice, indexed: bool) -> Result<(), UploadError> {
        self.vertex_array = Some(device.create_vertex_array()?);
        self.vertex_buffer = Some(device.create_buffer()?);
        if indexed {
            self.index_buffer = Some(device.create_buffer()?);
        }
        Ok(())
    }

    /// Overwrite the start of the vertex buffer
    pub fn update_vertices(&self, device: &mut dyn GraphicsDevice, vertices: &[f32]) {
        if let Some(vertex_buffer) = self.vertex_buffer {
            device.buffer_sub_data(BufferTarget::Vertex, vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }
    }

    /// Bind the vertex array
    pub fn bind(&self, device: &mut dyn GraphicsDevice) {
        device.bind_vertex_array(self.vertex_array);
    }

    /// Release all device objects; repeated calls do nothing
    pub fn teardown(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(vertex_array) = self.vertex_array.take() {
            device.delete_vertex_array(vertex_array);
        }
        if let Some(vertex_buffer) = self.vertex_buffer.take() {
            device.delete_buffer(vertex_buffer);
        }
        if let Some(index_buffer) = self.index_buffer.take() {
            device.delete_buffer(index_buffer);
        }
        self.vertex_count = 0;
        self.index_count = 0;
    }

    /// Whether device objects are held
    pub fn is_allocated(&self) -> bool {
        self.vertex_array.is_some()
    }

    /// Number of vertices uploaded
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of indices uploaded, zero when not indexed
    pub fn index_count(&self) -> usize {
        self.index_count
    }
}
