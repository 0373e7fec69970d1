//! Mesh representation for imported models
//!
//! A mesh here is the flat buffer pair handed to the uploader: interleaved
//! position/normal vertices and one `u32` index per emitted face corner.

/// Interleaved vertex as uploaded to the device
///
/// `#[repr(C)]` keeps the position at byte 0 and the normal at byte 12, which
/// is what [`VertexLayout::position_normal`](crate::render::VertexLayout::position_normal)
/// describes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],

    /// Normal vector, zero when the source had none
    pub normal: [f32; 3],
}

// Safe to implement Pod and Zeroable for Vertex since it only contains f32 arrays
unsafe impl bytemuck::Pod for Vertex {}
unsafe impl bytemuck::Zeroable for Vertex {}

impl Vertex {
    /// Floats per vertex
    pub const FLOATS: usize = 6;

    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Vertex and index buffers for one imported asset
///
/// Indices are never deduplicated: every corner gets a fresh vertex and the
/// next sequential index, so `vertices.len() == indices.len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data, one per corner
    pub indices: Vec<u32>,
}

impl IndexedMesh {
    /// Create a mesh from prepared buffers
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Append one corner, assigning it the next index
    pub fn push_corner(&mut self, vertex: Vertex) {
        // Corner counts stay far below u32::MAX for any mesh the device accepts
        #[allow(clippy::cast_possible_truncation)]
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        self.indices.push(index);
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of triangles
    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when the mesh holds no geometry
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Interleaved float view of the vertex buffer
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Every index refers to an existing vertex
    pub fn indices_in_range(&self) -> bool {
        let count = self.vertices.len();
        self.indices.iter().all(|&index| (index as usize) < count)
    }
}
