//! Hand-authored geometry

/// Length of each axis line in world units
pub const AXIS_LENGTH: f32 = 10.0;

/// Vertices in the axis gizmo: one line per axis
pub const AXIS_VERTEX_COUNT: u32 = 6;

/// Origin-to-endpoint lines for X (red), Y (green) and Z (blue), interleaved
/// as position then color
pub fn axis_gizmo_vertices(length: f32) -> [f32; 36] {
    #[rustfmt::skip]
    let vertices = [
        // X axis
        0.0, 0.0, 0.0,       1.0, 0.0, 0.0,
        length, 0.0, 0.0,    1.0, 0.0, 0.0,
        // Y axis
        0.0, 0.0, 0.0,       0.0, 1.0, 0.0,
        0.0, length, 0.0,    0.0, 1.0, 0.0,
        // Z axis
        0.0, 0.0, 0.0,       0.0, 0.0, 1.0,
        0.0, 0.0, length,    0.0, 0.0, 1.0,
    ];
    vertices
}

/// Floats reserved for one dynamic glyph quad
pub const TEXT_QUAD_FLOATS: usize = 6 * 4;
