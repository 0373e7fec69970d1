//! Glyph quad layout
//!
//! Produces one screen-space quad per drawable character, two triangles each,
//! with the y axis pointing up.

use super::GlyphCache;
use crate::render::device::TextureId;

/// Six `(x, y, u, v)` vertices for one character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    /// Texture sampled by the quad
    pub texture: TextureId,
    /// Two triangles, texture v flipped so bitmap row 0 is at the top
    pub vertices: [[f32; 4]; 6],
}

impl GlyphQuad {
    /// Vertices as a flat float slice for upload
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Lay out `text` starting at `origin` (baseline of the first line)
///
/// The pen advances by each glyph's advance times `scale`; a newline returns to
/// `origin.0` and moves one scaled line height down. Characters missing from
/// the cache produce no quad and do not move the pen.
pub fn layout_text(cache: &GlyphCache, text: &str, origin: (f32, f32), scale: f32) -> Vec<GlyphQuad> {
    let (mut x, mut y) = origin;
    let mut quads = Vec::with_capacity(text.len());

    for ch in text.chars() {
        if ch == '\n' {
            x = origin.0;
            y -= cache.line_height() * scale;
            continue;
        }

        let Some(glyph) = cache.get(ch) else {
            continue;
        };

        let xpos = x + glyph.bearing.x as f32 * scale;
        let ypos = y - (glyph.size.y - glyph.bearing.y) as f32 * scale;
        let w = glyph.size.x as f32 * scale;
        let h = glyph.size.y as f32 * scale;

        quads.push(GlyphQuad {
            texture: glyph.texture,
            vertices: [
                [xpos, ypos + h, 0.0, 0.0],
                [xpos, ypos, 0.0, 1.0],
                [xpos + w, ypos, 1.0, 1.0],
                [xpos, ypos + h, 0.0, 0.0],
                [xpos + w, ypos, 1.0, 1.0],
                [xpos + w, ypos + h, 1.0, 0.0],
            ],
        });

        x += glyph.advance * scale;
    }

    quads
}
