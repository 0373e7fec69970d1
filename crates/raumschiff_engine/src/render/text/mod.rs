//! Bitmap text rendering support
//!
//! Glyphs are rasterized once into individual textures; each character is drawn
//! as its own textured quad.

mod effects;
mod glyph_cache;
mod layout;

pub use effects::{TextReveal, TitlePulse};
pub use glyph_cache::{FontError, Glyph, GlyphCache};
pub use layout::{layout_text, GlyphQuad};
