//! Glyph cache built with `fontdue`

use std::collections::HashMap;
use std::path::Path;

use nalgebra::Vector2;
use thiserror::Error;

use crate::render::device::{DeviceError, GraphicsDevice, TextureId};

/// Characters rasterized at startup
const CACHED_CHARS: std::ops::Range<u8> = 0..128;

/// Errors while building the glyph cache
#[derive(Debug, Error)]
pub enum FontError {
    /// Font file could not be read
    #[error("Failed to read font: {0}")]
    Io(#[from] std::io::Error),

    /// Font data could not be parsed
    #[error("Failed to load font: {0}")]
    Parse(String),

    /// A glyph texture could not be created
    #[error("Failed to create glyph texture: {0}")]
    Device(#[from] DeviceError),
}

/// Texture and metrics for one character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Single-channel coverage texture
    pub texture: TextureId,
    /// Bitmap size in pixels
    pub size: Vector2<i32>,
    /// Offset from the pen position to the bitmap's left/top edge
    pub bearing: Vector2<i32>,
    /// Horizontal pen advance in pixels
    pub advance: f32,
}

/// Per-character glyph table, immutable once built
#[derive(Debug, Default)]
pub struct GlyphCache {
    glyphs: HashMap<char, Glyph>,
    pixel_size: f32,
}

impl GlyphCache {
    /// A cache without glyphs
    pub fn empty(pixel_size: f32) -> Self {
        Self {
            glyphs: HashMap::new(),
            pixel_size,
        }
    }

    /// Build the cache from a font file
    ///
    /// Failures are reported and leave an empty cache; text then renders as
    /// nothing.
    pub fn load<P: AsRef<Path>>(device: &mut dyn GraphicsDevice, path: P, pixel_size: f32) -> Self {
        let path = path.as_ref();
        let result = std::fs::read(path)
            .map_err(FontError::from)
            .and_then(|bytes| Self::from_font_bytes(device, &bytes, pixel_size));

        match result {
            Ok(cache) => {
                log::info!("Rasterized {} glyphs from {} at {}px", cache.len(), path.display(), pixel_size);
                cache
            }
            Err(e) => {
                log::error!("Font {} unavailable: {}", path.display(), e);
                Self::empty(pixel_size)
            }
        }
    }

    /// Rasterize the ASCII range and upload one texture per glyph
    pub fn from_font_bytes(
        device: &mut dyn GraphicsDevice,
        font_data: &[u8],
        pixel_size: f32,
    ) -> Result<Self, FontError> {
        let font = fontdue::Font::from_bytes(font_data, fontdue::FontSettings::default())
            .map_err(|e| FontError::Parse(e.to_string()))?;

        let mut cache = Self::empty(pixel_size);
        for ch in CACHED_CHARS.map(char::from) {
            let (metrics, bitmap) = font.rasterize(ch, pixel_size);
            let width = u32::try_from(metrics.width).unwrap_or(0);
            let height = u32::try_from(metrics.height).unwrap_or(0);

            let texture = match device.create_texture() {
                Ok(texture) => texture,
                Err(e) => {
                    log::error!("Skipping glyph {:?}: {}", ch, e);
                    continue;
                }
            };
            device.upload_texture_r8(texture, width, height, &bitmap);

            let height = i32::try_from(height).unwrap_or(0);
            cache.insert(
                ch,
                Glyph {
                    texture,
                    size: Vector2::new(i32::try_from(width).unwrap_or(0), height),
                    bearing: Vector2::new(metrics.xmin, metrics.ymin + height),
                    advance: metrics.advance_width,
                },
            );
        }
        device.bind_texture(0, None);

        Ok(cache)
    }

    /// Add or replace a glyph
    pub fn insert(&mut self, ch: char, glyph: Glyph) {
        self.glyphs.insert(ch, glyph);
    }

    /// Look up a character
    pub fn get(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    /// Number of cached glyphs
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether no glyphs are cached
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Baseline-to-baseline distance at scale 1
    pub fn line_height(&self) -> f32 {
        self.pixel_size
    }

    /// Release all glyph textures
    pub fn teardown(&mut self, device: &mut dyn GraphicsDevice) {
        for (_, glyph) in self.glyphs.drain() {
            device.delete_texture(glyph.texture);
        }
    }
}
