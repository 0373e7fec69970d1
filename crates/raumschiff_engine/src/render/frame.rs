//! Per-frame rendering
//!
//! [`FrameRenderer`] owns every device resource the demo draws with and turns
//! the current [`Screen`] into draw calls. Each screen sets up the pipeline
//! state it needs; nothing carries over from the previous frame's screen.

use super::buffers::{BufferSet, UploadError, VertexLayout};
use super::device::{BufferUsage, ClearMask, GraphicsDevice, Primitive, UniformValue};
use super::geometry::{axis_gizmo_vertices, AXIS_LENGTH, AXIS_VERTEX_COUNT, TEXT_QUAD_FLOATS};
use super::mesh::IndexedMesh;
use super::shader::ProgramSet;
use super::text::{layout_text, GlyphCache};
use super::transform::{CameraRig, FrameMatrices, TransformState};
use crate::config::{DemoConfig, LightingConfig, TextConfig};
use crate::foundation::math::{Mat4, Mat4Ext};
use crate::screen::Screen;

/// Horizontal pixels budgeted per title character when centering
const TITLE_CHAR_WIDTH: f32 = 25.0;

/// Distance of the lore text from the top-left corner, in pixels
const LORE_MARGIN: f32 = 25.0;

const AXIS_LINE_WIDTH: f32 = 2.0;

/// Owns the GPU resources for all screens and draws one frame at a time
pub struct FrameRenderer {
    mesh: BufferSet,
    axes: BufferSet,
    text_quad: BufferSet,
    programs: ProgramSet,
    glyphs: GlyphCache,
    camera: CameraRig,
    lighting: LightingConfig,
    text: TextConfig,
    width: u32,
    height: u32,
    torn_down: bool,
}

impl FrameRenderer {
    /// Upload the mesh and static geometry and build the shader programs
    ///
    /// Takes ownership of `glyphs`; they are released with the renderer, or
    /// right away if construction fails.
    pub fn new(
        device: &mut dyn GraphicsDevice,
        mesh: &IndexedMesh,
        config: &DemoConfig,
        mut glyphs: GlyphCache,
    ) -> Result<Self, UploadError> {
        let (mesh_buffers, axes, text_quad, programs) = match Self::create_resources(device, mesh) {
            Ok(resources) => resources,
            Err(e) => {
                glyphs.teardown(device);
                return Err(e);
            }
        };

        log::info!(
            "Frame renderer ready: {} mesh indices, {} glyphs",
            mesh_buffers.index_count(),
            glyphs.len()
        );

        Ok(Self {
            mesh: mesh_buffers,
            axes,
            text_quad,
            programs,
            glyphs,
            camera: CameraRig::from(&config.camera),
            lighting: config.lighting.clone(),
            text: config.text.clone(),
            width: config.window.width.max(1),
            height: config.window.height.max(1),
            torn_down: false,
        })
    }

    // Everything created here is released again before an error is returned
    fn create_resources(
        device: &mut dyn GraphicsDevice,
        mesh: &IndexedMesh,
    ) -> Result<(BufferSet, BufferSet, BufferSet, ProgramSet), UploadError> {
        let mut mesh_buffers = BufferSet::from_mesh(device, mesh)?;

        let axis_vertices = axis_gizmo_vertices(AXIS_LENGTH);
        let layout = VertexLayout::position_color();
        let mut axes = match BufferSet::upload(device, &axis_vertices, None, &layout, BufferUsage::Static) {
            Ok(axes) => axes,
            Err(e) => {
                mesh_buffers.teardown(device);
                return Err(e);
            }
        };

        let quad_vertices = [0.0; TEXT_QUAD_FLOATS];
        let layout = VertexLayout::text_quad();
        let mut text_quad = match BufferSet::upload(device, &quad_vertices, None, &layout, BufferUsage::Dynamic) {
            Ok(text_quad) => text_quad,
            Err(e) => {
                mesh_buffers.teardown(device);
                axes.teardown(device);
                return Err(e);
            }
        };

        match ProgramSet::build(device) {
            Ok(programs) => Ok((mesh_buffers, axes, text_quad, programs)),
            Err(e) => {
                for set in [&mut mesh_buffers, &mut axes, &mut text_quad] {
                    set.teardown(device);
                }
                Err(e.into())
            }
        }
    }

    /// Track a new framebuffer size
    pub fn resize(&mut self, device: &mut dyn GraphicsDevice, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        device.set_viewport(self.width, self.height);
        log::debug!("Viewport resized to {}x{}", self.width, self.height);
    }

    /// Current width / height
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Draw `screen`
    pub fn render(&self, device: &mut dyn GraphicsDevice, screen: &Screen) {
        match screen {
            Screen::Start(pulse) => {
                device.clear(self.lighting.clear_color, ClearMask::COLOR);
                let title = &self.text.title;
                let origin = (
                    (self.width as f32 - TITLE_CHAR_WIDTH * title.chars().count() as f32) / 2.0,
                    self.height as f32 / 2.0,
                );
                self.draw_text(device, title, origin, pulse.scale());
            }
            Screen::Lore(reveal) => {
                device.clear(self.lighting.clear_color, ClearMask::COLOR);
                let origin = (LORE_MARGIN, self.height as f32 - LORE_MARGIN - self.glyphs.line_height());
                self.draw_text(device, reveal.visible_text(), origin, self.text.lore_scale);
            }
            Screen::Game(state) => self.draw_scene(device, state),
            Screen::End => {}
        }
    }

    fn draw_scene(&self, device: &mut dyn GraphicsDevice, state: &TransformState) {
        let matrices = FrameMatrices::compute(state, &self.camera, self.aspect_ratio());
        let view = UniformValue::Mat4(matrices.view.to_column_array());
        let projection = UniformValue::Mat4(matrices.projection.to_column_array());

        device.set_depth_test(true);
        device.clear(self.lighting.clear_color, ClearMask::COLOR | ClearMask::DEPTH);

        let axes = self.programs.axes;
        axes.bind(device);
        device.set_uniform(axes.id, "view", view);
        device.set_uniform(axes.id, "projection", projection);
        device.set_line_width(AXIS_LINE_WIDTH);
        self.axes.bind(device);
        device.draw_arrays(Primitive::Lines, 0, AXIS_VERTEX_COUNT);

        let lit = self.programs.lit_mesh;
        lit.bind(device);
        device.set_uniform(lit.id, "model", UniformValue::Mat4(matrices.model.to_column_array()));
        device.set_uniform(lit.id, "view", view);
        device.set_uniform(lit.id, "projection", projection);
        device.set_uniform(lit.id, "lightPos", UniformValue::Vec3(self.lighting.light_position));
        device.set_uniform(lit.id, "lightColor", UniformValue::Vec3(self.lighting.light_color));
        device.set_uniform(lit.id, "objectColor", UniformValue::Vec3(self.lighting.object_color));
        device.set_uniform(lit.id, "viewPos", UniformValue::Vec3(matrices.camera_position.into()));
        self.mesh.bind(device);
        device.draw_elements(Primitive::Triangles, self.mesh.index_count() as u32);

        device.bind_vertex_array(None);
    }

    fn draw_text(&self, device: &mut dyn GraphicsDevice, text: &str, origin: (f32, f32), scale: f32) {
        device.set_depth_test(false);
        device.set_alpha_blending(true);

        let program = self.programs.text;
        program.bind(device);
        let projection = Mat4::screen_orthographic(self.width as f32, self.height as f32);
        device.set_uniform(program.id, "projection", UniformValue::Mat4(projection.to_column_array()));
        device.set_uniform(program.id, "textColor", UniformValue::Vec3(self.text.color));
        device.set_uniform(program.id, "text", UniformValue::Int(0));
        self.text_quad.bind(device);

        for quad in layout_text(&self.glyphs, text, origin, scale) {
            self.text_quad.update_vertices(device, quad.as_floats());
            device.bind_texture(0, Some(quad.texture));
            device.draw_arrays(Primitive::Triangles, 0, 6);
        }

        device.bind_vertex_array(None);
        device.bind_texture(0, None);
        device.set_alpha_blending(false);
    }

    /// Release every device object; later calls do nothing
    pub fn teardown(&mut self, device: &mut dyn GraphicsDevice) {
        if self.torn_down {
            return;
        }
        self.mesh.teardown(device);
        self.axes.teardown(device);
        self.text_quad.teardown(device);
        self.programs.teardown(device);
        self.glyphs.teardown(device);
        self.torn_down = true;
        log::info!("Frame renderer resources released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::device::recording::{Call, RecordingDevice};
    use crate::render::device::{BufferTarget, TextureId};
    use crate::render::mesh::Vertex;
    use crate::foundation::math::{Vec3, Vector2};
    use crate::render::text::{Glyph, TextReveal, TitlePulse};

    fn triangle_mesh() -> IndexedMesh {
        let mut mesh = IndexedMesh::default();
        for position in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            mesh.push_corner(Vertex::new(position, [0.0, 0.0, 1.0]));
        }
        mesh
    }

    fn glyphs() -> GlyphCache {
        let mut cache = GlyphCache::empty(48.0);
        for (ch, texture) in "Raumschifbl".chars().zip(100..) {
            cache.insert(
                ch,
                Glyph {
                    texture: TextureId(texture),
                    size: Vector2::new(10, 20),
                    bearing: Vector2::new(1, 15),
                    advance: 12.0,
                },
            );
        }
        cache
    }

    fn renderer(device: &mut RecordingDevice) -> FrameRenderer {
        let renderer = FrameRenderer::new(device, &triangle_mesh(), &DemoConfig::default(), glyphs()).unwrap();
        device.clear_calls();
        renderer
    }

    #[test]
    fn test_game_frame_draws_axes_then_mesh() {
        let mut device = RecordingDevice::new();
        let renderer = renderer(&mut device);

        renderer.render(&mut device, &Screen::Game(TransformState::default()));

        assert_eq!(
            device.draws(),
            vec![
                &Call::DrawArrays { primitive: Primitive::Lines, first: 0, count: 6 },
                &Call::DrawElements { primitive: Primitive::Triangles, count: 3 },
            ]
        );
        assert!(device.calls.contains(&Call::DepthTest(true)));
        assert!(device.calls.contains(&Call::LineWidth(2.0)));
        assert!(device
            .calls
            .contains(&Call::Clear([0.1, 0.1, 0.1, 1.0], ClearMask::COLOR | ClearMask::DEPTH)));
    }

    #[test]
    fn test_game_frame_sets_lighting_uniforms() {
        let mut device = RecordingDevice::new();
        let renderer = renderer(&mut device);

        renderer.render(&mut device, &Screen::Game(TransformState::default()));

        for name in ["model", "view", "projection"] {
            assert!(matches!(device.uniform(name), Some(UniformValue::Mat4(_))), "{name} not set");
        }
        assert_eq!(device.uniform("lightPos"), Some(UniformValue::Vec3([50.0, 50.0, 50.0])));
        assert_eq!(device.uniform("lightColor"), Some(UniformValue::Vec3([1.0, 1.0, 1.0])));
        assert_eq!(device.uniform("objectColor"), Some(UniformValue::Vec3([0.6, 0.6, 0.6])));
        assert_eq!(device.uniform("viewPos"), Some(UniformValue::Vec3([30.0, 30.0, 30.0])));
    }

    #[test]
    fn test_camera_stays_put_when_model_moves() {
        let mut device = RecordingDevice::new();
        let renderer = renderer(&mut device);

        let state = TransformState::new(Vec3::new(1.0, 0.0, 0.0), 0.0);
        renderer.render(&mut device, &Screen::Game(state));

        assert_eq!(device.uniform("viewPos"), Some(UniformValue::Vec3([30.0, 30.0, 30.0])));
    }

    #[test]
    fn test_end_frame_draws_nothing() {
        let mut device = RecordingDevice::new();
        let renderer = renderer(&mut device);

        renderer.render(&mut device, &Screen::End);
        assert!(device.calls.is_empty());
    }

    #[test]
    fn test_start_frame_draws_one_quad_per_title_glyph() {
        let mut device = RecordingDevice::new();
        let renderer = renderer(&mut device);

        renderer.render(&mut device, &Screen::Start(TitlePulse::default()));

        assert_eq!(device.calls[0], Call::Clear([0.1, 0.1, 0.1, 1.0], ClearMask::COLOR));
        assert_eq!(device.draws().len(), "Raumschiff".len());
        assert_eq!(
            device.count(|c| matches!(c, Call::BufferSubData { target: BufferTarget::Vertex, .. })),
            "Raumschiff".len()
        );
        assert!(device.calls.contains(&Call::DepthTest(false)));
        assert_eq!(device.calls.last(), Some(&Call::AlphaBlending(false)));
        assert_eq!(device.uniform("text"), Some(UniformValue::Int(0)));
    }

    #[test]
    fn test_title_is_centered() {
        let mut device = RecordingDevice::new();
        let renderer = renderer(&mut device);

        renderer.render(&mut device, &Screen::Start(TitlePulse::default()));

        let first_quad = device.calls.iter().find_map(|c| match c {
            Call::BufferSubData { data, .. } => Some(data.clone()),
            _ => None,
        });
        // (800 - 25 * 10) / 2 plus the glyph's one pixel bearing
        assert_eq!(first_quad.unwrap()[0], 276.0);
    }

    #[test]
    fn test_lore_frame_draws_revealed_prefix_only() {
        let mut device = RecordingDevice::new();
        let renderer = renderer(&mut device);

        let mut reveal = TextReveal::new("abc\nabc", 0.1);
        reveal.advance(0.45);
        renderer.render(&mut device, &Screen::Lore(reveal));

        // "abc" plus the newline; the newline draws nothing
        assert_eq!(device.draws().len(), 3);
    }

    #[test]
    fn test_resize_updates_viewport_and_aspect() {
        let mut device = RecordingDevice::new();
        let mut renderer = renderer(&mut device);

        renderer.resize(&mut device, 1024, 512);
        assert_eq!(device.calls, vec![Call::Viewport(1024, 512)]);
        assert_eq!(renderer.aspect_ratio(), 2.0);
    }

    #[test]
    fn test_teardown_releases_everything_once() {
        let mut device = RecordingDevice::new();
        let mut renderer = renderer(&mut device);

        renderer.teardown(&mut device);
        // Three vertex arrays, four buffers, three programs, eleven glyphs
        assert_eq!(device.count(|c| matches!(c, Call::DeleteVertexArray(_))), 3);
        assert_eq!(device.count(|c| matches!(c, Call::DeleteBuffer(_))), 4);
        assert_eq!(device.count(|c| matches!(c, Call::DeleteProgram(_))), 3);
        assert_eq!(device.count(|c| matches!(c, Call::DeleteTexture(_))), 11);

        let released = device.calls.len();
        renderer.teardown(&mut device);
        assert_eq!(device.calls.len(), released);
    }

    #[test]
    fn test_failed_construction_releases_uploaded_buffers() {
        let mut device = RecordingDevice::new();
        // Enough for the mesh and axis sets, not the text quad
        device.allocation_budget = Some(5);

        let result = FrameRenderer::new(&mut device, &triangle_mesh(), &DemoConfig::default(), GlyphCache::empty(48.0));

        assert!(result.is_err());
        assert_eq!(device.count(|c| matches!(c, Call::DeleteVertexArray(_))), 2);
        assert_eq!(device.count(|c| matches!(c, Call::DeleteBuffer(_))), 3);
    }

    #[test]
    fn test_failed_construction_releases_glyph_textures() {
        let mut device = RecordingDevice::new();
        device.allocation_budget = Some(0);

        let result = FrameRenderer::new(&mut device, &triangle_mesh(), &DemoConfig::default(), glyphs());

        assert!(result.is_err());
        assert_eq!(device.count(|c| matches!(c, Call::DeleteTexture(_))), 11);
    }

    #[test]
    fn test_failed_program_build_releases_buffers_and_glyphs() {
        let mut device = RecordingDevice::new();
        // Mesh (3), axes (2) and text quad (2) fit; the first shader stage does not
        device.allocation_budget = Some(7);

        let result = FrameRenderer::new(&mut device, &triangle_mesh(), &DemoConfig::default(), glyphs());

        assert!(result.is_err());
        assert_eq!(device.count(|c| matches!(c, Call::DeleteVertexArray(_))), 3);
        assert_eq!(device.count(|c| matches!(c, Call::DeleteBuffer(_))), 4);
        assert_eq!(device.count(|c| matches!(c, Call::DeleteTexture(_))), 11);
    }
}
