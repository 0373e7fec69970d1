//! Shader program management
//!
//! Programs are built once at startup from embedded GLSL. Compile and link
//! problems are logged with the driver's info log but never abort: the program
//! handle is returned either way and simply renders nothing useful.

use super::device::{DeviceResult, GraphicsDevice, ProgramId, ShaderStage};

const LIT_MESH_VERT: &str = include_str!("../../shaders/lit_mesh.vert");
const LIT_MESH_FRAG: &str = include_str!("../../shaders/lit_mesh.frag");
const AXES_VERT: &str = include_str!("../../shaders/axes.vert");
const AXES_FRAG: &str = include_str!("../../shaders/axes.frag");
const TEXT_VERT: &str = include_str!("../../shaders/text.vert");
const TEXT_FRAG: &str = include_str!("../../shaders/text.frag");

/// A linked (or failed-to-link) program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProgram {
    /// Device handle
    pub id: ProgramId,
    /// Label used in diagnostics
    pub label: &'static str,
    /// Whether both stages compiled and the program linked
    pub linked: bool,
}

impl ShaderProgram {
    /// Compile both stages and link them
    ///
    /// Only a failure to allocate the shader or program objects is an error.
    pub fn build(
        device: &mut dyn GraphicsDevice,
        label: &'static str,
        vertex_source: &str,
        fragment_source: &str,
    ) -> DeviceResult<Self> {
        let vertex = device.create_shader(ShaderStage::Vertex)?;
        let fragment = match device.create_shader(ShaderStage::Fragment) {
            Ok(fragment) => fragment,
            Err(e) => {
                device.delete_shader(vertex);
                return Err(e);
            }
        };

        let mut linked = true;
        for (shader, stage, source) in [
            (vertex, "vertex", vertex_source),
            (fragment, "fragment", fragment_source),
        ] {
            let status = device.compile_shader(shader, source);
            if !status.success {
                linked = false;
                log::error!("{} {} shader compilation failed: {}", label, stage, status.log.trim());
            }
        }

        let program = device.create_program();
        if let Ok(id) = program {
            let status = device.link_program(id, &[vertex, fragment]);
            if !status.success {
                linked = false;
                log::error!("{} program linking failed: {}", label, status.log.trim());
            }
        }

        device.delete_shader(vertex);
        device.delete_shader(fragment);

        let id = program?;
        log::debug!("Built {} program {:?} (linked: {})", label, id, linked);
        Ok(Self { id, label, linked })
    }

    /// Make this program current
    pub fn bind(&self, device: &mut dyn GraphicsDevice) {
        device.use_program(Some(self.id));
    }
}

/// The three programs the demo renders with
#[derive(Debug)]
pub struct ProgramSet {
    /// Phong-lit mesh
    pub lit_mesh: ShaderProgram,
    /// Colored axis lines
    pub axes: ShaderProgram,
    /// Textured glyph quads
    pub text: ShaderProgram,
}

impl ProgramSet {
    /// Build all programs
    ///
    /// If one cannot be allocated, the ones already built are deleted.
    pub fn build(device: &mut dyn GraphicsDevice) -> DeviceResult<Self> {
        let lit_mesh = ShaderProgram::build(device, "lit mesh", LIT_MESH_VERT, LIT_MESH_FRAG)?;
        let axes = match ShaderProgram::build(device, "axes", AXES_VERT, AXES_FRAG) {
            Ok(axes) => axes,
            Err(e) => {
                release(device, &[lit_mesh]);
                return Err(e);
            }
        };
        let text = match ShaderProgram::build(device, "text", TEXT_VERT, TEXT_FRAG) {
            Ok(text) => text,
            Err(e) => {
                release(device, &[lit_mesh, axes]);
                return Err(e);
            }
        };
        Ok(Self { lit_mesh, axes, text })
    }

    /// Release all programs
    pub fn teardown(&self, device: &mut dyn GraphicsDevice) {
        release(device, &[self.lit_mesh, self.axes, self.text]);
    }
}

fn release(device: &mut dyn GraphicsDevice, programs: &[ShaderProgram]) {
    for program in programs {
        device.delete_program(program.id);
    }
}
