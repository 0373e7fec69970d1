//! OBJ importer producing flat vertex/index buffers
//!
//! Parsing is delegated to `tobj`; this adapter only walks the parsed faces and
//! emits one interleaved vertex per corner.
//!
//! `tobj` fills in a neighbouring normal for corners written without one as
//! soon as the file has any `vn` data, so the source text is scanned once more
//! to learn which corners really carried a normal index.

use crate::render::{IndexedMesh, Vertex};
use std::io::BufRead;
use std::path::Path;
use thiserror::Error;

/// Errors raised while importing a model
#[derive(Error, Debug)]
pub enum ImportError {
    /// The OBJ data could not be read or parsed
    #[error("Failed to parse OBJ '{source_name}': {message}")]
    Parse {
        /// File path or buffer label
        source_name: String,
        /// Message reported by the reader or parser
        message: String,
    },

    /// The file parsed but contained no faces
    #[error("OBJ '{0}' contains no faces")]
    Empty(String),
}

/// Loader turning OBJ files into [`IndexedMesh`] values
pub struct ObjLoader;

impl ObjLoader {
    fn load_options() -> tobj::LoadOptions {
        tobj::LoadOptions {
            triangulate: true,
            single_index: false,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        }
    }

    /// Load an OBJ file from disk
    ///
    /// Material libraries are resolved next to the file; failing to load them
    /// is only a warning.
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<IndexedMesh, ImportError> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        log::info!("Importing mesh from {}", source_name);

        let source = std::fs::read_to_string(path).map_err(|e| ImportError::Parse {
            source_name: source_name.clone(),
            message: e.to_string(),
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

        let (models, materials) = tobj::load_obj_buf(&mut source.as_bytes(), &Self::load_options(), |mtl| {
            tobj::load_mtl(base_dir.join(mtl))
        })
        .map_err(|e| ImportError::Parse {
            source_name: source_name.clone(),
            message: e.to_string(),
        })?;

        if let Err(e) = materials {
            log::warn!("Materials for {} not loaded: {}", source_name, e);
        }

        Self::flatten(&source_name, &models, &corner_normal_flags(&source))
    }

    /// Load OBJ data from an in-memory reader
    ///
    /// Material libraries are not resolved for buffered sources.
    pub fn load_obj_from_reader<R: BufRead>(
        label: &str,
        reader: &mut R,
    ) -> Result<IndexedMesh, ImportError> {
        let mut source = String::new();
        reader.read_to_string(&mut source).map_err(|e| ImportError::Parse {
            source_name: label.to_string(),
            message: e.to_string(),
        })?;

        let (models, _materials) = tobj::load_obj_buf(&mut source.as_bytes(), &Self::load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .map_err(|e| ImportError::Parse {
            source_name: label.to_string(),
            message: e.to_string(),
        })?;

        Self::flatten(label, &models, &corner_normal_flags(&source))
    }

    /// Emit one vertex and one sequential index per face corner
    ///
    /// `has_normal` holds one flag per emitted corner across all models.
    fn flatten(
        source_name: &str,
        models: &[tobj::Model],
        has_normal: &[bool],
    ) -> Result<IndexedMesh, ImportError> {
        let corner_total: usize = models.iter().map(|model| model.mesh.indices.len()).sum();
        if corner_total != has_normal.len() {
            log::warn!(
                "{}: {} corners parsed but {} face corners scanned; unmatched corners get zero normals",
                source_name,
                corner_total,
                has_normal.len()
            );
        }

        let mut mesh = IndexedMesh::default();
        let mut flags = has_normal.iter().copied();

        for model in models {
            let source = &model.mesh;
            log::debug!(
                "Shape '{}': {} corners, {} normal indices",
                model.name,
                source.indices.len(),
                source.normal_indices.len()
            );

            for (corner, &position_index) in source.indices.iter().enumerate() {
                let position = read_vec3(&source.positions, position_index).ok_or_else(|| {
                    ImportError::Parse {
                        source_name: source_name.to_string(),
                        message: format!("position index {position_index} out of range"),
                    }
                })?;

                let normal = if flags.next().unwrap_or(false) {
                    source
                        .normal_indices
                        .get(corner)
                        .and_then(|&normal_index| read_vec3(&source.normals, normal_index))
                        .unwrap_or([0.0; 3])
                } else {
                    [0.0; 3]
                };

                mesh.push_corner(Vertex::new(position, normal));
            }
        }

        if mesh.is_empty() {
            return Err(ImportError::Empty(source_name.to_string()));
        }

        log::info!(
            "Imported {}: {} vertices, {} indices",
            source_name,
            mesh.vertex_count(),
            mesh.index_count()
        );
        Ok(mesh)
    }
}

/// Whether each corner emitted after fan triangulation names a normal
///
/// Walks `f` statements in file order, which is the order `tobj` emits
/// corners in. Faces with fewer than three corners are skipped like the
/// loader skips points and lines.
fn corner_normal_flags(source: &str) -> Vec<bool> {
    let mut flags = Vec::new();

    for line in source.lines() {
        let mut words = line.split_whitespace();
        if words.next() != Some("f") {
            continue;
        }

        let face: Vec<bool> = words
            .map(|corner| corner.split('/').nth(2).is_some_and(|normal| !normal.is_empty()))
            .collect();
        if face.len() < 3 {
            continue;
        }

        for i in 1..face.len() - 1 {
            flags.extend([face[0], face[i], face[i + 1]]);
        }
    }

    flags
}

fn read_vec3(data: &[f32], index: u32) -> Option<[f32; 3]> {
    let start = index as usize * 3;
    data.get(start..start + 3).map(|v| [v[0], v[1], v[2]])
}
