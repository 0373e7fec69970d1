//! Per-frame transform pipeline
//!
//! Model, view and projection are recomputed from scratch every frame from
//! the current [`TransformState`]; nothing accumulates between frames.

use crate::config::CameraConfig;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Fixed reorientation applied before any movement: the asset's +Y up axis
/// becomes +Z
const REORIENT_DEGREES: f32 = 90.0;

/// Model position and heading, driven by input on the game screen
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformState {
    /// Translation in the reoriented model frame
    pub translation: Vec3,
    /// Heading in radians about the reoriented vertical axis
    pub yaw: f32,
}

impl TransformState {
    /// Create a state
    pub fn new(translation: Vec3, yaw: f32) -> Self {
        Self { translation, yaw }
    }
}

/// Fixed camera placement and lens
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    /// Camera position; it never moves with the model
    pub offset: Vec3,
    /// View up vector
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Near plane
    pub near: f32,
    /// Far plane
    pub far: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::from(&CameraConfig::default())
    }
}

impl From<&CameraConfig> for CameraRig {
    fn from(config: &CameraConfig) -> Self {
        Self {
            offset: Vec3::from(config.offset),
            up: Vec3::from(config.up),
            fov_y_degrees: config.fov_y_degrees,
            near: config.near,
            far: config.far,
        }
    }
}

/// Matrices for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMatrices {
    /// Model to world
    pub model: Mat4,
    /// World to camera
    pub view: Mat4,
    /// Camera to clip
    pub projection: Mat4,
    /// Camera position in world space, for specular lighting
    pub camera_position: Vec3,
}

impl FrameMatrices {
    /// Compute all matrices for the current state
    pub fn compute(state: &TransformState, camera: &CameraRig, aspect: f32) -> Self {
        Self {
            model: model_matrix(state),
            view: view_matrix(state, camera),
            projection: projection_matrix(camera, aspect),
            camera_position: camera.offset,
        }
    }
}

/// Reorient, then translate, then yaw; the order is significant
pub fn model_matrix(state: &TransformState) -> Mat4 {
    Mat4::identity()
        * Mat4::rotation_x(utils::deg_to_rad(REORIENT_DEGREES))
        * Mat4::new_translation(&state.translation)
        * Mat4::rotation_z(state.yaw)
}

/// Look from the fixed camera offset toward the model's translation
pub fn view_matrix(state: &TransformState, camera: &CameraRig) -> Mat4 {
    Mat4::look_at(camera.offset, state.translation, camera.up)
}

/// Perspective projection for the given aspect ratio
pub fn projection_matrix(camera: &CameraRig, aspect: f32) -> Mat4 {
    Mat4::perspective(utils::deg_to_rad(camera.fov_y_degrees), aspect, camera.near, camera.far)
}
