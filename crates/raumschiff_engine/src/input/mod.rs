//! Per-frame input handling
//!
//! Keyboard state is sampled once per frame into an [`InputSnapshot`]; the
//! rest of the engine never talks to the window directly.

use crate::config::ControlConfig;
use crate::render::TransformState;

/// Keys held during the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSnapshot {
    /// Escape: request window close
    pub close: bool,
    /// Up arrow
    pub up: bool,
    /// Down arrow
    pub down: bool,
    /// Left arrow
    pub left: bool,
    /// Right arrow
    pub right: bool,
    /// Q: yaw counter-clockwise
    pub yaw_left: bool,
    /// E: yaw clockwise
    pub yaw_right: bool,
    /// Enter: leave the start or lore screen
    pub confirm: bool,
}

impl InputSnapshot {
    /// Snapshot with only the confirm key held
    pub fn confirm() -> Self {
        Self {
            confirm: true,
            ..Self::default()
        }
    }
}

/// Move and turn the model by one frame's worth of held keys
///
/// Up/Down move along -X/+X, Left/Right along +Z/-Z of the model frame.
pub fn apply_movement(
    mut state: TransformState,
    input: &InputSnapshot,
    controls: &ControlConfig,
) -> TransformState {
    let speed = controls.movement_speed;
    if input.up {
        state.translation.x -= speed;
    }
    if input.down {
        state.translation.x += speed;
    }
    if input.left {
        state.translation.z += speed;
    }
    if input.right {
        state.translation.z -= speed;
    }
    if input.yaw_left {
        state.yaw += controls.rotation_speed;
    }
    if input.yaw_right {
        state.yaw -= controls.rotation_speed;
    }
    state
}
