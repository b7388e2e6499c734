//! Per-tick input contract. Decoding (keyboard, pointer picking, UI) happens
//! outside the core; by the time inputs reach the rig they are plain values.

use serde::{Deserialize, Serialize};

/// Discrete jump/teleport request onto a picked surface.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct JumpCommand {
    /// Impact point on the target surface, world space.
    pub point: [f32; 3],
    /// Surface normal at the impact point.
    pub normal: [f32; 3],
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Inputs {
    /// Body-local movement axis: x = strafe, y = forward. Clamped to unit
    /// length when longer.
    pub move_axis: [f32; 2],
    /// Turn-in-place input in [-1, 1].
    pub turn: f32,
    /// Optional jump request for this tick.
    pub jump_to: Option<JumpCommand>,
}
