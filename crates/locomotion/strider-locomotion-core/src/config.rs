//! Rig configuration. Every field is a live-mutable designer tunable; the
//! only validation anywhere is array-length agreement at rig construction,
//! which logs a warning and continues on the shortest common length.

use serde::{Deserialize, Serialize};

use crate::query::{LayerMask, ALL_LAYERS};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RigConfig {
    // -- leg raycasts --
    /// Maximum distance of the anchor->aim foothold ray.
    pub max_ray_distance: f32,
    /// Layers the foothold rays may hit.
    pub leg_mask: LayerMask,

    // -- stepping --
    /// Displacement between desired and current foothold that triggers a step.
    pub step_threshold: f32,
    /// Height of the swing arc.
    pub step_height: f32,
    /// Swing progress rate in units per second (larger = faster step).
    pub step_speed: f32,
    /// Gait cycle frequency in cycles per second.
    pub gait_cycle_frequency: f32,
    /// Fraction of the gait cycle during which a leg may start a step (0-1).
    pub step_window: f32,
    /// Per-leg phase offsets in [0, 1). Empty = every leg always eligible.
    pub phase_offsets: Vec<f32>,

    // -- foot smoothing --
    /// Time constant for planted-foot drift absorption.
    pub smooth_time: f32,
    /// Faster time constant used while feet tuck during a jump.
    pub tuck_smooth_time: f32,
    /// Body-local offset from each anchor used while tucking; x is mirrored
    /// for legs in the second half of the leg list.
    pub tuck_offset: [f32; 3],
    /// Duration of the post-landing linear resettle.
    pub landing_blend_time: f32,

    // -- body translation --
    pub move_speed: f32,
    /// Time constant for body position smoothing.
    pub position_smooth_time: f32,
    /// Turn-in-place rate in degrees per second.
    pub rotation_speed: f32,
    /// Time constant for aim points following the body.
    pub aim_smooth_time: f32,

    // -- body floating / leveling --
    pub enable_body_float: bool,
    /// Rest height above the averaged ground plane, along its normal.
    pub body_height_offset: f32,
    pub body_height_smooth_time: f32,
    /// Leveling slerp rate (per second, applied as 1 - exp(-rate * dt)).
    pub body_rotation_smooth_speed: f32,
    /// Height above each probe at which its downward ray starts.
    pub probe_start_height: f32,
    /// Maximum probe ray distance past the start height.
    pub probe_distance: f32,
    pub ground_mask: LayerMask,

    // -- collision / wall climb / jump --
    pub enable_wall_climb: bool,
    /// Bounding-sphere radius swept along the motion delta; also sets how far
    /// the body is clamped off contacted geometry.
    pub body_radius: f32,
    pub collision_mask: LayerMask,
    /// Averaged surface normals with |y| below this are treated as walls.
    pub climb_normal_threshold: f32,
    pub jump_duration: f32,
    pub jump_arc_height: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            max_ray_distance: 2.0,
            leg_mask: ALL_LAYERS,

            step_threshold: 0.35,
            step_height: 0.15,
            step_speed: 4.0,
            gait_cycle_frequency: 1.0,
            step_window: 0.25,
            phase_offsets: Vec::new(),

            smooth_time: 0.08,
            tuck_smooth_time: 0.05,
            tuck_offset: [0.0, -0.1, 0.0],
            landing_blend_time: 0.15,

            move_speed: 2.0,
            position_smooth_time: 0.12,
            rotation_speed: 720.0,
            aim_smooth_time: 0.08,

            enable_body_float: true,
            body_height_offset: 0.5,
            body_height_smooth_time: 0.12,
            body_rotation_smooth_speed: 8.0,
            probe_start_height: 1.0,
            probe_distance: 2.0,
            ground_mask: ALL_LAYERS,

            enable_wall_climb: true,
            body_radius: 0.5,
            collision_mask: ALL_LAYERS,
            climb_normal_threshold: 0.6,
            jump_duration: 0.6,
            jump_arc_height: 0.6,
        }
    }
}

impl RigConfig {
    /// Fill `phase_offsets` with an alternating two-group (tripod-style)
    /// gait: even legs at 0.0, odd legs at 0.5.
    pub fn fill_tripod_phases(&mut self, leg_count: usize) {
        self.phase_offsets = (0..leg_count)
            .map(|i| if i % 2 == 0 { 0.0 } else { 0.5 })
            .collect();
    }
}
