//! Per-leg stepping state.
//!
//! A leg owns its foot position across frames and is always in exactly one
//! mode: planted (tracking small drift through a smoothing filter), swinging
//! along a fixed-duration arc, tucked against the body during a jump, or
//! blending back down right after landing. All transitions happen in
//! [`crate::stepper::Stepper::update`], once per tick.

use nalgebra::Vector3;

use crate::config::RigConfig;
use crate::node::{NodeArena, NodeId};
use crate::query::SceneQuery;

/// Sentinel for "no pending swing scheduled".
pub(crate) const NO_PENDING: f32 = -1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LegState {
    /// Foot holds its ground contact, absorbing small target drift.
    Planted,
    /// Foot arcs from `start` to `target`; `progress` is monotonic in [0, 1].
    Swinging {
        start: Vector3<f32>,
        target: Vector3<f32>,
        progress: f32,
    },
    /// Foot is pulled toward a body-relative offset while the body jumps.
    Tucked,
    /// Foot blends linearly from `from` back to the desired foothold for a
    /// fixed duration after a jump ends.
    Landing { from: Vector3<f32> },
}

/// Discriminant-only view of [`LegState`], exposed through outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegStateKind {
    Planted,
    Swinging,
    Tucked,
    Landing,
}

impl LegState {
    pub fn kind(&self) -> LegStateKind {
        match self {
            LegState::Planted => LegStateKind::Planted,
            LegState::Swinging { .. } => LegStateKind::Swinging,
            LegState::Tucked => LegStateKind::Tucked,
            LegState::Landing { .. } => LegStateKind::Landing,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Leg {
    /// Fixed mount point on the body; origin of the foothold ray.
    pub anchor: NodeId,
    /// Node whose position defines the desired cast direction.
    pub aim: NodeId,
    /// Current foot world position, continuous across frames.
    pub foot: Vector3<f32>,
    /// Filter state for the planted/tucked smoothing; reset on every discrete
    /// mode change.
    pub(crate) foot_velocity: Vector3<f32>,
    pub state: LegState,
    /// Absolute simulated-time deadline for a scheduled swing start;
    /// [`NO_PENDING`] when none.
    pub(crate) pending_swing_at: f32,
    /// Phase slot in [0, 1), synced from the config each tick.
    pub phase_offset: f32,
}

impl Leg {
    pub fn new(anchor: NodeId, aim: NodeId) -> Self {
        Self {
            anchor,
            aim,
            foot: Vector3::zeros(),
            foot_velocity: Vector3::zeros(),
            state: LegState::Planted,
            pending_swing_at: NO_PENDING,
            phase_offset: 0.0,
        }
    }

    /// Current smoothing-filter velocity (observability for tests/tools).
    pub fn foot_velocity(&self) -> Vector3<f32> {
        self.foot_velocity
    }

    pub(crate) fn begin_swing(&mut self, target: Vector3<f32>) {
        self.state = LegState::Swinging {
            start: self.foot,
            target,
            progress: 0.0,
        };
        self.pending_swing_at = NO_PENDING;
    }
}

/// Desired foothold for one leg: first hit of the ray from the anchor toward
/// the aim node. Falls back to the anchor's forward axis when anchor and aim
/// coincide, and to the max-distance point when the ray misses.
pub fn desired_foothold(
    nodes: &NodeArena,
    anchor: NodeId,
    aim: NodeId,
    scene: &dyn SceneQuery,
    cfg: &RigConfig,
) -> Vector3<f32> {
    let origin = nodes.world_position(anchor);
    let mut dir = nodes.world_position(aim) - origin;
    let dist = dir.norm();
    if dist <= 1e-4 {
        dir = nodes.forward(anchor);
    } else {
        dir /= dist;
    }
    match scene.cast_ray(origin, dir, cfg.max_ray_distance, cfg.leg_mask) {
        Some(hit) => hit.point,
        None => origin + dir * cfg.max_ray_distance,
    }
}
