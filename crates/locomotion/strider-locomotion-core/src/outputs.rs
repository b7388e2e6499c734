//! Per-tick output snapshot, refilled in place every update. Consumers
//! (marker instancing, IK-driven mesh rigs, cameras) read from here; the core
//! never renders anything itself.

use nalgebra::{UnitQuaternion, Vector3};

use crate::leg::LegStateKind;
use crate::solver::LimbPose;

#[derive(Clone, Copy, Debug)]
pub struct BodyOutput {
    pub position: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub in_flight: bool,
}

impl Default for BodyOutput {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            in_flight: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LegOutput {
    /// Current foot world position.
    pub foot_position: Vector3<f32>,
    /// Orientation aimed from the foot at the leg's aim node.
    pub foot_rotation: UnitQuaternion<f32>,
    /// Solved joint rotations for the two-segment limb.
    pub limb: LimbPose,
    pub state: LegStateKind,
}

#[derive(Debug, Default)]
pub struct Outputs {
    pub body: BodyOutput,
    pub legs: Vec<LegOutput>,
}

impl Outputs {
    pub fn clear(&mut self) {
        self.legs.clear();
    }
}
