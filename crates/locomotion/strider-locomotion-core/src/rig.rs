//! The rig ties the stack together and enforces the per-tick ordering: body
//! pose first, then one gait clock sample shared by every leg, then the leg
//! state machines, then the limb solves into the output snapshot.

use nalgebra::Vector3;

use crate::body::BodyController;
use crate::config::RigConfig;
use crate::error::RigError;
use crate::gait::GaitClock;
use crate::inputs::Inputs;
use crate::leg::Leg;
use crate::math::look_rotation;
use crate::node::{NodeArena, NodeId};
use crate::outputs::{BodyOutput, LegOutput, Outputs};
use crate::query::SceneQuery;
use crate::solver::solve_two_bone;
use crate::stepper::Stepper;

/// Fixed segment lengths of one two-bone limb; immutable design-time data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LimbSpec {
    pub r1: f32,
    pub r2: f32,
}

#[derive(Debug)]
pub struct Rig {
    nodes: NodeArena,
    body: NodeId,
    aims: Vec<NodeId>,
    probes: Vec<NodeId>,
    limbs: Vec<LimbSpec>,
    cfg: RigConfig,
    body_ctl: BodyController,
    stepper: Stepper,
    time: f32,
    feet_initialized: bool,
    outputs: Outputs,
}

impl Rig {
    /// Build a rig from scene nodes. `anchors`, `aims` and `limbs` must agree
    /// in length; a mismatch is logged and the rig operates on the shortest
    /// common length. `probes` defaults to the anchors when empty.
    pub fn new(
        nodes: NodeArena,
        body: NodeId,
        anchors: Vec<NodeId>,
        aims: Vec<NodeId>,
        probes: Vec<NodeId>,
        limbs: Vec<LimbSpec>,
        cfg: RigConfig,
    ) -> Result<Self, RigError> {
        if anchors.len() != aims.len() {
            log::warn!(
                "anchor count ({}) != aim count ({}); using the shorter",
                anchors.len(),
                aims.len()
            );
        }
        let mut leg_count = anchors.len().min(aims.len());
        if limbs.len() != leg_count {
            log::warn!(
                "limb count ({}) != leg count ({}); using the shorter",
                limbs.len(),
                leg_count
            );
            leg_count = leg_count.min(limbs.len());
        }
        if leg_count == 0 {
            return Err(RigError::NoLegs {
                anchors: anchors.len(),
                aims: aims.len(),
                limbs: limbs.len(),
            });
        }
        if !cfg.phase_offsets.is_empty() && cfg.phase_offsets.len() != leg_count {
            log::warn!(
                "phase offset count ({}) != leg count ({}); missing offsets default to 0",
                cfg.phase_offsets.len(),
                leg_count
            );
        }
        for &id in anchors
            .iter()
            .chain(aims.iter())
            .chain(probes.iter())
            .chain(std::iter::once(&body))
        {
            if !nodes.contains(id) {
                return Err(RigError::UnknownNode(id));
            }
        }

        let aims: Vec<NodeId> = aims.into_iter().take(leg_count).collect();
        let legs: Vec<Leg> = anchors
            .iter()
            .take(leg_count)
            .zip(&aims)
            .map(|(&anchor, &aim)| Leg::new(anchor, aim))
            .collect();
        let probes = if probes.is_empty() {
            anchors.into_iter().take(leg_count).collect()
        } else {
            probes
        };
        let limbs: Vec<LimbSpec> = limbs.into_iter().take(leg_count).collect();
        let body_ctl = BodyController::new(&nodes, body, &aims);

        Ok(Self {
            nodes,
            body,
            aims,
            probes,
            limbs,
            cfg,
            body_ctl,
            stepper: Stepper::new(legs),
            time: 0.0,
            feet_initialized: false,
            outputs: Outputs::default(),
        })
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn nodes(&self) -> &NodeArena {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut NodeArena {
        &mut self.nodes
    }

    pub fn legs(&self) -> &[Leg] {
        self.stepper.legs()
    }

    pub fn config(&self) -> &RigConfig {
        &self.cfg
    }

    /// Tunables are live; changes apply from the next tick.
    pub fn config_mut(&mut self) -> &mut RigConfig {
        &mut self.cfg
    }

    pub fn in_flight(&self) -> bool {
        self.body_ctl.in_flight()
    }

    /// Re-record the aim nodes' body-relative offsets (after repositioning
    /// aim points in the scene).
    pub fn capture_aim_offsets(&mut self) {
        self.body_ctl
            .capture_aim_offsets(&self.nodes, self.body, &self.aims);
    }

    /// Advance the whole rig by `dt` seconds of simulated time.
    pub fn update(&mut self, dt: f32, inputs: &Inputs, scene: &dyn SceneQuery) -> &Outputs {
        // Feet start on their raycast results so the first tick does not pop.
        if !self.feet_initialized {
            self.stepper.init_feet(&self.nodes, scene, &self.cfg);
            self.feet_initialized = true;
        }
        self.time += dt;

        // 1) body pose (translation, floating/leveling or jump flight)
        self.body_ctl.update(
            &mut self.nodes,
            self.body,
            &self.aims,
            &self.probes,
            inputs,
            scene,
            dt,
            &self.cfg,
        );
        let in_flight = self.body_ctl.in_flight();

        // 2) one clock sample shared by every leg this tick
        let clock = GaitClock::sample(self.time, &self.cfg);

        // 3) leg state machines against the frozen body pose and clock
        let support_up = match self.nodes.parent(self.body) {
            Some(p) => self.nodes.up(p),
            None => Vector3::y(),
        };
        self.stepper.update(
            &self.nodes,
            self.body,
            scene,
            &clock,
            support_up,
            self.time,
            dt,
            in_flight,
            &self.cfg,
        );

        // 4) limb solves + output snapshot
        self.outputs.clear();
        self.outputs.body = BodyOutput {
            position: self.nodes.world_position(self.body),
            rotation: self.nodes.world_rotation(self.body),
            in_flight,
        };
        let body_up = self.nodes.up(self.body);
        for (leg, limb) in self.stepper.legs().iter().zip(&self.limbs) {
            let root = self.nodes.world_position(leg.anchor);
            let pose = solve_two_bone(
                root,
                leg.foot,
                limb.r1,
                limb.r2,
                body_up,
                self.nodes.forward(leg.anchor),
            );
            let aim_dir = self.nodes.world_position(leg.aim) - leg.foot;
            let foot_rotation = if aim_dir.norm_squared() < 1e-8 {
                self.nodes.world_rotation(self.body)
            } else {
                look_rotation(aim_dir, body_up)
            };
            self.outputs.legs.push(LegOutput {
                foot_position: leg.foot,
                foot_rotation,
                limb: pose,
                state: leg.state.kind(),
            });
        }

        &self.outputs
    }
}
