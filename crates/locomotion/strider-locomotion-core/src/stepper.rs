//! Cross-leg stepping coordination: desired-foothold computation, the
//! planted/swing/tuck/landing transition function for every leg, and the
//! movement-start burst that guarantees the gait begins already alternating.

use std::f32::consts::PI;

use nalgebra::Vector3;

use crate::config::RigConfig;
use crate::gait::GaitClock;
use crate::leg::{desired_foothold, Leg, LegState, NO_PENDING};
use crate::math::{smooth_damp, wrap01};
use crate::node::{NodeArena, NodeId};
use crate::query::SceneQuery;

#[derive(Debug)]
pub struct Stepper {
    legs: Vec<Leg>,
    was_moving: bool,
    was_jumping: bool,
    landing_remaining: f32,
    /// Per-tick desired footholds, reused across ticks.
    desired: Vec<Vector3<f32>>,
}

impl Stepper {
    pub fn new(legs: Vec<Leg>) -> Self {
        let n = legs.len();
        Self {
            legs,
            was_moving: false,
            was_jumping: false,
            landing_remaining: 0.0,
            desired: Vec::with_capacity(n),
        }
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Initialize feet to their current raycast results so the rig does not
    /// pop on the first tick.
    pub fn init_feet(&mut self, nodes: &NodeArena, scene: &dyn SceneQuery, cfg: &RigConfig) {
        for leg in &mut self.legs {
            let desired = desired_foothold(nodes, leg.anchor, leg.aim, scene, cfg);
            leg.foot = desired;
            leg.foot_velocity = Vector3::zeros();
            leg.state = LegState::Planted;
            leg.pending_swing_at = NO_PENDING;
        }
    }

    /// Advance every leg by one tick. `in_flight` is the body controller's
    /// state after its own update this tick; `support_up` is the up axis of
    /// the frame the body floats in, used for the swing arc.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        nodes: &NodeArena,
        body: NodeId,
        scene: &dyn SceneQuery,
        clock: &GaitClock,
        support_up: Vector3<f32>,
        time: f32,
        dt: f32,
        in_flight: bool,
        cfg: &RigConfig,
    ) {
        let n = self.legs.len();
        for (i, leg) in self.legs.iter_mut().enumerate() {
            leg.phase_offset = wrap01(cfg.phase_offsets.get(i).copied().unwrap_or(0.0));
        }

        // Desired positions for all legs up front, so movement start can be
        // detected across the whole body.
        self.desired.clear();
        for (i, leg) in self.legs.iter().enumerate() {
            let p = if in_flight {
                let mut offset = Vector3::from(cfg.tuck_offset);
                // second half of the leg list is the opposite side
                if i >= n / 2 {
                    offset.x = -offset.x;
                }
                nodes.world_position(leg.anchor) + nodes.transform_vector(body, offset)
            } else {
                desired_foothold(nodes, leg.anchor, leg.aim, scene, cfg)
            };
            self.desired.push(p);
        }

        // Jump just ended: start the landing blend so feet resettle instead
        // of snapping or spuriously swinging.
        if !in_flight && self.was_jumping {
            self.landing_remaining = cfg.landing_blend_time.max(0.0);
            for leg in &mut self.legs {
                leg.state = LegState::Landing { from: leg.foot };
                leg.foot_velocity = Vector3::zeros();
                leg.pending_swing_at = NO_PENDING;
            }
            self.was_moving = false;
        }
        if self.landing_remaining > 0.0 {
            self.landing_remaining = (self.landing_remaining - dt).max(0.0);
        }

        // Stationary-to-moving transition across all legs.
        if !in_flight {
            let moving_now = self
                .legs
                .iter()
                .zip(&self.desired)
                .any(|(leg, d)| (d - leg.foot).norm() > cfg.step_threshold * 0.5);
            if moving_now && !self.was_moving && self.landing_remaining <= 0.0 {
                self.on_movement_start(time, cfg);
            }
            self.was_moving = moving_now;
        }

        for i in 0..n {
            let desired = self.desired[i];
            let leg = &mut self.legs[i];

            if in_flight {
                leg.state = LegState::Tucked;
                leg.foot = smooth_damp(
                    leg.foot,
                    desired,
                    &mut leg.foot_velocity,
                    cfg.tuck_smooth_time,
                    dt,
                );
                leg.pending_swing_at = NO_PENDING;
                continue;
            }

            match leg.state {
                LegState::Landing { from } if self.landing_remaining > 0.0 => {
                    let t = 1.0 - self.landing_remaining / cfg.landing_blend_time.max(1e-4);
                    leg.foot = from.lerp(&desired, t);
                    leg.foot_velocity = Vector3::zeros();
                }
                LegState::Landing { .. } => {
                    leg.foot = desired;
                    leg.foot_velocity = Vector3::zeros();
                    leg.state = LegState::Planted;
                }
                LegState::Swinging {
                    start,
                    target,
                    progress,
                } => {
                    let progress = progress + dt * cfg.step_speed;
                    let p = progress.clamp(0.0, 1.0);
                    let horizontal = start.lerp(&target, p);
                    leg.foot = horizontal + support_up * ((p * PI).sin() * cfg.step_height);
                    if p >= 1.0 {
                        leg.foot = target;
                        leg.foot_velocity = Vector3::zeros();
                        leg.state = LegState::Planted;
                    } else {
                        leg.state = LegState::Swinging {
                            start,
                            target,
                            progress,
                        };
                    }
                }
                LegState::Planted => {
                    let delta = desired - leg.foot;
                    let dist = delta.norm();
                    // decompose against the anchor frame so strafing steps
                    // sooner than walking
                    let lateral = delta.dot(&nodes.right(leg.anchor));
                    let forward = delta.dot(&nodes.forward(leg.anchor));
                    let lateral_too_far = lateral.abs() > cfg.step_threshold * 0.5;
                    let forward_too_far = forward.abs() > cfg.step_threshold;

                    if dist > cfg.step_threshold || lateral_too_far || forward_too_far {
                        // Only a deadline scheduled at movement start may
                        // bypass the window; a displacement breach alone
                        // waits for the leg's phase slot.
                        let pending_due =
                            leg.pending_swing_at >= 0.0 && time >= leg.pending_swing_at;
                        let window_open =
                            cfg.phase_offsets.is_empty() || clock.window_open(leg.phase_offset);
                        if pending_due || window_open {
                            leg.begin_swing(desired);
                        }
                    } else {
                        leg.foot = smooth_damp(
                            leg.foot,
                            desired,
                            &mut leg.foot_velocity,
                            cfg.smooth_time,
                            dt,
                        );
                    }
                }
                // Jump ended without a landing transition (state carried in
                // from outside); resettle as planted.
                LegState::Tucked => {
                    leg.state = LegState::Planted;
                }
            }
        }

        self.was_jumping = in_flight;
    }

    /// Movement just started: partition legs into two groups and stagger
    /// their first steps so the gait begins alternating instead of every leg
    /// lifting at once.
    fn on_movement_start(&mut self, time: f32, cfg: &RigConfig) {
        let n = self.legs.len();
        let half_cycle = GaitClock::half_cycle(cfg);
        let offsets_match = cfg.phase_offsets.len() == n;

        for leg in &mut self.legs {
            leg.pending_swing_at = NO_PENDING;
        }
        for i in 0..n {
            let desired = self.desired[i];
            let leg = &mut self.legs[i];
            if (desired - leg.foot).norm() <= cfg.step_threshold {
                continue;
            }
            let group = if offsets_match {
                usize::from(cfg.phase_offsets[i] >= 0.5)
            } else {
                i % 2
            };
            if group == 0 {
                leg.begin_swing(desired);
            } else {
                leg.pending_swing_at = time + half_cycle;
            }
        }
    }
}
