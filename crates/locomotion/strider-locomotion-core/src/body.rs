//! Body floating, leveling and jump control.
//!
//! While grounded the body translates through a critically-damped filter with
//! sphere-sweep collision clamping, floats at a configured offset above the
//! averaged ground-probe plane, levels toward the supporting surface normal
//! (preferring a wall normal when the probed surface is steep), and keeps the
//! per-leg aim points tracking their body-relative offsets. A jump suspends
//! all of that and flies a fixed-duration ballistic arc to a target pose.

use std::f32::consts::PI;

use nalgebra::{UnitQuaternion, Vector3};

use crate::config::RigConfig;
use crate::inputs::Inputs;
use crate::math::{
    look_rotation, normalize_or, project_on_plane, smooth_damp, smooth_damp_f32, smooth_step,
};
use crate::node::{NodeArena, NodeId};
use crate::query::SceneQuery;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BodyState {
    Grounded,
    InFlight {
        start_pos: Vector3<f32>,
        target_pos: Vector3<f32>,
        start_rot: UnitQuaternion<f32>,
        target_rot: UnitQuaternion<f32>,
        elapsed: f32,
    },
}

#[derive(Debug)]
pub struct BodyController {
    pub state: BodyState,
    velocity: Vector3<f32>,
    vertical_velocity: f32,
    /// Captured body-local offsets of the aim nodes.
    aim_offsets: Vec<Vector3<f32>>,
    aim_velocities: Vec<Vector3<f32>>,
}

impl BodyController {
    pub fn new(nodes: &NodeArena, body: NodeId, aims: &[NodeId]) -> Self {
        let mut ctl = Self {
            state: BodyState::Grounded,
            velocity: Vector3::zeros(),
            vertical_velocity: 0.0,
            aim_offsets: Vec::new(),
            aim_velocities: Vec::new(),
        };
        ctl.capture_aim_offsets(nodes, body, aims);
        ctl
    }

    pub fn in_flight(&self) -> bool {
        matches!(self.state, BodyState::InFlight { .. })
    }

    /// Record the current aim-node positions as body-local offsets; they are
    /// re-applied (smoothed) as the body moves and rotates.
    pub fn capture_aim_offsets(&mut self, nodes: &NodeArena, body: NodeId, aims: &[NodeId]) {
        self.aim_offsets = aims
            .iter()
            .map(|&aim| nodes.inverse_transform_point(body, nodes.world_position(aim)))
            .collect();
        self.aim_velocities = vec![Vector3::zeros(); aims.len()];
    }

    /// Begin a ballistic transition onto the surface at `point` with `normal`.
    /// The target pose sits `body_height_offset` along the normal, keeping the
    /// current forward direction projected onto the target plane (projecting
    /// the up axis instead when forward degenerates).
    pub fn start_jump(
        &mut self,
        nodes: &NodeArena,
        body: NodeId,
        point: Vector3<f32>,
        normal: Vector3<f32>,
        cfg: &RigConfig,
    ) {
        let n = normalize_or(normal, Vector3::y());
        let start_pos = nodes.world_position(body);
        let target_pos = point + n * cfg.body_height_offset;
        let start_rot = nodes.world_rotation(body);
        let mut forward = project_on_plane(nodes.forward(body), n);
        if forward.norm_squared() < 1e-4 {
            forward = project_on_plane(nodes.up(body), n);
        }
        let target_rot = look_rotation(forward, n);
        self.state = BodyState::InFlight {
            start_pos,
            target_pos,
            start_rot,
            target_rot,
            elapsed: 0.0,
        };
    }

    /// One body tick. Must run before the legs are updated so they read a
    /// settled body pose.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        nodes: &mut NodeArena,
        body: NodeId,
        aims: &[NodeId],
        probes: &[NodeId],
        inputs: &Inputs,
        scene: &dyn SceneQuery,
        dt: f32,
        cfg: &RigConfig,
    ) {
        if let Some(cmd) = &inputs.jump_to {
            self.start_jump(
                nodes,
                body,
                Vector3::from(cmd.point),
                Vector3::from(cmd.normal),
                cfg,
            );
        }

        if let BodyState::InFlight {
            start_pos,
            target_pos,
            start_rot,
            target_rot,
            elapsed,
        } = self.state
        {
            self.fly(
                nodes, body, aims, start_pos, target_pos, start_rot, target_rot, elapsed, dt, cfg,
            );
            return;
        }

        // -- grounded translation --
        let mut axis = Vector3::new(inputs.move_axis[0], 0.0, inputs.move_axis[1]);
        if axis.norm_squared() > 1.0 {
            axis = axis.normalize();
        }
        let pos = nodes.world_position(body);
        let target_pos = pos + nodes.transform_vector(body, axis) * cfg.move_speed * dt;
        let mut desired = smooth_damp(pos, target_pos, &mut self.velocity, cfg.position_smooth_time, dt);

        // Sweep along the motion delta and clamp out of any geometry hit; a
        // steep hit also becomes a climb target.
        let mut jump_started = false;
        if cfg.enable_wall_climb {
            let delta = desired - pos;
            let dist = delta.norm();
            if dist > 1e-4 {
                if let Some(hit) = scene.sweep_sphere(
                    pos,
                    cfg.body_radius,
                    delta / dist,
                    dist + 0.05,
                    cfg.collision_mask,
                ) {
                    desired = hit.point + hit.normal * (cfg.body_radius + 0.01);
                    self.start_jump(nodes, body, hit.point, hit.normal, cfg);
                    jump_started = true;
                }
            }
        }
        nodes.set_world_position(body, desired);
        if jump_started {
            // flight begins next tick; ordinary floating is already suspended
            self.track_aims(nodes, body, aims, dt, cfg);
            return;
        }

        // -- turn in place about the current up axis --
        if inputs.turn.abs() > 1e-3 {
            let up = nodes.up(body);
            let angle = inputs.turn * cfg.rotation_speed.to_radians() * dt;
            let q = UnitQuaternion::from_axis_angle(&nalgebra::Unit::new_normalize(up), angle);
            let rot = nodes.world_rotation(body);
            nodes.set_world_rotation(body, q * rot);
        }

        if cfg.enable_body_float && !probes.is_empty() {
            self.float_and_level(nodes, body, aims, probes, scene, dt, cfg);
        }

        self.track_aims(nodes, body, aims, dt, cfg);
    }

    #[allow(clippy::too_many_arguments)]
    fn fly(
        &mut self,
        nodes: &mut NodeArena,
        body: NodeId,
        aims: &[NodeId],
        start_pos: Vector3<f32>,
        target_pos: Vector3<f32>,
        start_rot: UnitQuaternion<f32>,
        target_rot: UnitQuaternion<f32>,
        elapsed: f32,
        dt: f32,
        cfg: &RigConfig,
    ) {
        let elapsed = elapsed + dt;
        let p = (elapsed / cfg.jump_duration.max(1e-4)).clamp(0.0, 1.0);

        let horizontal = start_pos.lerp(&target_pos, p);
        let arc = (p * PI).sin() * cfg.jump_arc_height;
        nodes.set_world_position(body, horizontal + Vector3::y() * arc);
        nodes.set_world_rotation(body, start_rot.slerp(&target_rot, smooth_step(p)));

        self.track_aims(nodes, body, aims, dt, cfg);

        if p >= 1.0 {
            // exact snap; grounded processing resumes next tick
            nodes.set_world_position(body, target_pos);
            nodes.set_world_rotation(body, target_rot);
            self.vertical_velocity = 0.0;
            self.velocity = Vector3::zeros();
            self.state = BodyState::Grounded;
        } else {
            self.state = BodyState::InFlight {
                start_pos,
                target_pos,
                start_rot,
                target_rot,
                elapsed,
            };
        }
    }

    fn float_and_level(
        &mut self,
        nodes: &mut NodeArena,
        body: NodeId,
        aims: &[NodeId],
        probes: &[NodeId],
        scene: &dyn SceneQuery,
        dt: f32,
        cfg: &RigConfig,
    ) {
        let up = nodes.up(body);
        let mut sum_point = Vector3::zeros();
        let mut sum_normal = Vector3::zeros();
        let mut hits = 0u32;
        for &probe in probes {
            let start = nodes.world_position(probe) + up * cfg.probe_start_height;
            if let Some(hit) = scene.cast_ray(
                start,
                -up,
                cfg.probe_distance + cfg.probe_start_height,
                cfg.ground_mask,
            ) {
                sum_point += hit.point;
                sum_normal += hit.normal;
                hits += 1;
            }
        }
        if hits == 0 {
            return;
        }
        let avg_point = sum_point / hits as f32;
        let avg_normal = normalize_or(sum_normal, Vector3::y());

        // correct the signed distance from the averaged plane toward the
        // configured offset, along the averaged normal
        let pos = nodes.world_position(body);
        let s = avg_normal.dot(&(pos - avg_point));
        let s_new = smooth_damp_f32(
            s,
            cfg.body_height_offset,
            &mut self.vertical_velocity,
            cfg.body_height_smooth_time,
            dt,
        );
        nodes.set_world_position(body, pos + avg_normal * (s_new - s));

        // probe->aim rays classify steep surfaces; a wall normal wins over
        // the floor normal for leveling
        let mut general_normal = Vector3::zeros();
        let mut general_hits = 0u32;
        for i in 0..probes.len().min(aims.len()) {
            let origin = nodes.world_position(probes[i]);
            let dir = nodes.world_position(aims[i]) - origin;
            let d = dir.norm();
            if d < 1e-3 {
                continue;
            }
            if let Some(hit) = scene.cast_ray(origin, dir / d, d + cfg.probe_distance, cfg.ground_mask)
            {
                general_normal += hit.normal;
                general_hits += 1;
            }
        }
        let mut normal_to_use = avg_normal;
        if general_hits > 0 {
            let general = normalize_or(general_normal, avg_normal);
            if general.y.abs() < cfg.climb_normal_threshold {
                normal_to_use = general;
            }
        }

        let mut forward = project_on_plane(nodes.forward(body), normal_to_use);
        if forward.norm_squared() < 1e-4 {
            forward = project_on_plane(nodes.up(body), normal_to_use);
        }
        if forward.norm_squared() > 1e-8 {
            let target_rot = look_rotation(forward, normal_to_use);
            let current = nodes.world_rotation(body);
            let t = 1.0 - (-cfg.body_rotation_smooth_speed * dt).exp();
            nodes.set_world_rotation(body, current.slerp(&target_rot, t));
        }
    }

    /// Smooth-damp each aim node toward its captured body-relative offset.
    fn track_aims(
        &mut self,
        nodes: &mut NodeArena,
        body: NodeId,
        aims: &[NodeId],
        dt: f32,
        cfg: &RigConfig,
    ) {
        for (i, &aim) in aims.iter().enumerate() {
            let Some(&offset) = self.aim_offsets.get(i) else {
                continue;
            };
            let desired = nodes.transform_point(body, offset);
            let current = nodes.world_position(aim);
            let next = smooth_damp(
                current,
                desired,
                &mut self.aim_velocities[i],
                cfg.aim_smooth_time,
                dt,
            );
            nodes.set_world_position(aim, next);
        }
    }
}
