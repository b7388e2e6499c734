//! Closed-form two-bone limb solver.
//!
//! Stateless: the same (r1, r2, d) always produces the same interior angle,
//! regardless of calling order. Unreachable targets are not an error; the
//! limb fully extends toward them.

use nalgebra::{UnitQuaternion, Vector3};

use crate::math::{look_rotation, normalize_or};

/// Rotations and joint placement for one solved limb.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LimbPose {
    pub root_rotation: UnitQuaternion<f32>,
    pub elbow_position: Vector3<f32>,
    pub elbow_rotation: UnitQuaternion<f32>,
}

/// Solve a two-segment limb of lengths `r1` (proximal) and `r2` (distal) from
/// `root` to `target`.
///
/// `pole_up` disambiguates the swing plane: the root bends about the axis
/// perpendicular to both the aim direction and the pole reference.
/// `fallback_forward` is used as the aim direction when the target coincides
/// with the root.
pub fn solve_two_bone(
    root: Vector3<f32>,
    target: Vector3<f32>,
    r1: f32,
    r2: f32,
    pole_up: Vector3<f32>,
    fallback_forward: Vector3<f32>,
) -> LimbPose {
    let to_target = target - root;
    let d = to_target.norm();

    // Target coincident with the root: the aim direction is undefined, keep
    // the current forward axis and extend along it.
    if d < 1e-5 {
        let dir = normalize_or(fallback_forward, Vector3::z());
        return extended(root, target, r1, dir, pole_up);
    }
    let dir = to_target / d;

    // Over-stretched: reach as far as possible along the aim direction.
    if d >= r1 + r2 {
        return extended(root, target, r1, dir, pole_up);
    }

    // Interior angle at the root between root->target and root->elbow, via
    // the law of cosines.
    let cos_theta = ((r2 * r2 - d * d - r1 * r1) / (-2.0 * d * r1)).clamp(-1.0, 1.0);
    let theta = cos_theta.acos();

    let aim = look_rotation(dir, pole_up);
    let axis = dir.cross(&pole_up);
    let axis = if axis.norm_squared() < 1e-8 {
        // aim parallel to the pole reference; bend about the aim frame's
        // right axis instead
        aim * Vector3::x()
    } else {
        axis.normalize()
    };
    // Rotate in world space after aiming; rotating first would invalidate the
    // aim just computed.
    let bend = UnitQuaternion::from_axis_angle(&nalgebra::Unit::new_normalize(axis), theta.abs());
    let root_rotation = bend * aim;

    let elbow_position = root + (root_rotation * Vector3::z()) * r1;
    let elbow_rotation = look_rotation(target - elbow_position, pole_up);

    LimbPose {
        root_rotation,
        elbow_position,
        elbow_rotation,
    }
}

fn extended(
    root: Vector3<f32>,
    target: Vector3<f32>,
    r1: f32,
    dir: Vector3<f32>,
    pole_up: Vector3<f32>,
) -> LimbPose {
    let root_rotation = look_rotation(dir, pole_up);
    let elbow_position = root + dir * r1;
    let elbow_rotation = look_rotation(target - elbow_position, pole_up);
    LimbPose {
        root_rotation,
        elbow_position,
        elbow_rotation,
    }
}
