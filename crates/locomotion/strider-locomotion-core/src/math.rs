//! Small math helpers shared by the locomotion stack:
//! - critically-damped smoothing (vector + scalar)
//! - plane projection and guarded normalization
//! - circular phase arithmetic for the gait clock
//! - look-rotation construction with degenerate-up fallback

use nalgebra::{UnitQuaternion, Vector3};

/// Normalize `v`, falling back to `fallback` when it is too short to carry a
/// direction.
#[inline]
pub fn normalize_or(v: Vector3<f32>, fallback: Vector3<f32>) -> Vector3<f32> {
    let len2 = v.norm_squared();
    if len2 < 1e-12 {
        fallback
    } else {
        v / len2.sqrt()
    }
}

/// Remove the component of `v` along the (unit) normal `n`.
#[inline]
pub fn project_on_plane(v: Vector3<f32>, n: Vector3<f32>) -> Vector3<f32> {
    v - n * v.dot(&n)
}

/// Wrap a value into [0, 1).
#[inline]
pub fn wrap01(x: f32) -> f32 {
    let m = x.rem_euclid(1.0);
    if m >= 1.0 {
        0.0
    } else {
        m
    }
}

/// Distance between two phases on the unit circle, in [0, 0.5].
#[inline]
pub fn phase_distance(a: f32, b: f32) -> f32 {
    let d = wrap01(a - b);
    d.min(1.0 - d)
}

/// Hermite smooth-step of `p` over [0, 1].
#[inline]
pub fn smooth_step(p: f32) -> f32 {
    let p = p.clamp(0.0, 1.0);
    p * p * (3.0 - 2.0 * p)
}

/// Rotation whose forward (+Z) axis points along `forward`, with `up` as the
/// roll hint. A hint parallel to `forward` is replaced by a canonical axis so
/// the basis never degenerates.
pub fn look_rotation(forward: Vector3<f32>, up: Vector3<f32>) -> UnitQuaternion<f32> {
    let f = normalize_or(forward, Vector3::z());
    let mut u = up;
    if f.cross(&u).norm_squared() < 1e-8 {
        u = if f.dot(&Vector3::x()).abs() < 0.99 {
            Vector3::x()
        } else {
            Vector3::y()
        };
    }
    UnitQuaternion::face_towards(&f, &u)
}

/// Critically-damped approach of `current` toward `target`.
///
/// `velocity` is owned filter state scoped to whatever is being smoothed and
/// must be reset on discrete mode changes. Overshoot past the target is
/// clamped, so the result never oscillates.
pub fn smooth_damp(
    current: Vector3<f32>,
    target: Vector3<f32>,
    velocity: &mut Vector3<f32>,
    smooth_time: f32,
    dt: f32,
) -> Vector3<f32> {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + change * omega) * dt;
    *velocity = (*velocity - temp * omega) * exp;
    let mut out = target + (change + temp) * exp;

    // clamp overshoot
    if (target - current).dot(&(out - target)) > 0.0 {
        out = target;
        *velocity = Vector3::zeros();
    }
    out
}

/// Scalar variant of [`smooth_damp`].
pub fn smooth_damp_f32(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + change * omega) * dt;
    *velocity = (*velocity - temp * omega) * exp;
    let mut out = target + (change + temp) * exp;

    if (target - current) * (out - target) > 0.0 {
        out = target;
        *velocity = 0.0;
    }
    out
}
