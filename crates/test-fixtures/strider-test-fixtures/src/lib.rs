//! Shared scenery and rig builders for Strider tests and benches.
//!
//! The scenes here are analytic (infinite planes), so tests get exact,
//! deterministic intersections without a physics engine.

use nalgebra::Vector3;
use strider_locomotion_core::{
    LayerMask, LimbSpec, NodeArena, RayHit, Rig, RigConfig, SceneQuery, ALL_LAYERS,
};

/// Infinite plane through `point` with unit `normal`.
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub point: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub layers: LayerMask,
}

impl Plane {
    pub fn new(point: Vector3<f32>, normal: Vector3<f32>) -> Self {
        Self {
            point,
            normal,
            layers: ALL_LAYERS,
        }
    }

    fn intersect(&self, origin: Vector3<f32>, dir: Vector3<f32>, max_distance: f32) -> Option<f32> {
        let denom = self.normal.dot(&dir);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = self.normal.dot(&(self.point - origin)) / denom;
        (t >= 0.0 && t <= max_distance).then_some(t)
    }

    /// Analytic sphere sweep: the sphere contacts the plane where its center
    /// crosses the plane shifted out by `radius`. Only surfaces the sweep is
    /// moving toward are reported, so a sphere resting at exactly `radius`
    /// and sliding along the surface does not hit it. The reported point lies
    /// on the original surface; the center travel distance is returned with
    /// the hit.
    fn sweep(
        &self,
        origin: Vector3<f32>,
        radius: f32,
        dir: Vector3<f32>,
        max_distance: f32,
    ) -> Option<(f32, RayHit)> {
        let denom = self.normal.dot(&dir);
        if denom >= -1e-6 {
            return None;
        }
        let shifted = self.point + self.normal * radius;
        let t = self.normal.dot(&(shifted - origin)) / denom;
        if t < 0.0 || t > max_distance {
            return None;
        }
        Some((
            t,
            RayHit {
                point: origin + dir * t - self.normal * radius,
                normal: self.normal,
            },
        ))
    }
}

impl SceneQuery for Plane {
    fn cast_ray(
        &self,
        origin: Vector3<f32>,
        dir: Vector3<f32>,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        if mask & self.layers == 0 {
            return None;
        }
        self.intersect(origin, dir, max_distance).map(|t| RayHit {
            point: origin + dir * t,
            normal: self.normal,
        })
    }

    fn sweep_sphere(
        &self,
        origin: Vector3<f32>,
        radius: f32,
        dir: Vector3<f32>,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        if mask & self.layers == 0 {
            return None;
        }
        self.sweep(origin, radius, dir, max_distance).map(|(_, hit)| hit)
    }
}

/// Nearest-hit union of several planes.
#[derive(Clone, Debug, Default)]
pub struct Planes(pub Vec<Plane>);

impl SceneQuery for Planes {
    fn cast_ray(
        &self,
        origin: Vector3<f32>,
        dir: Vector3<f32>,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        self.0
            .iter()
            .filter_map(|p| {
                if mask & p.layers == 0 {
                    return None;
                }
                p.intersect(origin, dir, max_distance).map(|t| (t, p))
            })
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(t, p)| RayHit {
                point: origin + dir * t,
                normal: p.normal,
            })
    }

    fn sweep_sphere(
        &self,
        origin: Vector3<f32>,
        radius: f32,
        dir: Vector3<f32>,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        self.0
            .iter()
            .filter(|p| mask & p.layers != 0)
            .filter_map(|p| p.sweep(origin, radius, dir, max_distance))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, hit)| hit)
    }
}

/// Scene with no geometry; every query misses.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoGeometry;

impl SceneQuery for NoGeometry {
    fn cast_ray(
        &self,
        _origin: Vector3<f32>,
        _dir: Vector3<f32>,
        _max_distance: f32,
        _mask: LayerMask,
    ) -> Option<RayHit> {
        None
    }

    fn sweep_sphere(
        &self,
        _origin: Vector3<f32>,
        _radius: f32,
        _dir: Vector3<f32>,
        _max_distance: f32,
        _mask: LayerMask,
    ) -> Option<RayHit> {
        None
    }
}

/// Flat ground at height zero with an upward normal.
pub fn flat_ground() -> Plane {
    Plane::new(Vector3::zeros(), Vector3::y())
}

/// Standard six-legged rig: body at (0, 0.5, 0), three anchors per side
/// parented to the body, aim points on the ground plane outboard of each
/// anchor, probes defaulting to the anchors.
pub fn hexapod(cfg: RigConfig) -> Rig {
    let mut nodes = NodeArena::new();
    let body = nodes.spawn_at(Vector3::new(0.0, 0.5, 0.0));

    let mut anchors = Vec::new();
    let mut aims = Vec::new();
    let mut limbs = Vec::new();
    for i in 0..6 {
        let side = if i < 3 { -1.0 } else { 1.0 };
        let row = (i % 3) as f32 - 1.0;
        let anchor = nodes.spawn_at(Vector3::new(side * 0.25, 0.0, row * 0.3));
        nodes
            .set_parent(anchor, Some(body))
            .expect("fresh arena cannot cycle");
        let aim = nodes.spawn_at(Vector3::new(side * 0.6, 0.0, row * 0.3));
        anchors.push(anchor);
        aims.push(aim);
        limbs.push(LimbSpec { r1: 0.4, r2: 0.4 });
    }

    Rig::new(nodes, body, anchors, aims, Vec::new(), limbs, cfg)
        .expect("hexapod rig is well-formed")
}
