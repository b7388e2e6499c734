//! Hierarchical pose nodes stored in a flat arena.
//!
//! Parent links are non-owning `NodeId` indices, so parent lifetime is
//! independent of child lifetime and cycle rejection is a cheap chain walk at
//! assignment time. World transforms compose `parent.world * local` with a
//! translate * rotate * scale local matrix; a node with no parent is its own
//! world frame.

use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};

use crate::error::RigError;
use crate::math::normalize_or;

/// Copyable handle into a [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Node {
    local_t: Vector3<f32>,
    local_r: UnitQuaternion<f32>,
    local_s: Vector3<f32>,
    parent: Option<NodeId>,
}

impl Node {
    fn local_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.local_t)
            * self.local_r.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.local_s)
    }
}

#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a node at the local (and thus world) origin.
    pub fn spawn(&mut self) -> NodeId {
        self.spawn_at(Vector3::zeros())
    }

    /// Create a node with the given local translation and no parent.
    pub fn spawn_at(&mut self, local_t: Vector3<f32>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            local_t,
            local_r: UnitQuaternion::identity(),
            local_s: Vector3::new(1.0, 1.0, 1.0),
            parent: None,
        });
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Re-parent `child`. Rejects ids from another arena and assignments that
    /// would make `child` its own ancestor; a cycle here is a programming
    /// error in scene setup, surfaced loudly rather than walked into.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> Result<(), RigError> {
        if !self.contains(child) {
            return Err(RigError::UnknownNode(child));
        }
        if let Some(p) = parent {
            if !self.contains(p) {
                return Err(RigError::UnknownNode(p));
            }
            let mut cur = p;
            loop {
                if cur == child {
                    return Err(RigError::NodeCycle { child, parent: p });
                }
                match self.nodes[cur.index()].parent {
                    Some(next) => cur = next,
                    None => break,
                }
            }
        }
        self.nodes[child.index()].parent = parent;
        Ok(())
    }

    /// World transform, composed through the parent chain.
    pub fn local_to_world(&self, id: NodeId) -> Matrix4<f32> {
        let node = &self.nodes[id.index()];
        let local = node.local_matrix();
        match node.parent {
            Some(p) => self.local_to_world(p) * local,
            None => local,
        }
    }

    /// World rotation, composed through the parent chain (scale ignored).
    pub fn world_rotation(&self, id: NodeId) -> UnitQuaternion<f32> {
        let node = &self.nodes[id.index()];
        match node.parent {
            Some(p) => self.world_rotation(p) * node.local_r,
            None => node.local_r,
        }
    }

    pub fn local_translation(&self, id: NodeId) -> Vector3<f32> {
        self.nodes[id.index()].local_t
    }

    pub fn set_local_translation(&mut self, id: NodeId, t: Vector3<f32>) {
        self.nodes[id.index()].local_t = t;
    }

    pub fn set_local_scale(&mut self, id: NodeId, s: Vector3<f32>) {
        self.nodes[id.index()].local_s = s;
    }

    /// Add to the local translation.
    pub fn translate(&mut self, id: NodeId, delta: Vector3<f32>) {
        self.nodes[id.index()].local_t += delta;
    }

    pub fn world_position(&self, id: NodeId) -> Vector3<f32> {
        let node = &self.nodes[id.index()];
        match node.parent {
            Some(p) => self
                .local_to_world(p)
                .transform_point(&Point3::from(node.local_t))
                .coords,
            None => node.local_t,
        }
    }

    /// Set the world position by converting through the inverse of the
    /// parent's world transform; with no parent this assigns the local
    /// translation directly.
    pub fn set_world_position(&mut self, id: NodeId, world: Vector3<f32>) {
        let parent = self.nodes[id.index()].parent;
        let local = match parent {
            Some(p) => {
                let inv = self
                    .local_to_world(p)
                    .try_inverse()
                    .unwrap_or_else(Matrix4::identity);
                inv.transform_point(&Point3::from(world)).coords
            }
            None => world,
        };
        self.nodes[id.index()].local_t = local;
    }

    pub fn local_rotation(&self, id: NodeId) -> UnitQuaternion<f32> {
        self.nodes[id.index()].local_r
    }

    /// Assign the local rotation. A rotation with any non-finite component is
    /// rejected and the prior rotation kept, so corruption never propagates
    /// down the hierarchy.
    pub fn set_local_rotation(&mut self, id: NodeId, q: UnitQuaternion<f32>) {
        if !q.coords.iter().all(|c| c.is_finite()) {
            log::warn!("rejected non-finite rotation for node {:?}", id);
            return;
        }
        self.nodes[id.index()].local_r = q;
    }

    /// Assign the world rotation, converting into the node's local frame.
    pub fn set_world_rotation(&mut self, id: NodeId, q: UnitQuaternion<f32>) {
        let local = match self.nodes[id.index()].parent {
            Some(p) => self.world_rotation(p).inverse() * q,
            None => q,
        };
        self.set_local_rotation(id, local);
    }

    /// Append a delta rotation in local space.
    pub fn rotate_local(&mut self, id: NodeId, q: UnitQuaternion<f32>) {
        let r = self.nodes[id.index()].local_r * q;
        self.set_local_rotation(id, r);
    }

    /// Prepend a delta rotation in world space.
    pub fn rotate_world(&mut self, id: NodeId, q: UnitQuaternion<f32>) {
        let r = q * self.nodes[id.index()].local_r;
        self.set_local_rotation(id, r);
    }

    /// Orient the node's forward axis at `target` with `up` as the roll hint.
    /// A near-zero aim vector leaves the rotation unchanged.
    pub fn look_at(&mut self, id: NodeId, target: Vector3<f32>, up: Vector3<f32>) {
        let forward = target - self.world_position(id);
        if forward.norm_squared() < 1e-7 {
            return;
        }
        let world = crate::math::look_rotation(forward, up);
        self.set_world_rotation(id, world);
    }

    fn world_axis(&self, id: NodeId, column: usize, fallback: Vector3<f32>) -> Vector3<f32> {
        let m = self.local_to_world(id);
        let c = m.column(column);
        normalize_or(Vector3::new(c[0], c[1], c[2]), fallback)
    }

    pub fn right(&self, id: NodeId) -> Vector3<f32> {
        self.world_axis(id, 0, Vector3::x())
    }

    pub fn up(&self, id: NodeId) -> Vector3<f32> {
        self.world_axis(id, 1, Vector3::y())
    }

    pub fn forward(&self, id: NodeId) -> Vector3<f32> {
        self.world_axis(id, 2, Vector3::z())
    }

    pub fn transform_point(&self, id: NodeId, point: Vector3<f32>) -> Vector3<f32> {
        self.local_to_world(id)
            .transform_point(&Point3::from(point))
            .coords
    }

    pub fn inverse_transform_point(&self, id: NodeId, point: Vector3<f32>) -> Vector3<f32> {
        let inv = self
            .local_to_world(id)
            .try_inverse()
            .unwrap_or_else(Matrix4::identity);
        inv.transform_point(&Point3::from(point)).coords
    }

    /// Rotate and scale a vector into world space (translation ignored).
    pub fn transform_vector(&self, id: NodeId, v: Vector3<f32>) -> Vector3<f32> {
        self.local_to_world(id).transform_vector(&v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn cycle_rejected() {
        let mut nodes = NodeArena::new();
        let a = nodes.spawn();
        let b = nodes.spawn();
        let c = nodes.spawn();
        nodes.set_parent(b, Some(a)).unwrap();
        nodes.set_parent(c, Some(b)).unwrap();
        assert_eq!(
            nodes.set_parent(a, Some(c)),
            Err(RigError::NodeCycle { child: a, parent: c })
        );
        // arena unchanged
        assert_eq!(nodes.parent(a), None);
    }

    #[test]
    fn non_finite_rotation_rejected() {
        let mut nodes = NodeArena::new();
        let n = nodes.spawn();
        let good = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2);
        nodes.set_local_rotation(n, good);
        let bad = UnitQuaternion::new_unchecked(nalgebra::Quaternion::new(
            f32::NAN,
            0.0,
            0.0,
            0.0,
        ));
        nodes.set_local_rotation(n, bad);
        assert_eq!(nodes.local_rotation(n), good);
    }
}
