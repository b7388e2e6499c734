//! Environment query capability. The locomotion core never owns collision
//! geometry; rays and sweeps are answered by an injected collaborator.

use nalgebra::Vector3;

/// Bitmask selecting which scene layers a query may hit.
pub type LayerMask = u32;

/// Mask matching every layer.
pub const ALL_LAYERS: LayerMask = !0;

/// First intersection returned by a ray or sweep query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub point: Vector3<f32>,
    pub normal: Vector3<f32>,
}

/// Blocking scene intersection tests, answered within the tick that issues
/// them. `dir` is expected to be unit length.
pub trait SceneQuery {
    fn cast_ray(
        &self,
        origin: Vector3<f32>,
        dir: Vector3<f32>,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;

    fn sweep_sphere(
        &self,
        origin: Vector3<f32>,
        radius: f32,
        dir: Vector3<f32>,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;
}
