//! Scene object interface
//!
//! The spatial structures never own scene objects; they observe world-space
//! bounds by value through the [`BoundsSource`] trait and refer to objects
//! only by opaque [`ObjectHandle`]s. Destroying an object on the caller's
//! side is resolved by a subsequent rebuild, never detected by the tree.

mod store;

pub use store::ObjectSet;

use slotmap::new_key_type;

use crate::geometry::{Aabb, Sphere};

new_key_type! {
    /// Opaque, stable identifier for an external scene object
    pub struct ObjectHandle;
}

/// Snapshot of one object's identity and world-space bound
///
/// Builds operate on a list of these taken once per build pass, so every
/// partitioning comparison sees the same bound for a given object.
#[derive(Debug, Clone, Copy)]
pub struct SceneObject {
    /// Stable identity of the object in the external store
    pub handle: ObjectHandle,
    /// World-space bounding box at snapshot time
    pub aabb: Aabb,
}

/// Inbound interface to the external object store
///
/// Implemented by the scene/ECS collaborator. The tree calls this at build
/// and refit time only and holds no reference into the store afterwards.
pub trait BoundsSource {
    /// Current world-space bounding box of an object, `None` if the handle
    /// is no longer valid
    fn world_bounds(&self, handle: ObjectHandle) -> Option<Aabb>;

    /// Current world-space bounding sphere of an object
    ///
    /// Defaults to the sphere enclosing the bounding box; stores with a
    /// tighter precomputed sphere can override.
    fn world_sphere(&self, handle: ObjectHandle) -> Option<Sphere> {
        self.world_bounds(handle).map(|aabb| Sphere::from_aabb(&aabb))
    }

    /// Enumerate every live object with its current bound, for a full rebuild
    fn enumerate_objects(&self) -> Vec<SceneObject>;
}
