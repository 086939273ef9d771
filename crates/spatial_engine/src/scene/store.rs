//! Reference object store

use slotmap::SlotMap;

use crate::geometry::Aabb;
use super::{BoundsSource, ObjectHandle, SceneObject};

/// A minimal slotmap-backed object store
///
/// Serves as the reference [`BoundsSource`] implementation for tests and
/// small applications; a real engine would implement the trait on its own
/// entity registry instead.
#[derive(Debug, Default)]
pub struct ObjectSet {
    objects: SlotMap<ObjectHandle, Aabb>,
}

impl ObjectSet {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object with its world-space bound, returning its handle
    pub fn insert(&mut self, aabb: Aabb) -> ObjectHandle {
        self.objects.insert(aabb)
    }

    /// Remove an object; the caller is expected to trigger a rebuild
    pub fn remove(&mut self, handle: ObjectHandle) -> Option<Aabb> {
        self.objects.remove(handle)
    }

    /// Replace an object's bound (after it moved or scaled)
    pub fn set_bounds(&mut self, handle: ObjectHandle, aabb: Aabb) -> bool {
        match self.objects.get_mut(handle) {
            Some(stored) => {
                *stored = aabb;
                true
            }
            None => false,
        }
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl BoundsSource for ObjectSet {
    fn world_bounds(&self, handle: ObjectHandle) -> Option<Aabb> {
        self.objects.get(handle).copied()
    }

    fn enumerate_objects(&self) -> Vec<SceneObject> {
        self.objects
            .iter()
            .map(|(handle, aabb)| SceneObject { handle, aabb: *aabb })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_object_set_insert_remove() {
        let mut store = ObjectSet::new();
        let bounds = Aabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));

        let a = store.insert(bounds);
        let b = store.insert(bounds);
        assert_eq!(store.len(), 2);
        assert_eq!(store.world_bounds(a), Some(bounds));

        store.remove(a);
        assert_eq!(store.len(), 1);
        assert_eq!(store.world_bounds(a), None);
        assert!(store.world_bounds(b).is_some());
    }

    #[test]
    fn test_object_set_set_bounds() {
        let mut store = ObjectSet::new();
        let handle = store.insert(Aabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0)));

        let moved = Aabb::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(6.0, 1.0, 1.0));
        assert!(store.set_bounds(handle, moved));
        assert_eq!(store.world_bounds(handle), Some(moved));

        let stale = store.insert(moved);
        store.remove(stale);
        assert!(!store.set_bounds(stale, moved));
    }

    #[test]
    fn test_default_world_sphere_encloses_bounds() {
        let mut store = ObjectSet::new();
        let bounds = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let handle = store.insert(bounds);

        let sphere = store.world_sphere(handle).unwrap();
        for corner in bounds.corners() {
            assert!(sphere.contains_point(corner));
        }
    }
}
