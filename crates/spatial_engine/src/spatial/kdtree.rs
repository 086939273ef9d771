//! K-d tree builder
//!
//! Binary splits along axes cycling with depth (x, y, z, x, ...). The split
//! value is the exact median of the configured key over a bound snapshot
//! taken once per build, so every comparison in a pass sees the same bound
//! for a given object. Each recursion physically splits the parent's region
//! box at the split plane; the two sub-boxes tile the parent exactly.

use std::cmp::Ordering;

use crate::geometry::Aabb;
use crate::scene::SceneObject;
use super::config::{BuildConfig, SplitHeuristic};
use super::tree::{NodeId, SpatialTree, SplitData};

fn split_key(object: &SceneObject, axis: usize, split: SplitHeuristic) -> f32 {
    match split {
        SplitHeuristic::MedianCenter | SplitHeuristic::EvenSplit => object.aabb.center()[axis],
        SplitHeuristic::MedianExtent => object.aabb.extents()[axis],
    }
}

fn bounds_of(objects: &[SceneObject]) -> Aabb {
    objects
        .iter()
        .map(|o| o.aabb)
        .reduce(|a, b| a.union(&b))
        .expect("builder invoked with non-empty object set")
}

/// Split a region box at a world coordinate on one axis
///
/// The plane is clamped into the region so the two sub-boxes always tile
/// the parent, even when the median key falls outside it (possible under
/// the extent heuristic).
fn split_region(region: &Aabb, axis: usize, value: f32) -> (Aabb, Aabb) {
    let clamped = value.clamp(region.min[axis], region.max[axis]);

    let mut lower = *region;
    lower.max[axis] = clamped;
    let mut upper = *region;
    upper.min[axis] = clamped;
    (lower, upper)
}

/// Build a k-d tree over the object snapshot
pub(crate) fn build(
    tree: &mut SpatialTree,
    objects: &[SceneObject],
    config: &BuildConfig,
) -> NodeId {
    let mut snapshot: Vec<SceneObject> = objects.to_vec();
    let region = bounds_of(&snapshot);
    build_node(tree, &mut snapshot, region, 0, config)
}

fn make_leaf(tree: &mut SpatialTree, objects: &[SceneObject], depth: u32) -> NodeId {
    let aabb = bounds_of(objects);
    tree.push_leaf(objects.iter().map(|o| o.handle).collect(), aabb, depth)
}

fn build_node(
    tree: &mut SpatialTree,
    objects: &mut [SceneObject],
    region: Aabb,
    depth: u32,
    config: &BuildConfig,
) -> NodeId {
    if objects.len() <= config.max_objects_per_leaf || depth >= config.max_depth {
        return make_leaf(tree, objects, depth);
    }

    // Axis cycles with depth
    let axis = depth as usize % 3;
    let mid = objects.len() / 2;
    let compare = |a: &SceneObject, b: &SceneObject| {
        split_key(a, axis, config.split)
            .partial_cmp(&split_key(b, axis, config.split))
            .unwrap_or(Ordering::Equal)
    };
    objects.select_nth_unstable_by(mid, compare);
    let split_value = split_key(&objects[mid], axis, config.split);

    // Partition strictly-below keys to the front
    let mut boundary = 0;
    for i in 0..objects.len() {
        if split_key(&objects[i], axis, config.split) < split_value {
            objects.swap(i, boundary);
            boundary += 1;
        }
    }

    if boundary == 0 || boundary == objects.len() {
        // Coincident keys: the split separates nothing, keep one leaf
        log::warn!(
            "kdtree: one-sided split on axis {axis} at depth {depth}, emitting {}-object leaf",
            objects.len()
        );
        return make_leaf(tree, objects, depth);
    }

    let (lower_region, upper_region) = split_region(&region, axis, split_value);
    let aabb = bounds_of(objects);

    let (lower, upper) = objects.split_at_mut(boundary);
    let left = build_node(tree, lower, lower_region, depth + 1, config);
    let right = build_node(tree, upper, upper_region, depth + 1, config);

    tree.push_internal(
        vec![left, right],
        SplitData::Axis { axis, value: split_value, region },
        Vec::new(),
        aabb,
        depth,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scene::{BoundsSource, ObjectSet};
    use crate::spatial::config::BuildMethod;

    fn kd_config() -> BuildConfig {
        BuildConfig {
            method: BuildMethod::KdTree,
            max_objects_per_leaf: 1,
            ..Default::default()
        }
    }

    fn grid_scene() -> (ObjectSet, Vec<SceneObject>) {
        let mut store = ObjectSet::new();
        for x in 0..3 {
            for y in 0..3 {
                let p = Vec3::new(x as f32 * 4.0, y as f32 * 4.0, 0.0);
                store.insert(Aabb::from_center_extents(p, Vec3::new(0.5, 0.5, 0.5)));
            }
        }
        let objects = store.enumerate_objects();
        (store, objects)
    }

    #[test]
    fn test_split_region_tiles_parent() {
        let region = Aabb::new(Vec3::new(-2.0, -2.0, -2.0), Vec3::new(2.0, 2.0, 2.0));
        let (lower, upper) = split_region(&region, 0, 0.5);

        assert_eq!(lower.max.x, 0.5);
        assert_eq!(upper.min.x, 0.5);
        assert_eq!(lower.min, region.min);
        assert_eq!(upper.max, region.max);

        // Out-of-region plane clamps to the boundary
        let (lo, hi) = split_region(&region, 1, 10.0);
        assert_eq!(lo.max.y, 2.0);
        assert_eq!(hi.min.y, 2.0);
    }

    #[test]
    fn test_kdtree_partition_completeness() {
        let (_, objects) = grid_scene();
        let tree = SpatialTree::build(&objects, &kd_config());

        let mut seen: Vec<_> = tree
            .traverse()
            .filter(|i| i.is_leaf)
            .flat_map(|i| i.objects.to_vec())
            .collect();
        assert_eq!(seen.len(), objects.len());
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), objects.len());
    }

    #[test]
    fn test_kdtree_axis_cycles_with_depth() {
        let (_, objects) = grid_scene();
        let tree = SpatialTree::build(&objects, &kd_config());

        // Nine objects with a single leaf threshold force at least two levels
        let max_depth = tree.traverse().map(|i| i.depth).max().unwrap();
        assert!(max_depth >= 2);

        // Root splits on x (depth 0 mod 3)
        let root = tree.node(tree.root().unwrap());
        assert_eq!(root.split_plane().map(|(axis, _)| axis), Some(0));

        // Root split is on x (depth 0), grandchildren splits land on z only
        // at depth 2; verify bound containment holds throughout instead of
        // pinning exact shapes
        for item in tree.traverse() {
            let node = tree.node(item.id);
            for &child in node.children() {
                assert!(node.aabb.contains_aabb(&tree.node(child).aabb));
                assert_eq!(tree.node(child).depth, node.depth + 1);
            }
        }
    }

    fn varied_scene() -> (ObjectSet, Vec<SceneObject>) {
        let mut store = ObjectSet::new();
        for i in 0..12 {
            let f = i as f32;
            let center = Vec3::new((f * 1.1).sin() * 8.0, (f * 1.9).cos() * 6.0, f);
            let extents = Vec3::new(
                0.2 + (f * 0.5).sin().abs(),
                0.4,
                0.3 + (f * 0.8).cos().abs(),
            );
            store.insert(Aabb::from_center_extents(center, extents));
        }
        let objects = store.enumerate_objects();
        (store, objects)
    }

    #[test]
    fn test_kdtree_extent_and_even_split_heuristics() {
        let (store, objects) = varied_scene();
        for split in [SplitHeuristic::MedianExtent, SplitHeuristic::EvenSplit] {
            let config = BuildConfig { split, ..kd_config() };
            let tree = SpatialTree::build(&objects, &config);

            assert!(tree.node_count() > 1, "{split:?}: nothing subdivided");

            // Every object lands in exactly one leaf
            let mut seen: Vec<_> = tree
                .traverse()
                .filter(|i| i.is_leaf)
                .flat_map(|i| i.objects.to_vec())
                .collect();
            assert_eq!(seen.len(), objects.len());
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), objects.len());

            // Bounds stay consistent down the tree
            for item in tree.traverse() {
                let node = tree.node(item.id);
                for &child in node.children() {
                    assert!(node.aabb.contains_aabb(&tree.node(child).aabb));
                }
                for &handle in item.objects {
                    let bounds = store.world_bounds(handle).unwrap();
                    assert!(item.aabb.contains_aabb(&bounds));
                }
            }
        }
    }

    #[test]
    fn test_kdtree_regions_tile_their_parent() {
        let (_, objects) = grid_scene();
        let tree = SpatialTree::build(&objects, &kd_config());

        // The root's region is the union of all object bounds
        let root = tree.node(tree.root().unwrap());
        assert_eq!(root.region(), Some(bounds_of(&objects)));

        for item in tree.traverse() {
            let node = tree.node(item.id);
            let Some(region) = node.region() else { continue };
            let Some((axis, _)) = node.split_plane() else { continue };

            let child_regions: Vec<_> = node
                .children()
                .iter()
                .filter_map(|&c| tree.node(c).region())
                .collect();
            for child in &child_regions {
                assert!(region.contains_aabb(child));
            }
            // When both children subdivide further, their regions share the
            // split plane coordinate
            if let [lower, upper] = child_regions[..] {
                assert_eq!(lower.max[axis], upper.min[axis]);
            }
        }
    }

    #[test]
    fn test_kdtree_coincident_centers_fall_back_to_leaf() {
        let mut store = ObjectSet::new();
        for _ in 0..4 {
            store.insert(Aabb::from_center_extents(
                Vec3::new(1.0, 2.0, 3.0),
                Vec3::new(0.5, 0.5, 0.5),
            ));
        }
        let tree = SpatialTree::build(&store.enumerate_objects(), &kd_config());

        let root = tree.node(tree.root().unwrap());
        assert!(root.is_leaf());
        assert_eq!(root.objects().len(), 4);
    }

    #[test]
    fn test_kdtree_max_depth_bounds_tree() {
        let (_, objects) = grid_scene();
        let config = BuildConfig {
            max_depth: 1,
            ..kd_config()
        };
        let tree = SpatialTree::build(&objects, &config);

        for item in tree.traverse() {
            assert!(item.depth <= 1);
        }
        assert_eq!(tree.object_count(), objects.len());
    }

    #[test]
    fn test_kdtree_leaf_bounds_contain_members() {
        let (store, objects) = grid_scene();
        let tree = SpatialTree::build(&objects, &kd_config());

        for item in tree.traverse().filter(|i| i.is_leaf) {
            for &handle in item.objects {
                let bounds = store.world_bounds(handle).unwrap();
                assert!(item.aabb.contains_aabb(&bounds));
            }
        }
    }
}
