//! BVH builders
//!
//! Top-down: recursive median partitioning along the axis of maximum key
//! variance. Bottom-up: greedy pairwise merging under a configurable cost.

use std::cmp::Ordering;

use crate::geometry::Aabb;
use crate::scene::SceneObject;
use super::config::{BuildConfig, MergeHeuristic, SplitHeuristic, Termination};
use super::tree::{NodeId, SpatialTree, SplitData};

/// Union of all object bounds in a slice; callers guarantee non-empty input
fn union_bounds(objects: &[SceneObject]) -> Aabb {
    objects
        .iter()
        .map(|o| o.aabb)
        .reduce(|a, b| a.union(&b))
        .expect("builder invoked with non-empty object set")
}

/// Partition key along one axis for the configured heuristic
fn split_key(object: &SceneObject, axis: usize, split: SplitHeuristic) -> f32 {
    match split {
        SplitHeuristic::MedianCenter | SplitHeuristic::EvenSplit => object.aabb.center()[axis],
        SplitHeuristic::MedianExtent => object.aabb.extents()[axis],
    }
}

/// Axis whose keys have the greatest variance
fn max_variance_axis(objects: &[SceneObject], split: SplitHeuristic) -> usize {
    let n = objects.len() as f32;
    let mut best_axis = 0;
    let mut best_variance = f32::MIN;

    for axis in 0..3 {
        let mean: f32 = objects.iter().map(|o| split_key(o, axis, split)).sum::<f32>() / n;
        let variance: f32 = objects
            .iter()
            .map(|o| {
                let d = split_key(o, axis, split) - mean;
                d * d
            })
            .sum::<f32>()
            / n;
        if variance > best_variance {
            best_variance = variance;
            best_axis = axis;
        }
    }
    best_axis
}

fn should_stop(count: usize, depth: u32, config: &BuildConfig) -> bool {
    if count <= 1 || depth >= config.max_depth {
        return true;
    }
    match config.termination {
        Termination::SingleObject => false,
        Termination::ObjectPair => count <= 2,
        Termination::MaxDepth => false,
    }
}

/// Build a BVH by recursive top-down partitioning
pub(crate) fn build_top_down(
    tree: &mut SpatialTree,
    objects: &[SceneObject],
    config: &BuildConfig,
) -> NodeId {
    let mut snapshot: Vec<SceneObject> = objects.to_vec();
    partition_recursive(tree, &mut snapshot, 0, config)
}

fn make_leaf(tree: &mut SpatialTree, objects: &[SceneObject], aabb: Aabb, depth: u32) -> NodeId {
    tree.push_leaf(objects.iter().map(|o| o.handle).collect(), aabb, depth)
}

fn partition_recursive(
    tree: &mut SpatialTree,
    objects: &mut [SceneObject],
    depth: u32,
    config: &BuildConfig,
) -> NodeId {
    let aabb = union_bounds(objects);
    if should_stop(objects.len(), depth, config) {
        return make_leaf(tree, objects, aabb, depth);
    }

    let axis = max_variance_axis(objects, config.split);
    let mid = objects.len() / 2;
    let compare = |a: &SceneObject, b: &SceneObject| {
        split_key(a, axis, config.split)
            .partial_cmp(&split_key(b, axis, config.split))
            .unwrap_or(Ordering::Equal)
    };
    objects.select_nth_unstable_by(mid, compare);

    let split_point = match config.split {
        // k-even (k=2): equal halves by position, the median element
        // starting the upper half
        SplitHeuristic::EvenSplit => mid,
        // Median value split: everything strictly below the median key goes
        // left. Coincident keys can drain one side; that degenerates to a
        // leaf below.
        SplitHeuristic::MedianCenter | SplitHeuristic::MedianExtent => {
            let median = split_key(&objects[mid], axis, config.split);
            partition_by_key(objects, axis, median, config.split)
        }
    };

    if split_point == 0 || split_point == objects.len() {
        // Pathological input (all keys coincident): no child would receive
        // an object, keep everything in one leaf
        log::warn!(
            "bvh: degenerate split on axis {axis} at depth {depth}, emitting {}-object leaf",
            objects.len()
        );
        return make_leaf(tree, objects, aabb, depth);
    }

    let (lower, upper) = objects.split_at_mut(split_point);
    let left = partition_recursive(tree, lower, depth + 1, config);
    let right = partition_recursive(tree, upper, depth + 1, config);
    tree.push_internal(vec![left, right], SplitData::Bvh, Vec::new(), aabb, depth)
}

/// In-place partition: keys strictly below `median` first. Returns the
/// boundary index.
fn partition_by_key(
    objects: &mut [SceneObject],
    axis: usize,
    median: f32,
    split: SplitHeuristic,
) -> usize {
    let mut boundary = 0;
    for i in 0..objects.len() {
        if split_key(&objects[i], axis, split) < median {
            objects.swap(i, boundary);
            boundary += 1;
        }
    }
    boundary
}

/// Pairwise merge cost under the configured heuristic
fn merge_cost(a: &Aabb, b: &Aabb, merge: MergeHeuristic) -> f32 {
    match merge {
        MergeHeuristic::NearestCenter => (a.center() - b.center()).magnitude_squared(),
        MergeHeuristic::SmallestVolume => a.union(b).volume(),
        MergeHeuristic::SmallestArea => a.union(b).surface_area(),
    }
}

/// Build a BVH bottom-up by greedy pairwise merging
///
/// Every iteration rescans all active-node pairs and merges the globally
/// cheapest one. This is O(n^3) in the naive all-pairs form and is kept
/// that way on purpose: a candidate-pair queue would change merge order and
/// therefore tree shape. Acceptable only for modest object counts.
pub(crate) fn build_bottom_up(
    tree: &mut SpatialTree,
    objects: &[SceneObject],
    config: &BuildConfig,
) -> NodeId {
    let mut active: Vec<NodeId> = objects
        .iter()
        .map(|o| tree.push_leaf(vec![o.handle], o.aabb, 0))
        .collect();

    while active.len() > 1 {
        let mut best = (0, 1, f32::INFINITY);
        for i in 0..active.len() {
            for j in (i + 1)..active.len() {
                let cost = merge_cost(
                    &tree.node(active[i]).aabb,
                    &tree.node(active[j]).aabb,
                    config.merge,
                );
                if cost < best.2 {
                    best = (i, j, cost);
                }
            }
        }

        let (i, j, _) = best;
        let (a, b) = (active[i], active[j]);
        let aabb = tree.node(a).aabb.union(&tree.node(b).aabb);
        let parent = tree.push_internal(vec![a, b], SplitData::Bvh, Vec::new(), aabb, 0);

        // j > i, so remove j first to keep i stable
        active.swap_remove(j);
        active.swap_remove(i);
        active.push(parent);
    }

    let root = active[0];
    tree.assign_depths(root);
    root
}
