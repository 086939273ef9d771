//! Adaptive octree builder
//!
//! The root cell is a cube covering every object bound, padded out to the
//! maximum half-extent. Each subdivision splits the cell into 8 equal
//! octants at its center; objects whose bounds cross a splitting plane are
//! handled by the configured straddling policy.

use crate::foundation::math::Vec3;
use crate::geometry::Aabb;
use crate::scene::SceneObject;
use super::config::{BuildConfig, StraddlingPolicy};
use super::tree::{NodeId, SpatialTree, SplitData};

/// Octant index for a position relative to a cell center
///
/// Bit layout: x -> bit 0, y -> bit 1, z -> bit 2; a set bit means the
/// positive side of the corresponding splitting plane.
fn octant_of(center: Vec3, position: Vec3) -> usize {
    let x_bit = usize::from(position.x >= center.x);
    let y_bit = usize::from(position.y >= center.y);
    let z_bit = usize::from(position.z >= center.z);
    (z_bit << 2) | (y_bit << 1) | x_bit
}

/// Whether a bound crosses any of the three splitting planes through `center`
fn straddles(aabb: &Aabb, center: Vec3) -> bool {
    (0..3).any(|axis| aabb.min[axis] < center[axis] && aabb.max[axis] > center[axis])
}

/// Cubic AABB of one octant of a cell
fn octant_cell(center: Vec3, half_width: f32, octant: usize) -> (Vec3, f32) {
    let quarter = half_width * 0.5;
    let child_center = Vec3::new(
        center.x + if octant & 1 != 0 { quarter } else { -quarter },
        center.y + if octant & 2 != 0 { quarter } else { -quarter },
        center.z + if octant & 4 != 0 { quarter } else { -quarter },
    );
    (child_center, quarter)
}

/// Build an octree over the object snapshot
pub(crate) fn build(
    tree: &mut SpatialTree,
    objects: &[SceneObject],
    config: &BuildConfig,
) -> NodeId {
    // Root cube: union of all bounds, padded to a cube via the max half-extent
    let union = objects
        .iter()
        .map(|o| o.aabb)
        .reduce(|a, b| a.union(&b))
        .expect("builder invoked with non-empty object set");
    let center = union.center();
    let extents = union.extents();
    let half_width = extents.x.max(extents.y).max(extents.z);

    let members: Vec<usize> = (0..objects.len()).collect();
    build_cell(tree, objects, members, center, half_width, 0, config)
}

fn bounds_of(objects: &[SceneObject], members: &[usize]) -> Aabb {
    members
        .iter()
        .map(|&i| objects[i].aabb)
        .reduce(|a, b| a.union(&b))
        .expect("octree cell with no members")
}

fn make_leaf(
    tree: &mut SpatialTree,
    objects: &[SceneObject],
    members: &[usize],
    depth: u32,
) -> NodeId {
    let aabb = bounds_of(objects, members);
    tree.push_leaf(members.iter().map(|&i| objects[i].handle).collect(), aabb, depth)
}

fn build_cell(
    tree: &mut SpatialTree,
    objects: &[SceneObject],
    members: Vec<usize>,
    center: Vec3,
    half_width: f32,
    depth: u32,
    config: &BuildConfig,
) -> NodeId {
    if members.len() <= config.max_objects_per_leaf || depth >= config.max_depth {
        return make_leaf(tree, objects, &members, depth);
    }

    // Distribute members into octants, straddlers per policy
    let mut buckets: [Vec<usize>; 8] = Default::default();
    let mut resident: Vec<usize> = Vec::new();
    for &index in &members {
        let object = &objects[index];
        if straddles(&object.aabb, center) {
            match config.straddling {
                StraddlingPolicy::AssignByCenter => {
                    buckets[octant_of(center, object.aabb.center())].push(index);
                }
                StraddlingPolicy::DuplicateAll => {
                    for (octant, bucket) in buckets.iter_mut().enumerate() {
                        let (child_center, quarter) = octant_cell(center, half_width, octant);
                        let cell =
                            Aabb::from_center_extents(child_center, Vec3::from_element(quarter));
                        if object.aabb.intersects(&cell) {
                            bucket.push(index);
                        }
                    }
                }
                StraddlingPolicy::KeepAtParent => resident.push(index),
            }
        } else {
            buckets[octant_of(center, object.aabb.center())].push(index);
        }
    }

    let assigned: usize = buckets.iter().map(Vec::len).sum();
    let occupied = buckets.iter().filter(|b| !b.is_empty()).count();

    // Subdivision must actually separate something
    if occupied == 0 {
        // Every member retained at this level: stay a leaf
        return make_leaf(tree, objects, &members, depth);
    }
    if occupied == 1 && resident.is_empty() {
        log::warn!(
            "octree: no separation at depth {depth} ({} objects in one octant), emitting leaf",
            members.len()
        );
        return make_leaf(tree, objects, &members, depth);
    }
    if config.straddling == StraddlingPolicy::DuplicateAll
        && assigned as f32 > config.duplication_cutoff * members.len() as f32
    {
        log::warn!(
            "octree: duplicate-all would blow up {} objects to {assigned} at depth {depth}, emitting leaf",
            members.len()
        );
        return make_leaf(tree, objects, &members, depth);
    }

    // Materialize only non-empty children, ascending octant order
    let mut children = Vec::with_capacity(occupied);
    for (octant, bucket) in buckets.into_iter().enumerate() {
        if bucket.is_empty() {
            continue;
        }
        let (child_center, quarter) = octant_cell(center, half_width, octant);
        children.push(build_cell(
            tree, objects, bucket, child_center, quarter, depth + 1, config,
        ));
    }

    let mut aabb = children
        .iter()
        .map(|&c| tree.node(c).aabb)
        .reduce(|a, b| a.union(&b))
        .expect("internal octree node with no children");
    for &index in &resident {
        aabb = aabb.union(&objects[index].aabb);
    }

    let resident_handles = resident.iter().map(|&i| objects[i].handle).collect();
    tree.push_internal(
        children,
        SplitData::Cell { center, half_width },
        resident_handles,
        aabb,
        depth,
    )
}
