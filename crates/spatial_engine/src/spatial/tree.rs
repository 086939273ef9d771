//! Spatial tree node arena
//!
//! All tree variants share one flat node arena. Parent links are indices
//! into the arena (never pointers), so a rebuild simply discards the whole
//! vector and the refit walk is a safe index chase.

use slotmap::SecondaryMap;

use crate::foundation::math::Vec3;
use crate::geometry::{Aabb, Sphere};
use crate::scene::{BoundsSource, ObjectHandle, SceneObject};
use super::config::{BuildConfig, BuildMethod};
use super::{bvh, kdtree, octree};

/// Index of a node in the tree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Variant-specific data carried by internal nodes
#[derive(Debug, Clone, Copy)]
pub(crate) enum SplitData {
    /// BVH internal node; the partition is implicit in the children
    Bvh,
    /// K-d split plane: world coordinate `value` on `axis` (0/1/2), plus
    /// the region box this node subdivides (children's regions tile it)
    Axis { axis: usize, value: f32, region: Aabb },
    /// Octree cell: cubic region this node subdivides
    Cell { center: Vec3, half_width: f32 },
}

/// Node payload: either leaf members or children
#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    /// Leaf holding a non-empty object list
    Leaf(Vec<ObjectHandle>),
    /// Internal node with at least one child
    ///
    /// `resident` is empty except for octree nodes under the keep-at-parent
    /// straddling policy, which retain straddlers at their level.
    Internal {
        children: Vec<NodeId>,
        data: SplitData,
        resident: Vec<ObjectHandle>,
    },
}

/// Single node in the spatial tree
#[derive(Debug, Clone)]
pub struct Node {
    /// World-space bound enclosing everything below this node
    pub aabb: Aabb,
    /// Sphere enclosing `aabb`
    pub sphere: Sphere,
    /// Depth in the tree (root = 0)
    pub depth: u32,
    /// Parent index; `None` for the root. Non-owning back-reference used
    /// only by the refit walk.
    pub parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

impl Node {
    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Objects held directly by this node
    ///
    /// The member list for a leaf; for an internal node, the straddlers
    /// retained by the octree keep-at-parent policy (usually empty).
    pub fn objects(&self) -> &[ObjectHandle] {
        match &self.kind {
            NodeKind::Leaf(objects) => objects,
            NodeKind::Internal { resident, .. } => resident,
        }
    }

    /// Child node indices (empty for leaves)
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Leaf(_) => &[],
            NodeKind::Internal { children, .. } => children,
        }
    }

    /// K-d split plane of this node: `(axis, world coordinate)`
    pub fn split_plane(&self) -> Option<(usize, f32)> {
        match self.kind {
            NodeKind::Internal { data: SplitData::Axis { axis, value, .. }, .. } => {
                Some((axis, value))
            }
            _ => None,
        }
    }

    /// K-d region box this node subdivides
    ///
    /// Distinct from `aabb`: the region is the spatial cell carved out by
    /// the ancestor split planes, while `aabb` tightly bounds the members.
    pub fn region(&self) -> Option<Aabb> {
        match self.kind {
            NodeKind::Internal { data: SplitData::Axis { region, .. }, .. } => Some(region),
            _ => None,
        }
    }

    /// Octree cell of this node: `(cube center, half-width)`
    pub fn cell(&self) -> Option<(Vec3, f32)> {
        match self.kind {
            NodeKind::Internal { data: SplitData::Cell { center, half_width }, .. } => {
                Some((center, half_width))
            }
            _ => None,
        }
    }
}

/// One node yielded by depth-first traversal
#[derive(Debug, Clone, Copy)]
pub struct TraverseItem<'a> {
    /// Arena index of the node
    pub id: NodeId,
    /// Node bound
    pub aabb: Aabb,
    /// Sphere enclosing the node bound
    pub sphere: Sphere,
    /// Depth in the tree (root = 0)
    pub depth: u32,
    /// Objects held directly by this node (see [`Node::objects`])
    pub objects: &'a [ObjectHandle],
    /// Whether this node is a leaf
    pub is_leaf: bool,
}

/// Hierarchical bounding structure over external object handles
///
/// Built as a BVH, octree, or k-d tree depending on [`BuildConfig::method`].
/// The tree owns its nodes exclusively and observes external objects only
/// through bound snapshots.
#[derive(Debug, Default)]
pub struct SpatialTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    /// Handle-to-node map for O(1) refit lookup, rebuilt with the arena
    leaf_of: SecondaryMap<ObjectHandle, NodeId>,
}

impl SpatialTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree over a snapshot of object bounds
    ///
    /// The previous arena is discarded wholesale. An empty object set
    /// produces an empty tree with no root.
    pub fn build(objects: &[SceneObject], config: &BuildConfig) -> Self {
        let mut tree = Self::new();
        if objects.is_empty() {
            log::debug!("spatial build: empty object set, tree has no root");
            return tree;
        }

        let root = match config.method {
            BuildMethod::TopDownBvh => bvh::build_top_down(&mut tree, objects, config),
            BuildMethod::BottomUpBvh => bvh::build_bottom_up(&mut tree, objects, config),
            BuildMethod::Octree => octree::build(&mut tree, objects, config),
            BuildMethod::KdTree => kdtree::build(&mut tree, objects, config),
        };
        tree.root = Some(root);

        log::debug!(
            "spatial build: {:?} over {} objects -> {} nodes ({} leaves)",
            config.method,
            objects.len(),
            tree.nodes.len(),
            tree.leaf_count(),
        );
        tree
    }

    /// Root node index, `None` for an empty tree
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Access a node by index
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaf nodes
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Total object references held by nodes
    ///
    /// Counts duplicates under the octree duplicate-all straddling policy;
    /// equals the build input count under every other policy.
    pub fn object_count(&self) -> usize {
        self.nodes.iter().map(|n| n.objects().len()).sum()
    }

    /// The node currently holding an object, if the handle is known
    pub fn leaf_containing(&self, handle: ObjectHandle) -> Option<NodeId> {
        self.leaf_of.get(handle).copied()
    }

    /// Recompute bounds along the path from an object's leaf to the root
    ///
    /// O(depth): the leaf bound is refit from its members' current bounds,
    /// then every strict ancestor is refit as the union of its children.
    /// Topology is never changed. Unknown handles are a no-op returning
    /// `false` (stale handles are expected to be resolved by a later full
    /// rebuild).
    pub fn refit_leaf<S: BoundsSource>(&mut self, handle: ObjectHandle, source: &S) -> bool {
        let Some(&node) = self.leaf_of.get(handle) else {
            return false;
        };

        log::trace!("refit: object {handle:?} at node {node:?}");
        self.recompute_bound(node, source);

        let mut current = self.nodes[node.0].parent;
        while let Some(id) = current {
            self.recompute_bound(id, source);
            current = self.nodes[id.0].parent;
        }
        true
    }

    /// Depth-first traversal yielding every node with its depth
    ///
    /// Order: a node before its children; first/left child first, octree
    /// children in ascending octant index (unmaterialized octants are
    /// absent). Suitable for level-filtered visualization.
    pub fn traverse(&self) -> Traversal<'_> {
        Traversal {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }

    /// Refit one node's bound from its members or children
    fn recompute_bound<S: BoundsSource>(&mut self, id: NodeId, source: &S) {
        let union = match &self.nodes[id.0].kind {
            NodeKind::Leaf(objects) => Self::union_of_bounds(objects, source, None),
            NodeKind::Internal { children, resident, .. } => {
                let child_union = children
                    .iter()
                    .map(|c| self.nodes[c.0].aabb)
                    .reduce(|a, b| a.union(&b));
                Self::union_of_bounds(resident, source, child_union)
            }
        };

        // A leaf whose every member vanished from the store keeps its old
        // bound; the next full rebuild drops it.
        if let Some(aabb) = union {
            let node = &mut self.nodes[id.0];
            node.aabb = aabb;
            node.sphere = Sphere::from_aabb(&aabb);
        }
    }

    fn union_of_bounds<S: BoundsSource>(
        handles: &[ObjectHandle],
        source: &S,
        seed: Option<Aabb>,
    ) -> Option<Aabb> {
        handles
            .iter()
            .filter_map(|&h| source.world_bounds(h))
            .fold(seed, |acc, b| Some(match acc {
                Some(a) => a.union(&b),
                None => b,
            }))
    }

    // ---- arena construction helpers used by the builders ----

    /// Append a leaf node and register its members in the handle map
    pub(crate) fn push_leaf(
        &mut self,
        objects: Vec<ObjectHandle>,
        aabb: Aabb,
        depth: u32,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        for &handle in &objects {
            self.leaf_of.insert(handle, id);
        }
        self.nodes.push(Node {
            aabb,
            sphere: Sphere::from_aabb(&aabb),
            depth,
            parent: None,
            kind: NodeKind::Leaf(objects),
        });
        id
    }

    /// Append an internal node, re-parenting its children
    ///
    /// The node's bound is the union of its children's bounds plus any
    /// resident objects' snapshot bounds (already folded into `aabb` by the
    /// caller).
    pub(crate) fn push_internal(
        &mut self,
        children: Vec<NodeId>,
        data: SplitData,
        resident: Vec<ObjectHandle>,
        aabb: Aabb,
        depth: u32,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        for &child in &children {
            self.nodes[child.0].parent = Some(id);
        }
        for &handle in &resident {
            self.leaf_of.insert(handle, id);
        }
        self.nodes.push(Node {
            aabb,
            sphere: Sphere::from_aabb(&aabb),
            depth,
            parent: None,
            kind: NodeKind::Internal { children, data, resident },
        });
        id
    }

    /// Assign depths root-down (used by the bottom-up builder, which only
    /// knows depths once the final merge has produced the root)
    pub(crate) fn assign_depths(&mut self, root: NodeId) {
        let mut stack = vec![(root, 0u32)];
        while let Some((id, depth)) = stack.pop() {
            self.nodes[id.0].depth = depth;
            let children: Vec<NodeId> = self.nodes[id.0].children().to_vec();
            for child in children {
                stack.push((child, depth + 1));
            }
        }
    }
}

/// Depth-first iterator over tree nodes
pub struct Traversal<'a> {
    tree: &'a SpatialTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Traversal<'a> {
    type Item = TraverseItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id.0];

        // Reverse push so the first child is visited first
        for &child in node.children().iter().rev() {
            self.stack.push(child);
        }

        Some(TraverseItem {
            id,
            aabb: node.aabb,
            sphere: node.sphere,
            depth: node.depth,
            objects: node.objects(),
            is_leaf: node.is_leaf(),
        })
    }
}
