//! Spatial tree construction, maintenance, and queries
//!
//! One node arena, four build strategies: top-down BVH, bottom-up BVH,
//! adaptive octree, and axis-cycling k-d tree. The tree observes external
//! object bounds by value at build/refit time and answers frustum
//! classification and traversal queries afterwards.

mod config;
mod tree;
mod bvh;
mod octree;
mod kdtree;
mod index;

pub use config::{
    BuildConfig, BuildMethod, MergeHeuristic, SplitHeuristic, StraddlingPolicy, Termination,
};
pub use index::{ChangeEvent, SceneIndex};
pub use tree::{Node, NodeId, SpatialTree, Traversal, TraverseItem};

use thiserror::Error;

/// Errors reported by the spatial subsystem
///
/// Geometric queries never error; only configuration validation does.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The build configuration is internally inconsistent
    #[error("invalid build configuration: {0}")]
    InvalidConfig(String),
}
