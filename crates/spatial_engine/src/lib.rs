//! # Spatial Engine
//!
//! Spatial acceleration structures for 3D scenes.
//!
//! ## Features
//!
//! - **Bounding Volume Fitting**: tight AABBs, Ritter / iteratively refined /
//!   PCA bounding spheres, and PCA-aligned oriented boxes from point sets
//! - **Primitive Intersection Tests**: sphere, AABB, OBB, plane, triangle,
//!   ray, and point overlap/containment queries
//! - **Frustum Culling**: Gribb-Hartmann plane extraction and three-state
//!   inside/outside/overlapping classification
//! - **Spatial Trees**: a unified node arena buildable as a top-down or
//!   bottom-up BVH, an adaptive octree, or an axis-cycling k-d tree, with
//!   incremental refit and level-tagged traversal
//!
//! ## Quick Start
//!
//! ```rust
//! use spatial_engine::prelude::*;
//!
//! let mut store = ObjectSet::new();
//! store.insert(Aabb::from_center_extents(
//!     Vec3::new(0.0, 0.0, 0.0),
//!     Vec3::new(1.0, 1.0, 1.0),
//! ));
//!
//! let mut index = SceneIndex::new(BuildConfig::default()).unwrap();
//! index.notify(ChangeEvent::Bulk);
//! index.update(&store);
//!
//! for node in index.tree().traverse() {
//!     println!("depth {}: {:?}", node.depth, node.aabb);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod geometry;
pub mod fitting;
pub mod culling;
pub mod scene;
pub mod spatial;

pub use spatial::SpatialError;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        foundation::math::{Vec3, Mat3, Mat4},
        geometry::{Aabb, Sphere, Obb, Plane, Ray, Triangle},
        culling::{Frustum, Containment},
        scene::{ObjectHandle, SceneObject, BoundsSource, ObjectSet},
        spatial::{
            SpatialTree, SceneIndex, ChangeEvent, SpatialError,
            BuildConfig, BuildMethod, SplitHeuristic, MergeHeuristic,
            Termination, StraddlingPolicy,
        },
    };
}
