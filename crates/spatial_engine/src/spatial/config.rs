//! Build configuration
//!
//! All build behavior is selected through an explicit [`BuildConfig`] value
//! passed into `SpatialTree::build`; there is no global build state.

use serde::{Deserialize, Serialize};

use super::SpatialError;

/// Which spatial structure to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildMethod {
    /// Binary BVH built by recursive median partitioning
    TopDownBvh,
    /// Binary BVH built by greedy pairwise merging
    BottomUpBvh,
    /// 8-way adaptive octree
    Octree,
    /// Binary k-d tree with the split axis cycling by depth
    KdTree,
}

/// How top-down and k-d builders choose the split key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitHeuristic {
    /// Axis of maximum center variance, split at the median center
    MedianCenter,
    /// Axis of maximum extent variance, split at the median extent
    MedianExtent,
    /// Even positional split into k=2 equal halves by center
    EvenSplit,
}

/// Pairwise merge cost for the bottom-up BVH builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeHeuristic {
    /// Distance between node bound centers
    NearestCenter,
    /// Volume of the merged AABB
    SmallestVolume,
    /// Surface area of the merged AABB
    SmallestArea,
}

/// When BVH partitioning stops and emits a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Partition down to one object per leaf
    SingleObject,
    /// Stop at two or fewer objects per leaf
    ObjectPair,
    /// Partition until the configured maximum depth
    MaxDepth,
}

/// What the octree does with objects crossing a splitting plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StraddlingPolicy {
    /// Assign to the octant containing the object's center (default)
    AssignByCenter,
    /// Duplicate the object into every overlapping child, bounded by
    /// [`BuildConfig::duplication_cutoff`]
    DuplicateAll,
    /// Retain straddling objects at the current level instead of descending
    KeepAtParent,
}

/// Configuration for a spatial tree build
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Which structure to build
    pub method: BuildMethod,

    /// Split key selection for top-down BVH and k-d tree builds
    pub split: SplitHeuristic,

    /// Merge cost for bottom-up BVH builds
    pub merge: MergeHeuristic,

    /// Leaf termination policy for BVH builds
    pub termination: Termination,

    /// Maximum tree depth (root is depth 0)
    pub max_depth: u32,

    /// Octree/k-d subdivision threshold: leaves at or below this count stop
    pub max_objects_per_leaf: usize,

    /// Straddling policy (octree only)
    pub straddling: StraddlingPolicy,

    /// Duplicate-all safety cutoff: subdivision is abandoned when the total
    /// post-split object count exceeds this ratio of the pre-split count
    pub duplication_cutoff: f32,

    /// Visualize node bounds as spheres instead of AABBs
    pub draw_spheres: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            method: BuildMethod::TopDownBvh,
            split: SplitHeuristic::MedianCenter,
            merge: MergeHeuristic::SmallestArea,
            termination: Termination::SingleObject,
            max_depth: 16,
            max_objects_per_leaf: 4,
            straddling: StraddlingPolicy::AssignByCenter,
            duplication_cutoff: 2.0,
            draw_spheres: false,
        }
    }
}

impl BuildConfig {
    /// Check the configuration for internal consistency
    pub fn validate(&self) -> Result<(), SpatialError> {
        if self.max_depth == 0 {
            return Err(SpatialError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.max_objects_per_leaf == 0 {
            return Err(SpatialError::InvalidConfig(
                "max_objects_per_leaf must be at least 1".to_string(),
            ));
        }
        if self.duplication_cutoff < 1.0 {
            return Err(SpatialError::InvalidConfig(format!(
                "duplication_cutoff must be >= 1.0, got {}",
                self.duplication_cutoff
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BuildConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let mut config = BuildConfig::default();
        config.max_depth = 0;
        assert!(config.validate().is_err());

        let mut config = BuildConfig::default();
        config.max_objects_per_leaf = 0;
        assert!(config.validate().is_err());

        let mut config = BuildConfig::default();
        config.duplication_cutoff = 0.5;
        assert!(config.validate().is_err());
    }
}
