//! Scene index: dirty tracking and the rebuild/refit lifecycle
//!
//! Owns a [`SpatialTree`] and decides, once per frame, whether the tree
//! must be rebuilt from scratch or can be incrementally refit. Change
//! notifications arrive as messages; nothing polls global state.

use crate::culling::{Containment, Frustum};
use crate::scene::{BoundsSource, ObjectHandle};
use super::config::BuildConfig;
use super::tree::SpatialTree;
use super::SpatialError;

/// External mutation notification driving the dirty flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A single known object moved or scaled; eligible for incremental refit
    Moved(ObjectHandle),
    /// Unknown or bulk mutation (spawn, despawn, many objects); forces a
    /// full rebuild
    Bulk,
}

/// Spatial index over an external object store
///
/// The index never mutates the store; it snapshots bounds at build/refit
/// time. Builds and refits run to completion inside [`SceneIndex::update`],
/// so queries never observe a partial tree, and after `update` returns all
/// queries see the new state.
#[derive(Debug)]
pub struct SceneIndex {
    tree: SpatialTree,
    config: BuildConfig,
    dirty: bool,
    moved: Vec<ObjectHandle>,
}

impl SceneIndex {
    /// Create an index with a validated build configuration
    ///
    /// The tree starts empty and dirty, so the first [`SceneIndex::update`]
    /// performs the initial build.
    pub fn new(config: BuildConfig) -> Result<Self, SpatialError> {
        config.validate()?;
        Ok(Self {
            tree: SpatialTree::new(),
            config,
            dirty: true,
            moved: Vec::new(),
        })
    }

    /// The active build configuration
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Replace the build configuration; the next update rebuilds
    pub fn set_config(&mut self, config: BuildConfig) -> Result<(), SpatialError> {
        config.validate()?;
        self.config = config;
        self.dirty = true;
        Ok(())
    }

    /// Record an external mutation
    ///
    /// A move of an object the tree already knows queues an O(depth) refit;
    /// anything else marks the whole index dirty.
    pub fn notify(&mut self, event: ChangeEvent) {
        match event {
            ChangeEvent::Bulk => {
                self.dirty = true;
                self.moved.clear();
            }
            ChangeEvent::Moved(handle) => {
                if self.dirty {
                    return; // a rebuild is already pending
                }
                if self.tree.leaf_containing(handle).is_some() {
                    self.moved.push(handle);
                } else {
                    // Unknown handle: the tree predates this object
                    self.dirty = true;
                    self.moved.clear();
                }
            }
        }
    }

    /// Whether the next update will rebuild from scratch
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Commit pending work: rebuild when dirty, otherwise apply queued
    /// refits. Returns `true` when a full rebuild happened.
    ///
    /// The dirty flag is cleared only after the fresh tree has been
    /// committed, never before.
    pub fn update<S: BoundsSource>(&mut self, source: &S) -> bool {
        if self.dirty {
            let objects = source.enumerate_objects();
            self.tree = SpatialTree::build(&objects, &self.config);
            self.dirty = false;
            self.moved.clear();
            return true;
        }

        for handle in std::mem::take(&mut self.moved) {
            self.tree.refit_leaf(handle, source);
        }
        false
    }

    /// The current tree (possibly stale if notifications are pending)
    pub fn tree(&self) -> &SpatialTree {
        &self.tree
    }

    /// Classify every live object's bound against a frustum
    ///
    /// One classification per object per call, per the frame loop contract.
    pub fn visible_objects<S: BoundsSource>(
        &self,
        frustum: &Frustum,
        source: &S,
    ) -> Vec<(ObjectHandle, Containment)> {
        source
            .enumerate_objects()
            .into_iter()
            .map(|object| (object.handle, frustum.classify_aabb(&object.aabb)))
            .collect()
    }
}
