//! Frustum extraction and visibility classification
//!
//! Derives the six clip planes of a camera frustum from a combined
//! view-projection matrix and classifies bounding volumes against them.

mod frustum;

pub use frustum::{Containment, Frustum};
