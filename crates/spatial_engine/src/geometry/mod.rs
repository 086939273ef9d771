//! Geometric primitive types and intersection tests
//!
//! Provides the bounding-volume and query primitives (AABB, sphere, OBB,
//! plane, ray, triangle) together with stateless pairwise intersection
//! tests used by collision queries and tree construction.

mod aabb;
mod sphere;
mod obb;
mod plane;
mod primitives;
pub mod intersect;

pub use aabb::Aabb;
pub use sphere::Sphere;
pub use obb::Obb;
pub use plane::{Plane, PlaneSide};
pub use primitives::{Ray, Triangle};
