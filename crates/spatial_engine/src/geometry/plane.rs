//! Plane and half-space classification

use crate::foundation::math::{Vec3, EPSILON};

/// Which side of a plane a volume lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Entirely on the positive (normal) side
    Front,
    /// Entirely on the negative side
    Back,
    /// Straddling or lying on the plane
    On,
}

/// Plane defined by a unit normal and signed distance
///
/// A point `p` on the plane satisfies `dot(normal, p) + distance == 0`.
/// For frustum planes the positive side is outside the frustum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Normal vector (should be normalized)
    pub normal: Vec3,
    /// Signed distance from origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a new plane, normalizing the given normal
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal: normal.normalize(), distance }
    }

    /// Create a plane from raw coefficients without normalizing
    ///
    /// Normalization is guarded: a near-zero normal is kept as-is rather
    /// than dividing into NaN.
    pub fn from_coefficients(normal: Vec3, distance: f32) -> Self {
        let length = normal.magnitude();
        if length > EPSILON {
            Self {
                normal: normal / length,
                distance: distance / length,
            }
        } else {
            Self { normal, distance }
        }
    }

    /// Signed distance from the plane to a point
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) + self.distance
    }

    /// Classify a point against the plane
    pub fn classify_point(&self, point: Vec3) -> PlaneSide {
        let d = self.distance_to_point(point);
        if d > EPSILON {
            PlaneSide::Front
        } else if d < -EPSILON {
            PlaneSide::Back
        } else {
            PlaneSide::On
        }
    }
}
