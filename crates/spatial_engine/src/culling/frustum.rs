//! View frustum for visibility culling

use crate::foundation::math::{Mat4, Vec3};
use crate::geometry::{Aabb, Obb, Plane, Sphere};

/// Result of classifying a volume against the frustum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// The volume is entirely inside the frustum
    Inside,
    /// The volume is entirely outside at least one frustum plane
    Outside,
    /// The volume straddles the frustum boundary
    Overlapping,
}

/// Frustum for visibility culling
///
/// Six planes ordered left, right, bottom, top, near, far. Planes follow the
/// crate-wide sign convention: normals point outward, so a positive signed
/// distance means "outside the frustum" for that plane. The frustum itself
/// is the intersection of the six negative half-spaces, which makes the
/// Outside classification monotonic: one fully-outside plane settles it.
#[derive(Debug, Clone)]
pub struct Frustum {
    /// Six planes defining the frustum (left, right, bottom, top, near, far)
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Create a frustum from six planes
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extract frustum planes from a view-projection matrix
    ///
    /// Uses the Gribb-Hartmann method: each clip plane is a sum or
    /// difference of rows of the combined matrix. Works for perspective and
    /// orthographic projections. Each plane is normalized afterwards; a
    /// plane with a near-zero normal is kept un-normalized rather than
    /// dividing into NaN.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let row = |i: usize| {
            (
                Vec3::new(vp[(i, 0)], vp[(i, 1)], vp[(i, 2)]),
                vp[(i, 3)],
            )
        };
        let (r0, d0) = row(0);
        let (r1, d1) = row(1);
        let (r2, d2) = row(2);
        let (r3, d3) = row(3);

        // Row combinations give inward-facing planes; negate for the
        // outward (positive = outside) convention.
        let planes = [
            Plane::from_coefficients(-(r3 + r0), -(d3 + d0)), // left
            Plane::from_coefficients(-(r3 - r0), -(d3 - d0)), // right
            Plane::from_coefficients(-(r3 + r1), -(d3 + d1)), // bottom
            Plane::from_coefficients(-(r3 - r1), -(d3 - d1)), // top
            Plane::from_coefficients(-(r3 + r2), -(d3 + d2)), // near
            Plane::from_coefficients(-(r3 - r2), -(d3 - d2)), // far
        ];

        Self { planes }
    }

    /// Classify a sphere against all six planes
    ///
    /// Outside short-circuits on the first separating plane; Inside requires
    /// every plane to clear the full radius.
    pub fn classify_sphere(&self, sphere: &Sphere) -> Containment {
        let mut inside_all = true;
        for plane in &self.planes {
            let distance = plane.distance_to_point(sphere.center);
            if distance > sphere.radius {
                return Containment::Outside;
            }
            if distance > -sphere.radius {
                inside_all = false;
            }
        }

        if inside_all {
            Containment::Inside
        } else {
            Containment::Overlapping
        }
    }

    /// Classify an AABB against all six planes
    ///
    /// Tests the two extremal corners along each plane normal: if the
    /// nearest corner is outside some plane the box is Outside; the box is
    /// Inside only when the farthest corner clears every plane.
    pub fn classify_aabb(&self, aabb: &Aabb) -> Containment {
        let center = aabb.center();
        let extents = aabb.extents();

        let mut inside_all = true;
        for plane in &self.planes {
            let projected_radius = extents.x * plane.normal.x.abs()
                + extents.y * plane.normal.y.abs()
                + extents.z * plane.normal.z.abs();
            let distance = plane.distance_to_point(center);

            if distance - projected_radius > 0.0 {
                return Containment::Outside;
            }
            if distance + projected_radius > 0.0 {
                inside_all = false;
            }
        }

        if inside_all {
            Containment::Inside
        } else {
            Containment::Overlapping
        }
    }

    /// Classify an OBB against all six planes
    ///
    /// Approximated by classifying the AABB enclosing the OBB's world-space
    /// corners. Conservative: a rotated box near a plane may report
    /// Overlapping where exact separation would report Outside.
    pub fn classify_obb(&self, obb: &Obb) -> Containment {
        self.classify_aabb(&obb.to_aabb())
    }
}
