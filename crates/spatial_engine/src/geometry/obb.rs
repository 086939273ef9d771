//! Oriented bounding box

use crate::foundation::math::Vec3;
use super::Aabb;

/// Oriented bounding box with arbitrary orthonormal axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obb {
    /// Center of the box in world space
    pub center: Vec3,
    /// Three mutually orthonormal local axes
    pub axes: [Vec3; 3],
    /// Non-negative half-extent along each local axis
    pub half_extents: Vec3,
}

impl Obb {
    /// Creates a new OBB; axes are assumed orthonormal
    pub fn new(center: Vec3, axes: [Vec3; 3], half_extents: Vec3) -> Self {
        Self { center, axes, half_extents }
    }

    /// Axis-aligned OBB equivalent to an AABB
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self {
            center: aabb.center(),
            axes: [Vec3::x(), Vec3::y(), Vec3::z()],
            half_extents: aabb.extents(),
        }
    }

    /// The 8 world-space corners of the box
    pub fn corners(&self) -> [Vec3; 8] {
        let ex = self.axes[0] * self.half_extents.x;
        let ey = self.axes[1] * self.half_extents.y;
        let ez = self.axes[2] * self.half_extents.z;
        [
            self.center - ex - ey - ez,
            self.center + ex - ey - ez,
            self.center - ex + ey - ez,
            self.center + ex + ey - ez,
            self.center - ex - ey + ez,
            self.center + ex - ey + ez,
            self.center - ex + ey + ez,
            self.center + ex + ey + ez,
        ]
    }

    /// Smallest AABB enclosing this box's world-space corners
    pub fn to_aabb(&self) -> Aabb {
        let corners = self.corners();
        let mut min = corners[0];
        let mut max = corners[0];
        for corner in &corners[1..] {
            min = min.inf(corner);
            max = max.sup(corner);
        }
        Aabb::new(min, max)
    }

    /// Check if the box contains a point (boundary inclusive)
    pub fn contains_point(&self, point: Vec3) -> bool {
        let d = point - self.center;
        let he = [self.half_extents.x, self.half_extents.y, self.half_extents.z];
        self.axes
            .iter()
            .zip(he)
            .all(|(axis, extent)| d.dot(axis).abs() <= extent)
    }
}
