//! Stateless pairwise intersection tests
//!
//! Pure functions over the geometry primitives. Degenerate inputs (parallel
//! rays, near-zero determinants) report no intersection instead of
//! propagating NaN.

use crate::foundation::math::{Vec3, EPSILON};
use super::{Aabb, Obb, Plane, PlaneSide, Ray, Sphere, Triangle};

/// Test whether two spheres overlap (boundary contact counts)
pub fn sphere_vs_sphere(a: &Sphere, b: &Sphere) -> bool {
    a.intersects(b)
}

/// Test whether two AABBs overlap on all three axes
pub fn aabb_vs_aabb(a: &Aabb, b: &Aabb) -> bool {
    a.intersects(b)
}

/// Test whether a sphere overlaps an AABB
///
/// Clamps the sphere center into the box and compares the squared
/// distance against the squared radius.
pub fn sphere_vs_aabb(sphere: &Sphere, aabb: &Aabb) -> bool {
    let closest = Vec3::new(
        sphere.center.x.clamp(aabb.min.x, aabb.max.x),
        sphere.center.y.clamp(aabb.min.y, aabb.max.y),
        sphere.center.z.clamp(aabb.min.z, aabb.max.z),
    );
    (closest - sphere.center).magnitude_squared() <= sphere.radius * sphere.radius
}

/// Slab-method ray/AABB test
///
/// Returns the entry distance (or the exit distance when the origin is
/// inside the box); always >= 0 when `Some`.
pub fn ray_vs_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    aabb.intersect_ray(ray.origin, ray.direction)
}

/// Möller-Trumbore ray/triangle intersection
///
/// Returns the distance along the ray when it passes through the triangle.
/// Rays parallel to the triangle plane (|det| < epsilon) and hits behind
/// the origin report `None`.
///
/// See: "Fast, Minimum Storage Ray/Triangle Intersection" by Möller & Trumbore
pub fn ray_vs_triangle(ray: &Ray, tri: &Triangle) -> Option<f32> {
    let edge1 = tri.v1 - tri.v0;
    let edge2 = tri.v2 - tri.v0;

    let h = ray.direction.cross(&edge2);
    let det = edge1.dot(&h);

    // Ray parallel to triangle?
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - tri.v0;
    let u = inv_det * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = inv_det * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(&q);
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Ray/plane intersection distance
///
/// `None` when the ray is parallel to the plane or the hit lies behind
/// the origin.
pub fn ray_vs_plane(ray: &Ray, plane: &Plane) -> Option<f32> {
    let denom = plane.normal.dot(&ray.direction);
    if denom.abs() < EPSILON {
        return None;
    }

    let t = -(plane.normal.dot(&ray.origin) + plane.distance) / denom;
    if t >= 0.0 {
        Some(t)
    } else {
        None
    }
}

/// Signed distance from a plane to a point
pub fn point_vs_plane(point: Vec3, plane: &Plane) -> f32 {
    plane.distance_to_point(point)
}

/// Test whether a point lies inside a triangle (barycentric, in-plane)
///
/// All three barycentric coordinates must be non-negative. Degenerate
/// triangles (near-zero area) report `false`.
pub fn point_vs_triangle(point: Vec3, tri: &Triangle) -> bool {
    let edge1 = tri.v1 - tri.v0;
    let edge2 = tri.v2 - tri.v0;
    let p = point - tri.v0;

    let d11 = edge1.dot(&edge1);
    let d12 = edge1.dot(&edge2);
    let d22 = edge2.dot(&edge2);
    let dp1 = p.dot(&edge1);
    let dp2 = p.dot(&edge2);

    let denom = d11 * d22 - d12 * d12;
    if denom.abs() < EPSILON {
        return false;
    }

    let u = (d22 * dp1 - d12 * dp2) / denom;
    let v = (d11 * dp2 - d12 * dp1) / denom;
    u >= -EPSILON && v >= -EPSILON && u + v <= 1.0 + EPSILON
}

/// Classify an AABB against a plane via extremal-corner projection
///
/// Projects the box extents onto the plane normal; the box straddles the
/// plane when the center distance is within the projected radius.
pub fn plane_vs_aabb(plane: &Plane, aabb: &Aabb) -> PlaneSide {
    let extents = aabb.extents();
    let projected_radius = extents.x * plane.normal.x.abs()
        + extents.y * plane.normal.y.abs()
        + extents.z * plane.normal.z.abs();
    let center_distance = plane.distance_to_point(aabb.center());

    if center_distance > projected_radius {
        PlaneSide::Front
    } else if center_distance < -projected_radius {
        PlaneSide::Back
    } else {
        PlaneSide::On
    }
}

/// Classify a sphere against a plane via signed center distance
pub fn plane_vs_sphere(plane: &Plane, sphere: &Sphere) -> PlaneSide {
    let distance = plane.distance_to_point(sphere.center);
    if distance > sphere.radius {
        PlaneSide::Front
    } else if distance < -sphere.radius {
        PlaneSide::Back
    } else {
        PlaneSide::On
    }
}

/// Test whether a sphere overlaps an OBB's world-space enclosing AABB
///
/// Conservative: exact sphere/OBB separation is not attempted.
pub fn sphere_vs_obb(sphere: &Sphere, obb: &Obb) -> bool {
    sphere_vs_aabb(sphere, &obb.to_aabb())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_aabb_vs_aabb_overlap() {
        let a = Aabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.5, 1.5, 1.5));
        assert!(aabb_vs_aabb(&a, &b));

        let c = Aabb::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(3.0, 1.0, 1.0));
        assert!(!aabb_vs_aabb(&a, &c));
    }

    #[test]
    fn test_sphere_vs_sphere_separated() {
        let a = Sphere::new(Vec3::zeros(), 1.0);
        let b = Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0);
        // Distance 3 > sum of radii 2
        assert!(!sphere_vs_sphere(&a, &b));

        let c = Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        assert!(sphere_vs_sphere(&a, &c));
    }

    #[test]
    fn test_ray_vs_aabb_entry_distance() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        let t = ray_vs_aabb(&ray, &aabb).expect("ray should hit the box");
        assert_relative_eq!(t, 4.0);
    }

    #[test]
    fn test_ray_vs_aabb_origin_inside() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        let t = ray_vs_aabb(&ray, &aabb).expect("origin inside should hit");
        assert!(t >= 0.0);
    }

    #[test]
    fn test_ray_vs_aabb_miss() {
        let ray = Ray::new(Vec3::new(-5.0, 5.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(ray_vs_aabb(&ray, &aabb).is_none());
    }

    #[test]
    fn test_sphere_vs_aabb_touching_face() {
        let sphere = Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(sphere_vs_aabb(&sphere, &aabb));

        let far = Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0);
        assert!(!sphere_vs_aabb(&far, &aabb));
    }

    #[test]
    fn test_ray_vs_triangle_hit_and_parallel() {
        let tri = Triangle::new(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );

        let hit = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::z());
        let t = ray_vs_triangle(&hit, &tri).expect("should hit triangle");
        assert_relative_eq!(t, 5.0);

        // Ray lying in the triangle plane is parallel
        let parallel = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::x());
        assert!(ray_vs_triangle(&parallel, &tri).is_none());

        let miss = Ray::new(Vec3::new(5.0, 5.0, -5.0), Vec3::z());
        assert!(ray_vs_triangle(&miss, &tri).is_none());
    }

    #[test]
    fn test_ray_vs_plane() {
        let plane = Plane::new(Vec3::z(), 0.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::z());

        let t = ray_vs_plane(&ray, &plane).expect("should hit plane");
        assert_relative_eq!(t, 3.0);

        let parallel = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::x());
        assert!(ray_vs_plane(&parallel, &plane).is_none());

        let away = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::z());
        assert!(ray_vs_plane(&away, &plane).is_none());
    }

    #[test]
    fn test_point_vs_triangle() {
        let tri = Triangle::new(
            Vec3::zeros(),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        );

        assert!(point_vs_triangle(Vec3::new(0.5, 0.5, 0.0), &tri));
        assert!(point_vs_triangle(Vec3::new(1.0, 1.0, 0.0), &tri)); // on hypotenuse
        assert!(!point_vs_triangle(Vec3::new(1.5, 1.5, 0.0), &tri));

        // Degenerate triangle reports no containment
        let degenerate = Triangle::new(Vec3::zeros(), Vec3::x(), Vec3::new(2.0, 0.0, 0.0));
        assert!(!point_vs_triangle(Vec3::new(0.5, 0.0, 0.0), &degenerate));
    }

    #[test]
    fn test_plane_vs_aabb_classification() {
        let plane = Plane::new(Vec3::x(), 0.0); // yz plane

        let front = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert_eq!(plane_vs_aabb(&plane, &front), PlaneSide::Front);

        let back = Aabb::new(Vec3::new(-2.0, 0.0, 0.0), Vec3::new(-1.0, 1.0, 1.0));
        assert_eq!(plane_vs_aabb(&plane, &back), PlaneSide::Back);

        let straddling = Aabb::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(plane_vs_aabb(&plane, &straddling), PlaneSide::On);
    }

    #[test]
    fn test_plane_vs_sphere_classification() {
        let plane = Plane::new(Vec3::y(), 0.0);

        assert_eq!(
            plane_vs_sphere(&plane, &Sphere::new(Vec3::new(0.0, 3.0, 0.0), 1.0)),
            PlaneSide::Front
        );
        assert_eq!(
            plane_vs_sphere(&plane, &Sphere::new(Vec3::new(0.0, -3.0, 0.0), 1.0)),
            PlaneSide::Back
        );
        assert_eq!(
            plane_vs_sphere(&plane, &Sphere::new(Vec3::new(0.0, 0.5, 0.0), 1.0)),
            PlaneSide::On
        );
    }
}
