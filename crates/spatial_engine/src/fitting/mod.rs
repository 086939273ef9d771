//! Bounding volume fitting
//!
//! Computes tight bounding volumes from point sets: a one-pass AABB, a
//! Ritter-style approximate bounding sphere, an iteratively refined sphere,
//! and PCA-aligned sphere/OBB fits.
//!
//! All functions return `None` on empty input; callers keep their previous
//! volume in that case.

mod pca;

pub use pca::{covariance, pca_obb, pca_sphere};

use crate::foundation::math::Vec3;
use crate::geometry::{Aabb, Sphere};

/// Configuration for iterative sphere refinement
#[derive(Debug, Clone, Copy)]
pub struct RefineConfig {
    /// Number of refinement passes
    pub iterations: u32,

    /// Blend factor moving the center toward the outside-point centroid
    /// per pass (0 = no movement, 1 = jump to the centroid)
    pub shrink_ratio: f32,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            iterations: 8,
            shrink_ratio: 0.5,
        }
    }
}

/// Compute the tight AABB of a point set in a single pass
pub fn fit_aabb(points: &[Vec3]) -> Option<Aabb> {
    let (first, rest) = points.split_first()?;

    let mut min = *first;
    let mut max = *first;
    for p in rest {
        min = min.inf(p);
        max = max.sup(p);
    }
    Some(Aabb::new(min, max))
}

/// Compute an approximate bounding sphere using Ritter's method
///
/// The most-separated pair is approximated from the 6 axis-extremal points
/// rather than the exact O(n^2) search; the result is a valid enclosing
/// sphere but not the minimal one. The seed sphere spans that pair, then one
/// growth pass expands it minimally over every outside point.
pub fn ritter_sphere(points: &[Vec3]) -> Option<Sphere> {
    let first = *points.first()?;

    // Extremal point along each world axis, 6 candidates
    let mut extremes = [(first, first); 3];
    for p in points {
        for axis in 0..3 {
            if p[axis] < extremes[axis].0[axis] {
                extremes[axis].0 = *p;
            }
            if p[axis] > extremes[axis].1[axis] {
                extremes[axis].1 = *p;
            }
        }
    }

    // Pick the candidate pair with maximum squared separation
    let (mut a, mut b) = extremes[0];
    let mut best = (b - a).magnitude_squared();
    for &(lo, hi) in &extremes[1..] {
        let d = (hi - lo).magnitude_squared();
        if d > best {
            best = d;
            a = lo;
            b = hi;
        }
    }

    let mut center = (a + b) * 0.5;
    let mut radius = best.sqrt() * 0.5;

    // Growth pass: enclose every point outside the current sphere
    for p in points {
        let offset = p - center;
        let distance = offset.magnitude();
        if distance > radius {
            let new_radius = (radius + distance) * 0.5;
            center += offset * ((new_radius - radius) / distance);
            radius = new_radius;
        }
    }

    Some(Sphere::new(center, radius))
}

/// Iteratively tighten a bounding sphere around a point set
///
/// Each pass blends the center toward the distance-weighted centroid of the
/// points currently outside the sphere, then recomputes the radius as the
/// true maximum distance. The radius recompute guarantees the result always
/// encloses every input point.
pub fn refine_sphere(points: &[Vec3], sphere: Sphere, config: &RefineConfig) -> Sphere {
    if points.is_empty() {
        return sphere;
    }

    let mut center = sphere.center;
    let mut radius = sphere.radius;

    for _ in 0..config.iterations {
        let mut weighted_sum = Vec3::zeros();
        let mut weight_total = 0.0;
        for p in points {
            let distance = (p - center).magnitude();
            if distance > radius {
                let weight = distance - radius;
                weighted_sum += p * weight;
                weight_total += weight;
            }
        }

        if weight_total > 0.0 {
            let target = weighted_sum / weight_total;
            center += (target - center) * config.shrink_ratio;
        }

        radius = points
            .iter()
            .map(|p| (p - center).magnitude())
            .fold(0.0, f32::max);
    }

    Sphere::new(center, radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_points() -> Vec<Vec3> {
        let mut points = Vec::new();
        for &x in &[-1.0, 1.0] {
            for &y in &[-1.0, 1.0] {
                for &z in &[-1.0, 1.0] {
                    points.push(Vec3::new(x, y, z));
                }
            }
        }
        points
    }

    #[test]
    fn test_fit_aabb_empty_is_none() {
        assert!(fit_aabb(&[]).is_none());
        assert!(ritter_sphere(&[]).is_none());
    }

    #[test]
    fn test_fit_aabb_contains_all_points() {
        let points = cube_points();
        let aabb = fit_aabb(&points).unwrap();

        assert_eq!(aabb.min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 1.0, 1.0));
        for p in &points {
            assert!(aabb.contains_point(*p));
        }
    }

    #[test]
    fn test_fit_aabb_single_point() {
        let p = Vec3::new(3.0, -2.0, 7.0);
        let aabb = fit_aabb(&[p]).unwrap();
        assert_eq!(aabb.min, aabb.max);
        assert!(aabb.contains_point(p));
    }

    #[test]
    fn test_ritter_sphere_contains_all_points() {
        let points = cube_points();
        let sphere = ritter_sphere(&points).unwrap();

        // Small slack for float accumulation in the growth pass
        for p in &points {
            let distance = (p - sphere.center).magnitude();
            assert!(distance <= sphere.radius + 1e-4);
        }
    }

    #[test]
    fn test_ritter_sphere_collinear_points() {
        let points: Vec<Vec3> = (0..10).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let sphere = ritter_sphere(&points).unwrap();

        for p in &points {
            assert!((p - sphere.center).magnitude() <= sphere.radius + 1e-4);
        }
    }

    #[test]
    fn test_refine_sphere_never_excludes_points() {
        let mut points = cube_points();
        points.push(Vec3::new(4.0, 0.0, 0.0)); // lopsided outlier

        let seed = ritter_sphere(&points).unwrap();
        let refined = refine_sphere(&points, seed, &RefineConfig::default());

        for p in &points {
            assert!((p - refined.center).magnitude() <= refined.radius + 1e-4);
        }
        // Refinement should not blow the sphere up
        assert!(refined.radius <= seed.radius * 1.5);
    }

    #[test]
    fn test_refine_sphere_empty_passthrough() {
        let seed = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 4.0);
        let refined = refine_sphere(&[], seed, &RefineConfig::default());
        assert_eq!(refined, seed);
    }
}
