//! PCA-based bounding volume fitting
//!
//! Fits a sphere and an oriented box aligned to the principal axes of a
//! point set. The covariance matrix is symmetric, so the symmetric
//! eigen-solver is used; it stays well-behaved on rank-deficient
//! (collinear/coplanar) inputs where a general solver would not.

use nalgebra::linalg::SymmetricEigen;

use crate::foundation::math::{Mat3, Vec3, EPSILON};
use crate::geometry::{Obb, Sphere};

/// Covariance matrix of a point set about its centroid
///
/// Returns the zero matrix for empty or single-point input.
pub fn covariance(points: &[Vec3]) -> Mat3 {
    if points.len() < 2 {
        return Mat3::zeros();
    }

    let n = points.len() as f32;
    let centroid: Vec3 = points.iter().sum::<Vec3>() / n;

    let mut cov = Mat3::zeros();
    for p in points {
        let d = p - centroid;
        cov += d * d.transpose();
    }
    cov / n
}

/// Principal axes of a point set, re-orthonormalized
///
/// Eigenvectors of a symmetric matrix are orthogonal in exact arithmetic
/// but drift numerically; the basis is rebuilt by Gram-Schmidt with the
/// third axis taken as a cross product. Degenerate point sets fall back
/// to the world axes for the missing directions.
fn principal_axes(points: &[Vec3]) -> [Vec3; 3] {
    let eigen = SymmetricEigen::new(covariance(points));

    let e0: Vec3 = eigen.eigenvectors.column(0).into_owned();
    let e1: Vec3 = eigen.eigenvectors.column(1).into_owned();

    let axis0 = if e0.magnitude() > EPSILON {
        e0.normalize()
    } else {
        Vec3::x()
    };

    let mut axis1 = e1 - axis0 * e1.dot(&axis0);
    if axis1.magnitude() > EPSILON {
        axis1.normalize_mut();
    } else {
        // e1 collapsed onto axis0; pick the world axis least aligned with it
        let fallback = if axis0.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
        axis1 = (fallback - axis0 * fallback.dot(&axis0)).normalize();
    }

    let axis2 = axis0.cross(&axis1);
    [axis0, axis1, axis2]
}

/// Projected min/max range of the points along each axis, about the centroid
fn eigenspace_extents(points: &[Vec3], centroid: Vec3, axes: &[Vec3; 3]) -> [(f32, f32); 3] {
    let mut ranges = [(f32::MAX, f32::MIN); 3];
    for p in points {
        let d = p - centroid;
        for (axis, range) in axes.iter().zip(ranges.iter_mut()) {
            let t = d.dot(axis);
            range.0 = range.0.min(t);
            range.1 = range.1.max(t);
        }
    }
    ranges
}

/// Fit a bounding sphere centered on the principal-axis extent midpoint
///
/// The center is a heuristic; the radius is recomputed as the true farthest
/// point distance in world space, so containment always holds.
pub fn pca_sphere(points: &[Vec3]) -> Option<Sphere> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f32;
    let centroid: Vec3 = points.iter().sum::<Vec3>() / n;
    let axes = principal_axes(points);
    let ranges = eigenspace_extents(points, centroid, &axes);

    let mut center = centroid;
    for (axis, (lo, hi)) in axes.iter().zip(ranges) {
        center += axis * ((lo + hi) * 0.5);
    }

    let radius = points
        .iter()
        .map(|p| (p - center).magnitude())
        .fold(0.0, f32::max);

    Some(Sphere::new(center, radius))
}

/// Fit a PCA-aligned oriented bounding box
pub fn pca_obb(points: &[Vec3]) -> Option<Obb> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f32;
    let centroid: Vec3 = points.iter().sum::<Vec3>() / n;
    let axes = principal_axes(points);
    let ranges = eigenspace_extents(points, centroid, &axes);

    let mut center = centroid;
    for (axis, (lo, hi)) in axes.iter().zip(ranges) {
        center += axis * ((lo + hi) * 0.5);
    }

    let half_extents = Vec3::new(
        (ranges[0].1 - ranges[0].0) * 0.5,
        (ranges[1].1 - ranges[1].0) * 0.5,
        (ranges[2].1 - ranges[2].0) * 0.5,
    );

    Some(Obb::new(center, axes, half_extents))
}
