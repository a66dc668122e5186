//! Plane primitives for the dual-form cell representation.
//!
//! A half-space is stored as `Vec4 (n.x, n.y, n.z, d)` with the inside
//! given by `n . x + d < 0`. Cell vertices are never stored; they are the
//! homogeneous intersections of plane triples and get recomputed on demand.

use glam::{Vec3, Vec4};

/// Perpendicular bisector between `p` and `q`, oriented so `p` is inside.
#[inline]
pub(crate) fn bisect(p: Vec3, q: Vec3) -> Vec4 {
    let n = q - p;
    let mid = (p + q) * 0.5;
    Vec4::new(n.x, n.y, n.z, -n.dot(mid))
}

/// Homogeneous intersection point of three planes.
///
/// Returns `(v, w)` with the Euclidean point at `v / w`; `w == 0` means the
/// planes have no common point (two of them are parallel).
#[inline]
pub(crate) fn intersect(p1: Vec4, p2: Vec4, p3: Vec4) -> Vec4 {
    let n1 = p1.truncate();
    let n2 = p2.truncate();
    let n3 = p3.truncate();
    let w = n1.dot(n2.cross(n3));
    let v = n2.cross(n3) * -p1.w + n3.cross(n1) * -p2.w + n1.cross(n2) * -p3.w;
    Vec4::new(v.x, v.y, v.z, w)
}

/// True if the homogeneous point `vertex` lies strictly outside `plane`.
///
/// A 4-dot of exactly zero (vertex on the plane) counts as inside; this is
/// the fixed tie-break that keeps coincident generators inert and both
/// execution paths bit-identical.
#[inline]
pub(crate) fn is_outside(plane: Vec4, vertex: Vec4) -> bool {
    let s = plane.dot(vertex);
    let w = vertex.w;
    if w != 0.0 {
        // sign(s / w) without the division
        s * w > 0.0
    } else {
        // Vertex at infinity: test the direction instead.
        plane.truncate().dot(vertex.truncate()) > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bisect_orientation() {
        let p = Vec3::new(0.2, 0.5, 0.5);
        let q = Vec3::new(0.8, 0.5, 0.5);
        let plane = bisect(p, q);

        // p is inside, q is outside, the midpoint is on the plane.
        let side = |x: Vec3| plane.truncate().dot(x) + plane.w;
        assert!(side(p) < 0.0);
        assert!(side(q) > 0.0);
        assert!(side((p + q) * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_intersect_cube_corner() {
        // x = 1, y = 1, z = 1 meet at (1, 1, 1).
        let px = Vec4::new(1.0, 0.0, 0.0, -1.0);
        let py = Vec4::new(0.0, 1.0, 0.0, -1.0);
        let pz = Vec4::new(0.0, 0.0, 1.0, -1.0);
        let v = intersect(px, py, pz);
        assert!(v.w != 0.0);
        assert_eq!(v.truncate() / v.w, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_intersect_negative_weight() {
        // The origin corner of the unit cube, with planes ordered so the
        // determinant is negative: the Euclidean point is unaffected.
        let px = Vec4::new(-1.0, 0.0, 0.0, 0.0);
        let py = Vec4::new(0.0, -1.0, 0.0, 0.0);
        let pz = Vec4::new(0.0, 0.0, -1.0, 0.0);
        let v = intersect(px, py, pz);
        assert!(v.w < 0.0);
        assert_eq!(v.truncate(), Vec3::ZERO);

        // Side tests still work through the sign of w.
        let cut = Vec4::new(1.0, 0.0, 0.0, -0.5); // x = 0.5, inside is x < 0.5
        assert!(!is_outside(cut, v));
        let cut = Vec4::new(-1.0, 0.0, 0.0, 0.25); // inside is x > 0.25
        assert!(is_outside(cut, v));
    }

    #[test]
    fn test_is_outside_tie_is_inside() {
        let plane = Vec4::new(1.0, 0.0, 0.0, -0.5);
        let on_plane = Vec4::new(0.5, 0.3, 0.3, 1.0);
        assert!(!is_outside(plane, on_plane));
    }

    #[test]
    fn test_parallel_planes_no_intersection() {
        let p1 = Vec4::new(1.0, 0.0, 0.0, 0.0);
        let p2 = Vec4::new(1.0, 0.0, 0.0, -1.0);
        let p3 = Vec4::new(0.0, 1.0, 0.0, 0.0);
        assert_eq!(intersect(p1, p2, p3).w, 0.0);
    }
}
