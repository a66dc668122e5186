//! Core types for Voronoi neighbor computation.

use bytemuck::{Pod, Zeroable};

/// A point in the unit cube, stored as three `f32` coordinates.
///
/// This type provides a small `#[repr(C)]` representation with a stable
/// layout. Coordinates are expected to lie in `[0, 1)`; values outside the
/// cube are tolerated (grid lookups clamp to the nearest cell), but the
/// tessellation volume is always the unit cube.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    /// Create a new point. Coordinates are not validated.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Create from any type implementing `Point3Like`.
    #[inline]
    pub fn from_like<P: Point3Like>(p: &P) -> Self {
        Self::new(p.x(), p.y(), p.z())
    }

    #[inline]
    pub fn to_glam(self) -> glam::Vec3 {
        glam::Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn from_glam(v: glam::Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Point3 {
    #[inline]
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Point3> for [f32; 3] {
    #[inline]
    fn from(p: Point3) -> Self {
        [p.x, p.y, p.z]
    }
}

impl From<glam::Vec3> for Point3 {
    #[inline]
    fn from(v: glam::Vec3) -> Self {
        Self::from_glam(v)
    }
}

impl From<Point3> for glam::Vec3 {
    #[inline]
    fn from(p: Point3) -> glam::Vec3 {
        p.to_glam()
    }
}

/// Trait for types that can be used as input points.
///
/// This allows zero-copy input from various math libraries.
pub trait Point3Like {
    fn x(&self) -> f32;
    fn y(&self) -> f32;
    fn z(&self) -> f32;
}

impl Point3Like for Point3 {
    #[inline]
    fn x(&self) -> f32 {
        self.x
    }
    #[inline]
    fn y(&self) -> f32 {
        self.y
    }
    #[inline]
    fn z(&self) -> f32 {
        self.z
    }
}

impl Point3Like for [f32; 3] {
    #[inline]
    fn x(&self) -> f32 {
        self[0]
    }
    #[inline]
    fn y(&self) -> f32 {
        self[1]
    }
    #[inline]
    fn z(&self) -> f32 {
        self[2]
    }
}

impl Point3Like for (f32, f32, f32) {
    #[inline]
    fn x(&self) -> f32 {
        self.0
    }
    #[inline]
    fn y(&self) -> f32 {
        self.1
    }
    #[inline]
    fn z(&self) -> f32 {
        self.2
    }
}

impl Point3Like for glam::Vec3 {
    #[inline]
    fn x(&self) -> f32 {
        self.x
    }
    #[inline]
    fn y(&self) -> f32 {
        self.y
    }
    #[inline]
    fn z(&self) -> f32 {
        self.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point3_basics() {
        let p = Point3::new(0.25, 0.5, 0.75);
        assert_eq!(p.to_glam(), glam::Vec3::new(0.25, 0.5, 0.75));
        assert_eq!(Point3::from_glam(p.to_glam()), p);
    }

    #[test]
    fn test_from_array() {
        let p: Point3 = [0.1, 0.2, 0.3].into();
        assert_eq!(p.y, 0.2);
        let a: [f32; 3] = p.into();
        assert_eq!(a, [0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_point3_like_trait() {
        fn accepts_like<P: Point3Like>(p: &P) -> f32 {
            p.x() + p.y() + p.z()
        }

        let p = Point3::new(1.0, 2.0, 3.0);
        let arr = [1.0f32, 2.0, 3.0];
        let tuple = (1.0f32, 2.0f32, 3.0f32);
        let v = glam::Vec3::new(1.0, 2.0, 3.0);

        assert_eq!(accepts_like(&p), 6.0);
        assert_eq!(accepts_like(&arr), 6.0);
        assert_eq!(accepts_like(&tuple), 6.0);
        assert_eq!(accepts_like(&v), 6.0);
    }
}
