//! Axis-aligned box primitive.

use crate::shape::{Intersection, SurfaceSample};
use lumo_math::{slab, Ray, Vec2, Vec3};

/// Distance from a face within which a hit point takes that face's normal.
const FACE_EPSILON: f32 = 1e-4;

/// Solid axis-aligned box given by its two corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShape {
    min: Vec3,
    max: Vec3,
}

impl BoxShape {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given edge lengths centered at `center`.
    pub fn from_center(center: Vec3, size: Vec3) -> Self {
        Self::new(center - 0.5 * size, center + 0.5 * size)
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        0.5 * (self.min + self.max)
    }

    /// Nearest hit along the ray.
    ///
    /// The entry parameter (clamped to zero for origins inside the box) must
    /// lie inside the ray's interval, otherwise the ray misses. Points on an
    /// edge or corner get the normal of the last matching face in x, y, z
    /// order with the max face tested after the min face.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let (near_t, far_t) = slab(self.min, self.max, ray)?;

        if !ray.t.contains(near_t) {
            return None;
        }

        let p = ray.at(near_t);
        let mut n = Vec3::ZERO;

        for (axis, &unit) in Vec3::AXES.iter().enumerate() {
            if p[axis] <= self.min[axis] + FACE_EPSILON {
                n = -unit;
            }
            if p[axis] >= self.max[axis] - FACE_EPSILON {
                n = unit;
            }
        }

        Some(Intersection {
            near_t,
            far_t,
            p,
            n,
            uv: Vec2::ZERO,
            front: ray.direction.dot(n) < 0.0,
        })
    }

    pub fn intersects(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_some()
    }

    pub fn area(&self) -> f32 {
        let size = self.size();
        2.0 * (size.x * size.y + size.x * size.z + size.y * size.z)
    }

    /// Sample on the unit cube centered at the origin.
    ///
    /// `uvw.x` picks one of the six faces, `uvw.y` and `uvw.z` place the
    /// point on it. Faces are picked uniformly regardless of their area in
    /// the scaled box.
    pub fn sample_unit(uvw: Vec3) -> SurfaceSample {
        let face = ((uvw.x * 6.0).floor() as i32).clamp(0, 5);
        let (v, w) = (uvw.y, uvw.z);

        let (p, n) = match face {
            0 => (Vec3::new(0.5, -0.5 + w, -0.5 + v), Vec3::X),
            1 => (Vec3::new(-0.5, -0.5 + w, -0.5 + v), Vec3::NEG_X),
            2 => (Vec3::new(-0.5 + v, 0.5, -0.5 + w), Vec3::Y),
            3 => (Vec3::new(-0.5 + v, -0.5, -0.5 + w), Vec3::NEG_Y),
            4 => (Vec3::new(-0.5 + v, -0.5 + w, 0.5), Vec3::Z),
            _ => (Vec3::new(-0.5 + v, -0.5 + w, -0.5), Vec3::NEG_Z),
        };

        SurfaceSample {
            p,
            n,
            uv: Vec2::new(v, w),
        }
    }

    /// Sample on this box's surface.
    ///
    /// Each face receives a sixth of the samples whatever its area, so the
    /// density is `1 / (6 * face_area)` per face rather than `1 / area()`.
    /// The two only agree for cubes.
    pub fn sample(&self, uvw: Vec3) -> SurfaceSample {
        let unit = Self::sample_unit(uvw);
        SurfaceSample {
            p: self.center() + unit.p * self.size(),
            ..unit
        }
    }
}

impl Default for BoxShape {
    /// Unit cube centered at the origin.
    fn default() -> Self {
        Self::from_center(Vec3::ZERO, Vec3::ONE)
    }
}
