//! Finite rectangle, mostly used as an area light.

use crate::shape::{Intersection, SurfaceSample};
use lumo_math::{Ray, Vec2, Vec3};

/// Rectangle centered at `center` spanned by `tangent` and `bitangent`.
///
/// `bitangent = normal x tangent`, so `(tangent, bitangent, normal)` is right
/// handed. The normal marks the front side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    center: Vec3,
    normal: Vec3,
    tangent: Vec3,
    bitangent: Vec3,
    size: Vec2,
}

impl Plane {
    /// Create a rectangle. `tangent` is orthogonalized against `normal`.
    pub fn new(center: Vec3, normal: Vec3, tangent: Vec3, size: Vec2) -> Self {
        let normal = normal.normalize();
        let tangent = (tangent - normal * normal.dot(tangent)).normalize();
        Self {
            center,
            normal,
            tangent,
            bitangent: normal.cross(tangent),
            size: size.abs(),
        }
    }

    /// Rectangle with an arbitrary in-plane orientation.
    pub fn from_normal(center: Vec3, normal: Vec3, size: Vec2) -> Self {
        let (tangent, _) = normal.normalize().any_orthonormal_pair();
        Self::new(center, normal, tangent, size)
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn tangent(&self) -> Vec3 {
        self.tangent
    }

    pub fn bitangent(&self) -> Vec3 {
        self.bitangent
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let denom = ray.direction.dot(self.normal);
        if denom == 0.0 {
            return None;
        }

        let t = (self.center - ray.origin).dot(self.normal) / denom;
        if !ray.t.contains(t) {
            return None;
        }

        let p = ray.at(t);
        let local = p - self.center;
        let u = local.dot(self.tangent);
        let v = local.dot(self.bitangent);
        let half = 0.5 * self.size;

        if u.abs() > half.x || v.abs() > half.y {
            return None;
        }

        Some(Intersection {
            near_t: t,
            far_t: t,
            p,
            n: self.normal,
            uv: Vec2::new(u / self.size.x + 0.5, v / self.size.y + 0.5),
            front: denom < 0.0,
        })
    }

    pub fn intersects(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_some()
    }

    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }

    pub fn sample(&self, uvw: Vec3) -> SurfaceSample {
        let uv = uvw.truncate();
        let local = (uv - Vec2::splat(0.5)) * self.size;
        SurfaceSample {
            p: self.center + self.tangent * local.x + self.bitangent * local.y,
            n: self.normal,
            uv,
        }
    }
}
