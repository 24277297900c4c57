//! Sphere primitive.

use crate::sampling::uniform_sample_sphere;
use crate::shape::{Intersection, ShapeError, ShapeResult, SurfaceSample};
use lumo_math::{Ray, Vec2, Vec3};
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> ShapeResult<Self> {
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(ShapeError::InvalidRadius(radius));
        }

        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn sphere_uv(p: Vec3) -> Vec2 {
        // theta: angle down from +Y, phi: angle around Y from +X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;
        Vec2::new(phi / (2.0 * PI), theta / PI)
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let t0 = (h - sqrtd) / a;
        let t1 = (h + sqrtd) / a;

        // Nearest root in the acceptable range
        let near_t = if ray.t.contains(t0) {
            t0
        } else if ray.t.contains(t1) {
            t1
        } else {
            return None;
        };

        let p = ray.at(near_t);
        let n = (p - self.center) / self.radius;

        Some(Intersection {
            near_t,
            far_t: t1,
            p,
            n,
            uv: Self::sphere_uv(n),
            front: ray.direction.dot(n) < 0.0,
        })
    }

    /// Occlusion test on the roots alone, skipping normal and uv.
    pub fn intersects(&self, ray: &Ray) -> bool {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();
        ray.t.contains((h - sqrtd) / a) || ray.t.contains((h + sqrtd) / a)
    }

    pub fn area(&self) -> f32 {
        4.0 * PI * self.radius * self.radius
    }

    pub fn sample(&self, uvw: Vec3) -> SurfaceSample {
        let n = uniform_sample_sphere(uvw.truncate());
        SurfaceSample {
            p: self.center + n * self.radius,
            n,
            uv: Self::sphere_uv(n),
        }
    }
}
