//! Closed set of analytic shapes used for scene objects and area lights.

use crate::{BoxShape, Plane, Sphere};
use lumo_math::{Ray, Vec2, Vec3};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ShapeError {
    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
}

pub type ShapeResult<T> = Result<T, ShapeError>;

/// Record of a ray-shape intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Parameter of the accepted hit
    pub near_t: f32,
    /// Parameter where the ray leaves the shape (equal to `near_t` for planes)
    pub far_t: f32,
    /// Hit position
    pub p: Vec3,
    /// Outward unit normal at `p`, zero where none is defined
    pub n: Vec3,
    pub uv: Vec2,
    /// Whether the ray arrived from the side the normal faces
    pub front: bool,
}

/// A point drawn from a shape's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub p: Vec3,
    /// Outward unit normal at `p`
    pub n: Vec3,
    pub uv: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box(BoxShape),
    Sphere(Sphere),
    Plane(Plane),
}

impl Shape {
    /// Nearest hit inside the ray's interval.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        match self {
            Shape::Box(shape) => shape.intersect(ray),
            Shape::Sphere(shape) => shape.intersect(ray),
            Shape::Plane(shape) => shape.intersect(ray),
        }
    }

    /// Occlusion query: does the ray hit the shape inside its interval?
    pub fn intersects(&self, ray: &Ray) -> bool {
        match self {
            Shape::Box(shape) => shape.intersects(ray),
            Shape::Sphere(shape) => shape.intersects(ray),
            Shape::Plane(shape) => shape.intersects(ray),
        }
    }

    /// Map a uniform sample in the unit cube to a point on the surface.
    ///
    /// Spheres and planes are sampled uniformly by area. Boxes pick one of
    /// their six faces uniformly and then a uniform point on it, so the
    /// density only equals `1 / area` for cubes; on elongated boxes small
    /// faces are oversampled and light estimates that divide by the total
    /// area are biased.
    pub fn sample(&self, uvw: Vec3) -> SurfaceSample {
        match self {
            Shape::Box(shape) => shape.sample(uvw),
            Shape::Sphere(shape) => shape.sample(uvw),
            Shape::Plane(shape) => shape.sample(uvw),
        }
    }

    /// Total surface area.
    pub fn area(&self) -> f32 {
        match self {
            Shape::Box(shape) => shape.area(),
            Shape::Sphere(shape) => shape.area(),
            Shape::Plane(shape) => shape.area(),
        }
    }
}

impl From<BoxShape> for Shape {
    fn from(shape: BoxShape) -> Self {
        Shape::Box(shape)
    }
}

impl From<Sphere> for Shape {
    fn from(shape: Sphere) -> Self {
        Shape::Sphere(shape)
    }
}

impl From<Plane> for Shape {
    fn from(shape: Plane) -> Self {
        Shape::Plane(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumo_math::Interval;

    #[test]
    fn test_dispatch_matches_concrete_shape() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0).unwrap();
        let shape = Shape::from(sphere);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, Interval::new(0.0, 100.0));

        assert_eq!(shape.intersect(&ray), sphere.intersect(&ray));
        assert!(shape.intersects(&ray));
        assert_eq!(shape.area(), sphere.area());
    }

    #[test]
    fn test_intersects_dispatch() {
        let shapes = [
            Shape::from(BoxShape::from_center(Vec3::new(0.0, 0.0, -3.0), Vec3::ONE)),
            Shape::from(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 0.5).unwrap()),
            Shape::from(Plane::from_normal(Vec3::new(0.0, 0.0, -3.0), Vec3::Z, Vec2::ONE)),
        ];
        let hit = Ray::new(Vec3::ZERO, Vec3::NEG_Z, Interval::new(0.0, 100.0));
        let short = Ray::new(Vec3::ZERO, Vec3::NEG_Z, Interval::new(0.0, 1.0));
        let away = Ray::new(Vec3::ZERO, Vec3::Z, Interval::new(0.0, 100.0));

        for shape in &shapes {
            assert!(shape.intersects(&hit), "{:?}", shape);
            assert!(!shape.intersects(&short), "{:?}", shape);
            assert!(!shape.intersects(&away), "{:?}", shape);
        }
    }

    #[test]
    fn test_samples_lie_on_surface() {
        let shapes = [
            Shape::from(BoxShape::new(Vec3::splat(-1.0), Vec3::new(1.0, 2.0, 3.0))),
            Shape::from(Sphere::new(Vec3::new(1.0, 2.0, 3.0), 0.5).unwrap()),
            Shape::from(Plane::new(Vec3::ZERO, Vec3::Y, Vec3::X, Vec2::new(2.0, 1.0))),
        ];

        let uvws = [
            Vec3::new(0.05, 0.3, 0.7),
            Vec3::new(0.4, 0.9, 0.1),
            Vec3::new(0.95, 0.5, 0.5),
        ];

        for shape in &shapes {
            for &uvw in &uvws {
                let sample = shape.sample(uvw);
                assert!((sample.n.length() - 1.0).abs() < 1e-5);

                // A ray aimed back at the sample along its normal hits it.
                let origin = sample.p + sample.n * 10.0;
                let ray = Ray::new(origin, -sample.n, Interval::new(0.0, 100.0));
                let hit = shape.intersect(&ray).expect("sample should be hittable");
                assert!((hit.p - sample.p).length() < 1e-3, "{:?} vs {:?}", hit.p, sample.p);
            }
        }
    }
}
