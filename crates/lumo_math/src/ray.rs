use crate::{Interval, Vec2, Vec3};

/// A ray in 3D space with origin, direction and a valid parametric interval.
///
/// The direction is not required to be normalized, but intersection math
/// takes its reciprocal per axis. `film` carries the continuous pixel
/// coordinate the camera generated the ray for and is unused elsewhere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub t: Interval,
    pub film: Vec2,
}

impl Ray {
    /// Create a new ray valid over `t`.
    pub fn new(origin: Vec3, direction: Vec3, t: Interval) -> Self {
        Self {
            origin,
            direction,
            t,
            film: Vec2::ZERO,
        }
    }

    /// Create a ray valid over `[0, inf]`.
    pub fn unbounded(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, Interval::default())
    }

    /// Create a normalized ray from `from` towards `to`, valid over
    /// `[epsilon, distance - epsilon]`.
    pub fn between(from: Vec3, to: Vec3, epsilon: f32) -> Self {
        let delta = to - from;
        let distance = delta.length();
        Self::new(
            from,
            delta / distance,
            Interval::new(epsilon, distance - epsilon),
        )
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray restricted to the overlap of its interval and `t`.
    pub fn narrowed(&self, t: Interval) -> Self {
        Self {
            t: self.t.intersect(&t),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::unbounded(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_between() {
        let ray = Ray::between(Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0), 0.01);

        assert_eq!(ray.direction, Vec3::Y);
        assert!((ray.t.min - 0.01).abs() < 1e-6);
        assert!((ray.t.max - 3.99).abs() < 1e-6);
    }

    #[test]
    fn test_ray_narrowed() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z, Interval::new(0.1, 100.0));
        let narrowed = ray.narrowed(Interval::new(2.0, 200.0));

        assert_eq!(narrowed.t, Interval::new(2.0, 100.0));
        assert_eq!(narrowed.origin, ray.origin);
        assert_eq!(narrowed.direction, ray.direction);
    }
}
