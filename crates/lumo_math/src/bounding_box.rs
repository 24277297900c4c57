use crate::{Ray, Vec3};

/// Slab test of a ray against the axis-aligned box `[min, max]`.
///
/// Returns the entry and exit distances with the entry clamped to zero, so a
/// ray starting inside the box never reports a negative entry. A box lying
/// entirely behind the origin is a miss. The ray's own interval is not
/// applied here; callers decide how to combine it.
///
/// Degenerate inputs (zero direction components, zero-size boxes) are handled
/// by IEEE arithmetic: infinities and NaNs flow through and any comparison that
/// ends up rejecting the ray is a plain miss.
#[inline]
pub fn slab(min: Vec3, max: Vec3, ray: &Ray) -> Option<(f32, f32)> {
    let inv_dir = Vec3::ONE / ray.direction;
    let bottom_t = inv_dir * (min - ray.origin);
    let top_t = inv_dir * (max - ray.origin);
    let min_t = top_t.min(bottom_t);
    let max_t = top_t.max(bottom_t);

    let largest_min_t = min_t.max_element();
    let smallest_max_t = max_t.min_element();

    if smallest_max_t < largest_min_t || smallest_max_t < 0.0 {
        return None;
    }

    Some((largest_min_t.max(0.0), smallest_max_t))
}

/// Axis-aligned bounding box with cached size and inverse size.
///
/// The derived values are recomputed whenever a corner changes. On a
/// degenerate axis the inverse size is infinite; nothing here divides by it
/// in a way that panics.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    min: Vec3,
    max: Vec3,
    size: Vec3,
    inv_size: Vec3,
}

impl BoundingBox {
    /// Create a bounding box from its two corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        let mut bbox = Self {
            min,
            max,
            size: Vec3::ZERO,
            inv_size: Vec3::ZERO,
        };
        bbox.update();
        bbox
    }

    /// A box centered at the origin with the given full extent.
    pub fn centered(size: Vec3) -> Self {
        Self::new(-0.5 * size, 0.5 * size)
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    pub fn inv_size(&self) -> Vec3 {
        self.inv_size
    }

    pub fn set_min(&mut self, min: Vec3) {
        self.min = min;
        self.update();
    }

    pub fn set_max(&mut self, max: Vec3) {
        self.max = max;
        self.update();
    }

    fn update(&mut self) {
        self.size = self.max - self.min;
        self.inv_size = Vec3::ONE / self.size;
    }

    /// Returns true if `p` lies inside or on the box.
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Entry/exit distances of `ray` through the box, restricted to the
    /// ray's valid interval. `None` if the ray misses or the restricted
    /// interval is empty.
    pub fn intersect(&self, ray: &Ray) -> Option<(f32, f32)> {
        let (near, far) = slab(self.min, self.max, ray)?;

        let near = near.max(ray.t.min);
        let far = far.min(ray.t.max);

        (near <= far).then_some((near, far))
    }
}

impl Default for BoundingBox {
    /// An inverted (empty) box.
    fn default() -> Self {
        Self::new(Vec3::splat(f32::MAX), Vec3::splat(f32::MIN))
    }
}
