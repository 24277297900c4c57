//! Sample generation and warping.

use lumo_math::{Vec2, Vec3};
use rand::RngCore;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Uniform f32 in [0, 1) from the top 24 bits of the next word.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
}

#[inline]
pub fn gen_vec2(rng: &mut dyn RngCore) -> Vec2 {
    let x = gen_f32(rng);
    let y = gen_f32(rng);
    Vec2::new(x, y)
}

#[inline]
pub fn gen_vec3(rng: &mut dyn RngCore) -> Vec3 {
    let x = gen_f32(rng);
    let y = gen_f32(rng);
    let z = gen_f32(rng);
    Vec3::new(x, y, z)
}

/// Shirley-Chiu concentric mapping of the unit square onto the unit disk.
pub fn concentric_sample_disk(u: Vec2) -> Vec2 {
    let offset = u * 2.0 - Vec2::ONE;
    if offset == Vec2::ZERO {
        return Vec2::ZERO;
    }

    let (r, theta) = if offset.x.abs() > offset.y.abs() {
        (offset.x, FRAC_PI_4 * (offset.y / offset.x))
    } else {
        (offset.y, FRAC_PI_2 - FRAC_PI_4 * (offset.x / offset.y))
    };

    Vec2::new(theta.cos(), theta.sin()) * r
}

/// Maps `u` onto a regular polygon with `blades` corners inscribed in the
/// unit circle, rotated by `rotation` radians.
///
/// `u.x` selects the blade sector and the position between its two edge
/// angles; `sqrt(u.y)` gives the radius so the density is uniform in area.
pub fn polygon_sample_aperture(u: Vec2, blades: u32, rotation: f32) -> Vec2 {
    let blades = blades.max(3) as f32;

    let lens_y = u.x * blades;
    let side = lens_y.floor();
    let offset = lens_y - side;
    let distance = u.y.sqrt();

    let a0 = side * 2.0 * PI / blades + rotation;
    let a1 = (side + 1.0) * 2.0 * PI / blades + rotation;

    Vec2::new(
        (a0.cos() * (1.0 - offset) + a1.cos() * offset) * distance,
        (a0.sin() * (1.0 - offset) + a1.sin() * offset) * distance,
    )
}

/// Uniform direction on the unit sphere.
pub fn uniform_sample_sphere(u: Vec2) -> Vec3 {
    let z = 1.0 - 2.0 * u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}
