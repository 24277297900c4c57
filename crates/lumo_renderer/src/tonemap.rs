//! Exponential tone mapping of accumulated XYZ radiance to 8-bit RGBA.

use lumo_core::{xyz_to_rgb, ColorRgb, ColorXyza};

/// Map linear RGB to display bytes.
///
/// Each channel goes through `1 - exp(-c / exposure)`, is clamped to [0, 1],
/// gamma encoded with `inv_gamma` and scaled to 255 with truncation.
pub fn tone_map_rgb(rgb: ColorRgb, exposure: f32, inv_gamma: f32) -> [u8; 3] {
    let encode = |c: f32| {
        let c = (1.0 - (-c / exposure).exp()).clamp(0.0, 1.0);
        (255.0 * c.powf(inv_gamma)) as u8
    };
    [encode(rgb.x), encode(rgb.y), encode(rgb.z)]
}

/// Map an XYZ + alpha estimate to display RGBA.
pub fn tone_map(xyza: ColorXyza, exposure: f32, inv_gamma: f32) -> [u8; 4] {
    let [r, g, b] = tone_map_rgb(xyz_to_rgb(xyza.truncate()), exposure, inv_gamma);
    let a = ((xyza.w * 255.0) as i32).clamp(0, 255) as u8;
    [r, g, b, a]
}
