//! Tristimulus color types and conversions.
//!
//! Radiance is carried in CIE XYZ. Display and RGB-authored inputs use linear
//! sRGB primaries with a D65 white point.

use lumo_math::{Mat3, Vec3, Vec4};

/// CIE XYZ tristimulus value.
pub type ColorXyz = Vec3;

/// Linear sRGB value.
pub type ColorRgb = Vec3;

/// XYZ plus alpha, as accumulated per pixel.
pub type ColorXyza = Vec4;

const XYZ_TO_RGB: Mat3 = Mat3::from_cols(
    Vec3::new(3.240_454_2, -0.969_266, 0.055_643_4),
    Vec3::new(-1.537_138_5, 1.876_010_8, -0.204_025_9),
    Vec3::new(-0.498_531_4, 0.041_556, 1.057_225_2),
);

const RGB_TO_XYZ: Mat3 = Mat3::from_cols(
    Vec3::new(0.412_456_4, 0.212_672_9, 0.019_333_9),
    Vec3::new(0.357_576_1, 0.715_152_2, 0.119_192),
    Vec3::new(0.180_437_5, 0.072_175, 0.950_304_1),
);

#[inline]
pub fn xyz_to_rgb(xyz: ColorXyz) -> ColorRgb {
    XYZ_TO_RGB * xyz
}

#[inline]
pub fn rgb_to_xyz(rgb: ColorRgb) -> ColorXyz {
    RGB_TO_XYZ * rgb
}

/// Photometric luminance (the Y channel).
#[inline]
pub fn luminance(xyz: ColorXyz) -> f32 {
    xyz.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_round_trip() {
        let white = rgb_to_xyz(Vec3::ONE);

        // D65 white, Y normalized to 1.
        assert!((white - Vec3::new(0.950_47, 1.0, 1.088_83)).length() < 1e-3);
        assert!((xyz_to_rgb(white) - Vec3::ONE).length() < 1e-4);
    }

    #[test]
    fn test_primaries_luminance() {
        assert!((luminance(rgb_to_xyz(Vec3::X)) - 0.2126).abs() < 1e-4);
        assert!((luminance(rgb_to_xyz(Vec3::Y)) - 0.7152).abs() < 1e-4);
        assert!((luminance(rgb_to_xyz(Vec3::Z)) - 0.0722).abs() < 1e-4);
    }

    #[test]
    fn test_black_is_black() {
        assert_eq!(xyz_to_rgb(Vec3::ZERO), Vec3::ZERO);
        assert_eq!(rgb_to_xyz(Vec3::ZERO), Vec3::ZERO);
    }
}
