//! Optical and shading configuration of the participating medium.

use lumo_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::transfer::{ColorTransferFunction1D, ScalarNode, ScalarTransferFunction1D};
use crate::volume::GradientMode;

/// How light is scattered at a medium event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShadingMode {
    /// Surface-like diffuse reflection about the gradient normal.
    BrdfOnly,
    /// Isotropic phase function.
    PhaseFunctionOnly,
    /// Stochastic choice between the two, favouring the BRDF where the
    /// gradient magnitude is large.
    #[default]
    Hybrid,
}

/// Everything the renderer needs to turn voxel intensities into optical
/// properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeProperty {
    /// Intensity to opacity in `[0, 1]`.
    pub opacity: ScalarTransferFunction1D,
    /// Intensity to diffuse albedo (XYZ).
    pub diffuse: ColorTransferFunction1D,
    /// Extinction coefficient applied to opacity.
    pub density_scale: f32,
    /// Ray-marching step for camera rays, in units of the volume's minimum
    /// voxel spacing.
    pub step_factor_primary: f32,
    /// Ray-marching step for shadow rays, same units.
    pub step_factor_shadow: f32,
    pub shading_mode: ShadingMode,
    pub gradient_mode: GradientMode,
    /// Sensitivity of hybrid shading to the gradient magnitude.
    pub gradient_factor: f32,
}

impl Default for VolumeProperty {
    fn default() -> Self {
        let mut opacity = ScalarTransferFunction1D::new();
        opacity.insert(ScalarNode { position: 0.0, value: 0.0 });
        opacity.insert(ScalarNode {
            position: u16::MAX as f32,
            value: 1.0,
        });

        Self {
            opacity,
            diffuse: ColorTransferFunction1D::constant(Vec3::ONE),
            density_scale: 10.0,
            step_factor_primary: 3.0,
            step_factor_shadow: 3.0,
            shading_mode: ShadingMode::Hybrid,
            gradient_mode: GradientMode::CentralDifferences,
            gradient_factor: 0.5,
        }
    }
}

impl VolumeProperty {
    /// Extinction coefficient at a voxel intensity.
    #[inline]
    pub fn sigma_t(&self, intensity: f32) -> f32 {
        self.density_scale * self.opacity.evaluate(intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_property() {
        let property = VolumeProperty::default();

        assert_eq!(property.sigma_t(0.0), 0.0);
        assert_eq!(property.sigma_t(u16::MAX as f32), 10.0);
        assert_eq!(property.diffuse.evaluate(1234.0), Vec3::ONE);
        assert_eq!(property.opacity.nodes().len(), 2);
        assert_eq!(property.opacity.evaluate(u16::MAX as f32 / 2.0), 0.5);
    }

    #[test]
    fn test_property_json_round_trip() {
        let mut property = VolumeProperty::default();
        property.shading_mode = ShadingMode::PhaseFunctionOnly;
        property.gradient_mode = GradientMode::Filtered;
        property.density_scale = 2.5;

        let json = serde_json::to_string(&property).unwrap();
        let parsed: VolumeProperty = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, property);
    }

    #[test]
    fn test_property_partial_json_uses_defaults() {
        let parsed: VolumeProperty = serde_json::from_str(r#"{ "density_scale": 4.0 }"#).unwrap();

        assert_eq!(parsed.density_scale, 4.0);
        assert_eq!(parsed.step_factor_primary, 3.0);
        assert_eq!(parsed.shading_mode, ShadingMode::Hybrid);
    }
}
