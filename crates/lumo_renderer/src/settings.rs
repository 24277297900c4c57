//! JSON render settings.

use crate::camera::{Aperture, Camera};
use crate::light_sampler::LightSelection;
use lumo_core::VolumeProperty;
use lumo_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub width: u32,
    pub height: u32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Field of view in degrees
    pub fov: f32,
    pub clip_near: f32,
    pub clip_far: f32,
    pub aperture: Aperture,
    pub focal_distance: f32,
    pub exposure: f32,
    pub gamma: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 35.0,
            clip_near: 0.0,
            clip_far: f32::MAX,
            aperture: Aperture::default(),
            focal_distance: 3.0,
            exposure: 1.0,
            gamma: 2.2,
        }
    }
}

impl CameraSettings {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid(
                "resolution",
                format!("{}x{} has no pixels", self.width, self.height),
            ));
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(invalid("fov", format!("{} is outside (0, 180) degrees", self.fov)));
        }
        if !(self.exposure > 0.0) || !self.exposure.is_finite() {
            return Err(invalid("exposure", format!("{} must be positive", self.exposure)));
        }
        if !(self.gamma > 0.0) || !self.gamma.is_finite() {
            return Err(invalid("gamma", format!("{} must be positive", self.gamma)));
        }
        if !(self.clip_near >= 0.0 && self.clip_near < self.clip_far) {
            return Err(invalid(
                "clip range",
                format!("[{}, {}] is empty or negative", self.clip_near, self.clip_far),
            ));
        }
        let forward = self.target - self.position;
        if forward.length_squared() == 0.0 || forward.cross(self.up).length_squared() == 0.0 {
            return Err(invalid("camera orientation", "view direction is degenerate or parallel to up"));
        }
        if !(self.aperture.size >= 0.0) {
            return Err(invalid("aperture size", format!("{} is negative", self.aperture.size)));
        }
        if self.aperture.size > 0.0 && !(self.focal_distance > 0.0) {
            return Err(invalid(
                "focal distance",
                format!("{} must be positive with an open aperture", self.focal_distance),
            ));
        }
        Ok(())
    }

    /// Build an initialized camera.
    pub fn build(&self) -> ConfigResult<Camera> {
        self.validate()?;

        let mut camera = Camera::new()
            .with_resolution(self.width, self.height)
            .with_position(self.position, self.target, self.up)
            .with_fov(self.fov)
            .with_clip(self.clip_near, self.clip_far)
            .with_lens(self.aperture, self.focal_distance)
            .with_film(self.exposure, self.gamma);
        camera.initialize();
        Ok(camera)
    }
}

/// Everything needed to set up a `Tracer` apart from the scene itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub camera: CameraSettings,
    pub volume: VolumeProperty,
    pub light_selection: LightSelection,
    /// Master seed for the per-pixel random streams
    pub seed: u64,
}

impl RenderSettings {
    /// Parse and validate settings. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.camera.validate()?;

        let volume = &self.volume;
        if !(volume.density_scale >= 0.0) || !volume.density_scale.is_finite() {
            return Err(invalid("density scale", format!("{} is negative", volume.density_scale)));
        }
        if !(volume.step_factor_primary > 0.0) {
            return Err(invalid(
                "primary step factor",
                format!("{} must be positive", volume.step_factor_primary),
            ));
        }
        if !(volume.step_factor_shadow > 0.0) {
            return Err(invalid(
                "shadow step factor",
                format!("{} must be positive", volume.step_factor_shadow),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ApertureShape;
    use lumo_core::ShadingMode;

    #[test]
    fn test_defaults_are_valid() {
        let settings = RenderSettings::default();
        assert!(settings.validate().is_ok());
        let camera = settings.camera.build().unwrap();
        assert_eq!(camera.image_width, 512);
        assert!((camera.inv_gamma() - 1.0 / 2.2).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "camera": {
                "width": 320,
                "height": 240,
                "position": [0.0, 1.0, 4.0],
                "aperture": { "shape": "Polygon", "size": 0.05, "blades": 5 }
            },
            "volume": { "density_scale": 25.0, "shading_mode": "PhaseFunctionOnly" },
            "light_selection": "Power",
            "seed": 7
        }"#;

        let settings = RenderSettings::from_json_str(json).unwrap();
        assert_eq!(settings.camera.width, 320);
        assert_eq!(settings.camera.position, Vec3::new(0.0, 1.0, 4.0));
        assert_eq!(settings.camera.target, Vec3::ZERO);
        assert_eq!(settings.camera.aperture.shape, ApertureShape::Polygon);
        assert_eq!(settings.camera.aperture.blades, 5);
        assert_eq!(settings.camera.aperture.angle, 0.0);
        assert_eq!(settings.volume.density_scale, 25.0);
        assert_eq!(settings.volume.shading_mode, ShadingMode::PhaseFunctionOnly);
        assert_eq!(settings.volume.step_factor_shadow, 3.0);
        assert_eq!(settings.light_selection, LightSelection::Power);
        assert_eq!(settings.seed, 7);
    }

    #[test]
    fn test_round_trip() {
        let mut settings = RenderSettings::default();
        settings.camera.fov = 50.0;
        settings.seed = 3;

        let json = settings.to_json_string().unwrap();
        assert_eq!(RenderSettings::from_json_str(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            RenderSettings::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            RenderSettings::from_json_str(r#"{ "camera": { "exposure": 0.0 } }"#),
            Err(ConfigError::Invalid { name: "exposure", .. })
        ));
        assert!(matches!(
            RenderSettings::from_json_str(r#"{ "camera": { "width": 0 } }"#),
            Err(ConfigError::Invalid { name: "resolution", .. })
        ));
        assert!(matches!(
            RenderSettings::from_json_str(r#"{ "camera": { "up": [0.0, 0.0, 1.0] } }"#),
            Err(ConfigError::Invalid { name: "camera orientation", .. })
        ));
        assert!(matches!(
            RenderSettings::from_json_str(r#"{ "volume": { "step_factor_primary": 0.0 } }"#),
            Err(ConfigError::Invalid { name: "primary step factor", .. })
        ));
    }
}
