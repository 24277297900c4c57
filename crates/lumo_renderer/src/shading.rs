//! Local scattering functions evaluated at scatter events.

use crate::sampling::gen_f32;
use crate::scatter::ScatterEvent;
use crate::scene::Object;
use lumo_core::{ColorXyz, ShadingMode, Volume, VolumeProperty};
use lumo_math::Vec3;
use rand::RngCore;
use std::f32::consts::{FRAC_1_PI, PI};

/// Trait for functions describing how light arriving along `wi` leaves
/// towards `wo`. Both directions point away from the scatter point.
pub trait Bsdf {
    fn f(&self, wo: Vec3, wi: Vec3) -> ColorXyz;
}

/// Lambertian (diffuse) reflection about a normal.
#[derive(Debug, Clone, Copy)]
pub struct Lambertian {
    albedo: ColorXyz,
    normal: Vec3,
}

impl Lambertian {
    pub fn new(albedo: ColorXyz, normal: Vec3) -> Self {
        Self { albedo, normal }
    }
}

impl Bsdf for Lambertian {
    fn f(&self, wo: Vec3, wi: Vec3) -> ColorXyz {
        // Reflect on whichever side the viewer is
        let n = if self.normal.dot(wo) < 0.0 {
            -self.normal
        } else {
            self.normal
        };
        self.albedo * FRAC_1_PI * n.dot(wi).max(0.0)
    }
}

/// Isotropic phase function.
#[derive(Debug, Clone, Copy)]
pub struct IsotropicPhase {
    albedo: ColorXyz,
}

impl IsotropicPhase {
    pub fn new(albedo: ColorXyz) -> Self {
        Self { albedo }
    }
}

impl Bsdf for IsotropicPhase {
    fn f(&self, _wo: Vec3, _wi: Vec3) -> ColorXyz {
        self.albedo / (4.0 * PI)
    }
}

/// Scattering at a surface object hit.
pub fn shade_object(object: &Object, event: &ScatterEvent, wi: Vec3) -> ColorXyz {
    Lambertian::new(object.diffuse, event.n).f(event.wo, wi)
}

/// Scattering at a medium event.
///
/// Albedo comes from the diffuse transfer function at the local intensity.
/// In hybrid mode the BRDF is picked with probability
/// `1 - exp(-gradient_factor * |gradient|)`. Without a usable gradient
/// normal the phase function is used.
pub fn shade_medium(
    volume: &Volume,
    property: &VolumeProperty,
    event: &ScatterEvent,
    wi: Vec3,
    rng: &mut dyn RngCore,
) -> ColorXyz {
    let albedo = property.diffuse.evaluate(volume.sample(event.p));

    let use_brdf = match property.shading_mode {
        ShadingMode::BrdfOnly => true,
        ShadingMode::PhaseFunctionOnly => false,
        ShadingMode::Hybrid => {
            let p_brdf = 1.0 - (-property.gradient_factor * volume.gradient_magnitude(event.p)).exp();
            gen_f32(rng) < p_brdf
        }
    };

    if use_brdf && event.n != Vec3::ZERO {
        Lambertian::new(albedo, event.n).f(event.wo, wi)
    } else {
        IsotropicPhase::new(albedo).f(event.wo, wi)
    }
}
