//! Single-scattering estimator: one scatter event per camera ray, lit by one
//! sampled light through a stochastic visibility test.

use crate::camera::{Camera, CameraSample};
use crate::light_sampler::LightSampler;
use crate::sampling::{gen_f32, gen_vec3};
use crate::scatter::{resolve_scatter, ScatterEvent, ScatterKind};
use crate::scene::Scene;
use crate::shading::{shade_medium, shade_object};
use crate::transport::visible;
use lumo_core::{ColorXyz, ColorXyza, VolumeProperty};
use lumo_math::UVec2;
use rand::RngCore;

/// Read-only state shared by every pixel of a frame.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    pub property: &'a VolumeProperty,
    pub camera: &'a Camera,
    pub lights: &'a dyn LightSampler,
}

/// Radiance leaving a scatter event towards the viewer.
///
/// No event yields zero, a light event yields its emission and any other
/// event is lit by a single light sample.
pub fn integrate(
    event: Option<&ScatterEvent>,
    scene: &Scene,
    property: &VolumeProperty,
    lights: &dyn LightSampler,
    rng: &mut dyn RngCore,
) -> ColorXyz {
    let Some(event) = event else {
        return ColorXyz::ZERO;
    };

    match event.kind {
        ScatterKind::Light => event.le,
        ScatterKind::Medium | ScatterKind::Object => {
            sample_one_light(event, scene, property, lights, rng)
        }
    }
}

/// Next-event estimate of direct lighting at `event` from one light.
pub fn sample_one_light(
    event: &ScatterEvent,
    scene: &Scene,
    property: &VolumeProperty,
    lights: &dyn LightSampler,
    rng: &mut dyn RngCore,
) -> ColorXyz {
    let Some((light_id, pmf)) = lights.pick(scene, gen_f32(rng)) else {
        return ColorXyz::ZERO;
    };
    let light = &scene.lights()[light_id];

    let sample = light.shape.sample(gen_vec3(rng));
    let to_light = sample.p - event.p;
    let distance_squared = to_light.length_squared();
    if !(distance_squared > 0.0) {
        return ColorXyz::ZERO;
    }
    let wi = to_light / distance_squared.sqrt();

    let cos_light = sample.n.dot(-wi);
    if light.one_sided && cos_light <= 0.0 {
        return ColorXyz::ZERO;
    }

    // Area measure to solid angle. Box lights pick faces uniformly, so
    // dividing by the total area is exact only for cubes.
    let pdf = distance_squared / (cos_light.abs() * light.shape.area());
    if !(pdf > 0.0) || !pdf.is_finite() || !(pmf > 0.0) {
        return ColorXyz::ZERO;
    }

    let f = match event.kind {
        ScatterKind::Object => shade_object(&scene.objects()[event.id], event, wi),
        ScatterKind::Medium => match scene.volume() {
            Some(volume) => shade_medium(volume, property, event, wi, rng),
            None => ColorXyz::ZERO,
        },
        ScatterKind::Light => ColorXyz::ZERO,
    };

    if f == ColorXyz::ZERO {
        return ColorXyz::ZERO;
    }

    if !visible(event.p, sample.p, scene, property, rng) {
        return ColorXyz::ZERO;
    }

    f * light.emission / (pdf * pmf)
}

/// One radiance sample for `pixel`, as XYZ with unit alpha.
///
/// Non-finite estimates are dropped to zero and negative channels clamped so
/// the running mean stays well defined.
pub fn single_scattering(ctx: &RenderContext, pixel: UVec2, rng: &mut dyn RngCore) -> ColorXyza {
    let sample = CameraSample::generate(rng);
    let ray = ctx.camera.generate_ray(pixel, &sample);

    let event = resolve_scatter(&ray, ctx.scene, ctx.property, rng);
    let l = integrate(event.as_ref(), ctx.scene, ctx.property, ctx.lights, rng);

    let l = if l.is_finite() {
        l.max(ColorXyz::ZERO)
    } else {
        log::trace!("Dropping non-finite sample {} at pixel {}", l, pixel);
        ColorXyz::ZERO
    };

    l.extend(1.0)
}
