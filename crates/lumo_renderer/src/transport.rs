//! Free-path sampling through the participating medium and shadow-ray
//! visibility.
//!
//! The medium is ray-marched at a fixed step. A target optical depth is drawn
//! up front and extinction is accumulated step by step until it is reached,
//! at which point the ray scatters. Reaching the far side of the volume's
//! bounding box first means the ray passed through.

use crate::scatter::{ScatterEvent, ScatterKind};
use crate::scene::Scene;
use crate::sampling::gen_f32;
use lumo_core::VolumeProperty;
use lumo_math::{Ray, Vec3};
use rand::RngCore;

/// Gap left at both ends of a shadow ray to avoid self-intersection.
pub const SHADOW_EPSILON: f32 = 1e-3;

/// Sample a scatter point inside the medium along `ray`.
///
/// `step_factor` scales the volume's minimum voxel spacing into the march
/// step. Returns `None` if the scene has no volume, the ray misses it or the
/// ray leaves it without scattering.
pub fn sample_medium(
    ray: &Ray,
    scene: &Scene,
    property: &VolumeProperty,
    step_factor: f32,
    rng: &mut dyn RngCore,
) -> Option<ScatterEvent> {
    let volume = scene.volume()?;
    let (t0, t1) = volume.bounding_box().intersect(ray)?;

    let step = step_factor * volume.min_step();
    if !(step > 0.0) || !(property.density_scale > 0.0) || !t1.is_finite() {
        return None;
    }

    let target = -(1.0 - gen_f32(rng)).ln() / property.density_scale;
    let jitter = gen_f32(rng);
    let mut depth = 0.0;

    // Positions are derived from the step index so the march terminates
    // even where `t` is too large for `step` to change it.
    for i in 0u64.. {
        let t = t0 + (i as f32 + jitter) * step;
        if t > t1 {
            break;
        }

        let p = ray.at(t);
        let sigma_t = property.sigma_t(volume.sample(p));
        depth += sigma_t * step;

        if sigma_t > 0.0 && depth >= target {
            let n = volume
                .normalized_gradient(p, property.gradient_mode)
                .unwrap_or(Vec3::ZERO);

            return Some(ScatterEvent {
                n,
                ..ScatterEvent::new(ScatterKind::Medium, ray, p)
            });
        }
    }

    None
}

/// Whether light travels unobstructed from `from` to `to`.
///
/// Any active object in between blocks it; the medium blocks it
/// stochastically with probability one minus its transmittance.
pub fn visible(
    from: Vec3,
    to: Vec3,
    scene: &Scene,
    property: &VolumeProperty,
    rng: &mut dyn RngCore,
) -> bool {
    let ray = Ray::between(from, to, SHADOW_EPSILON);
    if ray.t.is_empty() {
        return true;
    }

    if scene.intersects_object(&ray) {
        return false;
    }

    sample_medium(&ray, scene, property, property.step_factor_shadow, rng).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Object;
    use crate::BoxShape;
    use lumo_core::{ScalarTransferFunction1D, Volume, VoxelGrid};
    use lumo_math::{Interval, UVec3};
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Unit-sized cube of constant intensity centered at the origin.
    fn fog(intensity: u16) -> Scene {
        let voxels = VoxelGrid::from_fn(UVec3::splat(8), |_| intensity).unwrap();
        Scene::new().with_volume(Volume::new(voxels, Vec3::ONE, true).unwrap())
    }

    fn constant_opacity(opacity: f32, density_scale: f32) -> VolumeProperty {
        VolumeProperty {
            opacity: ScalarTransferFunction1D::from_nodes([(0.0, opacity), (65535.0, opacity)]).unwrap(),
            density_scale,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_volume_no_event() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z, Interval::new(0.0, 100.0));
        let mut rng = StepRng::new(0, 0);
        assert!(sample_medium(&ray, &Scene::new(), &VolumeProperty::default(), 1.0, &mut rng).is_none());
    }

    #[test]
    fn test_empty_medium_passes_through() {
        let scene = fog(0);
        let property = constant_opacity(0.0, 10.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z, Interval::new(0.0, 100.0));
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..64 {
            assert!(sample_medium(&ray, &scene, &property, 1.0, &mut rng).is_none());
        }
    }

    #[test]
    fn test_dense_medium_scatters_at_entry() {
        let scene = fog(1000);
        let property = constant_opacity(1.0, 10.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z, Interval::new(0.0, 100.0));

        // u = 0 for both draws: zero target depth and no jitter
        let mut rng = StepRng::new(0, 0);
        let event = sample_medium(&ray, &scene, &property, 1.0, &mut rng).unwrap();

        assert_eq!(event.kind, ScatterKind::Medium);
        assert!((event.t - 2.5).abs() < 1e-5);
        assert!((event.p - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-5);
        assert_eq!(event.wo, Vec3::Z);
        // Constant field has no gradient
        assert_eq!(event.n, Vec3::ZERO);
    }

    #[test]
    fn test_scatter_probability_matches_transmittance() {
        let scene = fog(1000);
        let property = constant_opacity(0.01, 10.0);
        let sigma_t = property.sigma_t(1000.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z, Interval::new(0.0, 100.0));
        let mut rng = StdRng::seed_from_u64(11);

        let n = 20_000;
        let passed = (0..n)
            .filter(|_| sample_medium(&ray, &scene, &property, 0.25, &mut rng).is_none())
            .count();

        // The target depth is divided by density_scale, so a ray crossing
        // the unit cube passes with probability exp(-density_scale * sigma_t).
        let expected = (-property.density_scale * sigma_t).exp();
        let measured = passed as f32 / n as f32;
        assert!((measured - expected).abs() < 0.015, "measured {} expected {}", measured, expected);
    }

    #[test]
    fn test_march_terminates_far_from_origin() {
        // 1e-4 step is below half an ulp of t near 5000
        let voxels = VoxelGrid::from_fn(UVec3::splat(64), |_| 0).unwrap();
        let volume = Volume::new(voxels, Vec3::splat(1e-3), false).unwrap();
        let scene = Scene::new().with_volume(volume);
        let property = constant_opacity(0.0, 1.0);
        let ray = Ray::unbounded(Vec3::new(0.0, 0.0, 5000.0), Vec3::NEG_Z);
        let mut rng = StdRng::seed_from_u64(3);

        assert!(sample_medium(&ray, &scene, &property, 0.1, &mut rng).is_none());
    }

    #[test]
    fn test_march_far_from_origin_still_scatters() {
        let voxels = VoxelGrid::from_fn(UVec3::splat(64), |_| 1000).unwrap();
        let volume = Volume::new(voxels, Vec3::splat(1e-3), false).unwrap();
        let scene = Scene::new().with_volume(volume);
        let property = constant_opacity(1.0, 10.0);
        let ray = Ray::unbounded(Vec3::new(0.0, 0.0, 5000.0), Vec3::NEG_Z);
        let mut rng = StepRng::new(0, 0);

        let event = sample_medium(&ray, &scene, &property, 0.1, &mut rng).unwrap();
        assert_eq!(event.kind, ScatterKind::Medium);
        assert!(event.p.z.abs() <= 0.033);
    }

    #[test]
    fn test_visible_blocked_by_object() {
        let mut scene = Scene::new();
        scene.add_object(Object::new(BoxShape::from_center(Vec3::ZERO, Vec3::ONE), Vec3::ONE));
        let property = VolumeProperty::default();
        let mut rng = StepRng::new(0, 0);

        assert!(!visible(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -3.0), &scene, &property, &mut rng));
        assert!(visible(Vec3::new(0.0, 2.0, 3.0), Vec3::new(0.0, 2.0, -3.0), &scene, &property, &mut rng));

        // Leaving the box's own surface is not self-occluded
        assert!(visible(Vec3::new(0.0, 0.0, 0.5), Vec3::new(0.0, 0.0, 3.0), &scene, &property, &mut rng));
    }

    #[test]
    fn test_visible_blocked_by_dense_medium() {
        let scene = fog(1000);
        let property = constant_opacity(1.0, 10.0);
        let mut rng = StepRng::new(0, 0);

        assert!(!visible(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -3.0), &scene, &property, &mut rng));
        assert!(visible(Vec3::new(0.0, 2.0, 3.0), Vec3::new(0.0, 2.0, -3.0), &scene, &property, &mut rng));
    }
}
