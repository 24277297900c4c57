//! Scatter events and the nearest-event resolver.
//!
//! A camera ray has up to three candidate interactions: a free-path scatter
//! inside the medium, a hit on an area light and a hit on a surface object.
//! The closest one by Euclidean distance from the ray origin wins.

use crate::scene::Scene;
use crate::transport::sample_medium;
use lumo_core::{ColorXyz, VolumeProperty};
use lumo_math::{Ray, Vec2, Vec3};
use rand::RngCore;

/// Which domain produced a scatter event.
///
/// Declaration order doubles as the tie-break priority when two candidates
/// lie at the same distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScatterKind {
    Medium,
    Light,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterEvent {
    pub kind: ScatterKind,
    /// Distance from the ray origin
    pub t: f32,
    pub p: Vec3,
    /// Direction back towards the viewer
    pub wo: Vec3,
    /// Surface normal or normalized gradient, zero where undefined
    pub n: Vec3,
    /// Emitted radiance, non-zero only for light events
    pub le: ColorXyz,
    pub uv: Vec2,
    /// Index into the scene collection the event came from
    pub id: usize,
}

impl ScatterEvent {
    /// Event at `p` along `ray` with everything else zeroed.
    pub fn new(kind: ScatterKind, ray: &Ray, p: Vec3) -> Self {
        Self {
            kind,
            t: (p - ray.origin).length(),
            p,
            wo: -ray.direction,
            n: Vec3::ZERO,
            le: ColorXyz::ZERO,
            uv: Vec2::ZERO,
            id: 0,
        }
    }
}

/// Pick the valid candidate with the smallest non-negative distance.
///
/// Equal distances resolve to the earlier kind in `Medium, Light, Object`
/// order, whatever order the candidates arrive in.
pub fn nearest_event(
    candidates: impl IntoIterator<Item = Option<ScatterEvent>>,
) -> Option<ScatterEvent> {
    let mut nearest: Option<ScatterEvent> = None;

    for event in candidates.into_iter().flatten() {
        if !(event.t >= 0.0) {
            continue;
        }

        let closer = match &nearest {
            None => true,
            Some(best) => event.t < best.t || (event.t == best.t && event.kind < best.kind),
        };

        if closer {
            nearest = Some(event);
        }
    }

    nearest
}

/// Nearest active object hit as a scatter event.
pub fn object_event(ray: &Ray, scene: &Scene) -> Option<ScatterEvent> {
    let (id, hit) = scene.intersect_objects(ray)?;
    Some(ScatterEvent {
        n: hit.n,
        uv: hit.uv,
        id,
        ..ScatterEvent::new(ScatterKind::Object, ray, hit.p)
    })
}

/// Nearest visible light hit as a scatter event.
///
/// The back of a one-sided light is still hit but carries no radiance.
pub fn light_event(ray: &Ray, scene: &Scene) -> Option<ScatterEvent> {
    let (id, hit) = scene.intersect_lights(ray, true)?;
    Some(ScatterEvent {
        n: hit.n,
        uv: hit.uv,
        le: scene.lights()[id].emitted(hit.front),
        id,
        ..ScatterEvent::new(ScatterKind::Light, ray, hit.p)
    })
}

/// Resolve the first interaction of a camera ray.
pub fn resolve_scatter(
    ray: &Ray,
    scene: &Scene,
    property: &VolumeProperty,
    rng: &mut dyn RngCore,
) -> Option<ScatterEvent> {
    let medium = sample_medium(ray, scene, property, property.step_factor_primary, rng);
    nearest_event([medium, light_event(ray, scene), object_event(ray, scene)])
}
