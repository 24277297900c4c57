//! Scene container: the optional participating medium, surface objects and
//! area lights, with flat index lists selecting the active entries.

use crate::shape::{Intersection, Shape};
use lumo_core::{luminance, ColorXyz, Volume};
use lumo_math::Ray;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("Object index {index} out of range ({len} objects)")]
    ObjectOutOfRange { index: usize, len: usize },

    #[error("Light index {index} out of range ({len} lights)")]
    LightOutOfRange { index: usize, len: usize },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Diffuse surface object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Object {
    pub shape: Shape,
    pub diffuse: ColorXyz,
}

impl Object {
    pub fn new(shape: impl Into<Shape>, diffuse: ColorXyz) -> Self {
        Self {
            shape: shape.into(),
            diffuse,
        }
    }
}

/// Area light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub shape: Shape,
    /// Emitted radiance
    pub emission: ColorXyz,
    /// One-sided lights emit only from the side their normal faces
    pub one_sided: bool,
    /// Invisible lights still illuminate the scene but camera rays pass through
    pub visible: bool,
}

impl Light {
    /// Create a visible, one-sided light.
    pub fn new(shape: impl Into<Shape>, emission: ColorXyz) -> Self {
        Self {
            shape: shape.into(),
            emission,
            one_sided: true,
            visible: true,
        }
    }

    pub fn with_one_sided(mut self, one_sided: bool) -> Self {
        self.one_sided = one_sided;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Radiance leaving the light towards a ray that hit its `front` or back.
    pub fn emitted(&self, front: bool) -> ColorXyz {
        if front || !self.one_sided {
            self.emission
        } else {
            ColorXyz::ZERO
        }
    }

    /// Relative emitted power used for power-proportional light selection.
    pub fn power(&self) -> f32 {
        luminance(self.emission).max(0.0) * self.shape.area()
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    volume: Option<Volume>,
    objects: Vec<Object>,
    lights: Vec<Light>,
    object_ids: Vec<usize>,
    light_ids: Vec<usize>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn volume(&self) -> Option<&Volume> {
        self.volume.as_ref()
    }

    /// Replace the participating medium. Volumes are rebuilt, never patched.
    pub fn set_volume(&mut self, volume: Option<Volume>) {
        self.volume = volume;
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Indices of the objects taking part in rendering.
    pub fn object_ids(&self) -> &[usize] {
        &self.object_ids
    }

    /// Indices of the lights taking part in rendering.
    pub fn light_ids(&self) -> &[usize] {
        &self.light_ids
    }

    /// Add an active object and return its index.
    pub fn add_object(&mut self, object: Object) -> usize {
        let id = self.objects.len();
        self.objects.push(object);
        self.object_ids.push(id);
        id
    }

    /// Add an active light and return its index.
    pub fn add_light(&mut self, light: Light) -> usize {
        let id = self.lights.len();
        self.lights.push(light);
        self.light_ids.push(id);
        id
    }

    pub fn set_object_ids(&mut self, ids: Vec<usize>) -> SceneResult<()> {
        let len = self.objects.len();
        if let Some(&index) = ids.iter().find(|&&index| index >= len) {
            return Err(SceneError::ObjectOutOfRange { index, len });
        }
        self.object_ids = ids;
        Ok(())
    }

    pub fn set_light_ids(&mut self, ids: Vec<usize>) -> SceneResult<()> {
        let len = self.lights.len();
        if let Some(&index) = ids.iter().find(|&&index| index >= len) {
            return Err(SceneError::LightOutOfRange { index, len });
        }
        self.light_ids = ids;
        Ok(())
    }

    /// Nearest active object hit, with the object's index.
    pub fn intersect_objects(&self, ray: &Ray) -> Option<(usize, Intersection)> {
        nearest(
            self.object_ids
                .iter()
                .map(|&id| (id, &self.objects[id].shape)),
            ray,
        )
    }

    /// Whether any active object blocks the ray.
    pub fn intersects_object(&self, ray: &Ray) -> bool {
        self.object_ids
            .iter()
            .any(|&id| self.objects[id].shape.intersects(ray))
    }

    /// Nearest active light hit, with the light's index.
    ///
    /// With `respect_visibility` lights flagged invisible are skipped.
    pub fn intersect_lights(&self, ray: &Ray, respect_visibility: bool) -> Option<(usize, Intersection)> {
        nearest(
            self.light_ids
                .iter()
                .map(|&id| (id, &self.lights[id]))
                .filter(|(_, light)| light.visible || !respect_visibility)
                .map(|(id, light)| (id, &light.shape)),
            ray,
        )
    }
}

fn nearest<'a>(
    shapes: impl Iterator<Item = (usize, &'a Shape)>,
    ray: &Ray,
) -> Option<(usize, Intersection)> {
    let mut closest: Option<(usize, Intersection)> = None;

    for (id, shape) in shapes {
        if let Some(hit) = shape.intersect(ray) {
            if closest.map_or(true, |(_, c)| hit.near_t < c.near_t) {
                closest = Some((id, hit));
            }
        }
    }

    closest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoxShape, Plane, Sphere};
    use lumo_math::{Interval, Vec2, Vec3};

    fn two_spheres() -> Scene {
        let mut scene = Scene::new();
        scene.add_object(Object::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0).unwrap(), Vec3::ONE));
        scene.add_object(Object::new(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5).unwrap(), Vec3::ONE));
        scene
    }

    #[test]
    fn test_intersect_objects_returns_nearest() {
        let scene = two_spheres();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, Interval::new(0.0, 100.0));

        let (id, hit) = scene.intersect_objects(&ray).unwrap();
        assert_eq!(id, 1);
        assert!((hit.near_t - 1.5).abs() < 1e-5);
        assert!(scene.intersects_object(&ray));
    }

    #[test]
    fn test_inactive_objects_are_ignored() {
        let mut scene = two_spheres();
        scene.set_object_ids(vec![0]).unwrap();

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, Interval::new(0.0, 100.0));
        let (id, _) = scene.intersect_objects(&ray).unwrap();
        assert_eq!(id, 0);

        scene.set_object_ids(Vec::new()).unwrap();
        assert!(scene.intersect_objects(&ray).is_none());
        assert!(!scene.intersects_object(&ray));
    }

    #[test]
    fn test_out_of_range_ids_are_rejected() {
        let mut scene = two_spheres();
        assert_eq!(
            scene.set_object_ids(vec![0, 2]),
            Err(SceneError::ObjectOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(scene.object_ids(), &[0, 1]);

        assert_eq!(
            scene.set_light_ids(vec![0]),
            Err(SceneError::LightOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_invisible_lights_skipped_for_camera_rays() {
        let mut scene = Scene::new();
        let panel = Plane::new(Vec3::new(0.0, 0.0, -3.0), Vec3::Z, Vec3::X, Vec2::ONE);
        scene.add_light(Light::new(panel, Vec3::ONE).with_visible(false));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, Interval::new(0.0, 100.0));
        assert!(scene.intersect_lights(&ray, true).is_none());
        assert!(scene.intersect_lights(&ray, false).is_some());
    }

    #[test]
    fn test_one_sided_emission() {
        let light = Light::new(BoxShape::default(), Vec3::splat(2.0));
        assert_eq!(light.emitted(true), Vec3::splat(2.0));
        assert_eq!(light.emitted(false), Vec3::ZERO);
        assert_eq!(light.with_one_sided(false).emitted(false), Vec3::splat(2.0));
    }

    #[test]
    fn test_light_power() {
        let panel = Plane::new(Vec3::ZERO, Vec3::Y, Vec3::X, Vec2::new(2.0, 3.0));
        let light = Light::new(panel, Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(light.power(), 24.0);
    }
}
