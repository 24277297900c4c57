//! Thin-lens camera for primary ray generation.

use crate::sampling::{concentric_sample_disk, gen_vec2, polygon_sample_aperture};
use lumo_math::{Interval, Ray, UVec2, Vec2, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApertureShape {
    #[default]
    Circular,
    /// Regular polygon with `Aperture::blades` corners
    Polygon,
}

/// Lens aperture. A zero size gives a pinhole camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aperture {
    pub shape: ApertureShape,
    /// Lens radius in world units
    pub size: f32,
    pub blades: u32,
    /// Rotation of the polygon in radians
    pub angle: f32,
}

impl Default for Aperture {
    fn default() -> Self {
        Self {
            shape: ApertureShape::Circular,
            size: 0.0,
            blades: 6,
            angle: 0.0,
        }
    }
}

impl Aperture {
    /// Offset on the lens plane (in right/up coordinates) for a lens sample.
    pub fn sample(&self, lens_uv: Vec2) -> Vec2 {
        let unit = match self.shape {
            ApertureShape::Circular => concentric_sample_disk(lens_uv),
            ApertureShape::Polygon => polygon_sample_aperture(lens_uv, self.blades, self.angle),
        };
        unit * self.size
    }
}

/// Per-ray sample: sub-pixel offset and lens position, both in [0, 1)^2.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraSample {
    pub film_uv: Vec2,
    pub lens_uv: Vec2,
}

impl CameraSample {
    pub fn generate(rng: &mut dyn RngCore) -> Self {
        let film_uv = gen_vec2(rng);
        let lens_uv = gen_vec2(rng);
        Self { film_uv, lens_uv }
    }
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    position: Vec3,
    target: Vec3,
    up_hint: Vec3,

    // Lens settings
    fov: f32, // Field of view in degrees
    clip_near: f32,
    clip_far: f32,
    aperture: Aperture,
    focal_distance: f32,

    // Film response
    exposure: f32,
    gamma: f32,

    // Cached computed values (set by initialize())
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    screen: [[f32; 2]; 2],
    inv_screen: Vec2,
    inv_gamma: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let mut camera = Self {
            image_width: 512,
            image_height: 512,
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up_hint: Vec3::Y,
            fov: 35.0,
            clip_near: 0.0,
            clip_far: f32::MAX,
            aperture: Aperture::default(),
            focal_distance: 3.0,
            exposure: 1.0,
            gamma: 2.2,
            // Cached values (initialized below)
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            screen: [[-1.0, 1.0], [-1.0, 1.0]],
            inv_screen: Vec2::ONE,
            inv_gamma: 1.0,
        };
        camera.initialize();
        camera
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position, look-at target and up hint.
    pub fn with_position(mut self, position: Vec3, target: Vec3, up: Vec3) -> Self {
        self.position = position;
        self.target = target;
        self.up_hint = up;
        self
    }

    /// Set the field of view in degrees.
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    /// Set the near and far clipping distances.
    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.clip_near = near;
        self.clip_far = far;
        self
    }

    /// Set aperture and focal distance.
    pub fn with_lens(mut self, aperture: Aperture, focal_distance: f32) -> Self {
        self.aperture = aperture;
        self.focal_distance = focal_distance;
        self
    }

    /// Set exposure and display gamma.
    pub fn with_film(mut self, exposure: f32, gamma: f32) -> Self {
        self.exposure = exposure;
        self.gamma = gamma;
        self
    }

    /// Recompute the basis and screen extents (must be called after the builders).
    pub fn initialize(&mut self) {
        self.forward = (self.target - self.position).normalize();
        self.right = self.forward.cross(self.up_hint).normalize();
        self.up = self.right.cross(self.forward);

        let scale = (0.5 * self.fov.to_radians()).tan();
        let aspect = self.image_height as f32 / self.image_width as f32;

        self.screen = if aspect > 1.0 {
            [[-scale, scale], [-scale * aspect, scale * aspect]]
        } else {
            [[-scale / aspect, scale / aspect], [-scale, scale]]
        };

        self.inv_screen = Vec2::new(
            (self.screen[0][1] - self.screen[0][0]) / self.image_width as f32,
            (self.screen[1][1] - self.screen[1][0]) / self.image_height as f32,
        );

        self.inv_gamma = 1.0 / self.gamma;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn clip(&self) -> Interval {
        Interval::new(self.clip_near, self.clip_far)
    }

    pub fn aperture(&self) -> &Aperture {
        &self.aperture
    }

    pub fn focal_distance(&self) -> f32 {
        self.focal_distance
    }

    pub fn exposure(&self) -> f32 {
        self.exposure
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    pub fn inv_gamma(&self) -> f32 {
        self.inv_gamma
    }

    pub fn pixel_count(&self) -> usize {
        self.image_width as usize * self.image_height as usize
    }

    /// Generate the primary ray through `pixel` for one camera sample.
    ///
    /// Pixel row 0 is the top of the image. With a non-zero aperture the
    /// origin moves across the lens and the direction is bent so that all
    /// rays through the pixel meet on the focal plane.
    pub fn generate_ray(&self, pixel: UVec2, sample: &CameraSample) -> Ray {
        let film = pixel.as_vec2() + sample.film_uv;
        let screen = Vec2::new(
            self.screen[0][0] + self.inv_screen.x * film.x,
            self.screen[1][0] + self.inv_screen.y * film.y,
        );

        let direction = (self.forward + screen.x * self.right - screen.y * self.up).normalize();
        let mut ray = Ray::new(self.position, direction, self.clip());
        ray.film = film;

        if self.aperture.size != 0.0 {
            let lens = self.aperture.sample(sample.lens_uv);
            let offset = self.right * lens.x + self.up * lens.y;

            ray.origin += offset;
            ray.direction = (direction * self.focal_distance - offset).normalize();
        }

        ray
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide_camera() -> Camera {
        let mut camera = Camera::new()
            .with_resolution(4, 2)
            .with_position(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 2.0, 0.0), Vec3::Y)
            .with_fov(90.0);
        camera.initialize();
        camera
    }

    #[test]
    fn test_camera_basis() {
        let camera = wide_camera();
        assert_eq!(camera.forward(), Vec3::NEG_Z);
        assert_eq!(camera.right(), Vec3::X);
        assert_eq!(camera.up(), Vec3::Y);
    }

    #[test]
    fn test_screen_extents_follow_aspect() {
        let camera = wide_camera();
        // aspect 0.5 widens x, fov 90 gives scale 1
        assert!((camera.screen[0][1] - 2.0).abs() < 1e-5);
        assert!((camera.screen[1][1] - 1.0).abs() < 1e-5);
        assert!((camera.inv_screen - Vec2::ONE).length() < 1e-5);

        let mut tall = Camera::new().with_resolution(2, 4).with_fov(90.0);
        tall.initialize();
        assert!((tall.screen[0][1] - 1.0).abs() < 1e-5);
        assert!((tall.screen[1][1] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_pinhole_ray() {
        let camera = wide_camera();
        let sample = CameraSample {
            film_uv: Vec2::ZERO,
            lens_uv: Vec2::new(0.9, 0.1),
        };

        // Film center looks straight ahead
        let ray = camera.generate_ray(UVec2::new(2, 1), &sample);
        assert_eq!(ray.origin, camera.position());
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-6);
        assert_eq!(ray.film, Vec2::new(2.0, 1.0));
        assert_eq!(ray.t, camera.clip());

        // Row 0 is the top of the image, column 0 the left
        let ray = camera.generate_ray(UVec2::new(0, 0), &sample);
        assert_eq!(ray.origin, camera.position());
        assert!(ray.direction.y > 0.0);
        assert!(ray.direction.x < 0.0);
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_lens_rays_converge_on_focal_plane() {
        let focal_distance = 4.0;
        let aperture = Aperture {
            size: 0.25,
            ..Default::default()
        };

        for shape in [ApertureShape::Circular, ApertureShape::Polygon] {
            let mut camera = wide_camera().with_lens(Aperture { shape, ..aperture }, focal_distance);
            camera.initialize();

            let pixel = UVec2::new(3, 0);
            let film_uv = Vec2::new(0.3, 0.6);
            let pinhole = {
                let mut pinhole = camera.clone().with_lens(Aperture::default(), focal_distance);
                pinhole.initialize();
                pinhole.generate_ray(pixel, &CameraSample { film_uv, lens_uv: Vec2::ZERO })
            };
            let focus = pinhole.at(focal_distance);

            for lens_uv in [Vec2::new(0.1, 0.2), Vec2::new(0.8, 0.9), Vec2::new(0.45, 0.7)] {
                let ray = camera.generate_ray(pixel, &CameraSample { film_uv, lens_uv });
                assert_ne!(ray.origin, camera.position());
                assert!((ray.origin - camera.position()).length() <= 0.25 + 1e-5);

                // Distance from the focus point to the lens ray
                let to_focus = focus - ray.origin;
                let off_axis = to_focus - ray.direction * to_focus.dot(ray.direction);
                assert!(off_axis.length() < 1e-4, "{:?}: {}", shape, off_axis.length());
            }
        }
    }

    #[test]
    fn test_camera_sample_in_unit_square() {
        let mut rng = rand::rngs::mock::StepRng::new(0, 1 << 30);
        let sample = CameraSample::generate(&mut rng);
        assert!(sample.film_uv.cmpge(Vec2::ZERO).all() && sample.film_uv.cmplt(Vec2::ONE).all());
        assert!(sample.lens_uv.cmpge(Vec2::ZERO).all() && sample.lens_uv.cmplt(Vec2::ONE).all());
    }
}
