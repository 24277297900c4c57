//! Progressive renderer state: scene, camera, medium configuration and the
//! accumulated image.

use crate::camera::Camera;
use crate::framebuffer::FrameBuffer;
use crate::integrator::{single_scattering, RenderContext};
use crate::light_sampler::{LightSampler, LightSelection};
use crate::scene::Scene;
use crate::settings::{ConfigResult, RenderSettings};
use lumo_core::VolumeProperty;

/// Owns everything a frame reads and the buffer it writes.
///
/// Inputs can only be changed through the setters below. Each change starts
/// a new generation: accumulated samples are discarded and every pixel's
/// random stream restarts from the master seed, so the image never mixes
/// samples from different inputs.
pub struct Tracer {
    scene: Scene,
    property: VolumeProperty,
    camera: Camera,
    light_selection: LightSelection,
    light_sampler: Box<dyn LightSampler>,
    frame_buffer: FrameBuffer,
    seed: u64,
    generation: u64,
}

impl Tracer {
    /// Create a new tracer. `camera` must already be initialized.
    pub fn new(
        scene: Scene,
        property: VolumeProperty,
        camera: Camera,
        light_selection: LightSelection,
        seed: u64,
    ) -> Self {
        let light_sampler = light_selection.build(&scene);
        let frame_buffer = FrameBuffer::new(camera.image_width, camera.image_height, seed);

        log::info!(
            "Tracer {}x{}, {} objects, {} lights, volume: {}",
            camera.image_width,
            camera.image_height,
            scene.object_ids().len(),
            scene.light_ids().len(),
            scene.volume().is_some()
        );

        Self {
            scene,
            property,
            camera,
            light_selection,
            light_sampler,
            frame_buffer,
            seed,
            generation: 0,
        }
    }

    /// Create a tracer from validated settings.
    pub fn from_settings(settings: &RenderSettings, scene: Scene) -> ConfigResult<Self> {
        settings.validate()?;
        let camera = settings.camera.build()?;
        Ok(Self::new(
            scene,
            settings.volume.clone(),
            camera,
            settings.light_selection,
            settings.seed,
        ))
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn volume_property(&self) -> &VolumeProperty {
        &self.property
    }

    pub fn light_selection(&self) -> LightSelection {
        self.light_selection
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    /// Frames accumulated in the current generation.
    pub fn frame_count(&self) -> u32 {
        self.frame_buffer.frame_count()
    }

    /// Number of input changes since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the camera. It must already be initialized.
    pub fn set_camera(&mut self, camera: Camera) {
        if camera.image_width != self.frame_buffer.width() || camera.image_height != self.frame_buffer.height() {
            self.frame_buffer = FrameBuffer::new(camera.image_width, camera.image_height, self.seed);
        }
        self.camera = camera;
        self.invalidate();
    }

    pub fn set_volume_property(&mut self, property: VolumeProperty) {
        self.property = property;
        self.invalidate();
    }

    pub fn set_light_selection(&mut self, light_selection: LightSelection) {
        self.light_selection = light_selection;
        self.invalidate();
    }

    /// Modify the scene (objects, lights, active lists or volume).
    pub fn edit_scene<R>(&mut self, edit: impl FnOnce(&mut Scene) -> R) -> R {
        let result = edit(&mut self.scene);
        self.invalidate();
        result
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.light_sampler = self.light_selection.build(&self.scene);
        self.frame_buffer.reset();
        log::debug!("Generation {}: accumulation reset", self.generation);
    }

    /// Render one frame: one single-scattering sample per pixel folded into
    /// the running mean. Returns the new frame count.
    pub fn render_frame(&mut self) -> u32 {
        let ctx = RenderContext {
            scene: &self.scene,
            property: &self.property,
            camera: &self.camera,
            lights: self.light_sampler.as_ref(),
        };

        self.frame_buffer
            .accumulate(|pixel, rng| single_scattering(&ctx, pixel, rng));

        let frames = self.frame_buffer.frame_count();
        log::trace!("Generation {} frame {}", self.generation, frames);
        frames
    }

    /// Tone-mapped RGBA image, row 0 at the top.
    pub fn image(&self) -> Vec<[u8; 4]> {
        self.frame_buffer
            .to_rgba(self.camera.exposure(), self.camera.inv_gamma())
    }

    /// Tone-mapped image as packed RGBA bytes.
    pub fn image_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.image()).to_vec()
    }
}
