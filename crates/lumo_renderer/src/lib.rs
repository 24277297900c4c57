//! Lumo renderer - single-scattering volume rendering on the CPU.
//!
//! Each pixel traces one camera ray per frame, finds the nearest scatter
//! event among the participating medium, surface objects and area lights,
//! and lights it with a single next-event light sample. Frames are averaged
//! progressively and tone-mapped for display.

mod box_shape;
mod camera;
mod framebuffer;
mod integrator;
mod light_sampler;
mod plane;
mod rng;
mod sampling;
mod scatter;
mod scene;
mod settings;
mod shading;
mod shape;
mod sphere;
mod tonemap;
mod tracer;
mod transport;

pub use box_shape::BoxShape;
pub use camera::{Aperture, ApertureShape, Camera, CameraSample};
pub use framebuffer::FrameBuffer;
pub use integrator::{integrate, sample_one_light, single_scattering, RenderContext};
pub use light_sampler::{LightSampler, LightSelection, PowerLightSampler, UniformLightSampler};
pub use plane::Plane;
pub use rng::PixelRng;
pub use sampling::{concentric_sample_disk, gen_f32, gen_vec2, gen_vec3, polygon_sample_aperture, uniform_sample_sphere};
pub use scatter::{light_event, nearest_event, object_event, resolve_scatter, ScatterEvent, ScatterKind};
pub use scene::{Light, Object, Scene, SceneError, SceneResult};
pub use settings::{CameraSettings, ConfigError, ConfigResult, RenderSettings};
pub use shading::{shade_medium, shade_object, Bsdf, IsotropicPhase, Lambertian};
pub use shape::{Intersection, Shape, ShapeError, ShapeResult, SurfaceSample};
pub use sphere::Sphere;
pub use tonemap::{tone_map, tone_map_rgb};
pub use tracer::Tracer;
pub use transport::{sample_medium, visible, SHADOW_EPSILON};

/// Re-export the math and volume types the public API is built on
pub use lumo_core::{ColorXyz, ColorXyza, Volume, VolumeProperty};
pub use lumo_math::{BoundingBox, Interval, Ray, UVec2, Vec2, Vec3, Vec4};
