//! Progressive volume render example.
//!
//! Builds a synthetic density field (a soft sphere with a denser shell)
//! floating over a diffuse floor, lit by a panel light, and saves the
//! accumulated image to PPM. An optional first argument points at a JSON
//! settings file.

use anyhow::{Context, Result};
use lumo_core::{ColorNode, ColorTransferFunction1D, Volume, VoxelGrid};
use lumo_renderer::{
    BoxShape, Light, Object, Plane, RenderSettings, Scene, Tracer, UVec2, Vec2, Vec3,
};
use lumo_math::UVec3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;

const FRAMES: u32 = 64;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
            RenderSettings::from_json_str(&json)?
        }
        None => default_settings()?,
    };

    let start = Instant::now();
    let scene = build_scene()?;
    log::info!("Scene built in {:?}", start.elapsed());

    let mut tracer = Tracer::from_settings(&settings, scene)?;

    let start = Instant::now();
    for _ in 0..FRAMES {
        tracer.render_frame();
    }
    log::info!(
        "Rendered {} frames at {}x{} in {:?}",
        tracer.frame_count(),
        tracer.camera().image_width,
        tracer.camera().image_height,
        start.elapsed()
    );

    let filename = "volume.ppm";
    let size = UVec2::new(tracer.camera().image_width, tracer.camera().image_height);
    save_ppm(&tracer.image(), size, filename)?;
    log::info!("Saved to {}", filename);

    Ok(())
}

fn default_settings() -> Result<RenderSettings> {
    let mut settings = RenderSettings::default();
    settings.camera.width = 480;
    settings.camera.height = 320;
    settings.camera.position = Vec3::new(0.0, 0.4, 2.6);
    settings.camera.target = Vec3::new(0.0, -0.1, 0.0);
    settings.camera.fov = 40.0;

    let mut diffuse = ColorTransferFunction1D::new();
    diffuse.add_node(ColorNode::from_rgb(0.0, Vec3::new(0.9, 0.5, 0.3)))?;
    diffuse.add_node(ColorNode::from_rgb(65535.0, Vec3::new(0.95, 0.95, 0.9)))?;
    settings.volume.diffuse = diffuse;
    settings.volume.density_scale = 20.0;

    Ok(settings)
}

fn build_scene() -> Result<Scene> {
    let resolution = UVec3::splat(64);
    let center = resolution.as_vec3() * 0.5;

    let voxels = VoxelGrid::from_fn(resolution, |p| {
        let r = (p.as_vec3() + Vec3::splat(0.5) - center).length() / center.x;
        if r > 1.0 {
            0
        } else if r > 0.85 {
            60_000
        } else {
            (20_000.0 * (1.0 - r)) as u16
        }
    })?;
    let volume = Volume::new(voxels, Vec3::ONE, true)?;

    let mut scene = Scene::new().with_volume(volume);

    scene.add_object(Object::new(
        BoxShape::new(Vec3::new(-3.0, -0.7, -3.0), Vec3::new(3.0, -0.6, 3.0)),
        Vec3::splat(0.6),
    ));

    scene.add_light(Light::new(
        Plane::new(Vec3::new(0.8, 2.0, 0.8), Vec3::new(-0.3, -1.0, -0.3), Vec3::X, Vec2::splat(1.0)),
        Vec3::splat(20.0),
    ));
    scene.add_light(
        Light::new(
            Plane::new(Vec3::new(-2.0, 0.5, 0.0), Vec3::X, Vec3::Z, Vec2::new(0.5, 2.0)),
            Vec3::splat(2.0),
        )
        .with_visible(false),
    );

    Ok(scene)
}

fn save_ppm(image: &[[u8; 4]], size: UVec2, filename: &str) -> Result<()> {
    let file = File::create(filename).with_context(|| format!("creating {}", filename))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", size.x, size.y)?;
    writeln!(writer, "255")?;

    for pixel in image {
        writeln!(writer, "{} {} {}", pixel[0], pixel[1], pixel[2])?;
    }

    writer.flush()?;
    Ok(())
}
