//! Simple path tracer example.
//!
//! Renders a Cornell-style box with an area light and two spheres, and saves
//! the result in PPM format.
//!
//! Usage: `simple_render [config.json] [output.ppm]`. Without a config the
//! default render settings are used. Set `RUST_LOG=info` for progress.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

use anyhow::Context;
use lumen_renderer::{
    render, CameraConfig, Color, Homogeneous, ImageBuffer, Lambertian, LambertianEmitter,
    Material, Microfacet, RenderConfig, Scene, Sphere, Vec3,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config {path}"))?;
            RenderConfig::from_json(&json).with_context(|| format!("invalid config {path}"))?
        }
        None => RenderConfig::default(),
    };
    let output = args.next().unwrap_or_else(|| "output.ppm".to_string());

    // The box is built around this view unless the config places the camera
    if config.camera == CameraConfig::default() {
        config.camera = CameraConfig {
            look_from: [0.0, 1.0, 3.4],
            look_at: [0.0, 1.0, 0.0],
            vup: [0.0, 1.0, 0.0],
            vfov: 40.0,
        };
    }

    let scene = build_scene(&config)?;
    let integrator = config.integrator.build();
    let image = render(&scene, integrator.as_ref(), &config);

    save_ppm(&image, &output).with_context(|| format!("failed to save {output}"))?;
    log::info!("Saved to {}", output);
    Ok(())
}

fn diffuse(r: f32, g: f32, b: f32) -> Arc<dyn Material> {
    Arc::new(Homogeneous::new(Lambertian::new(Color::new(r, g, b))))
}

/// Add an inward-facing quad `a b c d` (counter-clockwise seen from inside).
fn add_quad(
    scene: &mut lumen_renderer::SceneBuilder,
    corners: [[f32; 3]; 4],
    material: Arc<dyn Material>,
) -> anyhow::Result<()> {
    let positions: Vec<f32> = corners.iter().flatten().copied().collect();
    scene.add_mesh_data(&positions, &[0, 1, 2, 0, 2, 3], material)?;
    Ok(())
}

fn build_scene(config: &RenderConfig) -> anyhow::Result<Scene> {
    let mut scene = Scene::builder();
    scene.camera(config.camera.build(config.aspect()));

    let white = diffuse(0.73, 0.73, 0.73);
    let red = diffuse(0.65, 0.05, 0.05);
    let green = diffuse(0.12, 0.45, 0.15);

    // Floor, ceiling and back wall
    add_quad(
        &mut scene,
        [[-1.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 0.0, -1.0], [-1.0, 0.0, -1.0]],
        Arc::clone(&white),
    )?;
    add_quad(
        &mut scene,
        [[-1.0, 2.0, -1.0], [1.0, 2.0, -1.0], [1.0, 2.0, 1.0], [-1.0, 2.0, 1.0]],
        Arc::clone(&white),
    )?;
    add_quad(
        &mut scene,
        [[-1.0, 0.0, -1.0], [1.0, 0.0, -1.0], [1.0, 2.0, -1.0], [-1.0, 2.0, -1.0]],
        Arc::clone(&white),
    )?;

    // Side walls
    add_quad(
        &mut scene,
        [[-1.0, 0.0, 1.0], [-1.0, 0.0, -1.0], [-1.0, 2.0, -1.0], [-1.0, 2.0, 1.0]],
        red,
    )?;
    add_quad(
        &mut scene,
        [[1.0, 0.0, -1.0], [1.0, 0.0, 1.0], [1.0, 2.0, 1.0], [1.0, 2.0, -1.0]],
        green,
    )?;

    // Ceiling light, just below the ceiling and facing down
    add_quad(
        &mut scene,
        [[-0.25, 1.99, -0.25], [0.25, 1.99, -0.25], [0.25, 1.99, 0.25], [-0.25, 1.99, 0.25]],
        Arc::new(LambertianEmitter::new(Color::splat(17.0))),
    )?;

    scene.add_surface(Sphere::new(Vec3::new(-0.4, 0.35, -0.3), 0.35, white));
    scene.add_surface(Sphere::new(
        Vec3::new(0.45, 0.3, 0.3),
        0.3,
        Arc::new(Homogeneous::new(
            Microfacet::new(Color::new(0.1, 0.2, 0.5), Color::ONE).with_roughness(0.15),
        )),
    ));

    Ok(scene.build()?)
}

/// Save an image buffer as a binary PPM file.
fn save_ppm(image: &ImageBuffer, filename: &str) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    write!(file, "P6\n{} {}\n255\n", image.width, image.height)?;
    for rgba in image.to_rgba().chunks_exact(4) {
        file.write_all(&rgba[..3])?;
    }
    file.flush()
}
