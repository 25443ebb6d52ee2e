//! Pixel estimation and the output image.
//!
//! Each pixel resets its sample generator, averages one integrator sample
//! per generator sample through a jittered camera ray, and stores the
//! gamma-corrected result clamped to `[0, 1]`.

use crate::bucket::Bucket;
use crate::integrator::Integrator;
use crate::sampler::SampleGenerator;
use crate::scene::Scene;
use crate::Color;

/// Map linear radiance to display values: `clamp(c^(1/gamma), 0, 1)`.
///
/// Negative and NaN components become zero.
pub fn gamma_correct(color: Color, gamma: f32) -> Color {
    color
        .max(Color::ZERO)
        .powf(1.0 / gamma)
        .clamp(Color::ZERO, Color::ONE)
}

/// Convert a display color in `[0, 1]` to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let c = (color.clamp(Color::ZERO, Color::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8, 255]
}

/// Pixel-addressable RGB float image.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a row-major block of pixels into the rectangle `rect`.
    pub fn write_block(&mut self, rect: &Bucket, pixels: &[Color]) {
        for (i, color) in pixels.iter().enumerate() {
            let x = rect.x + i as u32 % rect.width;
            let y = rect.y + i as u32 / rect.width;
            self.set(x, y, *color);
        }
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }
}

/// Everything shared by the pixels of one render.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    pub integrator: &'a dyn Integrator,
    /// Full image size, used to map pixels to camera coordinates
    pub width: u32,
    pub height: u32,
    pub gamma: f32,
}

impl<'a> RenderContext<'a> {
    /// Average linear radiance of pixel `(x, y)`.
    pub fn render_pixel(&self, sampler: &mut dyn SampleGenerator, x: u32, y: u32) -> Color {
        sampler.reset();
        let samples = sampler.num_samples();
        let camera = self.scene.camera();

        let mut sum = Color::ZERO;
        for i in 0..samples {
            let jitter = sampler.sample(i, 0);
            let u = (x as f32 + jitter.x) / self.width as f32;
            let v = (y as f32 + jitter.y) / self.height as f32;
            let ray = camera.get_ray(u, v);
            sum += self.integrator.radiance(self.scene, &ray, sampler, i);
        }
        sum / samples as f32
    }

    /// Display values of every pixel in `rect`, row-major.
    pub fn shade_block(&self, sampler: &mut dyn SampleGenerator, rect: &Bucket) -> Vec<Color> {
        let mut pixels = Vec::with_capacity(rect.pixel_count() as usize);
        for local_y in 0..rect.height {
            for local_x in 0..rect.width {
                let color = self.render_pixel(sampler, rect.x + local_x, rect.y + local_y);
                pixels.push(gamma_correct(color, self.gamma));
            }
        }
        pixels
    }

    /// Render the pixels in `rect` into `image`.
    pub fn render_block(&self, sampler: &mut dyn SampleGenerator, image: &mut ImageBuffer, rect: &Bucket) {
        let pixels = self.shade_block(sampler, rect);
        image.write_block(rect, &pixels);
    }
}
