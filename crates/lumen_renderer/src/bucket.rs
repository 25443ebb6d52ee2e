//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use std::time::Instant;

use rayon::prelude::*;

use crate::config::RenderConfig;
use crate::integrator::Integrator;
use crate::renderer::{ImageBuffer, RenderContext};
use crate::scene::Scene;
use crate::Color;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Generate buckets for an image, sorted in spiral order from center.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Indices follow render order
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center. The sort is stable, so
/// equidistant buckets keep row-major order.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let distance = |b: &Bucket| {
        let dx = b.x as f32 + b.width as f32 / 2.0 - center_x;
        let dy = b.y as f32 + b.height as f32 / 2.0 - center_y;
        dx * dx + dy * dy
    };

    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Display colors in row-major order
    pub pixels: Vec<Color>,
}

/// Render a single bucket with its own sample generator.
pub fn render_bucket(ctx: &RenderContext<'_>, config: &RenderConfig, bucket: &Bucket) -> BucketResult {
    let mut sampler = config.sampler.build(config.seed.wrapping_add(bucket.index as u64));
    let pixels = ctx.shade_block(sampler.as_mut(), bucket);
    log::debug!(
        "Rendered bucket {} at ({}, {}) {}x{}",
        bucket.index,
        bucket.x,
        bucket.y,
        bucket.width,
        bucket.height
    );
    BucketResult {
        bucket: *bucket,
        pixels,
    }
}

/// Render the full image, buckets in parallel.
///
/// Each bucket seeds its sampler from `config.seed` and its index, so the
/// output does not depend on the number of threads.
pub fn render(scene: &Scene, integrator: &dyn Integrator, config: &RenderConfig) -> ImageBuffer {
    let start = Instant::now();
    let ctx = RenderContext {
        scene,
        integrator,
        width: config.width,
        height: config.height,
        gamma: config.gamma,
    };

    let buckets = generate_buckets(config.width, config.height, config.bucket_size);
    log::info!(
        "Rendering {}x{} in {} buckets, {} samples per pixel",
        config.width,
        config.height,
        buckets.len(),
        config.sampler.num_samples()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(&ctx, config, bucket))
        .collect();

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in &results {
        image.write_block(&result.bucket, &result.pixels);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
