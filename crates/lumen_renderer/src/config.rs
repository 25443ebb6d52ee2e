//! Render settings loaded from JSON.
//!
//! Every field has a default, so a config file only names what it changes:
//!
//! ```json
//! {
//!     "width": 320,
//!     "height": 240,
//!     "sampler": { "type": "jittered", "samples_u": 8, "samples_v": 8 },
//!     "integrator": { "type": "path_tracer", "depth_limit": 8 }
//! }
//! ```

use lumen_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::bucket::DEFAULT_BUCKET_SIZE;
use crate::camera::Camera;
use crate::error::ConfigError;
use crate::integrator::{DirectOnly, DirectStrategy, Integrator};
use crate::path_tracer::{PathTracer, DEFAULT_DEPTH_LIMIT};
use crate::sampler::{IndependentSampler, JitteredSampler, SampleGenerator};
use crate::shaders::{AmbientOcclusion, PointLightShader};

/// Image, sampling and integrator settings for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Edge length of the square buckets rendered in parallel
    pub bucket_size: u32,
    /// Display gamma applied before clamping to `[0, 1]`
    pub gamma: f32,
    /// Base seed; each bucket's sampler is seeded with `seed + bucket index`
    pub seed: u64,
    pub sampler: SamplerConfig,
    pub integrator: IntegratorConfig,
    pub camera: CameraConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            bucket_size: DEFAULT_BUCKET_SIZE,
            gamma: 2.2,
            seed: 0,
            sampler: SamplerConfig::default(),
            integrator: IntegratorConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::ZeroBucketSize);
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(ConfigError::InvalidGamma(self.gamma));
        }
        if self.sampler.num_samples() == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        Ok(())
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Which sample generator each bucket uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SamplerConfig {
    Independent { samples: usize },
    Jittered { samples_u: usize, samples_v: usize },
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self::Jittered {
            samples_u: 4,
            samples_v: 4,
        }
    }
}

impl SamplerConfig {
    pub fn num_samples(&self) -> usize {
        match *self {
            Self::Independent { samples } => samples,
            Self::Jittered {
                samples_u,
                samples_v,
            } => samples_u * samples_v,
        }
    }

    /// A fresh generator seeded with `seed`.
    pub fn build(&self, seed: u64) -> Box<dyn SampleGenerator> {
        if self.num_samples() == 0 {
            log::warn!("Sampler {:?} takes no samples, using one per pixel", self);
        }
        match *self {
            Self::Independent { samples } => Box::new(IndependentSampler::new(samples, seed)),
            Self::Jittered {
                samples_u,
                samples_v,
            } => Box::new(JitteredSampler::new(samples_u, samples_v, seed)),
        }
    }
}

/// Which integrator computes pixel radiance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntegratorConfig {
    Direct {
        #[serde(default)]
        strategy: DirectStrategy,
    },
    PathTracer {
        #[serde(default = "default_depth_limit")]
        depth_limit: usize,
        #[serde(default = "return_true")]
        background_illumination: bool,
    },
    AmbientOcclusion {
        #[serde(default = "default_occlusion_fraction")]
        fraction: f32,
    },
    PointLights,
}

fn default_depth_limit() -> usize {
    DEFAULT_DEPTH_LIMIT
}

fn return_true() -> bool {
    true
}

fn default_occlusion_fraction() -> f32 {
    0.1
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self::PathTracer {
            depth_limit: DEFAULT_DEPTH_LIMIT,
            background_illumination: true,
        }
    }
}

impl IntegratorConfig {
    pub fn build(&self) -> Box<dyn Integrator> {
        match *self {
            Self::Direct { strategy } => Box::new(DirectOnly::new(strategy)),
            Self::PathTracer {
                depth_limit,
                background_illumination,
            } => Box::new(
                PathTracer::new()
                    .with_depth_limit(depth_limit)
                    .with_background_illumination(background_illumination),
            ),
            Self::AmbientOcclusion { fraction } => Box::new(AmbientOcclusion::new(fraction)),
            Self::PointLights => Box::new(PointLightShader),
        }
    }
}

/// Pinhole camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub look_from: [f32; 3],
    pub look_at: [f32; 3],
    pub vup: [f32; 3],
    /// Vertical field of view in degrees
    pub vfov: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            look_from: [0.0, 0.0, 0.0],
            look_at: [0.0, 0.0, -1.0],
            vup: [0.0, 1.0, 0.0],
            vfov: 90.0,
        }
    }
}

impl CameraConfig {
    pub fn build(&self, aspect: f32) -> Camera {
        Camera::new()
            .with_position(
                Vec3::from(self.look_from),
                Vec3::from(self.look_at),
                Vec3::from(self.vup),
            )
            .with_fov(self.vfov)
            .with_aspect(aspect)
    }
}
