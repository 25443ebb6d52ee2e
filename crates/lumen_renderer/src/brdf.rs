//! BRDF trait and the Lambertian reflector.
//!
//! All directions are unit vectors in world space pointing away from the
//! surface. The shading frame's `w` axis is the normal on the side the
//! viewer is on; any direction below it contributes nothing.

use std::f32::consts::FRAC_1_PI;

use lumen_math::{warp, Frame, Vec2, Vec3};

use crate::Color;

/// An importance-sampled direction and its estimator weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrdfSample {
    pub direction: Vec3,
    /// `evaluate * cos / pdf` for `direction`.
    pub weight: Color,
}

impl BrdfSample {
    /// A sample that carries no energy.
    pub fn absorbed(direction: Vec3) -> Self {
        Self {
            direction,
            weight: Color::ZERO,
        }
    }

    pub fn is_absorbed(&self) -> bool {
        self.weight == Color::ZERO
    }
}

/// Bidirectional reflectance distribution function.
pub trait Brdf: Send + Sync {
    /// BRDF value for light arriving along `incident` and leaving along
    /// `reflected`. Reciprocal: swapping the two gives the same value.
    fn evaluate(&self, frame: &Frame, incident: Vec3, reflected: Vec3) -> Color;

    /// Sample a direction for the fixed direction `fixed`.
    ///
    /// The weight is `evaluate(dir, fixed) * cos(dir) / pdf(fixed, dir)`,
    /// zero when the sampled direction falls below the surface.
    fn generate(&self, frame: &Frame, fixed: Vec3, seed: Vec2) -> BrdfSample;

    /// Solid-angle density with which [`Brdf::generate`] produces `dir`.
    fn pdf(&self, frame: &Frame, fixed: Vec3, dir: Vec3) -> f32;
}

/// Ideal diffuse reflector.
#[derive(Debug, Clone)]
pub struct Lambertian {
    reflectance: Color,
}

impl Lambertian {
    pub fn new(reflectance: Color) -> Self {
        Self { reflectance }
    }

    pub fn reflectance(&self) -> Color {
        self.reflectance
    }
}

impl Default for Lambertian {
    fn default() -> Self {
        Self::new(Color::splat(0.5))
    }
}

impl Brdf for Lambertian {
    fn evaluate(&self, frame: &Frame, incident: Vec3, reflected: Vec3) -> Color {
        if frame.cos_theta(incident) <= 0.0 || frame.cos_theta(reflected) <= 0.0 {
            return Color::ZERO;
        }
        self.reflectance * FRAC_1_PI
    }

    fn generate(&self, frame: &Frame, fixed: Vec3, seed: Vec2) -> BrdfSample {
        let local = warp::square_to_psa_hemisphere(seed);
        let direction = frame.to_canonical(local);
        if frame.cos_theta(fixed) <= 0.0 || local.z <= 0.0 {
            return BrdfSample::absorbed(direction);
        }
        // cos/pdf = π cancels the 1/π of the BRDF
        BrdfSample {
            direction,
            weight: self.reflectance,
        }
    }

    fn pdf(&self, frame: &Frame, _fixed: Vec3, dir: Vec3) -> f32 {
        frame.cos_theta(dir).max(0.0) * FRAC_1_PI
    }
}
