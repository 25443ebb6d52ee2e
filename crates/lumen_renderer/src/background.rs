//! Radiance arriving from infinitely far away.

use std::f32::consts::PI;

use lumen_math::{warp, Vec2, Vec3};

use crate::Color;

/// Radiance function over directions, seen by rays that leave the scene.
pub trait Background: Send + Sync {
    /// Radiance arriving along `-dir`, i.e. seen when looking along `dir`.
    fn evaluate(&self, dir: Vec3) -> Color;

    /// Pick a direction from a uniform seed.
    fn generate(&self, seed: Vec2) -> Vec3 {
        warp::square_to_sphere(seed)
    }

    /// Solid-angle density of [`Background::generate`].
    fn pdf(&self, _dir: Vec3) -> f32 {
        1.0 / (4.0 * PI)
    }
}

/// The same radiance in every direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    pub radiance: Color,
}

impl Uniform {
    pub fn new(radiance: Color) -> Self {
        Self { radiance }
    }
}

impl Default for Uniform {
    fn default() -> Self {
        Self::new(Color::ZERO)
    }
}

impl Background for Uniform {
    fn evaluate(&self, _dir: Vec3) -> Color {
        self.radiance
    }
}

/// Vertical blend from `horizon` (looking down) to `zenith` (looking up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyGradient {
    pub horizon: Color,
    pub zenith: Color,
}

impl Default for SkyGradient {
    fn default() -> Self {
        Self {
            horizon: Color::ONE,
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }
}

impl Background for SkyGradient {
    fn evaluate(&self, dir: Vec3) -> Color {
        let a = 0.5 * (dir.normalize_or_zero().y + 1.0);
        self.horizon.lerp(self.zenith, a)
    }
}
