//! Warps from the unit square to sampling domains.
//!
//! Every function takes a seed uniformly distributed on `[0,1)²` and returns a
//! point distributed over the target domain. Directions are in local
//! coordinates with `z` as the pole; use [`Frame::to_canonical`] to place them.
//!
//! [`Frame::to_canonical`]: crate::Frame::to_canonical

use std::f32::consts::{FRAC_1_PI, FRAC_PI_2, FRAC_PI_4, PI};

use crate::{Vec2, Vec3};

/// Cosine-weighted hemisphere direction (density `cosθ/π` in solid angle).
pub fn square_to_psa_hemisphere(seed: Vec2) -> Vec3 {
    let r = seed.x.sqrt();
    let phi = 2.0 * PI * seed.y;
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3::new(r * cos_phi, r * sin_phi, (1.0 - r * r).max(0.0).sqrt())
}

/// Density of [`square_to_psa_hemisphere`] for a local direction.
pub fn psa_hemisphere_pdf(local: Vec3) -> f32 {
    local.z.max(0.0) * FRAC_1_PI
}

/// Uniform hemisphere direction (density `1/2π`).
pub fn square_to_hemisphere(seed: Vec2) -> Vec3 {
    let z = seed.x;
    let phi = 2.0 * PI * seed.y;
    let xy = (1.0 - z * z).max(0.0).sqrt();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3::new(xy * cos_phi, xy * sin_phi, z)
}

/// Uniform sphere direction (density `1/4π`).
pub fn square_to_sphere(seed: Vec2) -> Vec3 {
    let z = 2.0 * seed.x - 1.0;
    let phi = 2.0 * PI * seed.y;
    let xy = (1.0 - z * z).max(0.0).sqrt();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3::new(xy * cos_phi, xy * sin_phi, z)
}

/// Uniform barycentric point `(beta, gamma)` on the triangle
/// `(0,0), (1,0), (0,1)`, by folding the upper half of the square.
pub fn square_to_triangle(seed: Vec2) -> Vec2 {
    if seed.x + seed.y <= 1.0 {
        seed
    } else {
        Vec2::new(1.0 - seed.x, 1.0 - seed.y)
    }
}

/// Concentric square-to-disc map. Returns `(radius, angle)`.
pub fn square_to_polar_disc(seed: Vec2) -> Vec2 {
    let x = 2.0 * seed.x - 1.0;
    let y = 2.0 * seed.y - 1.0;

    let (mut r, mut theta) = if x.abs() > y.abs() {
        (x, FRAC_PI_4 * y / x)
    } else if y != 0.0 {
        (y, FRAC_PI_2 - FRAC_PI_4 * x / y)
    } else {
        (0.0, 0.0)
    };
    if r < 0.0 {
        r = -r;
        theta += PI;
    }
    Vec2::new(r, theta)
}
