//! Microfacet BRDF: a Lambertian base under a rough dielectric coat.
//!
//! The specular lobe uses the Beckmann normal distribution, Smith shadowing
//! and the exact unpolarized Fresnel reflectance of a dielectric. Sampling
//! picks one of the two lobes with a fixed probability and reports the
//! mixture density of both.

use std::f32::consts::{FRAC_1_PI, PI};

use lumen_math::{warp, Frame, Vec2, Vec3, DENOM_EPSILON, ONE_MINUS_EPSILON};

use crate::brdf::{Brdf, BrdfSample};
use crate::Color;

/// Beckmann/Smith microfacet reflector with a diffuse base.
#[derive(Debug, Clone)]
pub struct Microfacet {
    diffuse: Color,
    specular: Color,
    /// Beckmann roughness
    alpha: f32,
    /// Relative index of refraction of the coating
    ior: f32,
    /// Probability of sampling the specular lobe
    specular_sampling_weight: f32,
}

impl Microfacet {
    /// Create a microfacet BRDF with the given lobe reflectances and the
    /// default roughness (0.1), index of refraction (1.5) and sampling weight
    /// (0.5).
    pub fn new(diffuse: Color, specular: Color) -> Self {
        Self {
            diffuse,
            specular,
            alpha: 0.1,
            ior: 1.5,
            specular_sampling_weight: 0.5,
        }
    }

    /// Set the Beckmann roughness.
    pub fn with_roughness(mut self, alpha: f32) -> Self {
        self.alpha = alpha.max(1e-4);
        self
    }

    /// Set the coating's index of refraction.
    pub fn with_ior(mut self, ior: f32) -> Self {
        self.ior = ior;
        self
    }

    /// Set the probability of sampling the specular lobe.
    pub fn with_specular_sampling_weight(mut self, weight: f32) -> Self {
        self.specular_sampling_weight = weight.clamp(0.0, 1.0);
        self
    }

    pub fn roughness(&self) -> f32 {
        self.alpha
    }

    /// Beckmann distribution of microfacet normals, `cos_m = m·n`.
    fn beckmann(&self, cos_m: f32) -> f32 {
        if cos_m < DENOM_EPSILON {
            return 0.0;
        }
        let cos2 = cos_m * cos_m;
        let tan2 = (1.0 - cos2) / cos2;
        let alpha2 = self.alpha * self.alpha;
        let falloff = (-tan2 / alpha2).exp();
        if falloff == 0.0 {
            return 0.0;
        }
        falloff / (PI * alpha2 * cos2 * cos2)
    }

    /// Smith monodirectional shadowing for the Beckmann distribution.
    fn shadowing_1(&self, cos: f32) -> f32 {
        if cos < DENOM_EPSILON {
            return 0.0;
        }
        let tan = (1.0 - cos * cos).max(0.0).sqrt() / cos;
        if tan < DENOM_EPSILON {
            return 1.0;
        }
        let a = 1.0 / (self.alpha * tan);
        2.0 / (1.0 + libm::erff(a) + (-a * a).exp() / (a * PI.sqrt()))
    }

    fn shadowing(&self, cos_i: f32, cos_o: f32) -> f32 {
        self.shadowing_1(cos_i) * self.shadowing_1(cos_o)
    }

    /// Unpolarized Fresnel reflectance for `cos = i·m`.
    fn fresnel(&self, cos: f32) -> f32 {
        let g2 = self.ior * self.ior - 1.0 + cos * cos;
        if g2 < 0.0 {
            return 1.0;
        }
        let g = g2.sqrt();
        let sum = g + cos;
        let diff = g - cos;
        if sum < DENOM_EPSILON {
            return 1.0;
        }
        let ratio = (cos * sum - 1.0) / (cos * diff + 1.0);
        0.5 * (diff * diff) / (sum * sum) * (1.0 + ratio * ratio)
    }

    /// Draw a microfacet normal in local coordinates from `D(m) cos(m)`.
    fn sample_normal(&self, seed: Vec2) -> Vec3 {
        let u = seed.x.min(ONE_MINUS_EPSILON);
        let tan2 = -self.alpha * self.alpha * (1.0 - u).ln();
        let cos_theta = 1.0 / (1.0 + tan2).sqrt();
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let (sin_phi, cos_phi) = (2.0 * PI * seed.y).sin_cos();
        Vec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
    }
}

impl Default for Microfacet {
    fn default() -> Self {
        Self::new(Color::ZERO, Color::ONE)
    }
}

impl Brdf for Microfacet {
    fn evaluate(&self, frame: &Frame, incident: Vec3, reflected: Vec3) -> Color {
        let cos_i = frame.cos_theta(incident);
        let cos_o = frame.cos_theta(reflected);
        if cos_i <= 0.0 || cos_o <= 0.0 {
            return Color::ZERO;
        }

        let m = (incident + reflected).normalize();
        let cos_m = frame.cos_theta(m);
        let cos_im = incident.dot(m);

        let specular = self.fresnel(cos_im) * self.shadowing(cos_i, cos_o) * self.beckmann(cos_m)
            / (4.0 * cos_i * cos_o).max(DENOM_EPSILON);

        self.diffuse * FRAC_1_PI + self.specular * specular
    }

    fn generate(&self, frame: &Frame, fixed: Vec3, seed: Vec2) -> BrdfSample {
        if frame.cos_theta(fixed) <= 0.0 {
            return BrdfSample::absorbed(frame.w);
        }

        // The lobe choice consumes part of seed.x; the rest is rescaled
        let w_s = self.specular_sampling_weight;
        let direction = if seed.x < w_s {
            let seed = Vec2::new(seed.x / w_s, seed.y);
            let m = frame.to_canonical(self.sample_normal(seed));
            let cos_om = fixed.dot(m);
            if cos_om <= 0.0 {
                return BrdfSample::absorbed(m);
            }
            2.0 * cos_om * m - fixed
        } else {
            let seed = Vec2::new(((seed.x - w_s) / (1.0 - w_s)).min(ONE_MINUS_EPSILON), seed.y);
            frame.to_canonical(warp::square_to_psa_hemisphere(seed))
        };

        let cos_i = frame.cos_theta(direction);
        if cos_i <= 0.0 {
            return BrdfSample::absorbed(direction);
        }
        let pdf = self.pdf(frame, fixed, direction);
        if pdf < DENOM_EPSILON {
            return BrdfSample::absorbed(direction);
        }

        BrdfSample {
            direction,
            weight: self.evaluate(frame, direction, fixed) * cos_i / pdf,
        }
    }

    fn pdf(&self, frame: &Frame, fixed: Vec3, dir: Vec3) -> f32 {
        let cos_o = frame.cos_theta(fixed);
        let cos_i = frame.cos_theta(dir);
        if cos_i <= 0.0 || cos_o <= 0.0 {
            return 0.0;
        }

        let m = (fixed + dir).normalize();
        let cos_m = frame.cos_theta(m);
        let cos_om = fixed.dot(m);

        // Half-vector density mapped to the reflected direction
        let specular = self.beckmann(cos_m) * cos_m / (4.0 * cos_om).max(DENOM_EPSILON);
        let diffuse = cos_i * FRAC_1_PI;

        let w_s = self.specular_sampling_weight;
        w_s * specular + (1.0 - w_s) * diffuse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brdf::tests::{integrate_pdf, random_upper_direction};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn plastic() -> Microfacet {
        Microfacet::new(Color::new(0.4, 0.2, 0.1), Color::ONE)
    }

    #[test]
    fn test_beckmann_is_normalized() {
        // ∫ D(m) cos(m) dω = 1 over the hemisphere
        let brdf = Microfacet::default().with_roughness(0.3);
        let n = 2000;
        let mut sum = 0.0f64;
        for i in 0..n {
            let cos = (i as f32 + 0.5) / n as f32;
            sum += (brdf.beckmann(cos) * cos) as f64;
        }
        let integral = sum * 2.0 * std::f64::consts::PI / n as f64;
        assert!((integral - 1.0).abs() < 0.01, "integral = {integral}");
    }

    #[test]
    fn test_beckmann_grazing_is_zero() {
        let brdf = Microfacet::default();
        assert_eq!(brdf.beckmann(0.0), 0.0);
        assert_eq!(brdf.beckmann(1e-7), 0.0);
        assert!(brdf.beckmann(1.0) > 0.0);
    }

    #[test]
    fn test_shadowing_bounds() {
        let brdf = Microfacet::default().with_roughness(0.5);
        assert_eq!(brdf.shadowing_1(0.0), 0.0);
        assert!((brdf.shadowing_1(1.0) - 1.0).abs() < 1e-6);
        let mut last = 0.0;
        for i in 1..=20 {
            let g = brdf.shadowing_1(i as f32 / 20.0);
            assert!(g > 0.0 && g <= 1.0 + 1e-6);
            assert!(g >= last - 1e-6, "shadowing should grow toward the normal");
            last = g;
        }
    }

    #[test]
    fn test_fresnel_normal_incidence() {
        // ((n - 1) / (n + 1))² = 0.04 for n = 1.5
        let brdf = Microfacet::default();
        assert!((brdf.fresnel(1.0) - 0.04).abs() < 1e-4);
        // Grazing incidence reflects everything
        assert!((brdf.fresnel(1e-4) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_microfacet_reciprocity() {
        let brdf = plastic().with_roughness(0.3);
        let frame = Frame::from_w(Vec3::ZERO, Vec3::new(-0.3, 0.4, 1.0));
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let a = random_upper_direction(&mut rng, &frame);
            let b = random_upper_direction(&mut rng, &frame);
            let ab = brdf.evaluate(&frame, a, b);
            let ba = brdf.evaluate(&frame, b, a);
            let tolerance = 1e-3 * ab.max_element().max(1.0);
            assert!((ab - ba).abs().max_element() < tolerance, "{ab} vs {ba}");
        }
    }

    #[test]
    fn test_microfacet_below_surface_is_zero() {
        let brdf = plastic();
        let frame = Frame::default();
        let up = Vec3::new(0.0, 0.6, 0.8);
        let down = Vec3::new(0.0, 0.6, -0.8);
        assert_eq!(brdf.evaluate(&frame, up, down), Color::ZERO);
        assert_eq!(brdf.evaluate(&frame, down, up), Color::ZERO);
        assert_eq!(brdf.pdf(&frame, up, down), 0.0);
    }

    #[test]
    fn test_microfacet_pdf_integrates_to_one() {
        let frame = Frame::default();
        let fixed = Vec3::new(0.5, 0.0, 0.75f32.sqrt());
        for alpha in [0.1, 0.3] {
            let brdf = plastic().with_roughness(alpha);
            let integral = integrate_pdf(&brdf, &frame, fixed, 1000);
            assert!((integral - 1.0).abs() < 0.03, "alpha {alpha}: integral = {integral}");
        }
    }

    #[test]
    fn test_microfacet_generate_matches_pdf() {
        // E[cos / pdf] over generated directions is ∫ cos dω = π
        let brdf = plastic().with_roughness(0.2);
        let frame = Frame::from_w(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.2));
        let fixed = Frame::from_w(Vec3::ZERO, frame.w + frame.u * 0.5).w;
        let mut rng = StdRng::seed_from_u64(3);

        let n = 100_000;
        let mut sum = 0.0f64;
        for _ in 0..n {
            let sample = brdf.generate(&frame, fixed, Vec2::new(rng.gen(), rng.gen()));
            if sample.is_absorbed() {
                continue;
            }
            let pdf = brdf.pdf(&frame, fixed, sample.direction);
            sum += (frame.cos_theta(sample.direction) / pdf) as f64;
        }
        let estimate = sum / n as f64;
        assert!(
            (estimate - std::f64::consts::PI).abs() < 0.05,
            "estimate = {estimate}"
        );
    }

    #[test]
    fn test_microfacet_weight_consistency() {
        let brdf = plastic().with_roughness(0.25);
        let frame = Frame::default();
        let fixed = Vec3::new(0.3, -0.2, 0.9).normalize();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let sample = brdf.generate(&frame, fixed, Vec2::new(rng.gen(), rng.gen()));
            if sample.is_absorbed() {
                continue;
            }
            let cos = frame.cos_theta(sample.direction);
            let pdf = brdf.pdf(&frame, fixed, sample.direction);
            let expected = brdf.evaluate(&frame, sample.direction, fixed) * cos / pdf;
            assert!((expected - sample.weight).abs().max_element() < 1e-3);
        }
    }

    #[test]
    fn test_specular_only_sampling_follows_mirror() {
        let brdf = Microfacet::default()
            .with_roughness(0.01)
            .with_specular_sampling_weight(1.0);
        let frame = Frame::default();
        let fixed = Vec3::new(0.6, 0.0, 0.8);
        let mirror = Vec3::new(-0.6, 0.0, 0.8);
        let sample = brdf.generate(&frame, fixed, Vec2::new(0.5, 0.25));
        assert!(sample.direction.dot(mirror) > 0.99);
    }
}
