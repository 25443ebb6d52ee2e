//! Recursive unidirectional path tracer.

use lumen_math::Ray;

use crate::integrator::Integrator;
use crate::sampler::SampleGenerator;
use crate::scene::Scene;
use crate::surface::IntersectionRecord;
use crate::Color;

/// Default maximum number of bounces.
pub const DEFAULT_DEPTH_LIMIT: usize = 5;

/// Follows one BRDF-sampled bounce per vertex until the depth limit or a
/// miss. Light is only picked up when a path hits an emitter or, optionally,
/// leaves the scene.
#[derive(Debug, Clone, Copy)]
pub struct PathTracer {
    depth_limit: usize,
    background_illumination: bool,
}

impl PathTracer {
    pub fn new() -> Self {
        Self {
            depth_limit: DEFAULT_DEPTH_LIMIT,
            background_illumination: true,
        }
    }

    /// Bounces allowed before a path returns emitted light only.
    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    /// Whether bounce rays that miss pick up the background. Camera rays
    /// always see it.
    pub fn with_background_illumination(mut self, enabled: bool) -> Self {
        self.background_illumination = enabled;
        self
    }

    pub fn depth_limit(&self) -> usize {
        self.depth_limit
    }

    fn gather(
        &self,
        scene: &Scene,
        ray: &Ray,
        sampler: &mut dyn SampleGenerator,
        sample_index: usize,
        depth: usize,
    ) -> Color {
        let mut rec = IntersectionRecord::default();
        if !scene.first_intersection(ray, &mut rec) {
            if depth == 0 || self.background_illumination {
                return scene.background_radiance(ray.direction);
            }
            return Color::ZERO;
        }

        let outgoing = -ray.direction;
        let emitted = rec.emitted_radiance(outgoing);
        if depth >= self.depth_limit {
            return emitted;
        }
        let Some(material) = rec.material() else {
            return emitted;
        };

        let seed = sampler.sample(sample_index, 1 + depth);
        let bounce = material.brdf().generate(&rec.frame, outgoing, seed);
        if bounce.is_absorbed() {
            return emitted;
        }

        let next = Ray::offset(rec.point(), bounce.direction);
        emitted + bounce.weight * self.gather(scene, &next, sampler, sample_index, depth + 1)
    }
}

impl Default for PathTracer {
    fn default() -> Self {
        Self::new()
    }
}

impl Integrator for PathTracer {
    fn radiance(
        &self,
        scene: &Scene,
        ray: &Ray,
        sampler: &mut dyn SampleGenerator,
        sample_index: usize,
    ) -> Color {
        self.gather(scene, ray, sampler, sample_index, 0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::brdf::Lambertian;
    use crate::integrator::tests::{average, lit_floor};
    use crate::integrator::{DirectOnly, DirectStrategy};
    use crate::{Homogeneous, IndependentSampler, Sphere, Uniform};
    use lumen_math::{Vec2, Vec3};

    /// Fails the test if the integrator draws any sample.
    struct NoSamples;

    impl SampleGenerator for NoSamples {
        fn num_samples(&self) -> usize {
            1
        }

        fn reset(&mut self) {}

        fn sample(&mut self, _sample_index: usize, dim: usize) -> Vec2 {
            panic!("sampled dimension {dim} at the depth limit");
        }
    }

    #[test]
    fn test_depth_zero_returns_emission_only() {
        let scene = lit_floor(0.5);
        let tracer = PathTracer::new().with_depth_limit(0);
        let mut sampler = NoSamples;

        let to_floor = Ray::new(Vec3::new(0.1, 0.5, 0.1), -Vec3::Y);
        assert_eq!(tracer.radiance(&scene, &to_floor, &mut sampler, 0), Color::ZERO);

        let to_light = Ray::new(Vec3::new(0.1, 0.5, 0.1), Vec3::Y);
        assert_eq!(tracer.radiance(&scene, &to_light, &mut sampler, 0), Color::ONE);
    }

    #[test]
    fn test_camera_miss_sees_background() {
        let mut builder = Scene::builder();
        builder.background(Uniform::new(Color::splat(0.7)));
        let scene = builder.build().unwrap();

        let tracer = PathTracer::new().with_background_illumination(false);
        let mut sampler = NoSamples;
        for dir in [Vec3::X, Vec3::Y, -Vec3::Z] {
            let ray = Ray::new(Vec3::ZERO, dir);
            assert_eq!(tracer.radiance(&scene, &ray, &mut sampler, 0), Color::splat(0.7));
        }
    }

    fn sphere_in_sky(reflectance: f32) -> Scene {
        let mut builder = Scene::builder();
        builder.background(Uniform::new(Color::ONE));
        builder.add_surface(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Homogeneous::new(Lambertian::new(Color::splat(reflectance)))),
        ));
        builder.build().unwrap()
    }

    #[test]
    fn test_convex_furnace() {
        // Every bounce off a convex diffuser escapes, so each sample is
        // exactly reflectance × sky
        let scene = sphere_in_sky(0.6);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let mut sampler = IndependentSampler::new(64, 3);
        for i in 0..64 {
            let l = PathTracer::new().radiance(&scene, &ray, &mut sampler, i);
            assert!((l - Color::splat(0.6)).length() < 1e-5, "l = {l}");
        }
    }

    #[test]
    fn test_background_policy_for_bounces() {
        let scene = sphere_in_sky(0.6);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let tracer = PathTracer::new().with_background_illumination(false);
        let mut sampler = IndependentSampler::new(16, 3);
        for i in 0..16 {
            assert_eq!(tracer.radiance(&scene, &ray, &mut sampler, i), Color::ZERO);
        }
    }

    #[test]
    fn test_one_bounce_matches_direct_lighting() {
        // With no background and one bounce, the path tracer estimates the
        // same integral as BRDF-sampled direct lighting
        let scene = lit_floor(0.5);
        let ray = Ray::new(Vec3::new(0.1, 0.5, 0.1), -Vec3::Y);
        let traced = average(&PathTracer::new().with_depth_limit(1), &scene, &ray, 20_000);
        let direct = average(&DirectOnly::new(DirectStrategy::Luminaire), &scene, &ray, 20_000);
        let rel = (traced.x - direct.x).abs() / direct.x;
        assert!(rel < 0.05, "traced {traced} vs direct {direct}");
    }

    #[test]
    fn test_black_emitter_ends_paths() {
        // The floor only sees the emitter, which reflects nothing, so extra
        // bounces carry no additional light
        let scene = lit_floor(0.8);
        let ray = Ray::new(Vec3::new(0.1, 0.5, 0.1), -Vec3::Y);
        let one = average(&PathTracer::new().with_depth_limit(1), &scene, &ray, 8000);
        let many = average(&PathTracer::new(), &scene, &ray, 8000);
        assert!((many.x - one.x).abs() / one.x < 0.05, "one {one} vs many {many}");
    }
}
