//! Radiance estimators.
//!
//! An [`Integrator`] turns one camera ray into one radiance sample. Every
//! random decision draws from the sample generator, at the pixel's current
//! sample index and a dimension the integrator owns (1 and above).

use lumen_math::{Ray, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::brdf::Brdf;
use crate::sampler::SampleGenerator;
use crate::scene::Scene;
use crate::surface::{IntersectionRecord, LuminaireSamplingRecord};
use crate::Color;

/// Estimates the radiance arriving along a ray.
pub trait Integrator: Send + Sync {
    fn radiance(
        &self,
        scene: &Scene,
        ray: &Ray,
        sampler: &mut dyn SampleGenerator,
        sample_index: usize,
    ) -> Color;
}

/// How [`DirectOnly`] samples the reflected light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectStrategy {
    /// Pick a point on a luminaire and test its visibility.
    #[default]
    Luminaire,
    /// Sample the BRDF and see whether the probe ray finds an emitter.
    Brdf,
}

/// Emitted radiance plus one sample of single-bounce direct lighting.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectOnly {
    pub strategy: DirectStrategy,
}

impl DirectOnly {
    pub fn new(strategy: DirectStrategy) -> Self {
        Self { strategy }
    }
}

/// One luminaire-sampled estimate of the light reflected toward `outgoing`.
pub(crate) fn sample_luminaires(
    scene: &Scene,
    rec: &IntersectionRecord<'_>,
    brdf: &dyn Brdf,
    outgoing: Vec3,
    seed: Vec2,
) -> Color {
    let mut lrec = LuminaireSamplingRecord::default();
    if !scene.choose_visible_point_on_luminaire(seed, rec, &mut lrec) {
        return Color::ZERO;
    }

    // Area-measure estimator: f · Le · cos_i · cos_l / (r² · p_A)
    let geometry = lrec.i_cosine * lrec.l_cosine / (lrec.distance * lrec.distance * lrec.pdf);
    brdf.evaluate(&rec.frame, -lrec.emit_dir, outgoing) * lrec.emitted_radiance() * geometry
}

/// One BRDF-sampled estimate of the light reflected toward `outgoing`.
pub(crate) fn sample_brdf(
    scene: &Scene,
    rec: &IntersectionRecord<'_>,
    brdf: &dyn Brdf,
    outgoing: Vec3,
    seed: Vec2,
) -> Color {
    let sample = brdf.generate(&rec.frame, outgoing, seed);
    if sample.is_absorbed() {
        return Color::ZERO;
    }
    sample.weight * scene.incident_radiance(rec.point(), sample.direction)
}

impl Integrator for DirectOnly {
    fn radiance(
        &self,
        scene: &Scene,
        ray: &Ray,
        sampler: &mut dyn SampleGenerator,
        sample_index: usize,
    ) -> Color {
        let mut rec = IntersectionRecord::default();
        if !scene.first_intersection(ray, &mut rec) {
            return scene.background_radiance(ray.direction);
        }

        let outgoing = -ray.direction;
        let emitted = rec.emitted_radiance(outgoing);
        let Some(material) = rec.material() else {
            return emitted;
        };

        let seed = sampler.sample(sample_index, 1);
        let reflected = match self.strategy {
            DirectStrategy::Luminaire => {
                sample_luminaires(scene, &rec, material.brdf(), outgoing, seed)
            }
            DirectStrategy::Brdf => sample_brdf(scene, &rec, material.brdf(), outgoing, seed),
        };
        emitted + reflected
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::brdf::Lambertian;
    use crate::{Homogeneous, IndependentSampler, LambertianEmitter, Material, Triangle, Uniform};

    /// Add a square at height `y` spanning `[-half, half]` in x and z. The
    /// front face points down if `facing_down`, else up.
    pub(crate) fn add_square(
        builder: &mut crate::SceneBuilder,
        y: f32,
        half: f32,
        facing_down: bool,
        material: Arc<dyn Material>,
    ) {
        let a = Vec3::new(-half, y, -half);
        let b = Vec3::new(half, y, -half);
        let c = Vec3::new(half, y, half);
        let d = Vec3::new(-half, y, half);
        if facing_down {
            builder.add_surface(Triangle::new(a, b, c, Arc::clone(&material)));
            builder.add_surface(Triangle::new(a, c, d, material));
        } else {
            builder.add_surface(Triangle::new(a, c, b, Arc::clone(&material)));
            builder.add_surface(Triangle::new(a, d, c, material));
        }
    }

    /// Diffuse floor at y = 0 under an emissive square at y = 1.
    pub(crate) fn lit_floor_builder(reflectance: f32) -> crate::SceneBuilder {
        let mut builder = Scene::builder();
        add_square(
            &mut builder,
            0.0,
            2.0,
            false,
            Arc::new(Homogeneous::new(Lambertian::new(Color::splat(reflectance)))),
        );
        add_square(
            &mut builder,
            1.0,
            1.0,
            true,
            Arc::new(LambertianEmitter::new(Color::ONE)),
        );
        builder
    }

    pub(crate) fn lit_floor(reflectance: f32) -> Scene {
        lit_floor_builder(reflectance).build().unwrap()
    }

    pub(crate) fn average(
        integrator: &dyn Integrator,
        scene: &Scene,
        ray: &Ray,
        samples: usize,
    ) -> Color {
        let mut sampler = IndependentSampler::new(samples, 1234);
        sampler.reset();
        let mut sum = Color::ZERO;
        for i in 0..samples {
            sum += integrator.radiance(scene, ray, &mut sampler, i);
        }
        sum / samples as f32
    }

    #[test]
    fn test_background_fallback() {
        let mut builder = Scene::builder();
        builder.background(Uniform::new(Color::new(0.25, 0.5, 0.75)));
        let scene = builder.build().unwrap();

        let mut sampler = IndependentSampler::new(1, 0);
        for strategy in [DirectStrategy::Luminaire, DirectStrategy::Brdf] {
            let integrator = DirectOnly::new(strategy);
            for dir in [Vec3::X, -Vec3::Y, Vec3::new(0.3, -0.2, 0.9)] {
                let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), dir);
                assert_eq!(
                    integrator.radiance(&scene, &ray, &mut sampler, 0),
                    Color::new(0.25, 0.5, 0.75)
                );
            }
        }
    }

    #[test]
    fn test_emitter_seen_directly() {
        let scene = lit_floor(0.5);
        let ray = Ray::new(Vec3::new(0.1, 0.5, 0.1), Vec3::Y);
        let mut sampler = IndependentSampler::new(1, 0);
        // The emitter reflects nothing and cannot see itself
        let l = DirectOnly::default().radiance(&scene, &ray, &mut sampler, 0);
        assert!((l - Color::ONE).length() < 1e-6);
    }

    #[test]
    fn test_back_of_emitter_is_dark() {
        let scene = lit_floor(0.5);
        let ray = Ray::new(Vec3::new(0.1, 2.0, 0.1), -Vec3::Y);
        let mut sampler = IndependentSampler::new(1, 0);
        let l = DirectOnly::default().radiance(&scene, &ray, &mut sampler, 0);
        assert_eq!(l, Color::ZERO);
    }

    #[test]
    fn test_strategies_agree() {
        let scene = lit_floor(0.5);
        let ray = Ray::new(Vec3::new(0.1, 0.5, 0.1), -Vec3::Y);

        let by_light = average(&DirectOnly::new(DirectStrategy::Luminaire), &scene, &ray, 20_000);
        let by_brdf = average(&DirectOnly::new(DirectStrategy::Brdf), &scene, &ray, 20_000);

        assert!(by_light.x > 0.05, "by_light = {by_light}");
        let rel = (by_light.x - by_brdf.x).abs() / by_light.x;
        assert!(rel < 0.05, "luminaire {by_light} vs brdf {by_brdf}");
    }

    #[test]
    fn test_white_furnace_bound() {
        // A white floor under a unit emitter reflects at most Le times the
        // covered fraction of the hemisphere's projected solid angle
        let scene = lit_floor(1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), -Vec3::Y);
        let l = average(&DirectOnly::default(), &scene, &ray, 20_000);
        assert!(l.x > 0.3 && l.x < 1.0, "l = {l}");
        assert!((l.x - l.y).abs() < 1e-4 && (l.y - l.z).abs() < 1e-4);
    }
}
