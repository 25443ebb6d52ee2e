//! Preview shaders that skip global light transport.

use lumen_math::{warp, Ray};

use crate::integrator::Integrator;
use crate::sampler::SampleGenerator;
use crate::scene::Scene;
use crate::surface::IntersectionRecord;
use crate::Color;

/// Brightness of an unoccluded ambient occlusion probe.
const AMBIENT_WHITE: f32 = 0.8;

/// Ambient occlusion with a probe length relative to the scene size.
#[derive(Debug, Clone, Copy)]
pub struct AmbientOcclusion {
    /// Probe length as a fraction of the scene bounds' diagonal
    pub fraction: f32,
}

impl AmbientOcclusion {
    pub fn new(fraction: f32) -> Self {
        Self { fraction }
    }
}

impl Default for AmbientOcclusion {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl Integrator for AmbientOcclusion {
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

        let length = self.fraction * scene.bounding_box().extents().length();
        let local = warp::square_to_psa_hemisphere(sampler.sample(sample_index, 1));
        let mut probe = Ray::new(rec.point(), rec.frame.to_canonical(local));
        probe.make_offset_segment(length);

        if scene.any_intersection(&probe) {
            Color::ZERO
        } else {
            Color::splat(AMBIENT_WHITE)
        }
    }
}

/// Direct lighting from the scene's point lights, with hard shadows.
///
/// Hit emitters also show their own radiance.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointLightShader;

impl Integrator for PointLightShader {
    fn radiance(
        &self,
        scene: &Scene,
        ray: &Ray,
        _sampler: &mut dyn SampleGenerator,
        _sample_index: usize,
    ) -> Color {
        let mut rec = IntersectionRecord::default();
        if !scene.first_intersection(ray, &mut rec) {
            return scene.background_radiance(ray.direction);
        }

        let outgoing = -ray.direction;
        let mut result = rec.emitted_radiance(outgoing);
        let Some(material) = rec.material() else {
            return result;
        };

        let point = rec.point();
        for light in scene.point_lights() {
            let to_light = (light.position - point).normalize_or_zero();
            let cos = rec.frame.cos_theta(to_light);
            if cos <= 0.0 {
                continue;
            }
            if scene.any_intersection(&Ray::segment(point, light.position)) {
                continue;
            }
            result += material.brdf().evaluate(&rec.frame, to_light, outgoing)
                * cos
                * light.intensity_at(point);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;
    use std::sync::Arc;

    use super::*;
    use crate::brdf::Lambertian;
    use crate::integrator::tests::add_square;
    use crate::{Homogeneous, IndependentSampler, Material, PointLight, Sphere, Uniform};
    use lumen_math::Vec3;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Homogeneous::new(Lambertian::new(Color::splat(0.5))))
    }

    fn down_at(y: f32) -> Ray {
        Ray::new(Vec3::new(0.1, y, 0.1), -Vec3::Y)
    }

    #[test]
    fn test_open_floor_is_unoccluded() {
        let mut builder = Scene::builder();
        add_square(&mut builder, 0.0, 1.0, false, grey());
        let scene = builder.build().unwrap();

        let mut sampler = IndependentSampler::new(32, 9);
        for i in 0..32 {
            let l = AmbientOcclusion::default().radiance(&scene, &down_at(1.0), &mut sampler, i);
            assert_eq!(l, Color::splat(0.8));
        }
    }

    #[test]
    fn test_enclosed_point_is_occluded() {
        // A small shell around the shading point catches every probe
        let mut builder = Scene::builder();
        add_square(&mut builder, 0.0, 1.0, false, grey());
        builder.add_surface(Sphere::new(Vec3::new(0.1, 0.0, 0.1), 0.1, grey()));
        let scene = builder.build().unwrap();

        let mut sampler = IndependentSampler::new(32, 9);
        let ray = Ray::new(Vec3::new(0.1, 0.05, 0.1), -Vec3::Y);
        for i in 0..32 {
            let l = AmbientOcclusion::default().radiance(&scene, &ray, &mut sampler, i);
            assert_eq!(l, Color::ZERO);
        }
    }

    #[test]
    fn test_ambient_occlusion_miss_sees_background() {
        let mut builder = Scene::builder();
        builder.background(Uniform::new(Color::splat(0.3)));
        let scene = builder.build().unwrap();
        let mut sampler = IndependentSampler::new(1, 0);
        let l = AmbientOcclusion::default().radiance(&scene, &down_at(1.0), &mut sampler, 0);
        assert_eq!(l, Color::splat(0.3));
    }

    #[test]
    fn test_point_light_on_floor() {
        let mut builder = Scene::builder();
        add_square(&mut builder, 0.0, 1.0, false, grey());
        builder.add_point_light(PointLight::new(Vec3::new(0.1, 2.0, 0.1), Color::splat(4.0)));
        let scene = builder.build().unwrap();

        let mut sampler = IndependentSampler::new(1, 0);
        let l = PointLightShader.radiance(&scene, &down_at(1.0), &mut sampler, 0);
        // (0.5 / π) · cos 0 · 4 / 2²
        assert!((l.x - 0.5 / PI).abs() < 1e-5, "l = {l}");
    }

    #[test]
    fn test_point_light_shadowed() {
        let mut builder = Scene::builder();
        add_square(&mut builder, 0.0, 1.0, false, grey());
        builder.add_surface(Sphere::new(Vec3::new(0.1, 1.0, 0.1), 0.2, grey()));
        builder.add_point_light(PointLight::new(Vec3::new(0.1, 2.0, 0.1), Color::splat(4.0)));
        let scene = builder.build().unwrap();

        let mut sampler = IndependentSampler::new(1, 0);
        let ray = Ray::new(Vec3::new(0.1, 0.5, 0.1), -Vec3::Y);
        assert_eq!(PointLightShader.radiance(&scene, &ray, &mut sampler, 0), Color::ZERO);
    }
}
