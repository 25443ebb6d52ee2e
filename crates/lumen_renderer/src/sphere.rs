//! Sphere primitive for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use lumen_math::{warp, Aabb, Frame, Ray, Vec2, Vec3};

use crate::surface::{IntersectionRecord, LuminaireSamplingRecord, Surface};
use crate::Material;

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero, which makes
    /// the sphere unhittable.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> Vec2 {
        // theta: angle down from +Y, phi: angle around Y from -X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;
        Vec2::new(phi / (2.0 * PI), theta / PI)
    }
}

impl Surface for Sphere {
    fn intersect<'a>(&'a self, ray: &Ray, rec: &mut IntersectionRecord<'a>) -> bool {
        if self.radius <= 0.0 {
            return false;
        }

        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray.admits(root) {
            root = (h + sqrtd) / a;
            if !ray.admits(root) {
                return false;
            }
        }

        let point = ray.at(root);
        let outward_normal = (point - self.center) / self.radius;
        rec.t = root;
        rec.set_face_normal(ray, point, outward_normal);
        rec.tex_coords = Self::get_sphere_uv(outward_normal);
        rec.surface = Some(self);

        true
    }

    fn add_to_bounding_box(&self, aabb: &mut Aabb) {
        let rvec = Vec3::splat(self.radius);
        aabb.add_point(self.center - rvec);
        aabb.add_point(self.center + rvec);
    }

    fn centroid(&self) -> Vec3 {
        self.center
    }

    fn area(&self) -> f32 {
        4.0 * PI * self.radius * self.radius
    }

    fn material(&self) -> &dyn Material {
        self.material.as_ref()
    }

    fn choose_sample_point(&self, seed: Vec2, lrec: &mut LuminaireSamplingRecord<'_>) {
        let normal = warp::square_to_sphere(seed);
        let point = self.center + normal * self.radius;
        lrec.frame = Frame::from_w(point, normal);
        lrec.pdf = 1.0 / self.area();
    }
}
