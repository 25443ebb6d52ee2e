//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use std::sync::Arc;

use lumen_math::{warp, Aabb, Frame, Ray, Vec2, Vec3, DENOM_EPSILON};

use crate::surface::{IntersectionRecord, LuminaireSamplingRecord, Surface};
use crate::Material;

/// Parametric hit on a triangle. The barycentric weights of
/// `(v0, v1, v2)` are `(1 - beta - gamma, beta, gamma)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub t: f32,
    pub beta: f32,
    pub gamma: f32,
}

impl TriangleHit {
    pub fn alpha(&self) -> f32 {
        1.0 - self.beta - self.gamma
    }
}

/// Möller-Trumbore ray-triangle intersection within the ray's range.
///
/// Nearly parallel rays and zero-area triangles report no hit.
pub fn intersect_triangle(v0: Vec3, v1: Vec3, v2: Vec3, ray: &Ray) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < DENOM_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let beta = f * s.dot(h);
    if !(0.0..=1.0).contains(&beta) {
        return None;
    }

    let q = s.cross(edge1);
    let gamma = f * ray.direction.dot(q);
    if gamma < 0.0 || beta + gamma > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if !ray.admits(t) {
        return None;
    }

    Some(TriangleHit { t, beta, gamma })
}

/// Uniform point on a triangle with a frame whose `u` follows `v1 - v0`.
pub(crate) fn sample_triangle(v0: Vec3, v1: Vec3, v2: Vec3, normal: Vec3, seed: Vec2) -> Frame {
    let bary = warp::square_to_triangle(seed);
    let point = v0 + bary.x * (v1 - v0) + bary.y * (v2 - v0);
    Frame::from_wu(point, normal, v1 - v0)
}

/// A standalone triangle with a flat normal.
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Unit face normal, zero for degenerate triangles
    normal: Vec3,
    material: Arc<dyn Material>,
}

impl Triangle {
    /// Create a new triangle. The front face is the side from which the
    /// vertices appear counter-clockwise.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<dyn Material>) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self {
            v0,
            v1,
            v2,
            normal,
            material,
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Surface for Triangle {
    fn intersect<'a>(&'a self, ray: &Ray, rec: &mut IntersectionRecord<'a>) -> bool {
        let Some(hit) = intersect_triangle(self.v0, self.v1, self.v2, ray) else {
            return false;
        };

        rec.t = hit.t;
        rec.set_face_normal(ray, ray.at(hit.t), self.normal);
        rec.tex_coords = Vec2::new(hit.beta, hit.gamma);
        rec.surface = Some(self);
        true
    }

    fn add_to_bounding_box(&self, aabb: &mut Aabb) {
        aabb.add_point(self.v0);
        aabb.add_point(self.v1);
        aabb.add_point(self.v2);
    }

    fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    fn area(&self) -> f32 {
        0.5 * (self.v1 - self.v0).cross(self.v2 - self.v0).length()
    }

    fn material(&self) -> &dyn Material {
        self.material.as_ref()
    }

    fn choose_sample_point(&self, seed: Vec2, lrec: &mut LuminaireSamplingRecord<'_>) {
        lrec.frame = sample_triangle(self.v0, self.v1, self.v2, self.normal, seed);
        lrec.pdf = 1.0 / self.area();
    }
}
