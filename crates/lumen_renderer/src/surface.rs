//! Surface trait and the scratch records filled by scene queries.

use lumen_math::{Aabb, Frame, Ray, Vec2, Vec3};

use crate::Material;

/// Record of a ray-surface intersection.
///
/// Caller-owned scratch: queries overwrite it only when they find a hit
/// closer than the ray's current `end`.
#[derive(Clone, Copy)]
pub struct IntersectionRecord<'a> {
    /// Ray parameter of the hit
    pub t: f32,
    /// Shading frame at the hit point. `w` is the geometric normal on the
    /// side the ray arrived from.
    pub frame: Frame,
    /// Surface parameterization at the hit point
    pub tex_coords: Vec2,
    /// Whether the ray hit the front (outward-normal) side
    pub front_face: bool,
    /// Surface that was hit
    pub surface: Option<&'a dyn Surface>,
}

impl<'a> Default for IntersectionRecord<'a> {
    fn default() -> Self {
        Self {
            t: f32::INFINITY,
            frame: Frame::default(),
            tex_coords: Vec2::ZERO,
            front_face: false,
            surface: None,
        }
    }
}

impl<'a> IntersectionRecord<'a> {
    /// Set the shading frame from the hit point and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, point: Vec3, outward_normal: Vec3) {
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        let normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
        self.frame = Frame::from_w(point, normal);
    }

    /// Hit point.
    #[inline]
    pub fn point(&self) -> Vec3 {
        self.frame.o
    }

    /// Frame whose `w` is the outward normal, whichever side was hit.
    pub fn outward_frame(&self) -> Frame {
        if self.front_face {
            self.frame
        } else {
            self.frame.flipped()
        }
    }

    pub fn material(&self) -> Option<&'a dyn Material> {
        self.surface.map(|s| s.material())
    }

    /// Radiance emitted by the hit surface toward `outgoing`.
    pub fn emitted_radiance(&self, outgoing: Vec3) -> crate::Color {
        match self.material() {
            Some(material) if material.is_emitter() => {
                material.emitted_radiance(&self.outward_frame(), outgoing)
            }
            _ => crate::Color::ZERO,
        }
    }
}

/// A point chosen on a luminaire, as seen from a shading point.
#[derive(Clone, Copy)]
pub struct LuminaireSamplingRecord<'a> {
    /// Emitter the point lies on
    pub surface: Option<&'a dyn Surface>,
    /// Frame at the light point; `w` is the emitting normal
    pub frame: Frame,
    /// Unit direction from the light point toward the shading point
    pub emit_dir: Vec3,
    /// Distance between the two points
    pub distance: f32,
    /// Density of the chosen point with respect to surface area,
    /// including the discrete choice of emitter
    pub pdf: f32,
    /// Cosine at the shading point (zero for bare points)
    pub i_cosine: f32,
    /// Cosine at the light point
    pub l_cosine: f32,
    /// Segment between the two points, offset at both ends
    pub shadow_ray: Ray,
}

impl<'a> Default for LuminaireSamplingRecord<'a> {
    fn default() -> Self {
        Self {
            surface: None,
            frame: Frame::default(),
            emit_dir: Vec3::ZERO,
            distance: 0.0,
            pdf: 0.0,
            i_cosine: 0.0,
            l_cosine: 0.0,
            shadow_ray: Ray::new(Vec3::ZERO, Vec3::Z),
        }
    }
}

impl<'a> LuminaireSamplingRecord<'a> {
    /// Radiance the chosen point emits toward the shading point.
    pub fn emitted_radiance(&self) -> crate::Color {
        match self.surface {
            Some(surface) => surface.material().emitted_radiance(&self.frame, self.emit_dir),
            None => crate::Color::ZERO,
        }
    }
}

/// Trait for geometry that rays can hit and lights can be sampled on.
pub trait Surface: Send + Sync {
    /// Test the ray against this surface within `[ray.start, ray.end)`.
    ///
    /// Returns true if hit, and fills in the record.
    fn intersect<'a>(&'a self, ray: &Ray, rec: &mut IntersectionRecord<'a>) -> bool;

    /// Grow `aabb` to contain this surface.
    fn add_to_bounding_box(&self, aabb: &mut Aabb);

    /// Tight bounds of this surface.
    fn bounding_box(&self) -> Aabb {
        let mut aabb = Aabb::EMPTY;
        self.add_to_bounding_box(&mut aabb);
        aabb
    }

    /// Representative point used to order surfaces during BVH construction.
    fn centroid(&self) -> Vec3;

    /// Surface area.
    fn area(&self) -> f32;

    fn material(&self) -> &dyn Material;

    /// Pick a point on the surface from a uniform seed.
    ///
    /// Fills `lrec.frame` (origin at the point, `w` the outward normal) and
    /// `lrec.pdf` with the area density of the choice.
    fn choose_sample_point(&self, seed: Vec2, lrec: &mut LuminaireSamplingRecord<'_>);
}
