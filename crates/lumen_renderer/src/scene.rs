//! Scene assembly and the queries integrators run against it.
//!
//! A [`SceneBuilder`] collects surfaces, lights, a background and a camera.
//! [`SceneBuilder::build`] validates them and builds the BVH once; the
//! resulting [`Scene`] is immutable and can be shared across render threads.

use std::sync::Arc;

use lumen_math::{Aabb, Ray, Vec2, Vec3, DENOM_EPSILON, ONE_MINUS_EPSILON};

use crate::background::{Background, Uniform};
use crate::bvh::{Bvh, BvhStats, DEFAULT_LEAF_SIZE};
use crate::camera::Camera;
use crate::error::SceneError;
use crate::light::PointLight;
use crate::mesh::Mesh;
use crate::surface::{IntersectionRecord, LuminaireSamplingRecord, Surface};
use crate::{Color, Material};

/// Collects scene contents before the acceleration structure is built.
pub struct SceneBuilder {
    surfaces: Vec<Arc<dyn Surface>>,
    point_lights: Vec<PointLight>,
    background: Box<dyn Background>,
    camera: Camera,
    leaf_size: usize,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            surfaces: Vec::new(),
            point_lights: Vec::new(),
            background: Box::new(Uniform::default()),
            camera: Camera::default(),
            leaf_size: DEFAULT_LEAF_SIZE,
        }
    }

    pub fn add_surface(&mut self, surface: impl Surface + 'static) -> &mut Self {
        self.surfaces.push(Arc::new(surface));
        self
    }

    /// Add every face of `mesh` as its own surface.
    pub fn add_mesh(&mut self, mesh: Mesh) -> &mut Self {
        for triangle in mesh.into_triangles() {
            self.surfaces.push(Arc::new(triangle));
        }
        self
    }

    /// Validate flat mesh arrays and add the mesh.
    pub fn add_mesh_data(
        &mut self,
        positions: &[f32],
        indices: &[u32],
        material: Arc<dyn Material>,
    ) -> Result<&mut Self, SceneError> {
        let mesh = Mesh::from_flat(positions, indices, None, None, material)?;
        Ok(self.add_mesh(mesh))
    }

    pub fn add_point_light(&mut self, light: PointLight) -> &mut Self {
        self.point_lights.push(light);
        self
    }

    pub fn background(&mut self, background: impl Background + 'static) -> &mut Self {
        self.background = Box::new(background);
        self
    }

    pub fn camera(&mut self, camera: Camera) -> &mut Self {
        self.camera = camera;
        self
    }

    /// BVH leaf threshold. Values below 2 are raised to 2.
    pub fn leaf_size(&mut self, leaf_size: usize) -> &mut Self {
        if leaf_size < 2 {
            log::warn!("BVH leaf size {} is too small, using 2", leaf_size);
        }
        self.leaf_size = leaf_size.max(2);
        self
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Validate the surfaces and build the BVH.
    pub fn build(self) -> Result<Scene, SceneError> {
        for (index, surface) in self.surfaces.iter().enumerate() {
            let bounds = surface.bounding_box();
            if !bounds.min().is_finite() || !bounds.max().is_finite() {
                return Err(SceneError::NonFiniteBounds { index });
            }
        }

        let luminaires: Vec<Arc<dyn Surface>> = self
            .surfaces
            .iter()
            .filter(|s| s.material().is_emitter())
            .cloned()
            .collect();

        let surface_count = self.surfaces.len();
        let bvh = Bvh::with_leaf_size(self.surfaces, self.leaf_size);

        log::info!(
            "Scene built: {} surfaces, {} luminaires, {} point lights",
            surface_count,
            luminaires.len(),
            self.point_lights.len()
        );

        Ok(Scene {
            bvh,
            luminaires,
            point_lights: self.point_lights,
            background: self.background,
            camera: self.camera,
        })
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A frozen scene. All queries take `&self`.
pub struct Scene {
    bvh: Bvh,
    luminaires: Vec<Arc<dyn Surface>>,
    point_lights: Vec<PointLight>,
    background: Box<dyn Background>,
    camera: Camera,
}

impl Scene {
    pub fn builder() -> SceneBuilder {
        SceneBuilder::new()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn background(&self) -> &dyn Background {
        self.background.as_ref()
    }

    /// Radiance seen by a ray that leaves the scene along `dir`.
    pub fn background_radiance(&self, dir: Vec3) -> Color {
        self.background.evaluate(dir)
    }

    pub fn point_lights(&self) -> &[PointLight] {
        &self.point_lights
    }

    pub fn luminaire_count(&self) -> usize {
        self.luminaires.len()
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bvh.bounding_box()
    }

    pub fn bvh_stats(&self) -> BvhStats {
        self.bvh.stats()
    }

    /// Closest hit along `ray`. The caller's ray is left untouched.
    pub fn first_intersection<'a>(&'a self, ray: &Ray, rec: &mut IntersectionRecord<'a>) -> bool {
        let mut ray = *ray;
        self.bvh.first_intersection(&mut ray, rec)
    }

    /// True if anything lies on `ray` within its range.
    pub fn any_intersection(&self, ray: &Ray) -> bool {
        self.bvh.any_intersection(ray)
    }

    /// Emitted radiance arriving at `point` from direction `dir`, or zero if
    /// the first surface that way does not emit.
    pub fn incident_radiance(&self, point: Vec3, dir: Vec3) -> Color {
        let ray = Ray::offset(point, dir);
        let mut rec = IntersectionRecord::default();
        if self.first_intersection(&ray, &mut rec) {
            rec.emitted_radiance(-ray.direction)
        } else {
            Color::ZERO
        }
    }

    /// Pick an emitter uniformly, then a point on it, as seen from `point`.
    ///
    /// Fills everything in `lrec` except the shading-side cosine and the
    /// visibility test. Returns false if there is nothing to sample or the
    /// point faces away.
    fn choose_point_on_luminaire<'a>(
        &'a self,
        point: Vec3,
        seed: Vec2,
        lrec: &mut LuminaireSamplingRecord<'a>,
    ) -> bool {
        let n = self.luminaires.len();
        if n == 0 {
            return false;
        }

        // Reuse the fractional part of the scaled seed for the surface sample
        let scaled = seed.x * n as f32;
        let index = (scaled as usize).min(n - 1);
        let seed = Vec2::new((scaled - index as f32).clamp(0.0, ONE_MINUS_EPSILON), seed.y);

        let luminaire = self.luminaires[index].as_ref();
        if luminaire.area() <= 0.0 {
            return false;
        }
        luminaire.choose_sample_point(seed, lrec);
        lrec.surface = Some(luminaire);

        let to_point = point - lrec.frame.o;
        let distance = to_point.length();
        if distance < DENOM_EPSILON {
            return false;
        }
        lrec.distance = distance;
        lrec.emit_dir = to_point / distance;
        lrec.l_cosine = lrec.frame.cos_theta(lrec.emit_dir);
        if lrec.l_cosine <= 0.0 {
            return false;
        }

        lrec.pdf /= n as f32;
        lrec.shadow_ray = Ray::segment(point, lrec.frame.o);
        true
    }

    /// Choose an unoccluded luminaire point that illuminates the front of
    /// the shading frame in `rec`.
    pub fn choose_visible_point_on_luminaire<'a>(
        &'a self,
        seed: Vec2,
        rec: &IntersectionRecord<'_>,
        lrec: &mut LuminaireSamplingRecord<'a>,
    ) -> bool {
        if !self.choose_point_on_luminaire(rec.point(), seed, lrec) {
            return false;
        }
        lrec.i_cosine = rec.frame.cos_theta(-lrec.emit_dir);
        if lrec.i_cosine <= 0.0 {
            return false;
        }
        !self.any_intersection(&lrec.shadow_ray)
    }

    /// Choose an unoccluded luminaire point seen from a bare point with no
    /// surface. Only the light-side cosine is tested; `i_cosine` is zero.
    pub fn choose_visible_point_from<'a>(
        &'a self,
        point: Vec3,
        seed: Vec2,
        lrec: &mut LuminaireSamplingRecord<'a>,
    ) -> bool {
        if !self.choose_point_on_luminaire(point, seed, lrec) {
            return false;
        }
        lrec.i_cosine = 0.0;
        !self.any_intersection(&lrec.shadow_ray)
    }

    /// Area density with which [`Scene::choose_visible_point_on_luminaire`]
    /// picks the point recorded in `lrec`.
    pub fn pdf_visible_point_on_luminaire(&self, lrec: &LuminaireSamplingRecord<'_>) -> f32 {
        let n = self.luminaires.len();
        match lrec.surface {
            Some(surface) if n > 0 && surface.area() > 0.0 => 1.0 / (surface.area() * n as f32),
            _ => 0.0,
        }
    }
}
