//! Indexed triangle meshes.
//!
//! A [`Mesh`] holds shared vertex data; the scene intersects it through one
//! [`MeshTriangle`] per face, each holding a reference-counted handle to the
//! mesh and its face index. Index and attribute arrays are validated once, at
//! construction, so the triangles can index without checks.

use std::sync::Arc;

use lumen_math::{Aabb, Ray, Vec2, Vec3};

use crate::error::MeshError;
use crate::surface::{IntersectionRecord, LuminaireSamplingRecord, Surface};
use crate::triangle::{intersect_triangle, sample_triangle};
use crate::Material;

/// A mesh consisting of vertex positions, optional normals and texture
/// coordinates, and triangle indices.
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    positions: Vec<Vec3>,
    /// Vertex normals used for smooth shading
    normals: Option<Vec<Vec3>>,
    /// Texture coordinates (one per vertex)
    tex_coords: Option<Vec<Vec2>>,
    /// Triangle indices (every 3 indices form a triangle)
    indices: Vec<u32>,
    material: Arc<dyn Material>,
    bounds: Aabb,
}

impl Mesh {
    /// Create a mesh from positions and triangle indices.
    pub fn new(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        material: Arc<dyn Material>,
    ) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::BadArrayLength {
                attribute: "index",
                len: indices.len(),
                stride: 3,
            });
        }
        for (i, &index) in indices.iter().enumerate() {
            if index as usize >= positions.len() {
                return Err(MeshError::IndexOutOfRange {
                    triangle: i / 3,
                    index,
                    vertex_count: positions.len(),
                });
            }
        }

        let mut bounds = Aabb::EMPTY;
        for p in &positions {
            bounds.add_point(*p);
        }

        Ok(Self {
            positions,
            normals: None,
            tex_coords: None,
            indices,
            material,
            bounds,
        })
    }

    /// Create a mesh from flat coordinate arrays, three floats per position
    /// and normal and two per texture coordinate.
    pub fn from_flat(
        positions: &[f32],
        indices: &[u32],
        normals: Option<&[f32]>,
        tex_coords: Option<&[f32]>,
        material: Arc<dyn Material>,
    ) -> Result<Self, MeshError> {
        let mut mesh = Self::new(unflatten3("position", positions)?, indices.to_vec(), material)?;
        if let Some(normals) = normals {
            mesh = mesh.with_normals(unflatten3("normal", normals)?)?;
        }
        if let Some(tex_coords) = tex_coords {
            if tex_coords.len() % 2 != 0 {
                return Err(MeshError::BadArrayLength {
                    attribute: "texture coordinate",
                    len: tex_coords.len(),
                    stride: 2,
                });
            }
            let uvs = tex_coords
                .chunks_exact(2)
                .map(|c| Vec2::new(c[0], c[1]))
                .collect();
            mesh = mesh.with_tex_coords(uvs)?;
        }
        Ok(mesh)
    }

    /// Attach per-vertex shading normals.
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Result<Self, MeshError> {
        if normals.len() != self.positions.len() {
            return Err(MeshError::AttributeCountMismatch {
                attribute: "normals",
                vertex_count: self.positions.len(),
                found: normals.len(),
            });
        }
        self.normals = Some(normals.into_iter().map(|n| n.normalize_or_zero()).collect());
        Ok(self)
    }

    /// Attach per-vertex texture coordinates.
    pub fn with_tex_coords(mut self, tex_coords: Vec<Vec2>) -> Result<Self, MeshError> {
        if tex_coords.len() != self.positions.len() {
            return Err(MeshError::AttributeCountMismatch {
                attribute: "texture coordinates",
                vertex_count: self.positions.len(),
                found: tex_coords.len(),
            });
        }
        self.tex_coords = Some(tex_coords);
        Ok(self)
    }

    /// Compute smooth vertex normals by averaging area-weighted face normals
    /// of counter-clockwise faces.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];

        for face in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
            let p0 = self.positions[i0];
            let face_normal = (self.positions[i1] - p0).cross(self.positions[i2] - p0);
            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            *normal = normal.normalize_or_zero();
        }
        self.normals = Some(normals);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Split into one surface per face, all sharing this mesh.
    pub fn into_triangles(self) -> Vec<MeshTriangle> {
        let mesh = Arc::new(self);
        (0..mesh.triangle_count())
            .map(|face| MeshTriangle {
                mesh: Arc::clone(&mesh),
                face,
            })
            .collect()
    }

    fn face(&self, face: usize) -> [usize; 3] {
        let i = face * 3;
        [
            self.indices[i] as usize,
            self.indices[i + 1] as usize,
            self.indices[i + 2] as usize,
        ]
    }

    fn face_positions(&self, face: usize) -> [Vec3; 3] {
        self.face(face).map(|i| self.positions[i])
    }
}

fn unflatten3(attribute: &'static str, values: &[f32]) -> Result<Vec<Vec3>, MeshError> {
    if values.len() % 3 != 0 {
        return Err(MeshError::BadArrayLength {
            attribute,
            len: values.len(),
            stride: 3,
        });
    }
    Ok(values
        .chunks_exact(3)
        .map(|c| Vec3::new(c[0], c[1], c[2]))
        .collect())
}

/// One face of a [`Mesh`].
pub struct MeshTriangle {
    mesh: Arc<Mesh>,
    face: usize,
}

impl MeshTriangle {
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn geometric_normal(&self) -> Vec3 {
        let [p0, p1, p2] = self.mesh.face_positions(self.face);
        (p1 - p0).cross(p2 - p0).normalize_or_zero()
    }
}

impl Surface for MeshTriangle {
    fn intersect<'a>(&'a self, ray: &Ray, rec: &mut IntersectionRecord<'a>) -> bool {
        let [p0, p1, p2] = self.mesh.face_positions(self.face);
        let Some(hit) = intersect_triangle(p0, p1, p2, ray) else {
            return false;
        };

        let [i0, i1, i2] = self.mesh.face(self.face);
        let weights = (hit.alpha(), hit.beta, hit.gamma);

        let normal = match &self.mesh.normals {
            Some(normals) => {
                let n = weights.0 * normals[i0] + weights.1 * normals[i1] + weights.2 * normals[i2];
                let n = n.normalize_or_zero();
                if n == Vec3::ZERO {
                    self.geometric_normal()
                } else {
                    n
                }
            }
            None => self.geometric_normal(),
        };

        rec.t = hit.t;
        rec.set_face_normal(ray, ray.at(hit.t), normal);
        rec.tex_coords = match &self.mesh.tex_coords {
            Some(uvs) => weights.0 * uvs[i0] + weights.1 * uvs[i1] + weights.2 * uvs[i2],
            None => Vec2::new(hit.beta, hit.gamma),
        };
        rec.surface = Some(self);
        true
    }

    fn add_to_bounding_box(&self, aabb: &mut Aabb) {
        for p in self.mesh.face_positions(self.face) {
            aabb.add_point(p);
        }
    }

    fn centroid(&self) -> Vec3 {
        let [p0, p1, p2] = self.mesh.face_positions(self.face);
        (p0 + p1 + p2) / 3.0
    }

    fn area(&self) -> f32 {
        let [p0, p1, p2] = self.mesh.face_positions(self.face);
        0.5 * (p1 - p0).cross(p2 - p0).length()
    }

    fn material(&self) -> &dyn Material {
        self.mesh.material.as_ref()
    }

    fn choose_sample_point(&self, seed: Vec2, lrec: &mut LuminaireSamplingRecord<'_>) {
        let [p0, p1, p2] = self.mesh.face_positions(self.face);
        lrec.frame = sample_triangle(p0, p1, p2, self.geometric_normal(), seed);
        lrec.pdf = 1.0 / self.area();
    }
}
