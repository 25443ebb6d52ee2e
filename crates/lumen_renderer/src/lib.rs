//! Lumen renderer - CPU Monte Carlo light transport
//!
//! A physically-based renderer core:
//! - Median-split BVH over spheres, triangles and indexed meshes
//! - Importance-sampled Lambertian and Beckmann microfacet BRDFs
//! - Area-light sampling with shadow rays
//! - Direct-lighting and recursive path-tracing integrators
//! - Jittered stratified sampling and parallel bucket rendering

mod background;
mod brdf;
mod bucket;
mod bvh;
mod camera;
mod config;
mod error;
mod integrator;
mod light;
mod material;
mod mesh;
mod microfacet;
mod path_tracer;
mod renderer;
mod sampler;
mod scene;
mod shaders;
mod sphere;
mod surface;
mod triangle;

pub use background::{Background, SkyGradient, Uniform};
pub use brdf::{Brdf, BrdfSample, Lambertian};
pub use bucket::{generate_buckets, render, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::{Bvh, BvhNode, BvhStats, DEFAULT_LEAF_SIZE};
pub use camera::Camera;
pub use config::{CameraConfig, IntegratorConfig, RenderConfig, SamplerConfig};
pub use error::{ConfigError, MeshError, SceneError};
pub use integrator::{DirectOnly, DirectStrategy, Integrator};
pub use light::PointLight;
pub use material::{Color, Homogeneous, LambertianEmitter, Material};
pub use mesh::{Mesh, MeshTriangle};
pub use microfacet::Microfacet;
pub use path_tracer::{PathTracer, DEFAULT_DEPTH_LIMIT};
pub use renderer::{color_to_rgba, gamma_correct, ImageBuffer, RenderContext};
pub use sampler::{IndependentSampler, JitteredSampler, SampleGenerator, STRATIFIED_DIMENSIONS};
pub use scene::{Scene, SceneBuilder};
pub use shaders::{AmbientOcclusion, PointLightShader};
pub use sphere::Sphere;
pub use surface::{IntersectionRecord, LuminaireSamplingRecord, Surface};
pub use triangle::{intersect_triangle, Triangle, TriangleHit};

/// Re-export math types from lumen_math
pub use lumen_math::{Aabb, Frame, Ray, Vec2, Vec3};
