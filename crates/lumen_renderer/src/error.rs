//! Construction-time errors.
//!
//! Nothing on the per-ray path returns an error: grazing rays, degenerate
//! triangles and back faces are zero contributions. These types cover scene
//! assembly and configuration, which fail before rendering starts.

use thiserror::Error;

/// Malformed indexed mesh data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("{attribute} array length {len} is not a multiple of {stride}")]
    BadArrayLength {
        attribute: &'static str,
        len: usize,
        stride: usize,
    },

    #[error("triangle {triangle} references vertex {index} but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("mesh has {vertex_count} vertices but {found} {attribute}")]
    AttributeCountMismatch {
        attribute: &'static str,
        vertex_count: usize,
        found: usize,
    },
}

/// Errors raised while freezing a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("invalid mesh: {0}")]
    Mesh(#[from] MeshError),

    #[error("surface {index} has non-finite bounds")]
    NonFiniteBounds { index: usize },
}

/// Errors raised while loading a render configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sample count must be positive")]
    ZeroSamples,

    #[error("image size must be positive, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("bucket size must be positive")]
    ZeroBucketSize,

    #[error("gamma must be positive and finite, got {0}")]
    InvalidGamma(f32),
}
