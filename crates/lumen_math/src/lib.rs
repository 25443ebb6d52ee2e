// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod frame;
mod interval;
mod ray;
pub mod warp;

pub use aabb::Aabb;
pub use frame::Frame;
pub use interval::Interval;
pub use ray::Ray;

/// Denominator guard for near-grazing and degenerate configurations.
pub const DENOM_EPSILON: f32 = 1e-12;

/// Largest value handed to inverse CDFs that are singular at 1.
pub const ONE_MINUS_EPSILON: f32 = 1.0 - f32::EPSILON;
