use crate::Vec3;

/// A ray in 3D space with origin, direction, and a valid parameter range.
///
/// Hits are only accepted for `start <= t < end`. Traversal narrows `end` to
/// the closest hit found so far; offset rays start at [`Ray::EPSILON`] so a
/// ray leaving a surface does not immediately hit that surface again.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub start: f32,
    pub end: f32,
}

impl Ray {
    /// Self-intersection offset for secondary rays.
    pub const EPSILON: f32 = 1e-4;

    /// Create a ray over `[0, inf)`. The direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            start: 0.0,
            end: f32::INFINITY,
        }
    }

    /// Create a ray over `[EPSILON, inf)`, for rays leaving a surface.
    pub fn offset(origin: Vec3, direction: Vec3) -> Self {
        let mut ray = Self::new(origin, direction);
        ray.make_offset_ray();
        ray
    }

    /// Create a shadow segment from `from` toward `to`.
    ///
    /// Both endpoints are excluded by `EPSILON`, so neither the shading
    /// surface nor the light surface occludes the segment.
    pub fn segment(from: Vec3, to: Vec3) -> Self {
        let delta = to - from;
        let length = delta.length();
        Self {
            origin: from,
            direction: delta / length,
            start: 0.0,
            end: 0.0,
        }
        .with_offset_segment(length - Self::EPSILON)
    }

    /// Restrict the ray to `[EPSILON, inf)`.
    pub fn make_offset_ray(&mut self) {
        self.start = Self::EPSILON;
        self.end = f32::INFINITY;
    }

    /// Restrict the ray to `[EPSILON, end)`.
    pub fn make_offset_segment(&mut self, end: f32) {
        self.start = Self::EPSILON;
        self.end = end;
    }

    fn with_offset_segment(mut self, end: f32) -> Self {
        self.make_offset_segment(end);
        self
    }

    /// Whether `t` lies in the ray's half-open range.
    #[inline]
    pub fn admits(&self, t: f32) -> bool {
        t >= self.start && t < self.end
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_new_normalizes_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(ray.start, 0.0);
        assert_eq!(ray.end, f32::INFINITY);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::Y);
        assert_eq!(ray.at(0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(ray.at(2.0), Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_offset_ray_excludes_origin() {
        let ray = Ray::offset(Vec3::ZERO, Vec3::Z);
        assert!(!ray.admits(0.0));
        assert!(ray.admits(Ray::EPSILON));
        assert!(ray.admits(1e6));
    }

    #[test]
    fn test_segment_stops_short_of_target() {
        let from = Vec3::new(0.0, 0.0, 0.0);
        let to = Vec3::new(0.0, 0.0, 2.0);
        let ray = Ray::segment(from, to);

        assert_eq!(ray.direction, Vec3::Z);
        assert!(ray.admits(1.0));
        assert!(!ray.admits(2.0));
        assert!(!ray.admits(0.0));
        assert!((ray.end - (2.0 - Ray::EPSILON)).abs() < 1e-6);
    }

    #[test]
    fn test_half_open_range() {
        let mut ray = Ray::new(Vec3::ZERO, Vec3::X);
        ray.make_offset_segment(5.0);
        assert!(ray.admits(4.999));
        assert!(!ray.admits(5.0));
    }
}
