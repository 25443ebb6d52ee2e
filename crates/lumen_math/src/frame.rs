//! Orthonormal local frames anchored at a point.
//!
//! Shading happens in a frame whose `w` axis is the surface normal, so BRDFs
//! and sampling warps can work with `z` as "up".

use crate::Vec3;

/// Right-handed orthonormal basis `(u, v, w)` with origin `o`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub o: Vec3,
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl Frame {
    /// Build a frame around `w`, picking arbitrary tangents.
    pub fn from_w(o: Vec3, w: Vec3) -> Self {
        let w = w.normalize();
        let u = w.any_orthonormal_vector();
        let v = w.cross(u);
        Self { o, u, v, w }
    }

    /// Build a frame around `w` with `u` as close to the given tangent as the
    /// basis allows. Falls back to [`Frame::from_w`] when `u` is parallel to `w`.
    pub fn from_wu(o: Vec3, w: Vec3, u: Vec3) -> Self {
        let w = w.normalize();
        let v = w.cross(u);
        if v.length_squared() < 1e-12 {
            return Self::from_w(o, w);
        }
        let v = v.normalize();
        let u = v.cross(w);
        Self { o, u, v, w }
    }

    /// Express a local direction in world coordinates.
    #[inline]
    pub fn to_canonical(&self, local: Vec3) -> Vec3 {
        self.u * local.x + self.v * local.y + self.w * local.z
    }

    /// Express a local point in world coordinates.
    #[inline]
    pub fn point_to_canonical(&self, local: Vec3) -> Vec3 {
        self.o + self.to_canonical(local)
    }

    /// Express a world direction in local coordinates.
    #[inline]
    pub fn to_local(&self, dir: Vec3) -> Vec3 {
        Vec3::new(dir.dot(self.u), dir.dot(self.v), dir.dot(self.w))
    }

    /// Cosine between `dir` and the frame normal, for unit `dir`.
    #[inline]
    pub fn cos_theta(&self, dir: Vec3) -> f32 {
        dir.dot(self.w)
    }

    /// Flip the basis so `w` points the other way, keeping it right-handed.
    pub fn flipped(&self) -> Self {
        Self {
            o: self.o,
            u: self.v,
            v: self.u,
            w: -self.w,
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            o: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(frame: &Frame) {
        assert!((frame.u.length() - 1.0).abs() < 1e-5);
        assert!((frame.v.length() - 1.0).abs() < 1e-5);
        assert!((frame.w.length() - 1.0).abs() < 1e-5);
        assert!(frame.u.dot(frame.v).abs() < 1e-5);
        assert!(frame.u.dot(frame.w).abs() < 1e-5);
        assert!(frame.v.dot(frame.w).abs() < 1e-5);
        // Right-handed
        assert!((frame.u.cross(frame.v) - frame.w).length() < 1e-5);
    }

    #[test]
    fn test_from_w_is_orthonormal() {
        for w in [Vec3::Z, -Vec3::Z, Vec3::X, Vec3::new(1.0, 2.0, -3.0)] {
            let frame = Frame::from_w(Vec3::ZERO, w);
            assert_orthonormal(&frame);
            assert!((frame.w - w.normalize()).length() < 1e-5);
        }
    }

    #[test]
    fn test_from_wu_keeps_tangent() {
        let frame = Frame::from_wu(Vec3::ONE, Vec3::Z, Vec3::new(2.0, 0.0, 0.5));
        assert_orthonormal(&frame);
        assert!((frame.u - Vec3::X).length() < 1e-5);
        assert_eq!(frame.o, Vec3::ONE);
    }

    #[test]
    fn test_from_wu_parallel_tangent_falls_back() {
        let frame = Frame::from_wu(Vec3::ZERO, Vec3::Y, Vec3::Y);
        assert_orthonormal(&frame);
        assert!((frame.w - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_local_round_trip() {
        let frame = Frame::from_w(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.3, -0.4, 0.8));
        let dir = Vec3::new(0.2, 0.5, -0.1);
        let back = frame.to_canonical(frame.to_local(dir));
        assert!((back - dir).length() < 1e-5);

        let p = frame.point_to_canonical(Vec3::Z);
        assert!((p - (frame.o + frame.w)).length() < 1e-5);
    }

    #[test]
    fn test_flipped_stays_right_handed() {
        let frame = Frame::from_w(Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0)).flipped();
        assert_orthonormal(&frame);
    }
}
