use crate::{Interval, Ray, Vec3};

/// Bound on the relative rounding error of a slab distance; exit distances
/// are scaled by `1 + 2 * GAMMA_3` so boxes never reject a ray that hits
/// the surface inside them.
const GAMMA_3: f32 = 3.0 * (f32::EPSILON * 0.5) / (1.0 - 3.0 * (f32::EPSILON * 0.5));

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
/// The empty box has `min = +inf` and `max = -inf` on every axis, so adding a
/// point or a box to it yields exactly that point or box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create the tight AABB of two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self::EMPTY;
        aabb.add_point(a);
        aabb.add_point(b);
        aabb
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Reset to the empty box.
    pub fn clear(&mut self) {
        *self = Self::EMPTY;
    }

    /// Grow the box to contain `p`.
    pub fn add_point(&mut self, p: Vec3) {
        self.x.include(p.x);
        self.y.include(p.y);
        self.z.include(p.z);
    }

    /// Grow the box to contain `other`. Adding an empty box is a no-op.
    pub fn add_box(&mut self, other: &Aabb) {
        *self = Self::surrounding(self, other);
    }

    /// True if any axis is inverted.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Diagonal of the box (max - min).
    pub fn extents(&self) -> Vec3 {
        self.max() - self.min()
    }

    /// Inclusive point containment.
    pub fn contains(&self, p: Vec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Test if a ray's `[start, end)` range passes through this box.
    ///
    /// Uses the slab method. Per axis the entry/exit distances are ordered by
    /// the sign of the direction; the three ranges are intersected and the
    /// result must overlap the ray's range. A ray lying exactly on a slab
    /// plane produces `0 * inf`; that NaN is read as an unbounded slab so
    /// flat boxes stay hittable from within their plane.
    pub fn intersect(&self, r: &Ray) -> bool {
        if self.is_empty() {
            return false;
        }

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let inv_d = 1.0 / r.direction[axis];
            let o = r.origin[axis];

            let mut t0 = (slab.min - o) * inv_d;
            let mut t1 = (slab.max - o) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0.is_nan() {
                t0 = f32::NEG_INFINITY;
            }
            if t1.is_nan() {
                t1 = f32::INFINITY;
            }
            t1 *= 1.0 + 2.0 * GAMMA_3;

            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }

        t_min < r.end && t_max > r.start
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    ///
    /// Ties prefer X, then Y.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size >= y_size && x_size >= z_size {
            0
        } else if y_size >= z_size {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(self.x.center(), self.y.center(), self.z.center())
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
