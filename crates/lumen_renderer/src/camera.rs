//! Pinhole camera for ray generation.

use lumen_math::{Ray, Vec3};

/// Pinhole camera mapping image coordinates to primary rays.
#[derive(Debug, Clone)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Vertical field of view in degrees
    vfov: f32,
    /// Image width over height
    aspect: f32,

    // Cached computed values (set by initialize())
    upper_left: Vec3,
    viewport_u: Vec3,
    viewport_v: Vec3,
}

impl Camera {
    /// Camera at the origin looking down -Z with a 90 degree field of view.
    pub fn new() -> Self {
        let mut camera = Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect: 1.0,
            upper_left: Vec3::ZERO,
            viewport_u: Vec3::ZERO,
            viewport_v: Vec3::ZERO,
        };
        camera.initialize();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.initialize();
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self.initialize();
        self
    }

    /// Set the image aspect ratio (width / height).
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self.initialize();
        self
    }

    pub fn position(&self) -> Vec3 {
        self.look_from
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Recompute the viewport from the current settings.
    fn initialize(&mut self) {
        // Calculate viewport dimensions on the plane one unit in front
        let h = (self.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = viewport_height * self.aspect;

        // Calculate camera basis vectors
        let w = (self.look_from - self.look_at).normalize_or_zero();
        let u = self.vup.cross(w).normalize_or_zero();
        let v = w.cross(u);

        self.viewport_u = viewport_width * u;
        self.viewport_v = -viewport_height * v;
        self.upper_left = self.look_from - w - self.viewport_u / 2.0 - self.viewport_v / 2.0;
    }

    /// Ray through image position `(u, v)` in `[0, 1]²`.
    ///
    /// `u` grows to the right and `v` grows downward, matching pixel rows.
    pub fn get_ray(&self, u: f32, v: f32) -> Ray {
        let target = self.upper_left + u * self.viewport_u + v * self.viewport_v;
        Ray::offset(self.look_from, target - self.look_from)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
