//! Materials bind a BRDF and an optional emission to a surface.

use lumen_math::{Frame, Vec3};

use crate::brdf::{Brdf, Lambertian};

/// Color type alias (linear RGB radiance or reflectance)
pub type Color = Vec3;

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Reflectance model at the surface.
    fn brdf(&self) -> &dyn Brdf;

    /// Radiance leaving the surface along `outgoing`.
    ///
    /// `frame.w` is the emitting side's normal. Most materials return black.
    fn emitted_radiance(&self, _frame: &Frame, _outgoing: Vec3) -> Color {
        Color::ZERO
    }

    /// True if surfaces with this material take part in luminaire sampling.
    fn is_emitter(&self) -> bool {
        false
    }
}

/// A non-emitting material with a single BRDF everywhere.
pub struct Homogeneous {
    brdf: Box<dyn Brdf>,
}

impl Homogeneous {
    pub fn new(brdf: impl Brdf + 'static) -> Self {
        Self {
            brdf: Box::new(brdf),
        }
    }
}

impl Default for Homogeneous {
    fn default() -> Self {
        Self::new(Lambertian::default())
    }
}

impl Material for Homogeneous {
    fn brdf(&self) -> &dyn Brdf {
        self.brdf.as_ref()
    }
}

/// Uniform area emitter. Radiates from its front face only.
pub struct LambertianEmitter {
    radiance: Color,
    brdf: Box<dyn Brdf>,
}

impl LambertianEmitter {
    /// An emitter that reflects nothing.
    pub fn new(radiance: Color) -> Self {
        Self {
            radiance,
            brdf: Box::new(Lambertian::new(Color::ZERO)),
        }
    }

    /// Also reflect light with the given BRDF.
    pub fn with_brdf(mut self, brdf: impl Brdf + 'static) -> Self {
        self.brdf = Box::new(brdf);
        self
    }

    pub fn radiance(&self) -> Color {
        self.radiance
    }
}

impl Material for LambertianEmitter {
    fn brdf(&self) -> &dyn Brdf {
        self.brdf.as_ref()
    }

    fn emitted_radiance(&self, frame: &Frame, outgoing: Vec3) -> Color {
        if frame.cos_theta(outgoing) > 0.0 {
            self.radiance
        } else {
            Color::ZERO
        }
    }

    fn is_emitter(&self) -> bool {
        true
    }
}
