use lumen_math::Vec3;

use crate::Color;

/// An infinitesimal isotropic light. Only the non-Monte-Carlo shaders see
/// point lights; path tracing ignores them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    /// Radiant intensity (power per unit solid angle)
    pub intensity: Color,
}

impl PointLight {
    pub fn new(position: Vec3, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }

    /// Irradiance-style contribution at `point`, before cosine and visibility.
    pub fn intensity_at(&self, point: Vec3) -> Color {
        let d2 = (self.position - point).length_squared();
        if d2 <= 0.0 {
            return Color::ZERO;
        }
        self.intensity / d2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_square_falloff() {
        let light = PointLight::new(Vec3::new(0.0, 2.0, 0.0), Color::splat(8.0));
        assert_eq!(light.intensity_at(Vec3::ZERO), Color::splat(2.0));
        assert_eq!(light.intensity_at(light.position), Color::ZERO);
    }
}
