/// Phong reflection coefficients shared by every lit surface.
///
/// The layout matches the `Material` struct in the scene shader, so the
/// value is embedded verbatim in the per-frame uniform block.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PhongMaterial {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            ambient: 0.02,
            diffuse: 0.2,
            specular: 1.0,
            shininess: 16.0,
        }
    }
}

impl PhongMaterial {
    pub const MAX_SHININESS: f32 = 20.0;

    pub fn new(ambient: f32, diffuse: f32, specular: f32, shininess: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }

    /// Coefficients in `[0, 1]`, shininess in `[0, MAX_SHININESS]`.
    /// NaN components fall back to the default value.
    pub fn clamped(self) -> Self {
        let d = Self::default();
        let clamp = |x: f32, fallback: f32, hi: f32| {
            if x.is_nan() {
                fallback
            } else {
                x.clamp(0.0, hi)
            }
        };
        Self {
            ambient: clamp(self.ambient, d.ambient, 1.0),
            diffuse: clamp(self.diffuse, d.diffuse, 1.0),
            specular: clamp(self.specular, d.specular, 1.0),
            shininess: clamp(self.shininess, d.shininess, Self::MAX_SHININESS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_respects_ranges() {
        let m = PhongMaterial::new(-1.0, 0.5, 3.0, 99.0).clamped();
        assert_eq!(m, PhongMaterial::new(0.0, 0.5, 1.0, 20.0));
        assert_eq!(PhongMaterial::default().clamped(), PhongMaterial::default());
    }

    #[test]
    fn nan_falls_back_to_default() {
        let m = PhongMaterial::new(f32::NAN, 0.1, 0.1, 4.0).clamped();
        assert_eq!(m.ambient, PhongMaterial::default().ambient);
    }

    #[test]
    fn layout_is_four_floats() {
        assert_eq!(std::mem::size_of::<PhongMaterial>(), 16);
    }
}
