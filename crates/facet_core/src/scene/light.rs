use glam::Vec3;

use crate::color::Color;

/// Point light.  Lights carry no attenuation; every light contributes to
/// every fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
}

impl Light {
    pub fn new(position: Vec3, color: Color) -> Self {
        Self {
            position,
            color: color.to_vec3(),
        }
    }

    pub fn white(position: Vec3) -> Self {
        Self::new(position, Color::WHITE)
    }
}
