use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use glam::{Quat, Vec3};

use crate::color::Color;
use crate::transform::Transform;
use crate::vertex::Vertex;

/// An octahedron-like gem: four slanted faces on top, mirrored below.
#[derive(Debug, Clone)]
pub struct Diamond {
    pub color: Color,
    pub transform: Transform,
    pub(super) vertices: Vec<Vertex>,
}

impl Diamond {
    pub const TRIANGLES: usize = 8;

    pub fn new(transform: Transform, color: Color) -> Self {
        let c = color.to_vec3();

        // The +Z facing triangle of the upper half; its normal tilts up by
        // 45 degrees.
        let tilt = Quat::from_axis_angle(Vec3::NEG_X, FRAC_PI_4);
        let base_normal = tilt * Vec3::Z;
        let base = [
            Vec3::new(-0.5, 0.0, 0.5),
            Vec3::new(0.5, 0.0, 0.5),
            Vec3::new(0.0, 0.5, 0.0),
        ];

        let mut faces: Vec<(Vec3, Vec3)> = Vec::with_capacity(Self::TRIANGLES * 3);
        for k in 0..4 {
            let r = Quat::from_rotation_y(k as f32 * FRAC_PI_2);
            faces.extend(base.iter().map(|&p| (r * p, r * base_normal)));
        }

        // Bottom half: half a turn about Z keeps the winding intact.
        let flip = Quat::from_rotation_z(PI);
        let bottom: Vec<_> = faces.iter().map(|&(p, n)| (flip * p, flip * n)).collect();
        faces.extend(bottom);

        let vertices = faces
            .into_iter()
            .map(|(p, n)| Vertex::new(p, n, c))
            .collect();

        Self {
            color,
            transform,
            vertices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_faces_with_unit_normals() {
        let d = Diamond::new(Transform::IDENTITY, Color::WHITE);
        assert_eq!(d.vertices.len(), Diamond::TRIANGLES * 3);
        assert!(d
            .vertices
            .iter()
            .all(|v| (v.normal().length() - 1.0).abs() < 1e-5));
    }

    #[test]
    fn halves_mirror_each_other() {
        let d = Diamond::new(Transform::IDENTITY, Color::WHITE);
        let (top, bottom) = d.vertices.split_at(12);
        assert!(top.iter().all(|v| v.position().y >= -1e-6));
        assert!(bottom.iter().all(|v| v.position().y <= 1e-6));
        let apex = top.iter().map(|v| v.position().y).fold(f32::MIN, f32::max);
        assert!((apex - 0.5).abs() < 1e-6);
    }
}
