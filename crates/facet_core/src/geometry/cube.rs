use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec3};

use super::{transform_all, Quad};
use crate::color::Color;
use crate::transform::Transform;
use crate::vertex::Vertex;

/// A unit cube centred at the origin, assembled from six [`Quad`] faces.
#[derive(Debug, Clone)]
pub struct Cube {
    pub color: Color,
    pub transform: Transform,
    pub(super) vertices: Vec<Vertex>,
}

impl Cube {
    pub const TRIANGLES: usize = 6 * Quad::TRIANGLES;

    pub fn new(transform: Transform, color: Color) -> Self {
        // (face centre, rotation taking +Z onto the face normal)
        let faces = [
            (Vec3::new(0.0, 0.0, 0.5), Quat::IDENTITY),
            (Vec3::new(0.5, 0.0, 0.0), Quat::from_rotation_y(FRAC_PI_2)),
            (Vec3::new(0.0, 0.0, -0.5), Quat::from_rotation_y(PI)),
            (Vec3::new(-0.5, 0.0, 0.0), Quat::from_rotation_y(PI * 1.5)),
            (Vec3::new(0.0, -0.5, 0.0), Quat::from_rotation_x(FRAC_PI_2)),
            (Vec3::new(0.0, 0.5, 0.0), Quat::from_rotation_x(-FRAC_PI_2)),
        ];

        // Each face keeps its own copy of the quad vertices; shared corners
        // are not deduplicated because the normals differ per face.
        let vertices = faces
            .into_iter()
            .flat_map(|(centre, rotation)| {
                let face = Quad::new(Transform::from_translation_rotation(centre, rotation), color);
                transform_all(&face.transform, &face.vertices)
            })
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
    fn every_face_normal_points_outward() {
        let cube = Cube::new(Transform::IDENTITY, Color::WHITE);
        assert_eq!(cube.vertices.len(), Cube::TRIANGLES * 3);
        for v in &cube.vertices {
            let n = v.normal();
            // the vertex lies on the face its normal names
            assert!((v.position().dot(n) - 0.5).abs() < 1e-5);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn corners_stay_on_the_unit_cube() {
        let cube = Cube::new(Transform::IDENTITY, Color::WHITE);
        for v in &cube.vertices {
            let p = v.position().abs();
            assert!(p.max_element() <= 0.5 + 1e-5);
            assert!((p.x - 0.5).abs() < 1e-5 || (p.y - 0.5).abs() < 1e-5 || (p.z - 0.5).abs() < 1e-5);
        }
    }
}
