use glam::Vec3;

use crate::color::Color;
use crate::transform::Transform;
use crate::vertex::Vertex;

/// A unit square in the XY plane centred at the origin.  The surface normal
/// points along +Z.
#[derive(Debug, Clone)]
pub struct Quad {
    pub color: Color,
    pub transform: Transform,
    pub(super) vertices: Vec<Vertex>,
}

impl Quad {
    pub const TRIANGLES: usize = 2;

    pub fn new(transform: Transform, color: Color) -> Self {
        let c = color.to_vec3();
        let v = |x: f32, y: f32| Vertex::new(Vec3::new(x, y, 0.0), Vec3::Z, c);

        #[rustfmt::skip]
        let vertices = vec![
            v( 0.5, -0.5), v( 0.5,  0.5), v(-0.5, -0.5),
            v(-0.5, -0.5), v( 0.5,  0.5), v(-0.5,  0.5),
        ];

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
    fn two_triangles_facing_positive_z() {
        let q = Quad::new(Transform::IDENTITY, Color::WHITE);
        assert_eq!(q.vertices.len(), Quad::TRIANGLES * 3);
        assert!(q.vertices.iter().all(|v| v.normal() == Vec3::Z));
        assert!(q.vertices.iter().all(|v| v.position().z == 0.0));
        assert!(q
            .vertices
            .iter()
            .all(|v| v.position().x.abs() == 0.5 && v.position().y.abs() == 0.5));
    }
}
