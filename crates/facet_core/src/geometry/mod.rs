//! Tessellated shapes.
//!
//! Every variant turns its parameters into a fixed, object-local triangle
//! list once, at construction.  The list is wound counter-clockwise and its
//! length is always a multiple of three; only the [`Transform`] is mutable
//! afterwards, so the triangle count never changes.
//!
//! The set of shapes is closed, so [`Geometry`] is an enum and every
//! capability is a single `match`.

mod cube;
mod diamond;
mod quad;
mod sphere;

pub use cube::Cube;
pub use diamond::Diamond;
pub use quad::Quad;
pub use sphere::Sphere;

use crate::color::Color;
use crate::transform::Transform;
use crate::vertex::Vertex;

/// A shape placed in the scene.
#[derive(Debug, Clone)]
pub enum Geometry {
    Quad(Quad),
    Cube(Cube),
    Sphere(Sphere),
    Diamond(Diamond),
}

impl Geometry {
    /// Short lowercase name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Geometry::Quad(_) => "quad",
            Geometry::Cube(_) => "cube",
            Geometry::Sphere(_) => "sphere",
            Geometry::Diamond(_) => "diamond",
        }
    }

    /// Surface colour every vertex was created with.
    pub fn color(&self) -> Color {
        match self {
            Geometry::Quad(g) => g.color,
            Geometry::Cube(g) => g.color,
            Geometry::Sphere(g) => g.color,
            Geometry::Diamond(g) => g.color,
        }
    }

    /// Object-local triangle list (CCW, centred at the origin).
    pub fn local_vertices(&self) -> &[Vertex] {
        match self {
            Geometry::Quad(g) => &g.vertices,
            Geometry::Cube(g) => &g.vertices,
            Geometry::Sphere(g) => &g.vertices,
            Geometry::Diamond(g) => &g.vertices,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.local_vertices().len() / 3
    }

    /// Number of vertices this shape contributes to a vertex buffer.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.triangle_count() * 3
    }

    pub fn transform(&self) -> &Transform {
        match self {
            Geometry::Quad(g) => &g.transform,
            Geometry::Cube(g) => &g.transform,
            Geometry::Sphere(g) => &g.transform,
            Geometry::Diamond(g) => &g.transform,
        }
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        match self {
            Geometry::Quad(g) => &mut g.transform,
            Geometry::Cube(g) => &mut g.transform,
            Geometry::Sphere(g) => &mut g.transform,
            Geometry::Diamond(g) => &mut g.transform,
        }
    }

    pub fn set_transform(&mut self, transform: Transform) {
        *self.transform_mut() = transform;
    }

    /// The triangle list in world space.
    pub fn transformed_vertices(&self) -> Vec<Vertex> {
        transform_all(self.transform(), self.local_vertices())
    }
}

impl From<Quad> for Geometry {
    fn from(g: Quad) -> Self {
        Geometry::Quad(g)
    }
}

impl From<Cube> for Geometry {
    fn from(g: Cube) -> Self {
        Geometry::Cube(g)
    }
}

impl From<Sphere> for Geometry {
    fn from(g: Sphere) -> Self {
        Geometry::Sphere(g)
    }
}

impl From<Diamond> for Geometry {
    fn from(g: Diamond) -> Self {
        Geometry::Diamond(g)
    }
}

pub(crate) fn transform_all(transform: &Transform, vertices: &[Vertex]) -> Vec<Vertex> {
    vertices.iter().map(|v| transform.apply(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    fn all_shapes() -> Vec<Geometry> {
        let t = Transform::IDENTITY;
        vec![
            Quad::new(t, Color::RED).into(),
            Cube::new(t, Color::GRAY).into(),
            Sphere::new(t, Color::WHITE).into(),
            Diamond::new(t, Color::GRID).into(),
        ]
    }

    #[test]
    fn transformed_length_matches_triangle_count() {
        for g in all_shapes() {
            assert_eq!(g.local_vertices().len() % 3, 0, "{}", g.name());
            assert_eq!(g.transformed_vertices().len(), g.triangle_count() * 3);
        }
    }

    #[test]
    fn triangle_count_survives_transform_changes() {
        for mut g in all_shapes() {
            let before = g.triangle_count();
            g.set_transform(Transform::new(
                Vec3::new(3.0, -1.0, 2.0),
                Vec3::splat(0.25),
                Quat::from_rotation_x(0.4),
            ));
            g.transform_mut().translate.y += 10.0;
            assert_eq!(g.triangle_count(), before);
            assert_eq!(g.transformed_vertices().len(), before * 3);
        }
    }

    #[test]
    fn transformed_vertices_follow_the_transform() {
        let t = Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::splat(2.0),
            Quat::from_rotation_y(0.9),
        );
        for mut g in all_shapes() {
            g.set_transform(t);
            for (local, world) in g.local_vertices().iter().zip(g.transformed_vertices()) {
                let p = t.rotate * local.position() * t.scale + t.translate;
                assert!(world.position().abs_diff_eq(p, 1e-5));
                assert!(world.normal().abs_diff_eq(t.rotate * local.normal(), 1e-5));
                assert_eq!(world.color, local.color);
            }
        }
    }

    #[test]
    fn vertices_carry_the_surface_color() {
        for g in all_shapes() {
            let c = g.color().to_rgb_array();
            assert!(g.local_vertices().iter().all(|v| v.color == c), "{}", g.name());
        }
    }

    #[test]
    fn triangles_wind_along_their_normals() {
        // CCW winding: the face normal computed from the winding points the
        // same way as the stored vertex normals.
        for g in all_shapes() {
            for tri in g.local_vertices().chunks_exact(3) {
                let (a, b, c) = (tri[0].position(), tri[1].position(), tri[2].position());
                let face = (b - a).cross(c - a);
                if face.length_squared() < 1e-12 {
                    // sphere poles produce degenerate slivers
                    continue;
                }
                let n = tri[0].normal() + tri[1].normal() + tri[2].normal();
                assert!(face.dot(n) > 0.0, "{} has a clockwise triangle", g.name());
            }
        }
    }
}
