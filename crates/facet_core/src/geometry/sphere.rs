use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;

use crate::color::Color;
use crate::transform::Transform;
use crate::vertex::Vertex;

/// A UV-tessellated sphere of diameter 1 centred at the origin.
///
/// Normals are the (unit) radius vectors at each corner so that shading
/// interpolates smoothly across the facets.
#[derive(Debug, Clone)]
pub struct Sphere {
    pub color: Color,
    pub transform: Transform,
    pub(super) vertices: Vec<Vertex>,
}

impl Sphere {
    pub const MERIDIANS: usize = 48;
    pub const PARALLELS: usize = 48;
    pub const RADIUS: f32 = 0.5;

    pub fn new(transform: Transform, color: Color) -> Self {
        Self::with_tessellation(transform, color, Self::MERIDIANS, Self::PARALLELS)
    }

    /// Builds a sphere with `meridians × parallels` patches, two triangles
    /// each.  Both counts are raised to the smallest values that still
    /// enclose a volume (3 meridians, 2 parallels).
    pub fn with_tessellation(
        transform: Transform,
        color: Color,
        meridians: usize,
        parallels: usize,
    ) -> Self {
        let meridians = meridians.max(3);
        let parallels = parallels.max(2);
        let c = color.to_vec3();

        let h_step = TAU / meridians as f32;
        let v_step = PI / parallels as f32;

        let mut vertices = Vec::with_capacity(meridians * parallels * 6);
        // walk from the north pole down, one band of patches per parallel
        for i in 0..parallels {
            let v0 = FRAC_PI_2 - i as f32 * v_step;
            let v1 = v0 - v_step;
            let (ring0, y0) = (Self::RADIUS * v0.cos(), Self::RADIUS * v0.sin());
            let (ring1, y1) = (Self::RADIUS * v1.cos(), Self::RADIUS * v1.sin());

            for j in 0..meridians {
                let h0 = j as f32 * h_step;
                let h1 = h0 + h_step;
                let (x0, z0) = (h0.cos(), -h0.sin());
                let (x1, z1) = (h1.cos(), -h1.sin());

                // p0 - p1
                // |  \ |
                // p2 - p3
                let p0 = Vec3::new(ring0 * x0, y0, ring0 * z0);
                let p1 = Vec3::new(ring0 * x1, y0, ring0 * z1);
                let p2 = Vec3::new(ring1 * x0, y1, ring1 * z0);
                let p3 = Vec3::new(ring1 * x1, y1, ring1 * z1);

                // radius is 0.5, so doubling a corner gives its unit normal
                let v = |p: Vec3| Vertex::new(p, 2.0 * p, c);
                vertices.extend([v(p0), v(p2), v(p3), v(p3), v(p1), v(p0)]);
            }
        }

        Self {
            color,
            transform,
            vertices,
        }
    }
}
