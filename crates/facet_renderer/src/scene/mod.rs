//! GPU-resident scene: the shapes, lights and camera plus the buffers the
//! pipelines read.
//!
//! Buffer sizes are fixed when the scene is built: the vertex buffer holds
//! exactly `Σ triangle_count × 3` vertices and the light buffer exactly one
//! entry per light.  Later updates rewrite these buffers in place.
//!
//! The uniform block is rewritten every frame, so there is one uniform
//! buffer (and one bind group) per in-flight frame slot.  A frame only ever
//! writes the buffer of its own slot, which no earlier in-flight frame is
//! still reading.

mod uniforms;

pub use uniforms::{GpuLight, SceneUniforms};

use facet_core::context::GpuContext;
use facet_core::{Camera, Geometry, Light, PhongMaterial, Transform, Vertex};

use crate::error::{BufferError, FrameError};
use crate::resources::Buffer;
use crate::scheduler::MAX_FRAMES_IN_FLIGHT;

/// Vertex-buffer length needed for `shapes`.
pub fn vertex_capacity(shapes: &[Geometry]) -> usize {
    shapes.iter().map(|g| g.triangle_count() * 3).sum()
}

pub struct Scene {
    camera: Camera,
    shapes: Vec<Geometry>,
    lights: Vec<Light>,
    material: PhongMaterial,

    vertices: Buffer<Vertex>,
    light_buffer: Buffer<GpuLight>,
    uniforms: Vec<Buffer<SceneUniforms>>,

    layout: wgpu::BindGroupLayout,
    bind_groups: Vec<wgpu::BindGroup>,
}

impl Scene {
    /// Allocates the scene's buffers and uploads the initial vertex and
    /// light data.
    pub fn build(
        context: &GpuContext,
        camera: Camera,
        shapes: Vec<Geometry>,
        lights: Vec<Light>,
    ) -> Result<Self, BufferError> {
        let vertices = Buffer::new(
            context,
            "scene vertices",
            vertex_capacity(&shapes),
            // copy source so the uploaded geometry can be read back
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_SRC,
        )?;
        let light_buffer = Buffer::new(
            context,
            "scene lights",
            lights.len(),
            wgpu::BufferUsages::STORAGE,
        )?;
        let uniforms = (0..MAX_FRAMES_IN_FLIGHT)
            .map(|slot| {
                Buffer::new(
                    context,
                    &format!("scene uniforms #{slot}"),
                    1,
                    wgpu::BufferUsages::UNIFORM,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let layout = Self::create_layout(&context.device);
        let bind_groups = uniforms
            .iter()
            .enumerate()
            .map(|(slot, u)| {
                context
                    .device
                    .create_bind_group(&wgpu::BindGroupDescriptor {
                        label: Some(&format!("scene bind group #{slot}")),
                        layout: &layout,
                        entries: &[
                            wgpu::BindGroupEntry {
                                binding: 0,
                                resource: u.as_entire_binding(),
                            },
                            wgpu::BindGroupEntry {
                                binding: 1,
                                resource: light_buffer.as_entire_binding(),
                            },
                        ],
                    })
            })
            .collect();

        let mut scene = Self {
            camera,
            shapes,
            lights,
            material: PhongMaterial::default(),
            vertices,
            light_buffer,
            uniforms,
            layout,
            bind_groups,
        };
        scene.refresh_vertex_data()?;
        scene.refresh_lights()?;

        log::info!(
            "scene built: {} shapes, {} vertices, {} lights",
            scene.shapes.len(),
            scene.vertices.capacity(),
            scene.lights.len()
        );
        Ok(scene)
    }

    fn create_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<SceneUniforms>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        })
    }

    /// Rewrites every shape's world-space vertices, in list order.
    pub fn refresh_vertex_data(&mut self) -> Result<(), BufferError> {
        let mut offset = 0;
        for shape in &self.shapes {
            let data = shape.transformed_vertices();
            self.vertices.write(offset, &data)?;
            offset += data.len();
        }
        Ok(())
    }

    /// Writes this frame's uniform snapshot into `slot`'s buffer.
    pub fn refresh_uniforms(&mut self, slot: usize) -> Result<(), BufferError> {
        let slots = self.uniforms.len();
        let snapshot = SceneUniforms::snapshot(&self.camera, self.material, self.lights.len());
        self.uniforms
            .get_mut(slot)
            .ok_or(BufferError::OutOfBounds {
                offset: slot,
                len: 1,
                capacity: slots,
            })?
            .write(0, &[snapshot])
    }

    pub fn refresh_lights(&mut self) -> Result<(), BufferError> {
        let data: Vec<GpuLight> = self.lights.iter().map(GpuLight::from).collect();
        self.light_buffer.write(0, &data)
    }

    /// Keeps the field of view and adopts the new viewport size.
    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        let fovy = self.camera.projection().fovy;
        self.camera.perspective(fovy, width, height);
    }

    /// Replaces the transform of shape `index` and rewrites only that
    /// shape's slice of the vertex buffer.
    pub fn set_transform(&mut self, index: usize, transform: Transform) -> Result<(), BufferError> {
        let count = self.shapes.len();
        let offset = vertex_capacity(&self.shapes[..index.min(count)]);
        let shape = self.shapes.get_mut(index).ok_or(BufferError::OutOfBounds {
            offset: index,
            len: 1,
            capacity: count,
        })?;
        shape.set_transform(transform);
        let data = shape.transformed_vertices();
        self.vertices.write(offset, &data)
    }

    pub fn set_light(&mut self, index: usize, light: Light) -> Result<(), BufferError> {
        let count = self.lights.len();
        let slot = self.lights.get_mut(index).ok_or(BufferError::OutOfBounds {
            offset: index,
            len: 1,
            capacity: count,
        })?;
        *slot = light;
        self.light_buffer.write(index, &[GpuLight::from(&light)])
    }

    /// Picked up by the next `refresh_uniforms`.
    pub fn set_material(&mut self, material: PhongMaterial) {
        self.material = material;
    }

    /// Uploads pending writes of managed buffers.
    pub fn flush(&mut self) {
        self.vertices.flush();
        self.light_buffer.flush();
        for u in &mut self.uniforms {
            u.flush();
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn shapes(&self) -> &[Geometry] {
        &self.shapes
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn material(&self) -> PhongMaterial {
        self.material
    }

    pub fn vertex_buffer(&self) -> &Buffer<Vertex> {
        &self.vertices
    }

    pub fn light_buffer(&self) -> &Buffer<GpuLight> {
        &self.light_buffer
    }

    pub fn uniform_buffer(&self, slot: usize) -> Option<&Buffer<SceneUniforms>> {
        self.uniforms.get(slot)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.capacity()
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self, slot: usize) -> Result<&wgpu::BindGroup, FrameError> {
        self.bind_groups.get(slot).ok_or_else(|| {
            FrameError::Recording(format!(
                "no bind group for frame slot {slot} (have {})",
                self.bind_groups.len()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_core::{Color, Cube, Diamond, Quad, Sphere};

    #[test]
    fn capacity_sums_triangles() {
        let t = Transform::IDENTITY;
        let shapes: Vec<Geometry> = vec![
            Quad::new(t, Color::RED).into(),
            Cube::new(t, Color::GRAY).into(),
            Diamond::new(t, Color::WHITE).into(),
            Sphere::with_tessellation(t, Color::WHITE, 4, 3).into(),
        ];
        assert_eq!(vertex_capacity(&shapes), (2 + 12 + 8 + 4 * 3 * 2) * 3);
        assert_eq!(vertex_capacity(&[]), 0);
    }
}
