use facet_core::{Camera, Light, PhongMaterial};

/// Per-frame uniform block, bound at group 0 binding 0.
///
/// Field order and sizes mirror `Uniforms` in `scene.wgsl`: two matrices,
/// the 16-byte material, then `eye` packed with the light count into the
/// last 16 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub material: PhongMaterial,
    pub eye: [f32; 3],
    pub light_count: u32,
}

impl SceneUniforms {
    pub fn snapshot(camera: &Camera, material: PhongMaterial, light_count: usize) -> Self {
        Self {
            view: camera.view_matrix().to_cols_array_2d(),
            projection: camera.projection().matrix().to_cols_array_2d(),
            material,
            eye: camera.eye().to_array(),
            light_count: light_count as u32,
        }
    }
}

/// A light as the shader's storage array sees it: two `vec3` padded to 16
/// bytes each.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuLight {
    pub position: [f32; 3],
    _pad0: f32,
    pub color: [f32; 3],
    _pad1: f32,
}

impl From<&Light> for GpuLight {
    fn from(light: &Light) -> Self {
        Self {
            position: light.position.to_array(),
            _pad0: 0.0,
            color: light.color.to_array(),
            _pad1: 0.0,
        }
    }
}
