//! Vertex record shared by every geometry variant and render pipeline.
//!
//! Position, normal and colour are packed as three contiguous `vec3<f32>`
//! fields so that `bytemuck` can reinterpret a vertex slice as bytes.  The
//! matching WGSL attribute locations are declared in the renderer's
//! `shaders/scene.wgsl`.

use glam::Vec3;

/// One corner of a triangle.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object- or world-space position, depending on who produced it.
    pub position: [f32; 3],
    /// Unit surface normal used for shading.
    pub normal: [f32; 3],
    /// Linear RGB colour.
    pub color: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, color: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color: color.to_array(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    #[inline]
    pub fn color(&self) -> Vec3 {
        Vec3::from_array(self.color)
    }

    /// Returns the `VertexBufferLayout` that matches this struct's memory
    /// layout.  Pass this to `wgpu::VertexState::buffers` when building a
    /// render pipeline.
    #[cfg(feature = "gpu")]
    pub fn layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
            0 => Float32x3, // position
            1 => Float32x3, // normal
            2 => Float32x3 // color
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_packed_without_padding() {
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
        let v = Vertex::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, Vec3::new(0.5, 0.25, 0.0));
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&v));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.0, 1.0, 0.0, 0.5, 0.25, 0.0]);
    }

    #[cfg(feature = "gpu")]
    #[test]
    fn layout_offsets_match_the_struct() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 36);
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
        let locations: Vec<u32> = layout.attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![0, 1, 2]);
    }
}
