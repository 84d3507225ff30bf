use crate::resources::texture::{create_render_texture, RenderTextureDesc};

/// Depth (or combined depth-stencil) buffer.  Its sample count must match the
/// color attachment's.
pub struct DepthTarget {
    pub format: wgpu::TextureFormat,
    pub sample_count: u32,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthTarget {
    pub const DEFAULT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let (texture, view) = Self::make(device, width, height, format, sample_count);
        Self {
            format,
            sample_count,
            texture,
            view,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        (self.texture, self.view) =
            Self::make(device, width, height, self.format, self.sample_count);
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    fn make(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        create_render_texture(
            device,
            &RenderTextureDesc {
                label: "facet depth",
                width,
                height,
                format,
                sample_count,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            },
        )
    }
}
