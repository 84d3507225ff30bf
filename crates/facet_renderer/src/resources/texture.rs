/// 2-D render-attachment texture parameters.
pub struct RenderTextureDesc<'a> {
    pub label: &'a str,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    /// 1 disables multisampling.
    pub sample_count: u32,
    pub usage: wgpu::TextureUsages,
}

/// Creates the texture and its default view.  Zero extents are raised to 1
/// so a minimised window never produces an invalid descriptor.
pub fn create_render_texture(
    device: &wgpu::Device,
    desc: &RenderTextureDesc<'_>,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(desc.label),
        size: wgpu::Extent3d {
            width: desc.width.max(1),
            height: desc.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: desc.sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: desc.format,
        usage: desc.usage,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}
