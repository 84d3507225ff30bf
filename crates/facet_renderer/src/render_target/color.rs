use crate::resources::texture::{create_render_texture, RenderTextureDesc};

/// Color attachments: an optional multisampled buffer and an optional
/// offscreen output texture.
///
/// A window-backed target owns no output texture; the swapchain view is
/// supplied each frame instead.
pub struct ColorTarget {
    pub format: wgpu::TextureFormat,
    pub sample_count: u32,
    msaa: Option<(wgpu::Texture, wgpu::TextureView)>,
    output: Option<(wgpu::Texture, wgpu::TextureView)>,
}

impl ColorTarget {
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        sample_count: u32,
        offscreen: bool,
    ) -> Self {
        let mut target = Self {
            format,
            sample_count,
            msaa: None,
            output: None,
        };
        target.allocate(device, width, height, offscreen);
        target
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let offscreen = self.output.is_some();
        self.allocate(device, width, height, offscreen);
    }

    fn allocate(&mut self, device: &wgpu::Device, width: u32, height: u32, offscreen: bool) {
        self.msaa = (self.sample_count > 1).then(|| {
            create_render_texture(
                device,
                &RenderTextureDesc {
                    label: "facet msaa color",
                    width,
                    height,
                    format: self.format,
                    sample_count: self.sample_count,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                },
            )
        });
        self.output = offscreen.then(|| {
            create_render_texture(
                device,
                &RenderTextureDesc {
                    label: "facet offscreen color",
                    width,
                    height,
                    format: self.format,
                    sample_count: 1,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                        | wgpu::TextureUsages::TEXTURE_BINDING
                        | wgpu::TextureUsages::COPY_SRC,
                },
            )
        });
    }

    /// Offscreen output texture, if this target owns one.
    pub fn output_texture(&self) -> Option<&wgpu::Texture> {
        self.output.as_ref().map(|(t, _)| t)
    }

    /// `(render view, resolve target)` for a color attachment writing into
    /// `output`, or into the owned offscreen texture when `output` is `None`.
    pub fn attachment_views<'a>(
        &'a self,
        output: Option<&'a wgpu::TextureView>,
    ) -> Option<(&'a wgpu::TextureView, Option<&'a wgpu::TextureView>)> {
        let output = output.or(self.output.as_ref().map(|(_, v)| v))?;
        Some(match &self.msaa {
            Some((_, msaa)) => (msaa, Some(output)),
            None => (output, None),
        })
    }
}
