use super::{color::ColorTarget, depth::DepthTarget};
use crate::error::FrameError;
use crate::pipeline::PipelineSettings;

/// Owned attachments for one output surface or offscreen image.
pub struct RenderTarget {
    pub color: ColorTarget,
    pub depth: Option<DepthTarget>,
    pub width: u32,
    pub height: u32,
}

impl RenderTarget {
    /// Attachments for drawing into views supplied per frame (a swapchain).
    pub fn for_surface(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        settings: &PipelineSettings,
    ) -> Self {
        Self::build(device, width, height, settings, false)
    }

    /// Attachments including an owned output texture (`COPY_SRC`), for
    /// headless rendering and readback.
    pub fn offscreen(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        settings: &PipelineSettings,
    ) -> Self {
        Self::build(device, width, height, settings, true)
    }

    fn build(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        settings: &PipelineSettings,
        offscreen: bool,
    ) -> Self {
        let color = ColorTarget::new(
            device,
            width,
            height,
            settings.color_format,
            settings.sample_count,
            offscreen,
        );
        let depth = settings
            .depth_format
            .map(|format| DepthTarget::new(device, width, height, format, settings.sample_count));
        Self {
            color,
            depth,
            width,
            height,
        }
    }

    /// Recreates the attachments.  Same-size resizes are ignored.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.color.resize(device, width, height);
        if let Some(depth) = &mut self.depth {
            depth.resize(device, width, height);
        }
    }

    /// Borrows the attachments for one frame, drawing into `output` (or the
    /// owned offscreen texture when `None`).
    pub fn frame<'a>(
        &'a self,
        output: Option<&'a wgpu::TextureView>,
    ) -> Result<FrameTarget<'a>, FrameError> {
        let (color, resolve) = self.color.attachment_views(output).ok_or_else(|| {
            FrameError::Recording("render target has no color output".to_string())
        })?;
        Ok(FrameTarget {
            color,
            resolve,
            depth: self.depth.as_ref().map(DepthTarget::view),
            depth_has_stencil: self
                .depth
                .as_ref()
                .is_some_and(|d| d.format.has_stencil_aspect()),
        })
    }
}

/// Borrowed attachments a pipeline records one pass against.
#[derive(Clone, Copy)]
pub struct FrameTarget<'a> {
    /// View rendered into (the MSAA buffer when multisampling).
    pub color: &'a wgpu::TextureView,
    /// Single-sample view the MSAA buffer resolves into.
    pub resolve: Option<&'a wgpu::TextureView>,
    pub depth: Option<&'a wgpu::TextureView>,
    pub depth_has_stencil: bool,
}

impl<'a> FrameTarget<'a> {
    /// Color attachment with the given load operation.  Contents are always
    /// stored so later passes can load them.
    pub fn color_attachment(
        &self,
        load: wgpu::LoadOp<wgpu::Color>,
    ) -> wgpu::RenderPassColorAttachment<'a> {
        wgpu::RenderPassColorAttachment {
            view: self.color,
            resolve_target: self.resolve,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
        }
    }

    /// Depth attachment, cleared to the far plane when `clear` is set, or
    /// `None` when the target has no depth buffer.
    pub fn depth_attachment(
        &self,
        clear: bool,
    ) -> Option<wgpu::RenderPassDepthStencilAttachment<'a>> {
        let depth_load = if clear {
            wgpu::LoadOp::Clear(1.0)
        } else {
            wgpu::LoadOp::Load
        };
        let stencil_load = if clear {
            wgpu::LoadOp::Clear(0)
        } else {
            wgpu::LoadOp::Load
        };
        self.depth.map(|view| wgpu::RenderPassDepthStencilAttachment {
            view,
            depth_ops: Some(wgpu::Operations {
                load: depth_load,
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: self.depth_has_stencil.then_some(wgpu::Operations {
                load: stencil_load,
                store: wgpu::StoreOp::Store,
            }),
        })
    }
}
