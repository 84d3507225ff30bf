use facet_core::context::GpuContext;
use facet_core::Color;

use super::{begin_pass, build_pipeline, draw_scene, FrameLoad, PipelineDesc, PipelineSettings};
use crate::error::{FrameError, PipelineError};
use crate::render_target::FrameTarget;
use crate::scene::Scene;
use crate::shader::{ShaderLibrary, FRAG_PHONG, FRAG_SOLID_COLOR, VERTEX_DEFAULT};

/// Depth-tested raster pipeline with two interchangeable fragment stages:
/// flat vertex colour and Phong lighting.  Both read the same buffers, so
/// switching is just a matter of which compiled state gets bound.
pub struct RasterPipeline {
    flat: wgpu::RenderPipeline,
    phong: wgpu::RenderPipeline,
    phong_enabled: bool,
}

impl RasterPipeline {
    pub const BACKGROUND: Color = Color::NIGHT;

    pub fn new(
        context: &GpuContext,
        library: &ShaderLibrary,
        settings: &PipelineSettings,
        scene: &Scene,
    ) -> Result<Self, PipelineError> {
        let build = |label, fragment| {
            build_pipeline(
                context,
                library,
                settings,
                scene,
                &PipelineDesc {
                    label,
                    vertex: VERTEX_DEFAULT,
                    fragment,
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: Some(wgpu::Face::Back),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    depth_test: true,
                },
            )
        };
        Ok(Self {
            flat: build("raster flat", FRAG_SOLID_COLOR)?,
            phong: build("raster phong", FRAG_PHONG)?,
            phong_enabled: true,
        })
    }

    /// Takes effect on the next recorded frame.
    pub fn set_phong_enabled(&mut self, enabled: bool) {
        self.phong_enabled = enabled;
    }

    pub fn phong_enabled(&self) -> bool {
        self.phong_enabled
    }

    pub fn render_frame(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &FrameTarget<'_>,
        scene: &Scene,
        slot: usize,
        load: FrameLoad,
    ) -> Result<(), FrameError> {
        let pipeline = if self.phong_enabled {
            &self.phong
        } else {
            &self.flat
        };
        let mut pass = begin_pass(
            encoder,
            target,
            "raster pass",
            Self::BACKGROUND.to_wgpu(),
            load,
            true,
        )?;
        draw_scene(&mut pass, pipeline, scene, slot)
    }
}
