use facet_core::context::GpuContext;
use facet_core::Color;

use super::{begin_pass, build_pipeline, draw_scene, FrameLoad, PipelineDesc, PipelineSettings};
use crate::error::{FrameError, PipelineError};
use crate::render_target::FrameTarget;
use crate::scene::Scene;
use crate::shader::{ShaderLibrary, FRAG_SOLID_COLOR, VERTEX_DEFAULT};

/// Unlit, depth-tested, back-face culled; every fragment takes its vertex
/// colour.
pub struct SolidColorPipeline {
    pipeline: wgpu::RenderPipeline,
}

impl SolidColorPipeline {
    pub const BACKGROUND: Color = Color::GRAY;

    pub fn new(
        context: &GpuContext,
        library: &ShaderLibrary,
        settings: &PipelineSettings,
        scene: &Scene,
    ) -> Result<Self, PipelineError> {
        let pipeline = build_pipeline(
            context,
            library,
            settings,
            scene,
            &PipelineDesc {
                label: "solid color",
                vertex: VERTEX_DEFAULT,
                fragment: FRAG_SOLID_COLOR,
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                depth_test: true,
            },
        )?;
        Ok(Self { pipeline })
    }

    pub fn render_frame(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &FrameTarget<'_>,
        scene: &Scene,
        slot: usize,
        load: FrameLoad,
    ) -> Result<(), FrameError> {
        let mut pass = begin_pass(
            encoder,
            target,
            "solid color pass",
            Self::BACKGROUND.to_wgpu(),
            load,
            true,
        )?;
        draw_scene(&mut pass, &self.pipeline, scene, slot)
    }
}
