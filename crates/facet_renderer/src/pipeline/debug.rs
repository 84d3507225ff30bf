use facet_core::context::GpuContext;
use facet_core::{Color, Vertex};
use glam::Vec3;

use super::{begin_pass, build_pipeline, draw_scene, FrameLoad, PipelineDesc, PipelineSettings};
use crate::error::{FrameError, PipelineError};
use crate::render_target::FrameTarget;
use crate::resources::Buffer;
use crate::scene::Scene;
use crate::shader::{
    ShaderLibrary, FRAG_SOLID_COLOR, FRAG_SOLID_RED_COLOR, VERTEX_DEFAULT, VERTEX_INFINITE_GRID,
};

/// Half-width of the ground grid in world units.
pub const GRID_SPAN: i32 = 20;

/// Line list for a square grid on the XZ plane: `2 * span + 1` lines along
/// each axis, two vertices per line, all pointing up and coloured
/// [`Color::GRID`].
pub fn grid_vertices(span: i32) -> Vec<Vertex> {
    let color = Color::GRID.to_vec3();
    let extent = span as f32;
    let vertex = |x: f32, z: f32| Vertex::new(Vec3::new(x, 0.0, z), Vec3::Y, color);

    let mut out = Vec::with_capacity(((2 * span + 1) * 4) as usize);
    for i in -span..=span {
        let z = i as f32;
        out.extend([vertex(extent, z), vertex(-extent, z)]);
    }
    for i in -span..=span {
        let x = i as f32;
        out.extend([vertex(x, extent), vertex(x, -extent)]);
    }
    out
}

/// Ground grid plus the scene as a red, unculled wireframe, drawn without a
/// depth test so it sits on top of whatever was drawn before.
pub struct DebugPipeline {
    grid_pipeline: wgpu::RenderPipeline,
    shape_pipeline: wgpu::RenderPipeline,
    grid: Buffer<Vertex>,
}

impl DebugPipeline {
    /// Used only when this pipeline opens the frame.
    pub const BACKGROUND: Color = Color::WHITE;

    pub fn new(
        context: &GpuContext,
        library: &ShaderLibrary,
        settings: &PipelineSettings,
        scene: &Scene,
    ) -> Result<Self, PipelineError> {
        let grid_pipeline = build_pipeline(
            context,
            library,
            settings,
            scene,
            &PipelineDesc {
                label: "debug grid",
                vertex: VERTEX_INFINITE_GRID,
                fragment: FRAG_SOLID_COLOR,
                topology: wgpu::PrimitiveTopology::LineList,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                depth_test: false,
            },
        )?;

        let polygon_mode = if context.supports_wireframe() {
            wgpu::PolygonMode::Line
        } else {
            log::warn!("line polygon mode unavailable; debug shapes are drawn filled");
            wgpu::PolygonMode::Fill
        };
        let shape_pipeline = build_pipeline(
            context,
            library,
            settings,
            scene,
            &PipelineDesc {
                label: "debug shapes",
                vertex: VERTEX_DEFAULT,
                fragment: FRAG_SOLID_RED_COLOR,
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                polygon_mode,
                depth_test: false,
            },
        )?;

        let lines = grid_vertices(GRID_SPAN);
        let mut grid = Buffer::new(context, "debug grid", lines.len(), wgpu::BufferUsages::VERTEX)?;
        grid.write(0, &lines)?;
        grid.flush();

        Ok(Self {
            grid_pipeline,
            shape_pipeline,
            grid,
        })
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
            "debug pass",
            Self::BACKGROUND.to_wgpu(),
            load,
            false,
        )?;

        pass.push_debug_group("coordinate grid");
        pass.set_pipeline(&self.grid_pipeline);
        pass.set_bind_group(0, scene.bind_group(slot)?, &[]);
        pass.set_vertex_buffer(0, self.grid.slice());
        pass.draw(0..self.grid.len() as u32, 0..1);
        pass.pop_debug_group();

        pass.push_debug_group("shapes (debug)");
        draw_scene(&mut pass, &self.shape_pipeline, scene, slot)?;
        pass.pop_debug_group();
        Ok(())
    }
}
