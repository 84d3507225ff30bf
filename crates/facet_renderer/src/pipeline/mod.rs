//! Rendering strategies.
//!
//! The set of strategies is closed, so [`RenderPipeline`] is an enum and
//! [`RenderPipeline::render_frame`] is one `match`.  Each variant owns its
//! compiled `wgpu::RenderPipeline` objects (and any static buffers it
//! draws); all of them read the scene's group-0 bind group.
//!
//! A pipeline records exactly one render pass per call and never submits.

mod debug;
mod raster;
mod solid;

pub use debug::{grid_vertices, DebugPipeline, GRID_SPAN};
pub use raster::RasterPipeline;
pub use solid::SolidColorPipeline;

use facet_core::context::GpuContext;
use facet_core::Vertex;

use crate::error::{FrameError, PipelineError};
use crate::render_target::{DepthTarget, FrameTarget};
use crate::scene::Scene;
use crate::shader::ShaderLibrary;

/// Which strategy a [`RenderPipeline`] implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    SolidColor,
    DebugWireframe,
    Raster,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 3] = [
        PipelineKind::SolidColor,
        PipelineKind::DebugWireframe,
        PipelineKind::Raster,
    ];
}

/// What a pass does with the color attachment's previous contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLoad {
    /// First pass of the frame: clear to the pipeline's background.
    Clear,
    /// Overlay: keep what earlier passes drew.
    Load,
}

/// Output formats and multisampling shared by every pipeline of a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    pub sample_count: u32,
    pub color_format: wgpu::TextureFormat,
    /// Required by depth-tested pipelines.
    pub depth_format: Option<wgpu::TextureFormat>,
    /// When set it must equal `depth_format`: depth and stencil share one
    /// attachment.
    pub stencil_format: Option<wgpu::TextureFormat>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            sample_count: 1,
            color_format: wgpu::TextureFormat::Rgba16Float,
            depth_format: Some(DepthTarget::DEFAULT_FORMAT),
            stencil_format: None,
        }
    }
}

impl PipelineSettings {
    pub fn validate(&self, needs_depth: bool) -> Result<(), PipelineError> {
        let invalid = |msg: String| Err(PipelineError::InvalidSettings(msg));

        if self.sample_count == 0 || !self.sample_count.is_power_of_two() {
            return invalid(format!(
                "sample count {} is not a power of two",
                self.sample_count
            ));
        }
        if self.color_format.is_depth_stencil_format() {
            return invalid(format!(
                "{:?} cannot be used as a color format",
                self.color_format
            ));
        }
        match self.depth_format {
            None if needs_depth => {
                return invalid("depth-tested pipeline without a depth format".to_string())
            }
            Some(f) if !f.has_depth_aspect() => {
                return invalid(format!("{f:?} has no depth aspect"));
            }
            _ => {}
        }
        if let Some(stencil) = self.stencil_format {
            if Some(stencil) != self.depth_format || !stencil.has_stencil_aspect() {
                return invalid(format!(
                    "stencil format {stencil:?} must be a combined depth-stencil format equal to the depth format"
                ));
            }
        }
        Ok(())
    }

    fn depth_stencil_state(&self, depth_test: bool) -> Option<wgpu::DepthStencilState> {
        if !depth_test {
            return None;
        }
        self.depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        })
    }
}

/// One strategy, ready to record frames.
pub enum RenderPipeline {
    SolidColor(SolidColorPipeline),
    DebugWireframe(DebugPipeline),
    Raster(RasterPipeline),
}

impl RenderPipeline {
    pub fn new(
        kind: PipelineKind,
        context: &GpuContext,
        library: &ShaderLibrary,
        settings: &PipelineSettings,
        scene: &Scene,
    ) -> Result<Self, PipelineError> {
        Ok(match kind {
            PipelineKind::SolidColor => {
                Self::SolidColor(SolidColorPipeline::new(context, library, settings, scene)?)
            }
            PipelineKind::DebugWireframe => {
                Self::DebugWireframe(DebugPipeline::new(context, library, settings, scene)?)
            }
            PipelineKind::Raster => {
                Self::Raster(RasterPipeline::new(context, library, settings, scene)?)
            }
        })
    }

    pub fn kind(&self) -> PipelineKind {
        match self {
            Self::SolidColor(_) => PipelineKind::SolidColor,
            Self::DebugWireframe(_) => PipelineKind::DebugWireframe,
            Self::Raster(_) => PipelineKind::Raster,
        }
    }

    /// Records this frame's pass into `encoder` using the uniforms of
    /// in-flight `slot`.
    pub fn render_frame(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &FrameTarget<'_>,
        scene: &Scene,
        slot: usize,
        load: FrameLoad,
    ) -> Result<(), FrameError> {
        match self {
            Self::SolidColor(p) => p.render_frame(encoder, target, scene, slot, load),
            Self::DebugWireframe(p) => p.render_frame(encoder, target, scene, slot, load),
            Self::Raster(p) => p.render_frame(encoder, target, scene, slot, load),
        }
    }
}

/// Fixed-function state for one compiled pipeline.
pub(crate) struct PipelineDesc<'a> {
    pub label: &'a str,
    pub vertex: &'a str,
    pub fragment: &'a str,
    pub topology: wgpu::PrimitiveTopology,
    pub cull_mode: Option<wgpu::Face>,
    pub polygon_mode: wgpu::PolygonMode,
    pub depth_test: bool,
}

/// Compiles `desc` against the scene's bind-group layout.  Device-side
/// validation failures are captured and returned instead of reaching the
/// uncaptured-error handler.
pub(crate) fn build_pipeline(
    context: &GpuContext,
    library: &ShaderLibrary,
    settings: &PipelineSettings,
    scene: &Scene,
    desc: &PipelineDesc<'_>,
) -> Result<wgpu::RenderPipeline, PipelineError> {
    settings.validate(desc.depth_test)?;

    let vertex = library.lookup(desc.vertex)?;
    let fragment = library.lookup(desc.fragment)?;
    if !vertex.stage.contains(wgpu::ShaderStages::VERTEX) {
        return Err(PipelineError::InvalidSettings(format!(
            "`{}` is not a vertex function",
            desc.vertex
        )));
    }
    if !fragment.stage.contains(wgpu::ShaderStages::FRAGMENT) {
        return Err(PipelineError::InvalidSettings(format!(
            "`{}` is not a fragment function",
            desc.fragment
        )));
    }

    let device = &context.device;
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: &[scene.bind_group_layout()],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &vertex.module,
            entry_point: Some(&vertex.entry_point),
            buffers: &[Vertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &fragment.module,
            entry_point: Some(&fragment.entry_point),
            targets: &[Some(wgpu::ColorTargetState {
                format: settings.color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            polygon_mode: desc.polygon_mode,
            ..Default::default()
        },
        depth_stencil: settings.depth_stencil_state(desc.depth_test),
        multisample: wgpu::MultisampleState {
            count: settings.sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    });

    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(PipelineError::Creation {
            label: desc.label.to_string(),
            reason: err.to_string(),
        });
    }
    log::debug!(
        "built pipeline `{}` ({} + {})",
        desc.label,
        desc.vertex,
        desc.fragment
    );
    Ok(pipeline)
}

/// Opens a render pass over `target`.  Depth is attached only when
/// `depth_test` is set, and cleared only on the frame's first pass.
pub(crate) fn begin_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    target: &FrameTarget<'_>,
    label: &str,
    background: wgpu::Color,
    load: FrameLoad,
    depth_test: bool,
) -> Result<wgpu::RenderPass<'e>, FrameError> {
    let color_load = match load {
        FrameLoad::Clear => wgpu::LoadOp::Clear(background),
        FrameLoad::Load => wgpu::LoadOp::Load,
    };
    let depth = if depth_test {
        Some(target.depth_attachment(load == FrameLoad::Clear).ok_or_else(|| {
            FrameError::Recording(format!("`{label}` needs a depth attachment"))
        })?)
    } else {
        None
    };
    Ok(encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(target.color_attachment(color_load))],
        depth_stencil_attachment: depth,
        timestamp_writes: None,
        occlusion_query_set: None,
    }))
}

/// Binds the scene's slot resources and draws every scene vertex.
pub(crate) fn draw_scene(
    pass: &mut wgpu::RenderPass<'_>,
    pipeline: &wgpu::RenderPipeline,
    scene: &Scene,
    slot: usize,
) -> Result<(), FrameError> {
    let bind_group = scene.bind_group(slot)?;
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.set_vertex_buffer(0, scene.vertex_buffer().slice());
    pass.draw(0..scene.vertex_count() as u32, 0..1);
    Ok(())
}
