//! `facet_renderer`, the GPU side of facet: buffers, scene, pipelines and
//! frame scheduling.
//!
//! # Module layout
//!
//! | Module          | Responsibility                                        |
//! |-----------------|-------------------------------------------------------|
//! | `resources`     | Fixed-capacity `Buffer<T>`, texture helpers           |
//! | `scene`         | Shapes + lights + camera and their GPU buffers        |
//! | `shader`        | Named shader-function lookup over the bundled WGSL    |
//! | `pipeline`      | `SolidColor`, `DebugWireframe`, `Raster` strategies   |
//! | `render_target` | MSAA color, depth and offscreen attachments           |
//! | `scheduler`     | Frames-in-flight semaphore and slot permits           |
//! | `error`         | Error types                                           |

pub mod error;
pub mod pipeline;
pub mod render_target;
pub mod resources;
pub mod scene;
pub mod scheduler;
pub mod shader;

pub use error::{BufferError, FrameError, PipelineError, RendererError, ShaderNotFound};
pub use pipeline::{FrameLoad, PipelineKind, PipelineSettings, RenderPipeline};
pub use render_target::{FrameTarget, RenderTarget};
pub use resources::Buffer;
pub use scene::Scene;
pub use scheduler::{FrameScheduler, MAX_FRAMES_IN_FLIGHT};
pub use shader::ShaderLibrary;

pub use facet_core::context::{GpuContext, StorageMode};
pub use facet_core::{CameraAction, PhongMaterial};

/// Everything a user (or the window shell on their behalf) can ask the
/// renderer to change between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RendererCommand {
    Camera(CameraAction),
    SetActivePipeline(PipelineKind),
    TogglePhongShading(bool),
    SetPhongMaterial(PhongMaterial),
    SetDebugMode(bool),
    Resize { width: u32, height: u32 },
}

/// Owns the scene, one instance of every pipeline and the frame scheduler,
/// and turns them into one submitted command buffer per frame.
///
/// Presentation is left to the caller: after [`Renderer::render`] returns,
/// present the surface texture the frame was drawn into.
pub struct Renderer {
    context: GpuContext,
    scene: Scene,
    target: RenderTarget,
    settings: PipelineSettings,

    solid: RenderPipeline,
    debug: RenderPipeline,
    raster: RenderPipeline,
    active: PipelineKind,
    debug_overlay: bool,

    scheduler: FrameScheduler,
}

impl Renderer {
    /// Renderer drawing into views supplied per frame (a window surface).
    pub fn new(
        context: GpuContext,
        scene: Scene,
        settings: PipelineSettings,
        width: u32,
        height: u32,
    ) -> Result<Self, RendererError> {
        let target = RenderTarget::for_surface(&context.device, width, height, &settings);
        Self::with_target(context, scene, settings, target)
    }

    /// Renderer drawing into its own offscreen texture.
    pub fn headless(
        context: GpuContext,
        scene: Scene,
        settings: PipelineSettings,
        width: u32,
        height: u32,
    ) -> Result<Self, RendererError> {
        let target = RenderTarget::offscreen(&context.device, width, height, &settings);
        Self::with_target(context, scene, settings, target)
    }

    fn with_target(
        context: GpuContext,
        mut scene: Scene,
        settings: PipelineSettings,
        target: RenderTarget,
    ) -> Result<Self, RendererError> {
        let library = ShaderLibrary::new(&context.device);
        let build = |kind| RenderPipeline::new(kind, &context, &library, &settings, &scene);
        let solid = build(PipelineKind::SolidColor)?;
        let debug = build(PipelineKind::DebugWireframe)?;
        let raster = build(PipelineKind::Raster)?;

        scene.resize_viewport(target.width as f32, target.height as f32);
        log::info!(
            "renderer ready: {}x{}, {} sample(s), {:?}",
            target.width,
            target.height,
            settings.sample_count,
            settings.color_format
        );

        Ok(Self {
            context,
            scene,
            target,
            settings,
            solid,
            debug,
            raster,
            active: PipelineKind::SolidColor,
            debug_overlay: false,
            scheduler: FrameScheduler::default(),
        })
    }

    /// Records and submits one frame into `output`, or into the offscreen
    /// texture when `output` is `None`.
    ///
    /// Blocks while [`MAX_FRAMES_IN_FLIGHT`] frames are still on the GPU.  On
    /// error nothing is submitted and the frame slot is returned.
    pub fn render(&mut self, output: Option<&wgpu::TextureView>) -> Result<(), FrameError> {
        let permit = self.scheduler.acquire(&self.context.device);
        let slot = permit.slot();

        self.scene.refresh_uniforms(slot)?;
        self.scene.flush();

        let target = self.target.frame(output)?;
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("facet frame"),
                });

        self.pipeline(self.active)
            .render_frame(&mut encoder, &target, &self.scene, slot, FrameLoad::Clear)?;
        if self.debug_overlay && self.active != PipelineKind::DebugWireframe {
            self.debug
                .render_frame(&mut encoder, &target, &self.scene, slot, FrameLoad::Load)?;
        }

        permit.submit(&self.context.queue, [encoder.finish()]);
        log::trace!("submitted frame in slot {slot}");
        Ok(())
    }

    pub fn apply(&mut self, command: RendererCommand) {
        match command {
            RendererCommand::Camera(action) => self.scene.camera_mut().apply(action),
            RendererCommand::SetActivePipeline(kind) => self.set_active_pipeline(kind),
            RendererCommand::TogglePhongShading(on) => self.toggle_phong_shading(on),
            RendererCommand::SetPhongMaterial(m) => {
                self.set_phong_material(m.ambient, m.diffuse, m.specular, m.shininess)
            }
            RendererCommand::SetDebugMode(on) => self.set_debug_mode(on),
            RendererCommand::Resize { width, height } => self.on_resize(width, height),
        }
    }

    pub fn zoom_camera(&mut self, delta: f32) {
        self.scene.camera_mut().zoom(delta);
    }

    pub fn rotate_camera(&mut self, h: f32, v: f32) {
        self.scene.camera_mut().rotate(h, v);
    }

    pub fn pan_camera(&mut self, h: f32, v: f32) {
        self.scene.camera_mut().pan(h, v);
    }

    pub fn move_camera(&mut self, h: f32, v: f32) {
        self.scene.camera_mut().move_by(h, v);
    }

    pub fn set_active_pipeline(&mut self, kind: PipelineKind) {
        if self.active != kind {
            log::debug!("active pipeline: {kind:?}");
            self.active = kind;
        }
    }

    pub fn active_pipeline(&self) -> PipelineKind {
        self.active
    }

    /// Switches the raster pipeline between Phong and flat shading.
    pub fn toggle_phong_shading(&mut self, enabled: bool) {
        if let RenderPipeline::Raster(raster) = &mut self.raster {
            raster.set_phong_enabled(enabled);
        }
    }

    pub fn phong_enabled(&self) -> bool {
        matches!(&self.raster, RenderPipeline::Raster(r) if r.phong_enabled())
    }

    /// Values outside the supported ranges are clamped.
    pub fn set_phong_material(&mut self, ambient: f32, diffuse: f32, specular: f32, shininess: f32) {
        let material = PhongMaterial::new(ambient, diffuse, specular, shininess).clamped();
        self.scene.set_material(material);
    }

    /// Draws the grid and wireframe on top of the active pipeline.
    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.debug_overlay = enabled;
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_overlay
    }

    /// Resizes the attachments and the camera viewport.  A zero extent (a
    /// minimised window) is ignored.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.target.resize(&self.context.device, width, height);
        self.scene.resize_viewport(width as f32, height as f32);
    }

    /// Blocks until every submitted frame has completed.
    pub fn wait_idle(&self) {
        let _ = self.context.device.poll(wgpu::Maintain::Wait);
    }

    fn pipeline(&self, kind: PipelineKind) -> &RenderPipeline {
        match kind {
            PipelineKind::SolidColor => &self.solid,
            PipelineKind::DebugWireframe => &self.debug,
            PipelineKind::Raster => &self.raster,
        }
    }

    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn frames_in_flight(&self) -> usize {
        self.scheduler.frames_in_flight()
    }
}
