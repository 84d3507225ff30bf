use std::sync::Arc;

use anyhow::Context as _;
use facet_core::GpuContext;
use facet_renderer::{PipelineSettings, Renderer, RendererError, Scene};
use winit::window::Window;

use crate::builder::{AppConfig, SceneSetup};

/// The window surface and the renderer drawing into it.
pub struct GraphicsState {
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    pub renderer: Renderer,
}

impl GraphicsState {
    pub async fn new(
        window: Arc<Window>,
        app: &AppConfig,
        setup: SceneSetup,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        // owning an Arc<Window> makes the surface 'static
        let surface = instance
            .create_surface(window)
            .context("failed to create window surface")?;

        let mut context = GpuContext::new_with_instance(instance, Some(&surface))
            .await
            .map_err(RendererError::Context)?;
        if let Some(mode) = app.storage_mode.forced() {
            log::info!("storage mode forced to {mode:?}");
            context = context.with_storage_mode(mode);
        }

        let caps = surface.get_capabilities(&context.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .context("surface reports no formats")?;
        let present_mode = if app.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&context.device, &config);

        let sample_count = supported_sample_count(&context, format, app.sample_count);
        let settings = PipelineSettings {
            sample_count,
            color_format: format,
            ..Default::default()
        };

        let scene = Scene::build(&context, setup.camera, setup.shapes, setup.lights)
            .map_err(RendererError::Scene)?;
        let mut renderer = Renderer::new(context, scene, settings, config.width, config.height)?;
        renderer.set_active_pipeline(app.pipeline.into());
        renderer.toggle_phong_shading(app.phong);
        renderer.set_debug_mode(app.debug_overlay);
        renderer.scene_mut().set_material(app.material.into());

        Ok(Self {
            surface,
            config,
            renderer,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface
                .configure(&self.renderer.context().device, &self.config);
            self.renderer.on_resize(width, height);
        }
    }

    /// Draws and presents one frame.  Recoverable surface and frame errors
    /// are logged and the frame is skipped.
    pub fn render(&mut self) -> anyhow::Result<()> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated; reconfiguring");
                self.surface
                    .configure(&self.renderer.context().device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("timed out waiting for the next surface texture");
                return Ok(());
            }
            Err(err) => return Err(err).context("cannot acquire surface texture"),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if let Err(err) = self.renderer.render(Some(&view)) {
            log::error!("frame skipped: {err}");
        }
        frame.present();
        Ok(())
    }
}

/// `requested` if the adapter can multisample `format` that many times,
/// otherwise 1.
fn supported_sample_count(context: &GpuContext, format: wgpu::TextureFormat, requested: u32) -> u32 {
    if requested <= 1 {
        return 1;
    }
    let flags = context.adapter.get_texture_format_features(format).flags;
    if flags.sample_count_supported(requested) {
        requested
    } else {
        log::warn!("{requested}x MSAA unsupported for {format:?}; rendering without it");
        1
    }
}
