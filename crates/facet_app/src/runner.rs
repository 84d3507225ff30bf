use std::sync::Arc;

use anyhow::Context as _;
use facet_core::{Controller, InputState, KeyCode};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::bindings::KeyBindings;
use crate::builder::{AppConfig, SceneSetup};
use crate::graphics::GraphicsState;

/// Trackpads report pixels; treat this many as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

struct Runner {
    config: AppConfig,
    setup: Option<SceneSetup>,
    window: Option<Arc<Window>>,
    graphics: Option<GraphicsState>,
    input: InputState,
    bindings: KeyBindings,
    failure: Option<anyhow::Error>,
}

impl Runner {
    fn new(config: AppConfig, setup: SceneSetup) -> Self {
        let controller = Controller::new().with_drag_scale(config.drag_scale);
        let bindings = KeyBindings::new(controller, config.debug_overlay, config.phong);
        Self {
            config,
            setup: Some(setup),
            window: None,
            graphics: None,
            input: InputState::new(),
            bindings,
            failure: None,
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("failed to create window")?,
        );
        let setup = self.setup.take().unwrap_or_default();
        let gfx = pollster::block_on(GraphicsState::new(window.clone(), &self.config, setup))?;

        window.request_redraw();
        self.window = Some(window);
        self.graphics = Some(gfx);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self) -> anyhow::Result<()> {
        let Some(gfx) = &mut self.graphics else {
            return Ok(());
        };
        for command in self.bindings.commands(&mut self.input) {
            log::trace!("{command:?}");
            gfx.renderer.apply(command);
        }
        gfx.render()
    }
}

impl ApplicationHandler for Runner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }
        if let Err(err) = self.init_graphics(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(gfx) = &mut self.graphics {
                    gfx.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if code == KeyCode::Escape && event.state == ElementState::Pressed {
                        event_loop.exit();
                        return;
                    }
                    self.input.update_key(code, event.state.is_pressed());
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.update_mouse_button(button, state.is_pressed());
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.set_mouse_position(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_LINE) as f32,
                };
                self.input.add_scroll(lines);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gfx) = &self.graphics {
            gfx.renderer.wait_idle();
        }
        log::info!("shutting down");
    }
}

pub(crate) fn run(config: AppConfig, setup: SceneSetup) -> anyhow::Result<()> {
    let mut runner = Runner::new(config, setup);
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut runner)?;
    match runner.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
