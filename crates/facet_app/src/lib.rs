//! Window shell for facet: opens a winit window, wires its surface into a
//! [`facet_renderer::Renderer`] and turns pointer/keyboard input into
//! renderer commands.
//!
//! ```rust,ignore
//! use facet_app::{App, AppConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load_or_default(None)?;
//!     facet_app::logging::init(&config.log_level)?;
//!     App::new(config)
//!         .with_title("facet")
//!         .with_scene(camera, shapes, lights)
//!         .run()
//! }
//! ```

pub mod bindings;
pub mod builder;
mod graphics;
pub mod logging;
mod runner;

pub use bindings::KeyBindings;
pub use builder::{App, AppConfig, MaterialConfig, PipelineChoice, SceneSetup, StorageModeChoice};

pub use facet_core::{
    Camera, Color, Cube, Diamond, Geometry, Light, PhongMaterial, Quad, Sphere, Transform,
};
pub use facet_core::glam::{Quat, Vec3};
