//! Everything a renderer needs to know about the viewer and the lighting,
//! minus the GPU resources themselves.

pub mod camera;
pub mod light;
pub mod material;

#[cfg(feature = "input")]
pub mod controller;

pub use camera::{Camera, CameraAction, CameraProjection, CameraView, MAX_ZOOM, MIN_ZOOM};
pub use light::Light;
pub use material::PhongMaterial;

#[cfg(feature = "input")]
pub use controller::Controller;
