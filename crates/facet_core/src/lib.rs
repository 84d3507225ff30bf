//! `facet_core`: the CPU-side model of a facet scene.
//!
//! # Module layout
//!
//! | Module      | Responsibility                                            |
//! |-------------|-----------------------------------------------------------|
//! | `color`     | Linear RGB(A) colour used for surfaces, lights and clears |
//! | `transform` | Translate / scale / rotate triple                         |
//! | `vertex`    | GPU vertex record (position, normal, colour)              |
//! | `geometry`  | Closed set of tessellated shapes (quad, cube, …)          |
//! | `scene`     | Camera, lights, Phong material, input controller          |
//! | `context`   | wgpu device/queue bundle (`gpu` feature)                  |
//! | `input`     | Keyboard / pointer state (`input` feature)                |

pub mod color;
pub mod geometry;
pub mod scene;
pub mod transform;
pub mod vertex;

#[cfg(feature = "gpu")]
pub mod context;

#[cfg(feature = "input")]
pub mod input;

pub use color::Color;
pub use geometry::{Cube, Diamond, Geometry, Quad, Sphere};
pub use scene::{
    Camera, CameraAction, CameraProjection, CameraView, Light, PhongMaterial, MAX_ZOOM, MIN_ZOOM,
};
pub use transform::Transform;
pub use vertex::Vertex;

#[cfg(feature = "gpu")]
pub use context::{ContextError, GpuContext, StorageMode};
#[cfg(feature = "input")]
pub use input::{InputState, KeyCode, MouseButton};
#[cfg(feature = "input")]
pub use scene::Controller;

// glam is part of the public API (positions, quaternions, matrices)
pub use glam;
