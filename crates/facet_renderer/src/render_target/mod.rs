//! Attachments a frame is drawn into.
//!
//! [`RenderTarget`] owns the textures the renderer itself needs (the MSAA
//! color buffer, the depth buffer and, when rendering offscreen, the output
//! texture).  [`FrameTarget`] is the borrowed per-frame view of them that
//! pipelines record against.

pub mod color;
pub mod depth;
pub mod target;

pub use color::ColorTarget;
pub use depth::DepthTarget;
pub use target::{FrameTarget, RenderTarget};
