pub mod buffer;
pub mod texture;

pub use buffer::{Buffer, HostMirror};
pub use texture::RenderTextureDesc;
