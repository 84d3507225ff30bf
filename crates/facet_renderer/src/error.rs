//! Error types for every fallible renderer operation.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The device refused (or could not satisfy) the allocation.
    #[error("failed to allocate buffer `{label}` ({bytes} bytes): {reason}")]
    Allocation {
        label: String,
        bytes: u64,
        reason: String,
    },
    /// A write would have ended past the fixed capacity.  Nothing was
    /// written.
    #[error("write of {len} element(s) at offset {offset} exceeds capacity {capacity}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("shader function `{0}` is not in the library")]
pub struct ShaderNotFound(pub String);

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    ShaderNotFound(#[from] ShaderNotFound),
    #[error("device rejected pipeline `{label}`: {reason}")]
    Creation { label: String, reason: String },
    #[error("invalid pipeline settings: {0}")]
    InvalidSettings(String),
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Per-frame failure.  The frame is abandoned; the next one may succeed.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error("failed to record frame: {0}")]
    Recording(String),
}

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("GPU context: {0}")]
    Context(#[source] anyhow::Error),
    #[error("scene construction failed")]
    Scene(#[source] BufferError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
