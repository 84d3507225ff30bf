use std::sync::Arc;

use anyhow::Context as _;
use thiserror::Error;

/// How host writes reach GPU-visible memory.
///
/// `Shared` stands for unified memory: every write is uploaded as soon as it
/// happens.  `Managed` stands for a discrete GPU: writes collect in a host
/// mirror and the dirty range is uploaded by an explicit flush before the
/// next submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Shared,
    Managed,
}

impl StorageMode {
    /// Unified-memory adapters get `Shared`, everything else `Managed`.
    pub fn for_device_type(device_type: wgpu::DeviceType) -> Self {
        match device_type {
            wgpu::DeviceType::IntegratedGpu | wgpu::DeviceType::Cpu => StorageMode::Shared,
            _ => StorageMode::Managed,
        }
    }
}

/// The wgpu objects every part of the renderer shares.
///
/// `Device` and `Queue` are behind `Arc` because frame-completion callbacks
/// and the window surface hold on to them independently of the renderer.
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    storage_mode: StorageMode,
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("no suitable GPU adapter found")]
    AdapterUnavailable,
    #[error("device request failed: {0}")]
    DeviceRequest(String),
}

impl GpuContext {
    /// Headless context with no surface, for tests and offscreen frames.
    pub async fn new() -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        Self::new_with_instance(instance, None).await
    }

    /// Builds a context from an existing `Instance`, optionally requiring the
    /// adapter to be able to present to `compatible_surface`.
    pub async fn new_with_instance(
        instance: wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> anyhow::Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .context(ContextError::AdapterUnavailable)?;

        let info = adapter.get_info();
        log::info!(
            "selected adapter: {} ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );

        // wireframe rendering is optional; ask for it only when offered
        let required_features = adapter.features() & wgpu::Features::POLYGON_MODE_LINE;
        if required_features.is_empty() {
            log::warn!("adapter lacks POLYGON_MODE_LINE; wireframes will be filled");
        }

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("facet device"),
                    required_features,
                    required_limits: adapter.limits(),
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| ContextError::DeviceRequest(e.to_string()))?;

        device.on_uncaptured_error(Box::new(|err| {
            log::error!("uncaptured GPU error: {err}");
        }));

        let storage_mode = StorageMode::for_device_type(info.device_type);
        log::debug!("buffer storage mode: {storage_mode:?}");

        Ok(Self {
            instance,
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
            storage_mode,
        })
    }

    /// Overrides the storage mode picked from the adapter type.
    pub fn with_storage_mode(mut self, mode: StorageMode) -> Self {
        self.storage_mode = mode;
        self
    }

    #[inline]
    pub fn storage_mode(&self) -> StorageMode {
        self.storage_mode
    }

    /// True when the device can rasterise polygons as lines.
    pub fn supports_wireframe(&self) -> bool {
        self.device
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE)
    }
}
