//! Named shader-function lookup.
//!
//! Pipelines never touch WGSL source directly; they ask the library for a
//! function by name.  The built-in names all live in `shaders/scene.wgsl`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ShaderNotFound;

pub const VERTEX_DEFAULT: &str = "vertex_default";
pub const VERTEX_INFINITE_GRID: &str = "vertex_infinite_grid";
pub const FRAG_SOLID_COLOR: &str = "frag_solid_color";
pub const FRAG_SOLID_RED_COLOR: &str = "frag_solid_red_color";
pub const FRAG_PHONG: &str = "frag_phong";

/// An entry point inside a compiled module.
#[derive(Debug, Clone)]
pub struct ShaderFunction {
    pub module: Arc<wgpu::ShaderModule>,
    pub entry_point: String,
    pub stage: wgpu::ShaderStages,
}

pub struct ShaderLibrary {
    functions: HashMap<String, ShaderFunction>,
}

impl ShaderLibrary {
    /// Compiles the bundled scene shader and registers its entry points.
    pub fn new(device: &wgpu::Device) -> Self {
        let module = Arc::new(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("facet scene shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        }));

        let mut library = Self::empty();
        for name in [VERTEX_DEFAULT, VERTEX_INFINITE_GRID] {
            library.register(name, module.clone(), name, wgpu::ShaderStages::VERTEX);
        }
        for name in [FRAG_SOLID_COLOR, FRAG_SOLID_RED_COLOR, FRAG_PHONG] {
            library.register(name, module.clone(), name, wgpu::ShaderStages::FRAGMENT);
        }
        log::debug!("shader library ready with {} functions", library.functions.len());
        library
    }

    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Adds (or replaces) `name`.
    pub fn register(
        &mut self,
        name: &str,
        module: Arc<wgpu::ShaderModule>,
        entry_point: &str,
        stage: wgpu::ShaderStages,
    ) {
        self.functions.insert(
            name.to_string(),
            ShaderFunction {
                module,
                entry_point: entry_point.to_string(),
                stage,
            },
        );
    }

    pub fn lookup(&self, name: &str) -> Result<ShaderFunction, ShaderNotFound> {
        self.functions
            .get(name)
            .cloned()
            .ok_or_else(|| ShaderNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}
