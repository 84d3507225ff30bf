use std::path::Path;

use anyhow::Context as _;
use facet_core::{Camera, Geometry, Light, PhongMaterial, StorageMode};
use facet_renderer::PipelineKind;
use serde::{Deserialize, Serialize};

/// Config file picked up from the working directory when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "facet.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageModeChoice {
    /// Decide from the adapter type.
    #[default]
    Auto,
    Shared,
    Managed,
}

impl StorageModeChoice {
    pub fn forced(self) -> Option<StorageMode> {
        match self {
            Self::Auto => None,
            Self::Shared => Some(StorageMode::Shared),
            Self::Managed => Some(StorageMode::Managed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineChoice {
    #[default]
    Solid,
    Raster,
    Debug,
}

impl From<PipelineChoice> for PipelineKind {
    fn from(choice: PipelineChoice) -> Self {
        match choice {
            PipelineChoice::Solid => PipelineKind::SolidColor,
            PipelineChoice::Raster => PipelineKind::Raster,
            PipelineChoice::Debug => PipelineKind::DebugWireframe,
        }
    }
}

/// Phong coefficients as they appear in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        let m = PhongMaterial::default();
        Self {
            ambient: m.ambient,
            diffuse: m.diffuse,
            specular: m.specular,
            shininess: m.shininess,
        }
    }
}

impl From<MaterialConfig> for PhongMaterial {
    fn from(c: MaterialConfig) -> Self {
        PhongMaterial::new(c.ambient, c.diffuse, c.specular, c.shininess).clamped()
    }
}

/// Window and renderer settings.  Every field is optional in the TOML file.
///
/// ```toml
/// title = "facet"
/// width = 1280
/// height = 720
/// sample_count = 4
/// storage_mode = "managed"
/// pipeline = "raster"
///
/// [material]
/// shininess = 8.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// MSAA samples; lowered to 1 when the surface format can't do it.
    pub sample_count: u32,
    pub storage_mode: StorageModeChoice,
    /// Pipeline active at start-up.
    pub pipeline: PipelineChoice,
    pub phong: bool,
    pub debug_overlay: bool,
    /// Camera units per dragged pixel.
    pub drag_scale: f32,
    pub log_level: String,
    pub material: MaterialConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "facet".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            sample_count: 4,
            storage_mode: StorageModeChoice::Auto,
            pipeline: PipelineChoice::Solid,
            phong: true,
            debug_overlay: false,
            drag_scale: 0.01,
            log_level: "info".to_string(),
            material: MaterialConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid facet configuration")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Loads `path` if given (it must exist), otherwise `facet.toml` when
    /// present, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }
}

/// What to draw: built into a GPU scene once the device exists.
#[derive(Debug, Clone, Default)]
pub struct SceneSetup {
    pub camera: Camera,
    pub shapes: Vec<Geometry>,
    pub lights: Vec<Light>,
}

/// Entry point; configure with the builder methods, then [`App::run`].
pub struct App {
    config: AppConfig,
    scene: SceneSetup,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            scene: SceneSetup::default(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.config.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.config.vsync = vsync;
        self
    }

    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.config.sample_count = sample_count;
        self
    }

    pub fn with_scene(mut self, camera: Camera, shapes: Vec<Geometry>, lights: Vec<Light>) -> Self {
        self.scene = SceneSetup {
            camera,
            shapes,
            lights,
        };
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Runs the event loop until the window closes.
    pub fn run(self) -> anyhow::Result<()> {
        crate::runner::run(self.config, self.scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let cfg = AppConfig::from_toml(
            r#"
            title = "demo"
            sample_count = 1
            storage_mode = "shared"
            pipeline = "raster"

            [material]
            shininess = 99.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.title, "demo");
        assert_eq!(cfg.sample_count, 1);
        assert_eq!(cfg.width, 1280);
        assert_eq!(cfg.storage_mode.forced(), Some(StorageMode::Shared));
        assert_eq!(PipelineKind::from(cfg.pipeline), PipelineKind::Raster);
        assert_eq!(cfg.material.ambient, MaterialConfig::default().ambient);
        // out-of-range values are clamped on the way into the renderer
        assert_eq!(PhongMaterial::from(cfg.material).shininess, 20.0);
    }

    #[test]
    fn unknown_enum_values_are_errors() {
        assert!(AppConfig::from_toml(r#"storage_mode = "sometimes""#).is_err());
    }

    #[test]
    fn missing_named_file_is_an_error() {
        assert!(AppConfig::load_or_default(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }

    #[test]
    fn builder_overrides_config() {
        let app = App::new(AppConfig::default())
            .with_title("t")
            .with_size(640, 480)
            .with_vsync(false)
            .with_sample_count(1);
        let c = app.config();
        assert_eq!((c.title.as_str(), c.width, c.height), ("t", 640, 480));
        assert!(!c.vsync);
        assert_eq!(c.sample_count, 1);
    }
}
