//! Configuration system
//!
//! File-backed settings for the runtime. Any `Serialize + Deserialize +
//! Default` type can opt into [`Config`] and be read from or written to TOML
//! or RON, chosen by file extension.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match extension_of(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension_of(path) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Parse configuration from an in-memory TOML document
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Scene name a fresh [`SceneManager`](crate::scene::SceneManager) creates and selects
pub const DEFAULT_SCENE_NAME: &str = "default scene";

/// Name given to a scene whose name is set to the empty string
pub const FALLBACK_SCENE_NAME: &str = "Scene";

/// Name given to entities created without one
pub const FALLBACK_ENTITY_NAME: &str = "GameObject";

/// Runtime configuration shared by the scene manager and the frame driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Default log filter (overridden by `RUST_LOG`)
    pub log_filter: String,
    /// Name of the scene created on startup
    pub default_scene_name: String,
    /// Name used when a scene is renamed to the empty string
    pub fallback_scene_name: String,
    /// Name used for entities created without a name
    pub fallback_entity_name: String,
    /// Frame loop settings
    pub frame: FrameConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_filter: crate::foundation::logging::DEFAULT_FILTER.to_string(),
            default_scene_name: DEFAULT_SCENE_NAME.to_string(),
            fallback_scene_name: FALLBACK_SCENE_NAME.to_string(),
            fallback_entity_name: FALLBACK_ENTITY_NAME.to_string(),
            frame: FrameConfig::default(),
        }
    }
}

impl Config for RuntimeConfig {}

/// Frame loop settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Constant delta time per frame in seconds; wall-clock time when unset
    pub fixed_delta_time: Option<f32>,
    /// Stop after this many frames; run until stopped when unset
    pub max_frames: Option<u64>,
}
