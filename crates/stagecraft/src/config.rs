//! Configuration loading and scene settings
//!
//! The [`Config`] trait gives any serde-derived settings struct TOML and RON
//! file round-tripping; [`SceneConfig`] is the scene manager's own knob set.

pub use serde::{Deserialize, Serialize};

use crate::render::Color;
use crate::scene::render_queue::groups;

/// Configuration trait: file loading/saving for serde settings structs
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
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

/// Scene manager settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// When false, every registered node is queued without frustum tests
    pub enable_culling: bool,

    /// Queue group for renderables whose material has no technique
    pub default_render_group: u32,

    /// Name given to the root node
    pub root_name: String,

    /// Clear color for viewports that do not override it
    pub clear_color: Color,

    /// Clear depth for viewports that do not override it
    pub clear_depth: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            enable_culling: true,
            default_render_group: groups::AUTOMATIC,
            root_name: "Root".to_string(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            clear_depth: 1.0,
        }
    }
}

impl Config for SceneConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_culling() {
        let config = SceneConfig::default();
        assert!(config.enable_culling);
        assert_eq!(config.default_render_group, groups::AUTOMATIC);
        assert_eq!(config.root_name, "Root");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: SceneConfig =
            toml::from_str("enable_culling = false").expect("partial config parses");
        assert!(!config.enable_culling);
        assert_eq!(config.root_name, "Root");
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = SceneConfig::default();
        config.default_render_group = groups::TRANSPARENT;
        let text = toml::to_string_pretty(&config).expect("serializes");
        let back: SceneConfig = toml::from_str(&text).expect("parses back");
        assert_eq!(back.default_render_group, groups::TRANSPARENT);
    }
}
