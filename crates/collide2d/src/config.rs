//! Configuration system
//!
//! Broad-phase tuning parameters with RON and TOML file support, so games
//! can ship spatial-index settings alongside their other data files.

use serde::{Deserialize, Serialize};

use crate::spatial::QuadTreeConfig;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
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

/// Broad-phase tuning parameters
///
/// Cell size should roughly match typical actor size; quad-tree parameters
/// trade memory for query depth. Loadable from `.ron` or `.toml` files via
/// the [`Config`] trait.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadphaseConfig {
    /// Spatial hash cell size in world units
    pub cell_size: f32,

    /// Quad-tree subdivision parameters
    pub quadtree: QuadTreeConfig,
}

impl Default for BroadphaseConfig {
    fn default() -> Self {
        Self {
            cell_size: 64.0,
            quadtree: QuadTreeConfig::default(),
        }
    }
}

impl Config for BroadphaseConfig {}
