//! Configuration system
//!
//! Settings are plain serde structs with defaults matching the demo's fixed
//! constants, so running without a config file behaves exactly like the
//! hard-coded build.

mod demo;

pub use demo::{
    AssetConfig, CameraConfig, ControlConfig, DemoConfig, InitialScreen, LightingConfig,
    TextConfig, WindowConfig,
};
pub use serde::{Deserialize, Serialize};

use std::path::Path;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Load configuration from file, falling back to defaults
    ///
    /// The failure, if any, is returned instead of logged so the caller can
    /// set up logging from the returned settings first and then hand it to
    /// [`report_load`].
    fn load_with_fallback(path: impl AsRef<Path>) -> (Self, Option<ConfigError>) {
        match Self::load_from_file(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load configuration from file, falling back to defaults and logging why
    fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let (config, error) = Self::load_with_fallback(path);
        report_load(path, error.as_ref());
        config
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Log the outcome of loading `path`
///
/// A missing file is expected (defaults are the shipped behavior); a file
/// that exists but cannot be used is a warning.
pub fn report_load(path: impl AsRef<Path>, error: Option<&ConfigError>) {
    let path = path.as_ref();
    match error {
        None => log::info!("Loaded configuration from {}", path.display()),
        Some(e) if e.is_missing_file() => {
            log::info!("No configuration at {}, using defaults", path.display());
        }
        Some(e) => log::warn!("Ignoring configuration {}: {}", path.display(), e),
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

impl ConfigError {
    /// Whether the file simply does not exist
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
