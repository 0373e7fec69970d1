//! Demo settings
//!
//! Every section defaults to the values the demo has always shipped with.

use serde::{Deserialize, Serialize};

use super::Config;

/// Window and viewport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial width in pixels
    pub width: u32,
    /// Initial height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Raumschiff".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Asset locations, read once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// OBJ model to display on the game screen
    pub mesh_path: String,
    /// Monospace font for the glyph cache
    pub font_path: String,
    /// Text shown on the lore screen
    pub lore_path: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            mesh_path: "resources/models/Spaceship2.obj".to_string(),
            font_path: "resources/fonts/DejaVuSansMono.ttf".to_string(),
            lore_path: "resources/text/lore.txt".to_string(),
        }
    }
}

/// Fixed camera parameters for the game screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera position; the camera does not follow the model
    pub offset: [f32; 3],
    /// Up vector of the view
    pub up: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: [30.0, 30.0, 30.0],
            up: [0.0, 0.0, 1.0],
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Light and material uniforms for the lit mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// World-space light position
    pub light_position: [f32; 3],
    /// Light color
    pub light_color: [f32; 3],
    /// Flat object color
    pub object_color: [f32; 3],
    /// Background clear color
    pub clear_color: [f32; 4],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            light_position: [50.0, 50.0, 50.0],
            light_color: [1.0, 1.0, 1.0],
            object_color: [0.6, 0.6, 0.6],
            clear_color: [0.1, 0.1, 0.1, 1.0],
        }
    }
}

/// Per-frame input increments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Translation per frame while an arrow key is held
    pub movement_speed: f32,
    /// Yaw change in radians per frame while a rotate key is held
    pub rotation_speed: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            movement_speed: 0.05,
            rotation_speed: 0.01,
        }
    }
}

/// Text rendering and screen text settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Pixel height glyphs are rasterized at
    pub pixel_size: f32,
    /// Title drawn on the start screen
    pub title: String,
    /// Seconds between two revealed lore characters
    pub reveal_interval: f32,
    /// Scale of the lore text
    pub lore_scale: f32,
    /// Text color
    pub color: [f32; 3],
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            pixel_size: 48.0,
            title: "Raumschiff".to_string(),
            reveal_interval: 0.05,
            lore_scale: 0.5,
            color: [1.0, 1.0, 1.0],
        }
    }
}

/// Which screen the demo opens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialScreen {
    /// Pulsing title
    #[default]
    Start,
    /// Progressive lore text
    Lore,
}

/// Top-level demo configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,
    /// Screen shown first
    pub initial_screen: InitialScreen,
    /// Window settings
    pub window: WindowConfig,
    /// Asset paths
    pub assets: AssetConfig,
    /// Camera settings
    pub camera: CameraConfig,
    /// Lighting settings
    pub lighting: LightingConfig,
    /// Input settings
    pub controls: ControlConfig,
    /// Text settings
    pub text: TextConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            initial_screen: InitialScreen::default(),
            window: WindowConfig::default(),
            assets: AssetConfig::default(),
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            controls: ControlConfig::default(),
            text: TextConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err("Window dimensions must be non-zero".to_string());
        }
        if self.camera.near <= 0.0 || self.camera.far <= self.camera.near {
            return Err("Camera clip planes must satisfy 0 < near < far".to_string());
        }
        if self.text.reveal_interval <= 0.0 {
            return Err("Reveal interval must be positive".to_string());
        }
        Ok(())
    }
}

impl Config for DemoConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_defaults_match_shipped_constants() {
        let config = DemoConfig::default();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.camera.offset, [30.0, 30.0, 30.0]);
        assert_eq!(config.camera.fov_y_degrees, 45.0);
        assert_eq!(config.initial_screen, InitialScreen::Start);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: DemoConfig = toml::from_str(
            r#"
            initial_screen = "lore"

            [window]
            width = 1024
            "#,
        )
        .unwrap();

        assert_eq!(config.initial_screen, InitialScreen::Lore);
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.lighting, LightingConfig::default());
    }

    #[test]
    fn test_ron_round_trip() {
        let mut config = DemoConfig::default();
        config.controls.movement_speed = 0.2;

        let text = ron::to_string(&config).unwrap();
        let parsed: DemoConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = DemoConfig::load_or_default("definitely/not/here.toml");
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn test_missing_file_is_not_a_warning() {
        let (config, error) = DemoConfig::load_with_fallback("definitely/not/here.toml");
        assert_eq!(config, DemoConfig::default());
        assert!(error.is_some_and(|e| e.is_missing_file()));
    }

    #[test]
    fn test_malformed_file_is_reported_with_defaults() {
        let path = std::env::temp_dir().join("raumschiff_malformed_config_test.toml");
        std::fs::write(&path, "[window]\nwidth = \"wide\"\n").unwrap();
        let (config, error) = DemoConfig::load_with_fallback(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(config, DemoConfig::default());
        let error = error.expect("malformed file must be reported");
        assert!(matches!(error, ConfigError::Parse(_)));
        assert!(!error.is_missing_file());
    }

    #[test]
    fn test_valid_file_has_nothing_to_report() {
        let path = std::env::temp_dir().join("raumschiff_valid_config_test.toml");
        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();
        let (config, error) = DemoConfig::load_with_fallback(&path);
        let _ = std::fs::remove_file(&path);

        assert!(error.is_none());
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let path = std::env::temp_dir().join("raumschiff_config_test.ini");
        std::fs::write(&path, "width = 1").unwrap();
        let result = DemoConfig::load_from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_validate_rejects_bad_clip_planes() {
        let mut config = DemoConfig::default();
        config.camera.far = 0.01;
        assert!(config.validate().is_err());
    }
}
