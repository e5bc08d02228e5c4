//! Configuration file support for docstamp.
//!
//! This module provides serialization and deserialization of the editor
//! settings: zoom limits, placement defaults, QR options and log verbosity.

use serde::{Deserialize, Serialize};

use crate::collaborators::EcLevel;
use crate::constants::{
    DEFAULT_PLACEMENT, DEFAULT_QR_SIZE, DEFAULT_QR_TEXT, DEFAULT_SIGNATURE_SIZE, QR_GENERATE_SIZE,
};
use crate::model::{AnnotationKind, DocPoint, DocSize};
use crate::render::DecodeMode;
use crate::transform::ScaleBounds;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Editor configuration that can be exported and imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,
}

/// User preferences section of the config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Zoom when a document is opened
    #[serde(default = "default_initial_scale")]
    pub initial_scale: f32,

    /// Zoom limits and step
    #[serde(default)]
    pub scale_bounds: ScaleBounds,

    /// Where payload decoding runs
    #[serde(default)]
    pub decode_mode: DecodeMode,

    /// Where new annotations are placed (document units)
    #[serde(default = "default_placement")]
    pub default_placement: [f32; 2],

    /// Size of new signature annotations (document units)
    #[serde(default = "default_signature_size")]
    pub signature_size: [f32; 2],

    /// Size of new QR code annotations (document units)
    #[serde(default = "default_qr_size")]
    pub qr_size: [f32; 2],

    /// Text prefilled into the QR input
    #[serde(default = "default_qr_text")]
    pub qr_text: String,

    /// Pixel size QR symbols are generated at
    #[serde(default = "default_qr_pixels")]
    pub qr_pixels: u32,

    /// QR error correction level
    #[serde(default)]
    pub qr_error_correction: EcLevel,
}

fn default_initial_scale() -> f32 {
    1.0
}

fn default_placement() -> [f32; 2] {
    [DEFAULT_PLACEMENT.0, DEFAULT_PLACEMENT.1]
}

fn default_signature_size() -> [f32; 2] {
    [DEFAULT_SIGNATURE_SIZE.0, DEFAULT_SIGNATURE_SIZE.1]
}

fn default_qr_size() -> [f32; 2] {
    [DEFAULT_QR_SIZE.0, DEFAULT_QR_SIZE.1]
}

fn default_qr_text() -> String {
    DEFAULT_QR_TEXT.to_string()
}

fn default_qr_pixels() -> u32 {
    QR_GENERATE_SIZE
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            initial_scale: default_initial_scale(),
            scale_bounds: ScaleBounds::default(),
            decode_mode: DecodeMode::default(),
            default_placement: default_placement(),
            signature_size: default_signature_size(),
            qr_size: default_qr_size(),
            qr_text: default_qr_text(),
            qr_pixels: default_qr_pixels(),
            qr_error_correction: EcLevel::default(),
        }
    }
}

impl UserPreferences {
    pub fn placement(&self) -> DocPoint {
        DocPoint::new(self.default_placement[0], self.default_placement[1])
    }

    /// Size new annotations of `kind` are created with.
    pub fn size_for(&self, kind: AnnotationKind) -> DocSize {
        let [w, h] = match kind {
            AnnotationKind::Signature => self.signature_size,
            AnnotationKind::QrCode => self.qr_size,
        };
        DocSize::new(w, h)
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: UserPreferences::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        let bounds = &config.preferences.scale_bounds;
        if !(bounds.min > 0.0 && bounds.min <= bounds.max && bounds.step > 0.0) {
            return Err(ConfigError::InvalidScaleBounds {
                min: bounds.min,
                max: bounds.max,
                step: bounds.step,
            });
        }

        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "docstamp-config.json"
    }

    /// Get the default config file path for auto-load/save.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("docstamp").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("docstamp")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories as needed.
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save(&path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// Zoom limits that cannot be used
    #[error("Invalid scale bounds: min {min}, max {max}, step {step}")]
    InvalidScaleBounds { min: f32, max: f32, step: f32 },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::new();
        let prefs = &config.preferences;
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(prefs.placement(), DocPoint::new(50.0, 50.0));
        assert_eq!(prefs.size_for(AnnotationKind::Signature), DocSize::new(200.0, 100.0));
        assert_eq!(prefs.size_for(AnnotationKind::QrCode), DocSize::new(100.0, 100.0));
        assert_eq!(prefs.qr_text, "https://example.com");
        assert_eq!(prefs.qr_error_correction, EcLevel::L);
        assert_eq!(prefs.scale_bounds, ScaleBounds::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = AppConfig::new();
        config.preferences.log_level = LogLevel::Debug;
        config.preferences.decode_mode = DecodeMode::Background;
        config.preferences.qr_text = "hello".to_string();

        let json = config.to_json().unwrap();
        assert!(json.contains("\"debug\""));
        assert!(json.contains("\"background\""));

        let loaded = AppConfig::from_json(&json).unwrap();
        assert_eq!(loaded.preferences.log_level, LogLevel::Debug);
        assert_eq!(loaded.preferences.decode_mode, DecodeMode::Background);
        assert_eq!(loaded.preferences.qr_text, "hello");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let json = r#"{ "version": 1, "preferences": { "initial_scale": 1.5 } }"#;
        let config = AppConfig::from_json(json).unwrap();
        assert_eq!(config.preferences.initial_scale, 1.5);
        assert_eq!(config.preferences.qr_pixels, 100);
        assert_eq!(config.preferences.signature_size, [200.0, 100.0]);

        let config = AppConfig::from_json(r#"{ "version": 1 }"#).unwrap();
        assert_eq!(config.preferences.initial_scale, 1.0);
    }

    #[test]
    fn test_version_too_new() {
        let err = AppConfig::from_json(r#"{ "version": 99 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::VersionTooNew {
                file_version: 99,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_scale_bounds() {
        let json = r#"{ "version": 1, "preferences": { "scale_bounds": { "min": 2.0, "max": 1.0, "step": 0.1 } } }"#;
        assert!(matches!(
            AppConfig::from_json(json),
            Err(ConfigError::InvalidScaleBounds { .. })
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(AppConfig::default_filename());

        let mut config = AppConfig::new();
        config.preferences.initial_scale = 0.8;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.preferences.initial_scale, 0.8);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
