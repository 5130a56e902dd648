//! Configuration management for CrabShot
//!
//! Controls where captured photos are written, how the orientation tag is
//! looked up, and whether and how depth variability is evaluated.

use crate::errors::CaptureError;
use crate::orientation::ORIENTATION_KEY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrabShotConfig {
    pub capture: CaptureConfig,
    pub depth: DepthConfig,
}

/// Photo output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Directory captured photos are written to
    pub output_directory: PathBuf,
    /// File name prefix, followed by a random UUID
    pub file_prefix: String,
    /// Extension for processed photos
    pub file_extension: String,
    /// Extension for raw photos
    pub raw_file_extension: String,
    /// Metadata dictionary key holding the EXIF orientation
    pub orientation_key: String,
}

/// Depth variability configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthConfig {
    /// Compute depth variance when a capture carries depth data
    pub enabled: bool,
    /// Variability at or below which a scene counts as flat
    pub flat_scene_threshold: f32,
    /// Variability at or above which a scene counts as deep
    pub deep_scene_threshold: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            output_directory: std::env::temp_dir().join("crabshot"),
            file_prefix: "photo".to_string(),
            file_extension: "jpg".to_string(),
            raw_file_extension: "dng".to_string(),
            orientation_key: ORIENTATION_KEY.to_string(),
        }
    }
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            flat_scene_threshold: 0.05,
            deep_scene_threshold: 0.5,
        }
    }
}

impl Default for CrabShotConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            depth: DepthConfig::default(),
        }
    }
}

impl CrabShotConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CaptureError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| CaptureError::Config(format!("Failed to read config file: {}", e)))?;

        let config: CrabShotConfig = toml::from_str(&contents)
            .map_err(|e| CaptureError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate().map_err(CaptureError::Config)?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CaptureError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CaptureError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| CaptureError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| CaptureError::Config(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("crabshot.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.capture.file_prefix.is_empty() {
            return Err("File prefix must not be empty".to_string());
        }
        for ext in [&self.capture.file_extension, &self.capture.raw_file_extension] {
            if ext.is_empty() || ext.contains(['.', '/', '\\']) {
                return Err(format!("Invalid file extension: {:?}", ext));
            }
        }
        if self.capture.orientation_key.is_empty() {
            return Err("Orientation metadata key must not be empty".to_string());
        }

        let flat = self.depth.flat_scene_threshold;
        let deep = self.depth.deep_scene_threshold;
        if !flat.is_finite() || flat < 0.0 {
            return Err("Flat scene threshold must be a non-negative number".to_string());
        }
        if !deep.is_finite() || deep <= flat {
            return Err("Deep scene threshold must exceed the flat scene threshold".to_string());
        }

        Ok(())
    }
}
