//! Camera capture configuration.
//!
//! The camera is mounted upside-down on the robot chassis, so both
//! flip flags default to on. Resolution is fixed low to keep contour
//! extraction cheap on embedded hardware.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for camera capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Camera device index or identifier.
    pub device_id: u32,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Target frames per second.
    pub fps: u32,
    /// Flip the image vertically (camera mounted inverted).
    pub vflip: bool,
    /// Flip the image horizontally (camera mounted inverted).
    pub hflip: bool,
    /// Settle delay after startup before the first capture, in milliseconds.
    /// The sensor needs time to stabilize exposure after power-on.
    pub settle_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            width: 320,
            height: 240,
            fps: 30,
            vflip: true,
            hflip: true,
            settle_ms: 500,
        }
    }
}

impl CaptureConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    #[error("invalid frame rate (must be 1-120 fps)")]
    InvalidFrameRate,
    #[error("invalid detection parameters")]
    InvalidDetectParams,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub detect: DetectConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Poster detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectConfig {
    /// Minimum contour area in px^2 (strictly greater-than).
    pub min_area: f64,
    /// Lower bound on bounding-box width/height ratio (inclusive).
    pub lower_ratio: f64,
    /// Upper bound on bounding-box width/height ratio (inclusive).
    pub upper_ratio: f64,
    /// Douglas-Peucker epsilon as a fraction of contour perimeter.
    pub eps_scale: f64,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            min_area: 500.0,
            lower_ratio: 0.8,
            upper_ratio: 1.2,
            eps_scale: 0.02,
        }
    }
}

impl DetectConfig {
    /// Validates the detection parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_area < 0.0
            || self.lower_ratio <= 0.0
            || self.upper_ratio < self.lower_ratio
            || self.eps_scale <= 0.0
        {
            return Err(ConfigError::InvalidDetectParams);
        }
        Ok(())
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for numbered stage artifacts (created if absent).
    pub out_dir: PathBuf,
    /// Write a JPEG per pipeline stage for offline debugging.
    pub save_stages: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("output"),
            save_stages: false,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.capture.validate()?;
        config.detect.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = CaptureConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 240);
        assert!(config.vflip && config.hflip);
    }

    #[test]
    fn test_zero_dimensions_invalid() {
        let mut config = CaptureConfig::default();
        config.width = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_detect_ratio_bounds_ordered() {
        let mut config = DetectConfig::default();
        config.upper_ratio = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDetectParams)
        ));
    }

    #[test]
    fn test_file_config_roundtrip() {
        let full = FileConfig::default();
        let text = toml::to_string(&full).unwrap();
        let parsed: FileConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.capture.width, full.capture.width);
        assert_eq!(parsed.detect.min_area, full.detect.min_area);
    }
}
