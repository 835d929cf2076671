//! Camera abstraction for frame capture.
//!
//! This module provides a trait-based abstraction over camera hardware,
//! allowing for both a real camera backend and mock implementations for
//! testing. Capture always returns the most recent frame; there is no
//! buffering or frame queue at this layer.

use super::{frame::CHANNELS, CaptureConfig, Frame};
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera device not found: {0}")]
    DeviceNotFound(String),
    #[error("failed to open camera: {0}")]
    OpenFailed(String),
    #[error("failed to configure camera: {0}")]
    ConfigFailed(String),
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    #[error("camera not initialized")]
    NotInitialized,
}

/// Trait for camera implementations.
///
/// This abstraction allows swapping between real camera hardware and
/// mock implementations. Implementations must honor the configured
/// resolution and flip flags, and must block in `open` for the
/// configured settle delay before the first capture can be served.
pub trait Camera {
    /// Opens and initializes the camera with the given configuration.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError>;

    /// Captures the most recent frame.
    fn capture(&mut self) -> Result<Frame, CameraError>;

    /// Checks if the camera is currently open.
    fn is_open(&self) -> bool;

    /// Closes the camera and releases resources.
    fn close(&mut self);
}

/// Mock camera that serves a fixed synthetic scene.
///
/// By default the scene is a uniform mid-gray field. Tests and demos
/// can inject an arbitrary RGB buffer with [`MockCamera::set_scene`];
/// the configured flip flags are applied on capture, as a real sensor
/// transform would.
#[derive(Debug, Default)]
pub struct MockCamera {
    config: Option<CaptureConfig>,
    scene: Option<Vec<u8>>,
    sequence: u64,
}

impl MockCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock camera that will serve the given RGB scene.
    ///
    /// The buffer length must match the dimensions passed to `open`.
    pub fn with_scene(scene: Vec<u8>) -> Self {
        Self {
            config: None,
            scene: Some(scene),
            sequence: 0,
        }
    }

    /// Replaces the synthetic scene served by subsequent captures.
    pub fn set_scene(&mut self, scene: Vec<u8>) {
        self.scene = Some(scene);
    }
}

impl Camera for MockCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        if let Some(scene) = &self.scene {
            let expected = (config.width * config.height) as usize * CHANNELS;
            if scene.len() != expected {
                return Err(CameraError::ConfigFailed(format!(
                    "scene buffer is {} bytes, expected {}",
                    scene.len(),
                    expected
                )));
            }
        }
        self.config = Some(config.clone());
        self.sequence = 0;
        // A hardware backend sleeps for `settle_ms` here. The mock has no
        // sensor to stabilize, so it returns immediately.
        tracing::info!("MockCamera opened with config: {:?}", config);
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let config = self.config.as_ref().ok_or(CameraError::NotInitialized)?;
        let (w, h) = (config.width as usize, config.height as usize);

        let mut pixels = match &self.scene {
            Some(scene) => scene.clone(),
            None => vec![128u8; w * h * CHANNELS],
        };

        if config.vflip {
            let row_bytes = w * CHANNELS;
            for y in 0..h / 2 {
                let (top, rest) = pixels.split_at_mut((h - 1 - y) * row_bytes);
                top[y * row_bytes..(y + 1) * row_bytes].swap_with_slice(&mut rest[..row_bytes]);
            }
        }
        if config.hflip {
            for y in 0..h {
                let row = &mut pixels[y * w * CHANNELS..(y + 1) * w * CHANNELS];
                for x in 0..w / 2 {
                    for c in 0..CHANNELS {
                        row.swap(x * CHANNELS + c, (w - 1 - x) * CHANNELS + c);
                    }
                }
            }
        }

        self.sequence += 1;
        Ok(Frame::new(pixels, config.width, config.height, self.sequence))
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!("MockCamera closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unflipped() -> CaptureConfig {
        CaptureConfig {
            vflip: false,
            hflip: false,
            ..CaptureConfig::default()
        }
    }

    #[test]
    fn test_mock_camera_lifecycle() {
        let mut camera = MockCamera::new();
        let config = CaptureConfig::default();

        assert!(!camera.is_open());

        camera.open(&config).unwrap();
        assert!(camera.is_open());

        let frame = camera.capture().unwrap();
        assert!(frame.is_valid());
        assert_eq!(frame.sequence(), 1);

        let frame2 = camera.capture().unwrap();
        assert_eq!(frame2.sequence(), 2);

        camera.close();
        assert!(!camera.is_open());
    }

    #[test]
    fn test_capture_without_open() {
        let mut camera = MockCamera::new();
        assert!(matches!(camera.capture(), Err(CameraError::NotInitialized)));
    }

    #[test]
    fn test_scene_size_checked() {
        let mut camera = MockCamera::with_scene(vec![0u8; 12]);
        assert!(matches!(
            camera.open(&CaptureConfig::default()),
            Err(CameraError::ConfigFailed(_))
        ));
    }

    #[test]
    fn test_flips_applied() {
        // 2x2 scene with a single red pixel at (0, 0).
        let mut scene = vec![0u8; 2 * 2 * 3];
        scene[0] = 255;
        let mut camera = MockCamera::with_scene(scene);

        let mut config = unflipped();
        config.width = 2;
        config.height = 2;
        config.vflip = true;
        config.hflip = true;
        camera.open(&config).unwrap();

        // Both flips move the red pixel to (1, 1).
        let frame = camera.capture().unwrap();
        assert_eq!(frame.rgb(1, 1), [255, 0, 0]);
        assert_eq!(frame.rgb(0, 0), [0, 0, 0]);
    }
}
