//! Camera input and frame handling.
//!
//! This module provides abstractions for capturing frames from the
//! robot's camera and managing camera configuration. The camera is
//! treated as a source of raw color frames; all interpretation of the
//! frame content happens downstream in the detection pipeline.

mod camera;
mod config;
mod frame;

pub use camera::{Camera, CameraError, MockCamera};
pub use config::{CaptureConfig, ConfigError, DetectConfig, FileConfig, OutputConfig};
pub use frame::Frame;
