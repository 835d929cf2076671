//! The four-stage preprocessing pipeline.
//!
//! Capture, detect, rectify, normalize. Data flows strictly forward:
//! each invocation captures exactly one frame and runs the stages to
//! completion or failure before returning. The detected quadrilateral
//! is threaded through the call as a value, never stored, so it cannot
//! go stale across frames.

use crate::capture::{Camera, CameraError, DetectConfig};
use crate::debug::{annotate, DebugSink};
use crate::detect::{preprocess, PosterDetector};
use crate::normalize::{normalize, NormalizedBitmap};
use crate::rectify::rectify;
use thiserror::Error;

/// Errors that abort a pipeline pass.
///
/// Perception misses are *not* errors; they surface as `Ok(None)` from
/// [`Pipeline::process`] and the caller retries on the next frame.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("camera failure: {0}")]
    Camera(#[from] CameraError),
}

/// Single-owner preprocessing pipeline.
///
/// Holds the detector and the optional debug sink. Frame access is
/// serialized by construction: `process` takes the camera by `&mut`,
/// so only one call site can drive a given camera at a time.
pub struct Pipeline {
    detector: PosterDetector,
    sink: Option<DebugSink>,
}

impl Pipeline {
    /// Creates a pipeline with the given detection parameters.
    pub fn new(params: DetectConfig) -> Self {
        Self {
            detector: PosterDetector::new(params),
            sink: None,
        }
    }

    /// Attaches a debug sink; every stage is then persisted as a JPEG.
    pub fn with_debug_sink(mut self, sink: DebugSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Runs one full pass: capture, detect, rectify, normalize.
    ///
    /// Returns `Ok(None)` on any transient perception failure (no
    /// poster, degenerate geometry, flat contrast). Only camera faults
    /// propagate as errors.
    pub fn process(
        &mut self,
        camera: &mut dyn Camera,
    ) -> Result<Option<NormalizedBitmap>, PipelineError> {
        if let Some(sink) = &mut self.sink {
            sink.next_pass();
        }

        let frame = camera.capture()?;
        if let Some(sink) = &self.sink {
            sink.save_frame("01_raw_frame", &frame);
        }

        let pre = preprocess(&frame);
        if let Some(sink) = &self.sink {
            sink.save_plane("02_gray_frame", &pre.gray);
            sink.save_plane("03_thresholded_frame", &pre.binary);
        }

        let Some(quad) = self.detector.detect(&pre.binary) else {
            tracing::debug!(sequence = frame.sequence(), "no poster in frame");
            return Ok(None);
        };
        if let Some(sink) = &self.sink {
            sink.save_frame("04_labeled_frame", &annotate(&frame, &quad));
        }

        let rectified = match rectify(&frame, &quad) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(sequence = frame.sequence(), error = %e, "rectification failed");
                return Ok(None);
            }
        };
        if let Some(sink) = &self.sink {
            sink.save_plane("05_flattened_frame", &rectified.canvas);
            sink.save_bitmap("06_cropped_frame", &rectified.bitmap);
        }

        let bitmap = match normalize(&rectified.bitmap) {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!(sequence = frame.sequence(), error = %e, "normalization failed");
                return Ok(None);
            }
        };
        if let Some(sink) = &self.sink {
            sink.save_normalized("08_bordered_frame", &bitmap);
        }

        tracing::debug!(sequence = frame.sequence(), "poster preprocessed");
        Ok(Some(bitmap))
    }
}
