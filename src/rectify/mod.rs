//! Perspective rectification.
//!
//! Maps the four corners of a detected poster onto a canonical 28x28
//! square. The binary image is re-derived from the original color
//! frame (not reused from detection), warped through the computed
//! transform onto a frame-sized canvas, and cropped to the top-left
//! 28x28 region the transform was designed to fill.

mod corners;
mod homography;
mod warp;

pub use corners::order_corners;
pub use homography::perspective_from_corners;
pub use warp::warp;

use crate::capture::Frame;
use crate::detect::{preprocess, Plane, Quad};
use thiserror::Error;

/// Side length of the rectified bitmap, matching the classifier input.
pub const BITMAP_SIZE: usize = 28;

/// Errors that can occur during rectification.
///
/// All variants are transient perception failures: the caller drops
/// the frame and retries on the next one.
#[derive(Debug, Error)]
pub enum RectifyError {
    #[error("quadrilateral is degenerate (collinear corners)")]
    DegenerateQuad,
    #[error("frame {0}x{1} is smaller than the {BITMAP_SIZE}x{BITMAP_SIZE} crop")]
    CanvasTooSmall(usize, usize),
}

/// A fixed 28x28 single-channel bitmap cropped from the warp canvas.
#[derive(Clone)]
pub struct Bitmap28 {
    data: [u8; BITMAP_SIZE * BITMAP_SIZE],
}

impl Bitmap28 {
    /// Builds a bitmap from a raw row-major buffer.
    pub fn from_raw(data: [u8; BITMAP_SIZE * BITMAP_SIZE]) -> Self {
        Self { data }
    }

    /// Crops the top-left 28x28 region of a larger plane.
    pub fn crop_from(canvas: &Plane) -> Result<Self, RectifyError> {
        if canvas.w < BITMAP_SIZE || canvas.h < BITMAP_SIZE {
            return Err(RectifyError::CanvasTooSmall(canvas.w, canvas.h));
        }
        let mut data = [0u8; BITMAP_SIZE * BITMAP_SIZE];
        for y in 0..BITMAP_SIZE {
            for x in 0..BITMAP_SIZE {
                data[y * BITMAP_SIZE + x] = canvas.get(x, y);
            }
        }
        Ok(Self { data })
    }

    /// Gets the pixel value at (x, y).
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * BITMAP_SIZE + x]
    }

    /// Returns the raw row-major pixel buffer.
    #[inline]
    pub fn as_raw(&self) -> &[u8; BITMAP_SIZE * BITMAP_SIZE] {
        &self.data
    }
}

impl std::fmt::Debug for Bitmap28 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap28")
            .field("nonzero", &self.data.iter().filter(|&&v| v > 0).count())
            .finish()
    }
}

/// Result of rectifying one frame.
pub struct Rectification {
    /// Full warped binary canvas (frame-sized), kept for debug dumps.
    pub canvas: Plane,
    /// The cropped 28x28 bitmap handed to normalization.
    pub bitmap: Bitmap28,
}

/// Rectifies the poster region of `frame` described by `quad`.
pub fn rectify(frame: &Frame, quad: &Quad) -> Result<Rectification, RectifyError> {
    let ordered = order_corners(quad);
    let transform = perspective_from_corners(&ordered)?;
    let binary = preprocess(frame).binary;
    let canvas = warp(&binary, &transform, binary.w, binary.h)?;
    let bitmap = Bitmap28::crop_from(&canvas)?;
    Ok(Rectification { canvas, bitmap })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::Point2i;

    #[test]
    fn test_crop_too_small() {
        let plane = Plane::new(10, 10);
        assert!(matches!(
            Bitmap28::crop_from(&plane),
            Err(RectifyError::CanvasTooSmall(10, 10))
        ));
    }

    #[test]
    fn test_crop_takes_top_left() {
        let mut plane = Plane::new(40, 40);
        plane.set(0, 0, 11);
        plane.set(27, 27, 22);
        plane.set(28, 28, 33); // outside the crop
        let bitmap = Bitmap28::crop_from(&plane).unwrap();
        assert_eq!(bitmap.get(0, 0), 11);
        assert_eq!(bitmap.get(27, 27), 22);
        assert_eq!(bitmap.as_raw().iter().filter(|&&v| v > 0).count(), 2);
    }

    #[test]
    fn test_collinear_corners_fail() {
        let quad = Quad {
            corners: [
                Point2i::new(0, 0),
                Point2i::new(10, 0),
                Point2i::new(20, 0),
                Point2i::new(30, 0),
            ],
        };
        let frame = Frame::new(vec![255; 320 * 240 * 3], 320, 240, 0);
        assert!(matches!(
            rectify(&frame, &quad),
            Err(RectifyError::DegenerateQuad)
        ));
    }
}
