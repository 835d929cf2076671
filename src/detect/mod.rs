//! Poster detection.
//!
//! This module locates the best candidate quadrilateral ("poster") in a
//! captured frame. The stages mirror the classic marker-detection
//! recipe: grayscale conversion, median blur, adaptive binarization,
//! border following, and polygon approximation with geometric
//! filtering.
//!
//! Detection is stateless: the winning quadrilateral is returned to the
//! caller rather than stored, so a stale result can never leak into a
//! later frame where detection failed.

mod contour;
mod detector;
mod filter;
mod plane;
mod polygon;
mod threshold;

pub use contour::{find_contours, Contour};
pub use detector::{PosterDetector, Quad};
pub use filter::median3;
pub use plane::{rgb_to_gray, Plane};
pub use polygon::approx_polygon;
pub use threshold::{adaptive_threshold, ADAPTIVE_BLOCK, ADAPTIVE_C};

use crate::capture::Frame;
use nalgebra::Vector2;

/// 2D point in integer pixel coordinates.
pub type Point2i = Vector2<i32>;

/// 2D point with floating point precision.
pub type Point2f = Vector2<f64>;

/// Grayscale and binarized views of a frame.
///
/// The binary image is edge-friendly rather than region-friendly: flat
/// areas threshold to white, only locations where the local mean shifts
/// (edges, strokes) come out black.
pub struct Preprocessed {
    /// Grayscale conversion of the input frame.
    pub gray: Plane,
    /// Median-blurred, adaptively thresholded binary image.
    pub binary: Plane,
}

/// Runs the fixed preprocessing chain on a frame.
///
/// Grayscale, then a 3x3 median blur to suppress sensor noise, then a
/// Gaussian-weighted adaptive threshold. Both the detector and the
/// rectifier derive their binary image through this function, always
/// from the original frame.
pub fn preprocess(frame: &Frame) -> Preprocessed {
    let gray = rgb_to_gray(frame);
    let blur = median3(&gray);
    let binary = adaptive_threshold(&blur, ADAPTIVE_BLOCK, ADAPTIVE_C);
    Preprocessed { gray, binary }
}
