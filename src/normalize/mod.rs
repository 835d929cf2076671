//! Bitmap normalization for classifier hand-off.
//!
//! The cropped bitmap is inverted and rescaled by its own min/max,
//! re-binarized, and its border band blanked. The per-crop rescale
//! makes the output contrast-dependent: a deliberate carry-over from
//! the field-tested behavior, flagged as a sensitivity rather than a
//! feature (see DESIGN.md).

use crate::rectify::{Bitmap28, BITMAP_SIZE};
use thiserror::Error;

/// Width of the border band forced to black.
pub const BORDER: usize = 4;

/// Length of the flattened classifier input vector.
pub const VECTOR_LEN: usize = BITMAP_SIZE * BITMAP_SIZE;

/// Errors that can occur during normalization.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The crop had no contrast at all (uniform pixels), so the
    /// min/max rescale would divide by zero. Treated as "no usable
    /// marker": the caller retries on the next frame.
    #[error("cropped region has no contrast (uniform value {0})")]
    FlatContrast(u8),
}

/// The final artifact handed to the external classifier.
///
/// Invariants: every pixel is exactly 0 or 255, and the outer
/// [`BORDER`] rows and columns on all four sides are 0.
#[derive(Clone)]
pub struct NormalizedBitmap {
    data: [u8; VECTOR_LEN],
}

impl NormalizedBitmap {
    /// Gets the pixel value at (x, y).
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * BITMAP_SIZE + x]
    }

    /// Flattened row-major view, ready for inference.
    #[inline]
    pub fn as_vector(&self) -> &[u8; VECTOR_LEN] {
        &self.data
    }
}

impl std::fmt::Debug for NormalizedBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizedBitmap")
            .field(
                "foreground",
                &self.data.iter().filter(|&&v| v == 255).count(),
            )
            .finish()
    }
}

/// Normalizes a cropped bitmap into classifier-ready form.
///
/// 1. Linear inversion scaled by the crop's own range: the minimum
///    input value maps to 255, the maximum to 0.
/// 2. Re-binarize: anything strictly positive becomes 255.
/// 3. Blank the border band to remove marker-edge misalignment
///    artifacts.
pub fn normalize(crop: &Bitmap28) -> Result<NormalizedBitmap, NormalizeError> {
    let raw = crop.as_raw();
    let (mut min, mut max) = (u8::MAX, u8::MIN);
    for &px in raw.iter() {
        min = min.min(px);
        max = max.max(px);
    }
    if min == max {
        return Err(NormalizeError::FlatContrast(min));
    }

    let range = (max - min) as f32;
    let mut data = [0u8; VECTOR_LEN];
    for (out, &px) in data.iter_mut().zip(raw.iter()) {
        let inverted = 255.0 - 255.0 * (px - min) as f32 / range;
        *out = if inverted > 0.0 { 255 } else { 0 };
    }

    for y in 0..BITMAP_SIZE {
        for x in 0..BITMAP_SIZE {
            let in_band = x < BORDER
                || x >= BITMAP_SIZE - BORDER
                || y < BORDER
                || y >= BITMAP_SIZE - BORDER;
            if in_band {
                data[y * BITMAP_SIZE + x] = 0;
            }
        }
    }

    Ok(NormalizedBitmap { data })
}
