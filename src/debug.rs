//! Numbered stage artifacts for offline debugging.
//!
//! Every pipeline stage can be persisted as a JPEG under an output
//! directory, named `NN_stage_name_C.jpg` where `NN` is the stage
//! number and `C` a per-session counter. Watching the sequence
//! 01 (raw) through 08 (bordered) is the intended way to understand
//! and debug the preprocessing chain.

use crate::capture::Frame;
use crate::detect::{Plane, Quad};
use crate::normalize::NormalizedBitmap;
use crate::rectify::{Bitmap28, BITMAP_SIZE};
use image::{GrayImage, RgbImage};
use std::path::{Path, PathBuf};

/// Outline color for the labeled frame (yellow).
const OUTLINE: [u8; 3] = [255, 255, 0];

/// Writes numbered per-stage JPEGs into an output directory.
///
/// Failures to write are logged and swallowed: debug artifacts must
/// never take down the perception loop.
pub struct DebugSink {
    dir: PathBuf,
    count: u64,
}

impl DebugSink {
    /// Creates the sink, creating the output directory if absent.
    pub fn new(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir.as_ref())?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
            count: 0,
        })
    }

    /// Advances the per-session counter. Call once per pipeline pass.
    pub fn next_pass(&mut self) {
        self.count += 1;
    }

    /// Current counter value used in artifact names.
    pub fn count(&self) -> u64 {
        self.count
    }

    fn path_for(&self, stage: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.jpg", stage, self.count))
    }

    /// Saves an RGB frame for the given stage.
    pub fn save_frame(&self, stage: &str, frame: &Frame) {
        let Some(img) = RgbImage::from_raw(frame.width(), frame.height(), frame.pixels().to_vec())
        else {
            tracing::warn!(stage, "frame buffer size mismatch, skipping dump");
            return;
        };
        self.write(stage, img.save(self.path_for(stage)));
    }

    /// Saves a single-channel plane for the given stage.
    pub fn save_plane(&self, stage: &str, plane: &Plane) {
        let Some(img) = GrayImage::from_raw(plane.w as u32, plane.h as u32, plane.data.clone())
        else {
            tracing::warn!(stage, "plane buffer size mismatch, skipping dump");
            return;
        };
        self.write(stage, img.save(self.path_for(stage)));
    }

    /// Saves a 28x28 bitmap for the given stage.
    pub fn save_bitmap(&self, stage: &str, bitmap: &Bitmap28) {
        let plane = Plane::from_vec(BITMAP_SIZE, BITMAP_SIZE, bitmap.as_raw().to_vec());
        self.save_plane(stage, &plane);
    }

    /// Saves a normalized bitmap for the given stage.
    pub fn save_normalized(&self, stage: &str, bitmap: &NormalizedBitmap) {
        let plane = Plane::from_vec(BITMAP_SIZE, BITMAP_SIZE, bitmap.as_vector().to_vec());
        self.save_plane(stage, &plane);
    }

    fn write(&self, stage: &str, result: image::ImageResult<()>) {
        match result {
            Ok(()) => tracing::trace!(stage, count = self.count, "stage artifact written"),
            Err(e) => tracing::warn!(stage, error = %e, "failed to write stage artifact"),
        }
    }
}

/// Returns a copy of `frame` with the detected outline drawn on it.
///
/// The input frame is never mutated; annotation works on a copy, as
/// the downstream stages re-read the original pixels.
pub fn annotate(frame: &Frame, quad: &Quad) -> Frame {
    let w = frame.width() as i32;
    let h = frame.height() as i32;
    let mut pixels = frame.pixels().to_vec();

    let mut paint = |x: i32, y: i32| {
        // 3px-thick strokes: paint a small disc around each line pixel.
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (px, py) = (x + dx, y + dy);
                if px >= 0 && py >= 0 && px < w && py < h {
                    let i = ((py * w + px) * 3) as usize;
                    pixels[i..i + 3].copy_from_slice(&OUTLINE);
                }
            }
        }
    };

    for i in 0..4 {
        let a = quad.corners[i];
        let b = quad.corners[(i + 1) % 4];
        // Bresenham between consecutive corners.
        let (mut x, mut y) = (a.x, a.y);
        let dx = (b.x - a.x).abs();
        let dy = -(b.y - a.y).abs();
        let sx = if a.x < b.x { 1 } else { -1 };
        let sy = if a.y < b.y { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            paint(x, y);
            if x == b.x && y == b.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    Frame::new(pixels, frame.width(), frame.height(), frame.sequence())
}
