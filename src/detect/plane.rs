//! Owned single-channel u8 image plane.

use crate::capture::Frame;

/// A single-channel 8-bit image in row-major layout.
///
/// Used for all intermediate imagery in the pipeline: grayscale
/// conversions, blurred planes, and binary threshold output.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    /// Image width in pixels.
    pub w: usize,
    /// Image height in pixels.
    pub h: usize,
    /// Backing storage in row-major order, `w * h` bytes.
    pub data: Vec<u8>,
}

impl Plane {
    /// Constructs a zero-initialized plane of size `w x h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    /// Wraps an existing buffer. Panics if the length does not match.
    pub fn from_vec(w: usize, h: usize, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), w * h, "plane buffer size mismatch");
        Self { w, h, data }
    }

    /// Converts (x, y) to a linear index into `data`.
    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    /// Gets the pixel value at (x, y).
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[self.idx(x, y)]
    }

    /// Sets the pixel value at (x, y).
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Gets the pixel at (x, y), clamping coordinates to the image.
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize) -> u8 {
        let cx = x.clamp(0, self.w as isize - 1) as usize;
        let cy = y.clamp(0, self.h as isize - 1) as usize;
        self.get(cx, cy)
    }
}

/// Converts an RGB frame to grayscale.
///
/// Integer Rec. 601 luma: `(77 R + 150 G + 29 B) >> 8`, matching the
/// usual fixed-point weights for 8-bit imagery.
pub fn rgb_to_gray(frame: &Frame) -> Plane {
    let w = frame.width() as usize;
    let h = frame.height() as usize;
    let mut out = Vec::with_capacity(w * h);
    for px in frame.pixels().chunks_exact(3) {
        let luma = (77 * px[0] as u32 + 150 * px[1] as u32 + 29 * px[2] as u32 + 128) >> 8;
        out.push(luma as u8);
    }
    Plane::from_vec(w, h, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_indexing() {
        let mut plane = Plane::new(4, 3);
        plane.set(2, 1, 200);
        assert_eq!(plane.get(2, 1), 200);
        assert_eq!(plane.data[1 * 4 + 2], 200);
    }

    #[test]
    fn test_clamped_access() {
        let mut plane = Plane::new(2, 2);
        plane.set(0, 0, 9);
        plane.set(1, 1, 7);
        assert_eq!(plane.get_clamped(-5, -5), 9);
        assert_eq!(plane.get_clamped(10, 10), 7);
    }

    #[test]
    fn test_gray_extremes() {
        // Pure white and pure black map to 255 and 0.
        let pixels = vec![255, 255, 255, 0, 0, 0];
        let frame = Frame::new(pixels, 2, 1, 0);
        let gray = rgb_to_gray(&frame);
        assert_eq!(gray.get(0, 0), 255);
        assert_eq!(gray.get(1, 0), 0);
    }

    #[test]
    #[should_panic(expected = "mismatch")]
    fn test_from_vec_size_checked() {
        Plane::from_vec(3, 3, vec![0; 8]);
    }
}
