//! Adaptive Gaussian binarization.
//!
//! A single global threshold fails under the uneven lighting the robot
//! sees between waypoints. Thresholding each pixel against its own
//! Gaussian-weighted neighborhood mean is robust to illumination
//! gradients: flat regions come out white and only local transitions
//! (edges, pen strokes) come out black.

use super::plane::Plane;

/// Neighborhood side length for the adaptive threshold.
pub const ADAPTIVE_BLOCK: usize = 11;

/// Constant subtracted from the local mean before comparison.
pub const ADAPTIVE_C: f32 = 3.0;

/// Binarizes `src` against a Gaussian-weighted local mean.
///
/// A pixel becomes 255 when it exceeds the weighted mean of its
/// `block x block` neighborhood minus `c`, and 0 otherwise. The border
/// is handled by replicating edge pixels. `block` must be odd.
pub fn adaptive_threshold(src: &Plane, block: usize, c: f32) -> Plane {
    assert!(block % 2 == 1, "block size must be odd");
    let kernel = gaussian_kernel(block);
    let half = (block / 2) as isize;

    // Separable convolution: horizontal pass into f32, then vertical.
    let mut horiz = vec![0f32; src.w * src.h];
    for y in 0..src.h {
        for x in 0..src.w {
            let mut acc = 0f32;
            for (k, &wgt) in kernel.iter().enumerate() {
                let sx = x as isize + k as isize - half;
                acc += wgt * src.get_clamped(sx, y as isize) as f32;
            }
            horiz[y * src.w + x] = acc;
        }
    }

    let mut out = Plane::new(src.w, src.h);
    for y in 0..src.h {
        for x in 0..src.w {
            let mut mean = 0f32;
            for (k, &wgt) in kernel.iter().enumerate() {
                let sy = (y as isize + k as isize - half).clamp(0, src.h as isize - 1) as usize;
                mean += wgt * horiz[sy * src.w + x];
            }
            let v = if src.get(x, y) as f32 > mean - c { 255 } else { 0 };
            out.set(x, y, v);
        }
    }
    out
}

/// Normalized 1-D Gaussian taps for an odd window of length `n`.
///
/// Sigma follows the usual `0.3 * ((n - 1) * 0.5 - 1) + 0.8` rule for
/// deriving a blur width from a kernel size.
fn gaussian_kernel(n: usize) -> Vec<f32> {
    let sigma = 0.3 * ((n as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (n / 2) as f32;
    let mut taps: Vec<f32> = (0..n)
        .map(|i| {
            let d = i as f32 - center;
            (-d * d / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = taps.iter().sum();
    for t in &mut taps {
        *t /= sum;
    }
    taps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_normalized_and_symmetric() {
        let k = gaussian_kernel(11);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..5 {
            assert!((k[i] - k[10 - i]).abs() < 1e-6);
        }
        assert!(k[5] > k[4]);
    }

    #[test]
    fn test_flat_regions_go_white() {
        // Uniform input, dark or bright, thresholds to all white: every
        // pixel equals its local mean and the offset c pushes the
        // threshold below it.
        for level in [0u8, 128, 255] {
            let plane = Plane::from_vec(20, 20, vec![level; 400]);
            let out = adaptive_threshold(&plane, ADAPTIVE_BLOCK, ADAPTIVE_C);
            assert!(out.data.iter().all(|&v| v == 255), "level {level}");
        }
    }

    #[test]
    fn test_edges_go_black_on_dark_side() {
        // Vertical step edge: dark pixels near the boundary fall below
        // their mixed-neighborhood mean, bright pixels never do.
        let mut plane = Plane::new(30, 11);
        for y in 0..11 {
            for x in 15..30 {
                plane.set(x, y, 255);
            }
        }
        let out = adaptive_threshold(&plane, ADAPTIVE_BLOCK, ADAPTIVE_C);
        // Dark pixel adjacent to the edge.
        assert_eq!(out.get(14, 5), 0);
        // Bright pixel adjacent to the edge stays white.
        assert_eq!(out.get(15, 5), 255);
        // Dark pixel far from the edge is flat, so white.
        assert_eq!(out.get(2, 5), 255);
    }

    #[test]
    fn test_output_is_binary() {
        let data: Vec<u8> = (0..400).map(|i| (i * 7 % 256) as u8).collect();
        let plane = Plane::from_vec(20, 20, data);
        let out = adaptive_threshold(&plane, ADAPTIVE_BLOCK, ADAPTIVE_C);
        assert!(out.data.iter().all(|&v| v == 0 || v == 255));
    }
}
