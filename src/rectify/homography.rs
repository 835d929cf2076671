//! Four-point perspective transform.

use super::{RectifyError, BITMAP_SIZE};
use crate::detect::Point2f;
use nalgebra::{Matrix3, SMatrix, SVector};

/// Computes the homography mapping canonically ordered source corners
/// onto the corners of the ideal bitmap square.
///
/// The pairing is strict: (top-left, top-right, bottom-right,
/// bottom-left) map to (0,0), (S,0), (S,S), (0,S) with S the bitmap
/// side. Feeding corners in any other order produces a mirrored or
/// rotated rectification.
///
/// Solves the standard 8x8 linear system for the eight unknowns of H
/// (with H[2][2] fixed to 1). Three or more collinear corners make the
/// system singular, reported as [`RectifyError::DegenerateQuad`].
pub fn perspective_from_corners(src: &[Point2f; 4]) -> Result<Matrix3<f64>, RectifyError> {
    let s = BITMAP_SIZE as f64;
    let dst = [(0.0, 0.0), (s, 0.0), (s, s), (0.0, s)];

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for i in 0..4 {
        let (x, y) = (src[i].x, src[i].y);
        let (u, v) = dst[i];

        a[(2 * i, 0)] = x;
        a[(2 * i, 1)] = y;
        a[(2 * i, 2)] = 1.0;
        a[(2 * i, 6)] = -x * u;
        a[(2 * i, 7)] = -y * u;
        b[2 * i] = u;

        a[(2 * i + 1, 3)] = x;
        a[(2 * i + 1, 4)] = y;
        a[(2 * i + 1, 5)] = 1.0;
        a[(2 * i + 1, 6)] = -x * v;
        a[(2 * i + 1, 7)] = -y * v;
        b[2 * i + 1] = v;
    }

    let h = a.lu().solve(&b).ok_or(RectifyError::DegenerateQuad)?;
    Ok(Matrix3::new(
        h[0], h[1], h[2], //
        h[3], h[4], h[5], //
        h[6], h[7], 1.0,
    ))
}

/// Projects a point through a homography: H * [x, y, 1]^T, dehomogenized.
pub fn project(h: &Matrix3<f64>, x: f64, y: f64) -> Option<(f64, f64)> {
    let p = h * nalgebra::Vector3::new(x, y, 1.0);
    if p[2].abs() < 1e-12 {
        return None;
    }
    Some((p[0] / p[2], p[1] / p[2]))
}
