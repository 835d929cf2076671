//! Perspective warp by inverse mapping.

use super::{homography::project, RectifyError};
use crate::detect::Plane;
use nalgebra::Matrix3;

/// Warps `src` through `transform` onto an `out_w x out_h` canvas.
///
/// `transform` maps source coordinates to output coordinates; each
/// output pixel is filled by projecting back through the inverse and
/// sampling the nearest source pixel. The input is binary, so nearest
/// neighbor is the right interpolation: bilinear would manufacture
/// intermediate gray levels that the normalizer must not see.
/// Out-of-bounds samples read as 0.
pub fn warp(
    src: &Plane,
    transform: &Matrix3<f64>,
    out_w: usize,
    out_h: usize,
) -> Result<Plane, RectifyError> {
    let inverse = transform
        .try_inverse()
        .ok_or(RectifyError::DegenerateQuad)?;

    let mut out = Plane::new(out_w, out_h);
    for v in 0..out_h {
        for u in 0..out_w {
            let Some((sx, sy)) = project(&inverse, u as f64, v as f64) else {
                continue;
            };
            let x = sx.round() as isize;
            let y = sy.round() as isize;
            if x >= 0 && y >= 0 && (x as usize) < src.w && (y as usize) < src.h {
                out.set(u, v, src.get(x as usize, y as usize));
            }
        }
    }
    Ok(out)
}
