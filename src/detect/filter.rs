//! Spatial noise filtering.

use super::plane::Plane;

/// Applies a 3x3 median blur.
///
/// Replaces each pixel with the median of its 3x3 neighborhood,
/// clamping coordinates at the image border. Removes salt-and-pepper
/// sensor noise while keeping edges sharp, which matters downstream:
/// the contour stage works on edges, and a linear blur would smear
/// them.
pub fn median3(src: &Plane) -> Plane {
    let mut out = Plane::new(src.w, src.h);
    let mut window = [0u8; 9];
    for y in 0..src.h {
        for x in 0..src.w {
            let mut k = 0;
            for dy in -1isize..=1 {
                for dx in -1isize..=1 {
                    window[k] = src.get_clamped(x as isize + dx, y as isize + dy);
                    k += 1;
                }
            }
            window.sort_unstable();
            out.set(x, y, window[4]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_unchanged() {
        let plane = Plane::from_vec(4, 4, vec![90; 16]);
        assert_eq!(median3(&plane), plane);
    }

    #[test]
    fn test_single_speck_removed() {
        let mut plane = Plane::from_vec(5, 5, vec![0; 25]);
        plane.set(2, 2, 255);
        let out = median3(&plane);
        assert_eq!(out.get(2, 2), 0);
    }

    #[test]
    fn test_two_pixel_line_survives() {
        // A 2px-wide bright column is preserved (5 of 9 window samples
        // are bright at its interior pixels).
        let mut plane = Plane::from_vec(6, 6, vec![0; 36]);
        for y in 0..6 {
            plane.set(2, y, 255);
            plane.set(3, y, 255);
        }
        let out = median3(&plane);
        assert_eq!(out.get(2, 3), 255);
        assert_eq!(out.get(3, 3), 255);
        assert_eq!(out.get(0, 3), 0);
    }
}
