//! Contour extraction by border following.
//!
//! Suzuki-Abe style border following over an 8-connected binary image.
//! Both outer borders and hole borders are collected into a flat list;
//! no hierarchy is kept, since the detector only filters contours
//! individually.

use super::{plane::Plane, Point2i};

/// Clockwise 8-neighborhood offsets in image coordinates (y down),
/// starting east.
const CW: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// A traced border: the ordered boundary pixels of one region.
#[derive(Clone, Debug)]
pub struct Contour {
    /// Boundary pixels in trace order.
    pub points: Vec<Point2i>,
}

impl Contour {
    /// Absolute area enclosed by the contour (shoelace formula).
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    /// Closed perimeter: sum of distances between consecutive points
    /// plus the closing edge.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                let (dx, dy) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
                (dx * dx + dy * dy).sqrt()
            })
            .sum()
    }

    /// Axis-aligned bounding box as (x, y, width, height) in the pixel
    /// convention: width and height count pixels, not spans.
    pub fn bounding_box(&self) -> (i32, i32, i32, i32) {
        let min_x = self.points.iter().map(|p| p.x).min().unwrap_or(0);
        let max_x = self.points.iter().map(|p| p.x).max().unwrap_or(0);
        let min_y = self.points.iter().map(|p| p.y).min().unwrap_or(0);
        let max_y = self.points.iter().map(|p| p.y).max().unwrap_or(0);
        (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
    }
}

/// Absolute shoelace area of a polygon given by `points`.
pub(crate) fn polygon_area(points: &[Point2i]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice: i64 = 0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    (twice.abs() as f64) / 2.0
}

/// Extracts all region borders from a binary image.
///
/// Nonzero pixels are foreground. Pixels outside the image count as
/// background, so regions touching the frame edge still produce a
/// closed border.
pub fn find_contours(bin: &Plane) -> Vec<Contour> {
    let w = bin.w as i32;
    let h = bin.h as i32;
    let mut labels: Vec<i32> = bin.data.iter().map(|&v| i32::from(v > 0)).collect();
    let mut contours = Vec::new();
    let mut nbd = 1;

    for y in 0..h {
        for x in 0..w {
            let v = label_at(&labels, w, h, x, y);
            if v == 0 {
                continue;
            }
            let from = if v == 1 && label_at(&labels, w, h, x - 1, y) == 0 {
                // Start of an outer border.
                (x - 1, y)
            } else if v >= 1 && label_at(&labels, w, h, x + 1, y) == 0 {
                // Start of a hole border. Pixels already marked negative
                // had their right edge consumed by an earlier trace.
                (x + 1, y)
            } else {
                continue;
            };
            nbd += 1;
            let points = trace_border(&mut labels, w, h, (x, y), from, nbd);
            contours.push(Contour { points });
        }
    }
    contours
}

#[inline]
fn label_at(labels: &[i32], w: i32, h: i32, x: i32, y: i32) -> i32 {
    if x < 0 || y < 0 || x >= w || y >= h {
        0
    } else {
        labels[(y * w + x) as usize]
    }
}

/// Direction index of `to` as seen from `from` (must be 8-adjacent).
fn dir_of(from: (i32, i32), to: (i32, i32)) -> usize {
    let d = (to.0 - from.0, to.1 - from.1);
    CW.iter()
        .position(|&o| o == d)
        .expect("points are not 8-adjacent")
}

/// Follows one border starting at `start`, marking visited pixels so the
/// scan never re-traces it. Returns the boundary pixels in trace order.
fn trace_border(
    labels: &mut [i32],
    w: i32,
    h: i32,
    start: (i32, i32),
    from: (i32, i32),
    nbd: i32,
) -> Vec<Point2i> {
    let idx = |p: (i32, i32)| (p.1 * w + p.0) as usize;

    // Clockwise search around `start` for the first foreground neighbor.
    let d0 = dir_of(start, from);
    let mut first = None;
    for i in 1..=8 {
        let (dx, dy) = CW[(d0 + i) % 8];
        let q = (start.0 + dx, start.1 + dy);
        if label_at(labels, w, h, q.0, q.1) != 0 {
            first = Some(q);
            break;
        }
    }
    let Some(p1) = first else {
        // Isolated pixel: a one-point border.
        labels[idx(start)] = -nbd;
        return vec![Point2i::new(start.0, start.1)];
    };

    let mut points = Vec::new();
    let mut prev = p1;
    let mut cur = start;
    loop {
        // Counterclockwise search around `cur`, starting just past `prev`.
        let d = dir_of(cur, prev);
        let mut next = prev;
        let mut right_was_zero = false;
        for i in 1..=8 {
            let di = (d + 8 - i) % 8;
            let (dx, dy) = CW[di];
            let q = (cur.0 + dx, cur.1 + dy);
            if label_at(labels, w, h, q.0, q.1) != 0 {
                next = q;
                break;
            }
            if di == 0 {
                right_was_zero = true;
            }
        }

        // Marking rule: a zero east neighbor means this pixel closes the
        // region's right edge for this border.
        if right_was_zero {
            labels[idx(cur)] = -nbd;
        } else if labels[idx(cur)] == 1 {
            labels[idx(cur)] = nbd;
        }
        points.push(Point2i::new(cur.0, cur.1));

        if next == start && cur == p1 {
            break;
        }
        prev = cur;
        cur = next;
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_rect(w: usize, h: usize, x0: usize, y0: usize, rw: usize, rh: usize) -> Plane {
        let mut plane = Plane::new(w, h);
        for y in y0..y0 + rh {
            for x in x0..x0 + rw {
                plane.set(x, y, 255);
            }
        }
        plane
    }

    #[test]
    fn test_single_rect_one_contour() {
        let plane = filled_rect(20, 20, 5, 6, 8, 7);
        let contours = find_contours(&plane);
        assert_eq!(contours.len(), 1);

        let c = &contours[0];
        assert_eq!(c.bounding_box(), (5, 6, 8, 7));
        // Boundary polygon of an 8x7 pixel block encloses 7x6 pixel centers.
        assert!((c.area() - 42.0).abs() < 1e-9);
        // 4 sides of lengths 7, 6, 7, 6 between corner pixels.
        assert!((c.perimeter() - 26.0).abs() < 1e-9);
    }

    #[test]
    fn test_hole_produces_second_border() {
        // Foreground ring: 10x10 block with a 4x4 hole.
        let mut plane = filled_rect(20, 20, 4, 4, 10, 10);
        for y in 7..11 {
            for x in 7..11 {
                plane.set(x, y, 0);
            }
        }
        let contours = find_contours(&plane);
        assert_eq!(contours.len(), 2);

        let mut areas: Vec<f64> = contours.iter().map(|c| c.area()).collect();
        areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
        // Outer border spans the block, hole border hugs the hole.
        assert!((areas[1] - 81.0).abs() < 1e-9);
        assert!(areas[0] < 81.0);
    }

    #[test]
    fn test_two_regions_two_contours() {
        let mut plane = filled_rect(30, 20, 2, 2, 5, 5);
        for y in 10..15 {
            for x in 20..25 {
                plane.set(x, y, 255);
            }
        }
        let contours = find_contours(&plane);
        assert_eq!(contours.len(), 2);
    }

    #[test]
    fn test_isolated_pixel() {
        let mut plane = Plane::new(5, 5);
        plane.set(2, 2, 255);
        let contours = find_contours(&plane);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points, vec![Point2i::new(2, 2)]);
        assert_eq!(contours[0].area(), 0.0);
    }

    #[test]
    fn test_region_touching_edge() {
        // The image border counts as background, so the trace closes.
        let plane = filled_rect(10, 10, 0, 0, 10, 3);
        let contours = find_contours(&plane);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].bounding_box(), (0, 0, 10, 3));
    }
}
