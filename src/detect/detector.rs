//! Candidate selection: from contour soup to a single poster quad.

use super::{
    contour::{find_contours, polygon_area, Contour},
    plane::Plane,
    polygon::approx_polygon,
    Point2i,
};
use crate::capture::DetectConfig;

/// The four corners of a detected poster, in trace order.
///
/// The corners are *not* canonically ordered; assigning them to
/// top-left/top-right/bottom-right/bottom-left roles is the
/// rectifier's job. A `Quad` lives only between detection and
/// rectification of a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quad {
    /// Corner points in frame coordinates.
    pub corners: [Point2i; 4],
}

impl Quad {
    /// Absolute enclosed area in px^2.
    pub fn area(&self) -> f64 {
        polygon_area(&self.corners)
    }
}

/// Finds the best candidate poster quadrilateral in a binary image.
///
/// A contour qualifies when its Douglas-Peucker approximation has
/// exactly 4 vertices, its area strictly exceeds the minimum, and its
/// bounding-box aspect ratio is within the near-square band. Among
/// qualifying candidates the one with the *smallest* area wins: the
/// tightest-fitting square, rather than a looser approximation that
/// may enclose background.
pub struct PosterDetector {
    params: DetectConfig,
}

impl PosterDetector {
    /// Creates a detector with the given geometric filter parameters.
    pub fn new(params: DetectConfig) -> Self {
        Self { params }
    }

    /// Runs contour extraction and candidate selection on a binary image.
    pub fn detect(&self, binary: &Plane) -> Option<Quad> {
        let contours = find_contours(binary);
        let quad = self.select(&contours);
        match &quad {
            Some(q) => tracing::debug!(area = q.area(), "poster found"),
            None => tracing::trace!(contours = contours.len(), "no poster candidate"),
        }
        quad
    }

    /// Selects the winning quad among already-extracted contours.
    ///
    /// Ties on area keep the first candidate in scan order.
    pub fn select(&self, contours: &[Contour]) -> Option<Quad> {
        let mut best: Option<(f64, Quad)> = None;
        for contour in contours {
            let area = contour.area();
            if area <= self.params.min_area {
                continue;
            }
            let eps = self.params.eps_scale * contour.perimeter();
            let approx = approx_polygon(&contour.points, eps);
            if approx.len() != 4 {
                continue;
            }
            let (_, _, w, h) = contour.bounding_box();
            let ratio = w as f64 / h as f64;
            if ratio < self.params.lower_ratio || ratio > self.params.upper_ratio {
                continue;
            }
            let smaller = best.as_ref().map_or(true, |(a, _)| area < *a);
            if smaller {
                best = Some((
                    area,
                    Quad {
                        corners: [approx[0], approx[1], approx[2], approx[3]],
                    },
                ));
            }
        }
        best.map(|(_, q)| q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_contour(corners: [(i32, i32); 4]) -> Contour {
        Contour {
            points: corners
                .iter()
                .map(|&(x, y)| Point2i::new(x, y))
                .collect(),
        }
    }

    fn detector() -> PosterDetector {
        PosterDetector::new(DetectConfig::default())
    }

    #[test]
    fn test_ratio_boundaries_inclusive() {
        // Bounding boxes are (w+1) x (h+1) for corner-point quads.
        let cases = [
            (39, 49, true),  // ratio 40/50 = 0.8 exactly: accepted
            (78, 99, false), // ratio 79/100 = 0.79: rejected
            (59, 49, true),  // ratio 60/50 = 1.2 exactly: accepted
            (120, 99, false), // ratio 121/100 = 1.21: rejected
        ];
        for (w, h, accepted) in cases {
            let c = quad_contour([(0, 0), (w, 0), (w, h), (0, h)]);
            let got = detector().select(&[c]).is_some();
            assert_eq!(got, accepted, "w={w} h={h}");
        }
    }

    #[test]
    fn test_area_boundary_strict() {
        // 20x25 rectangle: area exactly 500, rejected by the strict >.
        let at_limit = quad_contour([(0, 0), (20, 0), (20, 25), (0, 25)]);
        assert_eq!(at_limit.area(), 500.0);
        assert!(detector().select(&[at_limit]).is_none());

        // Sheared parallelogram with area |23*22 - 5*1| = 501, accepted.
        let above = quad_contour([(0, 0), (23, 5), (24, 27), (1, 22)]);
        assert_eq!(above.area(), 501.0);
        assert!(detector().select(&[above]).is_some());
    }

    #[test]
    fn test_smallest_area_wins() {
        let outer = quad_contour([(0, 0), (100, 0), (100, 100), (0, 100)]);
        let inner = quad_contour([(20, 20), (80, 20), (80, 80), (20, 80)]);
        let quad = detector().select(&[outer, inner.clone()]).unwrap();
        assert_eq!(quad.area(), inner.area());
    }

    #[test]
    fn test_tie_keeps_first() {
        let a = quad_contour([(0, 0), (50, 0), (50, 50), (0, 50)]);
        let b = quad_contour([(100, 100), (150, 100), (150, 150), (100, 150)]);
        let quad = detector().select(&[a, b]).unwrap();
        assert_eq!(quad.corners[0], Point2i::new(0, 0));
    }

    #[test]
    fn test_non_quad_rejected() {
        // A triangle never qualifies, whatever its area.
        let tri = Contour {
            points: vec![
                Point2i::new(0, 0),
                Point2i::new(60, 0),
                Point2i::new(30, 60),
            ],
        };
        assert!(detector().select(&[tri]).is_none());
    }

    #[test]
    fn test_empty_contours() {
        assert!(detector().select(&[]).is_none());
    }
}
