//! Canonical corner ordering.

use crate::detect::{Point2f, Quad};

/// Assigns the four corners of a quad to canonical roles:
/// (top-left, top-right, bottom-right, bottom-left).
///
/// Uses the sum/difference heuristic: in image coordinates (y down)
/// the top-left corner has the minimum x+y, the bottom-right the
/// maximum x+y, the top-right the maximum x-y, and the bottom-left the
/// minimum x-y. This assumes a convex quad that is roughly axis
/// aligned; a marker rotated far past 45 degrees makes the extrema
/// ambiguous and the assignment silently wrong. Acceptable here: the
/// robot photographs posters roughly head-on.
pub fn order_corners(quad: &Quad) -> [Point2f; 4] {
    let pts: Vec<Point2f> = quad
        .corners
        .iter()
        .map(|p| Point2f::new(p.x as f64, p.y as f64))
        .collect();

    let sum = |p: &Point2f| p.x + p.y;
    let diff = |p: &Point2f| p.x - p.y;
    let pick = |key: &dyn Fn(&Point2f) -> f64, largest: bool| -> Point2f {
        let mut best = pts[0];
        for p in &pts[1..] {
            let better = if largest {
                key(p) > key(&best)
            } else {
                key(p) < key(&best)
            };
            if better {
                best = *p;
            }
        }
        best
    };

    let tl = pick(&sum, false);
    let br = pick(&sum, true);
    let tr = pick(&diff, true);
    let bl = pick(&diff, false);

    [tl, tr, br, bl]
}
