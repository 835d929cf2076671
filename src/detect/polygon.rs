//! Closed-polygon simplification (Douglas-Peucker).

use super::Point2i;

/// Simplifies a closed contour with the Douglas-Peucker algorithm.
///
/// Splits the ring at its two most distant anchor points, simplifies
/// each half with tolerance `eps` (in pixels), and joins the halves.
/// Contours with fewer than three points are returned unchanged.
pub fn approx_polygon(points: &[Point2i], eps: f64) -> Vec<Point2i> {
    if points.len() < 3 {
        return points.to_vec();
    }

    // Anchor 0 is the first point; anchor 1 is the point farthest from it.
    let far = (1..points.len())
        .max_by(|&a, &b| {
            dist2(points[0], points[a])
                .partial_cmp(&dist2(points[0], points[b]))
                .unwrap()
        })
        .unwrap();

    let mut first_half = simplify_open(&points[..=far], eps);
    let mut second: Vec<Point2i> = points[far..].to_vec();
    second.push(points[0]);
    let second_half = simplify_open(&second, eps);

    // Drop the shared endpoints when joining.
    first_half.pop();
    first_half.extend_from_slice(&second_half[..second_half.len() - 1]);
    first_half
}

fn dist2(a: Point2i, b: Point2i) -> f64 {
    let (dx, dy) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
    dx * dx + dy * dy
}

/// Perpendicular distance from `p` to the chord `a`-`b`.
fn chord_distance(p: Point2i, a: Point2i, b: Point2i) -> f64 {
    let len2 = dist2(a, b);
    if len2 == 0.0 {
        return dist2(p, a).sqrt();
    }
    let cross = (b.x - a.x) as f64 * (p.y - a.y) as f64 - (b.y - a.y) as f64 * (p.x - a.x) as f64;
    cross.abs() / len2.sqrt()
}

/// Douglas-Peucker on an open polyline; keeps both endpoints.
fn simplify_open(points: &[Point2i], eps: f64) -> Vec<Point2i> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let last = points.len() - 1;
    let (mut worst, mut worst_dist) = (0, 0.0);
    for i in 1..last {
        let d = chord_distance(points[i], points[0], points[last]);
        if d > worst_dist {
            worst = i;
            worst_dist = d;
        }
    }

    if worst_dist > eps {
        let mut left = simplify_open(&points[..=worst], eps);
        let right = simplify_open(&points[worst..], eps);
        left.pop();
        left.extend_from_slice(&right);
        left
    } else {
        vec![points[0], points[last]]
    }
}
