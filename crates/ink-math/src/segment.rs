//! Predicates on straight line segments.

use ink_core::Tolerance;

use crate::{Aabb2, Point2};

/// Perpendicular distance from `p` to the segment `a`-`b`.
///
/// Degenerates to the point distance when `a == b`.
pub fn point_segment_distance(p: Point2, a: Point2, b: Point2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if Tolerance::default().is_zero(len_sq) {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
pub fn point_line_distance(p: Point2, a: Point2, b: Point2) -> f64 {
    let ab = b - a;
    let len = ab.length();
    if Tolerance::default().is_zero(len) {
        return p.distance(a);
    }
    ab.perp_dot(p - a).abs() / len
}

fn orientation(a: Point2, b: Point2, c: Point2) -> f64 {
    (b - a).perp_dot(c - a)
}

fn on_segment(a: Point2, b: Point2, p: Point2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Whether segments `p1`-`p2` and `q1`-`q2` touch or cross.
pub fn segments_intersect(p1: Point2, p2: Point2, q1: Point2, q2: Point2) -> bool {
    let tol = Tolerance::default();
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (tol.is_zero(d1) && on_segment(q1, q2, p1))
        || (tol.is_zero(d2) && on_segment(q1, q2, p2))
        || (tol.is_zero(d3) && on_segment(p1, p2, q1))
        || (tol.is_zero(d4) && on_segment(p1, p2, q2))
}

/// Whether two polylines share at least one point.
///
/// `closed_a`/`closed_b` add the implicit closing segment of each polyline.
pub fn polylines_intersect(a: &[Point2], closed_a: bool, b: &[Point2], closed_b: bool) -> bool {
    let (Some(box_a), Some(box_b)) = (Aabb2::from_points(a), Aabb2::from_points(b)) else {
        return false;
    };
    if !box_a.intersects(&box_b) {
        return false;
    }

    let segs_a: Vec<(Point2, Point2)> = segments(a, closed_a).collect();
    segments(b, closed_b).any(|(q1, q2)| {
        let seg_box = Aabb2::from_points(&[q1, q2]);
        seg_box.is_some_and(|sb| sb.intersects(&box_a))
            && segs_a.iter().any(|&(p1, p2)| segments_intersect(p1, p2, q1, q2))
    })
}

fn segments(points: &[Point2], closed: bool) -> impl Iterator<Item = (Point2, Point2)> + '_ {
    let closing = if closed && points.len() > 2 {
        Some((points[points.len() - 1], points[0]))
    } else {
        None
    };
    points.windows(2).map(|w| (w[0], w[1])).chain(closing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::dvec2;

    #[test]
    fn test_point_segment_distance() {
        let a = dvec2(0.0, 0.0);
        let b = dvec2(10.0, 0.0);
        assert_relative_eq!(point_segment_distance(dvec2(5.0, 3.0), a, b), 3.0);
        assert_relative_eq!(point_segment_distance(dvec2(-3.0, 4.0), a, b), 5.0);
        assert_relative_eq!(point_segment_distance(dvec2(1.0, 1.0), a, a), 2.0_f64.sqrt());
    }

    #[test]
    fn test_point_line_distance_is_unclamped() {
        let d = point_line_distance(dvec2(-3.0, 4.0), dvec2(0.0, 0.0), dvec2(10.0, 0.0));
        assert_relative_eq!(d, 4.0);
    }

    #[test]
    fn test_segments_cross() {
        assert!(segments_intersect(
            dvec2(0.0, 0.0),
            dvec2(2.0, 2.0),
            dvec2(0.0, 2.0),
            dvec2(2.0, 0.0)
        ));
        assert!(!segments_intersect(
            dvec2(0.0, 0.0),
            dvec2(1.0, 0.0),
            dvec2(0.0, 1.0),
            dvec2(1.0, 1.0)
        ));
    }

    #[test]
    fn test_segments_touch_at_endpoint() {
        assert!(segments_intersect(
            dvec2(0.0, 0.0),
            dvec2(1.0, 0.0),
            dvec2(1.0, 0.0),
            dvec2(1.0, 5.0)
        ));
    }

    #[test]
    fn test_polylines_intersect() {
        let square = vec![dvec2(0.0, 0.0), dvec2(4.0, 0.0), dvec2(4.0, 4.0), dvec2(0.0, 4.0)];
        let crossing = vec![dvec2(2.0, 2.0), dvec2(6.0, 2.0)];
        let inside = vec![dvec2(1.0, 1.0), dvec2(2.0, 2.0)];
        let left_of_gap = vec![dvec2(-1.0, 2.0), dvec2(0.5, 2.0)];
        assert!(polylines_intersect(&square, true, &crossing, false));
        assert!(!polylines_intersect(&square, true, &inside, false));
        // The closing edge x = 0 is only present when the square is closed.
        assert!(polylines_intersect(&square, true, &left_of_gap, false));
        assert!(!polylines_intersect(&square, false, &left_of_gap, false));
    }
}
