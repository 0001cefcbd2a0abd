//! Least-squares cubic Bezier fitting of ordered point lists.
//!
//! Tangent-constrained fitting with chord-length parameterisation, Newton
//! reparameterisation, and recursive splitting at the point of largest error.

use ink_core::GeometryError;
use ink_math::{Point2, Vector2};
use nalgebra::{Matrix2, Vector2 as NVector2};

use super::{CubicBezier, ParametricCurve};
use crate::GeometryResult;

/// Newton passes attempted before a segment is split.
const MAX_REPARAMETERISATIONS: usize = 4;

/// Errors within this multiple of the target are worth reparameterising.
const REPARAMETERISE_FACTOR: f64 = 4.0;

/// Fit a chain of cubic Bezier segments whose deviation from `points` stays
/// within `fit_error` (px).
///
/// Consecutive duplicates are ignored. Two or three distinct points produce a
/// single segment; fewer than two are a [`GeometryError::DegenerateCurve`].
pub fn fit_cubic_beziers(points: &[Point2], fit_error: f64) -> GeometryResult<Vec<CubicBezier>> {
    let mut distinct: Vec<Point2> = Vec::with_capacity(points.len());
    for &p in points {
        if !p.is_finite() {
            return Err(GeometryError::DegenerateCurve(format!("non-finite point {p}")));
        }
        if distinct.last().map_or(true, |&last| last.distance(p) > 1e-12) {
            distinct.push(p);
        }
    }
    if distinct.len() < 2 {
        return Err(GeometryError::DegenerateCurve(format!(
            "{} distinct point(s)",
            distinct.len()
        )));
    }

    let n = distinct.len();
    let left = unit(distinct[1] - distinct[0]).ok_or_else(zero_tangent)?;
    let right = unit(distinct[n - 2] - distinct[n - 1]).ok_or_else(zero_tangent)?;

    let mut segments = Vec::new();
    if n <= 3 {
        segments.push(fit_single(&distinct, left, right));
    } else {
        fit_recursive(&distinct, left, right, fit_error.max(0.0), &mut segments);
    }
    Ok(segments)
}

fn zero_tangent() -> GeometryError {
    GeometryError::DegenerateCurve("zero-length end tangent".to_string())
}

fn unit(v: Vector2) -> Option<Vector2> {
    let len = v.length();
    (len > 1e-12).then(|| v / len)
}

/// Single segment through the end points without error-driven splitting.
fn fit_single(points: &[Point2], left: Vector2, right: Vector2) -> CubicBezier {
    if points.len() == 2 {
        return heuristic_segment(points, left, right);
    }
    let u = chord_length_parameterise(points);
    generate_bezier(points, &u, left, right)
}

fn fit_recursive(points: &[Point2], left: Vector2, right: Vector2, fit_error: f64, out: &mut Vec<CubicBezier>) {
    if points.len() == 2 {
        out.push(heuristic_segment(points, left, right));
        return;
    }

    let mut u = chord_length_parameterise(points);
    let mut bezier = generate_bezier(points, &u, left, right);
    let (mut max_error, mut split) = compute_max_error(points, &bezier, &u);
    if max_error <= fit_error {
        out.push(bezier);
        return;
    }

    if max_error <= fit_error * REPARAMETERISE_FACTOR {
        for _ in 0..MAX_REPARAMETERISATIONS {
            u = reparameterise(points, &bezier, &u);
            bezier = generate_bezier(points, &u, left, right);
            (max_error, split) = compute_max_error(points, &bezier, &u);
            if max_error <= fit_error {
                out.push(bezier);
                return;
            }
        }
    }

    if split == 0 || split >= points.len() - 1 {
        out.push(bezier);
        return;
    }

    let center = center_tangent(points, split);
    fit_recursive(&points[..=split], left, center, fit_error, out);
    fit_recursive(&points[split..], -center, right, fit_error, out);
}

/// Handles at a third of the chord along the end tangents.
fn heuristic_segment(points: &[Point2], left: Vector2, right: Vector2) -> CubicBezier {
    let first = points[0];
    let last = points[points.len() - 1];
    let dist = first.distance(last) / 3.0;
    CubicBezier::new(first, first + left * dist, last + right * dist, last)
}

fn chord_length_parameterise(points: &[Point2]) -> Vec<f64> {
    let mut u = Vec::with_capacity(points.len());
    u.push(0.0);
    for w in points.windows(2) {
        let prev = u[u.len() - 1];
        u.push(prev + w[0].distance(w[1]));
    }
    let total = u[u.len() - 1];
    if total > 0.0 {
        u.iter_mut().for_each(|v| *v /= total);
    }
    u
}

fn bernstein(t: f64) -> [f64; 4] {
    let mt = 1.0 - t;
    [mt * mt * mt, 3.0 * t * mt * mt, 3.0 * t * t * mt, t * t * t]
}

/// Least-squares handle lengths along the fixed end tangents.
fn generate_bezier(points: &[Point2], u: &[f64], left: Vector2, right: Vector2) -> CubicBezier {
    let first = points[0];
    let last = points[points.len() - 1];

    let mut c = Matrix2::<f64>::zeros();
    let mut x = NVector2::<f64>::zeros();
    for (&p, &t) in points.iter().zip(u) {
        let b = bernstein(t);
        let a0 = left * b[1];
        let a1 = right * b[2];
        c[(0, 0)] += a0.dot(a0);
        c[(0, 1)] += a0.dot(a1);
        c[(1, 1)] += a1.dot(a1);
        let tmp = p - (first * (b[0] + b[1]) + last * (b[2] + b[3]));
        x[0] += a0.dot(tmp);
        x[1] += a1.dot(tmp);
    }
    c[(1, 0)] = c[(0, 1)];

    let seg_length = first.distance(last);
    let epsilon = 1e-6 * seg_length;
    let alpha = c
        .lu()
        .solve(&x)
        .filter(|a| a.iter().all(|v| v.is_finite() && *v >= epsilon));

    match alpha {
        Some(a) => CubicBezier::new(first, first + left * a[0], last + right * a[1], last),
        None => heuristic_segment(points, left, right),
    }
}

/// Largest point-to-curve distance and the index where it occurs.
fn compute_max_error(points: &[Point2], bezier: &CubicBezier, u: &[f64]) -> (f64, usize) {
    let mut split = points.len() / 2;
    let mut max = 0.0;
    for (i, (&p, &t)) in points.iter().zip(u).enumerate().skip(1).take(points.len().saturating_sub(2)) {
        let d = bezier.point_at(t).distance(p);
        if d > max {
            max = d;
            split = i;
        }
    }
    (max, split)
}

/// One Newton-Raphson step per parameter towards the closest curve point.
fn reparameterise(points: &[Point2], bezier: &CubicBezier, u: &[f64]) -> Vec<f64> {
    points
        .iter()
        .zip(u)
        .map(|(&p, &t)| {
            let diff = bezier.point_at(t) - p;
            let d1 = bezier.tangent_at(t);
            let d2 = bezier.second_derivative_at(t);
            let denominator = d1.dot(d1) + diff.dot(d2);
            if denominator.abs() < 1e-12 {
                t
            } else {
                (t - diff.dot(d1) / denominator).clamp(0.0, 1.0)
            }
        })
        .collect()
}

fn center_tangent(points: &[Point2], split: usize) -> Vector2 {
    unit(points[split - 1] - points[split + 1])
        .or_else(|| unit(points[split - 1] - points[split]))
        .unwrap_or_else(|| {
            let chord = points[points.len() - 1] - points[0];
            unit(-chord).unwrap_or(Vector2::X)
        })
}
