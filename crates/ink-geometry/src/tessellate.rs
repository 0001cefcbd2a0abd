//! Flattening of curves and drawing commands into polylines.

use std::f64::consts::{PI, TAU};

use ink_math::{Point2, Vector2};

use crate::command::PathCommand;
use crate::curve::{CubicBezier, ParametricCurve};

/// Minimum recursion depth, so inflected segments are not mistaken for chords.
const MIN_DEPTH: u32 = 2;

/// Maximum recursion depth for adaptive subdivision.
const MAX_DEPTH: u32 = 12;

/// Upper bound on the number of chords used for one arc.
const MAX_ARC_SEGMENTS: usize = 256;

/// Convert a curve to a polyline using adaptive subdivision.
///
/// Segments are recursively halved where the midpoint deviates from the chord
/// by more than `tolerance`.
pub fn curve_to_polyline(curve: &dyn ParametricCurve, tolerance: f64) -> Vec<Point2> {
    let (t_min, t_max) = curve.domain();
    let mut points = vec![curve.point_at(t_min)];
    subdivide_curve(curve, t_min, t_max, tolerance, &mut points, 0);
    points
}

fn subdivide_curve(
    curve: &dyn ParametricCurve,
    t0: f64,
    t1: f64,
    tolerance: f64,
    points: &mut Vec<Point2>,
    depth: u32,
) {
    if depth >= MAX_DEPTH {
        points.push(curve.point_at(t1));
        return;
    }

    let t_mid = (t0 + t1) * 0.5;
    let chord_mid = (curve.point_at(t0) + curve.point_at(t1)) * 0.5;
    let deviation = (curve.point_at(t_mid) - chord_mid).length();

    if depth < MIN_DEPTH || deviation > tolerance {
        subdivide_curve(curve, t0, t_mid, tolerance, points, depth + 1);
        subdivide_curve(curve, t_mid, t1, tolerance, points, depth + 1);
    } else {
        points.push(curve.point_at(t1));
    }
}

/// Flatten a command sequence into closed polylines, one per sub-path.
///
/// Arcs are treated as circular with radius `rx`, scaled up when too small
/// to span their endpoints.
pub fn commands_to_polylines(commands: &[PathCommand], tolerance: f64) -> Vec<Vec<Point2>> {
    let mut polylines: Vec<Vec<Point2>> = Vec::new();
    let mut current: Vec<Point2> = Vec::new();
    let mut pen = Point2::ZERO;

    for command in commands {
        match *command {
            PathCommand::MoveTo(p) => {
                if current.len() > 1 {
                    polylines.push(std::mem::take(&mut current));
                }
                current = vec![p];
                pen = p;
            }
            PathCommand::LineTo(p) => {
                current.push(p);
                pen = p;
            }
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                let segment = CubicBezier::new(pen, ctrl1, ctrl2, to);
                current.extend(curve_to_polyline(&segment, tolerance).into_iter().skip(1));
                pen = to;
            }
            PathCommand::ArcTo {
                rx,
                large_arc,
                sweep,
                to,
                ..
            } => {
                current.extend(flatten_arc(pen, to, rx, large_arc, sweep, tolerance));
                pen = to;
            }
            PathCommand::Close => {
                if current.len() > 1 {
                    polylines.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if current.len() > 1 {
        polylines.push(current);
    }
    polylines
}

/// Points after `from` along a circular SVG arc, ending exactly at `to`.
fn flatten_arc(from: Point2, to: Point2, radius: f64, large_arc: bool, sweep: bool, tolerance: f64) -> Vec<Point2> {
    let chord = to - from;
    let d = chord.length();
    if d < 1e-12 {
        return Vec::new();
    }
    let r = radius.abs().max(d * 0.5);
    let h = (r * r - d * d * 0.25).max(0.0).sqrt();
    let dir = chord / d;
    let perp = Vector2::new(-dir.y, dir.x);
    let sign = if large_arc != sweep { 1.0 } else { -1.0 };
    let center = (from + to) * 0.5 + perp * (h * sign);

    let start = (from - center).to_angle();
    let mut delta = (to - center).to_angle() - start;
    if sweep && delta < 0.0 {
        delta += TAU;
    } else if !sweep && delta > 0.0 {
        delta -= TAU;
    }

    let step = if tolerance < r {
        2.0 * (1.0 - tolerance / r).acos()
    } else {
        PI / 2.0
    };
    let n = ((delta.abs() / step).ceil() as usize).clamp(1, MAX_ARC_SEGMENTS);

    let mut points: Vec<Point2> = (1..n)
        .map(|i| center + Vector2::from_angle(start + delta * i as f64 / n as f64) * r)
        .collect();
    points.push(to);
    points
}
