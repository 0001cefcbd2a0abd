//! Vector drawing commands in pixel space.

use std::fmt::Write;

use ink_math::{Point2, Transform2};
use serde::{Deserialize, Serialize};

/// One drawing command of a fillable outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(Point2),
    LineTo(Point2),
    CubicTo {
        ctrl1: Point2,
        ctrl2: Point2,
        to: Point2,
    },
    /// Elliptical arc with SVG endpoint parameterisation.
    ArcTo {
        rx: f64,
        ry: f64,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Point2,
    },
    Close,
}

impl PathCommand {
    /// The pen position after this command, `None` for `Close`.
    pub fn end_point(&self) -> Option<Point2> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::CubicTo { to, .. } | PathCommand::ArcTo { to, .. } => Some(to),
            PathCommand::Close => None,
        }
    }

    /// This command moved by a rigid transform. Radii and arc flags are
    /// unchanged.
    pub fn transformed(&self, transform: &Transform2) -> Self {
        let t = |p: Point2| transform.transform_point(p);
        match *self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(t(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(t(p)),
            PathCommand::CubicTo { ctrl1, ctrl2, to } => PathCommand::CubicTo {
                ctrl1: t(ctrl1),
                ctrl2: t(ctrl2),
                to: t(to),
            },
            PathCommand::ArcTo {
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                to,
            } => PathCommand::ArcTo {
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                to: t(to),
            },
            PathCommand::Close => PathCommand::Close,
        }
    }

    /// Append this command in SVG path-data syntax.
    pub fn write_svg(&self, out: &mut String) {
        // Writing into a String cannot fail.
        let _ = match *self {
            PathCommand::MoveTo(p) => write!(out, "M{} {}", fmt(p.x), fmt(p.y)),
            PathCommand::LineTo(p) => write!(out, "L{} {}", fmt(p.x), fmt(p.y)),
            PathCommand::CubicTo { ctrl1, ctrl2, to } => write!(
                out,
                "C{} {} {} {} {} {}",
                fmt(ctrl1.x),
                fmt(ctrl1.y),
                fmt(ctrl2.x),
                fmt(ctrl2.y),
                fmt(to.x),
                fmt(to.y)
            ),
            PathCommand::ArcTo {
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                to,
            } => write!(
                out,
                "A{} {} {} {} {} {} {}",
                fmt(rx),
                fmt(ry),
                fmt(rotation),
                large_arc as u8,
                sweep as u8,
                fmt(to.x),
                fmt(to.y)
            ),
            PathCommand::Close => write!(out, "Z"),
        };
    }
}

/// SVG path data (`d` attribute) for a command sequence.
pub fn to_svg_path_data(commands: &[PathCommand]) -> String {
    let mut out = String::new();
    for (i, command) in commands.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        command.write_svg(&mut out);
    }
    out
}

/// Three decimals, trailing zeros stripped.
fn fmt(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "" | "-0" => "0".to_string(),
        _ => s.to_string(),
    }
}
