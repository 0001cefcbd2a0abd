//! Composite cubic Bezier curve fitted to a path.

use ink_core::GeometryError;
use ink_math::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::{fit_cubic_beziers, CubicBezier, ParametricCurve};
use crate::command::PathCommand;
use crate::path::Path;
use crate::GeometryResult;

/// Side of the construction curve an offset is taken on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffsetDirection {
    /// Along `+normal`; points keep the curve's order.
    Upper,
    /// Along `-normal`; points are reversed.
    Lower,
}

impl OffsetDirection {
    fn sign(self) -> f64 {
        match self {
            OffsetDirection::Upper => 1.0,
            OffsetDirection::Lower => -1.0,
        }
    }
}

/// A chain of cubic Bezier segments, each starting where the previous ends.
///
/// Parameterised over `[0, n]` for `n` segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    segments: Vec<CubicBezier>,
}

impl Curve {
    /// Fit a curve to `points` within `fit_error` pixels.
    pub fn fit(points: &[Point2], fit_error: f64) -> GeometryResult<Self> {
        Ok(Self {
            segments: fit_cubic_beziers(points, fit_error)?,
        })
    }

    pub fn segments(&self) -> &[CubicBezier] {
        &self.segments
    }

    pub fn start_point(&self) -> Point2 {
        self.segments[0].p0
    }

    pub fn end_point(&self) -> Point2 {
        self.segments[self.segments.len() - 1].p3
    }

    pub fn move_command(&self) -> PathCommand {
        PathCommand::MoveTo(self.start_point())
    }

    /// The cubic commands without the leading move.
    pub fn curve_commands(&self) -> Vec<PathCommand> {
        self.segments
            .iter()
            .map(|s| PathCommand::CubicTo {
                ctrl1: s.p1,
                ctrl2: s.p2,
                to: s.p3,
            })
            .collect()
    }

    pub fn commands(&self) -> Vec<PathCommand> {
        std::iter::once(self.move_command())
            .chain(self.curve_commands())
            .collect()
    }

    /// Sample the curve every `sampling_interval` pixels and displace each
    /// sample along the unit normal by the thickness `reference` holds at its
    /// nearest point.
    ///
    /// Every segment is sampled on `[0, 1)` with parametric step
    /// `interval / segment_length`; the last segment also contributes its end
    /// point. Lower offsets come back reversed. The result is not refitted.
    pub fn offset(&self, sampling_interval: f64, reference: &Path, direction: OffsetDirection) -> GeometryResult<Path> {
        if reference.offset_vector().is_none() {
            return Err(GeometryError::MissingOffsetVector);
        }
        let sign = direction.sign();
        let last = self.segments.len() - 1;

        let mut points = Vec::new();
        for (i, segment) in self.segments.iter().enumerate() {
            let length = segment.length();
            let step = if length > 0.0 && sampling_interval > 0.0 {
                sampling_interval / length
            } else {
                1.0
            };

            let mut t = 0.0;
            while t < 1.0 {
                points.extend(displaced(segment, t, reference, sign));
                t += step;
            }
            if i == last {
                points.extend(displaced(segment, 1.0, reference, sign));
            }
        }

        if direction == OffsetDirection::Lower {
            points.reverse();
        }
        Ok(Path::new(points))
    }
}

fn displaced(segment: &CubicBezier, t: f64, reference: &Path, sign: f64) -> Option<Point2> {
    let p = segment.point_at(t);
    let normal: Vector2 = segment.normal_at(t)?;
    let thickness = reference.thickness_at(p)?;
    Some(p + normal * thickness * sign)
}

impl ParametricCurve for Curve {
    fn point_at(&self, t: f64) -> Point2 {
        let (segment, local) = self.locate(t);
        self.segments[segment].point_at(local)
    }

    fn tangent_at(&self, t: f64) -> Vector2 {
        let (segment, local) = self.locate(t);
        self.segments[segment].tangent_at(local)
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, self.segments.len() as f64)
    }
}

impl Curve {
    fn locate(&self, t: f64) -> (usize, f64) {
        let n = self.segments.len();
        let t = t.clamp(0.0, n as f64);
        let segment = (t.floor() as usize).min(n - 1);
        (segment, t - segment as f64)
    }
}
