//! Single cubic Bezier segment.

use ink_math::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::ParametricCurve;
use crate::tessellate::curve_to_polyline;

/// Chord tolerance (px) used when measuring arc length.
const LENGTH_TOLERANCE: f64 = 0.01;

/// A cubic Bezier from `p0` to `p3` with handles `p1` and `p2`, over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub p0: Point2,
    pub p1: Point2,
    pub p2: Point2,
    pub p3: Point2,
}

impl CubicBezier {
    pub fn new(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Second derivative at `t`.
    pub fn second_derivative_at(&self, t: f64) -> Vector2 {
        let a = self.p2 - 2.0 * self.p1 + self.p0;
        let b = self.p3 - 2.0 * self.p2 + self.p1;
        6.0 * ((1.0 - t) * a + t * b)
    }

    /// Unit normal `(t.y, -t.x) / |t|` at `t`.
    ///
    /// Falls back to the chord direction where the derivative vanishes (a
    /// handle coincident with its endpoint); `None` for a point-like segment.
    pub fn normal_at(&self, t: f64) -> Option<Vector2> {
        let mut tangent = self.tangent_at(t);
        if tangent.length_squared() < 1e-18 {
            tangent = self.p3 - self.p0;
        }
        let len = tangent.length();
        if len < 1e-9 {
            return None;
        }
        Some(Vector2::new(tangent.y, -tangent.x) / len)
    }

    /// Approximate arc length.
    pub fn length(&self) -> f64 {
        curve_to_polyline(self, LENGTH_TOLERANCE)
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }
}

impl ParametricCurve for CubicBezier {
    fn point_at(&self, t: f64) -> Point2 {
        let mt = 1.0 - t;
        mt * mt * mt * self.p0
            + 3.0 * mt * mt * t * self.p1
            + 3.0 * mt * t * t * self.p2
            + t * t * t * self.p3
    }

    fn tangent_at(&self, t: f64) -> Vector2 {
        let mt = 1.0 - t;
        3.0 * mt * mt * (self.p1 - self.p0)
            + 6.0 * mt * t * (self.p2 - self.p1)
            + 3.0 * t * t * (self.p3 - self.p2)
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}
