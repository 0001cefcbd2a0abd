//! Curve traits and implementations.

mod bezier;
mod composite;
mod fit;

use ink_math::{Point2, Vector2};

pub use bezier::CubicBezier;
pub use composite::{Curve, OffsetDirection};
pub use fit::fit_cubic_beziers;

/// Trait for parametric curves in the image plane.
pub trait ParametricCurve: Send + Sync {
    /// Evaluate the curve at parameter `t`.
    fn point_at(&self, t: f64) -> Point2;

    /// Evaluate the tangent vector at parameter `t`.
    fn tangent_at(&self, t: f64) -> Vector2;

    /// Return the parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);

    /// Whether the curve is closed (start == end).
    fn is_closed(&self) -> bool {
        let (t0, t1) = self.domain();
        self.point_at(t0).distance(self.point_at(t1)) < ink_core::Tolerance::DEFAULT_LINEAR
    }
}
