use crate::{DAffine2, Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Rigid 2D transform (rotation + translation, no shear/scale).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform2 {
    pub matrix: [f64; 6],
}

impl Transform2 {
    pub fn from_translation(t: Vector2) -> Self {
        Self::from_affine(DAffine2::from_translation(t))
    }

    /// Rotation by `angle` radians about `center`.
    pub fn from_rotation_about(center: Point2, angle: f64) -> Self {
        let affine = DAffine2::from_translation(center)
            * DAffine2::from_angle(angle)
            * DAffine2::from_translation(-center);
        Self::from_affine(affine)
    }

    pub fn from_affine(a: DAffine2) -> Self {
        Self {
            matrix: a.to_cols_array(),
        }
    }

    pub fn to_affine(&self) -> DAffine2 {
        DAffine2::from_cols_array(&self.matrix)
    }

    pub fn transform_point(&self, p: Point2) -> Point2 {
        self.to_affine().transform_point2(p)
    }

    /// Apply `self` first, then `other`.
    pub fn then(&self, other: &Transform2) -> Transform2 {
        Self::from_affine(other.to_affine() * self.to_affine())
    }
}
