pub mod aabb;
pub mod segment;
pub mod transform;

pub use glam::{dvec2, DAffine2, DMat2, DVec2};
pub use aabb::Aabb2;
pub use transform::Transform2;

pub type Point2 = DVec2;
pub type Vector2 = DVec2;
