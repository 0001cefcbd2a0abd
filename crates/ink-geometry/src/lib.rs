//! InkEngine geometry: surfaces, paths, Bezier curves, strokes, and point placement.

pub mod command;
pub mod curve;
pub mod path;
pub mod placement;
pub mod stroke;
pub mod surface;
pub mod tessellate;

pub use command::PathCommand;
pub use curve::{CubicBezier, Curve, OffsetDirection, ParametricCurve};
pub use path::Path;
pub use placement::{PointPlacer, PoissonDiskPlacer};
pub use stroke::Stroke;
pub use surface::{Surface, SurfaceChannels, SurfaceSample};

/// Result of a fallible geometry stage.
pub type GeometryResult<T> = std::result::Result<T, ink_core::GeometryError>;
