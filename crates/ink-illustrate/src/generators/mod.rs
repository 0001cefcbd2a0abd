//! The four stroke generators, in drawing order.

pub mod internal_edges;
pub mod silhouette;
pub mod stipples;
pub mod streamlines;

pub use internal_edges::{discontinuity_field, InternalEdges};
pub use silhouette::{silhouette_boundary, silhouette_contour, Silhouette};
pub use stipples::{reference_field, Stipples};
pub use streamlines::{iso_levels, Streamlines};
