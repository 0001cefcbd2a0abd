//! InkEngine illustration: stroke generators over a rendered surface and
//! the vector document they produce.
//!
//! ```no_run
//! use ink_core::Settings;
//! use ink_illustrate::{synthetic::SphereScene, Illustrator};
//!
//! let settings = Settings::default();
//! let surface = SphereScene::default().surface()?;
//! let document = Illustrator::from_settings(&settings).illustrate(&surface, &settings)?;
//! document.export_svg(std::path::Path::new("sphere.svg"))?;
//! # Ok::<(), ink_core::InkError>(())
//! ```

pub mod document;
pub mod generator;
pub mod generators;
pub mod illustrator;
mod ribbon;
pub mod synthetic;

pub use document::Document;
pub use generator::{Clip, ClipPath, StrokeClass, StrokeGenerator, StrokeSet};
pub use generators::{InternalEdges, Silhouette, Stipples, Streamlines};
pub use illustrator::Illustrator;
