//! Runs the enabled generators over a surface and collects their layers.

use ink_core::traits::Validate;
use ink_core::{Result, Settings};
use ink_geometry::Surface;
use log::{info, warn};

use crate::document::Document;
use crate::generator::StrokeGenerator;
use crate::generators::{silhouette_boundary, InternalEdges, Silhouette, Stipples, Streamlines};

/// An ordered list of generators. Layers are drawn in list order.
pub struct Illustrator {
    generators: Vec<Box<dyn StrokeGenerator>>,
}

impl Illustrator {
    pub fn new(generators: Vec<Box<dyn StrokeGenerator>>) -> Self {
        Self { generators }
    }

    /// The generators enabled in `settings`: silhouette, internal edges,
    /// streamlines, then stipples.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut generators: Vec<Box<dyn StrokeGenerator>> = Vec::new();
        if settings.enable_silhouette {
            generators.push(Box::new(Silhouette));
        }
        if settings.enable_internal_edges {
            generators.push(Box::new(InternalEdges));
        }
        if settings.enable_streamlines {
            generators.push(Box::new(Streamlines));
        }
        if settings.enable_stipples {
            generators.push(Box::new(Stipples::from_settings(settings)));
        }
        Self::new(generators)
    }

    pub fn generators(&self) -> &[Box<dyn StrokeGenerator>] {
        &self.generators
    }

    /// Illustrate `surface`.
    ///
    /// Fails only on invalid settings. Generators that find nothing to draw
    /// contribute an empty layer.
    pub fn illustrate(&self, surface: &Surface, settings: &Settings) -> Result<Document> {
        settings.validate()?;

        let boundary = silhouette_boundary(surface);
        if boundary.is_none() {
            warn!("Surface has no silhouette; layers will not be clipped");
        }

        let layers: Vec<_> = self
            .generators
            .iter()
            .map(|generator| generator.generate(surface, settings, boundary.as_ref()))
            .collect();
        info!(
            "Illustrated {}x{} surface: {} stroke(s) in {} layer(s)",
            surface.width(),
            surface.height(),
            layers.iter().map(|l| l.len()).sum::<usize>(),
            layers.len()
        );

        Ok(Document {
            width: surface.width(),
            height: surface.height(),
            stroke_colour: settings.stroke_colour.clone(),
            layers,
            clip_path: boundary,
        })
    }
}
