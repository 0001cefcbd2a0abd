//! Outline of the subject's mask.

use ink_core::{GeometryError, Settings};
use ink_geometry::{Path, Surface};
use ink_raster::{find_contours, Raster};
use log::{debug, info, warn};

use crate::generator::{Clip, ClipPath, StrokeClass, StrokeGenerator, StrokeSet};
use crate::ribbon::{ribbon_strokes, RibbonStyle};

/// Iso-level of the object mask traced as the silhouette.
pub const SILHOUETTE_LEVEL: f64 = 0.99;

/// The longest contour of the object mask.
///
/// Other contours are dropped, which loses holes and disjoint parts of
/// self-occluding subjects.
pub fn silhouette_contour(surface: &Surface) -> Option<Path> {
    let contours = find_contours(surface.object(), SILHOUETTE_LEVEL);
    if contours.len() > 1 {
        debug!("Keeping the longest of {} silhouette contours", contours.len());
    }
    contours.into_iter().max_by_key(Vec::len).map(Path::new)
}

/// The rounded, bumped and de-duplicated silhouette polygon.
pub fn silhouette_boundary(surface: &Surface) -> Option<ClipPath> {
    let contour = silhouette_contour(surface)?;
    let boundary = contour.round().bump(surface).remove_duplicates();
    (boundary.len() >= 3).then(|| ClipPath::new(boundary.into_points()))
}

/// Split `path` at the corners of `corner_field`. A path without corners is
/// returned whole.
pub(crate) fn split_at_corners(path: &Path, corner_field: &Raster, settings: &Settings) -> Vec<Path> {
    let corners = path.find_corners(corner_field, settings.harris_min_distance, settings.subpix_window_size);
    path.split_corners(&corners)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Silhouette;

impl StrokeGenerator for Silhouette {
    fn class(&self) -> StrokeClass {
        StrokeClass::Silhouette
    }

    fn generate(&self, surface: &Surface, settings: &Settings, _boundary: Option<&ClipPath>) -> StrokeSet {
        let Some(contour) = silhouette_contour(surface) else {
            warn!("Silhouette: {}", GeometryError::EmptyContour);
            return StrokeSet::empty(self.class());
        };

        let edges = split_at_corners(&contour, surface.object(), settings);
        let style = RibbonStyle {
            weights: &settings.silhouette_thickness,
            curvature_channel: surface.normal_x(),
        };
        let strokes = ribbon_strokes(&edges, surface, settings, style);
        info!("Silhouette: {} stroke(s) from {} edge path(s)", strokes.len(), edges.len());
        StrokeSet::new(self.class(), strokes, Clip::None)
    }
}
