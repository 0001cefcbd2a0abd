//! The path-to-ribbon pipeline shared by the line-based generators.

use ink_core::{GeometryError, Settings, ThicknessWeights};
use ink_geometry::{Curve, GeometryResult, OffsetDirection, Path, Stroke, Surface};
use ink_raster::Raster;
use log::debug;
use rayon::prelude::*;

/// Per-class inputs of the ribbon pipeline.
#[derive(Clone, Copy)]
pub(crate) struct RibbonStyle<'a> {
    pub weights: &'a ThicknessWeights,
    pub curvature_channel: &'a Raster,
}

/// Turn one raw path into a variable-width ribbon stroke.
///
/// `round -> bump -> remove_duplicates -> simple_cull -> compute_offset_vector
/// -> simplify -> fit`, then each side is offset from the fitted curve,
/// simplified and refitted before the two sides are joined.
pub(crate) fn ribbon_stroke(path: &Path, surface: &Surface, settings: &Settings, style: RibbonStyle<'_>) -> GeometryResult<Stroke> {
    let culled = path
        .round()
        .bump(surface)
        .remove_duplicates()
        .simple_cull(settings.cull_factor);
    if culled.len() < 2 {
        return Err(GeometryError::TooFewPoints {
            needed: 2,
            got: culled.len(),
        });
    }

    let reference = culled.compute_offset_vector(surface, style.weights, style.curvature_channel);
    let spine = Curve::fit(reference.simplify(settings.optimise_factor).points(), settings.curve_fit_error)?;

    let side = |direction| -> GeometryResult<Curve> {
        let offset = spine.offset(settings.curve_sampling_interval, &reference, direction)?;
        Curve::fit(offset.simplify(settings.optimise_factor).points(), settings.curve_fit_error)
    };
    let upper = side(OffsetDirection::Upper)?;
    let lower = side(OffsetDirection::Lower)?;
    Ok(Stroke::new(&upper, &lower))
}

/// Ribbons for every path, in path order. Paths that fail are skipped.
pub(crate) fn ribbon_strokes(paths: &[Path], surface: &Surface, settings: &Settings, style: RibbonStyle<'_>) -> Vec<Stroke> {
    paths
        .par_iter()
        .filter_map(|path| match ribbon_stroke(path, surface, settings, style) {
            Ok(stroke) => Some(stroke),
            Err(err) => {
                debug!("Skipping path of {} points: {}", path.len(), err);
                None
            }
        })
        .collect()
}
