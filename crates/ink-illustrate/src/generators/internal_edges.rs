//! Creases and occluding folds inside the silhouette.

use ink_core::{GeometryError, Settings};
use ink_geometry::{Path, Surface};
use ink_raster::{find_contours, gradient_magnitude, Raster};
use log::{debug, info, warn};

use super::silhouette::split_at_corners;
use crate::generator::{Clip, ClipPath, StrokeClass, StrokeGenerator, StrokeSet};
use crate::ribbon::{ribbon_strokes, RibbonStyle};

/// Whether `(x, y)` and all eight of its neighbours are on the subject.
fn neighbourhood_inside(mask: &Raster, x: usize, y: usize) -> bool {
    (-1..=1).all(|dy| {
        (-1..=1).all(|dx| {
            mask.get_checked(x as i64 + dx, y as i64 + dy)
                .is_some_and(|v| v != 0.0)
        })
    })
}

/// Sobel magnitude of `channel` on the `interior` pixels, scaled so its
/// maximum there is 1. A flat channel stays zero.
fn normalised_gradient(channel: &Raster, interior: &Raster) -> Raster {
    let magnitude = gradient_magnitude(channel)
        .zip_map(interior, |g, inside| if inside != 0.0 { g } else { 0.0 });
    let Ok(magnitude) = magnitude else {
        return interior.map(|_| 0.0);
    };
    match magnitude.min_max() {
        Some((_, max)) if max > 0.0 => magnitude.map(|v| v / max),
        _ => magnitude,
    }
}

/// Per-pixel maximum of the normalised depth and diffuse gradients.
///
/// Only pixels whose whole 8-neighbourhood is on the subject are kept, so
/// the outline itself is never traced twice.
pub fn discontinuity_field(surface: &Surface) -> Raster {
    let mask = surface.object();
    let interior = Raster::from_fn(surface.width(), surface.height(), |x, y| {
        if neighbourhood_inside(mask, x, y) {
            1.0
        } else {
            0.0
        }
    });
    let depth = normalised_gradient(surface.depth(), &interior);
    let diffuse = normalised_gradient(surface.diffuse_direct(), &interior);
    Raster::from_fn(surface.width(), surface.height(), |x, y| depth.get(x, y).max(diffuse.get(x, y)))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InternalEdges;

impl StrokeGenerator for InternalEdges {
    fn class(&self) -> StrokeClass {
        StrokeClass::InternalEdges
    }

    fn generate(&self, surface: &Surface, settings: &Settings, _boundary: Option<&ClipPath>) -> StrokeSet {
        let threshold = settings.internal_edge_threshold;
        let field = discontinuity_field(surface);
        let contours: Vec<Path> = find_contours(&field, threshold)
            .into_iter()
            .filter(|c| c.len() >= settings.internal_edge_min_points)
            .map(Path::new)
            .collect();
        if contours.is_empty() {
            warn!("Internal edges: {}", GeometryError::EmptyContour);
            return StrokeSet::empty(self.class());
        }

        let edges_mask = field.map(|v| if v > threshold { 1.0 } else { 0.0 });
        let edges: Vec<Path> = contours
            .iter()
            .flat_map(|contour| split_at_corners(contour, &edges_mask, settings))
            .collect();
        debug!("Internal edges: {} contour(s) split into {} path(s)", contours.len(), edges.len());

        let style = RibbonStyle {
            weights: &settings.internal_edge_thickness,
            curvature_channel: surface.normal_x(),
        };
        let strokes = ribbon_strokes(&edges, surface, settings, style);
        info!("Internal edges: {} stroke(s)", strokes.len());
        StrokeSet::new(self.class(), strokes, Clip::Group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SphereScene;
    use ink_geometry::SurfaceChannels;

    fn step_surface() -> Surface {
        let (w, h) = (60, 60);
        let flat = Raster::new(w, h, 0.5);
        Surface::new(SurfaceChannels {
            object: Raster::new(w, h, 1.0),
            depth: Raster::from_fn(w, h, |x, _| if x < 30 { 0.2 } else { 0.8 }),
            diffuse_direct: flat.clone(),
            normal_x: Raster::new(w, h, 0.0),
            normal_y: Raster::new(w, h, 0.0),
            normal_z: Raster::new(w, h, 1.0),
            u: flat.clone(),
            v: flat,
            shadow: None,
            ambient_occlusion: None,
        })
        .unwrap()
    }

    fn settings() -> Settings {
        Settings {
            cull_factor: 4,
            optimise_factor: 1.0,
            curve_sampling_interval: 5.0,
            ..Settings::default()
        }
    }

    #[test]
    fn test_field_marks_depth_step() {
        let field = discontinuity_field(&step_surface());
        assert_eq!(field.get(29, 30), 1.0);
        assert_eq!(field.get(30, 30), 1.0);
        assert_eq!(field.get(10, 30), 0.0);
        // The image border has pixels off the raster in its neighbourhood.
        assert_eq!(field.get(29, 0), 0.0);
    }

    #[test]
    fn test_field_ignores_silhouette_rim() {
        let surface = SphereScene::new(48, 20.0).surface().unwrap();
        let field = discontinuity_field(&surface);
        let mask = surface.object();
        for y in 0..48 {
            for x in 0..48 {
                if field.get(x, y) > 0.0 {
                    assert!(neighbourhood_inside(mask, x, y), "({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_step_gives_clipped_stroke() {
        let set = InternalEdges.generate(&step_surface(), &settings(), None);
        assert_eq!(set.class, StrokeClass::InternalEdges);
        assert_eq!(set.clip, Clip::Group);
        assert!(!set.is_empty());
        for stroke in &set.strokes {
            assert!(stroke.is_closed(1e-9));
            for p in stroke.outline(0.1).iter().flatten() {
                assert!(p.x > 18.0 && p.x < 42.0, "{p:?}");
            }
        }
    }

    #[test]
    fn test_contour_length_filter_is_independent_of_streamlines() {
        let surface = step_surface();
        let long_streamlines = Settings {
            streamline_min_points: 10_000,
            ..settings()
        };
        assert!(!InternalEdges.generate(&surface, &long_streamlines, None).is_empty());

        let long_edges = Settings {
            internal_edge_min_points: 10_000,
            ..settings()
        };
        assert!(InternalEdges.generate(&surface, &long_edges, None).is_empty());
    }

    #[test]
    fn test_flat_surface_has_no_edges() {
        let mut channels = SphereScene::new(32, 12.0).channels();
        channels.depth = Raster::new(32, 32, 0.5);
        channels.diffuse_direct = Raster::new(32, 32, 0.5);
        let surface = Surface::new(channels).unwrap();
        assert!(discontinuity_field(&surface).data().iter().all(|&v| v == 0.0));
        assert!(InternalEdges.generate(&surface, &settings(), None).is_empty());
    }
}
