//! Iso-parametric hatching along the subject's U and V directions.

use ink_core::{GeometryError, Settings};
use ink_geometry::{Path, Surface};
use ink_raster::{find_contours, Raster};
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::generator::{Clip, ClipPath, StrokeClass, StrokeGenerator, StrokeSet};
use crate::ribbon::{ribbon_strokes, RibbonStyle};

/// `segments - 1` evenly spaced levels strictly between `min` and `max`.
pub fn iso_levels(min: f64, max: f64, segments: usize) -> Vec<f64> {
    if !(max > min) || segments < 2 {
        return Vec::new();
    }
    let step = (max - min) / segments as f64;
    (1..segments).map(|k| min + k as f64 * step).collect()
}

/// One family of streamlines: contours of `primary`, trimmed against `secondary`.
struct Family<'a> {
    name: &'static str,
    primary: &'a Raster,
    secondary: &'a Raster,
    curvature_channel: &'a Raster,
}

impl Family<'_> {
    /// Trimmed runs of every iso-contour, level by level.
    fn paths(&self, surface: &Surface, settings: &Settings) -> Vec<Path> {
        let Some((min, max)) = self.primary.min_max() else {
            return Vec::new();
        };
        iso_levels(min, max, settings.streamline_segments)
            .par_iter()
            .flat_map_iter(|&level| {
                find_contours(self.primary, level)
                    .into_iter()
                    .filter(|c| c.len() >= settings.streamline_min_points)
                    .flat_map(move |contour| {
                        let path = Path::new(contour).round().bump(surface);
                        let (primary_band, secondary_band) =
                            (settings.uv_primary_trim_size, settings.uv_secondary_trim_size);
                        // De-duplication drops the closing point of a loop.
                        if path.is_closed() {
                            path.remove_duplicates()
                                .trim_loop_by_band(level, self.primary, self.secondary, primary_band, secondary_band)
                        } else {
                            path.remove_duplicates()
                                .trim_by_band(level, self.primary, self.secondary, primary_band, secondary_band)
                        }
                    })
                    .filter(|run| run.len() >= 2)
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Streamlines;

impl StrokeGenerator for Streamlines {
    fn class(&self) -> StrokeClass {
        StrokeClass::Streamlines
    }

    fn generate(&self, surface: &Surface, settings: &Settings, _boundary: Option<&ClipPath>) -> StrokeSet {
        let families = [
            Family {
                name: "u",
                primary: surface.u(),
                secondary: surface.v(),
                curvature_channel: surface.normal_x(),
            },
            Family {
                name: "v",
                primary: surface.v(),
                secondary: surface.u(),
                curvature_channel: surface.normal_y(),
            },
        ];

        let mut strokes = Vec::new();
        for family in &families {
            let paths = family.paths(surface, settings);
            debug!("Streamlines: {} {}-path(s)", paths.len(), family.name);
            let style = RibbonStyle {
                weights: &settings.streamline_thickness,
                curvature_channel: family.curvature_channel,
            };
            strokes.extend(ribbon_strokes(&paths, surface, settings, style));
        }

        if strokes.is_empty() {
            warn!("Streamlines: {}", GeometryError::EmptyContour);
            return StrokeSet::empty(self.class());
        }
        info!("Streamlines: {} stroke(s)", strokes.len());
        StrokeSet::new(self.class(), strokes, Clip::Group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SphereScene;
    use approx::assert_relative_eq;

    fn settings() -> Settings {
        Settings {
            cull_factor: 4,
            optimise_factor: 1.0,
            curve_sampling_interval: 5.0,
            streamline_segments: 4,
            uv_primary_trim_size: 0.02,
            ..Settings::default()
        }
    }

    #[test]
    fn test_iso_levels() {
        let levels = iso_levels(0.0, 1.0, 4);
        assert_eq!(levels.len(), 3);
        for (level, expected) in levels.iter().zip([0.25, 0.5, 0.75]) {
            assert_relative_eq!(*level, expected, epsilon = 1e-12);
        }
        assert!(iso_levels(0.5, 0.5, 4).is_empty());
        assert!(iso_levels(0.0, 1.0, 1).is_empty());
    }

    #[test]
    fn test_family_runs_follow_level() {
        let surface = SphereScene::new(96, 40.0).surface().unwrap();
        let settings = settings();
        let family = Family {
            name: "u",
            primary: surface.u(),
            secondary: surface.v(),
            curvature_channel: surface.normal_x(),
        };
        let (min, max) = surface.u().min_max().unwrap();
        let levels = iso_levels(min, max, 4);
        let paths = family.paths(&surface, &settings);
        assert!(!paths.is_empty());
        for path in &paths {
            assert!(path.len() >= 2);
            for &p in path.points() {
                let u = surface.sample(surface.u(), p).unwrap();
                let near_level = levels.iter().any(|l| (u - l).abs() <= 0.02);
                assert!(near_level, "u = {u} at {p:?}");
            }
        }
    }

    #[test]
    fn test_closed_iso_loop_keeps_run_through_start() {
        let n = 10;
        let mut u = Raster::from_fn(n, n, |x, y| {
            if x == 0 || y == 0 || x == n - 1 || y == n - 1 {
                0.0
            } else {
                x as f64 / (n - 1) as f64
            }
        });
        u.set(3, 5, 0.9);
        let v = Raster::from_fn(n, n, |_, y| y as f64 / (n - 1) as f64);
        let surface = Surface::new(ink_geometry::SurfaceChannels {
            object: Raster::new(n, n, 1.0),
            depth: Raster::new(n, n, 0.5),
            diffuse_direct: Raster::new(n, n, 0.5),
            normal_x: Raster::new(n, n, 0.0),
            normal_y: Raster::new(n, n, 0.0),
            normal_z: Raster::new(n, n, 1.0),
            u,
            v,
            shadow: None,
            ambient_occlusion: None,
        })
        .unwrap();
        // Levels 0.1, 0.2, ... 0.8 with bands of 0.1 either way.
        let settings = Settings {
            streamline_segments: 9,
            uv_primary_trim_size: 0.1,
            uv_secondary_trim_size: 0.1,
            ..Settings::default()
        };
        let family = Family {
            name: "u",
            primary: surface.u(),
            secondary: surface.v(),
            curvature_channel: surface.normal_x(),
        };
        let runs: Vec<Vec<(f64, f64)>> = family
            .paths(&surface, &settings)
            .iter()
            .map(|p| p.points().iter().map(|q| (q.x, q.y)).collect())
            .collect();

        let joined = vec![(3.0, 4.0), (4.0, 4.0), (4.0, 3.0), (4.0, 2.0), (4.0, 1.0)];
        assert!(runs.contains(&joined), "{runs:?}");
        assert!(!runs.contains(&joined[..4].to_vec()));
    }

    #[test]
    fn test_sphere_streamlines() {
        let surface = SphereScene::new(96, 40.0).surface().unwrap();
        let set = Streamlines.generate(&surface, &settings(), None);
        assert_eq!(set.class, StrokeClass::Streamlines);
        assert_eq!(set.clip, Clip::Group);
        assert!(set.len() >= 2);
        assert!(set.strokes.iter().all(|s| s.is_closed(1e-9)));
    }

    #[test]
    fn test_constant_uv_gives_empty_set() {
        let mut channels = SphereScene::new(32, 12.0).channels();
        channels.u = Raster::new(32, 32, 0.5);
        channels.v = Raster::new(32, 32, 0.5);
        let surface = Surface::new(channels).unwrap();
        assert!(Streamlines.generate(&surface, &settings(), None).is_empty());
    }
}
