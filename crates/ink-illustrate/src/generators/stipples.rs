//! Teardrop stipples placed by lighting darkness and pointed along V.

use std::collections::HashSet;

use ink_core::{LightingWeights, Settings};
use ink_geometry::{PointPlacer, PoissonDiskPlacer, Stroke, Surface};
use ink_math::Point2;
use ink_raster::Raster;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::generator::{Clip, ClipPath, StrokeClass, StrokeGenerator, StrokeSet};

/// How dark the subject is at every pixel: shadowed, occluded or unlit areas
/// score high. Off-subject pixels are zero.
pub fn reference_field(surface: &Surface, weights: &LightingWeights) -> Raster {
    let mask = surface.object();
    let optional = |channel: Option<&Raster>, x, y| channel.map_or(1.0, |r: &Raster| r.get(x, y));
    Raster::from_fn(surface.width(), surface.height(), |x, y| {
        if mask.get(x, y) == 0.0 {
            return 0.0;
        }
        weights.shadow * (1.0 - optional(surface.shadow(), x, y))
            + weights.ambient_occlusion * (1.0 - optional(surface.ambient_occlusion(), x, y))
            + weights.diffuse * (1.0 - surface.diffuse_direct().get(x, y))
    })
}

/// Integer offsets whose distance from the origin rounds to `radius`.
fn ring_offsets(radius: f64) -> Vec<(i64, i64)> {
    let reach = radius.ceil() as i64 + 1;
    (-reach..=reach)
        .flat_map(|dy| (-reach..=reach).map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| ((dx as f64).hypot(dy as f64) - radius).abs() < 0.5)
        .collect()
}

/// The ring pixel a stipple at `node` points towards.
///
/// Candidates are on the subject with a larger `v` than the node. The one
/// closest in `u` wins, ties going to the larger `v`.
fn find_tail(surface: &Surface, node: Point2, ring: &[(i64, i64)]) -> Option<Point2> {
    let (u0, v0) = (surface.sample(surface.u(), node)?, surface.sample(surface.v(), node)?);
    let mut best: Option<(Point2, f64, f64)> = None;
    for &(dx, dy) in ring {
        let candidate = node + Point2::new(dx as f64, dy as f64);
        if !surface.is_valid(candidate) {
            continue;
        }
        let (Some(u), Some(v)) = (surface.sample(surface.u(), candidate), surface.sample(surface.v(), candidate)) else {
            continue;
        };
        if v <= v0 {
            continue;
        }
        let du = (u - u0).abs();
        let better = match best {
            None => true,
            Some((_, best_du, best_v)) => du < best_du || (du == best_du && v > best_v),
        };
        if better {
            best = Some((candidate, du, v));
        }
    }
    best.map(|(p, _, _)| p)
}

pub struct Stipples {
    placer: Box<dyn PointPlacer>,
}

impl Stipples {
    pub fn new(placer: Box<dyn PointPlacer>) -> Self {
        Self { placer }
    }

    /// Stipples placed by a [`PoissonDiskPlacer`] built from the stipple settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Box::new(PoissonDiskPlacer::from(&settings.stipple)))
    }

    /// Pixel nodes dark enough to carry a stipple, in placement order.
    pub fn nodes(&self, surface: &Surface, field: &Raster, threshold: f64) -> Vec<Point2> {
        let Some((min, max)) = field.min_max() else {
            return Vec::new();
        };
        let cutoff = threshold * (max - min);
        let density = |p: Point2| surface.sample(field, p).unwrap_or(0.0);

        let mut seen = HashSet::new();
        self.placer
            .place(&density, surface.bounds())
            .into_iter()
            .map(|p| p.round())
            .filter(|&p| surface.is_valid(p) && surface.sample(field, p).is_some_and(|r| r > cutoff))
            .filter(|p| seen.insert((p.x as i64, p.y as i64)))
            .collect()
    }
}

impl StrokeGenerator for Stipples {
    fn class(&self) -> StrokeClass {
        StrokeClass::Stipples
    }

    fn generate(&self, surface: &Surface, settings: &Settings, boundary: Option<&ClipPath>) -> StrokeSet {
        let params = &settings.stipple;
        let field = reference_field(surface, &settings.lighting);
        let nodes = self.nodes(surface, &field, settings.lighting.threshold);
        if nodes.is_empty() {
            warn!("Stipples: no node passed the lighting threshold");
            return StrokeSet::empty(self.class());
        }

        let ring = ring_offsets(params.tail_search_radius);
        let strokes: Vec<Stroke> = nodes
            .par_iter()
            .filter_map(|&node| {
                let Some(tail) = find_tail(surface, node, &ring) else {
                    debug!("Skipping stipple at ({}, {}): no tail target", node.x, node.y);
                    return None;
                };
                let direction = tail - node;
                let heading = direction.y.atan2(direction.x);
                Some(Stroke::teardrop(node, params.head_radius, params.tail_radius, params.length, heading))
            })
            .collect();

        let clip = match boundary {
            Some(boundary) if settings.optimise_clip_paths => {
                Clip::PerStroke(strokes.par_iter().map(|s| boundary.crosses(s)).collect())
            }
            _ => Clip::Group,
        };
        info!("Stipples: {} stroke(s) from {} node(s)", strokes.len(), nodes.len());
        StrokeSet::new(self.class(), strokes, clip)
    }
}
