//! Variable-density point placement.

use std::collections::HashMap;

use ink_core::StippleParameters;
use ink_math::{Aabb2, Point2};
use log::debug;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Upper bound on the darts thrown for one placement.
const MAX_CANDIDATES: usize = 1_000_000;

/// Darts thrown per minimum-spacing cell of the bounding box.
const CANDIDATES_PER_CELL: f64 = 4.0;

/// Places points inside a box with a spacing driven by a density field.
pub trait PointPlacer: Send + Sync {
    /// Points inside `bbox`, denser where `density` is larger. Locations where
    /// the density is zero or negative receive no points.
    fn place(&self, density: &(dyn Fn(Point2) -> f64 + Sync), bbox: Aabb2) -> Vec<Point2>;
}

/// Seeded dart throwing with a spacing of
/// `(min + factor * d^-exponent) * max(width, height)` around each point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoissonDiskPlacer {
    pub min: f64,
    pub factor: f64,
    pub exponent: f64,
    pub seed: u64,
}

impl PoissonDiskPlacer {
    pub fn new(min: f64, factor: f64, exponent: f64, seed: u64) -> Self {
        Self {
            min,
            factor,
            exponent,
            seed,
        }
    }

    pub fn from_parameters(params: &StippleParameters) -> Self {
        Self::new(
            params.density_fn_min,
            params.density_fn_factor,
            params.density_fn_exponent,
            params.seed,
        )
    }

    /// Spacing around a point of density `d` in a box of size `scale`.
    fn spacing(&self, d: f64, scale: f64) -> Option<f64> {
        if !(d > 0.0) {
            return None;
        }
        let r = (self.min + self.factor * d.powf(-self.exponent)) * scale;
        r.is_finite().then_some(r)
    }
}

impl From<&StippleParameters> for PoissonDiskPlacer {
    fn from(params: &StippleParameters) -> Self {
        Self::from_parameters(params)
    }
}

impl PointPlacer for PoissonDiskPlacer {
    fn place(&self, density: &(dyn Fn(Point2) -> f64 + Sync), bbox: Aabb2) -> Vec<Point2> {
        let size = bbox.extents();
        let scale = size.x.max(size.y);
        let cell = self.min * scale;
        if !(size.x > 0.0 && size.y > 0.0 && cell > 0.0) {
            return Vec::new();
        }

        let cells = (size.x / cell).ceil() * (size.y / cell).ceil();
        let candidates = ((cells * CANDIDATES_PER_CELL).ceil() as usize).min(MAX_CANDIDATES);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let xs = Uniform::new(bbox.min.x, bbox.max.x);
        let ys = Uniform::new(bbox.min.y, bbox.max.y);
        let mut grid = SpacingGrid::new(bbox.min, cell);
        // No two points in the box are further apart than its diagonal.
        let diagonal = size.length();

        for _ in 0..candidates {
            let p = Point2::new(xs.sample(&mut rng), ys.sample(&mut rng));
            let Some(r) = self.spacing(density(p), scale) else {
                continue;
            };
            let r = r.min(diagonal);
            if grid.is_clear(p, r) {
                grid.insert(p);
            }
        }

        debug!("Placed {} point(s) from {} candidate(s)", grid.points.len(), candidates);
        grid.points
    }
}

/// Accepted points bucketed by a uniform grid.
struct SpacingGrid {
    origin: Point2,
    cell: f64,
    buckets: HashMap<(i64, i64), Vec<usize>>,
    points: Vec<Point2>,
}

impl SpacingGrid {
    fn new(origin: Point2, cell: f64) -> Self {
        Self {
            origin,
            cell,
            buckets: HashMap::new(),
            points: Vec::new(),
        }
    }

    fn key(&self, p: Point2) -> (i64, i64) {
        let rel = (p - self.origin) / self.cell;
        (rel.x.floor() as i64, rel.y.floor() as i64)
    }

    fn insert(&mut self, p: Point2) {
        let key = self.key(p);
        self.buckets.entry(key).or_default().push(self.points.len());
        self.points.push(p);
    }

    /// Whether no accepted point lies closer than `r` to `p`.
    fn is_clear(&self, p: Point2, r: f64) -> bool {
        let reach = (r / self.cell).ceil();
        let window = (2.0 * reach + 1.0).powi(2);
        if window > self.points.len() as f64 {
            return self.points.iter().all(|q| q.distance(p) >= r);
        }
        let reach = reach as i64;

        let (cx, cy) = self.key(p);
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if let Some(bucket) = self.buckets.get(&(cx + dx, cy + dy)) {
                    if bucket.iter().any(|&i| self.points[i].distance(p) < r) {
                        return false;
                    }
                }
            }
        }
        true
    }
}
