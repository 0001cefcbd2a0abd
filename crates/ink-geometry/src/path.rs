//! Ordered pixel-space point sequences and the operations that refine them.
//!
//! A [`Path`] is never edited in place: every operation returns a new value.
//! Operations that keep or drop points keep the optional offset vector
//! aligned with the surviving points; operations that restructure the
//! sequence (`split_corners`, `simplify`) drop it.

use std::collections::HashSet;

use ink_core::{GeometryError, InkError, Result, ThicknessWeights};
use ink_math::segment::point_segment_distance;
use ink_math::{Point2, Vector2};
use ink_raster::{corner_harris, corner_peaks, corner_subpix, Raster};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::surface::Surface;

/// Harris sensitivity factor.
const HARRIS_K: f64 = 0.05;
/// Standard deviation of the Harris structure-tensor window.
const HARRIS_SIGMA: f64 = 1.0;
/// Corner peaks below this fraction of the strongest response are ignored.
const CORNER_THRESHOLD_REL: f64 = 0.1;

/// Search order for [`Path::bump`]: N, S, E, W, NE, SE, SW, NW.
const NEIGHBOURS: [(f64, f64); 8] = [
    (0.0, -1.0),
    (0.0, 1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (1.0, -1.0),
    (1.0, 1.0),
    (-1.0, 1.0),
    (-1.0, -1.0),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Point2>,
    offset_vector: Option<Vec<f64>>,
}

impl Path {
    pub fn new(points: Vec<Point2>) -> Self {
        Self {
            points,
            offset_vector: None,
        }
    }

    /// Attach one thickness per point.
    pub fn with_offset_vector(self, offset_vector: Vec<f64>) -> Result<Self> {
        if offset_vector.len() != self.points.len() {
            return Err(InkError::DimensionMismatch {
                channel: "offset_vector",
                expected: (self.points.len(), 1),
                actual: (offset_vector.len(), 1),
            });
        }
        Ok(Self {
            points: self.points,
            offset_vector: Some(offset_vector),
        })
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point2> {
        self.points
    }

    pub fn offset_vector(&self) -> Option<&[f64]> {
        self.offset_vector.as_deref()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the last point repeats the first.
    pub fn is_closed(&self) -> bool {
        self.points.len() > 2 && self.points.first() == self.points.last()
    }

    /// Total polyline length.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    fn keep_indices(&self, keep: impl IntoIterator<Item = usize>) -> Self {
        let indices: Vec<usize> = keep.into_iter().collect();
        Self {
            points: indices.iter().map(|&i| self.points[i]).collect(),
            offset_vector: self
                .offset_vector
                .as_ref()
                .map(|ov| indices.iter().map(|&i| ov[i]).collect()),
        }
    }

    fn map_points(&self, f: impl FnMut(Point2) -> Point2) -> Self {
        Self {
            points: self.points.iter().copied().map(f).collect(),
            offset_vector: self.offset_vector.clone(),
        }
    }

    /// Snap every coordinate to the nearest integer pixel.
    pub fn round(&self) -> Self {
        self.map_points(|p| p.round())
    }

    /// Index of the point closest to `target`. Ties go to the earliest point.
    pub fn nearest_index(&self, target: Point2) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, p) in self.points.iter().enumerate() {
            let d = p.distance_squared(target);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    /// The point closest to `target`.
    pub fn nearest_neighbour(&self, target: Point2) -> Option<Point2> {
        self.nearest_index(target).map(|i| self.points[i])
    }

    /// Offset-vector thickness at the point closest to `target`.
    pub fn thickness_at(&self, target: Point2) -> Option<f64> {
        let offsets = self.offset_vector.as_ref()?;
        self.nearest_index(target).map(|i| offsets[i])
    }

    /// Indices of the points nearest to the corners of `mask`.
    ///
    /// Harris peaks at least `min_distance` apart are refined within
    /// `subpixel_window`; a peak whose refinement fails is used as is. Each
    /// corner maps to the nearest point of this path; repeated indices are
    /// reported once, in detection order.
    pub fn find_corners(&self, mask: &Raster, min_distance: usize, subpixel_window: usize) -> Vec<usize> {
        if self.points.is_empty() {
            return Vec::new();
        }
        let response = corner_harris(mask, HARRIS_K, HARRIS_SIGMA);
        let peaks = corner_peaks(&response, min_distance, CORNER_THRESHOLD_REL);
        let refined = corner_subpix(&response, &peaks, subpixel_window);

        let mut seen = HashSet::new();
        let mut corners = Vec::new();
        for (&(x, y), subpixel) in peaks.iter().zip(refined) {
            let location = subpixel.unwrap_or_else(|| Point2::new(x as f64, y as f64));
            if let Some(i) = self.nearest_index(location) {
                if seen.insert(i) {
                    corners.push(i);
                }
            }
        }
        debug!("Found {} corner(s) on a path of {} points", corners.len(), self.points.len());
        corners
    }

    /// Split into one sub-path per pair of consecutive corners.
    ///
    /// The sequence is rotated so the lowest corner index comes first.
    /// Neighbouring sub-paths share their corner point, and the final
    /// sub-path runs back to the first corner, so joining them reproduces
    /// the loop. A closing point that repeats the first is ignored.
    /// Without corners the path is returned whole.
    pub fn split_corners(&self, corners: &[usize]) -> Vec<Path> {
        let points: &[Point2] = if self.is_closed() {
            &self.points[..self.points.len() - 1]
        } else {
            &self.points
        };

        let mut corners: Vec<usize> = corners.iter().copied().filter(|&c| c < points.len()).collect();
        corners.sort_unstable();
        corners.dedup();
        let Some(&first) = corners.first() else {
            return vec![self.clone()];
        };

        let mut rotated = Vec::with_capacity(points.len());
        rotated.extend_from_slice(&points[first..]);
        rotated.extend_from_slice(&points[..first]);
        let starts: Vec<usize> = corners.iter().map(|c| c - first).collect();

        let mut paths: Vec<Path> = starts
            .windows(2)
            .map(|w| Path::new(rotated[w[0]..=w[1]].to_vec()))
            .collect();

        let last = starts[starts.len() - 1];
        let mut closing = rotated[last..].to_vec();
        closing.push(rotated[0]);
        paths.push(Path::new(closing));
        paths
    }

    /// Replace each point outside the subject with its first valid
    /// 8-neighbour (N, S, E, W, NE, SE, SW, NW).
    ///
    /// A point with no valid neighbour is kept and a warning is logged.
    pub fn bump(&self, surface: &Surface) -> Self {
        self.map_points(|p| {
            if surface.is_valid(p) {
                return p;
            }
            let replacement = NEIGHBOURS
                .iter()
                .map(|&(dx, dy)| p + Vector2::new(dx, dy))
                .find(|&candidate| surface.is_valid(candidate));
            match replacement {
                Some(candidate) => candidate,
                None => {
                    warn!("{}", GeometryError::NoValidNeighbour { x: p.x, y: p.y });
                    p
                }
            }
        })
    }

    /// Drop repeated points, keeping the first occurrence of each.
    pub fn remove_duplicates(&self) -> Self {
        let mut seen = HashSet::with_capacity(self.points.len());
        let keep: Vec<usize> = self
            .points
            .iter()
            .enumerate()
            .filter(|(_, p)| seen.insert((p.x.to_bits(), p.y.to_bits())))
            .map(|(i, _)| i)
            .collect();
        self.keep_indices(keep)
    }

    /// Keep every `n`th point that is at least `n` from the end, plus the
    /// first and last points.
    pub fn simple_cull(&self, n: usize) -> Self {
        let n = n.max(1);
        let len = self.points.len();
        if len < 2 {
            return self.clone();
        }
        let keep = (0..len).filter(|&i| i == 0 || i == len - 1 || (i % n == 0 && i + n < len));
        self.keep_indices(keep)
    }

    /// Douglas-Peucker decimation to within `tolerance` pixels.
    pub fn simplify(&self, tolerance: f64) -> Self {
        let n = self.points.len();
        if n < 3 {
            return Path::new(self.points.clone());
        }

        let mut keep = vec![false; n];
        keep[0] = true;
        keep[n - 1] = true;
        let mut stack = vec![(0, n - 1)];
        while let Some((start, end)) = stack.pop() {
            if end <= start + 1 {
                continue;
            }
            let (a, b) = (self.points[start], self.points[end]);
            let (index, distance) = (start + 1..end)
                .map(|i| (i, point_segment_distance(self.points[i], a, b)))
                .fold((start, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
            if distance > tolerance {
                keep[index] = true;
                stack.push((start, index));
                stack.push((index, end));
            }
        }

        Path::new(
            self.points
                .iter()
                .zip(&keep)
                .filter(|(_, k)| **k)
                .map(|(&p, _)| p)
                .collect(),
        )
    }

    /// Maximal runs whose `primary` sample lies within `primary_band` of
    /// `target` and whose `secondary` sample lies strictly inside
    /// `(min + secondary_band, max - secondary_band)` of the whole channel.
    ///
    /// Points are sampled at their nearest pixel; points outside the raster
    /// are rejected. On a closed path a run that wraps past the start is
    /// returned as one piece.
    pub fn trim_by_band(
        &self,
        target: f64,
        primary: &Raster,
        secondary: &Raster,
        primary_band: f64,
        secondary_band: f64,
    ) -> Vec<Path> {
        self.band_runs(target, primary, secondary, primary_band, secondary_band, false)
    }

    /// [`trim_by_band`](Self::trim_by_band) for a loop whose closing point
    /// has already been dropped: the last point is taken to connect back to
    /// the first.
    pub fn trim_loop_by_band(
        &self,
        target: f64,
        primary: &Raster,
        secondary: &Raster,
        primary_band: f64,
        secondary_band: f64,
    ) -> Vec<Path> {
        self.band_runs(target, primary, secondary, primary_band, secondary_band, true)
    }

    fn band_runs(
        &self,
        target: f64,
        primary: &Raster,
        secondary: &Raster,
        primary_band: f64,
        secondary_band: f64,
        wraps: bool,
    ) -> Vec<Path> {
        let Some((s_min, s_max)) = secondary.min_max() else {
            return Vec::new();
        };
        let (lo, hi) = (s_min + secondary_band, s_max - secondary_band);

        let sample = |raster: &Raster, p: Point2| raster.get_checked(p.x.round() as i64, p.y.round() as i64);
        let keep: Vec<bool> = self
            .points
            .iter()
            .map(|&p| match (sample(primary, p), sample(secondary, p)) {
                (Some(pv), Some(sv)) => (pv - target).abs() <= primary_band && sv > lo && sv < hi,
                _ => false,
            })
            .collect();

        let mut runs: Vec<Vec<usize>> = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        for (i, &k) in keep.iter().enumerate() {
            if k {
                current.push(i);
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }

        // Join the run ending on the last point with the run starting at the
        // first. A closing point repeats the first and is dropped.
        let n = self.points.len();
        let closed = self.is_closed();
        if (closed || wraps) && runs.len() > 1 && keep[0] && keep[n - 1] {
            if let Some(mut tail) = runs.pop() {
                if closed {
                    tail.pop();
                }
                tail.extend(runs.remove(0));
                runs.push(tail);
            }
        }

        runs.into_iter().map(|run| self.keep_indices(run)).collect()
    }

    /// Per-point curvature estimate from the change in `(channel, normal_z)`
    /// magnitude between consecutive points.
    ///
    /// The first entry is zero. Interior zero runs are linearly interpolated
    /// between their non-zero neighbours; leading and trailing zeros stay.
    pub fn compute_curvatures(&self, channel: &Raster, surface: &Surface) -> Vec<f64> {
        let magnitude = |p: Point2| {
            let c = surface.sample(channel, p).unwrap_or(0.0);
            let nz = surface.sample(surface.normal_z(), p).unwrap_or(0.0);
            c.hypot(nz)
        };

        let n = self.points.len();
        let mut curvatures = vec![0.0; n];
        for i in 1..n {
            curvatures[i] = (magnitude(self.points[i]) - magnitude(self.points[i - 1])).abs();
        }
        interpolate_zero_runs(&mut curvatures);
        curvatures
    }

    /// Attach thicknesses from the surface under each point:
    /// `constant + (1 - depth) * depth_w + (1 - diffuse) * diffuse_w + curvature * curvature_w`.
    ///
    /// Curvature is measured along `curvature_channel`. Points outside the
    /// raster count as far and fully lit.
    pub fn compute_offset_vector(&self, surface: &Surface, weights: &ThicknessWeights, curvature_channel: &Raster) -> Self {
        let curvatures = if weights.curvature != 0.0 {
            self.compute_curvatures(curvature_channel, surface)
        } else {
            vec![0.0; self.points.len()]
        };

        let offsets = self
            .points
            .iter()
            .zip(&curvatures)
            .map(|(&p, &curvature)| {
                let (depth, diffuse) = surface
                    .at_point(p)
                    .map_or((1.0, 1.0), |s| (s.depth, s.diffuse_direct));
                weights.constant
                    + (1.0 - depth) * weights.depth
                    + (1.0 - diffuse) * weights.diffuse
                    + curvature * weights.curvature
            })
            .collect();

        Self {
            points: self.points.clone(),
            offset_vector: Some(offsets),
        }
    }
}

/// Fill interior runs of zeros by linear interpolation between the
/// surrounding non-zero values.
fn interpolate_zero_runs(values: &mut [f64]) {
    let nonzero: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v != 0.0)
        .map(|(i, _)| i)
        .collect();
    for w in nonzero.windows(2) {
        let (a, b) = (w[0], w[1]);
        if b - a < 2 {
            continue;
        }
        let (va, vb) = (values[a], values[b]);
        for i in a + 1..b {
            let t = (i - a) as f64 / (b - a) as f64;
            values[i] = va + (vb - va) * t;
        }
    }
}

impl From<Vec<Point2>> for Path {
    fn from(points: Vec<Point2>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::tests::square_surface;
    use glam::dvec2;

    fn path(coords: &[(f64, f64)]) -> Path {
        Path::new(coords.iter().map(|&(x, y)| dvec2(x, y)).collect())
    }

    fn coords(path: &Path) -> Vec<(f64, f64)> {
        path.points().iter().map(|p| (p.x, p.y)).collect()
    }

    /// Inner outline of the square `2..=7`, clockwise from `(2, 2)`.
    fn edge_path() -> Path {
        let mut pts = Vec::new();
        pts.extend((2..=7).map(|x| (x as f64, 2.0)));
        pts.extend((3..=7).map(|y| (7.0, y as f64)));
        pts.extend((2..=6).rev().map(|x| (x as f64, 7.0)));
        pts.extend((3..=6).rev().map(|y| (2.0, y as f64)));
        path(&pts)
    }

    /// Outline one pixel outside the square `2..=7`.
    fn boundary_path() -> Path {
        let mut pts = Vec::new();
        pts.extend((1..=8).map(|x| (x as f64, 1.0)));
        pts.extend((2..=8).map(|y| (8.0, y as f64)));
        pts.extend((1..=7).rev().map(|x| (x as f64, 8.0)));
        pts.extend((2..=7).rev().map(|y| (1.0, y as f64)));
        path(&pts)
    }

    #[test]
    fn test_round() {
        let rounded = path(&[(0.0, 0.0), (0.1, 0.8), (10.8, 10.1)]).round();
        assert_eq!(coords(&rounded), vec![(0.0, 0.0), (0.0, 1.0), (11.0, 10.0)]);
    }

    #[test]
    fn test_nearest_neighbour() {
        let edge = edge_path();
        assert_eq!(edge.nearest_neighbour(dvec2(0.0, 0.0)), Some(dvec2(2.0, 2.0)));
        assert_eq!(edge.nearest_neighbour(dvec2(9.0, 0.0)), Some(dvec2(7.0, 2.0)));
        assert_eq!(edge.nearest_neighbour(dvec2(9.0, 9.0)), Some(dvec2(7.0, 7.0)));
        assert_eq!(edge.nearest_neighbour(dvec2(0.0, 9.0)), Some(dvec2(2.0, 7.0)));
        assert_eq!(Path::default().nearest_neighbour(dvec2(0.0, 0.0)), None);
    }

    #[test]
    fn test_find_corners_of_square() {
        let surface = square_surface(10, 2, 7);
        let edge = edge_path();
        let corners = edge.find_corners(surface.object(), 1, 1);
        let mut found: Vec<(f64, f64)> = corners.iter().map(|&i| (edge.points()[i].x, edge.points()[i].y)).collect();
        found.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(found, vec![(2.0, 2.0), (2.0, 7.0), (7.0, 2.0), (7.0, 7.0)]);
    }

    #[test]
    fn test_split_corners_four_edges() {
        let edge = edge_path();
        // (2,2), (7,2), (7,7), (2,7), given out of order.
        let paths = edge.split_corners(&[15, 0, 10, 5]);
        assert_eq!(paths.len(), 4);
        assert_eq!(
            coords(&paths[0]),
            vec![(2.0, 2.0), (3.0, 2.0), (4.0, 2.0), (5.0, 2.0), (6.0, 2.0), (7.0, 2.0)]
        );
        assert_eq!(
            coords(&paths[1]),
            vec![(7.0, 2.0), (7.0, 3.0), (7.0, 4.0), (7.0, 5.0), (7.0, 6.0), (7.0, 7.0)]
        );
        assert_eq!(
            coords(&paths[2]),
            vec![(7.0, 7.0), (6.0, 7.0), (5.0, 7.0), (4.0, 7.0), (3.0, 7.0), (2.0, 7.0)]
        );
        assert_eq!(
            coords(&paths[3]),
            vec![(2.0, 7.0), (2.0, 6.0), (2.0, 5.0), (2.0, 4.0), (2.0, 3.0), (2.0, 2.0)]
        );
    }

    #[test]
    fn test_split_corners_reconstructs_loop() {
        let edge = edge_path();
        let mut closed = edge.points().to_vec();
        closed.push(closed[0]);
        let closed = Path::new(closed);

        let paths = closed.split_corners(&[3, 8, 17]);
        let mut joined: Vec<Point2> = paths[0].points().to_vec();
        for p in &paths[1..] {
            assert_eq!(joined.last(), p.points().first());
            joined.extend_from_slice(&p.points()[1..]);
        }
        assert_eq!(joined.first(), joined.last());
        joined.pop();

        let mut expected = edge.points().to_vec();
        expected.rotate_left(3);
        assert_eq!(joined, expected);
    }

    #[test]
    fn test_split_without_corners_is_identity() {
        let edge = edge_path();
        assert_eq!(edge.split_corners(&[]), vec![edge.clone()]);
        assert_eq!(edge.split_corners(&[99]), vec![edge]);
    }

    #[test]
    fn test_bump_moves_points_onto_subject() {
        let surface = square_surface(10, 2, 7);
        let bumped = boundary_path().bump(&surface);
        let expected = [
            (2, 2), (2, 2), (3, 2), (4, 2), (5, 2), (6, 2), (7, 2), (7, 2), (7, 2), (7, 3),
            (7, 4), (7, 5), (7, 6), (7, 7), (7, 7), (7, 7), (6, 7), (5, 7), (4, 7), (3, 7),
            (2, 7), (2, 7), (2, 7), (2, 6), (2, 5), (2, 4), (2, 3), (2, 2),
        ];
        let expected: Vec<(f64, f64)> = expected.iter().map(|&(x, y)| (x as f64, y as f64)).collect();
        assert_eq!(coords(&bumped), expected);
    }

    #[test]
    fn test_bump_inside_subject_is_identity() {
        let surface = square_surface(10, 2, 7);
        let edge = edge_path();
        assert_eq!(edge.bump(&surface), edge);
    }

    #[test]
    fn test_bump_keeps_unreachable_point() {
        let surface = square_surface(10, 2, 7);
        let far = path(&[(0.0, 0.0), (3.0, 3.0)]);
        assert_eq!(far.bump(&surface), far);
    }

    #[test]
    fn test_remove_duplicates() {
        let p = path(&[(1.0, 1.0), (2.0, 1.0), (1.0, 1.0), (2.0, 1.0), (3.0, 1.0)]);
        let once = p.remove_duplicates();
        assert_eq!(coords(&once), vec![(1.0, 1.0), (2.0, 1.0), (3.0, 1.0)]);
        assert_eq!(once.remove_duplicates(), once);
    }

    #[test]
    fn test_remove_duplicates_keeps_offsets_aligned() {
        let p = path(&[(1.0, 1.0), (1.0, 1.0), (2.0, 1.0)])
            .with_offset_vector(vec![0.1, 0.2, 0.3])
            .unwrap();
        assert_eq!(p.remove_duplicates().offset_vector(), Some(&[0.1, 0.3][..]));
    }

    #[test]
    fn test_simple_cull() {
        let p = path(&(0..8).map(|x| (x as f64, 0.0)).collect::<Vec<_>>());
        let xs = |n: usize| -> Vec<f64> { p.simple_cull(n).points().iter().map(|q| q.x).collect() };
        assert_eq!(xs(1), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(xs(2), vec![0.0, 2.0, 4.0, 7.0]);
        assert_eq!(xs(3), vec![0.0, 3.0, 7.0]);
        assert_eq!(xs(4), vec![0.0, 7.0]);
        assert_eq!(xs(20), vec![0.0, 7.0]);
    }

    #[test]
    fn test_simple_cull_preserves_endpoints() {
        for len in 2..30 {
            let p = path(&(0..len).map(|i| (i as f64, (i * i) as f64)).collect::<Vec<_>>());
            for n in 1..12 {
                let culled = p.simple_cull(n);
                assert_eq!(culled.points().first(), p.points().first());
                assert_eq!(culled.points().last(), p.points().last());
            }
        }
    }

    #[test]
    fn test_simplify() {
        let p = path(&[(0.0, 0.0), (1.0, 0.1), (2.0, -0.1), (3.0, 5.0), (4.0, 6.0), (5.0, 7.0)]);
        let simplified = p.simplify(0.5);
        assert_eq!(coords(&simplified), vec![(0.0, 0.0), (2.0, -0.1), (3.0, 5.0), (5.0, 7.0)]);
        assert!(simplified.offset_vector().is_none());
        assert_eq!(p.simplify(100.0).len(), 2);
    }

    #[test]
    fn test_trim_by_band_splits_runs() {
        let primary = Raster::from_fn(10, 1, |x, _| if x == 4 || x == 5 { 0.9 } else { 0.5 });
        let secondary = Raster::from_fn(10, 1, |x, _| x as f64);
        let p = path(&(0..10).map(|x| (x as f64, 0.0)).collect::<Vec<_>>());

        let runs = p.trim_by_band(0.5, &primary, &secondary, 0.05, 0.5);
        let runs: Vec<Vec<f64>> = runs.iter().map(|r| r.points().iter().map(|q| q.x).collect()).collect();
        // x = 0 and x = 9 sit on the secondary extremes.
        assert_eq!(runs, vec![vec![1.0, 2.0, 3.0], vec![6.0, 7.0, 8.0]]);
    }

    #[test]
    fn test_trim_by_band_joins_wrapping_run() {
        let primary = Raster::new(10, 10, 0.5);
        let secondary = Raster::from_fn(10, 10, |x, y| (x + y) as f64);
        // (0, 0) sits on the secondary minimum and breaks the loop twice.
        let pts = [
            (3.0, 3.0), (4.0, 3.0), (0.0, 0.0), (5.0, 3.0), (6.0, 3.0),
            (0.0, 0.0), (4.0, 5.0), (3.0, 4.0), (3.0, 3.0),
        ];
        let runs = path(&pts).trim_by_band(0.5, &primary, &secondary, 0.1, 0.5);
        assert_eq!(runs.len(), 2);
        assert_eq!(coords(&runs[0]), vec![(5.0, 3.0), (6.0, 3.0)]);
        assert_eq!(coords(&runs[1]), vec![(4.0, 5.0), (3.0, 4.0), (3.0, 3.0), (4.0, 3.0)]);
    }

    #[test]
    fn test_trim_loop_by_band_joins_across_start() {
        let primary = Raster::new(10, 10, 0.5);
        let secondary = Raster::from_fn(10, 10, |x, y| (x + y) as f64);
        // The loop's closing point is gone; (3, 4) still connects back to (3, 3).
        let pts = [
            (3.0, 3.0), (4.0, 3.0), (0.0, 0.0), (5.0, 3.0), (6.0, 3.0),
            (0.0, 0.0), (4.0, 5.0), (3.0, 4.0),
        ];
        let looped = path(&pts).trim_loop_by_band(0.5, &primary, &secondary, 0.1, 0.5);
        assert_eq!(looped.len(), 2);
        assert_eq!(coords(&looped[0]), vec![(5.0, 3.0), (6.0, 3.0)]);
        assert_eq!(coords(&looped[1]), vec![(4.0, 5.0), (3.0, 4.0), (3.0, 3.0), (4.0, 3.0)]);

        // Read as an open path the same points split at the start.
        assert_eq!(path(&pts).trim_by_band(0.5, &primary, &secondary, 0.1, 0.5).len(), 3);
    }

    #[test]
    fn test_interpolate_zero_runs() {
        let mut v = vec![0.0, 0.0, 1.0, 0.0, 0.0, 4.0, 0.0];
        interpolate_zero_runs(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 0.0]);

        let mut zeros = vec![0.0; 4];
        interpolate_zero_runs(&mut zeros);
        assert_eq!(zeros, vec![0.0; 4]);
    }

    #[test]
    fn test_compute_curvatures() {
        let surface = square_surface(10, 2, 7);
        // normal_x is x / 9 and normal_z is 1 everywhere.
        let p = path(&[(2.0, 4.0), (3.0, 4.0), (3.0, 5.0), (5.0, 5.0)]);
        let c = p.compute_curvatures(surface.normal_x(), &surface);
        let m = |x: f64| (x / 9.0).hypot(1.0);
        assert_eq!(c[0], 0.0);
        assert!((c[1] - (m(3.0) - m(2.0))).abs() < 1e-12);
        // Zero step between equal columns is filled in.
        assert!((c[2] - (c[1] + c[3]) / 2.0).abs() < 1e-12);
        assert!((c[3] - (m(5.0) - m(3.0))).abs() < 1e-12);
    }

    #[test]
    fn test_compute_offset_vector() {
        let surface = square_surface(10, 2, 7);
        let weights = ThicknessWeights::new(0.5, 2.0, 4.0, 0.0);
        let p = path(&[(3.0, 3.0), (4.0, 4.0), (20.0, 20.0)]);
        let with_offsets = p.compute_offset_vector(&surface, &weights, surface.normal_x());
        // depth = diffuse = 0.5 on the surface: 0.5 + 0.5 * 2 + 0.5 * 4.
        let ov = with_offsets.offset_vector().unwrap();
        assert!((ov[0] - 3.5).abs() < 1e-12);
        assert!((ov[1] - 3.5).abs() < 1e-12);
        // Outside the raster only the constant remains.
        assert!((ov[2] - 0.5).abs() < 1e-12);
        assert_eq!(with_offsets.thickness_at(dvec2(4.2, 3.9)), Some(ov[1]));
    }

    #[test]
    fn test_offset_vector_length_checked() {
        let err = path(&[(0.0, 0.0), (1.0, 0.0)]).with_offset_vector(vec![1.0]).unwrap_err();
        assert!(matches!(err, InkError::DimensionMismatch { .. }));
    }
}
