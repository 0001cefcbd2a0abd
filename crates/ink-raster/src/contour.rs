//! Iso-contour extraction by marching squares.
//!
//! Crossings are linearly interpolated along cell edges, ambiguous saddle
//! cells are resolved by the cell mean, and every segment is oriented with
//! the above-level region on its positive side so that segments chain into
//! consistently wound polylines. Closed contours repeat their first point at
//! the end; contours that run into the raster border are left open.

use std::collections::{HashMap, VecDeque};

use ink_math::{DVec2, Point2};

use crate::Raster;

/// A crossing location, identified by the grid edge it lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EdgeKey {
    /// Edge between `(col, row)` and `(col + 1, row)`.
    Horizontal { row: usize, col: usize },
    /// Edge between `(col, row)` and `(col, row + 1)`.
    Vertical { row: usize, col: usize },
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl EdgeKey {
    fn of_cell(row: usize, col: usize, side: Side) -> Self {
        match side {
            Side::Top => EdgeKey::Horizontal { row, col },
            Side::Bottom => EdgeKey::Horizontal { row: row + 1, col },
            Side::Left => EdgeKey::Vertical { row, col },
            Side::Right => EdgeKey::Vertical { row, col: col + 1 },
        }
    }

    fn endpoints(self) -> ((usize, usize), (usize, usize)) {
        match self {
            EdgeKey::Horizontal { row, col } => ((col, row), (col + 1, row)),
            EdgeKey::Vertical { row, col } => ((col, row), (col, row + 1)),
        }
    }
}

fn crossing(raster: &Raster, key: EdgeKey, level: f64) -> Point2 {
    let ((ax, ay), (bx, by)) = key.endpoints();
    let va = raster.get(ax, ay);
    let vb = raster.get(bx, by);
    let t = if va == vb { 0.5 } else { (level - va) / (vb - va) };
    let a = DVec2::new(ax as f64, ay as f64);
    let b = DVec2::new(bx as f64, by as f64);
    a + (b - a) * t.clamp(0.0, 1.0)
}

fn high_endpoint(raster: &Raster, key: EdgeKey) -> Point2 {
    let ((ax, ay), (bx, by)) = key.endpoints();
    if raster.get(ax, ay) >= raster.get(bx, by) {
        DVec2::new(ax as f64, ay as f64)
    } else {
        DVec2::new(bx as f64, by as f64)
    }
}

fn cell_sides(case: u8, center_high: bool) -> &'static [(Side, Side)] {
    use Side::*;
    match case {
        1 => &[(Left, Top)],
        2 => &[(Top, Right)],
        3 => &[(Left, Right)],
        4 => &[(Right, Bottom)],
        5 if center_high => &[(Top, Right), (Bottom, Left)],
        5 => &[(Left, Top), (Right, Bottom)],
        6 => &[(Top, Bottom)],
        7 => &[(Left, Bottom)],
        8 => &[(Bottom, Left)],
        9 => &[(Top, Bottom)],
        10 if center_high => &[(Left, Top), (Right, Bottom)],
        10 => &[(Top, Right), (Bottom, Left)],
        11 => &[(Right, Bottom)],
        12 => &[(Left, Right)],
        13 => &[(Top, Right)],
        14 => &[(Left, Top)],
        _ => &[],
    }
}

/// Trace all iso-contours of `raster` at `level`.
///
/// Points are returned in pixel space as `(x = column, y = row)`.
pub fn find_contours(raster: &Raster, level: f64) -> Vec<Vec<Point2>> {
    let (width, height) = raster.dimensions();
    if width < 2 || height < 2 {
        return Vec::new();
    }

    let mut segments: Vec<(EdgeKey, EdgeKey)> = Vec::new();
    for row in 0..height - 1 {
        for col in 0..width - 1 {
            let tl = raster.get(col, row);
            let tr = raster.get(col + 1, row);
            let br = raster.get(col + 1, row + 1);
            let bl = raster.get(col, row + 1);

            let case = (tl > level) as u8
                | ((tr > level) as u8) << 1
                | ((br > level) as u8) << 2
                | ((bl > level) as u8) << 3;
            if case == 0 || case == 15 {
                continue;
            }
            let center_high = (tl + tr + br + bl) * 0.25 > level;

            for &(s1, s2) in cell_sides(case, center_high) {
                let k1 = EdgeKey::of_cell(row, col, s1);
                let k2 = EdgeKey::of_cell(row, col, s2);
                let p = crossing(raster, k1, level);
                let q = crossing(raster, k2, level);
                let h = high_endpoint(raster, k1);
                if (q - p).perp_dot(h - p) >= 0.0 {
                    segments.push((k1, k2));
                } else {
                    segments.push((k2, k1));
                }
            }
        }
    }

    let mut by_start: HashMap<EdgeKey, usize> = HashMap::with_capacity(segments.len());
    let mut by_end: HashMap<EdgeKey, usize> = HashMap::with_capacity(segments.len());
    for (i, &(from, to)) in segments.iter().enumerate() {
        by_start.entry(from).or_insert(i);
        by_end.entry(to).or_insert(i);
    }

    let mut used = vec![false; segments.len()];
    let mut contours = Vec::new();

    for i in 0..segments.len() {
        if used[i] {
            continue;
        }
        used[i] = true;

        let mut keys: VecDeque<EdgeKey> = VecDeque::from([segments[i].0, segments[i].1]);

        while let Some(&j) = keys.back().and_then(|k| by_start.get(k)) {
            if used[j] {
                break;
            }
            used[j] = true;
            keys.push_back(segments[j].1);
        }

        let closed = keys.len() > 2 && keys.front() == keys.back();
        if !closed {
            while let Some(&j) = keys.front().and_then(|k| by_end.get(k)) {
                if used[j] {
                    break;
                }
                used[j] = true;
                keys.push_front(segments[j].0);
            }
        }

        contours.push(keys.into_iter().map(|k| crossing(raster, k, level)).collect());
    }

    contours
}
