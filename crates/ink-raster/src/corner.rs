//! Harris corner detection with peak picking and subpixel refinement.

use ink_math::{DVec2, Point2};
use nalgebra::{DMatrix, DVector, Matrix2, Vector2};

use crate::filter::{gaussian_filter, sobel};
use crate::Raster;

/// Harris response `det(A) - k * trace(A)^2` of the Gaussian-weighted
/// structure tensor `A`.
pub fn corner_harris(raster: &Raster, k: f64, sigma: f64) -> Raster {
    let (gx, gy) = sobel(raster);
    let (w, h) = raster.dimensions();

    let axx = gaussian_filter(&gx.map(|v| v * v), sigma);
    let ayy = gaussian_filter(&gy.map(|v| v * v), sigma);
    let axy = gaussian_filter(&Raster::from_fn(w, h, |x, y| gx.get(x, y) * gy.get(x, y)), sigma);

    Raster::from_fn(w, h, |x, y| {
        let (a, b, c) = (axx.get(x, y), axy.get(x, y), ayy.get(x, y));
        let det = a * c - b * b;
        let trace = a + c;
        det - k * trace * trace
    })
}

/// Local maxima of a corner response, at least `min_distance` apart.
///
/// A pixel qualifies when it is the maximum of its `(2 * min_distance + 1)`
/// window, exceeds `threshold_rel * max(response)`, and lies at least
/// `min_distance` from the raster border. Stronger peaks suppress weaker ones
/// within `min_distance` (Chebyshev). Returned as `(x, y)` pixel indices,
/// strongest first.
pub fn corner_peaks(response: &Raster, min_distance: usize, threshold_rel: f64) -> Vec<(usize, usize)> {
    let (w, h) = response.dimensions();
    let Some((_, max)) = response.min_max() else {
        return Vec::new();
    };
    let threshold = threshold_rel * max;
    let md = min_distance as i64;

    let mut candidates = Vec::new();
    for y in min_distance..h.saturating_sub(min_distance) {
        for x in min_distance..w.saturating_sub(min_distance) {
            let value = response.get(x, y);
            if value.is_nan() || value <= threshold {
                continue;
            }
            let is_max = (-md..=md).all(|dy| {
                (-md..=md).all(|dx| {
                    response
                        .get_checked(x as i64 + dx, y as i64 + dy)
                        .map_or(true, |n| n.is_nan() || n <= value)
                })
            });
            if is_max {
                candidates.push((x, y, value));
            }
        }
    }

    // Stable sort keeps row-major order among equal responses.
    candidates.sort_by(|a, b| b.2.total_cmp(&a.2));

    let mut peaks: Vec<(usize, usize)> = Vec::new();
    for (x, y, _) in candidates {
        let too_close = peaks
            .iter()
            .any(|&(px, py)| px.abs_diff(x).max(py.abs_diff(y)) < min_distance.max(1));
        if !too_close {
            peaks.push((x, y));
        }
    }
    peaks
}

/// Refine each peak to subpixel accuracy.
///
/// Fits `f(dx, dy) = a + b dx + c dy + d dx^2 + e dx dy + f dy^2` to the
/// response in a window of half-size `window_size / 2` and moves to the
/// stationary point. `None` where the window is too small, the fit is not a
/// maximum, or the refined position leaves the window.
pub fn corner_subpix(response: &Raster, peaks: &[(usize, usize)], window_size: usize) -> Vec<Option<Point2>> {
    peaks
        .iter()
        .map(|&peak| refine_peak(response, peak, window_size))
        .collect()
}

fn refine_peak(response: &Raster, (px, py): (usize, usize), window_size: usize) -> Option<Point2> {
    if window_size < 3 {
        return None;
    }
    let half = (window_size / 2) as i64;

    let mut rows: Vec<[f64; 6]> = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    for dy in -half..=half {
        for dx in -half..=half {
            let Some(v) = response.get_checked(px as i64 + dx, py as i64 + dy) else {
                continue;
            };
            if v.is_nan() {
                continue;
            }
            let (fx, fy) = (dx as f64, dy as f64);
            rows.push([1.0, fx, fy, fx * fx, fx * fy, fy * fy]);
            values.push(v);
        }
    }
    if rows.len() < 6 {
        return None;
    }

    let a = DMatrix::from_fn(rows.len(), 6, |r, c| rows[r][c]);
    let b = DVector::from_vec(values);
    let ata = a.transpose() * &a;
    let atb = a.transpose() * b;
    let coeffs = ata.lu().solve(&atb)?;

    let hessian = Matrix2::new(2.0 * coeffs[3], coeffs[4], coeffs[4], 2.0 * coeffs[5]);
    if !(hessian[(0, 0)] < 0.0 && hessian.determinant() > 0.0) {
        return None;
    }
    let offset = hessian.try_inverse()? * -Vector2::new(coeffs[1], coeffs[2]);

    let limit = half as f64;
    if offset.iter().any(|v| v.is_nan() || v.abs() > limit) {
        return None;
    }
    Some(DVec2::new(px as f64 + offset.x, py as f64 + offset.y))
}
