//! Linear filters and intensity adjustments on [`Raster`]s.

use crate::Raster;

/// Gaussian kernels extend this many standard deviations either side.
const TRUNCATE: f64 = 4.0;

/// Mirror an out-of-range index back into `0..len` (`d c b a | a b c d`).
fn reflect(mut i: i64, len: usize) -> usize {
    let n = len as i64;
    if n == 1 {
        return 0;
    }
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= n {
            i = 2 * n - i - 1;
        } else {
            return i as usize;
        }
    }
}

fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as i64;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|i| (-0.5 * (i * i) as f64 / (sigma * sigma)).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= sum);
    kernel
}

/// Separable Gaussian blur with reflected borders.
///
/// A non-positive `sigma` returns an unmodified copy.
pub fn gaussian_filter(raster: &Raster, sigma: f64) -> Raster {
    if sigma <= 0.0 || raster.is_empty() {
        return raster.clone();
    }
    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as i64;
    let (w, h) = raster.dimensions();

    let horizontal = Raster::from_fn(w, h, |x, y| {
        kernel
            .iter()
            .enumerate()
            .map(|(k, weight)| weight * raster.get(reflect(x as i64 + k as i64 - radius, w), y))
            .sum()
    });

    Raster::from_fn(w, h, |x, y| {
        kernel
            .iter()
            .enumerate()
            .map(|(k, weight)| weight * horizontal.get(x, reflect(y as i64 + k as i64 - radius, h)))
            .sum()
    })
}

/// Sobel derivatives `(d/dx, d/dy)` with zero padding outside the raster.
pub fn sobel(raster: &Raster) -> (Raster, Raster) {
    let (w, h) = raster.dimensions();
    let at = |x: usize, y: usize, dx: i64, dy: i64| raster.get_or_zero(x as i64 + dx, y as i64 + dy);

    let gx = Raster::from_fn(w, h, |x, y| {
        (at(x, y, 1, -1) + 2.0 * at(x, y, 1, 0) + at(x, y, 1, 1))
            - (at(x, y, -1, -1) + 2.0 * at(x, y, -1, 0) + at(x, y, -1, 1))
    });
    let gy = Raster::from_fn(w, h, |x, y| {
        (at(x, y, -1, 1) + 2.0 * at(x, y, 0, 1) + at(x, y, 1, 1))
            - (at(x, y, -1, -1) + 2.0 * at(x, y, 0, -1) + at(x, y, 1, -1))
    });
    (gx, gy)
}

/// Magnitude of the Sobel gradient at every pixel.
pub fn gradient_magnitude(raster: &Raster) -> Raster {
    let (gx, gy) = sobel(raster);
    let (w, h) = raster.dimensions();
    Raster::from_fn(w, h, |x, y| gx.get(x, y).hypot(gy.get(x, y)))
}

/// Power-law transform `gain * v^gamma`, clamping negative samples to zero.
pub fn adjust_gamma(raster: &Raster, gamma: f64, gain: f64) -> Raster {
    raster.map(|v| gain * v.max(0.0).powf(gamma))
}
