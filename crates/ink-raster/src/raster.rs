use ink_core::{InkError, Result};
use serde::{Deserialize, Serialize};

/// A single-channel grid of `f64` samples in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Raster {
    /// A raster filled with `value`.
    pub fn new(width: usize, height: usize, value: f64) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn from_vec(width: usize, height: usize, data: Vec<f64>) -> Result<Self> {
        let expected = width.checked_mul(height).ok_or(InkError::EmptyRaster)?;
        if data.len() != expected {
            return Err(InkError::DimensionMismatch {
                channel: "raster",
                expected: (width, height),
                actual: (data.len(), 1),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a raster by evaluating `f(x, y)` at every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Sample at `(x, y)`. Panics when out of range.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.width + x]
    }

    /// Sample at signed coordinates, `None` outside the grid.
    #[inline]
    pub fn get_checked(&self, x: i64, y: i64) -> Option<f64> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            None
        } else {
            Some(self.get(x as usize, y as usize))
        }
    }

    /// Sample at signed coordinates, `0.0` outside the grid.
    #[inline]
    pub fn get_or_zero(&self, x: i64, y: i64) -> f64 {
        self.get_checked(x, y).unwrap_or(0.0)
    }

    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        self.data[y * self.width + x] = value;
    }

    /// Smallest and largest sample, ignoring NaN. `None` for an empty raster.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Raster {
        Raster {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combine two rasters of identical dimensions sample by sample.
    pub fn zip_map(&self, other: &Raster, f: impl Fn(f64, f64) -> f64) -> Result<Raster> {
        if self.dimensions() != other.dimensions() {
            return Err(InkError::DimensionMismatch {
                channel: "raster",
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }
        Ok(Raster {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }
}
