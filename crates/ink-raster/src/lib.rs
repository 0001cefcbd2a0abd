//! InkEngine raster primitives.
//!
//! Everything here works on single-component `f64` grids indexed as
//! `(x = column, y = row)`; multi-component images are split into channels
//! before they reach this crate.

pub mod contour;
pub mod corner;
pub mod filter;
pub mod raster;

pub use contour::find_contours;
pub use corner::{corner_harris, corner_peaks, corner_subpix};
pub use filter::{adjust_gamma, gaussian_filter, gradient_magnitude, sobel};
pub use raster::Raster;
