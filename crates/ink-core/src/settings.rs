//! Illustration settings.
//!
//! A flat, immutable record of every option the engine recognises. The host
//! fills it in (or loads it from JSON); nothing inside the engine mutates it.

use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};

use crate::error::{InkError, Result};
use crate::traits::Validate;

/// Weights of the per-point stroke thickness model.
///
/// `thickness = constant + (1 - depth) * depth + (1 - diffuse) * diffuse + curvature * curvature`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThicknessWeights {
    pub constant: f64,
    pub depth: f64,
    pub diffuse: f64,
    pub curvature: f64,
}

impl ThicknessWeights {
    pub const fn new(constant: f64, depth: f64, diffuse: f64, curvature: f64) -> Self {
        Self {
            constant,
            depth,
            diffuse,
            curvature,
        }
    }

    /// A constant-width model.
    pub const fn constant(thickness: f64) -> Self {
        Self::new(thickness, 0.0, 0.0, 0.0)
    }
}

/// Weights of the stipple reference field and its acceptance threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightingWeights {
    pub diffuse: f64,
    pub shadow: f64,
    pub ambient_occlusion: f64,
    /// Fraction of the reference field's value range a node must exceed.
    pub threshold: f64,
}

impl Default for LightingWeights {
    fn default() -> Self {
        Self {
            diffuse: 1.0,
            shadow: 1.0,
            ambient_occlusion: 1.0,
            threshold: 0.3,
        }
    }
}

/// Stipple outline geometry and density-function parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StippleParameters {
    pub head_radius: f64,
    pub tail_radius: f64,
    pub length: f64,
    /// Minimum spacing, as a fraction of the larger image dimension.
    pub density_fn_min: f64,
    /// Spacing growth factor, as a fraction of the larger image dimension.
    pub density_fn_factor: f64,
    pub density_fn_exponent: f64,
    /// Radius (px) of the pixel ring scanned for a stipple's tail target.
    pub tail_search_radius: f64,
    /// Seed of the point placement sampler.
    pub seed: u64,
}

impl Default for StippleParameters {
    fn default() -> Self {
        Self {
            head_radius: 1.0,
            tail_radius: 0.0,
            length: 30.0,
            density_fn_min: 0.005,
            density_fn_factor: 0.0025,
            density_fn_exponent: 2.0,
            tail_search_radius: 3.0,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cull_factor: usize,
    pub optimise_factor: f64,
    pub curve_fit_error: f64,
    pub harris_min_distance: usize,
    pub subpix_window_size: usize,
    pub curve_sampling_interval: f64,
    pub stroke_colour: String,

    pub silhouette_thickness: ThicknessWeights,
    pub internal_edge_thickness: ThicknessWeights,
    pub internal_edge_threshold: f64,
    pub internal_edge_min_points: usize,

    pub streamline_segments: usize,
    pub streamline_min_points: usize,
    pub streamline_thickness: ThicknessWeights,
    pub uv_primary_trim_size: f64,
    pub uv_secondary_trim_size: f64,

    pub lighting: LightingWeights,
    pub stipple: StippleParameters,
    pub optimise_clip_paths: bool,

    pub enable_silhouette: bool,
    pub enable_internal_edges: bool,
    pub enable_streamlines: bool,
    pub enable_stipples: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cull_factor: 20,
            optimise_factor: 5.0,
            curve_fit_error: 0.01,
            harris_min_distance: 40,
            subpix_window_size: 20,
            curve_sampling_interval: 20.0,
            stroke_colour: "black".to_string(),

            silhouette_thickness: ThicknessWeights::new(0.05, 5.0, 0.0, 0.0),
            internal_edge_thickness: ThicknessWeights::new(0.05, 3.0, 0.0, 0.0),
            internal_edge_threshold: 0.3,
            internal_edge_min_points: 10,

            streamline_segments: 32,
            streamline_min_points: 10,
            streamline_thickness: ThicknessWeights::new(0.01, 0.1, 0.0, 0.0),
            uv_primary_trim_size: 0.005,
            uv_secondary_trim_size: 0.001,

            lighting: LightingWeights::default(),
            stipple: StippleParameters::default(),
            optimise_clip_paths: false,

            enable_silhouette: true,
            enable_internal_edges: false,
            enable_streamlines: false,
            enable_stipples: false,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: &FsPath) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn require(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(InkError::InvalidSettings(message.to_string()))
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        require(self.cull_factor >= 1, "cull_factor must be at least 1")?;
        require(self.optimise_factor >= 0.0, "optimise_factor must not be negative")?;
        require(self.curve_fit_error > 0.0, "curve_fit_error must be positive")?;
        require(
            self.curve_sampling_interval > 0.0,
            "curve_sampling_interval must be positive",
        )?;
        require(
            self.streamline_segments >= 2,
            "streamline_segments must be at least 2",
        )?;
        require(
            self.uv_primary_trim_size >= 0.0 && self.uv_secondary_trim_size >= 0.0,
            "uv trim sizes must not be negative",
        )?;
        require(
            (0.0..=1.0).contains(&self.internal_edge_threshold),
            "internal_edge_threshold must lie in [0, 1]",
        )?;
        require(
            self.stipple.head_radius >= 0.0
                && self.stipple.tail_radius >= 0.0
                && self.stipple.length >= 0.0,
            "stipple geometry must not be negative",
        )?;
        require(
            self.stipple.density_fn_min > 0.0,
            "stipple density_fn_min must be positive",
        )?;
        require(
            self.stipple.tail_search_radius >= 1.0,
            "stipple tail_search_radius must be at least one pixel",
        )?;
        Ok(())
    }
}
