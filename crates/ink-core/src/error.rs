use thiserror::Error;

/// Local, recoverable failures of the geometry stages.
///
/// Generators treat every variant as "skip this path/stroke/stipple" rather
/// than aborting the illustration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("No contour found")]
    EmptyContour,

    #[error("No valid neighbour for point ({x}, {y})")]
    NoValidNeighbour { x: f64, y: f64 },

    #[error("Degenerate curve: {0}")]
    DegenerateCurve(String),

    #[error("Path has no offset vector")]
    MissingOffsetVector,

    #[error("Too few points: needed {needed}, got {got}")]
    TooFewPoints { needed: usize, got: usize },
}

#[derive(Debug, Error)]
pub enum InkError {
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Channel '{channel}' has dimensions {actual:?}, expected {expected:?}")]
    DimensionMismatch {
        channel: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Raster has no pixels")]
    EmptyRaster,

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InkError>;
