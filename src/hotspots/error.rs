use crate::hotspots::grid_spec::Axis;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HotspotError {
    // Point or cell lies outside the grid the caller declared
    #[error("Point ({x}, {y}) lies outside the grid bounds x:[{x_min}, {x_max}] y:[{y_min}, {y_max}]")]
    OutOfRange {
        x: f64,
        y: f64,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },

    #[error("Cell ({x_bin}, {y_bin}) is outside a grid of {bins_per_axis}x{bins_per_axis} bins")]
    CellOutOfRange {
        x_bin: usize,
        y_bin: usize,
        bins_per_axis: usize,
    },

    #[error("Top-k must be a positive integer, got {0}")]
    InvalidTopK(usize),

    #[error("Grid resolution must be at least 2 edges per axis, got {0}")]
    InvalidResolution(usize),

    #[error("Grid axis {axis} has zero or non-finite width: [{min}, {max}]")]
    DegenerateAxis { axis: Axis, min: f64, max: f64 },

    #[error("Invalid projection parameters: {0}")]
    InvalidProjection(String),

    #[error("No points were supplied, cell statistics are undefined")]
    EmptyInput,
}

impl HotspotError {
    /// Whether this error was caused by an invalid argument rather than by the data.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            HotspotError::InvalidTopK(_)
                | HotspotError::InvalidResolution(_)
                | HotspotError::DegenerateAxis { .. }
                | HotspotError::InvalidProjection(_)
        )
    }
}
