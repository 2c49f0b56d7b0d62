//! Error types for plot construction and rendering.

use thiserror::Error;

/// Result type for plot operations.
pub type Result<T> = std::result::Result<T, PlotError>;

/// Errors that can occur while building or rendering a figure.
#[derive(Error, Debug)]
pub enum PlotError {
    /// Numerical routine rejected its input.
    #[error("math error: {0}")]
    Math(#[from] bcp_math::MathError),

    /// Drawing backend failure.
    #[error("render error: {0}")]
    Render(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The posterior sweep range is not finite (NaN or infinite parameters).
    #[error("posterior range is not finite: [{lo}, {hi}]")]
    NonFiniteRange { lo: f64, hi: f64 },

    /// Output path has an extension no backend handles.
    #[error("unsupported output format '{0}' (expected svg or png)")]
    UnsupportedFormat(String),

    /// Nothing to put on a sheet.
    #[error("missing required data: {0}")]
    MissingData(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
