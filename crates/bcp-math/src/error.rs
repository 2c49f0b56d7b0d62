//! Error types for the numerical kernels.
//!
//! Scalar distribution functions follow the NaN-in, NaN-out convention and
//! never return these; they are reserved for routines whose output would be
//! silently meaningless on bad input.

use thiserror::Error;

/// Result type for fallible math routines.
pub type Result<T> = std::result::Result<T, MathError>;

/// Errors raised by grid and rounding routines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// An input value was NaN or infinite.
    #[error("non-finite input to {context}")]
    NonFinite { context: &'static str },

    /// Too few knots for a cubic interpolant.
    #[error("need at least {required} grid points, got {actual}")]
    GridTooSmall { required: usize, actual: usize },

    /// Grid coordinates are not strictly ascending.
    #[error("grid coordinates must be strictly ascending")]
    UnsortedGrid,

    /// Value array does not match the grid shape.
    #[error("grid expects {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The spline system could not be solved.
    #[error("singular spline system")]
    SingularSystem,

    /// Histogram bin count must be positive.
    #[error("histogram needs at least one bin")]
    NoBins,
}
