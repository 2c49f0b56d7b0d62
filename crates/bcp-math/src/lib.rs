//! Numerical primitives for baycomp posterior plots.
//!
//! Everything here is pure: Student-t distribution functions, sum-preserving
//! rounding, 2D histograms, bicubic grid interpolation and the barycentric
//! projection used by the ternary plot.

pub mod error;
pub mod math;

pub use error::{MathError, Result};
pub use math::stable::*;
pub use math::beta::*;
pub use math::student_t::*;
pub use math::saferound::{format_units, saferound, saferound_units};
pub use math::histogram::Histogram2d;
pub use math::spline::{BicubicGrid, NotAKnotSpline};
pub use math::simplex;
