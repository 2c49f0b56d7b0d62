//! Core math modules.

pub mod stable;
pub mod beta;
pub mod student_t;
pub mod saferound;
pub mod histogram;
pub mod spline;
pub mod simplex;
