//! Posterior plots for Bayesian comparisons of two alternatives.
//!
//! Two figures are provided:
//!
//! - **Ternary plot** ([`tern`]): the left / ROPE / right probabilities on an
//!   equilateral triangle, with the Monte Carlo sample drawn as a
//!   density-coloured point cloud.
//! - **Density plot** ([`dens`]): the Student-t posterior of the mean
//!   difference with the ROPE boundary marked. Further posteriors can be
//!   overlaid on the same axes with [`DensityFigure::add_posterior`].
//!
//! Both read from a [`ProbabilitySource`]; this crate never computes a
//! posterior itself. Figures are retained scenes that render to SVG or PNG
//! through `plotters`, and [`SheetGenerator`] bundles several comparisons
//! into one HTML page.
//!
//! # Example
//!
//! ```no_run
//! use bcp_plot::{dens, palette, tern, LineStyle, PosteriorSnapshot, TernaryOptions};
//!
//! let snapshot = PosteriorSnapshot::from_path("posterior.json".as_ref()).unwrap();
//! let figure = tern(&snapshot, &TernaryOptions::with_labels("J48", "NB")).unwrap();
//! figure.save("tern.svg".as_ref()).unwrap();
//!
//! let mut density = dens(&snapshot, "J48 vs NB", LineStyle::Solid, palette::BLUE).unwrap();
//! density
//!     .add_posterior(&snapshot, "again", LineStyle::Dashed, palette::BORDEAUX)
//!     .unwrap();
//! density.figure().save("dens.svg".as_ref()).unwrap();
//! ```

pub mod color;
pub mod config;
pub mod density;
pub mod error;
pub mod figure;
pub mod render;
pub mod sheet;
pub mod source;
pub mod ternary;

pub use color::{palette, ColorRamp, Rgba, BLUES};
pub use config::{DensityOptions, PlotConfig, SheetOptions, TernaryOptions, UnsupportedDensity};
pub use density::{dens, dens_with, posterior_curve, DensityFigure, OverlayState, PosteriorCurve};
pub use error::{PlotError, Result};
pub use figure::{Anchor, Artist, ArtistKind, Axes, Figure, LineStyle, Margins, Tick};
pub use sheet::SheetGenerator;
pub use source::{PosteriorSnapshot, ProbabilitySource};
pub use ternary::{sanitize_label, sample_density, tern};
