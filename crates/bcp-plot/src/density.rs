//! Posterior density plot with overlay support.
//!
//! Each posterior is a Student-t curve over the mean difference, sampled on
//! an even grid and normalised so the sampled values sum to one. Curves
//! added later are layered below earlier ones, and all curves share one y
//! scale that only ever grows.

use crate::color::{palette, Rgba};
use crate::config::DensityOptions;
use crate::error::{PlotError, Result};
use crate::figure::{ArtistKind, Figure, LegendEntry, LineStyle, Margins, Spines, Tick};
use crate::source::ProbabilitySource;
use bcp_math::{normalize_log_weights, StudentT};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Z-order of the ROPE boundary markers; above every curve.
pub const ROPE_ZORDER: i32 = 101;

/// Mutable per-figure overlay state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayState {
    /// Shared y maximum; `None` until the first curve.
    pub max_y: Option<f64>,
    /// Z-order for the next curve.
    pub zorder: i32,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self {
            max_y: None,
            zorder: Self::INITIAL_ZORDER,
        }
    }
}

impl OverlayState {
    pub const INITIAL_ZORDER: i32 = 100;

    pub fn new() -> Self {
        Self::default()
    }

    /// State after drawing a curve with maximum `peak`.
    ///
    /// The next curve goes one layer lower; the y maximum becomes
    /// `peak * (1 + headroom)` if that is larger than the current one.
    pub fn advance(self, peak: f64, headroom: f64) -> Self {
        let candidate = peak + peak * headroom;
        let max_y = match self.max_y {
            Some(current) if candidate <= current => Some(current),
            _ => Some(candidate),
        };
        Self {
            max_y,
            zorder: self.zorder - 1,
        }
    }
}

/// `count` evenly spaced ticks from zero to `max_y`.
pub fn y_ticks(max_y: f64, count: usize, decimals: u32) -> Vec<Tick> {
    let step = max_y / (count.saturating_sub(1).max(1)) as f64;
    (0..count)
        .map(|k| {
            let value = step * k as f64;
            Tick {
                value,
                label: format!("{:.*}", decimals as usize, value),
            }
        })
        .collect()
}

/// Sampled posterior curve.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorCurve {
    pub x: Vec<f64>,
    /// Normalised so that `y.iter().sum() == 1`.
    pub y: Vec<f64>,
}

impl PosteriorCurve {
    pub fn peak(&self) -> f64 {
        self.y.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn range(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    fn points(&self) -> Vec<[f64; 2]> {
        self.x.iter().zip(&self.y).map(|(x, y)| [*x, *y]).collect()
    }
}

/// Sample the Student-t posterior of `source`.
///
/// The sweep covers both the central quantile interval and
/// `rope_margin * rope` on either side of zero, whichever is wider.
pub fn posterior_curve<S: ProbabilitySource + ?Sized>(
    source: &S,
    options: &DensityOptions,
) -> Result<PosteriorCurve> {
    options.validate()?;
    let t = StudentT::from_variance(source.df(), source.mean(), source.var());
    let rope = options.rope_margin * source.rope();
    let lo = nan_min(t.ppf(options.lower_quantile), -rope);
    let hi = nan_max(t.ppf(options.upper_quantile), rope);
    if !lo.is_finite() || !hi.is_finite() {
        return Err(PlotError::NonFiniteRange { lo, hi });
    }

    let n = options.points;
    let step = (hi - lo) / (n - 1) as f64;
    let x: Vec<f64> = (0..n)
        .map(|k| if k == n - 1 { hi } else { lo + step * k as f64 })
        .collect();
    let log_pdf: Vec<f64> = x.iter().map(|&v| t.log_pdf(v)).collect();
    let y = normalize_log_weights(&log_pdf);
    if y.iter().any(|v| !v.is_finite()) {
        return Err(PlotError::NonFiniteRange { lo, hi });
    }

    Ok(PosteriorCurve { x, y })
}

// NaN-propagating min/max: a NaN quantile must not be masked by the ROPE.
fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// Density figure that accepts further posteriors.
#[derive(Debug, Clone)]
pub struct DensityFigure {
    figure: Figure,
    overlay: OverlayState,
    options: DensityOptions,
    curves: Vec<PosteriorCurve>,
}

impl DensityFigure {
    /// Empty axes with the ROPE markers drawn.
    pub fn new(options: DensityOptions) -> Result<Self> {
        options.validate()?;
        let mut figure = Figure::new(options.width, options.height);
        figure.transparent = true;
        let axes = &mut figure.axes;
        axes.spines = Spines::LEFT_ONLY;
        axes.margins = Margins {
            left: 120,
            right: 20,
            top: 20,
            bottom: 20,
        };
        axes.tick_label_size = options.tick_label_size;
        axes.legend_size = options.legend_size;
        axes.show_legend = options.legend;
        axes.x_range = (-options.rope_marker, options.rope_marker);
        for x in [options.rope_marker, -options.rope_marker] {
            axes.add(
                ROPE_ZORDER,
                ArtistKind::VLine {
                    x,
                    color: palette::DARK_ORANGE,
                    width: 2.0,
                },
            );
        }
        Ok(Self {
            figure,
            overlay: OverlayState::new(),
            options,
            curves: Vec::new(),
        })
    }

    /// Overlay another posterior.
    pub fn add_posterior<S: ProbabilitySource + ?Sized>(
        &mut self,
        source: &S,
        label: &str,
        style: LineStyle,
        color: Rgba,
    ) -> Result<&mut Self> {
        let curve = posterior_curve(source, &self.options)?;
        let zorder = self.overlay.zorder;
        let first = self.curves.is_empty();
        let axes = &mut self.figure.axes;

        let points = curve.points();
        let mut fill = points.clone();
        fill.push([curve.range().1, 0.0]);
        fill.push([curve.range().0, 0.0]);
        axes.add(
            zorder,
            ArtistKind::Line {
                points,
                color,
                width: self.options.line_width,
                style,
            },
        );
        axes.add(
            zorder,
            ArtistKind::Polygon {
                points: fill,
                edge: None,
                fill: Some(color.with_alpha(self.options.fill_alpha)),
            },
        );
        let (lo, hi) = curve.range();
        axes.include_x(lo, hi, first);
        axes.legend.push(LegendEntry {
            label: label.to_string(),
            color,
            style,
        });

        let previous = self.overlay.max_y;
        self.overlay = self.overlay.advance(curve.peak(), self.options.headroom);
        if let Some(max_y) = self.overlay.max_y.filter(|m| Some(*m) != previous) {
            axes.y_range = (0.0, max_y);
            axes.y_ticks = y_ticks(max_y, self.options.tick_count, self.options.tick_decimals);
        }

        debug!(
            label,
            zorder,
            peak = curve.peak(),
            max_y = ?self.overlay.max_y,
            x_lo = lo,
            x_hi = hi,
            "posterior added to density plot"
        );
        self.curves.push(curve);
        Ok(self)
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn into_figure(self) -> Figure {
        self.figure
    }

    pub fn overlay(&self) -> OverlayState {
        self.overlay
    }

    pub fn options(&self) -> &DensityOptions {
        &self.options
    }

    /// Curves in the order they were added.
    pub fn curves(&self) -> &[PosteriorCurve] {
        &self.curves
    }
}

/// Density plot of one posterior, with default options.
pub fn dens<S: ProbabilitySource + ?Sized>(
    source: &S,
    label: &str,
    style: LineStyle,
    color: Rgba,
) -> Result<DensityFigure> {
    dens_with(source, label, style, color, DensityOptions::default())
}

/// Density plot of one posterior.
pub fn dens_with<S: ProbabilitySource + ?Sized>(
    source: &S,
    label: &str,
    style: LineStyle,
    color: Rgba,
    options: DensityOptions,
) -> Result<DensityFigure> {
    let mut figure = DensityFigure::new(options)?;
    figure.add_posterior(source, label, style, color)?;
    Ok(figure)
}
