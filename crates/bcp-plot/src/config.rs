//! Plot configuration types.

use crate::error::{PlotError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do with sample points whose density cannot be interpolated
/// (they fall outside the histogram's bin-centre grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedDensity {
    /// Leave them out of the scatter layer.
    #[default]
    Hide,
    /// Draw them first, in the lightest ramp colour.
    Floor,
}

/// Ternary plot options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TernaryOptions {
    /// Labels of the left and right corners.
    #[serde(default = "default_labels")]
    pub labels: [String; 2],
    /// Histogram bins per axis for the point density.
    #[serde(default = "default_bins")]
    pub bins: usize,
    /// Decimals shown for the corner probabilities.
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    /// Scatter marker radius, pixels.
    #[serde(default = "default_marker_radius")]
    pub marker_radius: f64,
    #[serde(default)]
    pub unsupported_density: UnsupportedDensity,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Corner label font size, pixels.
    #[serde(default = "default_label_size")]
    pub label_size: f64,
    /// Corner probability font size, pixels.
    #[serde(default = "default_value_size")]
    pub value_size: f64,
}

fn default_labels() -> [String; 2] {
    ["L".to_string(), "R".to_string()]
}

fn default_bins() -> usize {
    30
}

fn default_decimals() -> u32 {
    4
}

fn default_marker_radius() -> f64 {
    4.0
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

fn default_label_size() -> f64 {
    33.0
}

fn default_value_size() -> f64 {
    35.0
}

impl Default for TernaryOptions {
    fn default() -> Self {
        Self {
            labels: default_labels(),
            bins: default_bins(),
            decimals: default_decimals(),
            marker_radius: default_marker_radius(),
            unsupported_density: UnsupportedDensity::default(),
            width: default_width(),
            height: default_height(),
            label_size: default_label_size(),
            value_size: default_value_size(),
        }
    }
}

impl TernaryOptions {
    /// Defaults with custom corner labels.
    pub fn with_labels(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            labels: [left.into(), right.into()],
            ..Self::default()
        }
    }

    /// Set the out-of-grid point policy.
    pub fn with_unsupported_density(mut self, policy: UnsupportedDensity) -> Self {
        self.unsupported_density = policy;
        self
    }

    /// Set the canvas size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.bins < bcp_math::math::spline::MIN_KNOTS {
            return Err(PlotError::InvalidConfig(format!(
                "ternary bins must be at least {}, got {}",
                bcp_math::math::spline::MIN_KNOTS,
                self.bins
            )));
        }
        if self.decimals > bcp_math::math::saferound::MAX_PLACES {
            return Err(PlotError::InvalidConfig(format!(
                "ternary decimals must be at most {}",
                bcp_math::math::saferound::MAX_PLACES
            )));
        }
        validate_size(self.width, self.height)
    }
}

/// Density plot options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityOptions {
    /// Points sampled along the x sweep.
    #[serde(default = "default_points")]
    pub points: usize,
    /// Lower quantile the sweep must reach.
    #[serde(default = "default_lower_quantile")]
    pub lower_quantile: f64,
    /// Upper quantile the sweep must reach.
    #[serde(default = "default_upper_quantile")]
    pub upper_quantile: f64,
    /// The sweep also covers `rope_margin * rope` on both sides.
    #[serde(default = "default_rope_margin")]
    pub rope_margin: f64,
    /// Fractional space above the tallest curve.
    #[serde(default = "default_headroom")]
    pub headroom: f64,
    /// Number of y ticks, including zero and the maximum.
    #[serde(default = "default_tick_count")]
    pub tick_count: usize,
    #[serde(default = "default_tick_decimals")]
    pub tick_decimals: u32,
    /// Position of the ROPE boundary markers (drawn at both signs).
    #[serde(default = "default_rope_marker")]
    pub rope_marker: f64,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default = "default_fill_alpha")]
    pub fill_alpha: f64,
    #[serde(default = "default_true")]
    pub legend: bool,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Tick label font size, pixels.
    #[serde(default = "default_label_size")]
    pub tick_label_size: f64,
    /// Legend font size, pixels.
    #[serde(default = "default_legend_size")]
    pub legend_size: f64,
}

fn default_points() -> usize {
    100
}

fn default_lower_quantile() -> f64 {
    0.005
}

fn default_upper_quantile() -> f64 {
    0.995
}

fn default_rope_margin() -> f64 {
    1.05
}

fn default_headroom() -> f64 {
    0.02
}

fn default_tick_count() -> usize {
    4
}

fn default_tick_decimals() -> u32 {
    3
}

fn default_rope_marker() -> f64 {
    0.01
}

fn default_line_width() -> f64 {
    2.0
}

fn default_fill_alpha() -> f64 {
    0.1
}

fn default_true() -> bool {
    true
}

fn default_legend_size() -> f64 {
    28.0
}

impl Default for DensityOptions {
    fn default() -> Self {
        Self {
            points: default_points(),
            lower_quantile: default_lower_quantile(),
            upper_quantile: default_upper_quantile(),
            rope_margin: default_rope_margin(),
            headroom: default_headroom(),
            tick_count: default_tick_count(),
            tick_decimals: default_tick_decimals(),
            rope_marker: default_rope_marker(),
            line_width: default_line_width(),
            fill_alpha: default_fill_alpha(),
            legend: true,
            width: default_width(),
            height: default_height(),
            tick_label_size: default_label_size(),
            legend_size: default_legend_size(),
        }
    }
}

impl DensityOptions {
    /// Toggle the legend.
    pub fn with_legend(mut self, legend: bool) -> Self {
        self.legend = legend;
        self
    }

    /// Set the canvas size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.points < 2 {
            return Err(PlotError::InvalidConfig(
                "density sweep needs at least 2 points".to_string(),
            ));
        }
        if !(0.0 < self.lower_quantile
            && self.lower_quantile < self.upper_quantile
            && self.upper_quantile < 1.0)
        {
            return Err(PlotError::InvalidConfig(format!(
                "density quantiles must satisfy 0 < lower < upper < 1, got {} and {}",
                self.lower_quantile, self.upper_quantile
            )));
        }
        if self.tick_count < 2 {
            return Err(PlotError::InvalidConfig(
                "density plot needs at least 2 y ticks".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.fill_alpha) {
            return Err(PlotError::InvalidConfig(format!(
                "fill alpha must be in [0, 1], got {}",
                self.fill_alpha
            )));
        }
        validate_size(self.width, self.height)
    }
}

/// HTML comparison sheet options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SheetOptions {
    /// Custom page title.
    #[serde(default)]
    pub title: Option<String>,
    /// Skip minification even in release builds.
    #[serde(default)]
    pub no_minify: bool,
}

/// Complete plot configuration, as stored in a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default)]
    pub ternary: TernaryOptions,
    #[serde(default)]
    pub density: DensityOptions,
    #[serde(default)]
    pub sheet: SheetOptions,
}

fn default_schema_version() -> String {
    "1.0.0".to_string()
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            ternary: TernaryOptions::default(),
            density: DensityOptions::default(),
            sheet: SheetOptions::default(),
        }
    }
}

impl PlotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PlotConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.ternary.validate()?;
        self.density.validate()
    }
}

fn validate_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(PlotError::InvalidConfig(format!(
            "canvas size must be positive, got {}x{}",
            width, height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlotConfig::default();
        assert_eq!(config.schema_version, "1.0.0");
        assert_eq!(config.ternary.labels, ["L".to_string(), "R".to_string()]);
        assert_eq!(config.ternary.bins, 30);
        assert_eq!(config.ternary.decimals, 4);
        assert_eq!(config.density.points, 100);
        assert_eq!(config.density.tick_count, 4);
        assert_eq!(config.density.rope_marker, 0.01);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            PlotConfig::from_json(r#"{"ternary": {"labels": ["A", "B"], "unsupported_density": "floor"}}"#)
                .unwrap();
        assert_eq!(config.ternary.labels[0], "A");
        assert_eq!(config.ternary.unsupported_density, UnsupportedDensity::Floor);
        assert_eq!(config.ternary.bins, 30);
        assert_eq!(config.density, DensityOptions::default());
    }

    #[test]
    fn test_config_serialization() {
        let config = PlotConfig::default();
        let json = config.to_json().unwrap();
        let parsed = PlotConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(PlotConfig::from_json(r#"{"ternary": {"bins": 3}}"#).is_err());
        assert!(PlotConfig::from_json(r#"{"density": {"points": 1}}"#).is_err());
        assert!(
            PlotConfig::from_json(r#"{"density": {"lower_quantile": 0.9, "upper_quantile": 0.1}}"#)
                .is_err()
        );
        assert!(TernaryOptions::default().with_size(0, 10).validate().is_err());
    }

    #[test]
    fn test_builders() {
        let opts = TernaryOptions::with_labels("J48", "NB")
            .with_unsupported_density(UnsupportedDensity::Floor);
        assert_eq!(opts.labels[1], "NB");
        assert_eq!(opts.unsupported_density, UnsupportedDensity::Floor);
        assert!(!DensityOptions::default().with_legend(false).legend);
    }
}
