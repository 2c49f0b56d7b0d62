//! Posterior inputs.
//!
//! The plots only read finished results. The following are trusted, not
//! checked: the three probabilities sum to one, every sample row lies on the
//! simplex, and the Student-t parameters are finite with `df > 0` and
//! `var > 0`.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Anything that can describe a two-way Bayesian comparison.
pub trait ProbabilitySource {
    /// `(left wins, within ROPE, right wins)`.
    fn probs(&self) -> (f64, f64, f64);

    /// Monte Carlo draws of `(left, rope, right)`, one row per draw.
    fn sample(&self) -> &[[f64; 3]];

    /// Student-t degrees of freedom.
    fn df(&self) -> f64;

    /// Student-t location.
    fn mean(&self) -> f64;

    /// Student-t variance; the scale is its square root.
    fn var(&self) -> f64;

    /// ROPE half-width.
    fn rope(&self) -> f64;

    /// Display name, if the source has one.
    fn name(&self) -> Option<&str> {
        None
    }
}

/// Serialised posterior, as exported by the inference step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `[left, rope, right]`.
    pub probs: [f64; 3],
    #[serde(default)]
    pub sample: Vec<[f64; 3]>,
    pub df: f64,
    pub mean: f64,
    pub var: f64,
    pub rope: f64,
}

impl PosteriorSnapshot {
    /// Load from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl ProbabilitySource for PosteriorSnapshot {
    fn probs(&self) -> (f64, f64, f64) {
        (self.probs[0], self.probs[1], self.probs[2])
    }

    fn sample(&self) -> &[[f64; 3]] {
        &self.sample
    }

    fn df(&self) -> f64 {
        self.df
    }

    fn mean(&self) -> f64 {
        self.mean
    }

    fn var(&self) -> f64 {
        self.var
    }

    fn rope(&self) -> f64 {
        self.rope
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
