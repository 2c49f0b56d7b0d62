//! Loading snapshots and configuration from disk.

use crate::error::{CliError, Result};
use bcp_plot::{PlotConfig, PosteriorSnapshot, UnsupportedDensity};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load a snapshot. An unnamed snapshot is named after its file stem.
pub fn load_snapshot(path: &Path) -> Result<PosteriorSnapshot> {
    let snapshot = PosteriorSnapshot::from_path(path).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        samples = snapshot.sample.len(),
        "snapshot loaded"
    );
    if snapshot.name.is_some() {
        return Ok(snapshot);
    }
    Ok(match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => snapshot.with_name(stem),
        None => snapshot,
    })
}

/// Load every snapshot in order.
pub fn load_snapshots(paths: &[PathBuf]) -> Result<Vec<PosteriorSnapshot>> {
    if paths.is_empty() {
        return Err(CliError::Args("at least one snapshot is required".to_string()));
    }
    paths.iter().map(|p| load_snapshot(p)).collect()
}

/// Load the plot configuration, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<PlotConfig> {
    match path {
        Some(path) => PlotConfig::from_path(path).map_err(|source| CliError::Input {
            path: path.to_path_buf(),
            source,
        }),
        None => Ok(PlotConfig::default()),
    }
}

/// Parse the `--unsupported-density` value.
pub fn parse_unsupported_density(s: &str) -> std::result::Result<UnsupportedDensity, String> {
    match s.trim().to_lowercase().as_str() {
        "hide" => Ok(UnsupportedDensity::Hide),
        "floor" => Ok(UnsupportedDensity::Floor),
        _ => Err(format!("unknown policy '{}' (expected hide or floor)", s)),
    }
}
