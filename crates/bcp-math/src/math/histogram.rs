//! Two-dimensional histogram over the data range.
//!
//! Bin edges span `[min, max]` of each coordinate with equal widths; a
//! degenerate range `min == max` is widened to `[min - 0.5, max + 0.5]`.
//! Every bin is half-open except the last, which also includes its right edge.

use crate::error::{MathError, Result};

/// Counts of points falling into a regular `nx x ny` grid of bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram2d {
    x_edges: Vec<f64>,
    y_edges: Vec<f64>,
    /// Row-major: `counts[i * ny + j]` for x-bin `i` and y-bin `j`.
    counts: Vec<f64>,
}

impl Histogram2d {
    /// Bin `points` into `bins x bins` cells.
    pub fn from_points(points: &[[f64; 2]], bins: usize) -> Result<Self> {
        Self::from_points_with_bins(points, bins, bins)
    }

    pub fn from_points_with_bins(points: &[[f64; 2]], nx: usize, ny: usize) -> Result<Self> {
        if nx == 0 || ny == 0 {
            return Err(MathError::NoBins);
        }
        if points.iter().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
            return Err(MathError::NonFinite {
                context: "histogram",
            });
        }

        let x_edges = edges(points.iter().map(|p| p[0]), nx);
        let y_edges = edges(points.iter().map(|p| p[1]), ny);
        let mut counts = vec![0.0; nx * ny];
        for p in points {
            if let (Some(i), Some(j)) = (bin_index(&x_edges, p[0]), bin_index(&y_edges, p[1])) {
                counts[i * ny + j] += 1.0;
            }
        }

        Ok(Self {
            x_edges,
            y_edges,
            counts,
        })
    }

    pub fn x_edges(&self) -> &[f64] {
        &self.x_edges
    }

    pub fn y_edges(&self) -> &[f64] {
        &self.y_edges
    }

    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    pub fn nx(&self) -> usize {
        self.x_edges.len() - 1
    }

    pub fn ny(&self) -> usize {
        self.y_edges.len() - 1
    }

    /// Count in bin `(i, j)`.
    pub fn count(&self, i: usize, j: usize) -> f64 {
        self.counts[i * self.ny() + j]
    }

    /// Midpoints of the x bins.
    pub fn x_centers(&self) -> Vec<f64> {
        centers(&self.x_edges)
    }

    /// Midpoints of the y bins.
    pub fn y_centers(&self) -> Vec<f64> {
        centers(&self.y_edges)
    }

    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }
}

fn edges(values: impl Iterator<Item = f64>, bins: usize) -> Vec<f64> {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        // No data: unit range.
        lo = 0.0;
        hi = 1.0;
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let step = (hi - lo) / bins as f64;
    let mut out: Vec<f64> = (0..bins).map(|k| lo + step * k as f64).collect();
    out.push(hi);
    out
}

fn bin_index(edges: &[f64], v: f64) -> Option<usize> {
    let last = edges.len() - 1;
    if v < edges[0] || v > edges[last] {
        return None;
    }
    if v == edges[last] {
        return Some(last - 1);
    }
    let above = edges.partition_point(|e| *e <= v);
    Some(above - 1)
}

fn centers(edges: &[f64]) -> Vec<f64> {
    edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_point_once() {
        let points: Vec<[f64; 2]> = (0..100)
            .map(|k| {
                let t = k as f64 / 99.0;
                [t, (t * 7.0).sin()]
            })
            .collect();
        let hist = Histogram2d::from_points(&points, 30).unwrap();
        assert_eq!(hist.nx(), 30);
        assert_eq!(hist.ny(), 30);
        assert_eq!(hist.total(), 100.0);
    }

    #[test]
    fn maximum_lands_in_last_bin() {
        let points = [[0.0, 0.0], [1.0, 1.0], [0.5, 0.25]];
        let hist = Histogram2d::from_points(&points, 2).unwrap();
        assert_eq!(hist.count(1, 1), 1.0);
        assert_eq!(hist.count(0, 0), 1.0);
        // 0.5 sits on the inner edge and belongs to the upper bin.
        assert_eq!(hist.count(1, 0), 1.0);
    }

    #[test]
    fn degenerate_range_is_widened() {
        let points = [[0.25, 0.25], [0.25, 0.25]];
        let hist = Histogram2d::from_points(&points, 4).unwrap();
        assert_eq!(hist.x_edges()[0], -0.25);
        assert_eq!(*hist.x_edges().last().unwrap(), 0.75);
        assert_eq!(hist.total(), 2.0);
    }

    #[test]
    fn centers_are_midpoints() {
        let points = [[0.0, 0.0], [1.0, 2.0]];
        let hist = Histogram2d::from_points(&points, 2).unwrap();
        assert_eq!(hist.x_centers(), vec![0.25, 0.75]);
        assert_eq!(hist.y_centers(), vec![0.5, 1.5]);
    }

    #[test]
    fn empty_input_uses_unit_range() {
        let hist = Histogram2d::from_points(&[], 3).unwrap();
        assert_eq!(hist.x_edges()[0], 0.0);
        assert_eq!(hist.total(), 0.0);
    }

    #[test]
    fn rejects_non_finite_and_zero_bins() {
        assert!(Histogram2d::from_points(&[[f64::NAN, 0.0]], 3).is_err());
        assert_eq!(
            Histogram2d::from_points(&[[0.0, 0.0]], 0),
            Err(MathError::NoBins)
        );
    }
}
