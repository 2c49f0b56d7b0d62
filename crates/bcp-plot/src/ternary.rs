//! Ternary plot of left / ROPE / right probabilities.
//!
//! The triangle's bottom-left corner is the left alternative, the apex the
//! ROPE and the bottom-right corner the right alternative. Each Monte Carlo
//! draw is a point inside the triangle, coloured by the local density of
//! draws so that the bulk of the posterior stands out. Corner annotations
//! show the probabilities rounded with their total preserved.

use crate::color::BLUES;
use crate::config::{TernaryOptions, UnsupportedDensity};
use crate::error::Result;
use crate::figure::{Anchor, ArtistKind, Figure, Margins, Spines};
use crate::source::ProbabilitySource;
use crate::Rgba;
use bcp_math::simplex::{self, point_in_triangle, project_permuted, project_point, TRIANGLE};
use bcp_math::{format_units, saferound_units, BicubicGrid, Histogram2d};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Sample columns are `(left, rope, right)`; the projection wants
/// `(left corner, right corner, apex)`.
pub const SAMPLE_ORDER: [usize; 3] = [0, 2, 1];

const LIMITS: (f64, f64) = (-0.1, 1.1);
const BORDER_WIDTH: f64 = 3.0;
const DIVIDER_WIDTH: f64 = 2.0;

const Z_PATCH: i32 = 1;
const Z_SCATTER: i32 = 1;
const Z_LINE: i32 = 2;
const Z_TEXT: i32 = 3;

/// Clean a user label for the text layer.
///
/// Control characters become spaces, whitespace runs collapse to one space
/// and the ends are trimmed. Markup escaping is left to the drawing backend.
/// An empty result falls back to `fallback`.
pub fn sanitize_label(raw: &str, fallback: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        fallback.to_string()
    } else {
        collapsed
    }
}

/// Point density at each of `points`: a `bins x bins` histogram of the
/// points, interpolated bicubically between bin centres.
///
/// Points outside the bin-centre grid (the outer half bin on every side)
/// get `None`.
pub fn sample_density(points: &[[f64; 2]], bins: usize) -> Result<Vec<Option<f64>>> {
    let hist = Histogram2d::from_points(points, bins)?;
    let grid = BicubicGrid::new(&hist.x_centers(), &hist.y_centers(), hist.counts())?;
    Ok(points.iter().map(|p| grid.eval(p[0], p[1])).collect())
}

/// Draw the ternary plot for `source`.
pub fn tern<S: ProbabilitySource + ?Sized>(source: &S, options: &TernaryOptions) -> Result<Figure> {
    options.validate()?;
    let left = sanitize_label(&options.labels[0], "L");
    let right = sanitize_label(&options.labels[1], "R");

    let mut figure = Figure::new(options.width, options.height);
    figure.transparent = true;
    let axes = &mut figure.axes;
    axes.x_range = LIMITS;
    axes.y_range = LIMITS;
    axes.equal_aspect = true;
    axes.spines = Spines::NONE;
    axes.margins = Margins {
        left: 20,
        right: 20,
        top: 10,
        bottom: 70,
    };

    // Region dividers: centroid to each edge midpoint.
    let center = simplex::centroid();
    for mid in [[0.5, 0.5, 0.0], [0.5, 0.0, 0.5], [0.0, 0.5, 0.5]] {
        axes.add(
            Z_LINE,
            ArtistKind::Line {
                points: vec![center, project_point(mid)],
                color: Rgba::BLACK,
                width: DIVIDER_WIDTH,
                style: Default::default(),
            },
        );
    }

    axes.add(
        Z_PATCH,
        ArtistKind::Polygon {
            points: TRIANGLE.to_vec(),
            edge: Some((Rgba::BLACK, BORDER_WIDTH)),
            fill: None,
        },
    );

    let (p_left, p_rope, p_right) = source.probs();
    let units = saferound_units(&[p_left, p_rope, p_right], options.decimals)?;
    let value = |u: i64| format!("({})", format_units(u, options.decimals));

    let mut annotate = |text: String, at: [f64; 2], size: f64, bold: bool, anchor: Anchor| {
        axes.add(
            Z_TEXT,
            ArtistKind::Text {
                text,
                at,
                size,
                bold,
                anchor,
            },
        );
    };
    annotate(left, [-0.04, -0.02], options.label_size, false, Anchor::TopCenter);
    annotate(value(units[0]), [-0.04, -0.12], options.value_size, true, Anchor::TopCenter);
    annotate("ROPE".to_string(), [0.5, 1.0], options.label_size, false, Anchor::BottomCenter);
    annotate(value(units[1]), [0.5, 0.87], options.value_size, true, Anchor::BottomCenter);
    annotate(right, [1.04, -0.02], options.label_size, false, Anchor::TopCenter);
    annotate(value(units[2]), [1.04, -0.12], options.value_size, true, Anchor::TopCenter);

    let sample = source.sample();
    if sample.is_empty() {
        warn!("posterior sample is empty; ternary plot has no scatter layer");
        return Ok(figure);
    }

    let points = project_permuted(sample, SAMPLE_ORDER);
    let density = sample_density(&points, options.bins)?;
    if let Some(layer) = scatter_layer(
        &points,
        &density,
        options.unsupported_density,
        options.marker_radius,
    ) {
        figure.axes.add(Z_SCATTER, layer);
    }

    Ok(figure)
}

/// Order points by ascending density, colour them, and clip to the triangle.
fn scatter_layer(
    points: &[[f64; 2]],
    density: &[Option<f64>],
    policy: UnsupportedDensity,
    radius: f64,
) -> Option<ArtistKind> {
    let (lo, hi) = density
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), z| {
            (lo.min(*z), hi.max(*z))
        });

    let mut entries: Vec<([f64; 2], Option<f64>)> = points
        .iter()
        .copied()
        .zip(density.iter().copied())
        .filter(|(p, _)| point_in_triangle(*p))
        .collect();
    let unsupported = entries.iter().filter(|(_, z)| z.is_none()).count();
    if policy == UnsupportedDensity::Hide {
        entries.retain(|(_, z)| z.is_some());
    }
    entries.sort_by(|a, b| density_order(a.1, b.1));

    debug!(
        samples = points.len(),
        drawn = entries.len(),
        unsupported,
        policy = ?policy,
        "ternary scatter layer built"
    );

    if entries.is_empty() {
        return None;
    }

    let floor = BLUES.entries()[0];
    let colors = entries
        .iter()
        .map(|(_, z)| match z {
            Some(z) => BLUES.map_range(*z, lo, hi),
            None => floor,
        })
        .collect();
    Some(ArtistKind::Scatter {
        points: entries.into_iter().map(|(p, _)| p).collect(),
        colors,
        radius,
        clip: Some(TRIANGLE),
    })
}

/// Undefined densities sort below every defined one.
fn density_order(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_collapses_and_trims() {
        assert_eq!(sanitize_label("  J48 \t  vs\nNB ", "L"), "J48 vs NB");
        assert_eq!(sanitize_label("naive-bayes", "L"), "naive-bayes");
        assert_eq!(sanitize_label("a\u{7}b", "L"), "a b");
        assert_eq!(sanitize_label("   ", "R"), "R");
    }

    #[test]
    fn undefined_density_sorts_first() {
        let mut v = vec![Some(2.0), None, Some(0.5), None];
        v.sort_by(|a, b| density_order(*a, *b));
        assert_eq!(v, vec![None, None, Some(0.5), Some(2.0)]);
    }

    #[test]
    fn scatter_layer_sorted_and_clipped() {
        let points = [[0.5, 0.3], [0.4, 0.2], [0.5, -0.5], [0.6, 0.2]];
        let density = [Some(3.0), Some(1.0), Some(9.0), None];
        let layer = scatter_layer(&points, &density, UnsupportedDensity::Hide, 4.0).unwrap();
        match layer {
            ArtistKind::Scatter {
                points,
                colors,
                clip,
                ..
            } => {
                assert_eq!(clip, Some(TRIANGLE));
                assert_eq!(points, vec![[0.4, 0.2], [0.5, 0.3]]);
                // Normalised over every defined density, including the
                // clipped point.
                assert_eq!(colors[0], BLUES.entries()[0]);
                assert_eq!(colors[1], BLUES.map(2.0 / 8.0));
            }
            other => panic!("unexpected artist {other:?}"),
        }
    }

    #[test]
    fn floor_policy_keeps_unsupported_points_underneath() {
        let points = [[0.5, 0.3], [0.6, 0.2]];
        let density = [Some(3.0), None];
        let layer = scatter_layer(&points, &density, UnsupportedDensity::Floor, 4.0).unwrap();
        match layer {
            ArtistKind::Scatter { points, colors, .. } => {
                assert_eq!(points[0], [0.6, 0.2]);
                assert_eq!(colors[0], BLUES.entries()[0]);
            }
            other => panic!("unexpected artist {other:?}"),
        }
    }

    #[test]
    fn density_peaks_where_points_cluster() {
        let mut points = Vec::new();
        for i in 0..40 {
            for j in 0..40 {
                points.push([i as f64 / 39.0, j as f64 / 39.0]);
            }
        }
        // Dense cluster near the middle.
        for k in 0..400 {
            let t = k as f64 / 400.0;
            points.push([0.5 + 0.01 * (t * 40.0).sin(), 0.5 + 0.01 * (t * 40.0).cos()]);
        }
        let density = sample_density(&points, 30).unwrap();
        let center = density[1600].unwrap();
        let corner_region = density[40 * 5 + 5].unwrap();
        assert!(center > corner_region);
        // The extreme corner sits outside the bin-centre grid.
        assert!(density[0].is_none());
    }
}
