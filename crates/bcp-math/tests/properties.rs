//! Property-based tests for bcp-math.
//!
//! Uses proptest to check the invariants the plots rely on across many
//! random inputs.

use bcp_math::simplex::{point_in_triangle, project_point};
use bcp_math::{normalize_log_weights, saferound_units, BicubicGrid, Histogram2d, StudentT};
use proptest::prelude::*;

/// Random point on the 3-simplex.
fn simplex_point() -> impl Strategy<Value = [f64; 3]> {
    (0.0..1.0f64, 0.0..1.0f64).prop_map(|(u, v)| {
        // Fold the unit square onto the lower triangle.
        let (u, v) = if u + v > 1.0 { (1.0 - u, 1.0 - v) } else { (u, v) };
        [u, v, 1.0 - u - v]
    })
}

// ============================================================================
// Projection
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every simplex point lands inside the triangle.
    #[test]
    fn projection_stays_in_triangle(w in simplex_point()) {
        let p = project_point(w);
        prop_assert!(point_in_triangle(p), "{:?} -> {:?}", w, p);
    }

    /// The projection is affine: mixing weights mixes images.
    #[test]
    fn projection_is_affine(a in simplex_point(), b in simplex_point(), t in 0.0..1.0f64) {
        let mix = [
            t * a[0] + (1.0 - t) * b[0],
            t * a[1] + (1.0 - t) * b[1],
            t * a[2] + (1.0 - t) * b[2],
        ];
        let pa = project_point(a);
        let pb = project_point(b);
        let pm = project_point(mix);
        prop_assert!((pm[0] - (t * pa[0] + (1.0 - t) * pb[0])).abs() < 1e-12);
        prop_assert!((pm[1] - (t * pa[1] + (1.0 - t) * pb[1])).abs() < 1e-12);
    }
}

// ============================================================================
// Saferound
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Rounded probabilities always add up to exactly 1.0000.
    #[test]
    fn saferound_preserves_unit_total(w in simplex_point()) {
        let units = saferound_units(&w, 4).unwrap();
        prop_assert_eq!(units.iter().sum::<i64>(), 10_000);
    }

    /// Each rounded value is within one unit of the input.
    #[test]
    fn saferound_stays_close(w in simplex_point()) {
        let units = saferound_units(&w, 4).unwrap();
        for (u, v) in units.iter().zip(w) {
            prop_assert!((*u as f64 / 1e4 - v).abs() <= 1e-4 + 1e-12);
        }
    }

    /// Arbitrary vectors keep their rounded total too.
    #[test]
    fn saferound_total_arbitrary(values in prop::collection::vec(0.0..10.0f64, 1..10)) {
        let units = saferound_units(&values, 2).unwrap();
        let total: f64 = values.iter().sum();
        prop_assert_eq!(units.iter().sum::<i64>(), (total * 100.0).round_ties_even() as i64);
    }
}

// ============================================================================
// Student-t
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Quantile inverts the CDF.
    #[test]
    fn ppf_inverts_cdf(df in 0.5..200.0f64, loc in -1.0..1.0f64, scale in 0.01..3.0f64, p in 0.001..0.999f64) {
        let t = StudentT::new(df, loc, scale);
        let x = t.ppf(p);
        prop_assert!((t.cdf(x) - p).abs() < 1e-8, "df={} p={} x={}", df, p, x);
    }

    /// The CDF is symmetric about the location.
    #[test]
    fn cdf_symmetric(df in 0.5..200.0f64, d in 0.0..10.0f64) {
        let t = StudentT::new(df, 0.0, 1.0);
        prop_assert!((t.cdf(d) + t.cdf(-d) - 1.0).abs() < 1e-10);
    }

    /// Discretised density curves sum to one whatever the sweep width.
    #[test]
    fn normalized_curve_sums_to_one(df in 1.0..100.0f64, width in 0.001..100.0f64) {
        let t = StudentT::new(df, 0.0, 0.05);
        let log_pdf: Vec<f64> = (0..100)
            .map(|k| -width + 2.0 * width * k as f64 / 99.0)
            .map(|x| t.log_pdf(x))
            .collect();
        let y = normalize_log_weights(&log_pdf);
        prop_assert!((y.iter().sum::<f64>() - 1.0).abs() < 1e-10);
    }
}

// ============================================================================
// Histogram + interpolation
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Histograms never lose points.
    #[test]
    fn histogram_conserves_mass(points in prop::collection::vec(simplex_point(), 1..300)) {
        let projected: Vec<[f64; 2]> = points.iter().copied().map(project_point).collect();
        let hist = Histogram2d::from_points(&projected, 30).unwrap();
        prop_assert_eq!(hist.total(), points.len() as f64);
    }

    /// The interpolant matches bin counts at bin centres.
    #[test]
    fn interpolant_hits_bin_centres(points in prop::collection::vec(simplex_point(), 10..200)) {
        let projected: Vec<[f64; 2]> = points.iter().copied().map(project_point).collect();
        let hist = Histogram2d::from_points(&projected, 8).unwrap();
        let xs = hist.x_centers();
        let ys = hist.y_centers();
        let grid = BicubicGrid::new(&xs, &ys, hist.counts()).unwrap();
        for (i, x) in xs.iter().enumerate() {
            for (j, y) in ys.iter().enumerate() {
                let z = grid.eval(*x, *y).unwrap();
                prop_assert!((z - hist.count(i, j)).abs() < 1e-8);
            }
        }
    }
}
