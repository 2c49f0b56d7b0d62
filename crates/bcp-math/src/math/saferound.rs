//! Sum-preserving rounding (largest remainder).
//!
//! Rounding each value independently can break their total: 0.3333 x 3 sums
//! to 0.9999. The values are floored to the target precision and the
//! missing units are handed out to the entries with the largest fractional
//! remainders, so the rounded values add up to the rounded total exactly.

use crate::error::{MathError, Result};

/// Largest supported number of decimal places.
pub const MAX_PLACES: u32 = 12;

/// Round `values` to `places` decimals, returning integer units of
/// `10^-places`. The units always sum to `round(sum(values) * 10^places)`.
///
/// Ties between equal remainders resolve in favour of the earlier entry.
pub fn saferound_units(values: &[f64], places: u32) -> Result<Vec<i64>> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(MathError::NonFinite {
            context: "saferound",
        });
    }
    let places = places.min(MAX_PLACES);
    let scale = 10f64.powi(places as i32);

    let scaled: Vec<f64> = values.iter().map(|v| v * scale).collect();
    let total: f64 = values.iter().sum();
    let target = (total * scale).round_ties_even() as i64;

    let mut units: Vec<i64> = scaled.iter().map(|s| s.floor() as i64).collect();
    let leftover = target - units.iter().sum::<i64>();
    if leftover == 0 {
        return Ok(units);
    }

    let mut order: Vec<usize> = (0..values.len()).collect();
    // Stable sort: equal remainders keep index order.
    order.sort_by(|&a, &b| {
        let ra = scaled[a] - scaled[a].floor();
        let rb = scaled[b] - scaled[b].floor();
        rb.total_cmp(&ra)
    });

    // Over-allocation can only come from float noise in the total; take
    // units back from the smallest remainders in that case.
    if leftover > 0 {
        for &idx in order.iter().cycle().take(leftover as usize) {
            units[idx] += 1;
        }
    } else {
        for &idx in order.iter().rev().cycle().take((-leftover) as usize) {
            units[idx] -= 1;
        }
    }

    Ok(units)
}

/// Round `values` to `places` decimals, preserving the rounded total.
pub fn saferound(values: &[f64], places: u32) -> Result<Vec<f64>> {
    let scale = 10f64.powi(places.min(MAX_PLACES) as i32);
    Ok(saferound_units(values, places)?
        .into_iter()
        .map(|u| u as f64 / scale)
        .collect())
}

/// Format integer units of `10^-places` as a fixed-point decimal string.
///
/// Avoids float formatting so that `7000` at 4 places prints as `0.7000`.
pub fn format_units(units: i64, places: u32) -> String {
    let places = places.min(MAX_PLACES);
    if places == 0 {
        return units.to_string();
    }
    let scale = 10u64.pow(places);
    let sign = if units < 0 { "-" } else { "" };
    let magnitude = units.unsigned_abs();
    format!(
        "{}{}.{:0width$}",
        sign,
        magnitude / scale,
        magnitude % scale,
        width = places as usize
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirds_keep_their_total() {
        let units = saferound_units(&[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0], 4).unwrap();
        assert_eq!(units.iter().sum::<i64>(), 10_000);
        assert_eq!(units, vec![3334, 3333, 3333]);
    }

    #[test]
    fn exact_values_are_untouched() {
        let units = saferound_units(&[0.7, 0.2, 0.1], 4).unwrap();
        assert_eq!(units, vec![7000, 2000, 1000]);
    }

    #[test]
    fn largest_remainder_wins() {
        // Remainders 0.6, 0.3, 0.1 in units of 1e-2; one unit is missing.
        let units = saferound_units(&[0.126, 0.443, 0.431], 2).unwrap();
        assert_eq!(units.iter().sum::<i64>(), 100);
        assert_eq!(units, vec![13, 44, 43]);
    }

    #[test]
    fn naive_rounding_would_overshoot() {
        let values: [f64; 3] = [0.125, 0.125, 0.75];
        let naive: f64 = values.iter().map(|v| (v * 100.0).round() / 100.0).sum();
        assert!((naive - 1.0).abs() > 1e-6);
        let units = saferound_units(&values, 2).unwrap();
        assert_eq!(units, vec![13, 12, 75]);
    }

    #[test]
    fn float_view_matches_units() {
        let rounded = saferound(&[0.25, 0.5, 0.25], 1).unwrap();
        assert_eq!(rounded.len(), 3);
        assert!((rounded.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn non_finite_is_rejected() {
        let err = saferound_units(&[0.5, f64::NAN, 0.5], 4).unwrap_err();
        assert!(matches!(err, MathError::NonFinite { .. }));
    }

    #[test]
    fn empty_input() {
        assert!(saferound_units(&[], 4).unwrap().is_empty());
    }

    #[test]
    fn formatting() {
        assert_eq!(format_units(7000, 4), "0.7000");
        assert_eq!(format_units(10_000, 4), "1.0000");
        assert_eq!(format_units(5, 4), "0.0005");
        assert_eq!(format_units(-125, 2), "-1.25");
        assert_eq!(format_units(42, 0), "42");
    }
}
