//! Cubic spline interpolation on rectilinear grids.
//!
//! Interpolants use the not-a-knot end condition (third derivative continuous
//! across the second and penultimate knots), which is what an interpolating
//! cubic B-spline with knots at the interior data points reduces to. The
//! bicubic interpolant is the tensor product of two such splines, so it is
//! evaluated as one spline per grid row followed by one across the rows.
//!
//! Queries outside the grid return `None`; there is no extrapolation.

use crate::error::{MathError, Result};

/// Minimum knots for the not-a-knot condition.
pub const MIN_KNOTS: usize = 4;

/// Not-a-knot cubic spline basis over fixed knots.
///
/// The knots fix the linear system for the second derivatives, so its inverse
/// is computed once and reused for any data vector on the same knots.
#[derive(Debug, Clone)]
pub struct NotAKnotSpline {
    knots: Vec<f64>,
    /// Row-major `n x n` inverse of the second-derivative system.
    inverse: Vec<f64>,
}

impl NotAKnotSpline {
    pub fn new(knots: &[f64]) -> Result<Self> {
        let n = knots.len();
        if n < MIN_KNOTS {
            return Err(MathError::GridTooSmall {
                required: MIN_KNOTS,
                actual: n,
            });
        }
        if knots.iter().any(|k| !k.is_finite()) {
            return Err(MathError::NonFinite {
                context: "spline knots",
            });
        }
        if knots.windows(2).any(|w| w[1] <= w[0]) {
            return Err(MathError::UnsortedGrid);
        }

        let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
        let mut a = vec![0.0; n * n];
        a[0] = h[1];
        a[1] = -(h[0] + h[1]);
        a[2] = h[0];
        for i in 1..n - 1 {
            a[i * n + i - 1] = h[i - 1];
            a[i * n + i] = 2.0 * (h[i - 1] + h[i]);
            a[i * n + i + 1] = h[i];
        }
        let last = n - 1;
        a[last * n + last - 2] = h[last - 1];
        a[last * n + last - 1] = -(h[last - 2] + h[last - 1]);
        a[last * n + last] = h[last - 2];

        let inverse = invert(a, n)?;
        Ok(Self {
            knots: knots.to_vec(),
            inverse,
        })
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn len(&self) -> usize {
        self.knots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    fn rhs(&self, values: &[f64]) -> Vec<f64> {
        let n = self.knots.len();
        let mut r = vec![0.0; n];
        for i in 1..n - 1 {
            let h0 = self.knots[i] - self.knots[i - 1];
            let h1 = self.knots[i + 1] - self.knots[i];
            r[i] = 6.0 * ((values[i + 1] - values[i]) / h1 - (values[i] - values[i - 1]) / h0);
        }
        r
    }

    fn moment(&self, rhs: &[f64], row: usize) -> f64 {
        let n = self.knots.len();
        self.inverse[row * n..(row + 1) * n]
            .iter()
            .zip(rhs)
            .map(|(a, r)| a * r)
            .sum()
    }

    /// Second derivatives of the interpolant at every knot.
    pub fn moments(&self, values: &[f64]) -> Vec<f64> {
        let rhs = self.rhs(values);
        (0..self.knots.len()).map(|k| self.moment(&rhs, k)).collect()
    }

    /// Index `k` of the segment `[knots[k], knots[k+1]]` containing `x`.
    pub fn segment(&self, x: f64) -> Option<usize> {
        let n = self.knots.len();
        if x.is_nan() || x < self.knots[0] || x > self.knots[n - 1] {
            return None;
        }
        let above = self.knots.partition_point(|k| *k <= x);
        Some(above.saturating_sub(1).min(n - 2))
    }

    /// Evaluate with precomputed moments.
    pub fn eval_with_moments(&self, values: &[f64], moments: &[f64], x: f64) -> Option<f64> {
        let k = self.segment(x)?;
        Some(self.eval_segment(k, x, values, moments[k], moments[k + 1]))
    }

    /// Evaluate the interpolant of `values` at `x`.
    ///
    /// Only the two moments bounding the segment are formed, so a one-off
    /// evaluation costs O(n).
    pub fn eval(&self, values: &[f64], x: f64) -> Option<f64> {
        let k = self.segment(x)?;
        let rhs = self.rhs(values);
        let m0 = self.moment(&rhs, k);
        let m1 = self.moment(&rhs, k + 1);
        Some(self.eval_segment(k, x, values, m0, m1))
    }

    fn eval_segment(&self, k: usize, x: f64, values: &[f64], m0: f64, m1: f64) -> f64 {
        let x0 = self.knots[k];
        let x1 = self.knots[k + 1];
        let h = x1 - x0;
        let a = x1 - x;
        let b = x - x0;
        m0 * a * a * a / (6.0 * h)
            + m1 * b * b * b / (6.0 * h)
            + (values[k] / h - m0 * h / 6.0) * a
            + (values[k + 1] / h - m1 * h / 6.0) * b
    }
}

/// Bicubic interpolant of values sampled on an `xs x ys` grid.
#[derive(Debug, Clone)]
pub struct BicubicGrid {
    x_spline: NotAKnotSpline,
    y_spline: NotAKnotSpline,
    /// Row-major `values[i * ny + j]`.
    values: Vec<f64>,
    /// Second derivatives along y for every x row.
    row_moments: Vec<f64>,
}

impl BicubicGrid {
    pub fn new(xs: &[f64], ys: &[f64], values: &[f64]) -> Result<Self> {
        let expected = xs.len() * ys.len();
        if values.len() != expected {
            return Err(MathError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::NonFinite {
                context: "grid values",
            });
        }
        let x_spline = NotAKnotSpline::new(xs)?;
        let y_spline = NotAKnotSpline::new(ys)?;
        let ny = ys.len();
        let row_moments = values
            .chunks(ny)
            .flat_map(|row| y_spline.moments(row))
            .collect();
        Ok(Self {
            x_spline,
            y_spline,
            values: values.to_vec(),
            row_moments,
        })
    }

    /// Interpolated value at `(x, y)`, or `None` outside the grid.
    pub fn eval(&self, x: f64, y: f64) -> Option<f64> {
        self.x_spline.segment(x)?;
        let ky = self.y_spline.segment(y)?;
        let ny = self.y_spline.len();
        let column: Vec<f64> = (0..self.x_spline.len())
            .map(|i| {
                let row = &self.values[i * ny..(i + 1) * ny];
                let m = &self.row_moments[i * ny..(i + 1) * ny];
                self.y_spline.eval_segment(ky, y, row, m[ky], m[ky + 1])
            })
            .collect();
        self.x_spline.eval(&column, x)
    }
}

/// Gauss-Jordan inversion with partial pivoting.
fn invert(mut a: Vec<f64>, n: usize) -> Result<Vec<f64>> {
    let mut inv = vec![0.0; n * n];
    for i in 0..n {
        inv[i * n + i] = 1.0;
    }
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&r1, &r2| a[r1 * n + col].abs().total_cmp(&a[r2 * n + col].abs()))
            .ok_or(MathError::SingularSystem)?;
        if a[pivot * n + col].abs() < 1e-300 {
            return Err(MathError::SingularSystem);
        }
        if pivot != col {
            for k in 0..n {
                a.swap(pivot * n + k, col * n + k);
                inv.swap(pivot * n + k, col * n + k);
            }
        }
        let diag = a[col * n + col];
        for k in 0..n {
            a[col * n + k] /= diag;
            inv[col * n + k] /= diag;
        }
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[row * n + col];
            if factor == 0.0 {
                continue;
            }
            for k in 0..n {
                a[row * n + k] -= factor * a[col * n + k];
                inv[row * n + k] -= factor * inv[col * n + k];
            }
        }
    }
    Ok(inv)
}
