//! Location-scale Student-t distribution.
//!
//! The posterior of a mean difference in the correlated Bayesian t-test is a
//! Student-t with `df` degrees of freedom, centred on the sample mean and
//! scaled by the square root of the posterior variance.
//!
//! All functions follow the NaN-in, NaN-out convention: invalid parameters
//! (`df <= 0`, `scale <= 0`, or any NaN) produce NaN.

use super::beta::incomplete_beta;
use super::stable::log_gamma;
use std::f64::consts::PI;

const QUANTILE_MAX_ITERS: usize = 200;
const QUANTILE_TOL: f64 = 1e-12;
const BRACKET_MAX_DOUBLINGS: usize = 1_100;

/// Student-t distribution with location and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudentT {
    /// Degrees of freedom (> 0).
    pub df: f64,
    /// Location (the mean for df > 1).
    pub loc: f64,
    /// Scale (> 0).
    pub scale: f64,
}

impl StudentT {
    pub fn new(df: f64, loc: f64, scale: f64) -> Self {
        Self { df, loc, scale }
    }

    /// Build from a variance parameter, taking `scale = sqrt(var)`.
    pub fn from_variance(df: f64, mean: f64, var: f64) -> Self {
        Self::new(df, mean, var.sqrt())
    }

    fn is_valid(&self) -> bool {
        !(self.df.is_nan() || self.loc.is_nan() || self.scale.is_nan())
            && self.df > 0.0
            && self.scale > 0.0
            && self.loc.is_finite()
            && self.scale.is_finite()
    }

    /// Log density at x.
    pub fn log_pdf(&self, x: f64) -> f64 {
        if x.is_nan() || !self.is_valid() {
            return f64::NAN;
        }
        let nu = self.df;
        let z = (x - self.loc) / self.scale;
        let norm = log_gamma(0.5 * (nu + 1.0))
            - log_gamma(0.5 * nu)
            - 0.5 * (nu * PI).ln()
            - self.scale.ln();
        norm - 0.5 * (nu + 1.0) * (z * z / nu).ln_1p()
    }

    /// Density at x.
    pub fn pdf(&self, x: f64) -> f64 {
        let lp = self.log_pdf(x);
        if lp.is_nan() {
            return f64::NAN;
        }
        lp.exp()
    }

    /// Cumulative distribution at x.
    pub fn cdf(&self, x: f64) -> f64 {
        if x.is_nan() || !self.is_valid() {
            return f64::NAN;
        }
        let z = (x - self.loc) / self.scale;
        standard_cdf(z, self.df)
    }

    /// Quantile function (inverse CDF) at probability p.
    pub fn ppf(&self, p: f64) -> f64 {
        if p.is_nan() || !self.is_valid() {
            return f64::NAN;
        }
        if p <= 0.0 {
            return f64::NEG_INFINITY;
        }
        if p >= 1.0 {
            return f64::INFINITY;
        }
        self.loc + self.scale * standard_ppf(p, self.df)
    }
}

fn standard_cdf(z: f64, nu: f64) -> f64 {
    if z == 0.0 {
        return 0.5;
    }
    if z.is_infinite() {
        return if z > 0.0 { 1.0 } else { 0.0 };
    }
    let z2 = z * z;
    // Lower tail mass P(T < -|z|), computed from whichever argument of the
    // incomplete beta avoids cancellation.
    let tail = if z2 > nu {
        0.5 * incomplete_beta(nu / (nu + z2), 0.5 * nu, 0.5)
    } else {
        0.5 * (1.0 - incomplete_beta(z2 / (nu + z2), 0.5, 0.5 * nu))
    };
    if z > 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

fn standard_ppf(p: f64, nu: f64) -> f64 {
    if p == 0.5 {
        return 0.0;
    }
    let mut low = -1.0;
    let mut high = 1.0;
    for _ in 0..BRACKET_MAX_DOUBLINGS {
        if standard_cdf(low, nu) <= p {
            break;
        }
        high = low;
        low *= 2.0;
    }
    for _ in 0..BRACKET_MAX_DOUBLINGS {
        if standard_cdf(high, nu) >= p {
            break;
        }
        low = high;
        high *= 2.0;
    }

    let mut mid = 0.5 * (low + high);
    for _ in 0..QUANTILE_MAX_ITERS {
        mid = 0.5 * (low + high);
        let cdf = standard_cdf(mid, nu);
        if cdf.is_nan() {
            return f64::NAN;
        }
        if cdf < p {
            low = mid;
        } else {
            high = mid;
        }
        if high - low < QUANTILE_TOL * (1.0 + mid.abs()) {
            break;
        }
    }
    mid
}
