//! Statistical utility functions.

use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

/// Quantile function of the standard normal distribution.
///
/// # Example
/// ```
/// use caseload_forecast::utils::quantile_normal;
///
/// // 95% two-sided level -> z ≈ 1.96
/// let z = quantile_normal(0.975);
/// assert!((z - 1.96).abs() < 0.01);
/// ```
pub fn quantile_normal(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    Normal::new(0.0, 1.0)
        .map(|n| n.inverse_cdf(p))
        .unwrap_or(f64::NAN)
}

/// Cumulative distribution function of the standard normal distribution.
pub fn normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    Normal::new(0.0, 1.0).map(|n| n.cdf(x)).unwrap_or(f64::NAN)
}

/// Survival function (1 - CDF) of the chi-squared distribution.
///
/// Returns NaN when `df` is zero.
pub fn chi_squared_sf(x: f64, df: usize) -> f64 {
    if df == 0 || x.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 1.0;
    }
    ChiSquared::new(df as f64)
        .map(|c| (1.0 - c.cdf(x)).clamp(0.0, 1.0))
        .unwrap_or(f64::NAN)
}

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the variance of a slice (sample variance with n-1 denominator).
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Whether every value equals the first within a scale-aware tolerance.
pub fn is_constant(values: &[f64]) -> bool {
    let Some(&first) = values.first() else {
        return true;
    };
    let scale = values.iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));
    values.iter().all(|v| (v - first).abs() <= 1e-9 * scale)
}

/// Sample autocorrelation at a given lag.
///
/// Uses the full-sample variance in the denominator, as in the usual ACF
/// estimator. A zero-variance series has autocorrelation 0 at every lag > 0.
pub fn autocorrelation(values: &[f64], lag: usize) -> f64 {
    let n = values.len();
    if n <= lag {
        return f64::NAN;
    }
    if lag == 0 {
        return 1.0;
    }
    let m = mean(values);
    let denominator: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    if denominator == 0.0 {
        return 0.0;
    }
    let numerator: f64 = values[lag..]
        .iter()
        .zip(values.iter())
        .map(|(a, b)| (a - m) * (b - m))
        .sum();
    numerator / denominator
}

/// Autocorrelations for lags `1..=max_lag`.
///
/// Lags that cannot be estimated from the sample are NaN.
pub fn acf(values: &[f64], max_lag: usize) -> Vec<f64> {
    (1..=max_lag).map(|k| autocorrelation(values, k)).collect()
}

/// Partial autocorrelations for lags `1..=max_lag` via Durbin-Levinson.
pub fn pacf(values: &[f64], max_lag: usize) -> Vec<f64> {
    let rho: Vec<f64> = (0..=max_lag).map(|k| autocorrelation(values, k)).collect();
    let mut out = vec![f64::NAN; max_lag];
    if max_lag == 0 || rho.iter().any(|r| r.is_nan()) {
        return out;
    }

    let mut phi = vec![0.0; max_lag + 1];
    let mut prev = vec![0.0; max_lag + 1];
    let mut v: f64 = 1.0;

    for k in 1..=max_lag {
        let num = rho[k] - (1..k).map(|j| prev[j] * rho[k - j]).sum::<f64>();
        if v.abs() < 1e-12 {
            break;
        }
        let kappa = num / v;
        phi[k] = kappa;
        for j in 1..k {
            phi[j] = prev[j] - kappa * prev[k - j];
        }
        v *= 1.0 - kappa * kappa;
        out[k - 1] = kappa;
        prev[..=k].copy_from_slice(&phi[..=k]);
    }

    out
}
