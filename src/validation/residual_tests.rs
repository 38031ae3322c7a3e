//! Residual diagnostic tests for time series models.
//!
//! Provides tests to validate model residuals are white noise.

use crate::utils::stats::{acf, chi_squared_sf};

/// Ljung-Box test result.
#[derive(Debug, Clone, PartialEq)]
pub struct LjungBoxResult {
    /// Test statistic Q
    pub statistic: f64,
    /// P-value; NaN when no degrees of freedom remain
    pub p_value: f64,
    /// Number of lags tested
    pub lags: usize,
    /// Degrees of freedom
    pub df: usize,
}

impl LjungBoxResult {
    /// Check if residuals pass at given significance level.
    /// Returns true if we fail to reject null (residuals are white noise).
    pub fn is_white_noise(&self, alpha: f64) -> bool {
        self.p_value > alpha
    }

    /// Whether the p-value is defined.
    pub fn is_defined(&self) -> bool {
        !self.p_value.is_nan()
    }
}

/// Perform Ljung-Box test for autocorrelation in residuals.
///
/// Tests null hypothesis that residuals are independently distributed (white noise).
///
/// # Arguments
/// * `residuals` - Model residuals
/// * `lags` - Number of lags to include (default: min(10, n/5))
/// * `fitted_params` - Number of fitted ARMA parameters, subtracted from the degrees of freedom
///
/// # Returns
/// `LjungBoxResult` with test statistic and p-value
pub fn ljung_box(residuals: &[f64], lags: Option<usize>, fitted_params: usize) -> LjungBoxResult {
    let n = residuals.len();
    let lags = lags.unwrap_or_else(|| 10.min(n / 5).max(1));
    ljung_box_by_lag(residuals, lags, fitted_params)
        .pop()
        .unwrap_or(LjungBoxResult {
            statistic: f64::NAN,
            p_value: f64::NAN,
            lags: 0,
            df: 0,
        })
}

/// Ljung-Box statistics for every lag `1..=max_lag`.
///
/// Entry `h - 1` tests autocorrelations up to lag `h` with
/// `df = h - fitted_params`. Lags at or beyond the sample size are dropped.
///
/// # Example
/// ```
/// use caseload_forecast::validation::ljung_box_by_lag;
///
/// let residuals: Vec<f64> = (0..60).map(|i| ((i * 37 + 11) % 23) as f64 - 11.0).collect();
/// let results = ljung_box_by_lag(&residuals, 5, 1);
///
/// assert_eq!(results.len(), 5);
/// assert!(results[0].p_value.is_nan()); // df = 0
/// assert_eq!(results[4].df, 4);
/// ```
pub fn ljung_box_by_lag(residuals: &[f64], max_lag: usize, fitted_params: usize) -> Vec<LjungBoxResult> {
    let n = residuals.len();
    if n < 3 {
        return vec![];
    }
    let max_lag = max_lag.min(n - 1);
    let rho = acf(residuals, max_lag);

    let mut cumulative = 0.0;
    rho.iter()
        .enumerate()
        .map(|(i, r)| {
            let lag = i + 1;
            cumulative += r * r / (n - lag) as f64;
            let statistic = n as f64 * (n + 2) as f64 * cumulative;
            let df = lag.saturating_sub(fitted_params);
            LjungBoxResult {
                statistic,
                p_value: chi_squared_sf(statistic, df),
                lags: lag,
                df,
            }
        })
        .collect()
}

/// Durbin-Watson test result.
#[derive(Debug, Clone, PartialEq)]
pub struct DurbinWatsonResult {
    /// Test statistic (0 to 4)
    pub statistic: f64,
    /// Interpretation
    pub interpretation: AutocorrelationType,
}

/// Type of autocorrelation detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutocorrelationType {
    /// Strong positive autocorrelation (DW near 0)
    PositiveStrong,
    /// Weak positive autocorrelation (DW < 2)
    PositiveWeak,
    /// No autocorrelation (DW near 2)
    None,
    /// Weak negative autocorrelation (DW > 2)
    NegativeWeak,
    /// Strong negative autocorrelation (DW near 4)
    NegativeStrong,
}

impl AutocorrelationType {
    fn from_statistic(dw: f64) -> Self {
        if dw < 0.5 {
            Self::PositiveStrong
        } else if dw < 1.5 {
            Self::PositiveWeak
        } else if dw <= 2.5 {
            Self::None
        } else if dw < 3.5 {
            Self::NegativeWeak
        } else {
            Self::NegativeStrong
        }
    }
}

/// Perform Durbin-Watson test for first-order autocorrelation.
///
/// # Returns
/// `DurbinWatsonResult` with statistic (0-4) where:
/// - 0: Strong positive autocorrelation
/// - 2: No autocorrelation
/// - 4: Strong negative autocorrelation
pub fn durbin_watson(residuals: &[f64]) -> DurbinWatsonResult {
    if residuals.len() < 2 {
        return DurbinWatsonResult {
            statistic: f64::NAN,
            interpretation: AutocorrelationType::None,
        };
    }

    let sum_diff_sq: f64 = residuals.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    let sum_sq: f64 = residuals.iter().map(|&r| r * r).sum();

    if sum_sq == 0.0 {
        return DurbinWatsonResult {
            statistic: 2.0,
            interpretation: AutocorrelationType::None,
        };
    }

    let dw = sum_diff_sq / sum_sq;
    DurbinWatsonResult {
        statistic: dw,
        interpretation: AutocorrelationType::from_statistic(dw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::white_noise;
    use approx::assert_relative_eq;

    fn ar1(n: usize, phi: f64, seed: u64) -> Vec<f64> {
        let e = white_noise(n, seed);
        let mut x = vec![e[0]];
        for i in 1..n {
            x.push(phi * x[i - 1] + e[i]);
        }
        x
    }

    // ==================== ljung_box ====================

    #[test]
    fn ljung_box_white_noise_passes_every_lag() {
        let residuals = white_noise(200, 42);
        let results = ljung_box_by_lag(&residuals, 10, 0);

        assert_eq!(results.len(), 10);
        for r in &results {
            assert!(r.p_value > 0.05, "lag {} p = {}", r.lags, r.p_value);
            assert!(r.is_white_noise(0.05));
        }
    }

    #[test]
    fn ljung_box_ar1_fails_small_lags() {
        let residuals = ar1(200, 0.9, 42);
        let results = ljung_box_by_lag(&residuals, 5, 0);

        for r in &results {
            assert!(r.p_value < 0.05);
            assert!(!r.is_white_noise(0.05));
        }
    }

    #[test]
    fn ljung_box_statistic_accumulates() {
        let residuals = ar1(100, 0.5, 7);
        let results = ljung_box_by_lag(&residuals, 6, 0);
        for pair in results.windows(2) {
            assert!(pair[1].statistic >= pair[0].statistic);
        }
        let single = ljung_box(&residuals, Some(6), 0);
        assert_relative_eq!(single.statistic, results[5].statistic);
    }

    #[test]
    fn ljung_box_statistic_matches_definition() {
        let residuals = [1.0, -1.0, 2.0, -2.0, 1.0, 0.0, -1.0];
        let n = residuals.len() as f64;
        let rho = acf(&residuals, 2);
        let expected = n * (n + 2.0) * (rho[0].powi(2) / (n - 1.0) + rho[1].powi(2) / (n - 2.0));

        let result = ljung_box(&residuals, Some(2), 0);
        assert_relative_eq!(result.statistic, expected, epsilon = 1e-12);
        assert_eq!(result.df, 2);
    }

    #[test]
    fn ljung_box_df_accounts_for_fitted_params() {
        let residuals = white_noise(80, 3);
        let results = ljung_box_by_lag(&residuals, 4, 2);

        assert!(!results[0].is_defined());
        assert!(!results[1].is_defined());
        assert_eq!(results[2].df, 1);
        assert!(results[3].is_defined());
    }

    #[test]
    fn ljung_box_short_series() {
        assert!(ljung_box_by_lag(&[1.0, 2.0], 5, 0).is_empty());
        assert!(ljung_box(&[1.0], None, 0).statistic.is_nan());
    }

    #[test]
    fn ljung_box_constant_residuals() {
        let result = ljung_box(&[0.0; 20], Some(3), 0);
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    // ==================== durbin_watson ====================

    #[test]
    fn dw_white_noise_near_two() {
        let result = durbin_watson(&white_noise(200, 42));
        assert!(result.statistic > 1.5 && result.statistic < 2.5);
        assert_eq!(result.interpretation, AutocorrelationType::None);
    }

    #[test]
    fn dw_positive_autocorrelation() {
        let result = durbin_watson(&ar1(200, 0.9, 42));
        assert!(result.statistic < 0.5);
        assert_eq!(result.interpretation, AutocorrelationType::PositiveStrong);
    }

    #[test]
    fn dw_alternating_is_negative() {
        let residuals: Vec<f64> = (0..50).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let result = durbin_watson(&residuals);
        assert!(result.statistic > 3.5);
        assert_eq!(result.interpretation, AutocorrelationType::NegativeStrong);
    }

    #[test]
    fn dw_degenerate() {
        assert!(durbin_watson(&[1.0]).statistic.is_nan());
        assert_eq!(durbin_watson(&[0.0, 0.0, 0.0]).statistic, 2.0);
    }
}
