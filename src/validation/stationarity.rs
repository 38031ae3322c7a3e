//! Stationarity tests for time series.
//!
//! Provides the Augmented Dickey-Fuller unit-root test and the repeated
//! differencing loop that drives a series to stationarity.

use tracing::{debug, info, warn};

use crate::error::{ForecastError, Result};
use crate::models::arima::difference;
use crate::utils::ols::{ols_fit, OLSResult};
use crate::utils::stats::{is_constant, mean, normal_cdf};

/// Result of a stationarity test.
#[derive(Debug, Clone, PartialEq)]
pub struct StationarityResult {
    /// Test statistic
    pub statistic: f64,
    /// P-value (approximate)
    pub p_value: f64,
    /// Number of lags used
    pub lags: usize,
    /// Whether the unit-root null is rejected at 5%
    pub is_stationary: bool,
    /// Critical values at common significance levels
    pub critical_values: CriticalValues,
}

impl StationarityResult {
    /// Whether the unit-root null is rejected at `alpha`.
    ///
    /// An undefined p-value never rejects.
    pub fn rejects(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }

    fn degenerate(statistic: f64, p_value: f64) -> Self {
        Self {
            statistic,
            p_value,
            lags: 0,
            is_stationary: p_value < 0.05,
            critical_values: CriticalValues::ADF_CONSTANT,
        }
    }
}

/// Critical values for stationarity tests.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CriticalValues {
    /// Critical value at 1% significance
    pub cv_1pct: f64,
    /// Critical value at 5% significance
    pub cv_5pct: f64,
    /// Critical value at 10% significance
    pub cv_10pct: f64,
}

impl CriticalValues {
    /// Asymptotic ADF critical values for the regression with a constant.
    pub const ADF_CONSTANT: CriticalValues = CriticalValues {
        cv_1pct: -3.43,
        cv_5pct: -2.86,
        cv_10pct: -2.57,
    };
}

/// Default upper bound on ADF augmentation lags: `⌊12 (n/100)^{1/4}⌋`.
pub fn default_max_lag(n: usize) -> usize {
    (12.0 * (n as f64 / 100.0).powf(0.25)).floor() as usize
}

/// Augmented Dickey-Fuller test for unit root (non-stationarity).
///
/// Fits `Δy_t = α + β y_{t-1} + Σ_{i=1..k} γ_i Δy_{t-i} + ε_t` by OLS and
/// reports the t-statistic of β. The augmentation order `k` minimises AIC
/// over `0..=max_lag` on a common sample; the chosen regression is then
/// refitted on all usable observations.
///
/// Tests null hypothesis that series has a unit root (non-stationary).
/// Rejection implies stationarity.
///
/// Degenerate inputs:
/// - fewer than 4 observations: NaN statistic, not stationary
/// - constant series: statistic −∞, p-value 0
/// - first difference constant (a straight line): statistic +∞, p-value 1
/// - a regression that fits exactly: NaN statistic, not stationary
///
/// # Arguments
/// * `series` - Time series data
/// * `max_lag` - Maximum lags to include (default: [`default_max_lag`])
///
/// # Returns
/// `StationarityResult` with test statistic and p-value
pub fn adf_test(series: &[f64], max_lag: Option<usize>) -> StationarityResult {
    let n = series.len();

    if n < 4 {
        return StationarityResult::degenerate(f64::NAN, f64::NAN);
    }
    if is_constant(series) {
        return StationarityResult::degenerate(f64::NEG_INFINITY, 0.0);
    }
    let diff = difference(series, 1);
    if is_constant(&diff) {
        return StationarityResult::degenerate(f64::INFINITY, 1.0);
    }

    // Leave at least as many observations as regressors plus one.
    let feasible = (n / 2).saturating_sub(2);
    let max_lag = max_lag.unwrap_or_else(|| default_max_lag(n)).min(feasible);

    let Some(lags) = select_lag_aic(series, &diff, max_lag) else {
        return StationarityResult::degenerate(f64::NAN, f64::NAN);
    };

    let t_stat = match adf_regression(series, &diff, lags, lags + 1) {
        Some(fit) if !fit.exact => fit.ols.t_stat(1),
        _ => f64::NAN,
    };
    let p_value = mackinnon_p_value(t_stat);

    StationarityResult {
        statistic: t_stat,
        p_value,
        lags,
        is_stationary: p_value < 0.05,
        critical_values: CriticalValues::ADF_CONSTANT,
    }
}

struct AdfFit {
    ols: OLSResult,
    /// Residuals vanish relative to the spread of `Δy`.
    exact: bool,
}

/// OLS of the ADF regression with `lags` augmentation terms, using targets
/// `t = start..n` (indices into `series`).
fn adf_regression(series: &[f64], diff: &[f64], lags: usize, start: usize) -> Option<AdfFit> {
    let n = series.len();
    let mut y = Vec::with_capacity(n.saturating_sub(start));
    let mut design = Vec::with_capacity(n.saturating_sub(start));

    // diff[t - 1] = series[t] - series[t - 1]
    for t in start..n {
        y.push(diff[t - 1]);
        let mut row = Vec::with_capacity(lags + 2);
        row.push(1.0);
        row.push(series[t - 1]);
        row.extend((1..=lags).map(|i| diff[t - 1 - i]));
        design.push(row);
    }

    let ols = ols_fit(&y, &design)?;
    let y_mean = mean(&y);
    let tss: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    let exact = ols.rss <= 1e-12 * tss;
    Some(AdfFit { ols, exact })
}

/// Select lag order using AIC on the sample shared by every candidate.
fn select_lag_aic(series: &[f64], diff: &[f64], max_lag: usize) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for lag in 0..=max_lag {
        let Some(fit) = adf_regression(series, diff, lag, max_lag + 1) else {
            continue;
        };
        let nobs = fit.ols.nobs as f64;
        let k = (lag + 2) as f64;
        let aic = if fit.exact {
            f64::NEG_INFINITY
        } else {
            nobs * (fit.ols.rss / nobs).ln() + 2.0 * k
        };

        if best.map_or(true, |(_, b)| aic < b) {
            best = Some((lag, aic));
        }
    }

    best.map(|(lag, _)| lag)
}

/// MacKinnon (1994) approximate p-value for the ADF statistic, regression
/// with a constant and a single integrated variable.
pub fn mackinnon_p_value(t_stat: f64) -> f64 {
    const TAU_MAX: f64 = 2.74;
    const TAU_MIN: f64 = -18.83;
    const TAU_STAR: f64 = -1.61;
    const SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
    const LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

    if t_stat.is_nan() {
        return f64::NAN;
    }
    if t_stat > TAU_MAX {
        return 1.0;
    }
    if t_stat < TAU_MIN {
        return 0.0;
    }

    let coefficients: &[f64] = if t_stat <= TAU_STAR { &SMALL_P } else { &LARGE_P };
    let z = coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, c| acc * t_stat + c);
    normal_cdf(z)
}

/// Configuration for the differencing loop.
#[derive(Debug, Clone, PartialEq)]
pub struct StationarityConfig {
    /// Significance level for rejecting the unit root.
    pub alpha: f64,
    /// Maximum number of differencing passes.
    pub max_d: usize,
    /// ADF augmentation bound; `None` uses [`default_max_lag`].
    pub max_lag: Option<usize>,
}

impl Default for StationarityConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            max_d: 2,
            max_lag: None,
        }
    }
}

impl StationarityConfig {
    /// Set the significance level.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the maximum differencing order.
    pub fn with_max_d(mut self, max_d: usize) -> Self {
        self.max_d = max_d;
        self
    }

    /// Fix the ADF augmentation bound.
    pub fn with_max_lag(mut self, max_lag: usize) -> Self {
        self.max_lag = Some(max_lag);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "stationarity alpha {} must lie in (0, 1)",
                self.alpha
            )));
        }
        Ok(())
    }
}

/// Outcome of [`make_stationary`].
#[derive(Debug, Clone, PartialEq)]
pub struct StationarityOutcome {
    /// The series after `d` differences.
    pub series: Vec<f64>,
    /// Number of differences applied.
    pub d: usize,
    /// ADF result for each order tried, `tests[i]` at order `i`.
    pub tests: Vec<StationarityResult>,
    /// Whether the final test rejected the unit root.
    pub converged: bool,
}

impl StationarityOutcome {
    /// ADF result at the selected order.
    pub fn final_test(&self) -> Option<&StationarityResult> {
        self.tests.last()
    }
}

/// Difference `series` until the ADF test rejects a unit root at
/// `config.alpha`, or `config.max_d` passes have been applied.
///
/// When no order up to `max_d` rejects, the series differenced `max_d`
/// times is returned with `converged = false`.
///
/// # Example
/// ```
/// use caseload_forecast::validation::{make_stationary, StationarityConfig};
///
/// let cumulative = [100.0, 105.0, 115.0, 130.0, 150.0, 175.0, 205.0];
/// let outcome = make_stationary(&cumulative, &StationarityConfig::default()).unwrap();
///
/// assert_eq!(outcome.d, 2);
/// assert_eq!(outcome.series, vec![5.0; 5]);
/// assert!(outcome.converged);
/// ```
pub fn make_stationary(series: &[f64], config: &StationarityConfig) -> Result<StationarityOutcome> {
    config.validate()?;
    if series.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let mut current = series.to_vec();
    let mut tests = Vec::with_capacity(config.max_d + 1);

    for d in 0..=config.max_d {
        let result = adf_test(&current, config.max_lag);
        debug!(
            d,
            statistic = result.statistic,
            p_value = result.p_value,
            lags = result.lags,
            "ADF test"
        );
        let rejects = result.rejects(config.alpha);
        tests.push(result);

        if rejects {
            info!(d, "series is stationary");
            return Ok(StationarityOutcome {
                series: current,
                d,
                tests,
                converged: true,
            });
        }
        if d < config.max_d {
            current = difference(&current, 1);
        }
    }

    warn!(
        max_d = config.max_d,
        alpha = config.alpha,
        "unit root not rejected after maximum differencing"
    );
    Ok(StationarityOutcome {
        series: current,
        d: config.max_d,
        tests,
        converged: false,
    })
}
