//! Residual diagnostics bundle for a fitted model.

use crate::error::{ForecastError, Result};
use crate::models::arima::ARIMA;
use crate::utils::stats::{acf, pacf};
use crate::validation::residual_tests::{durbin_watson, ljung_box_by_lag, DurbinWatsonResult, LjungBoxResult};

/// Configuration for residual diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsConfig {
    /// Highest lag for ACF, PACF and Ljung-Box.
    pub max_lag: usize,
    /// Significance level for the white-noise verdict.
    pub alpha: f64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            max_lag: 10,
            alpha: 0.05,
        }
    }
}

impl DiagnosticsConfig {
    pub fn with_max_lag(mut self, max_lag: usize) -> Self {
        self.max_lag = max_lag;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_lag == 0 {
            return Err(ForecastError::InvalidParameter(
                "diagnostics max_lag must be at least 1".to_string(),
            ));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "diagnostics alpha {} must lie in (0, 1)",
                self.alpha
            )));
        }
        Ok(())
    }
}

/// Autocorrelation structure of a residual series.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualDiagnostics {
    /// Number of residuals examined.
    pub n: usize,
    /// Autocorrelations at lags `1..=max_lag`.
    pub acf: Vec<f64>,
    /// Partial autocorrelations at lags `1..=max_lag`.
    pub pacf: Vec<f64>,
    /// Ljung-Box result for each lag `1..=max_lag`.
    pub ljung_box: Vec<LjungBoxResult>,
    pub durbin_watson: DurbinWatsonResult,
}

impl ResidualDiagnostics {
    /// Compute diagnostics for `residuals`.
    ///
    /// `fitted_params` is the number of ARMA coefficients (p + q) and is
    /// subtracted from the Ljung-Box degrees of freedom.
    ///
    /// # Errors
    /// `InsufficientData` for fewer than three residuals.
    pub fn compute(residuals: &[f64], max_lag: usize, fitted_params: usize) -> Result<Self> {
        let n = residuals.len();
        if n < 3 {
            return Err(ForecastError::InsufficientData { needed: 3, got: n });
        }
        let max_lag = max_lag.min(n - 1);

        Ok(Self {
            n,
            acf: acf(residuals, max_lag),
            pacf: pacf(residuals, max_lag),
            ljung_box: ljung_box_by_lag(residuals, max_lag, fitted_params),
            durbin_watson: durbin_watson(residuals),
        })
    }

    /// Diagnostics of a fitted model's in-sample residuals.
    pub fn for_model(model: &ARIMA, config: &DiagnosticsConfig) -> Result<Self> {
        let spec = model.spec();
        Self::compute(model.residuals(), config.max_lag, spec.p + spec.q)
    }

    /// Whether every defined Ljung-Box p-value exceeds `alpha`.
    pub fn is_white_noise(&self, alpha: f64) -> bool {
        self.ljung_box
            .iter()
            .filter(|r| r.is_defined())
            .all(|r| r.is_white_noise(alpha))
    }

    /// Ljung-Box p-values, indexed by lag - 1.
    pub fn ljung_box_p_values(&self) -> Vec<f64> {
        self.ljung_box.iter().map(|r| r.p_value).collect()
    }

    /// Half-width of the approximate 95% band for a white-noise ACF.
    pub fn acf_band(&self) -> f64 {
        1.96 / (self.n as f64).sqrt()
    }

    /// Lags whose autocorrelation falls outside the 95% band.
    pub fn significant_acf_lags(&self) -> Vec<usize> {
        let band = self.acf_band();
        self.acf
            .iter()
            .enumerate()
            .filter(|(_, r)| r.abs() > band)
            .map(|(i, _)| i + 1)
            .collect()
    }
}
