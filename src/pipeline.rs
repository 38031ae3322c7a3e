//! End-to-end forecasting run for a single daily series.
//!
//! Stages run strictly in order, each consuming the previous stage's output:
//! stationarity → order search → final fit → residual diagnostics → forecast.

use tracing::{info, warn};

use crate::core::{DailySeries, Forecast};
use crate::error::{ForecastError, Result};
use crate::models::arima::{search_orders, ARIMASpec, OrderSearchConfig, OrderSearchResult, ARIMA};
use crate::validation::{make_stationary, DiagnosticsConfig, ResidualDiagnostics, StationarityConfig, StationarityOutcome};

/// Forecast horizon and interval levels.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Number of days to forecast.
    pub horizon: usize,
    /// Coverage levels of the prediction intervals, each in (0, 1).
    pub levels: Vec<f64>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 7,
            levels: vec![0.80, 0.95],
        }
    }
}

impl ForecastConfig {
    /// Set the number of days to forecast.
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the interval coverage levels.
    pub fn with_levels(mut self, levels: Vec<f64>) -> Self {
        self.levels = levels;
        self
    }

    /// Reject a zero horizon or a level outside (0, 1).
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "forecast horizon must be positive".to_string(),
            ));
        }
        if let Some(level) = self.levels.iter().find(|l| !(**l > 0.0 && **l < 1.0)) {
            return Err(ForecastError::InvalidParameter(format!(
                "interval level {} must lie in (0, 1)",
                level
            )));
        }
        Ok(())
    }
}

/// Configuration of every pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Differencing loop and unit-root test.
    pub stationarity: StationarityConfig,
    /// Order grid and fold layout; `d` is replaced by the order found by
    /// the stationarity stage.
    pub search: OrderSearchConfig,
    /// Residual checks on the final model.
    pub diagnostics: DiagnosticsConfig,
    /// Horizon and interval levels.
    pub forecast: ForecastConfig,
    /// Clip forecasts and interval bounds at zero.
    pub clip_negative: bool,
    /// Fail with `NonStationary` instead of continuing at `max_d`.
    pub require_stationarity: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stationarity: StationarityConfig::default(),
            search: OrderSearchConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
            forecast: ForecastConfig::default(),
            clip_negative: true,
            require_stationarity: false,
        }
    }
}

impl PipelineConfig {
    /// Replace the stationarity configuration.
    pub fn with_stationarity(mut self, stationarity: StationarityConfig) -> Self {
        self.stationarity = stationarity;
        self
    }

    /// Replace the order-search configuration.
    pub fn with_search(mut self, search: OrderSearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Replace the diagnostics configuration.
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticsConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Replace the forecast configuration.
    pub fn with_forecast(mut self, forecast: ForecastConfig) -> Self {
        self.forecast = forecast;
        self
    }

    /// Keep negative forecasts and bounds as produced by the model.
    pub fn without_clipping(mut self) -> Self {
        self.clip_negative = false;
        self
    }

    /// Abort when differencing does not reach stationarity.
    pub fn require_stationarity(mut self) -> Self {
        self.require_stationarity = true;
        self
    }

    /// Validate every stage configuration.
    pub fn validate(&self) -> Result<()> {
        self.stationarity.validate()?;
        self.search.validate()?;
        self.diagnostics.validate()?;
        self.forecast.validate()
    }
}

/// Everything a pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Differencing order and the unit-root test of every pass.
    pub stationarity: StationarityOutcome,
    /// Ranked candidate table.
    pub search: OrderSearchResult,
    /// Order of the final model.
    pub spec: ARIMASpec,
    /// Final model, fitted on the full series.
    pub model: ARIMA,
    /// Residual checks of the final model.
    pub diagnostics: ResidualDiagnostics,
    /// Dated forecast, clipped when configured.
    pub forecast: Forecast,
}

/// Forecasting pipeline.
///
/// # Example
/// ```
/// use caseload_forecast::core::DailySeries;
/// use caseload_forecast::models::arima::OrderSearchConfig;
/// use caseload_forecast::pipeline::{Pipeline, PipelineConfig};
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
/// let values: Vec<f64> = (0..40).map(|i| (20 + 4 * i + (i * 37 + 11) % 23) as f64).collect();
/// let series = DailySeries::from_start(start, values).unwrap();
///
/// let config = PipelineConfig::default()
///     .with_search(OrderSearchConfig::default().with_ranges(1..=2, 0..=1));
/// let report = Pipeline::new(config).run(&series).unwrap();
///
/// assert_eq!(report.forecast.horizon(), 7);
/// assert!(report.forecast.points().iter().all(|v| *v >= 0.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline with the given configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage on `series`.
    ///
    /// # Errors
    /// * `InvalidParameter` for an invalid configuration.
    /// * `NonStationary` when stationarity is required but not reached.
    /// * `NoViableOrder` when no candidate order could be scored.
    /// * `FitFailed` or `InsufficientData` when the final fit fails.
    pub fn run(&self, series: &DailySeries) -> Result<PipelineReport> {
        let config = &self.config;
        config.validate()?;
        let label = series.label().unwrap_or("series");
        info!(label, observations = series.len(), "starting forecast pipeline");

        let stationarity = make_stationary(series.values(), &config.stationarity)?;
        if !stationarity.converged {
            if config.require_stationarity {
                return Err(ForecastError::NonStationary {
                    max_d: config.stationarity.max_d,
                });
            }
            warn!(label, d = stationarity.d, "continuing with a series that is not stationary");
        }
        info!(label, d = stationarity.d, converged = stationarity.converged, "differencing order selected");

        let search_config = config.search.clone().with_d(stationarity.d);
        let search = search_orders(series, &search_config)?;
        let spec = search
            .best_spec(search_config.include_constant)
            .ok_or(ForecastError::NoViableOrder)?;

        let model = ARIMA::fit(series, spec)?;
        info!(
            label,
            order = %spec,
            ar = ?model.ar_coefficients(),
            ma = ?model.ma_coefficients(),
            intercept = model.intercept(),
            sigma2 = model.residual_variance(),
            "final model fitted"
        );

        let diagnostics = ResidualDiagnostics::for_model(&model, &config.diagnostics)?;
        if diagnostics.is_white_noise(config.diagnostics.alpha) {
            info!(label, "residuals consistent with white noise");
        } else {
            warn!(
                label,
                significant_lags = ?diagnostics.significant_acf_lags(),
                "residual autocorrelation remains"
            );
        }

        let mut forecast = model.forecast(config.forecast.horizon, &config.forecast.levels)?;
        if config.clip_negative {
            forecast = forecast.clip_non_negative();
        }
        info!(label, horizon = forecast.horizon(), "forecast produced");

        Ok(PipelineReport {
            stationarity,
            search,
            spec,
            model,
            diagnostics,
            forecast,
        })
    }
}
