//! # caseload-forecast
//!
//! Short-term forecasting of daily case counts with ARIMA models.
//!
//! A run takes one region's daily series through a fixed sequence of stages:
//! differencing until an Augmented Dickey-Fuller test rejects a unit root,
//! selecting the ARIMA order by rolling-origin cross-validation, fitting the
//! chosen order, checking its residuals, and forecasting with prediction
//! intervals. [`pipeline::Pipeline`] runs all of them; each stage is also
//! usable on its own.

#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod utils;
pub mod validation;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{DailySeries, Forecast, ForecastRow, PredictionInterval};
    pub use crate::data::{region_series, CaseRecord, RegionProfile};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::arima::{search_orders, ARIMASpec, OrderSearchConfig, ARIMA};
    pub use crate::pipeline::{ForecastConfig, Pipeline, PipelineConfig, PipelineReport};
    pub use crate::utils::{calculate_metrics, AccuracyMetrics};
    pub use crate::validation::{make_stationary, DiagnosticsConfig, ResidualDiagnostics, StationarityConfig};
}
