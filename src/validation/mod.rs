//! Statistical validation tests for time series models.
//!
//! Provides the unit-root test that drives differencing and diagnostic
//! tests for model residuals.
//!
//! # Example
//!
//! ```
//! use caseload_forecast::validation::{adf_test, durbin_watson, ljung_box};
//!
//! // Check if residuals are white noise
//! let residuals = vec![0.1, -0.2, 0.15, -0.1, 0.05, -0.08, 0.12, -0.15, 0.1, -0.05];
//! let lb_result = ljung_box(&residuals, Some(5), 0);
//! if lb_result.is_white_noise(0.05) {
//!     println!("Residuals pass Ljung-Box test");
//! }
//!
//! // Check for first-order autocorrelation
//! let dw_result = durbin_watson(&residuals);
//! println!("Durbin-Watson statistic: {}", dw_result.statistic);
//!
//! // Test for a unit root
//! let series = vec![1.0, 1.2, 0.9, 1.1, 1.0, 0.95, 1.05, 1.0, 1.1, 0.9];
//! let adf = adf_test(&series, None);
//! println!("ADF p-value: {}", adf.p_value);
//! ```

pub mod diagnostics;
pub mod residual_tests;
pub mod stationarity;

pub use diagnostics::{DiagnosticsConfig, ResidualDiagnostics};

pub use residual_tests::{
    durbin_watson, ljung_box, ljung_box_by_lag, AutocorrelationType, DurbinWatsonResult,
    LjungBoxResult,
};

pub use stationarity::{
    adf_test, make_stationary, mackinnon_p_value, CriticalValues, StationarityConfig,
    StationarityOutcome, StationarityResult,
};
