//! Utility functions shared by the forecasting stages.

pub mod cross_validation;
pub mod metrics;
pub mod ols;
pub mod optimization;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

pub use cross_validation::{expanding_folds, one_step_errors, Fold, FoldErrors};
pub use metrics::{calculate_metrics, metrics_from_errors, rmse, AccuracyMetrics};
pub use ols::{ols_fit, OLSResult};
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use stats::{acf, pacf, quantile_normal};
