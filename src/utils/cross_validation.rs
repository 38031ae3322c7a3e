//! Rolling-origin cross-validation for one-step-ahead forecasts.

use crate::core::DailySeries;
use crate::error::{ForecastError, Result};
use crate::utils::metrics::rmse;

/// A growing training window `[0, train_end)` scored against observation `train_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fold {
    /// Exclusive end of the training window; also the index of the target.
    pub train_end: usize,
}

impl Fold {
    /// Index of the observation this fold forecasts.
    pub fn target(&self) -> usize {
        self.train_end
    }
}

/// Build expanding-window folds for one-step-ahead evaluation.
///
/// Targets run over `initial_window ..= n - 1 - holdout`; the last `holdout`
/// observations are never used as targets.
///
/// # Example
/// ```
/// use caseload_forecast::utils::cross_validation::expanding_folds;
///
/// let folds = expanding_folds(7, 3, 1);
/// let targets: Vec<usize> = folds.iter().map(|f| f.target()).collect();
/// assert_eq!(targets, vec![3, 4, 5]);
/// ```
pub fn expanding_folds(n: usize, initial_window: usize, holdout: usize) -> Vec<Fold> {
    let initial_window = initial_window.max(1);
    let last_target = match n.checked_sub(1 + holdout) {
        Some(t) => t,
        None => return vec![],
    };
    (initial_window..=last_target)
        .map(|train_end| Fold { train_end })
        .collect()
}

/// Outcome of scoring one forecaster over a set of folds.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldErrors {
    /// Signed errors (`actual - forecast`) for folds that could be fitted.
    pub errors: Vec<f64>,
    /// Folds skipped because the window was too short for the model.
    pub skipped: usize,
}

impl FoldErrors {
    /// RMSE over the usable folds; NaN when every fold was skipped.
    pub fn rmse(&self) -> f64 {
        rmse(&self.errors)
    }
}

/// Fit-and-forecast every fold with `one_step`, collecting signed errors.
///
/// `one_step` receives the training window and returns the forecast of the
/// next observation. Windows too short for the model (an
/// `InsufficientData` error) are skipped; any other error aborts scoring
/// and is returned to the caller.
pub fn one_step_errors<F>(series: &DailySeries, folds: &[Fold], one_step: F) -> Result<FoldErrors>
where
    F: Fn(&DailySeries) -> Result<f64>,
{
    let values = series.values();
    let mut errors = Vec::with_capacity(folds.len());
    let mut skipped = 0;

    for fold in folds {
        let actual = *values.get(fold.target()).ok_or(ForecastError::IndexOutOfBounds {
            index: fold.target(),
            size: values.len(),
        })?;
        let window = series.slice(0, fold.train_end)?;

        match one_step(&window) {
            Ok(forecast) => errors.push(actual - forecast),
            Err(e) if e.is_insufficient_data() => skipped += 1,
            Err(e) => return Err(e),
        }
    }

    Ok(FoldErrors { errors, skipped })
}
