//! ARIMA order selection by rolling-origin cross-validation.
//!
//! Every `(p, q)` pair in the configured grid is refitted from scratch on a
//! growing window and scored on the one-step-ahead forecast of the next
//! observation. Candidates are ranked by RMSE.

use std::cmp::Ordering;
use std::ops::RangeInclusive;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::core::DailySeries;
use crate::error::{ForecastError, Result};
use crate::models::arima::model::{ARIMASpec, ARIMA};
use crate::utils::cross_validation::{expanding_folds, one_step_errors};

/// Configuration for the order search.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSearchConfig {
    /// AR orders to try.
    pub p_range: RangeInclusive<usize>,
    /// MA orders to try.
    pub q_range: RangeInclusive<usize>,
    /// Differencing order shared by every candidate.
    pub d: usize,
    /// Training size of the first fold.
    pub initial_window: usize,
    /// Trailing observations never used as fold targets.
    pub holdout: usize,
    /// Fit candidates with a constant term.
    pub include_constant: bool,
    /// Evaluate candidates on the rayon thread pool.
    pub parallel: bool,
}

impl Default for OrderSearchConfig {
    fn default() -> Self {
        Self {
            p_range: 1..=4,
            q_range: 0..=4,
            d: 1,
            initial_window: 3,
            holdout: 1,
            include_constant: true,
            parallel: true,
        }
    }
}

impl OrderSearchConfig {
    /// Set the AR and MA grids.
    pub fn with_ranges(mut self, p_range: RangeInclusive<usize>, q_range: RangeInclusive<usize>) -> Self {
        self.p_range = p_range;
        self.q_range = q_range;
        self
    }

    /// Set the differencing order.
    pub fn with_d(mut self, d: usize) -> Self {
        self.d = d;
        self
    }

    /// Set the first training window and the trailing holdout.
    pub fn with_folds(mut self, initial_window: usize, holdout: usize) -> Self {
        self.initial_window = initial_window;
        self.holdout = holdout;
        self
    }

    /// Fit candidates without a constant term.
    pub fn without_constant(mut self) -> Self {
        self.include_constant = false;
        self
    }

    /// Evaluate candidates on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check that the grid is non-empty and the window is usable.
    pub fn validate(&self) -> Result<()> {
        if self.p_range.is_empty() || self.q_range.is_empty() {
            return Err(ForecastError::InvalidParameter(format!(
                "empty order grid p={:?} q={:?}",
                self.p_range, self.q_range
            )));
        }
        if self.initial_window == 0 {
            return Err(ForecastError::InvalidParameter(
                "initial_window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// All `(p, q)` pairs of the grid, p-major.
    pub fn candidates(&self) -> Vec<(usize, usize)> {
        self.p_range
            .clone()
            .flat_map(|p| self.q_range.clone().map(move |q| (p, q)))
            .collect()
    }

    fn spec(&self, p: usize, q: usize) -> ARIMASpec {
        ARIMASpec {
            p,
            d: self.d,
            q,
            include_constant: self.include_constant,
        }
    }
}

/// How a candidate fared.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationStatus {
    /// At least one fold produced a forecast.
    Scored,
    /// Every fold window was too short for the order.
    Degenerate,
    /// A fit or forecast failed for a reason other than window length.
    Failed(String),
}

/// One row of the ranked table.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEvaluation {
    /// AR order.
    pub p: usize,
    /// MA order.
    pub q: usize,
    /// One-step-ahead RMSE; `+∞` unless `status` is `Scored`.
    pub rmse: f64,
    /// Folds that produced a forecast.
    pub folds_used: usize,
    /// Folds skipped because the window was too short.
    pub folds_skipped: usize,
    /// Whether the candidate was scored, degenerate or failed.
    pub status: EvaluationStatus,
}

impl OrderEvaluation {
    /// Whether the RMSE comes from at least one forecast.
    pub fn is_scored(&self) -> bool {
        self.status == EvaluationStatus::Scored
    }

    fn rank(&self, other: &Self) -> Ordering {
        let by_rmse = match (self.rmse.is_finite(), other.rmse.is_finite()) {
            (true, true) => self.rmse.partial_cmp(&other.rmse).unwrap_or(Ordering::Equal),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
        };
        by_rmse
            .then((self.p + self.q).cmp(&(other.p + other.q)))
            .then(self.p.cmp(&other.p))
    }
}

/// Ranked outcome of an order search.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSearchResult {
    /// Differencing order used for every candidate.
    pub d: usize,
    /// Every candidate, best first.
    pub ranked: Vec<OrderEvaluation>,
}

impl OrderSearchResult {
    /// The top-ranked scored candidate.
    pub fn best(&self) -> Option<&OrderEvaluation> {
        self.ranked.first().filter(|row| row.is_scored())
    }

    /// Specification of the best candidate.
    pub fn best_spec(&self, include_constant: bool) -> Option<ARIMASpec> {
        self.best().map(|row| ARIMASpec {
            p: row.p,
            d: self.d,
            q: row.q,
            include_constant,
        })
    }

    /// Number of candidates evaluated.
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    /// Whether the grid produced no rows.
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Score one candidate over the configured folds.
pub fn evaluate_order(series: &DailySeries, p: usize, q: usize, config: &OrderSearchConfig) -> OrderEvaluation {
    let spec = config.spec(p, q);
    evaluate_with(series, p, q, config, |window| {
        let model = ARIMA::fit(window, spec)?;
        match model.predict(1).first() {
            Some(v) if v.is_finite() => Ok(*v),
            _ => Err(ForecastError::ComputationError(format!(
                "{} produced a non-finite forecast",
                spec
            ))),
        }
    })
}

fn evaluate_with<F>(
    series: &DailySeries,
    p: usize,
    q: usize,
    config: &OrderSearchConfig,
    one_step: F,
) -> OrderEvaluation
where
    F: Fn(&DailySeries) -> Result<f64>,
{
    let folds = expanding_folds(series.len(), config.initial_window, config.holdout);

    let evaluation = match one_step_errors(series, &folds, one_step) {
        Ok(errors) if errors.errors.is_empty() => OrderEvaluation {
            p,
            q,
            rmse: f64::INFINITY,
            folds_used: 0,
            folds_skipped: errors.skipped,
            status: EvaluationStatus::Degenerate,
        },
        Ok(errors) => OrderEvaluation {
            p,
            q,
            rmse: errors.rmse(),
            folds_used: errors.errors.len(),
            folds_skipped: errors.skipped,
            status: EvaluationStatus::Scored,
        },
        Err(e) => {
            warn!(p, q, d = config.d, error = %e, "candidate order failed");
            OrderEvaluation {
                p,
                q,
                rmse: f64::INFINITY,
                folds_used: 0,
                folds_skipped: 0,
                status: EvaluationStatus::Failed(e.to_string()),
            }
        }
    };

    debug!(
        p,
        q,
        rmse = evaluation.rmse,
        folds_used = evaluation.folds_used,
        folds_skipped = evaluation.folds_skipped,
        "evaluated candidate order"
    );
    evaluation
}

/// Evaluate every `(p, q)` in the grid and rank by one-step RMSE.
///
/// `series` is the level series; each candidate differences it internally
/// by `config.d`, so RMSE is on the original scale.
///
/// Ties in RMSE go to the smaller `p + q`, then the smaller `p`. Candidates
/// that could not be scored rank last. The table is identical whether or
/// not `config.parallel` is set.
///
/// # Example
/// ```
/// use caseload_forecast::core::DailySeries;
/// use caseload_forecast::models::arima::{search_orders, OrderSearchConfig};
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
/// let values: Vec<f64> = (0..30).map(|i| (10 + 3 * i + (i * 7) % 5) as f64).collect();
/// let series = DailySeries::from_start(start, values).unwrap();
///
/// let config = OrderSearchConfig::default().with_ranges(1..=2, 0..=1).with_d(1);
/// let result = search_orders(&series, &config).unwrap();
/// assert_eq!(result.len(), 4);
/// assert!(result.best().is_some());
/// ```
pub fn search_orders(series: &DailySeries, config: &OrderSearchConfig) -> Result<OrderSearchResult> {
    config.validate()?;
    Ok(rank_candidates(config, |p, q| evaluate_order(series, p, q, config)))
}

fn rank_candidates<E>(config: &OrderSearchConfig, evaluate: E) -> OrderSearchResult
where
    E: Fn(usize, usize) -> OrderEvaluation + Sync,
{
    let candidates = config.candidates();
    let mut ranked: Vec<OrderEvaluation> = if config.parallel {
        candidates.par_iter().map(|&(p, q)| evaluate(p, q)).collect()
    } else {
        candidates.iter().map(|&(p, q)| evaluate(p, q)).collect()
    };
    ranked.sort_by(|a, b| a.rank(b));

    let result = OrderSearchResult { d: config.d, ranked };
    match result.best() {
        Some(best) => info!(
            p = best.p,
            d = config.d,
            q = best.q,
            rmse = best.rmse,
            candidates = result.len(),
            "selected order"
        ),
        None => warn!(candidates = result.len(), "no candidate order could be scored"),
    }
    result
}
