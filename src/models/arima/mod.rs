//! ARIMA (Autoregressive Integrated Moving Average) models.
//!
//! This module provides:
//! - Differencing and re-integration of daily series
//! - ARIMA(p, d, q) estimation by conditional sum of squares
//! - Order selection by rolling-origin cross-validation

mod diff;
mod model;
mod order_search;

pub use diff::{difference, integrate, undifference};
pub use model::{is_invertible, is_stationary, ARIMASpec, ARIMA};
pub use order_search::{
    evaluate_order, search_orders, EvaluationStatus, OrderEvaluation, OrderSearchConfig,
    OrderSearchResult,
};
