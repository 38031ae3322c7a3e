//! Core data structures for daily case-count forecasting.

mod forecast;
mod time_series;

pub use forecast::{Forecast, ForecastRow, PredictionInterval};
pub use time_series::{dates_after, DailySeries};
