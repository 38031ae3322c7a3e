//! Forecast result structure holding dated predictions and intervals.

use chrono::NaiveDate;

/// A prediction interval at a given confidence level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionInterval {
    /// Confidence level in (0, 1), e.g. 0.95.
    pub level: f64,
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
}

impl PredictionInterval {
    /// Interval width.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `value` lies within the bounds (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// One forecast step.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    /// Forecast date.
    pub date: NaiveDate,
    /// Point forecast.
    pub point: f64,
    /// Standard error of the forecast at this step.
    pub std_error: f64,
    /// Intervals, one per requested level.
    pub intervals: Vec<PredictionInterval>,
}

impl ForecastRow {
    /// Interval at `level`, if it was requested.
    pub fn interval(&self, level: f64) -> Option<&PredictionInterval> {
        self.intervals
            .iter()
            .find(|iv| (iv.level - level).abs() < 1e-9)
    }
}

/// A multi-step forecast for consecutive days.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    rows: Vec<ForecastRow>,
}

impl Forecast {
    /// Create a forecast from rows.
    pub fn from_rows(rows: Vec<ForecastRow>) -> Self {
        Self { rows }
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.rows.len()
    }

    /// Check if forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in date order.
    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    /// Forecast dates.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// Point forecasts.
    pub fn points(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.point).collect()
    }

    /// Lower bounds at `level` (None if the level was not requested).
    pub fn lower(&self, level: f64) -> Option<Vec<f64>> {
        self.rows
            .iter()
            .map(|r| r.interval(level).map(|iv| iv.lower))
            .collect()
    }

    /// Upper bounds at `level` (None if the level was not requested).
    pub fn upper(&self, level: f64) -> Option<Vec<f64>> {
        self.rows
            .iter()
            .map(|r| r.interval(level).map(|iv| iv.upper))
            .collect()
    }

    /// Clip point forecasts and interval bounds at zero.
    ///
    /// Case counts cannot be negative.
    pub fn clip_non_negative(mut self) -> Self {
        for row in &mut self.rows {
            row.point = row.point.max(0.0);
            for iv in &mut row.intervals {
                iv.lower = iv.lower.max(0.0);
                iv.upper = iv.upper.max(0.0);
            }
        }
        self
    }
}
