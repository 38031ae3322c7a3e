//! Daily series of non-negative counts indexed by calendar date.

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};

/// The `horizon` consecutive days following `last`.
pub fn dates_after(last: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    (1..=horizon as u64)
        .map(|i| {
            last.checked_add_days(Days::new(i))
                .ok_or_else(|| ForecastError::TimestampError("date overflow".to_string()))
        })
        .collect()
}

/// A gap-free daily series of non-negative observations.
///
/// Construction enforces the invariants every downstream stage relies on:
/// dates strictly increasing with exactly one day between neighbours, and
/// finite, non-negative values.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    label: Option<String>,
}

impl DailySeries {
    /// Create a series from parallel date and value vectors.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if dates.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: dates.len(),
                got: values.len(),
            });
        }

        for (i, pair) in dates.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ForecastError::TimestampError(format!(
                    "dates must be strictly increasing ({} follows {} at index {})",
                    pair[1],
                    pair[0],
                    i + 1
                )));
            }
            let step = pair[1].signed_duration_since(pair[0]).num_days();
            if step != 1 {
                return Err(ForecastError::TimestampError(format!(
                    "gap of {} days between {} and {}",
                    step, pair[0], pair[1]
                )));
            }
        }

        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(ForecastError::InvalidValue { index, value });
        }

        Ok(Self {
            dates,
            values,
            label: None,
        })
    }

    /// Create a series of consecutive days starting at `start`.
    pub fn from_start(start: NaiveDate, values: Vec<f64>) -> Result<Self> {
        let dates = (0..values.len() as u64)
            .map(|i| {
                start
                    .checked_add_days(Days::new(i))
                    .ok_or_else(|| ForecastError::TimestampError("date overflow".to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(dates, values)
    }

    /// Attach a label (typically the region name).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; a `DailySeries` holds at least one observation.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Get the observed values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// First observed date.
    pub fn first_date(&self) -> NaiveDate {
        self.dates[0]
    }

    /// Last observed date.
    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// The `horizon` dates immediately following the last observation.
    pub fn next_dates(&self, horizon: usize) -> Result<Vec<NaiveDate>> {
        dates_after(self.last_date(), horizon)
    }

    /// Sub-series over `[start, end)`, keeping the label.
    pub fn slice(&self, start: usize, end: usize) -> Result<Self> {
        if start >= end {
            return Err(ForecastError::InvalidParameter(format!(
                "empty slice [{}, {})",
                start, end
            )));
        }
        if end > self.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "slice end {} exceeds series length {}",
                end,
                self.len()
            )));
        }
        Ok(Self {
            dates: self.dates[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
            label: self.label.clone(),
        })
    }

    /// Iterate over `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, d).unwrap()
    }

    #[test]
    fn builds_contiguous_series() {
        let ts = DailySeries::new(vec![day(1), day(2), day(3)], vec![0.0, 4.0, 9.0]).unwrap();
        assert_eq!(ts.len(), 3);
        assert_eq!(ts.first_date(), day(1));
        assert_eq!(ts.last_date(), day(3));
        assert_eq!(ts.values(), &[0.0, 4.0, 9.0]);
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(
            DailySeries::new(vec![], vec![]),
            Err(ForecastError::EmptyData)
        );
    }

    #[test]
    fn rejects_length_mismatch() {
        assert!(matches!(
            DailySeries::new(vec![day(1), day(2)], vec![1.0]),
            Err(ForecastError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn rejects_out_of_order_and_duplicates() {
        assert!(matches!(
            DailySeries::new(vec![day(2), day(1)], vec![1.0, 2.0]),
            Err(ForecastError::TimestampError(_))
        ));
        assert!(matches!(
            DailySeries::new(vec![day(2), day(2)], vec![1.0, 2.0]),
            Err(ForecastError::TimestampError(_))
        ));
    }

    #[test]
    fn rejects_gaps() {
        let err = DailySeries::new(vec![day(1), day(3)], vec![1.0, 2.0]).unwrap_err();
        assert!(err.to_string().contains("gap of 2 days"));
    }

    #[test]
    fn rejects_negative_and_nan_counts() {
        assert_eq!(
            DailySeries::new(vec![day(1), day(2)], vec![1.0, -1.0]),
            Err(ForecastError::InvalidValue {
                index: 1,
                value: -1.0
            })
        );
        assert!(matches!(
            DailySeries::new(vec![day(1)], vec![f64::NAN]),
            Err(ForecastError::InvalidValue { index: 0, .. })
        ));
    }

    #[test]
    fn from_start_generates_consecutive_dates() {
        let ts = DailySeries::from_start(day(30), vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(
            ts.dates(),
            &[
                day(30),
                day(31),
                NaiveDate::from_ymd_opt(2020, 4, 1).unwrap()
            ]
        );
    }

    #[test]
    fn next_dates_continue_daily() {
        let ts = DailySeries::from_start(day(1), vec![1.0, 2.0]).unwrap();
        assert_eq!(ts.next_dates(3).unwrap(), vec![day(3), day(4), day(5)]);
        assert!(ts.next_dates(0).unwrap().is_empty());
    }

    #[test]
    fn dates_after_crosses_month_end_and_overflows() {
        assert_eq!(
            dates_after(day(31), 2).unwrap(),
            vec![
                NaiveDate::from_ymd_opt(2020, 4, 1).unwrap(),
                NaiveDate::from_ymd_opt(2020, 4, 2).unwrap()
            ]
        );
        assert!(matches!(
            dates_after(NaiveDate::MAX, 1),
            Err(ForecastError::TimestampError(_))
        ));
    }

    #[test]
    fn slice_keeps_label_and_bounds() {
        let ts = DailySeries::from_start(day(1), vec![1.0, 2.0, 3.0, 4.0])
            .unwrap()
            .with_label("Ontario");
        let window = ts.slice(0, 2).unwrap();
        assert_eq!(window.values(), &[1.0, 2.0]);
        assert_eq!(window.label(), Some("Ontario"));
        assert!(ts.slice(2, 2).is_err());
        assert!(ts.slice(0, 5).is_err());
    }
}
