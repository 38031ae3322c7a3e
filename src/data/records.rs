//! Long-format case records.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::core::DailySeries;
use crate::error::{ForecastError, Result};

/// One day of reported cases for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
    pub region: String,
    pub date: NaiveDate,
    pub count: f64,
}

impl CaseRecord {
    pub fn new(region: impl Into<String>, date: NaiveDate, count: f64) -> Self {
        Self {
            region: region.into(),
            date,
            count,
        }
    }
}

/// Distinct region names, sorted.
pub fn regions(records: &[CaseRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.region.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Extract the daily series of `region`, ordered by date and labeled with
/// the region name.
///
/// # Errors
/// * `EmptyData` when no record matches `region`.
/// * `TimestampError` for a repeated date or a missing calendar day.
/// * `InvalidValue` for a negative or non-finite count.
///
/// # Example
/// ```
/// use caseload_forecast::data::{region_series, CaseRecord};
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2020, 4, d).unwrap();
/// let records = vec![
///     CaseRecord::new("Ontario", day(2), 12.0),
///     CaseRecord::new("Quebec", day(1), 30.0),
///     CaseRecord::new("Ontario", day(1), 10.0),
/// ];
///
/// let series = region_series(&records, "Ontario").unwrap();
/// assert_eq!(series.values(), &[10.0, 12.0]);
/// assert_eq!(series.label(), Some("Ontario"));
/// ```
pub fn region_series(records: &[CaseRecord], region: &str) -> Result<DailySeries> {
    let mut rows: Vec<&CaseRecord> = records.iter().filter(|r| r.region == region).collect();
    if rows.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    rows.sort_by_key(|r| r.date);

    if let Some(pair) = rows.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(ForecastError::TimestampError(format!(
            "duplicate date {} for {}",
            pair[0].date, region
        )));
    }

    let dates = rows.iter().map(|r| r.date).collect();
    let values = rows.iter().map(|r| r.count).collect();
    Ok(DailySeries::new(dates, values)?.with_label(region))
}
