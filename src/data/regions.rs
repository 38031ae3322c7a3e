//! Regional reference attributes and per-capita summaries.

use std::collections::BTreeMap;

use tracing::warn;

use crate::data::records::CaseRecord;
use crate::error::{ForecastError, Result};

/// Postal abbreviation of a Canadian province or territory.
///
/// Matching ignores case and surrounding whitespace; "Quebec" and "Québec"
/// are both accepted.
pub fn abbreviate(region: &str) -> Option<&'static str> {
    let abbreviation = match region.trim().to_lowercase().as_str() {
        "alberta" => "AB",
        "british columbia" => "BC",
        "manitoba" => "MB",
        "new brunswick" => "NB",
        "newfoundland and labrador" => "NL",
        "northwest territories" => "NT",
        "nova scotia" => "NS",
        "nunavut" => "NU",
        "ontario" => "ON",
        "prince edward island" => "PE",
        "quebec" | "québec" => "QC",
        "saskatchewan" => "SK",
        "yukon" => "YT",
        _ => return None,
    };
    Some(abbreviation)
}

/// Reference attributes of a region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionProfile {
    pub region: String,
    /// Postal abbreviation, or the region name when none is known.
    pub abbreviation: String,
    pub population: f64,
    pub area_km2: f64,
}

impl RegionProfile {
    pub fn new(region: impl Into<String>, population: f64, area_km2: f64) -> Self {
        let region = region.into();
        let abbreviation = abbreviate(&region)
            .map(str::to_string)
            .unwrap_or_else(|| region.clone());
        Self {
            region,
            abbreviation,
            population,
            area_km2,
        }
    }

    /// Residents per square kilometre.
    pub fn density(&self) -> f64 {
        self.population / self.area_km2
    }

    fn validate(&self) -> Result<()> {
        if !(self.population > 0.0 && self.area_km2 > 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "{}: population {} and area {} must be positive",
                self.region, self.population, self.area_km2
            )));
        }
        Ok(())
    }
}

/// Case totals of one region joined with its reference attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSummary {
    pub profile: RegionProfile,
    pub total_cases: f64,
    pub cases_per_100k: f64,
    /// Residents per square kilometre.
    pub density: f64,
}

/// Join per-region case totals with `profiles`.
///
/// Regions without a profile are skipped with a warning. Summaries are
/// ordered by region name.
///
/// # Errors
/// `InvalidParameter` when a profile has a non-positive population or area.
pub fn summarize_regions(records: &[CaseRecord], profiles: &[RegionProfile]) -> Result<Vec<RegionSummary>> {
    for profile in profiles {
        profile.validate()?;
    }

    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        *totals.entry(record.region.as_str()).or_insert(0.0) += record.count;
    }

    let mut summaries = Vec::with_capacity(totals.len());
    for (region, total_cases) in totals {
        let Some(profile) = profiles.iter().find(|p| p.region == region) else {
            warn!(region, "no reference profile; region skipped");
            continue;
        };
        summaries.push(RegionSummary {
            profile: profile.clone(),
            total_cases,
            cases_per_100k: total_cases / profile.population * 100_000.0,
            density: profile.density(),
        });
    }

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn record(region: &str, day: u32, count: f64) -> CaseRecord {
        CaseRecord::new(region, NaiveDate::from_ymd_opt(2020, 5, day).unwrap(), count)
    }

    #[test]
    fn abbreviations() {
        assert_eq!(abbreviate("British Columbia"), Some("BC"));
        assert_eq!(abbreviate("  québec "), Some("QC"));
        assert_eq!(abbreviate("Newfoundland and Labrador"), Some("NL"));
        assert_eq!(abbreviate("Repatriated travellers"), None);
    }

    #[test]
    fn profile_falls_back_to_name() {
        assert_eq!(RegionProfile::new("Ontario", 1.0, 1.0).abbreviation, "ON");
        assert_eq!(RegionProfile::new("Atlantis", 1.0, 1.0).abbreviation, "Atlantis");
    }

    #[test]
    fn summaries_join_totals_and_profiles() {
        let records = vec![
            record("Ontario", 1, 100.0),
            record("Ontario", 2, 150.0),
            record("Yukon", 1, 2.0),
            record("Nowhere", 1, 9.0),
        ];
        let profiles = vec![
            RegionProfile::new("Ontario", 14_500_000.0, 917_741.0),
            RegionProfile::new("Yukon", 40_000.0, 474_391.0),
        ];

        let summaries = summarize_regions(&records, &profiles).unwrap();
        assert_eq!(summaries.len(), 2);

        let ontario = &summaries[0];
        assert_eq!(ontario.profile.abbreviation, "ON");
        assert_relative_eq!(ontario.total_cases, 250.0);
        assert_relative_eq!(ontario.cases_per_100k, 250.0 / 145.0, epsilon = 1e-12);
        assert_relative_eq!(ontario.density, 14_500_000.0 / 917_741.0);

        assert_relative_eq!(summaries[1].cases_per_100k, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_profile_is_rejected() {
        let profiles = vec![RegionProfile::new("Ontario", 0.0, 917_741.0)];
        assert!(matches!(
            summarize_regions(&[], &profiles),
            Err(ForecastError::InvalidParameter(_))
        ));
    }
}
