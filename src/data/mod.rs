//! Preparation of per-region daily case series.
//!
//! Case counts arrive as long-format records (one row per region and day).
//! This module turns them into validated [`DailySeries`](crate::core::DailySeries)
//! and joins regional reference attributes.

mod records;
mod regions;

pub use records::{region_series, regions, CaseRecord};
pub use regions::{abbreviate, summarize_regions, RegionProfile, RegionSummary};
