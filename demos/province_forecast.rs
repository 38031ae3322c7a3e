//! Province-level case forecast, end to end.
//!
//! Run with: cargo run --example province_forecast
//! Set RUST_LOG=caseload_forecast=debug to see every candidate order.

use caseload_forecast::data::{region_series, summarize_regions, CaseRecord, RegionProfile};
use caseload_forecast::models::arima::{OrderSearchConfig, ARIMA};
use caseload_forecast::pipeline::{Pipeline, PipelineConfig};
use caseload_forecast::utils::calculate_metrics;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing_subscriber::EnvFilter;

/// Synthetic daily counts for a province: a logistic wave plus noise.
fn synthetic_records(region: &str, peak: f64, days: u64, seed: u64) -> Vec<CaseRecord> {
    let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, peak * 0.05).unwrap();

    start
        .iter_days()
        .take(days as usize)
        .enumerate()
        .map(|(i, date)| {
            let t = i as f64;
            let wave = peak / (1.0 + (-(t - 40.0) / 8.0).exp());
            let count = (wave + noise.sample(&mut rng)).max(0.0).round();
            CaseRecord::new(region, date, count)
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("caseload_forecast=info")),
        )
        .init();

    println!("=== Province case forecast ===\n");

    let mut records = synthetic_records("Ontario", 600.0, 70, 1);
    records.extend(synthetic_records("British Columbia", 120.0, 70, 2));

    let profiles = vec![
        RegionProfile::new("Ontario", 14_734_014.0, 1_076_395.0),
        RegionProfile::new("British Columbia", 5_147_712.0, 944_735.0),
    ];

    println!("{:<20} {:>4} {:>12} {:>14} {:>10}", "Region", "Abbr", "Cases", "Per 100k", "Density");
    println!("{:-<64}", "");
    for summary in summarize_regions(&records, &profiles).unwrap() {
        println!(
            "{:<20} {:>4} {:>12.0} {:>14.1} {:>10.2}",
            summary.profile.region,
            summary.profile.abbreviation,
            summary.total_cases,
            summary.cases_per_100k,
            summary.density
        );
    }

    let series = region_series(&records, "Ontario").unwrap();
    let config = PipelineConfig::default().with_search(OrderSearchConfig::default().with_ranges(1..=3, 0..=2));
    let report = Pipeline::new(config).run(&series).unwrap();

    println!("\n--- Differencing ---");
    for (d, test) in report.stationarity.tests.iter().enumerate() {
        println!("  d={}: ADF statistic {:.3}, p-value {:.4}", d, test.statistic, test.p_value);
    }

    println!("\n--- Order search (top 5 by one-step RMSE) ---");
    for row in report.search.ranked.iter().take(5) {
        println!(
            "  ARIMA({},{},{})  RMSE {:>10.3}  folds {:>3} (skipped {})",
            row.p, report.search.d, row.q, row.rmse, row.folds_used, row.folds_skipped
        );
    }

    println!("\n--- Final model: {} ---", report.spec);
    println!("AR coefficients: {:?}", report.model.ar_coefficients());
    println!("MA coefficients: {:?}", report.model.ma_coefficients());
    println!("Intercept: {:.4}", report.model.intercept());
    if let Some(aic) = report.model.aic() {
        println!("AIC: {:.2}", aic);
    }

    println!("\n--- Residual diagnostics ---");
    for lb in &report.diagnostics.ljung_box {
        println!("  lag {:>2}: Q = {:>8.3}  p = {:.4}", lb.lags, lb.statistic, lb.p_value);
    }
    println!("Durbin-Watson: {:.3}", report.diagnostics.durbin_watson.statistic);
    println!("White noise at 5%: {}", report.diagnostics.is_white_noise(0.05));

    println!("\n--- 7-day forecast ---");
    println!("{:>12} {:>10} {:>10} {:>10}", "Date", "Lower 95", "Forecast", "Upper 95");
    for row in report.forecast.rows() {
        let interval = row.interval(0.95).unwrap();
        println!(
            "{:>12} {:>10.1} {:>10.1} {:>10.1}",
            row.date, interval.lower, row.point, interval.upper
        );
    }

    println!("\n--- Holdout check (last 7 days) ---");
    let n = series.len();
    let training = series.slice(0, n - 7).unwrap();
    let model = ARIMA::fit(&training, report.spec).unwrap();
    let predicted = model.predict(7);
    let metrics = calculate_metrics(&series.values()[n - 7..], &predicted).unwrap();
    println!("MAE:  {:.3}", metrics.mae);
    println!("RMSE: {:.3}", metrics.rmse);
    println!("Bias: {:.3}", metrics.bias);
}
