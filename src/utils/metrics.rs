//! Accuracy metrics for forecast evaluation.

use crate::error::{ForecastError, Result};

/// Accuracy summary over a set of forecast errors.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean error (bias); positive when forecasts run low.
    pub bias: f64,
    /// Number of errors summarised.
    pub n: usize,
}

/// Summarise signed errors (`actual - forecast`).
pub fn metrics_from_errors(errors: &[f64]) -> Result<AccuracyMetrics> {
    if errors.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    let n = errors.len() as f64;
    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e * e).sum::<f64>() / n;
    let bias = errors.iter().sum::<f64>() / n;

    Ok(AccuracyMetrics {
        mae,
        mse,
        rmse: mse.sqrt(),
        bias,
        n: errors.len(),
    })
}

/// Calculate accuracy metrics between actual and predicted values.
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    let errors: Vec<f64> = actual.iter().zip(predicted).map(|(a, p)| a - p).collect();
    metrics_from_errors(&errors)
}

/// Root mean squared error of signed errors. NaN for an empty slice.
pub fn rmse(errors: &[f64]) -> f64 {
    if errors.is_empty() {
        return f64::NAN;
    }
    (errors.iter().map(|e| e * e).sum::<f64>() / errors.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_prediction_has_zero_error() {
        let m = calculate_metrics(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.bias, 0.0);
        assert_eq!(m.n, 3);
    }

    #[test]
    fn known_values() {
        // errors: 1, -2, 3
        let m = calculate_metrics(&[2.0, 1.0, 6.0], &[1.0, 3.0, 3.0]).unwrap();
        assert_relative_eq!(m.mae, 2.0);
        assert_relative_eq!(m.mse, 14.0 / 3.0);
        assert_relative_eq!(m.rmse, (14.0_f64 / 3.0).sqrt());
        assert_relative_eq!(m.bias, 2.0 / 3.0);
    }

    #[test]
    fn dimension_mismatch() {
        assert!(matches!(
            calculate_metrics(&[1.0, 2.0], &[1.0]),
            Err(ForecastError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn empty_errors() {
        assert_eq!(metrics_from_errors(&[]), Err(ForecastError::EmptyData));
        assert!(rmse(&[]).is_nan());
    }

    #[test]
    fn standalone_rmse() {
        assert_relative_eq!(rmse(&[3.0, -4.0]), (12.5_f64).sqrt());
    }
}
