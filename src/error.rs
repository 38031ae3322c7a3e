//! Error types for the caseload-forecast library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while preparing, modelling or forecasting a series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Dates are out of order, duplicated or not contiguous.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// An observation is negative or not finite.
    #[error("invalid value at index {index}: {value}")]
    InvalidValue { index: usize, value: f64 },

    /// Differencing did not reach stationarity.
    #[error("series is not stationary after {max_d} differences")]
    NonStationary { max_d: usize },

    /// Model estimation failed for a specific order.
    #[error("ARIMA{order:?} fit failed: {reason}")]
    FitFailed {
        order: (usize, usize, usize),
        reason: String,
    },

    /// Order search produced no usable candidate.
    #[error("no candidate order could be evaluated")]
    NoViableOrder,

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl ForecastError {
    /// Whether the error means "not enough observations" rather than a real failure.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, ForecastError::InsufficientData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForecastError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = ForecastError::InsufficientData { needed: 10, got: 5 };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 10, got 5"
        );

        let err = ForecastError::InvalidParameter("horizon must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "invalid parameter: horizon must be positive"
        );

        let err = ForecastError::InvalidValue {
            index: 3,
            value: -2.0,
        };
        assert_eq!(err.to_string(), "invalid value at index 3: -2");

        let err = ForecastError::NonStationary { max_d: 2 };
        assert_eq!(err.to_string(), "series is not stationary after 2 differences");

        let err = ForecastError::FitFailed {
            order: (2, 1, 1),
            reason: "singular".to_string(),
        };
        assert_eq!(err.to_string(), "ARIMA(2, 1, 1) fit failed: singular");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ForecastError::NoViableOrder;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }

    #[test]
    fn insufficient_data_is_recognised() {
        assert!(ForecastError::InsufficientData { needed: 4, got: 2 }.is_insufficient_data());
        assert!(!ForecastError::EmptyData.is_insufficient_data());
    }
}
