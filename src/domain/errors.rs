use thiserror::Error;

/// Errors raised by the forecasting pipeline
#[derive(Debug, Error, PartialEq)]
pub enum ForecastError {
    #[error("No sales data provided to train the model")]
    EmptyInput,

    #[error("Invalid sale date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("The model has not been trained")]
    NotTrained,

    #[error("Feature shape mismatch: expected {expected} columns, got {actual}")]
    FeatureShapeMismatch { expected: usize, actual: usize },

    #[error("{component} used before being fitted")]
    NotFitted { component: &'static str },

    #[error("Invalid prediction period {days}: must be between 1 and {max}")]
    InvalidHorizon { days: i64, max: usize },

    #[error("A training run is already in progress, retry later")]
    Busy,

    #[error("Pipeline error: {reason}")]
    Pipeline { reason: String },
}

impl ForecastError {
    pub fn pipeline(reason: impl std::fmt::Display) -> Self {
        ForecastError::Pipeline {
            reason: reason.to_string(),
        }
    }

    /// Errors caused by the caller's input or by calling out of order.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ForecastError::EmptyInput
                | ForecastError::NotTrained
                | ForecastError::InvalidHorizon { .. }
        )
    }
}
