use crate::domain::errors::ForecastError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

const REDACTED_MESSAGE: &str = "Internal error while running the forecasting pipeline";

/// Error body returned by every endpoint: `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Maps a pipeline error to its HTTP status.
    ///
    /// With `redact` set, 500 responses carry a generic message and the
    /// detail only goes to the log.
    pub fn from_forecast(err: ForecastError, redact: bool) -> Self {
        let status = status_for(&err);
        let detail = err.to_string();

        if status.is_server_error() {
            error!("Forecast pipeline failed: {}", detail);
            if redact {
                return Self::new(status, REDACTED_MESSAGE);
            }
        } else {
            warn!("Rejected request: {}", detail);
        }
        Self::new(status, detail)
    }
}

pub fn status_for(err: &ForecastError) -> StatusCode {
    match err {
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        ForecastError::Busy => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&ForecastError::EmptyInput), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&ForecastError::NotTrained), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&ForecastError::Busy), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&ForecastError::InvalidDate {
                value: "x".to_string()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_redaction_only_affects_server_errors() {
        let err = ApiError::from_forecast(ForecastError::pipeline("matrix is singular"), true);
        assert_eq!(err.message, REDACTED_MESSAGE);

        let err = ApiError::from_forecast(ForecastError::pipeline("matrix is singular"), false);
        assert!(err.message.contains("singular"));

        let err = ApiError::from_forecast(ForecastError::NotTrained, true);
        assert_eq!(err.message, ForecastError::NotTrained.to_string());
    }
}
