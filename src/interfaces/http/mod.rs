//! HTTP surface of the forecasting service.
//!
//! Two route families share one `ForecastService`:
//! - `/ml/train`, `/ml/predict` (JSON body, bare list response)
//! - `/train`, `/predict` (query string, `{"predictions": [...]}` response)

pub mod error;
pub mod routes;

use crate::application::system::forecast_service::ForecastService;
use crate::config::ServerEnvConfig;
use crate::domain::errors::ForecastError;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use error::ApiError;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ForecastService>,
    pub redact_internal_errors: bool,
}

impl AppState {
    pub fn new(service: Arc<ForecastService>, redact_internal_errors: bool) -> Self {
        Self {
            service,
            redact_internal_errors,
        }
    }

    pub(crate) fn api_error(&self, err: ForecastError) -> ApiError {
        ApiError::from_forecast(err, self.redact_internal_errors)
    }
}

pub fn router(service: Arc<ForecastService>, config: &ServerEnvConfig) -> Router {
    let state = AppState::new(service, config.redact_internal_errors);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::liveness))
        .route("/ml/status", get(routes::status))
        .route("/ml/train", post(routes::train))
        .route("/ml/predict", post(routes::predict))
        .route("/train", post(routes::train))
        .route("/predict", get(routes::predict_query))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
