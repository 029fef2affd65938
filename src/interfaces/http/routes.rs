//! API route handlers

use super::AppState;
use super::error::ApiError;
use crate::application::system::forecast_service::{ModelStatus, TrainingReport};
use crate::domain::errors::ForecastError;
use crate::domain::sales::{ForecastEntry, SaleRecord};
use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

pub const DEFAULT_PREDICTION_DAYS: i64 = 7;

fn default_prediction_days() -> i64 {
    DEFAULT_PREDICTION_DAYS
}

#[derive(Debug, Deserialize)]
pub struct TrainRequest {
    pub sales: Option<Vec<SaleRecord>>,
}

#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub message: String,
    pub training: TrainingReport,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(rename = "predictionPeriod", default = "default_prediction_days")]
    pub prediction_period: i64,
}

impl Default for PredictRequest {
    fn default() -> Self {
        Self {
            prediction_period: DEFAULT_PREDICTION_DAYS,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PredictionsResponse {
    pub predictions: Vec<ForecastEntry>,
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    let status = match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    };
    ApiError::new(status, rejection.body_text())
}

/// `POST /ml/train` and `POST /train`
pub async fn train(
    State(state): State<AppState>,
    payload: Result<Json<TrainRequest>, JsonRejection>,
) -> Result<Json<TrainResponse>, ApiError> {
    let Json(request) = payload.map_err(json_rejection)?;

    let sales = request
        .sales
        .ok_or_else(|| ApiError::bad_request("No sales data provided"))?;
    info!("Received {} sales records", sales.len());
    if sales.is_empty() {
        return Err(ApiError::bad_request("Sales list is empty"));
    }

    let training = state
        .service
        .train(sales)
        .await
        .map_err(|e| state.api_error(e))?;

    Ok(Json(TrainResponse {
        message: "Model trained successfully".to_string(),
        training,
    }))
}

/// `POST /ml/predict`: body `{"predictionPeriod": n}`, which may be omitted.
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<ForecastEntry>>, ApiError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        PredictRequest::default()
    } else {
        serde_json::from_slice::<PredictRequest>(&body)
            .map_err(|e| ApiError::bad_request(format!("Invalid prediction request: {}", e)))?
    };

    let forecast = run_forecast(&state, request.prediction_period).await?;
    Ok(Json(forecast))
}

/// `GET /predict?days=n`
pub async fn predict_query(
    State(state): State<AppState>,
    query: Result<Query<PredictQuery>, QueryRejection>,
) -> Result<Json<PredictionsResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let days = query.days.unwrap_or(DEFAULT_PREDICTION_DAYS);

    let predictions = run_forecast(&state, days).await?;
    Ok(Json(PredictionsResponse { predictions }))
}

async fn run_forecast(state: &AppState, days: i64) -> Result<Vec<ForecastEntry>, ApiError> {
    if !state.service.is_trained().await {
        return Err(state.api_error(ForecastError::NotTrained));
    }

    let days = match usize::try_from(days) {
        Ok(days) => days,
        Err(_) => {
            let max = state.service.max_horizon_days().await;
            return Err(state.api_error(ForecastError::InvalidHorizon { days, max }));
        }
    };

    state
        .service
        .forecast(days)
        .await
        .map_err(|e| state.api_error(e))
}

/// `GET /ml/status`
pub async fn status(State(state): State<AppState>) -> Json<ModelStatus> {
    Json(state.service.status().await)
}

/// `GET /health`: liveness probe
pub async fn liveness() -> Json<Value> {
    Json(json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
