//! Shared forecasting service.
//!
//! One instance is created at startup and handed to every request handler.
//! Training runs are serialised: a second run while one is in flight is
//! rejected with `ForecastError::Busy`. The CPU-bound fit happens on the
//! blocking pool without holding the predictor lock; the write lock is only
//! taken to swap the finished model in, so readers see either the old or the
//! new model and never a partially trained one.

use crate::application::ml::{SalesPredictor, TrainedModel};
use crate::config::ModelEnvConfig;
use crate::domain::errors::ForecastError;
use crate::domain::ml::RegressorKind;
use crate::domain::sales::{ForecastEntry, SaleRecord};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Outcome of a successful training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub model_id: Uuid,
    pub regressor: String,
    pub record_count: usize,
    pub fitted_rows: usize,
    pub holdout_rows: usize,
    pub mean_amount: f64,
    pub stddev_amount: f64,
}

impl From<&TrainedModel> for TrainingReport {
    fn from(model: &TrainedModel) -> Self {
        Self {
            model_id: model.model_id,
            regressor: model.regressor_name().to_string(),
            record_count: model.summary().record_count,
            fitted_rows: model.fitted_rows,
            holdout_rows: model.holdout_rows,
            mean_amount: model.summary().mean_amount,
            stddev_amount: model.summary().stddev_amount,
        }
    }
}

/// Snapshot of the predictor state for status reporting
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub is_trained: bool,
    #[serde(rename = "model")]
    pub regressor: String,
    pub feature_mode: String,
    pub model_id: Option<Uuid>,
    pub trained_at: Option<DateTime<Utc>>,
    pub record_count: Option<usize>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub mean_amount: Option<f64>,
    pub stddev_amount: Option<f64>,
}

pub struct ForecastService {
    predictor: RwLock<SalesPredictor>,
    training: Mutex<()>,
}

impl ForecastService {
    pub fn new(config: ModelEnvConfig) -> Self {
        Self {
            predictor: RwLock::new(SalesPredictor::new(config)),
            training: Mutex::new(()),
        }
    }

    pub fn shared(config: ModelEnvConfig) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    pub async fn is_trained(&self) -> bool {
        self.predictor.read().await.is_trained()
    }

    pub async fn train(&self, records: Vec<SaleRecord>) -> Result<TrainingReport, ForecastError> {
        let _guard = self.training.try_lock().map_err(|_| {
            warn!("Rejected training request: another training run is in progress");
            ForecastError::Busy
        })?;

        if records.is_empty() {
            return Err(ForecastError::EmptyInput);
        }
        info!("Training requested with {} records", records.len());

        let config = self.predictor.read().await.config().clone();
        let model = tokio::task::spawn_blocking(move || TrainedModel::fit(&config, &records))
            .await
            .map_err(|e| {
                error!("Training task aborted: {}", e);
                ForecastError::pipeline(format!("Training task aborted: {}", e))
            })??;

        let mut predictor = self.predictor.write().await;
        let report = TrainingReport::from(predictor.install(model));
        info!("Model {} is now serving predictions", report.model_id);
        Ok(report)
    }

    /// Forecast starting today (local clock).
    pub async fn forecast(&self, days: usize) -> Result<Vec<ForecastEntry>, ForecastError> {
        self.forecast_from(Local::now().date_naive(), days).await
    }

    pub async fn forecast_from(
        &self,
        start: NaiveDate,
        days: usize,
    ) -> Result<Vec<ForecastEntry>, ForecastError> {
        self.predictor.read().await.forecast_from(start, days)
    }

    pub async fn max_horizon_days(&self) -> usize {
        self.predictor.read().await.config().max_horizon_days
    }

    pub async fn status(&self) -> ModelStatus {
        let predictor = self.predictor.read().await;
        let config = predictor.config();
        let model = predictor.model();
        let summary = model.map(|m| m.summary());

        ModelStatus {
            is_trained: predictor.is_trained(),
            regressor: model
                .map(|m| m.regressor_name().to_string())
                .unwrap_or_else(|| configured_label(config.regressor)),
            feature_mode: model
                .map(|m| m.feature_mode())
                .unwrap_or(config.feature_mode)
                .to_string(),
            model_id: model.map(|m| m.model_id),
            trained_at: model.map(|m| m.trained_at),
            record_count: summary.map(|s| s.record_count),
            first_date: summary.map(|s| s.first_date),
            last_date: summary.map(|s| s.last_date),
            mean_amount: summary.map(|s| s.mean_amount),
            stddev_amount: summary.map(|s| s.stddev_amount),
        }
    }
}

fn configured_label(kind: RegressorKind) -> String {
    format!("{} (untrained)", kind)
}
