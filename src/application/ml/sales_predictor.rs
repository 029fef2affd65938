//! Sales predictor orchestration.
//!
//! `TrainedModel` is the immutable result of one training run: feature layout,
//! fitted scaler, fitted regressor and the training summary used as the trend
//! proxy for future days. `SalesPredictor` is the `Untrained -> Trained` state
//! machine around it. A new model is always assembled completely before it
//! replaces the previous one, so a failed run leaves the old model in place.

use super::features::FeatureBuilder;
use super::predictor::{Regressor, build_regressor};
use super::scaler::StandardScaler;
use crate::config::ModelEnvConfig;
use crate::domain::errors::ForecastError;
use crate::domain::ml::FeatureMode;
use crate::domain::sales::{ForecastEntry, SaleRecord, TrainingSummary};
use chrono::{DateTime, Days, Local, NaiveDate, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// Below this many rows the whole set is used for fitting.
pub const MIN_ROWS_FOR_HOLDOUT: usize = 10;
pub const HOLDOUT_FRACTION: f64 = 0.2;

pub struct TrainedModel {
    builder: FeatureBuilder,
    scaler: Option<StandardScaler>,
    regressor: Box<dyn Regressor>,
    summary: TrainingSummary,
    confidence_z: f64,
    max_horizon_days: usize,
    pub model_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub fitted_rows: usize,
    pub holdout_rows: usize,
}

impl std::fmt::Debug for TrainedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedModel")
            .field("builder", &self.builder)
            .field("scaler", &self.scaler)
            .field("regressor", &self.regressor.name())
            .field("summary", &self.summary)
            .field("confidence_z", &self.confidence_z)
            .field("max_horizon_days", &self.max_horizon_days)
            .field("model_id", &self.model_id)
            .field("trained_at", &self.trained_at)
            .field("fitted_rows", &self.fitted_rows)
            .field("holdout_rows", &self.holdout_rows)
            .finish()
    }
}

impl TrainedModel {
    /// Runs the full pipeline on `records`.
    pub fn fit(config: &ModelEnvConfig, records: &[SaleRecord]) -> Result<Self, ForecastError> {
        if records.is_empty() {
            return Err(ForecastError::EmptyInput);
        }
        let started = Instant::now();

        let builder = FeatureBuilder::new(config.feature_mode);
        let features = builder.build_training_features(records)?;

        let (x, scaler) = if config.scale_features {
            let mut scaler = StandardScaler::new();
            let scaled = scaler.fit_transform(&features.x)?;
            (scaled, Some(scaler))
        } else {
            (features.x, None)
        };

        // The holdout rows are set aside and never scored.
        let (x_fit, y_fit, holdout_rows) = holdout_split(x, features.y, config.split_seed);

        let mut regressor = build_regressor(config);
        regressor.fit(&x_fit, &y_fit)?;

        let model = Self {
            builder,
            scaler,
            regressor,
            summary: features.summary,
            confidence_z: config.confidence_z,
            max_horizon_days: config.max_horizon_days,
            model_id: Uuid::new_v4(),
            trained_at: Utc::now(),
            fitted_rows: x_fit.len(),
            holdout_rows,
        };

        info!(
            "Trained {} on {} records ({} fitted, {} held out) in {:?}",
            model.regressor.name(),
            model.summary.record_count,
            model.fitted_rows,
            model.holdout_rows,
            started.elapsed()
        );
        Ok(model)
    }

    pub fn summary(&self) -> &TrainingSummary {
        &self.summary
    }

    pub fn feature_mode(&self) -> FeatureMode {
        self.builder.mode()
    }

    pub fn regressor_name(&self) -> &str {
        self.regressor.name()
    }

    /// Half-width of the forecast interval; `None` when bounds are not reported.
    pub fn confidence_half_width(&self) -> Option<f64> {
        match self.builder.mode() {
            FeatureMode::Trend => Some(self.summary.stddev_amount * self.confidence_z),
            FeatureMode::Calendar => None,
        }
    }

    /// Forecast `days` consecutive days starting at `start` (inclusive).
    pub fn forecast_from(
        &self,
        start: NaiveDate,
        days: usize,
    ) -> Result<Vec<ForecastEntry>, ForecastError> {
        if days == 0 || days > self.max_horizon_days {
            return Err(ForecastError::InvalidHorizon {
                days: i64::try_from(days).unwrap_or(i64::MAX),
                max: self.max_horizon_days,
            });
        }

        let dates = (0..days as u64)
            .map(|offset| {
                start.checked_add_days(Days::new(offset)).ok_or_else(|| {
                    ForecastError::pipeline(format!("Date overflow {} days after {}", offset, start))
                })
            })
            .collect::<Result<Vec<NaiveDate>, _>>()?;

        let rows = self.builder.build_forecast_features(&self.summary, &dates);
        let rows = match &self.scaler {
            Some(scaler) => scaler.transform(&rows)?,
            None => rows,
        };
        let raw = self.regressor.predict(&rows)?;
        if raw.len() != dates.len() {
            return Err(ForecastError::pipeline(format!(
                "Expected {} predictions, got {}",
                dates.len(),
                raw.len()
            )));
        }

        let half_width = self.confidence_half_width();
        debug!("Forecasting {} days from {}", days, start);

        Ok(dates
            .into_iter()
            .zip(raw)
            .map(|(date, pred)| ForecastEntry {
                date,
                predicted_amount: pred.max(0.0),
                lower_bound: half_width.map(|h| (pred - h).max(0.0)),
                // upper bound is not clamped
                upper_bound: half_width.map(|h| pred + h),
            })
            .collect())
    }
}

/// Seeded 80/20 shuffle split. Returns the rows to fit and the holdout size.
fn holdout_split(x: Vec<Vec<f64>>, y: Vec<f64>, seed: u64) -> (Vec<Vec<f64>>, Vec<f64>, usize) {
    let n = x.len();
    if n < MIN_ROWS_FOR_HOLDOUT {
        return (x, y, 0);
    }

    let n_holdout = (n as f64 * HOLDOUT_FRACTION).ceil() as usize;
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let fit_idx = &indices[n_holdout..];
    let x_fit = fit_idx.iter().map(|&i| x[i].clone()).collect();
    let y_fit = fit_idx.iter().map(|&i| y[i]).collect();
    (x_fit, y_fit, n_holdout)
}

/// Owns the single in-memory model of the service.
pub struct SalesPredictor {
    config: ModelEnvConfig,
    model: Option<TrainedModel>,
}

impl SalesPredictor {
    pub fn new(config: ModelEnvConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    pub fn config(&self) -> &ModelEnvConfig {
        &self.config
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    /// Fits a fresh model and replaces the current one on success.
    pub fn train(&mut self, records: &[SaleRecord]) -> Result<&TrainedModel, ForecastError> {
        let model = TrainedModel::fit(&self.config, records)?;
        Ok(self.install(model))
    }

    /// Replaces the current model with one fitted elsewhere.
    pub fn install(&mut self, model: TrainedModel) -> &TrainedModel {
        self.model.insert(model)
    }

    /// Forecast starting today (local clock).
    pub fn forecast(&self, days: usize) -> Result<Vec<ForecastEntry>, ForecastError> {
        self.forecast_from(Local::now().date_naive(), days)
    }

    pub fn forecast_from(
        &self,
        start: NaiveDate,
        days: usize,
    ) -> Result<Vec<ForecastEntry>, ForecastError> {
        self.model
            .as_ref()
            .ok_or(ForecastError::NotTrained)?
            .forecast_from(start, days)
    }
}
