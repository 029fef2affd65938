use crate::domain::errors::ForecastError;
use crate::domain::ml::{FeatureMode, FeatureVector};
use crate::domain::sales::{SaleRecord, TrainingSummary};
use chrono::NaiveDate;
use statrs::statistics::{Data, Distribution};

/// Number of samples in the trailing window (samples, not calendar days).
pub const TRAILING_WINDOW: usize = 7;

/// Feature matrix, target vector and whole-set statistics of a training run.
#[derive(Debug, Clone)]
pub struct TrainingFeatures {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<f64>,
    pub summary: TrainingSummary,
}

/// Turns sales records into model rows.
#[derive(Debug, Clone, Copy)]
pub struct FeatureBuilder {
    mode: FeatureMode,
}

impl FeatureBuilder {
    pub fn new(mode: FeatureMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> FeatureMode {
        self.mode
    }

    pub fn build_training_features(
        &self,
        records: &[SaleRecord],
    ) -> Result<TrainingFeatures, ForecastError> {
        if records.is_empty() {
            return Err(ForecastError::EmptyInput);
        }

        let mut dated = records
            .iter()
            .map(|r| r.date().map(|d| (d, r.total_amount)))
            .collect::<Result<Vec<(NaiveDate, f64)>, _>>()?;
        // sort_by_key is stable, ties keep arrival order
        dated.sort_by_key(|(date, _)| *date);

        let amounts: Vec<f64> = dated.iter().map(|(_, amount)| *amount).collect();

        let x = dated
            .iter()
            .enumerate()
            .map(|(i, (date, _))| {
                let (mean, std_dev) = trailing_stats(&amounts, i);
                FeatureVector::new(*date, mean, std_dev).to_row(self.mode)
            })
            .collect();

        let summary = TrainingSummary {
            mean_amount: mean(&amounts),
            stddev_amount: sample_std_dev(&amounts),
            record_count: amounts.len(),
            first_date: dated[0].0,
            last_date: dated[dated.len() - 1].0,
        };

        Ok(TrainingFeatures {
            x,
            y: amounts,
            summary,
        })
    }

    /// Every future row carries the training-set mean/stddev as its trend columns.
    pub fn build_forecast_features(
        &self,
        summary: &TrainingSummary,
        dates: &[NaiveDate],
    ) -> Vec<Vec<f64>> {
        dates
            .iter()
            .map(|date| {
                FeatureVector::new(*date, summary.mean_amount, summary.stddev_amount)
                    .to_row(self.mode)
            })
            .collect()
    }
}

/// Mean and sample stddev of the expanding window ending at `index`.
pub fn trailing_stats(amounts: &[f64], index: usize) -> (f64, f64) {
    let start = (index + 1).saturating_sub(TRAILING_WINDOW);
    let window = &amounts[start..=index];
    (mean(window), sample_std_dev(window))
}

fn mean(values: &[f64]) -> f64 {
    Data::new(values.to_vec()).mean().unwrap_or(0.0)
}

// A single sample has no variance; reported as 0.0 so rows never carry NaN.
fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    Data::new(values.to_vec())
        .std_dev()
        .filter(|s| s.is_finite())
        .unwrap_or(0.0)
}
