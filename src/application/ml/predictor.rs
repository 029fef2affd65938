use super::smartcore_predictor::{LinearRegressor, RandomForestRegressor};
use crate::config::ModelEnvConfig;
use crate::domain::errors::ForecastError;
use crate::domain::ml::RegressorKind;

/// Interface for the regression models behind the sales predictor
pub trait Regressor: Send + Sync {
    /// Fit on row-major features `x` and targets `y`
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), ForecastError>;

    /// Predict one value per row
    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, ForecastError>;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Column count seen at fit time
    fn n_features(&self) -> Option<usize>;
}

/// Builds an unfitted regressor for the configured algorithm.
pub fn build_regressor(config: &ModelEnvConfig) -> Box<dyn Regressor> {
    match config.regressor {
        RegressorKind::RandomForest => Box::new(RandomForestRegressor::new(config.forest.clone())),
        RegressorKind::Linear => Box::new(LinearRegressor::new()),
    }
}

pub(crate) fn check_input_shape(
    x: &[Vec<f64>],
    n_features: Option<usize>,
) -> Result<usize, ForecastError> {
    let expected = n_features.ok_or(ForecastError::NotFitted {
        component: "Regressor",
    })?;
    match x.iter().find(|row| row.len() != expected) {
        Some(row) => Err(ForecastError::FeatureShapeMismatch {
            expected,
            actual: row.len(),
        }),
        None => Ok(expected),
    }
}
