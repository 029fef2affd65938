//! Model configuration parsing from environment variables.
//!
//! This module handles the regressor choice, feature layout and
//! forecasting limits of the sales predictor.

use super::parse_var;
use crate::domain::ml::{FeatureMode, RegressorKind};
use anyhow::{Result, bail};

/// Random forest hyper-parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<u16>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

/// Model environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEnvConfig {
    pub regressor: RegressorKind,
    pub feature_mode: FeatureMode,
    pub scale_features: bool,
    pub forest: ForestParams,
    /// Seed of the 80/20 holdout shuffle.
    pub split_seed: u64,
    pub max_horizon_days: usize,
    /// Multiplier applied to the historical stddev for the forecast bounds.
    pub confidence_z: f64,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            regressor: RegressorKind::RandomForest,
            feature_mode: FeatureMode::Trend,
            scale_features: true,
            forest: ForestParams::default(),
            split_seed: 42,
            max_horizon_days: 365,
            confidence_z: 1.96,
        }
    }
}

impl ModelEnvConfig {
    /// Settings of the calendar-only variant: three features, no scaling, OLS.
    pub fn calendar_linear() -> Self {
        Self {
            regressor: RegressorKind::Linear,
            feature_mode: FeatureMode::Calendar,
            scale_features: false,
            ..Self::default()
        }
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_depth = match lookup("FORECAST_MAX_DEPTH") {
            Some(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<u16>()
                    .map_err(|e| anyhow::anyhow!("Failed to parse FORECAST_MAX_DEPTH: {}", e))?,
            ),
            _ => None,
        };

        let seed = parse_var(&lookup, "FORECAST_SEED", defaults.forest.seed)?;
        let forest = ForestParams {
            n_trees: parse_var(&lookup, "FORECAST_N_TREES", defaults.forest.n_trees)?,
            max_depth,
            min_samples_split: parse_var(
                &lookup,
                "FORECAST_MIN_SPLIT",
                defaults.forest.min_samples_split,
            )?,
            seed,
        };

        let config = Self {
            regressor: parse_var(&lookup, "FORECAST_REGRESSOR", defaults.regressor)?,
            feature_mode: parse_var(&lookup, "FORECAST_FEATURE_MODE", defaults.feature_mode)?,
            scale_features: parse_var(
                &lookup,
                "FORECAST_SCALE_FEATURES",
                defaults.scale_features,
            )?,
            forest,
            split_seed: seed,
            max_horizon_days: parse_var(
                &lookup,
                "FORECAST_MAX_HORIZON_DAYS",
                defaults.max_horizon_days,
            )?,
            confidence_z: parse_var(&lookup, "FORECAST_CONFIDENCE_Z", defaults.confidence_z)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.forest.n_trees == 0 {
            bail!("FORECAST_N_TREES must be positive");
        }
        if self.forest.min_samples_split < 2 {
            bail!("FORECAST_MIN_SPLIT must be at least 2");
        }
        if self.max_horizon_days == 0 {
            bail!("FORECAST_MAX_HORIZON_DAYS must be positive");
        }
        if !self.confidence_z.is_finite() || self.confidence_z < 0.0 {
            bail!(
                "FORECAST_CONFIDENCE_Z must be a non-negative number, got {}",
                self.confidence_z
            );
        }
        Ok(())
    }
}
