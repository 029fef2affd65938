//! Configuration module for the sales forecasting service.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Server and Model.

mod model_config;
mod server_config;

pub use model_config::{ForestParams, ModelEnvConfig};
pub use server_config::ServerEnvConfig;

use anyhow::{Context, Result, anyhow};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub server: ServerEnvConfig,
    pub model: ModelEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerEnvConfig::from_lookup(&lookup).context("Failed to load server config")?;
        let model = ModelEnvConfig::from_lookup(&lookup).context("Failed to load model config")?;
        Ok(Self { server, model })
    }
}

/// Parses `key` with `FromStr`, falling back to `default` when unset or blank.
pub(crate) fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("Failed to parse {}: {}", key, e)),
        _ => Ok(default),
    }
}
