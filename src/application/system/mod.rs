pub mod forecast_service;

pub use forecast_service::{ForecastService, ModelStatus, TrainingReport};
