// Feature engineering, scaling and regression pipeline
pub mod ml;

// Service orchestrator
pub mod system;
