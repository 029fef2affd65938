// Domain-specific error types
pub mod errors;

// Feature layout and model selection
pub mod ml;

// Sales records, summaries and forecast entries
pub mod sales;
