pub mod features;
pub mod predictor;
pub mod sales_predictor;
pub mod scaler;
pub mod smartcore_predictor;

pub use features::{FeatureBuilder, TrainingFeatures};
pub use predictor::{Regressor, build_regressor};
pub use sales_predictor::{SalesPredictor, TrainedModel};
pub use scaler::StandardScaler;
