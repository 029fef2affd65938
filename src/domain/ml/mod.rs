pub mod feature_registry;
pub mod regressor_kind;

pub use feature_registry::{FeatureMode, FeatureVector};
pub use regressor_kind::RegressorKind;
