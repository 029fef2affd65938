use std::fmt;
use std::str::FromStr;

/// Regression algorithm backing the sales predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegressorKind {
    #[default]
    RandomForest,
    Linear,
}

impl FromStr for RegressorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "random_forest" | "forest" => Ok(RegressorKind::RandomForest),
            "linear" | "ols" => Ok(RegressorKind::Linear),
            _ => Err(format!(
                "Invalid regressor: {}. Must be 'random_forest' or 'linear'",
                s
            )),
        }
    }
}

impl fmt::Display for RegressorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegressorKind::RandomForest => write!(f, "random_forest"),
            RegressorKind::Linear => write!(f, "linear"),
        }
    }
}
