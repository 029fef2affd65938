use crate::domain::errors::ForecastError;
use statrs::statistics::Statistics;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ColumnStats {
    mean: f64,
    scale: f64,
}

/// Zero-mean / unit-variance column normalisation.
///
/// Uses the population stddev. Columns with no variance keep a scale of 1.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    columns: Option<Vec<ColumnStats>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.columns.is_some()
    }

    pub fn n_features(&self) -> Option<usize> {
        self.columns.as_ref().map(|c| c.len())
    }

    pub fn fit_transform(&mut self, x: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ForecastError> {
        let first = x.first().ok_or(ForecastError::EmptyInput)?;
        let width = first.len();
        check_width(x, width)?;

        let columns = (0..width)
            .map(|col| {
                let values: Vec<f64> = x.iter().map(|row| row[col]).collect();
                let mean = values.iter().mean();
                let std_dev = values.iter().population_std_dev();
                let scale = if std_dev.is_finite() && std_dev > f64::EPSILON {
                    std_dev
                } else {
                    1.0
                };
                ColumnStats { mean, scale }
            })
            .collect();

        self.columns = Some(columns);
        self.transform(x)
    }

    pub fn transform(&self, x: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ForecastError> {
        let columns = self.columns.as_ref().ok_or(ForecastError::NotFitted {
            component: "StandardScaler",
        })?;
        check_width(x, columns.len())?;

        let scaled = x
            .iter()
            .map(|row| {
                row.iter()
                    .zip(columns)
                    .map(|(v, stats)| (v - stats.mean) / stats.scale)
                    .collect()
            })
            .collect();
        Ok(scaled)
    }
}

fn check_width(x: &[Vec<f64>], expected: usize) -> Result<(), ForecastError> {
    match x.iter().find(|row| row.len() != expected) {
        Some(row) => Err(ForecastError::FeatureShapeMismatch {
            expected,
            actual: row.len(),
        }),
        None => Ok(()),
    }
}
