use super::predictor::{Regressor, check_input_shape};
use crate::config::ForestParams;
use crate::domain::errors::ForecastError;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor as SmartRandomForest, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{
    LinearRegression, LinearRegressionParameters, LinearRegressionSolverName,
};
use statrs::statistics::Statistics;
use tracing::{debug, warn};

type ForestModel = SmartRandomForest<f64, f64, DenseMatrix<f64>, Vec<f64>>;
type LinearModel = LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>;

fn to_matrix(x: &[Vec<f64>]) -> Result<DenseMatrix<f64>, ForecastError> {
    DenseMatrix::from_2d_vec(&x.to_vec())
        .map_err(|e| ForecastError::pipeline(format!("Matrix creation failed: {}", e)))
}

fn check_training_input(x: &[Vec<f64>], y: &[f64]) -> Result<usize, ForecastError> {
    let width = x.first().map(|row| row.len()).ok_or(ForecastError::EmptyInput)?;
    if x.len() != y.len() {
        return Err(ForecastError::pipeline(format!(
            "Feature rows ({}) and targets ({}) differ in length",
            x.len(),
            y.len()
        )));
    }
    check_input_shape(x, Some(width))
}

/// Bagged decision-tree ensemble backed by SmartCore
pub struct RandomForestRegressor {
    params: ForestParams,
    model: Option<ForestModel>,
    n_features: Option<usize>,
}

impl RandomForestRegressor {
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            model: None,
            n_features: None,
        }
    }

    fn smartcore_params(&self) -> RandomForestRegressorParameters {
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(self.params.n_trees)
            .with_min_samples_split(self.params.min_samples_split)
            .with_seed(self.params.seed);
        match self.params.max_depth {
            Some(depth) => params.with_max_depth(depth),
            None => params,
        }
    }
}

impl Regressor for RandomForestRegressor {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), ForecastError> {
        let width = check_training_input(x, y)?;
        let matrix = to_matrix(x)?;

        debug!(
            "Fitting random forest: {} rows, {} trees, seed {}",
            x.len(),
            self.params.n_trees,
            self.params.seed
        );
        let model = ForestModel::fit(&matrix, &y.to_vec(), self.smartcore_params())
            .map_err(|e| ForecastError::pipeline(format!("Training failed: {}", e)))?;

        self.model = Some(model);
        self.n_features = Some(width);
        Ok(())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, ForecastError> {
        let model = self.model.as_ref().ok_or(ForecastError::NotFitted {
            component: "RandomForestRegressor",
        })?;
        check_input_shape(x, self.n_features)?;
        if x.is_empty() {
            return Ok(Vec::new());
        }

        model
            .predict(&to_matrix(x)?)
            .map_err(|e| ForecastError::pipeline(format!("Prediction failed: {}", e)))
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }
}

enum LinearFit {
    Ols(LinearModel),
    /// Fewer rows than coefficients: predicts the target mean.
    Intercept(f64),
}

/// Ordinary least squares backed by SmartCore
#[derive(Default)]
pub struct LinearRegressor {
    model: Option<LinearFit>,
    n_features: Option<usize>,
}

impl LinearRegressor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Regressor for LinearRegressor {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), ForecastError> {
        let width = check_training_input(x, y)?;

        // smartcore's SVD needs more rows than columns
        if x.len() <= width {
            warn!(
                "Only {} rows for {} features, fitting intercept only",
                x.len(),
                width
            );
            self.model = Some(LinearFit::Intercept(y.iter().mean()));
            self.n_features = Some(width);
            return Ok(());
        }

        let matrix = to_matrix(x)?;
        let params =
            LinearRegressionParameters::default().with_solver(LinearRegressionSolverName::SVD);
        let model = LinearModel::fit(&matrix, &y.to_vec(), params)
            .map_err(|e| ForecastError::pipeline(format!("Training failed: {}", e)))?;

        self.model = Some(LinearFit::Ols(model));
        self.n_features = Some(width);
        Ok(())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, ForecastError> {
        let model = self.model.as_ref().ok_or(ForecastError::NotFitted {
            component: "LinearRegressor",
        })?;
        check_input_shape(x, self.n_features)?;
        if x.is_empty() {
            return Ok(Vec::new());
        }

        match model {
            LinearFit::Ols(model) => model
                .predict(&to_matrix(x)?)
                .map_err(|e| ForecastError::pipeline(format!("Prediction failed: {}", e))),
            LinearFit::Intercept(mean) => Ok(vec![*mean; x.len()]),
        }
    }

    fn name(&self) -> &str {
        "SmartCore Linear Regression"
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..20)
            .map(|i| vec![i as f64, (i % 7) as f64])
            .collect();
        let y = x.iter().map(|r| 3.0 * r[0] + 2.0 * r[1] + 5.0).collect();
        (x, y)
    }

    #[test]
    fn test_linear_regressor_recovers_plane() {
        let (x, y) = linear_data();
        let mut model = LinearRegressor::new();
        model.fit(&x, &y).unwrap();

        let pred = model.predict(&[vec![30.0, 3.0]]).unwrap();
        assert!((pred[0] - 101.0).abs() < 1e-6);
        assert_eq!(model.n_features(), Some(2));
    }

    #[test]
    fn test_forest_is_deterministic_with_fixed_seed() {
        let (x, y) = linear_data();
        let mut a = RandomForestRegressor::new(ForestParams::default());
        let mut b = RandomForestRegressor::new(ForestParams::default());
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();

        let probe = vec![vec![4.5, 2.0], vec![12.0, 5.0]];
        assert_eq!(a.predict(&probe).unwrap(), b.predict(&probe).unwrap());
    }

    #[test]
    fn test_forest_predictions_stay_within_target_range() {
        let (x, y) = linear_data();
        let mut model = RandomForestRegressor::new(ForestParams {
            n_trees: 10,
            ..ForestParams::default()
        });
        model.fit(&x, &y).unwrap();

        let min = y.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        for p in model.predict(&x).unwrap() {
            assert!(p >= min - 1e-9 && p <= max + 1e-9);
        }
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let (x, y) = linear_data();
        let mut model = LinearRegressor::new();
        model.fit(&x, &y).unwrap();
        assert_eq!(
            model.predict(&[vec![1.0, 2.0, 3.0]]).unwrap_err(),
            ForecastError::FeatureShapeMismatch {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = RandomForestRegressor::new(ForestParams::default());
        assert!(matches!(
            model.predict(&[vec![1.0]]),
            Err(ForecastError::NotFitted { .. })
        ));
    }

    #[test]
    fn test_linear_regressor_with_fewer_rows_than_features_predicts_mean() {
        let mut model = LinearRegressor::new();
        model
            .fit(&[vec![1.0, 2.0, 3.0], vec![2.0, 3.0, 4.0]], &[10.0, 20.0])
            .unwrap();
        assert_eq!(model.n_features(), Some(3));
        assert_eq!(
            model.predict(&[vec![5.0, 5.0, 5.0], vec![0.0, 0.0, 0.0]]).unwrap(),
            vec![15.0, 15.0]
        );
    }

    #[test]
    fn test_linear_variants_train_on_tiny_sets() {
        use crate::application::ml::SalesPredictor;
        use crate::config::ModelEnvConfig;
        use crate::domain::ml::FeatureMode;
        use crate::domain::sales::SaleRecord;

        let records: Vec<SaleRecord> = (1..=5)
            .map(|day| SaleRecord::new(format!("2024-01-{:02}", day), 10.0 * day as f64))
            .collect();
        let start = chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        let calendar = ModelEnvConfig::calendar_linear();
        let trend = ModelEnvConfig {
            feature_mode: FeatureMode::Trend,
            ..ModelEnvConfig::calendar_linear()
        };
        for config in [calendar, trend] {
            for n in 1..=5 {
                let mut predictor = SalesPredictor::new(config.clone());
                predictor.train(&records[..n]).unwrap();
                let forecast = predictor.forecast_from(start, 3).unwrap();
                assert_eq!(forecast.len(), 3, "{} records", n);
                assert!(forecast.iter().all(|e| e.predicted_amount.is_finite()));
            }
        }
    }

    #[test]
    fn test_fit_rejects_empty_input() {
        let mut model = LinearRegressor::new();
        assert_eq!(model.fit(&[], &[]).unwrap_err(), ForecastError::EmptyInput);
    }
}
