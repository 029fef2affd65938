use chrono::{Local, NaiveDate};
use salecast::application::ml::SalesPredictor;
use salecast::application::system::ForecastService;
use salecast::config::ModelEnvConfig;
use salecast::domain::errors::ForecastError;
use salecast::domain::sales::SaleRecord;
use std::sync::Arc;

fn ten_days() -> Vec<SaleRecord> {
    let amounts = [100.0, 150.0, 130.0, 90.0, 170.0, 210.0, 80.0, 140.0, 115.0, 120.0];
    amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| SaleRecord::new(format!("2024-01-{:02}", i + 1), *amount))
        .collect()
}

#[test]
fn test_ten_day_scenario_forecasts_next_three_days() {
    let mut predictor = SalesPredictor::new(ModelEnvConfig::default());
    predictor.train(&ten_days()).unwrap();

    let today = Local::now().date_naive();
    let forecast = predictor.forecast(3).unwrap();

    assert_eq!(forecast.len(), 3);
    assert_eq!(forecast[0].date, today);
    assert_eq!(forecast[1].date, today.succ_opt().unwrap());
    assert_eq!(forecast[2].date, today.succ_opt().unwrap().succ_opt().unwrap());
    for entry in &forecast {
        assert!(entry.predicted_amount.is_finite());
        assert!(entry.predicted_amount >= 0.0);
    }
}

#[test]
fn test_bounds_follow_historical_stddev() {
    let mut predictor = SalesPredictor::new(ModelEnvConfig::default());
    let model = predictor.train(&ten_days()).unwrap();
    let half_width = model.summary().stddev_amount * 1.96;

    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    for entry in predictor.forecast_from(start, 14).unwrap() {
        let upper = entry.upper_bound.unwrap();
        let lower = entry.lower_bound.unwrap();
        // forest output lies within the positive training range, so nothing is clamped
        assert!((upper - entry.predicted_amount - half_width).abs() < 1e-6);
        assert!(lower >= 0.0);
        assert!(lower <= entry.predicted_amount && entry.predicted_amount <= upper);
    }
}

#[test]
fn test_unordered_input_matches_sorted_input() {
    let sorted = ten_days();
    let mut shuffled = sorted.clone();
    shuffled.reverse();

    let mut a = SalesPredictor::new(ModelEnvConfig::default());
    let mut b = SalesPredictor::new(ModelEnvConfig::default());
    a.train(&sorted).unwrap();
    b.train(&shuffled).unwrap();

    assert_eq!(a.model().unwrap().summary(), b.model().unwrap().summary());
    let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    assert_eq!(
        a.forecast_from(start, 5).unwrap(),
        b.forecast_from(start, 5).unwrap()
    );
}

#[test]
fn test_linear_variant_forecasts_without_bounds() {
    let mut predictor = SalesPredictor::new(ModelEnvConfig::calendar_linear());
    predictor.train(&ten_days()).unwrap();

    let forecast = predictor.forecast(4).unwrap();
    assert_eq!(forecast.len(), 4);
    assert!(forecast.iter().all(|e| e.upper_bound.is_none()));
}

#[tokio::test]
async fn test_parallel_forecasts_during_retraining() {
    let service = Arc::new(ForecastService::new(ModelEnvConfig::default()));
    service.train(ten_days()).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move { service.forecast(7).await }));
    }
    let retrain = {
        let service = service.clone();
        tokio::spawn(async move { service.train(ten_days()).await })
    };

    for handle in handles {
        let forecast = handle.await.unwrap().unwrap();
        assert_eq!(forecast.len(), 7);
    }
    match retrain.await.unwrap() {
        Ok(report) => assert_eq!(report.record_count, 10),
        Err(e) => assert_eq!(e, ForecastError::Busy),
    }
    assert!(service.is_trained().await);
}
