//! End-to-end forecasting behavior over the in-memory store.

mod common;

use assert_matches::assert_matches;
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use uuid::Uuid;

use common::{daily_series, forecasting_service};
use demandcast::services::forecasting::{MODEL_HOLT_SEASONAL, MODEL_SIMPLE_AVERAGE};
use demandcast::{
    BatchForecastRequest, Event, MemoryDemandStore, ServiceError, TrendDirection,
};

fn tomorrow() -> NaiveDate {
    Utc::now().date_naive() + Duration::days(1)
}

#[tokio::test]
async fn forecast_has_exact_horizon_with_strictly_increasing_dates() {
    let item_id = Uuid::new_v4();
    let store = MemoryDemandStore::new()
        .with_demand_series(item_id, daily_series(90, |_, _| 10));
    let (service, _rx) = forecasting_service(store);

    let forecast = service.forecast_item(item_id, None).await.unwrap();

    assert_eq!(forecast.model, MODEL_HOLT_SEASONAL);
    assert_eq!(forecast.horizon_days, 14);
    assert_eq!(forecast.points.len(), 14);
    assert_eq!(forecast.points[0].date, tomorrow());
    for pair in forecast.points.windows(2) {
        assert_eq!(pair[1].date, pair[0].date + Duration::days(1));
    }
}

#[tokio::test]
async fn bounds_are_ordered_and_confidence_decays() {
    let item_id = Uuid::new_v4();
    // Alternating demand keeps the one-step error, and with it the interval
    // width, well away from zero.
    let store = MemoryDemandStore::new()
        .with_demand_series(item_id, daily_series(90, |_, i| if i % 2 == 0 { 5 } else { 15 }));
    let (service, _rx) = forecasting_service(store);

    let forecast = service.forecast_item(item_id, Some(30)).await.unwrap();

    assert_eq!(forecast.points.len(), 30);
    for point in &forecast.points {
        assert!(point.lower_bound >= 0);
        assert!(point.lower_bound <= point.predicted);
        assert!(point.predicted <= point.upper_bound);
        assert!(point.confidence >= 0.5 && point.confidence <= 0.95);
    }
    for pair in forecast.points.windows(2) {
        assert!(pair[1].confidence <= pair[0].confidence);
    }
    // Intervals widen with horizon distance.
    let first_width = forecast.points[0].upper_bound - forecast.points[0].lower_bound;
    let last_width = forecast.points[29].upper_bound - forecast.points[29].lower_bound;
    assert!(last_width > first_width);
}

#[tokio::test]
async fn sparse_history_degrades_instead_of_failing() {
    let item_id = Uuid::new_v4();
    let today = Utc::now().date_naive();
    let mut store = MemoryDemandStore::new();
    for i in 0..10 {
        store = store.with_demand(item_id, today - Duration::days(i), 8);
    }
    let (service, _rx) = forecasting_service(store);

    let forecast = service.forecast_item(item_id, Some(7)).await.unwrap();

    assert_eq!(forecast.model, MODEL_SIMPLE_AVERAGE);
    assert_eq!(forecast.points.len(), 7);
    assert_eq!(forecast.trend.direction, TrendDirection::Stable);
    assert_eq!(forecast.accuracy, 0.5);
    for factor in forecast.seasonal_factors.weekday_factors() {
        assert_eq!(*factor, 1.0);
    }
    for point in &forecast.points {
        assert_eq!(point.predicted, 8);
        assert_eq!(point.lower_bound, 4);
        assert_eq!(point.upper_bound, 12);
        assert_eq!(point.confidence, 0.6);
    }
    assert_eq!(forecast.recommendations.len(), 1);
}

#[tokio::test]
async fn zero_history_predicts_zero_without_failing() {
    let item_id = Uuid::new_v4();
    let store = MemoryDemandStore::new().with_item(item_id);
    let (service, _rx) = forecasting_service(store);

    let forecast = service.forecast_item(item_id, Some(5)).await.unwrap();

    assert_eq!(forecast.model, MODEL_SIMPLE_AVERAGE);
    assert_eq!(forecast.points.len(), 5);
    for point in &forecast.points {
        assert_eq!(point.predicted, 0);
        assert_eq!(point.lower_bound, 0);
        assert_eq!(point.upper_bound, 0);
    }
}

#[tokio::test]
async fn repeated_runs_are_identical() {
    let item_id = Uuid::new_v4();
    let store = MemoryDemandStore::new()
        .with_demand_series(item_id, daily_series(90, |_, i| 10 + (i % 5)));
    let (service, _rx) = forecasting_service(store);

    let first = service.forecast_item(item_id, Some(14)).await.unwrap();
    let second = service.forecast_item(item_id, Some(14)).await.unwrap();

    assert_eq!(first.points, second.points);
    assert_eq!(first.seasonal_factors, second.seasonal_factors);
    assert_eq!(first.trend, second.trend);
    assert_eq!(first.accuracy, second.accuracy);
    assert_eq!(first.recommendations, second.recommendations);
}

#[tokio::test]
async fn weekend_peaks_lift_weekend_forecasts() {
    let item_id = Uuid::new_v4();
    let store = MemoryDemandStore::new().with_demand_series(
        item_id,
        daily_series(90, |date, _| match date.weekday() {
            Weekday::Sat | Weekday::Sun => 20,
            _ => 10,
        }),
    );
    let (service, _rx) = forecasting_service(store);

    let forecast = service.forecast_item(item_id, Some(7)).await.unwrap();

    let saturday = forecast
        .points
        .iter()
        .find(|p| p.date.weekday() == Weekday::Sat)
        .unwrap();
    assert!(forecast.seasonal_factors.weekday_factor(saturday.date) > 1.0);

    let weekend_min = forecast
        .points
        .iter()
        .filter(|p| matches!(p.date.weekday(), Weekday::Sat | Weekday::Sun))
        .map(|p| p.predicted)
        .min()
        .unwrap();
    let weekday_max = forecast
        .points
        .iter()
        .filter(|p| !matches!(p.date.weekday(), Weekday::Sat | Weekday::Sun))
        .map(|p| p.predicted)
        .max()
        .unwrap();
    assert!(weekend_min > weekday_max);
}

#[tokio::test]
async fn linear_growth_classifies_as_increasing() {
    let item_id = Uuid::new_v4();
    let store = MemoryDemandStore::new()
        .with_demand_series(item_id, daily_series(30, |_, i| i));
    let (service, _rx) = forecasting_service(store);

    let forecast = service.forecast_item(item_id, Some(7)).await.unwrap();

    assert_eq!(forecast.trend.direction, TrendDirection::Increasing);
    assert!(forecast.trend.strength > 20.0);
}

#[tokio::test]
async fn flat_history_scores_high_accuracy() {
    let item_id = Uuid::new_v4();
    let store = MemoryDemandStore::new()
        .with_demand_series(item_id, daily_series(90, |_, _| 12));
    let (service, _rx) = forecasting_service(store);

    let forecast = service.forecast_item(item_id, None).await.unwrap();
    assert!(forecast.accuracy >= 0.9);
}

#[tokio::test]
async fn unknown_item_fails_with_not_found() {
    let (service, _rx) = forecasting_service(MemoryDemandStore::new());
    let result = service.forecast_item(Uuid::new_v4(), None).await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn zero_horizon_is_rejected() {
    let item_id = Uuid::new_v4();
    let store = MemoryDemandStore::new().with_item(item_id);
    let (service, _rx) = forecasting_service(store);
    let result = service.forecast_item(item_id, Some(0)).await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn forecast_events_are_published() {
    let item_id = Uuid::new_v4();
    let store = MemoryDemandStore::new()
        .with_demand_series(item_id, daily_series(90, |_, _| 10));
    let (service, mut rx) = forecasting_service(store);

    service.forecast_item(item_id, None).await.unwrap();

    match rx.recv().await.unwrap() {
        Event::ForecastGenerated {
            item_id: id,
            horizon_days,
            ..
        } => {
            assert_eq!(id, item_id);
            assert_eq!(horizon_days, 14);
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn batch_skips_items_that_fail() {
    let known_a = Uuid::new_v4();
    let known_b = Uuid::new_v4();
    let unknown = Uuid::new_v4();
    let store = MemoryDemandStore::new()
        .with_demand_series(known_a, daily_series(90, |_, _| 5))
        .with_demand_series(known_b, daily_series(90, |_, _| 7));
    let (service, _rx) = forecasting_service(store);

    let forecasts = service
        .forecast_batch(BatchForecastRequest {
            item_ids: Some(vec![known_a, unknown, known_b]),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(forecasts.len(), 2);
    assert!(forecasts.iter().all(|f| f.item_id != unknown));
}

#[tokio::test]
async fn batch_resolves_category_members() {
    let category = Uuid::new_v4();
    let member_a = Uuid::new_v4();
    let member_b = Uuid::new_v4();
    let outsider = Uuid::new_v4();
    let store = MemoryDemandStore::new()
        .with_category(member_a, category)
        .with_category(member_b, category)
        .with_demand_series(member_a, daily_series(90, |_, _| 5))
        .with_demand_series(member_b, daily_series(90, |_, _| 7))
        .with_demand_series(outsider, daily_series(90, |_, _| 9));
    let (service, _rx) = forecasting_service(store);

    let forecasts = service
        .forecast_batch(BatchForecastRequest {
            category_id: Some(category),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(forecasts.len(), 2);
    assert!(forecasts.iter().all(|f| f.item_id != outsider));
}

#[tokio::test]
async fn batch_defaults_to_top_movers() {
    let fast = Uuid::new_v4();
    let slow = Uuid::new_v4();
    let store = MemoryDemandStore::new()
        .with_demand_series(fast, daily_series(90, |_, _| 50))
        .with_demand_series(slow, daily_series(90, |_, _| 2));
    let (service, _rx) = forecasting_service(store);

    let forecasts = service
        .forecast_batch(BatchForecastRequest {
            limit: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(forecasts.len(), 1);
    assert_eq!(forecasts[0].item_id, fast);
}
