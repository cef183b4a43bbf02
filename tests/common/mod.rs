#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tokio::sync::mpsc;

use demandcast::{
    Event, EventSender, ForecastingConfig, ForecastingService, MemoryDemandStore,
    ReplenishmentService,
};

/// Build `days` consecutive daily totals ending today. The closure receives
/// the calendar date and the zero-based day index.
pub fn daily_series(
    days: i64,
    demand_for: impl Fn(NaiveDate, i64) -> i64,
) -> Vec<(NaiveDate, i64)> {
    let today = Utc::now().date_naive();
    (0..days)
        .map(|i| {
            let date = today - Duration::days(days - 1 - i);
            (date, demand_for(date, i))
        })
        .collect()
}

pub fn forecasting_service(
    store: MemoryDemandStore,
) -> (ForecastingService, mpsc::Receiver<Event>) {
    demandcast::logging::init_tracing("warn");
    let (sender, receiver) = EventSender::channel(256);
    let service = ForecastingService::new(Arc::new(store), sender, ForecastingConfig::default());
    (service, receiver)
}

pub fn replenishment_service(
    store: MemoryDemandStore,
) -> (ReplenishmentService, mpsc::Receiver<Event>) {
    demandcast::logging::init_tracing("warn");
    let (sender, receiver) = EventSender::channel(256);
    let store = Arc::new(store);
    let forecasting =
        ForecastingService::new(store.clone(), sender.clone(), ForecastingConfig::default());
    let service = ReplenishmentService::new(
        store,
        forecasting,
        sender,
        ForecastingConfig::default(),
    );
    (service, receiver)
}
