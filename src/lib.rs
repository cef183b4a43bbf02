//! # demandcast
//!
//! Demand forecasting and inventory replenishment engine for order
//! management platforms.
//!
//! Given daily demand history for an item, the [`ForecastingService`]
//! produces a multi-day forecast with confidence bounds, weekday/month
//! seasonality and a trend classification; the [`ReplenishmentService`]
//! turns forecasts plus current stock into reorder guidance (safety stock,
//! reorder point, stockout and overstock risk).
//!
//! Data access goes through the injected [`DemandStore`] trait: a
//! sea-orm-backed [`SqlDemandStore`] is provided, and the in-memory
//! [`MemoryDemandStore`] supports tests and embedders without a database.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod demand;
pub mod entities;
pub mod errors;
pub mod events;
pub mod logging;
pub mod services;
pub mod store;

pub use config::ForecastingConfig;
pub use demand::forecast::{DemandForecast, ForecastPoint};
pub use demand::replenishment::{InventoryRecommendation, ReorderAction};
pub use demand::seasonality::SeasonalFactors;
pub use demand::series::DemandSample;
pub use demand::trend::{Trend, TrendDirection};
pub use errors::ServiceError;
pub use events::{Event, EventSender};
pub use services::forecasting::{BatchForecastRequest, ForecastingService};
pub use services::replenishment::ReplenishmentService;
pub use store::{DemandStore, MemoryDemandStore, SqlDemandStore};
