//! Demand-domain value objects and the numerical routines behind them.

pub mod accuracy;
pub mod forecast;
pub mod replenishment;
pub mod seasonality;
pub mod series;
pub mod smoothing;
pub mod trend;

pub use forecast::{DemandForecast, ForecastPoint};
pub use replenishment::{InventoryRecommendation, ReorderAction};
pub use seasonality::SeasonalFactors;
pub use series::DemandSample;
pub use trend::{Trend, TrendDirection};
