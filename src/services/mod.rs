pub mod forecasting;
pub mod replenishment;

pub use forecasting::{BatchForecastRequest, ForecastingService};
pub use replenishment::ReplenishmentService;
