use async_trait::async_trait;
use uuid::Uuid;

use crate::demand::series::DemandSample;
use crate::errors::ServiceError;

pub mod memory;
pub mod sql;

pub use memory::MemoryDemandStore;
pub use sql::SqlDemandStore;

/// Data-access contract the forecasting services depend on.
///
/// Implementations own the gap-filling: `historical_demand` must return a
/// dense daily series (zero-demand days included) ending today, so the
/// numerical pipeline can assume one sample per calendar day.
#[async_trait]
pub trait DemandStore: Send + Sync {
    /// Dense daily demand for the trailing `window_days`, ending today.
    /// Unknown items fail with `NotFound`; items with no recorded orders
    /// yield an empty series.
    async fn historical_demand(
        &self,
        item_id: Uuid,
        window_days: u32,
    ) -> Result<Vec<DemandSample>, ServiceError>;

    /// On-hand minus reserved, summed across locations unless one is given.
    async fn current_stock(
        &self,
        item_id: Uuid,
        location_id: Option<Uuid>,
    ) -> Result<i64, ServiceError>;

    /// Items ranked by order volume over the trailing `window_days`.
    async fn top_moving_items(
        &self,
        limit: u64,
        window_days: u32,
    ) -> Result<Vec<Uuid>, ServiceError>;

    /// Active items belonging to a category.
    async fn active_items_in_category(&self, category_id: Uuid)
        -> Result<Vec<Uuid>, ServiceError>;

    /// Distinct items currently holding inventory, optionally scoped to one
    /// location.
    async fn stocked_items(
        &self,
        location_id: Option<Uuid>,
        limit: u64,
    ) -> Result<Vec<Uuid>, ServiceError>;
}
