use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::demand::series::{self, DemandSample};
use crate::errors::ServiceError;
use crate::store::DemandStore;

#[derive(Debug, Default, Clone)]
struct StockRecord {
    location_id: Option<Uuid>,
    on_hand: i64,
    reserved: i64,
}

#[derive(Debug, Default, Clone)]
struct ItemRecord {
    category_id: Option<Uuid>,
    is_active: bool,
    demand: Vec<(NaiveDate, i64)>,
    stock: Vec<StockRecord>,
}

/// In-memory [`DemandStore`] with a builder-style setup API.
///
/// Shares the gap-filling contract with the SQL store, so it can stand in
/// for it in tests and in embedders that keep demand history elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MemoryDemandStore {
    items: HashMap<Uuid, ItemRecord>,
}

impl MemoryDemandStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item. Items only referenced through `with_demand` or
    /// `with_stock` exist too; this makes the registration explicit and
    /// marks the item active.
    pub fn with_item(mut self, item_id: Uuid) -> Self {
        self.items.entry(item_id).or_default().is_active = true;
        self
    }

    pub fn with_category(mut self, item_id: Uuid, category_id: Uuid) -> Self {
        let record = self.items.entry(item_id).or_default();
        record.category_id = Some(category_id);
        record.is_active = true;
        self
    }

    pub fn deactivated(mut self, item_id: Uuid) -> Self {
        self.items.entry(item_id).or_default().is_active = false;
        self
    }

    pub fn with_demand(mut self, item_id: Uuid, date: NaiveDate, demand: i64) -> Self {
        self.items
            .entry(item_id)
            .or_default()
            .demand
            .push((date, demand));
        self
    }

    pub fn with_demand_series(
        mut self,
        item_id: Uuid,
        samples: impl IntoIterator<Item = (NaiveDate, i64)>,
    ) -> Self {
        self.items
            .entry(item_id)
            .or_default()
            .demand
            .extend(samples);
        self
    }

    pub fn with_stock(
        mut self,
        item_id: Uuid,
        location_id: Option<Uuid>,
        on_hand: i64,
        reserved: i64,
    ) -> Self {
        self.items.entry(item_id).or_default().stock.push(StockRecord {
            location_id,
            on_hand,
            reserved,
        });
        self
    }

    fn item(&self, item_id: Uuid) -> Result<&ItemRecord, ServiceError> {
        self.items
            .get(&item_id)
            .ok_or_else(|| ServiceError::not_found("Item", item_id))
    }
}

fn matches_location(record: &StockRecord, location_id: Option<Uuid>) -> bool {
    location_id.is_none() || record.location_id == location_id
}

#[async_trait]
impl DemandStore for MemoryDemandStore {
    async fn historical_demand(
        &self,
        item_id: Uuid,
        window_days: u32,
    ) -> Result<Vec<DemandSample>, ServiceError> {
        let item = self.item(item_id)?;
        let today = Utc::now().date_naive();
        let window_start = today - Duration::days(window_days as i64);
        Ok(series::gap_fill(&item.demand, window_start, today))
    }

    async fn current_stock(
        &self,
        item_id: Uuid,
        location_id: Option<Uuid>,
    ) -> Result<i64, ServiceError> {
        let item = self.item(item_id)?;
        Ok(item
            .stock
            .iter()
            .filter(|record| matches_location(record, location_id))
            .map(|record| record.on_hand - record.reserved)
            .sum())
    }

    async fn top_moving_items(
        &self,
        limit: u64,
        window_days: u32,
    ) -> Result<Vec<Uuid>, ServiceError> {
        let since = Utc::now().date_naive() - Duration::days(window_days as i64);
        let mut ranked: Vec<(Uuid, i64)> = self
            .items
            .iter()
            .map(|(item_id, item)| {
                let volume: i64 = item
                    .demand
                    .iter()
                    .filter(|(date, _)| *date >= since)
                    .map(|(_, qty)| (*qty).max(0))
                    .sum();
                (*item_id, volume)
            })
            .filter(|(_, volume)| *volume > 0)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        Ok(ranked
            .into_iter()
            .take(limit as usize)
            .map(|(item_id, _)| item_id)
            .collect())
    }

    async fn active_items_in_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<Uuid>, ServiceError> {
        let mut item_ids: Vec<Uuid> = self
            .items
            .iter()
            .filter(|(_, item)| item.is_active && item.category_id == Some(category_id))
            .map(|(item_id, _)| *item_id)
            .collect();
        item_ids.sort();
        Ok(item_ids)
    }

    async fn stocked_items(
        &self,
        location_id: Option<Uuid>,
        limit: u64,
    ) -> Result<Vec<Uuid>, ServiceError> {
        let mut item_ids: Vec<Uuid> = self
            .items
            .iter()
            .filter(|(_, item)| {
                item.stock
                    .iter()
                    .any(|record| matches_location(record, location_id) && record.on_hand > 0)
            })
            .map(|(item_id, _)| *item_id)
            .collect();
        item_ids.sort();
        item_ids.truncate(limit as usize);
        Ok(item_ids)
    }
}
