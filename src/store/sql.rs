use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::instrument;
use uuid::Uuid;

use crate::demand::series::{self, DemandSample};
use crate::entities::{
    inventory_level::{Column as InventoryColumn, Entity as InventoryLevel},
    item::{Column as ItemColumn, Entity as Item},
    order_line::{Column as OrderLineColumn, Entity as OrderLine},
};
use crate::errors::ServiceError;
use crate::store::DemandStore;

/// sea-orm backed [`DemandStore`] aggregating order lines into daily demand
/// totals. Aggregation happens in process; the queries only filter by item
/// and window.
#[derive(Clone)]
pub struct SqlDemandStore {
    db: Arc<DatabaseConnection>,
}

impl SqlDemandStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn ensure_item_exists(&self, item_id: Uuid) -> Result<(), ServiceError> {
        let item = Item::find_by_id(item_id).one(&*self.db).await?;
        if item.is_none() {
            return Err(ServiceError::not_found("Item", item_id));
        }
        Ok(())
    }
}

#[async_trait]
impl DemandStore for SqlDemandStore {
    #[instrument(skip(self))]
    async fn historical_demand(
        &self,
        item_id: Uuid,
        window_days: u32,
    ) -> Result<Vec<DemandSample>, ServiceError> {
        self.ensure_item_exists(item_id).await?;

        let today = Utc::now().date_naive();
        let window_start = today - Duration::days(window_days as i64);
        let since = window_start.and_time(NaiveTime::MIN).and_utc();

        let lines = OrderLine::find()
            .filter(OrderLineColumn::ItemId.eq(item_id))
            .filter(OrderLineColumn::OrderedAt.gte(since))
            .all(&*self.db)
            .await?;

        let mut totals: HashMap<NaiveDate, i64> = HashMap::new();
        for line in lines {
            *totals.entry(line.ordered_at.date_naive()).or_insert(0) +=
                i64::from(line.quantity.max(0));
        }
        let totals: Vec<(NaiveDate, i64)> = totals.into_iter().collect();
        Ok(series::gap_fill(&totals, window_start, today))
    }

    #[instrument(skip(self))]
    async fn current_stock(
        &self,
        item_id: Uuid,
        location_id: Option<Uuid>,
    ) -> Result<i64, ServiceError> {
        let mut query = InventoryLevel::find().filter(InventoryColumn::ItemId.eq(item_id));
        if let Some(location_id) = location_id {
            query = query.filter(InventoryColumn::LocationId.eq(location_id));
        }
        let levels = query.all(&*self.db).await?;
        Ok(levels
            .iter()
            .map(|level| i64::from(level.on_hand) - i64::from(level.reserved))
            .sum())
    }

    #[instrument(skip(self))]
    async fn top_moving_items(
        &self,
        limit: u64,
        window_days: u32,
    ) -> Result<Vec<Uuid>, ServiceError> {
        let since = Utc::now() - Duration::days(window_days as i64);
        let lines = OrderLine::find()
            .filter(OrderLineColumn::OrderedAt.gte(since))
            .all(&*self.db)
            .await?;

        let mut volume: HashMap<Uuid, i64> = HashMap::new();
        for line in lines {
            *volume.entry(line.item_id).or_insert(0) += i64::from(line.quantity.max(0));
        }
        let mut ranked: Vec<(Uuid, i64)> = volume.into_iter().collect();
        // Tie-break on id so repeated calls rank identically.
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        Ok(ranked
            .into_iter()
            .take(limit as usize)
            .map(|(item_id, _)| item_id)
            .collect())
    }

    #[instrument(skip(self))]
    async fn active_items_in_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<Uuid>, ServiceError> {
        let items = Item::find()
            .filter(ItemColumn::CategoryId.eq(category_id))
            .filter(ItemColumn::IsActive.eq(true))
            .all(&*self.db)
            .await?;
        Ok(items.into_iter().map(|item| item.id).collect())
    }

    #[instrument(skip(self))]
    async fn stocked_items(
        &self,
        location_id: Option<Uuid>,
        limit: u64,
    ) -> Result<Vec<Uuid>, ServiceError> {
        let mut query = InventoryLevel::find().filter(InventoryColumn::OnHand.gt(0));
        if let Some(location_id) = location_id {
            query = query.filter(InventoryColumn::LocationId.eq(location_id));
        }
        let levels = query
            .order_by_asc(InventoryColumn::ItemId)
            .all(&*self.db)
            .await?;

        let mut item_ids: Vec<Uuid> = Vec::new();
        for level in levels {
            if !item_ids.contains(&level.item_id) {
                item_ids.push(level.item_id);
            }
            if item_ids.len() as u64 >= limit {
                break;
            }
        }
        Ok(item_ids)
    }
}
