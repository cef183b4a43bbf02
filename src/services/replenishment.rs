use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::ForecastingConfig;
use crate::demand::forecast::DemandForecast;
use crate::demand::replenishment::{InventoryRecommendation, ReorderAction};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::forecasting::ForecastingService;
use crate::store::DemandStore;

/// Sentinel for items with no forecast demand at all.
const INFINITE_COVER_DAYS: i64 = 999;
/// Cover beyond this classifies the position as overstocked.
const OVERSTOCK_COVER_DAYS: i64 = 90;
/// Cover at or below this carries no overstock risk.
const OVERSTOCK_RISK_FREE_DAYS: i64 = 60;
const OVERSTOCK_RISK_BASE_DAYS: f64 = 30.0;
const OVERSTOCK_RISK_RANGE_DAYS: f64 = 60.0;
/// Std-dev approximation used when the horizon is too short to measure one.
const FALLBACK_STDDEV_RATIO: f64 = 0.3;

/// Turns demand forecasts and stock positions into reorder guidance.
#[derive(Clone)]
pub struct ReplenishmentService {
    store: Arc<dyn DemandStore>,
    forecasting: ForecastingService,
    event_sender: EventSender,
    config: ForecastingConfig,
}

impl ReplenishmentService {
    pub fn new(
        store: Arc<dyn DemandStore>,
        forecasting: ForecastingService,
        event_sender: EventSender,
        config: ForecastingConfig,
    ) -> Self {
        Self {
            store,
            forecasting,
            event_sender,
            config,
        }
    }

    /// Build recommendations for items currently holding inventory,
    /// optionally scoped to one location, most urgent first.
    ///
    /// Items that cannot be forecast or fetched are skipped; the run never
    /// fails because of one item. Critical and reorder-now positions emit a
    /// [`Event::ReplenishmentAlert`].
    #[instrument(skip(self))]
    pub async fn recommend_inventory(
        &self,
        location_id: Option<Uuid>,
        limit: Option<u64>,
    ) -> Result<Vec<InventoryRecommendation>, ServiceError> {
        let limit = limit.unwrap_or(self.config.recommendation_limit);
        let item_ids = self.store.stocked_items(location_id, limit).await?;
        info!(count = item_ids.len(), "Building inventory recommendations");

        let results = join_all(
            item_ids
                .iter()
                .map(|item_id| self.recommend_item(*item_id, location_id)),
        )
        .await;

        let mut recommendations = Vec::with_capacity(results.len());
        for (item_id, result) in item_ids.iter().zip(results) {
            match result {
                Ok(recommendation) => recommendations.push(recommendation),
                Err(e) => {
                    warn!(item_id = %item_id, error = %e, "Skipping item without a usable recommendation")
                }
            }
        }
        // Stable sort keeps store enumeration order within a severity class.
        recommendations.sort_by_key(|r| r.action);

        for recommendation in &recommendations {
            if matches!(
                recommendation.action,
                ReorderAction::Critical | ReorderAction::ReorderNow
            ) {
                if let Err(e) = self
                    .event_sender
                    .send(Event::ReplenishmentAlert {
                        item_id: recommendation.item_id,
                        action: recommendation.action,
                        current_stock: recommendation.current_stock,
                        reorder_point: recommendation.reorder_point,
                    })
                    .await
                {
                    warn!(
                        item_id = %recommendation.item_id,
                        error = %e,
                        "Failed to publish replenishment alert"
                    );
                }
            }
        }

        Ok(recommendations)
    }

    async fn recommend_item(
        &self,
        item_id: Uuid,
        location_id: Option<Uuid>,
    ) -> Result<InventoryRecommendation, ServiceError> {
        let forecast = self
            .forecasting
            .forecast_item(item_id, Some(self.config.default_horizon_days))
            .await?;
        let current_stock = self.store.current_stock(item_id, location_id).await?;
        Ok(self.build_recommendation(item_id, current_stock, &forecast))
    }

    /// Derive reorder guidance from a forecast and the current stock
    /// position.
    pub fn build_recommendation(
        &self,
        item_id: Uuid,
        current_stock: i64,
        forecast: &DemandForecast,
    ) -> InventoryRecommendation {
        let predicted: Vec<f64> = forecast.points.iter().map(|p| p.predicted as f64).collect();
        let avg_daily_demand = if predicted.is_empty() {
            0.0
        } else {
            predicted.iter().sum::<f64>() / predicted.len() as f64
        };
        let demand_std_dev = if predicted.len() < 2 {
            avg_daily_demand * FALLBACK_STDDEV_RATIO
        } else {
            let variance = predicted
                .iter()
                .map(|v| (v - avg_daily_demand).powi(2))
                .sum::<f64>()
                / predicted.len() as f64;
            variance.sqrt()
        };

        let lead_time = f64::from(self.config.lead_time_days);
        let safety_stock =
            (self.config.service_level_z * demand_std_dev * lead_time.sqrt()).ceil().max(0.0)
                as i64;
        let reorder_point =
            (avg_daily_demand * lead_time + safety_stock as f64).ceil().max(0.0) as i64;
        let suggested_reorder_qty = (avg_daily_demand
            * f64::from(self.config.default_horizon_days))
        .ceil()
        .max(0.0) as i64;

        let days_of_cover = if avg_daily_demand <= 0.0 {
            INFINITE_COVER_DAYS
        } else {
            (current_stock as f64 / avg_daily_demand).round() as i64
        };

        let stockout_risk: u8 = if current_stock > reorder_point {
            0
        } else if reorder_point <= 0 {
            // No demand and no stock; nothing to run out of, but nothing to
            // sell either.
            100
        } else {
            ((1.0 - current_stock as f64 / reorder_point as f64) * 100.0)
                .round()
                .clamp(0.0, 100.0) as u8
        };

        let overstock_risk: u8 = if days_of_cover <= OVERSTOCK_RISK_FREE_DAYS {
            0
        } else {
            (((days_of_cover as f64 - OVERSTOCK_RISK_BASE_DAYS) / OVERSTOCK_RISK_RANGE_DAYS)
                * 100.0)
                .round()
                .clamp(0.0, 100.0) as u8
        };

        let action = if current_stock <= 0 {
            ReorderAction::Critical
        } else if current_stock <= safety_stock {
            ReorderAction::ReorderNow
        } else if current_stock <= reorder_point {
            ReorderAction::ReorderSoon
        } else if days_of_cover > OVERSTOCK_COVER_DAYS {
            ReorderAction::Overstock
        } else {
            ReorderAction::Adequate
        };

        InventoryRecommendation {
            item_id,
            current_stock,
            safety_stock,
            reorder_point,
            suggested_reorder_qty,
            days_of_cover,
            stockout_risk,
            overstock_risk,
            action,
        }
    }
}
