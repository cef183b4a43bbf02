use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::ForecastingConfig;
use crate::demand::accuracy::{self, ACCURACY_FLOOR};
use crate::demand::forecast::{DemandForecast, ForecastPoint};
use crate::demand::seasonality::SeasonalFactors;
use crate::demand::series::DemandSample;
use crate::demand::smoothing;
use crate::demand::trend::{Trend, TrendDirection};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::store::DemandStore;

/// Model identifier reported on full-model forecasts.
pub const MODEL_HOLT_SEASONAL: &str = "holt-seasonal-v1";
/// Model identifier reported on degraded simple-average forecasts.
pub const MODEL_SIMPLE_AVERAGE: &str = "simple-average-v1";

const CONFIDENCE_CEILING: f64 = 0.95;
const CONFIDENCE_FLOOR: f64 = 0.5;
const CONFIDENCE_DECAY_PER_DAY: f64 = 0.02;
const DEGRADED_CONFIDENCE: f64 = 0.6;
const DEGRADED_BOUND_RATIO: f64 = 0.5;
const LOW_CONFIDENCE_THRESHOLD: f64 = 0.7;
const TREND_FLAG_STRENGTH: f64 = 20.0;
/// Window used to rank items when the batch path auto-selects top movers.
const BATCH_VOLUME_WINDOW_DAYS: u32 = 30;

/// Item selector for a batch forecast run. Explicit ids win over a category;
/// with neither, the top movers over the trailing month are selected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BatchForecastRequest {
    pub item_ids: Option<Vec<Uuid>>,
    pub category_id: Option<Uuid>,
    #[validate(range(min = 1, max = 365))]
    pub horizon_days: Option<u32>,
    #[validate(range(min = 1, max = 10000))]
    pub limit: Option<u64>,
}

/// Produces per-item demand forecasts over an injected [`DemandStore`].
///
/// Every run is an independent, idempotent computation over the fetched
/// window; nothing is cached or persisted here.
#[derive(Clone)]
pub struct ForecastingService {
    store: Arc<dyn DemandStore>,
    event_sender: EventSender,
    config: ForecastingConfig,
}

impl ForecastingService {
    pub fn new(
        store: Arc<dyn DemandStore>,
        event_sender: EventSender,
        config: ForecastingConfig,
    ) -> Self {
        Self {
            store,
            event_sender,
            config,
        }
    }

    pub fn config(&self) -> &ForecastingConfig {
        &self.config
    }

    /// Forecast demand for one item over `horizon_days` (default from
    /// config).
    ///
    /// Items with less history than the full model needs fall back to a
    /// simple-average forecast instead of failing; only unknown items and
    /// upstream fetch failures surface as errors.
    #[instrument(skip(self))]
    pub async fn forecast_item(
        &self,
        item_id: Uuid,
        horizon_days: Option<u32>,
    ) -> Result<DemandForecast, ServiceError> {
        let horizon = horizon_days.unwrap_or(self.config.default_horizon_days);
        if horizon == 0 {
            return Err(ServiceError::ValidationError(
                "horizon_days must be at least 1".to_string(),
            ));
        }

        let series = self
            .store
            .historical_demand(item_id, self.config.window_days)
            .await?;

        let forecast = if series.len() < self.config.min_model_days {
            self.simple_average_forecast(item_id, horizon, &series)
        } else {
            self.full_model_forecast(item_id, horizon, &series)
        };

        info!(
            item_id = %item_id,
            horizon,
            model = %forecast.model,
            accuracy = forecast.accuracy,
            "Generated demand forecast"
        );
        if let Err(e) = self
            .event_sender
            .send(Event::ForecastGenerated {
                item_id,
                horizon_days: horizon,
                model: forecast.model.clone(),
                accuracy: forecast.accuracy,
            })
            .await
        {
            warn!(item_id = %item_id, error = %e, "Failed to publish forecast event");
        }

        Ok(forecast)
    }

    /// Forecast a set of items resolved from the request selector.
    ///
    /// Item forecasts run concurrently; an item that fails to forecast is
    /// logged and skipped rather than aborting the batch.
    #[instrument(skip(self, request))]
    pub async fn forecast_batch(
        &self,
        request: BatchForecastRequest,
    ) -> Result<Vec<DemandForecast>, ServiceError> {
        request.validate()?;
        let item_ids = self.resolve_batch_items(&request).await?;
        info!(count = item_ids.len(), "Running batch forecast");

        let results = join_all(
            item_ids
                .iter()
                .map(|item_id| self.forecast_item(*item_id, request.horizon_days)),
        )
        .await;

        let mut forecasts = Vec::with_capacity(results.len());
        for (item_id, result) in item_ids.iter().zip(results) {
            match result {
                Ok(forecast) => forecasts.push(forecast),
                Err(e) => {
                    warn!(item_id = %item_id, error = %e, "Skipping item that failed to forecast")
                }
            }
        }
        Ok(forecasts)
    }

    async fn resolve_batch_items(
        &self,
        request: &BatchForecastRequest,
    ) -> Result<Vec<Uuid>, ServiceError> {
        if let Some(item_ids) = &request.item_ids {
            if !item_ids.is_empty() {
                return Ok(item_ids.clone());
            }
        }
        if let Some(category_id) = request.category_id {
            return self.store.active_items_in_category(category_id).await;
        }
        let limit = request.limit.unwrap_or(self.config.top_movers_limit);
        self.store
            .top_moving_items(limit, BATCH_VOLUME_WINDOW_DAYS)
            .await
    }

    /// First forecast day: the day after the last historical sample.
    fn forecast_start(series: &[DemandSample]) -> NaiveDate {
        let last = series
            .last()
            .map(|sample| sample.date)
            .unwrap_or_else(|| Utc::now().date_naive());
        last + Duration::days(1)
    }

    /// Degraded path for sparse history: every future day gets the window
    /// mean with fixed ±50% bounds. Never fails, even on an empty window.
    fn simple_average_forecast(
        &self,
        item_id: Uuid,
        horizon: u32,
        series: &[DemandSample],
    ) -> DemandForecast {
        let mean = if series.is_empty() {
            0.0
        } else {
            series.iter().map(|s| s.demand as f64).sum::<f64>() / series.len() as f64
        };
        let start = Self::forecast_start(series);

        let points: Vec<ForecastPoint> = (0..horizon)
            .map(|offset| {
                ForecastPoint::from_projection(
                    start + Duration::days(offset as i64),
                    mean,
                    mean * DEGRADED_BOUND_RATIO,
                    DEGRADED_CONFIDENCE,
                )
            })
            .collect();

        DemandForecast {
            item_id,
            horizon_days: horizon,
            generated_at: Utc::now(),
            model: MODEL_SIMPLE_AVERAGE.to_string(),
            accuracy: ACCURACY_FLOOR,
            points,
            seasonal_factors: SeasonalFactors::neutral(),
            trend: Trend::stable(),
            recommendations: vec![format!(
                "Only {} days of demand history; forecasting the historical average of {:.1} \
                 units/day until at least {} days accumulate.",
                series.len(),
                mean,
                self.config.min_model_days
            )],
        }
    }

    /// Full pipeline: seasonal factors and trend from the window, Holt
    /// smoothing for the projection, holdout validation for the accuracy
    /// score.
    fn full_model_forecast(
        &self,
        item_id: Uuid,
        horizon: u32,
        series: &[DemandSample],
    ) -> DemandForecast {
        let values: Vec<f64> = series.iter().map(|s| s.demand as f64).collect();
        let factors = SeasonalFactors::from_series(series);
        let trend = Trend::from_values(&values);
        let model = smoothing::fit(&values, self.config.level_alpha, self.config.trend_beta);
        let start = Self::forecast_start(series);

        let mut points = Vec::with_capacity(horizon as usize);
        for h in 1..=horizon {
            let date = start + Duration::days(i64::from(h) - 1);
            let center = model.project(h) * factors.for_date(date);
            // Interval widens with the horizon to reflect compounding
            // uncertainty.
            let half_width = self.config.interval_z * model.std_error * f64::from(h).sqrt();
            let confidence =
                (CONFIDENCE_CEILING - CONFIDENCE_DECAY_PER_DAY * f64::from(h)).max(CONFIDENCE_FLOOR);
            points.push(ForecastPoint::from_projection(
                date, center, half_width, confidence,
            ));
        }

        let accuracy = accuracy::holdout_accuracy(
            series,
            self.config.level_alpha,
            self.config.trend_beta,
            self.config.holdout_days,
            self.config.min_holdout_window,
        );
        let recommendations = Self::build_recommendations(&points, &trend, horizon);

        DemandForecast {
            item_id,
            horizon_days: horizon,
            generated_at: Utc::now(),
            model: MODEL_HOLT_SEASONAL.to_string(),
            accuracy,
            points,
            seasonal_factors: factors,
            trend,
            recommendations,
        }
    }

    fn build_recommendations(
        points: &[ForecastPoint],
        trend: &Trend,
        horizon: u32,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        if trend.strength > TREND_FLAG_STRENGTH {
            match trend.direction {
                TrendDirection::Increasing => recommendations.push(format!(
                    "Demand is trending up ({:.0}% over the window); consider larger \
                     replenishment orders.",
                    trend.strength
                )),
                TrendDirection::Decreasing => recommendations.push(format!(
                    "Demand is trending down ({:.0}% over the window); consider smaller \
                     replenishment orders.",
                    trend.strength
                )),
                TrendDirection::Stable => {}
            }
        }

        let mean_confidence = if points.is_empty() {
            0.0
        } else {
            points.iter().map(|p| p.confidence).sum::<f64>() / points.len() as f64
        };
        if mean_confidence < LOW_CONFIDENCE_THRESHOLD {
            recommendations.push(format!(
                "Average forecast confidence is low ({:.2}); treat projections as indicative.",
                mean_confidence
            ));
        }

        let total: i64 = points.iter().map(|p| p.predicted).sum();
        recommendations.push(format!(
            "Projected demand of {} units over the next {} days.",
            total, horizon
        ));
        recommendations
    }
}
