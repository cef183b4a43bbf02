use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::seasonality::SeasonalFactors;
use super::trend::Trend;

/// One forecast day: a rounded point prediction with its confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: i64,
    pub lower_bound: i64,
    pub upper_bound: i64,
    /// Fraction in [0.5, 0.95]; decays with horizon distance.
    pub confidence: f64,
}

impl ForecastPoint {
    /// Build a point from a raw projection, clamping so that
    /// `0 <= lower_bound <= predicted <= upper_bound` holds after rounding.
    pub fn from_projection(date: NaiveDate, center: f64, half_width: f64, confidence: f64) -> Self {
        let predicted = center.round().max(0.0) as i64;
        let lower = (center - half_width).round().max(0.0) as i64;
        let upper = (center + half_width).round().max(0.0) as i64;
        Self {
            date,
            predicted,
            lower_bound: lower.min(predicted),
            upper_bound: upper.max(predicted),
            confidence,
        }
    }
}

/// Immutable result of one forecast run for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandForecast {
    pub item_id: Uuid,
    pub horizon_days: u32,
    pub generated_at: DateTime<Utc>,
    /// Identifier of the model variant that produced the points.
    pub model: String,
    /// Holdout validation score in [0.5, 0.99].
    pub accuracy: f64,
    pub points: Vec<ForecastPoint>,
    pub seasonal_factors: SeasonalFactors,
    pub trend: Trend,
    /// Human-readable guidance derived from the run.
    pub recommendations: Vec<String>,
}

impl DemandForecast {
    /// Sum of point predictions across the horizon.
    pub fn total_predicted(&self) -> i64 {
        self.points.iter().map(|p| p.predicted).sum()
    }

    pub fn mean_confidence(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.points.iter().map(|p| p.confidence).sum::<f64>() / self.points.len() as f64
    }
}
