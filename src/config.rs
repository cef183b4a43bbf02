use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::ServiceError;

/// Default values for the forecasting configuration
const DEFAULT_WINDOW_DAYS: u32 = 90;
const DEFAULT_MIN_MODEL_DAYS: usize = 14;
const DEFAULT_HORIZON_DAYS: u32 = 14;
const DEFAULT_LEVEL_ALPHA: f64 = 0.3;
const DEFAULT_TREND_BETA: f64 = 0.1;
const DEFAULT_INTERVAL_Z: f64 = 1.96;
const DEFAULT_SERVICE_LEVEL_Z: f64 = 1.65;
const DEFAULT_LEAD_TIME_DAYS: u32 = 3;
const DEFAULT_HOLDOUT_DAYS: usize = 7;
const DEFAULT_MIN_HOLDOUT_WINDOW: usize = 21;
const DEFAULT_TOP_MOVERS_LIMIT: u64 = 100;
const DEFAULT_RECOMMENDATION_LIMIT: u64 = 50;
const ENV_PREFIX: &str = "DEMANDCAST";

/// Model and service constants for forecasting and replenishment.
///
/// Values layer in the usual order: built-in defaults, then an optional TOML
/// file, then `DEMANDCAST__*` environment variables.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastingConfig {
    /// Trailing window of daily history fetched per item, in days
    #[validate(range(min = 14, max = 3650))]
    pub window_days: u32,

    /// Minimum calendar days of history required for the full model;
    /// anything shorter falls back to the simple-average forecast
    pub min_model_days: usize,

    /// Horizon used when the caller does not specify one, in days
    #[validate(range(min = 1, max = 365))]
    pub default_horizon_days: u32,

    /// Level smoothing constant for double exponential smoothing
    #[validate(range(min = 0.01, max = 0.99))]
    pub level_alpha: f64,

    /// Trend smoothing constant for double exponential smoothing
    #[validate(range(min = 0.01, max = 0.99))]
    pub trend_beta: f64,

    /// z-score controlling confidence interval width (1.96 ~ 95%)
    #[validate(range(min = 0.1, max = 5.0))]
    pub interval_z: f64,

    /// z-score controlling safety stock service level (1.65 ~ 95%)
    #[validate(range(min = 0.1, max = 5.0))]
    pub service_level_z: f64,

    /// Assumed replenishment lead time, in days
    #[validate(range(min = 1, max = 60))]
    pub lead_time_days: u32,

    /// Days held out for accuracy validation
    pub holdout_days: usize,

    /// Minimum history length before holdout validation is attempted
    pub min_holdout_window: usize,

    /// Item count when the batch path auto-selects top movers
    #[validate(range(min = 1, max = 10000))]
    pub top_movers_limit: u64,

    /// Default item count for inventory recommendations
    #[validate(range(min = 1, max = 10000))]
    pub recommendation_limit: u64,
}

impl Default for ForecastingConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            min_model_days: DEFAULT_MIN_MODEL_DAYS,
            default_horizon_days: DEFAULT_HORIZON_DAYS,
            level_alpha: DEFAULT_LEVEL_ALPHA,
            trend_beta: DEFAULT_TREND_BETA,
            interval_z: DEFAULT_INTERVAL_Z,
            service_level_z: DEFAULT_SERVICE_LEVEL_Z,
            lead_time_days: DEFAULT_LEAD_TIME_DAYS,
            holdout_days: DEFAULT_HOLDOUT_DAYS,
            min_holdout_window: DEFAULT_MIN_HOLDOUT_WINDOW,
            top_movers_limit: DEFAULT_TOP_MOVERS_LIMIT,
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }
}

impl ForecastingConfig {
    /// Load configuration, optionally merging a TOML file over the defaults.
    pub fn load(path: Option<&str>) -> Result<Self, ServiceError> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&Self::default())
                .map_err(|e| ServiceError::ConfigError(e.to_string()))?,
        );

        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }

        let cfg: Self = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(|e| ServiceError::ConfigError(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ServiceError::ConfigError(e.to_string()))?;

        cfg.validate()
            .map_err(|e| ServiceError::ConfigError(e.to_string()))?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = ForecastingConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.window_days, 90);
        assert_eq!(cfg.default_horizon_days, 14);
    }

    #[test]
    fn out_of_range_smoothing_constant_is_rejected() {
        let cfg = ForecastingConfig {
            level_alpha: 1.5,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_without_file_yields_defaults() {
        let cfg = ForecastingConfig::load(None).expect("load should succeed");
        assert_eq!(cfg.lead_time_days, 3);
        assert_eq!(cfg.level_alpha, DEFAULT_LEVEL_ALPHA);
    }
}
