use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Direction and strength of the demand trend across the sample window.
///
/// Strength is the total change over the window relative to mean demand,
/// clamped to a 0..100 percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub strength: f64,
}

impl Trend {
    pub fn stable() -> Self {
        Self {
            direction: TrendDirection::Stable,
            strength: 0.0,
        }
    }

    /// Ordinary least-squares slope of demand against day index.
    ///
    /// The direction stays Stable until the slope exceeds 10% of mean demand
    /// spread across the window, which filters out drift that would take the
    /// whole window to move the mean by a tenth.
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();
        if n < 2 {
            return Self::stable();
        }
        let count = n as f64;
        let mean_x = (count - 1.0) / 2.0;
        let mean_y = values.iter().sum::<f64>() / count;
        if mean_y <= 0.0 {
            return Self::stable();
        }

        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (i, y) in values.iter().enumerate() {
            let dx = i as f64 - mean_x;
            sxy += dx * (y - mean_y);
            sxx += dx * dx;
        }
        if sxx == 0.0 {
            return Self::stable();
        }

        let slope = sxy / sxx;
        let strength = ((slope.abs() * count / mean_y) * 100.0).clamp(0.0, 100.0);
        let threshold = 0.1 * mean_y / count;
        let direction = if slope.abs() <= threshold {
            TrendDirection::Stable
        } else if slope > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        };
        Self {
            direction,
            strength,
        }
    }
}
