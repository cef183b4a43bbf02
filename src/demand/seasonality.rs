use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::series::DemandSample;

/// Multiplicative weekday and month factors derived from a demand window.
///
/// Each factor is the mean ratio of that bucket's daily demand to the overall
/// window mean. Factors are strictly positive: buckets that were never
/// observed, or only observed with zero demand, stay at the neutral 1.0.
/// Weekdays index Monday = 0 through Sunday = 6; months index 1 through 12.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalFactors {
    weekday: [f64; 7],
    month: [f64; 12],
}

impl Default for SeasonalFactors {
    fn default() -> Self {
        Self::neutral()
    }
}

impl SeasonalFactors {
    /// Factors that leave every projection unchanged.
    pub fn neutral() -> Self {
        Self {
            weekday: [1.0; 7],
            month: [1.0; 12],
        }
    }

    pub fn from_series(series: &[DemandSample]) -> Self {
        if series.is_empty() {
            return Self::neutral();
        }

        let mean = series.iter().map(|s| s.demand as f64).sum::<f64>() / series.len() as f64;
        // An all-zero window would otherwise divide by zero.
        let mean = if mean > 0.0 { mean } else { 1.0 };

        let mut weekday_sum = [0.0f64; 7];
        let mut weekday_count = [0usize; 7];
        let mut month_sum = [0.0f64; 12];
        let mut month_count = [0usize; 12];

        for sample in series {
            let ratio = sample.demand as f64 / mean;
            let weekday = sample.date.weekday().num_days_from_monday() as usize;
            weekday_sum[weekday] += ratio;
            weekday_count[weekday] += 1;
            let month = sample.date.month0() as usize;
            month_sum[month] += ratio;
            month_count[month] += 1;
        }

        let mut factors = Self::neutral();
        for i in 0..7 {
            if weekday_count[i] > 0 {
                let factor = weekday_sum[i] / weekday_count[i] as f64;
                if factor > 0.0 {
                    factors.weekday[i] = factor;
                }
            }
        }
        for i in 0..12 {
            if month_count[i] > 0 {
                let factor = month_sum[i] / month_count[i] as f64;
                if factor > 0.0 {
                    factors.month[i] = factor;
                }
            }
        }
        factors
    }

    /// Combined weekday and month factor for a calendar date.
    pub fn for_date(&self, date: NaiveDate) -> f64 {
        self.weekday_factor(date) * self.month_factor(date)
    }

    pub fn weekday_factor(&self, date: NaiveDate) -> f64 {
        self.weekday[date.weekday().num_days_from_monday() as usize]
    }

    pub fn month_factor(&self, date: NaiveDate) -> f64 {
        self.month[date.month0() as usize]
    }

    pub fn weekday_factors(&self) -> &[f64; 7] {
        &self.weekday
    }

    pub fn month_factors(&self) -> &[f64; 12] {
        &self.month
    }
}
