use super::seasonality::SeasonalFactors;
use super::series::DemandSample;
use super::smoothing;

/// Lower bound reported when validation is not possible.
pub const ACCURACY_FLOOR: f64 = 0.5;
/// Upper bound: a perfect holdout never claims certainty.
pub const ACCURACY_CEILING: f64 = 0.99;

/// Holdout accuracy of the level/trend/seasonal model on a demand window.
///
/// Holds out the last `holdout_days` days, refits seasonality and smoothing
/// on the remainder, forecasts the held-out span and scores `1 - MAPE` over
/// the nonzero actuals. Windows shorter than `min_window` days, or holdouts
/// with no nonzero demand, score the floor.
pub fn holdout_accuracy(
    series: &[DemandSample],
    alpha: f64,
    beta: f64,
    holdout_days: usize,
    min_window: usize,
) -> f64 {
    if series.len() < min_window || series.len() <= holdout_days {
        return ACCURACY_FLOOR;
    }

    let (train, holdout) = series.split_at(series.len() - holdout_days);
    let factors = SeasonalFactors::from_series(train);
    let train_values: Vec<f64> = train.iter().map(|s| s.demand as f64).collect();
    let model = smoothing::fit(&train_values, alpha, beta);

    let mut error_sum = 0.0;
    let mut scored = 0usize;
    for (offset, sample) in holdout.iter().enumerate() {
        if sample.demand == 0 {
            continue;
        }
        let predicted = (model.project(offset as u32 + 1) * factors.for_date(sample.date)).max(0.0);
        let actual = sample.demand as f64;
        error_sum += ((actual - predicted) / actual).abs();
        scored += 1;
    }
    if scored == 0 {
        return ACCURACY_FLOOR;
    }

    (1.0 - error_sum / scored as f64).clamp(ACCURACY_FLOOR, ACCURACY_CEILING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series_of(values: &[i64]) -> Vec<DemandSample> {
        let start = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, demand)| DemandSample {
                date: start + Duration::days(i as i64),
                demand: *demand,
            })
            .collect()
    }

    #[test]
    fn flat_series_scores_near_the_ceiling() {
        let series = series_of(&[10; 60]);
        let accuracy = holdout_accuracy(&series, 0.3, 0.1, 7, 21);
        assert!(accuracy >= 0.9);
    }

    #[test]
    fn short_window_scores_the_floor() {
        let series = series_of(&[10; 20]);
        assert_eq!(holdout_accuracy(&series, 0.3, 0.1, 7, 21), ACCURACY_FLOOR);
    }

    #[test]
    fn all_zero_holdout_scores_the_floor() {
        let mut values = vec![10i64; 23];
        for v in values.iter_mut().rev().take(7) {
            *v = 0;
        }
        let series = series_of(&values);
        assert_eq!(holdout_accuracy(&series, 0.3, 0.1, 7, 21), ACCURACY_FLOOR);
    }

    #[test]
    fn erratic_series_scores_below_flat() {
        let erratic: Vec<i64> = (0..60).map(|i| if i % 3 == 0 { 40 } else { 2 }).collect();
        let flat = series_of(&[10; 60]);
        let noisy = series_of(&erratic);
        let flat_accuracy = holdout_accuracy(&flat, 0.3, 0.1, 7, 21);
        let noisy_accuracy = holdout_accuracy(&noisy, 0.3, 0.1, 7, 21);
        assert!(noisy_accuracy < flat_accuracy);
        assert!(noisy_accuracy >= ACCURACY_FLOOR);
    }
}
