/// Fitted state of double exponential (Holt) smoothing.
///
/// Seasonality is not a smoothing component here; the services apply seasonal
/// factors as a multiplicative post-adjustment on top of the level and trend
/// projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoltModel {
    pub level: f64,
    pub trend: f64,
    /// Root mean squared one-step-ahead prediction error over the fit.
    pub std_error: f64,
}

impl HoltModel {
    /// Project the fitted level and trend `horizon` days ahead.
    pub fn project(&self, horizon: u32) -> f64 {
        self.level + self.trend * horizon as f64
    }
}

/// Fit level and trend with fixed smoothing constants.
///
/// The level initializes from the first week's average and the trend from
/// the first-to-last slope. One-step prediction errors from the second point
/// onward accumulate into the standard error.
pub fn fit(values: &[f64], alpha: f64, beta: f64) -> HoltModel {
    if values.is_empty() {
        return HoltModel {
            level: 0.0,
            trend: 0.0,
            std_error: 0.0,
        };
    }

    let init_days = values.len().min(7);
    let mut level = values[..init_days].iter().sum::<f64>() / init_days as f64;
    let mut trend = if values.len() > 1 {
        (values[values.len() - 1] - values[0]) / (values.len() - 1) as f64
    } else {
        0.0
    };

    let mut squared_error = 0.0;
    let mut error_count = 0usize;
    for &actual in &values[1..] {
        let predicted = level + trend;
        let error = actual - predicted;
        squared_error += error * error;
        error_count += 1;

        let previous_level = level;
        level = alpha * actual + (1.0 - alpha) * (level + trend);
        trend = beta * (level - previous_level) + (1.0 - beta) * trend;
    }

    let std_error = if error_count > 0 {
        (squared_error / error_count as f64).sqrt()
    } else {
        0.0
    };

    HoltModel {
        level,
        trend,
        std_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_series_keeps_level_and_zero_trend() {
        let values = vec![10.0; 30];
        let model = fit(&values, 0.3, 0.1);
        assert!((model.level - 10.0).abs() < 1e-9);
        assert!(model.trend.abs() < 1e-9);
        assert!(model.std_error < 1e-9);
        assert!((model.project(5) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn linear_series_yields_positive_trend() {
        let values: Vec<f64> = (0..30).map(|i| 5.0 + 2.0 * i as f64).collect();
        let model = fit(&values, 0.3, 0.1);
        assert!(model.trend > 0.5);
        assert!(model.project(10) > model.project(1));
    }

    #[test]
    fn noisy_series_reports_positive_std_error() {
        let values: Vec<f64> = (0..30)
            .map(|i| if i % 2 == 0 { 5.0 } else { 15.0 })
            .collect();
        let model = fit(&values, 0.3, 0.1);
        assert!(model.std_error > 1.0);
    }

    #[test]
    fn empty_input_is_inert() {
        let model = fit(&[], 0.3, 0.1);
        assert_eq!(model.level, 0.0);
        assert_eq!(model.project(7), 0.0);
    }
}
