use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// One day of observed demand for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandSample {
    pub date: NaiveDate,
    pub demand: i64,
}

/// Expand sparse per-day totals into a dense daily series ending at
/// `window_end`.
///
/// Days without a recorded total become zero-demand samples. The series
/// starts at the later of `window_start` and the earliest recorded day, so an
/// item newer than the window is not padded with history it never had. An
/// item with no recorded days yields an empty series.
pub fn gap_fill(
    totals: &[(NaiveDate, i64)],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<DemandSample> {
    let earliest = match totals.iter().map(|(date, _)| *date).min() {
        Some(date) => date,
        None => return Vec::new(),
    };
    let start = earliest.max(window_start);
    if start > window_end {
        return Vec::new();
    }

    let mut by_date: HashMap<NaiveDate, i64> = HashMap::new();
    for (date, qty) in totals {
        *by_date.entry(*date).or_insert(0) += (*qty).max(0);
    }

    let mut series = Vec::new();
    let mut day = start;
    while day <= window_end {
        series.push(DemandSample {
            date: day,
            demand: by_date.get(&day).copied().unwrap_or(0),
        });
        day += Duration::days(1);
    }
    series
}
