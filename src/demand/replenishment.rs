use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

/// Suggested handling for an item's stock position, ordered by severity.
/// Sorting recommendations by action puts the most urgent first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReorderAction {
    /// Stock is exhausted or negative.
    Critical,
    /// Stock has fallen to or below the safety buffer.
    ReorderNow,
    /// Stock has fallen to or below the reorder point.
    ReorderSoon,
    /// Cover exceeds ninety days.
    Overstock,
    Adequate,
}

/// Reorder guidance for one item, derived from a demand forecast and the
/// current stock position. Computed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecommendation {
    pub item_id: Uuid,
    /// On-hand minus reserved at the time of the run.
    pub current_stock: i64,
    pub safety_stock: i64,
    pub reorder_point: i64,
    pub suggested_reorder_qty: i64,
    /// 999 marks effectively infinite cover (no forecast demand).
    pub days_of_cover: i64,
    /// Percentage, 0..100.
    pub stockout_risk: u8,
    /// Percentage, 0..100.
    pub overstock_risk: u8,
    pub action: ReorderAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_critical_first() {
        let mut actions = vec![
            ReorderAction::Adequate,
            ReorderAction::Overstock,
            ReorderAction::Critical,
            ReorderAction::ReorderSoon,
            ReorderAction::ReorderNow,
        ];
        actions.sort();
        assert_eq!(
            actions,
            vec![
                ReorderAction::Critical,
                ReorderAction::ReorderNow,
                ReorderAction::ReorderSoon,
                ReorderAction::Overstock,
                ReorderAction::Adequate,
            ]
        );
    }

    #[test]
    fn action_formats_as_screaming_snake_case() {
        assert_eq!(ReorderAction::ReorderNow.to_string(), "REORDER_NOW");
        assert_eq!(ReorderAction::Critical.to_string(), "CRITICAL");
    }
}
