use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::demand::replenishment::ReorderAction;

/// Domain events emitted by the forecasting services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// A demand forecast was produced for an item.
    ForecastGenerated {
        item_id: Uuid,
        horizon_days: u32,
        model: String,
        accuracy: f64,
    },
    /// An item's stock position warrants immediate attention.
    ReplenishmentAlert {
        item_id: Uuid,
        action: ReorderAction,
        current_stock: i64,
        reorder_point: i64,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Convenience constructor returning the sender plus its receiving end.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(tx), rx)
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sent_events_arrive_in_order() {
        let (sender, mut rx) = EventSender::channel(8);
        let item_id = Uuid::new_v4();
        sender
            .send(Event::ForecastGenerated {
                item_id,
                horizon_days: 14,
                model: "holt-seasonal-v1".to_string(),
                accuracy: 0.9,
            })
            .await
            .unwrap();
        match rx.recv().await.unwrap() {
            Event::ForecastGenerated { item_id: id, .. } => assert_eq!(id, item_id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_when_receiver_is_dropped() {
        let (sender, rx) = EventSender::channel(1);
        drop(rx);
        let result = sender
            .send(Event::ReplenishmentAlert {
                item_id: Uuid::new_v4(),
                action: ReorderAction::Critical,
                current_stock: 0,
                reorder_point: 10,
            })
            .await;
        assert!(result.is_err());
    }
}
