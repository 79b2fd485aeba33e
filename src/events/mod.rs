use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::ServiceError;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Channel of `capacity` plus the sender half wrapped for services.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), ServiceError> {
        self.sender
            .send(event)
            .await
            .map_err(|e| ServiceError::EventError(format!("Failed to send event: {}", e)))
    }

    /// Sends after a committed change without waiting for capacity.
    /// A full or closed channel drops the event with a warning.
    pub async fn publish(&self, event: Event) {
        let name = event.name();
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(event = name, "event channel full, domain event dropped");
            }
            Err(TrySendError::Closed(_)) => {
                warn!(event = name, "event channel closed, domain event dropped");
            }
        }
    }
}

/// Things that happened to inventory, published once the change is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    LotReceived {
        lot_id: Uuid,
        location_id: Uuid,
    },
    LotRetrieved {
        lot_id: Uuid,
        from_location_id: Uuid,
    },
    LotMoved {
        lot_id: Uuid,
        from_location_id: Uuid,
        to_location_id: Uuid,
    },
    LotDispatched {
        lot_id: Uuid,
        from_location_id: Uuid,
        destination_location_id: Uuid,
    },
    LotArrived {
        lot_id: Uuid,
        location_id: Uuid,
    },
    LotUpdated(Uuid),
    LotArchived(Uuid),
    LocationDisabled(Uuid),
    ClientDeactivated(Uuid),
    WarehouseClosed(Uuid),
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::LotReceived { .. } => "lot_received",
            Event::LotRetrieved { .. } => "lot_retrieved",
            Event::LotMoved { .. } => "lot_moved",
            Event::LotDispatched { .. } => "lot_dispatched",
            Event::LotArrived { .. } => "lot_arrived",
            Event::LotUpdated(_) => "lot_updated",
            Event::LotArchived(_) => "lot_archived",
            Event::LocationDisabled(_) => "location_disabled",
            Event::ClientDeactivated(_) => "client_deactivated",
            Event::WarehouseClosed(_) => "warehouse_closed",
        }
    }
}

/// Drains the event channel until every sender is gone.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::LotReceived {
                lot_id,
                location_id,
            }
            | Event::LotArrived {
                lot_id,
                location_id,
            } => {
                info!(event = event.name(), %lot_id, %location_id, "lot placed");
            }
            Event::LotRetrieved {
                lot_id,
                from_location_id,
            } => {
                info!(event = event.name(), %lot_id, %from_location_id, "lot left the network");
            }
            Event::LotMoved {
                lot_id,
                from_location_id,
                to_location_id,
            } => {
                info!(event = event.name(), %lot_id, %from_location_id, %to_location_id, "lot relocated");
            }
            Event::LotDispatched {
                lot_id,
                from_location_id,
                destination_location_id,
            } => {
                info!(
                    event = event.name(),
                    %lot_id,
                    %from_location_id,
                    %destination_location_id,
                    "lot in transit"
                );
            }
            Event::LotUpdated(id)
            | Event::LotArchived(id)
            | Event::LocationDisabled(id)
            | Event::ClientDeactivated(id)
            | Event::WarehouseClosed(id) => {
                info!(event = event.name(), %id, "inventory record changed");
            }
        }
    }

    info!("Event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn publish_delivers_in_order() {
        let (sender, mut rx) = EventSender::channel(4);
        let lot_id = Uuid::new_v4();
        sender.publish(Event::LotUpdated(lot_id)).await;
        sender.publish(Event::LotArchived(lot_id)).await;

        assert_eq!(rx.recv().await, Some(Event::LotUpdated(lot_id)));
        assert_eq!(rx.recv().await, Some(Event::LotArchived(lot_id)));
    }

    #[tokio::test]
    async fn send_to_closed_channel_is_an_event_error() {
        let (sender, rx) = EventSender::channel(1);
        drop(rx);
        assert_matches!(
            sender.send(Event::WarehouseClosed(Uuid::new_v4())).await,
            Err(ServiceError::EventError(_))
        );
        // publish swallows the same failure
        sender.publish(Event::WarehouseClosed(Uuid::new_v4())).await;
    }

    #[tokio::test]
    async fn publish_does_not_wait_on_a_full_channel() {
        let (sender, mut rx) = EventSender::channel(1);
        let first = Uuid::new_v4();
        sender.publish(Event::LotArchived(first)).await;
        tokio::time::timeout(
            std::time::Duration::from_secs(1),
            sender.publish(Event::LotArchived(Uuid::new_v4())),
        )
        .await
        .expect("publish blocked on a full channel");

        assert_eq!(rx.recv().await, Some(Event::LotArchived(first)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn processor_stops_when_senders_drop() {
        let (sender, rx) = EventSender::channel(2);
        sender.publish(Event::ClientDeactivated(Uuid::new_v4())).await;
        drop(sender);
        process_events(rx).await;
    }
}
