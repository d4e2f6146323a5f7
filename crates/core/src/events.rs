//! Process-wide publish/subscribe channel for capability and app lifecycle
//! notifications.

use crate::metrics::Metrics;
use crate::types::CapabilityName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateEvent {
    /// The host granted one or more capabilities.
    CapabilityAdded(Vec<CapabilityName>),
    /// The host revoked one or more capabilities.
    CapabilityRemoved(Vec<CapabilityName>),
    /// An application uninstall completed.
    ApplicationUninstalled,
}

/// A published event plus the bookkeeping the bus attaches to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Monotonic per-bus sequence number, starting at 1.
    pub sequence: u64,
    pub published_at: DateTime<Utc>,
    pub event: GateEvent,
}

/// Cloneable handle to a broadcast channel. All clones publish to the same
/// subscribers.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EventEnvelope>,
    sequence: Arc<AtomicU64>,
    metrics: Option<Arc<Metrics>>,
}

impl EventBus {
    /// `capacity` is the number of events a slow subscriber may lag behind
    /// before it starts missing events.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            sequence: Arc::new(AtomicU64::new(0)),
            metrics: None,
        }
    }

    pub fn with_metrics(capacity: usize, metrics: Arc<Metrics>) -> Self {
        Self {
            metrics: Some(metrics),
            ..Self::new(capacity)
        }
    }

    /// Publish an event to every current subscriber. Returns how many
    /// subscribers received it; publishing with no subscribers is not an error.
    pub fn publish(&self, event: GateEvent) -> usize {
        let envelope = EventEnvelope {
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst) + 1,
            published_at: Utc::now(),
            event,
        };

        if let Some(metrics) = &self.metrics {
            metrics.inc_events_published();
        }

        debug!("Publishing event #{}: {:?}", envelope.sequence, envelope.event);
        self.tx.send(envelope).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_all_subscribers() {
        let bus = EventBus::new(8);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        let delivered = bus.publish(GateEvent::ApplicationUninstalled);
        assert_eq!(delivered, 2);

        assert_eq!(first.recv().await.unwrap().event, GateEvent::ApplicationUninstalled);
        assert_eq!(second.recv().await.unwrap().event, GateEvent::ApplicationUninstalled);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let bus = EventBus::new(8);
        assert_eq!(bus.publish(GateEvent::ApplicationUninstalled), 0);
    }

    #[tokio::test]
    async fn test_sequence_numbers_increase() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(GateEvent::CapabilityAdded(vec!["tabs".into()]));
        bus.publish(GateEvent::CapabilityRemoved(vec!["tabs".into()]));

        let a = rx.recv().await.unwrap();
        let b = rx.recv().await.unwrap();
        assert_eq!(a.sequence, 1);
        assert_eq!(b.sequence, 2);
        assert_eq!(b.event, GateEvent::CapabilityRemoved(vec!["tabs".into()]));
    }

    #[tokio::test]
    async fn test_clones_share_subscribers() {
        let bus = EventBus::new(8);
        let clone = bus.clone();
        let mut rx = bus.subscribe();

        clone.publish(GateEvent::ApplicationUninstalled);
        assert!(rx.recv().await.is_ok());
        assert_eq!(clone.subscriber_count(), 1);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let bus = EventBus::new(0);
        let _rx = bus.subscribe();
        assert_eq!(bus.publish(GateEvent::ApplicationUninstalled), 1);
    }

    #[test]
    fn test_publish_counts_into_metrics() {
        let metrics = Metrics::new();
        let bus = EventBus::with_metrics(4, metrics.clone());

        bus.publish(GateEvent::ApplicationUninstalled);
        bus.publish(GateEvent::ApplicationUninstalled);

        assert_eq!(metrics.snapshot().events_published, 2);
    }
}
