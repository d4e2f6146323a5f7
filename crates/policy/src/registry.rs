//! Live view over the host's optional capability grants.

use crate::manifest::DeclaredCapabilities;
use parking_lot::Mutex;
use std::sync::Arc;
use tabgate_core::{
    CapabilityChange, CapabilityGrantMap, CapabilityHost, CapabilityListener, CapabilityName,
    EventBus, GateError, GateEvent, Metrics, Result, SubscriptionId,
};
use tracing::{debug, info, warn};

/// Normalizes the host's grant set against the declared capabilities and
/// republishes host-pushed grant changes on the [`EventBus`].
///
/// Nothing is cached: every query goes to the host.
pub struct CapabilityRegistry {
    host: Arc<dyn CapabilityHost>,
    declared: DeclaredCapabilities,
    events: EventBus,
    metrics: Arc<Metrics>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl CapabilityRegistry {
    /// Subscribes to host grant/revoke notifications immediately. The
    /// subscription lasts until [`shutdown`](Self::shutdown) or drop.
    pub fn new(
        host: Arc<dyn CapabilityHost>,
        declared: DeclaredCapabilities,
        events: EventBus,
    ) -> Self {
        Self::with_metrics(host, declared, events, Metrics::new())
    }

    pub fn with_metrics(
        host: Arc<dyn CapabilityHost>,
        declared: DeclaredCapabilities,
        events: EventBus,
        metrics: Arc<Metrics>,
    ) -> Self {
        let subscription = host.subscribe(forwarding_listener(events.clone()));
        debug!(
            "Capability registry subscribed ({:?}) with {} declared capabilities",
            subscription,
            declared.len()
        );

        Self {
            host,
            declared,
            events,
            metrics,
            subscription: Mutex::new(Some(subscription)),
        }
    }

    /// Full grant map: every declared name, `true` iff the host grants it.
    pub async fn get_all(&self) -> Result<CapabilityGrantMap> {
        self.metrics.inc_host_calls();
        let granted = self.host.granted().await.map_err(|e| {
            self.metrics.inc_host_failures();
            warn!("Failed to query granted capabilities: {}", e);
            GateError::host_query(e)
        })?;

        let map = CapabilityGrantMap::from_report(self.declared.iter(), granted.iter());
        debug!("Host grants {} of {} declared capabilities", map.granted().count(), map.len());
        Ok(map)
    }

    pub async fn check(&self, name: &CapabilityName) -> Result<bool> {
        self.metrics.inc_host_calls();
        let granted = self.host.contains(name).await.map_err(|e| {
            self.metrics.inc_host_failures();
            warn!("Failed to check capability {}: {}", name, e);
            GateError::host_query(e)
        })?;

        debug!("Capability {} granted: {}", name, granted);
        Ok(granted)
    }

    /// Ask the host to drop a capability. Resolves with whether anything was
    /// actually removed.
    pub async fn revoke(&self, name: &CapabilityName) -> Result<bool> {
        self.metrics.inc_host_calls();
        let removed = self.host.remove(name).await.map_err(|e| {
            self.metrics.inc_host_failures();
            warn!("Failed to revoke capability {}: {}", name, e);
            GateError::host_query(e)
        })?;

        info!("Revoke {} -> removed: {}", name, removed);
        Ok(removed)
    }

    pub fn declared(&self) -> &DeclaredCapabilities {
        &self.declared
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// Drop the host subscription. Idempotent.
    pub fn shutdown(&self) {
        if let Some(id) = self.subscription.lock().take() {
            self.host.unsubscribe(id);
            debug!("Capability registry unsubscribed ({:?})", id);
        }
    }
}

impl Drop for CapabilityRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn forwarding_listener(events: EventBus) -> CapabilityListener {
    Arc::new(move |change: CapabilityChange| {
        let event = match change {
            CapabilityChange::Added(names) => {
                info!("Capabilities granted: {:?}", names);
                GateEvent::CapabilityAdded(names)
            }
            CapabilityChange::Removed(names) => {
                info!("Capabilities revoked: {:?}", names);
                GateEvent::CapabilityRemoved(names)
            }
        };
        events.publish(event);
    })
}
