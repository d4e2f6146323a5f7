//! Permission-gated entry point for every host operation the UI needs.

use crate::config::FacadeConfig;
use std::future::Future;
use std::sync::Arc;
use tabgate_core::{
    BookmarksHost, BrowsingHost, EventBus, GateError, Host, HostError, ManagementHost, Metrics,
    Result, TopSitesHost,
};
use tabgate_memory::KeyValueStore;
use tabgate_policy::{CapabilityGate, CapabilityRegistry, DeclaredCapabilities};
use tracing::{debug, warn};

/// Composes the capability gate, the host APIs and the settings store.
///
/// Gated operations re-verify their capability on every call and never reach
/// the host when the gate denies. Each call is a single round trip: no
/// retries, no caching, no timeout.
pub struct OperationFacade {
    pub(crate) gate: CapabilityGate,
    pub(crate) store: KeyValueStore,
    pub(crate) management: Arc<dyn ManagementHost>,
    pub(crate) browsing: Arc<dyn BrowsingHost>,
    pub(crate) top_sites: Arc<dyn TopSitesHost>,
    pub(crate) bookmarks: Arc<dyn BookmarksHost>,
    pub(crate) events: EventBus,
    pub(crate) metrics: Arc<Metrics>,
    pub(crate) config: FacadeConfig,
}

impl OperationFacade {
    /// Wire every component against one host. The capability registry
    /// subscribes to host grant changes here.
    ///
    /// Fails with `InvalidArgument` when `config` does not validate.
    pub fn new<H>(
        host: Arc<H>,
        declared: DeclaredCapabilities,
        config: FacadeConfig,
    ) -> Result<Self>
    where
        H: Host + 'static,
    {
        config.validate()?;

        let metrics = Metrics::new();
        let events = EventBus::with_metrics(config.event_capacity, metrics.clone());
        let registry = CapabilityRegistry::with_metrics(
            host.clone(),
            declared,
            events.clone(),
            metrics.clone(),
        );

        debug!(
            "Operation facade ready: {} declared capabilities",
            registry.declared().len()
        );

        Ok(Self {
            gate: CapabilityGate::new(Arc::new(registry)),
            store: KeyValueStore::with_metrics(host.clone(), metrics.clone()),
            management: host.clone(),
            browsing: host.clone(),
            top_sites: host.clone(),
            bookmarks: host,
            events,
            metrics,
            config,
        })
    }

    pub fn registry(&self) -> &Arc<CapabilityRegistry> {
        self.gate.registry()
    }

    pub fn gate(&self) -> &CapabilityGate {
        &self.gate
    }

    pub fn store(&self) -> &KeyValueStore {
        &self.store
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    /// Unsubscribe from host notifications.
    pub fn shutdown(&self) {
        self.registry().shutdown();
    }

    /// Await one host call, mapping a host-reported failure to
    /// `HostOperation` with the message untouched.
    pub(crate) async fn host_call<T, F>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, HostError>>,
    {
        self.metrics.inc_host_calls();
        call.await.map_err(|e| {
            self.metrics.inc_host_failures();
            warn!("{} failed: {}", operation, e);
            GateError::host_operation(e)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use tabgate_core::mock_host::MockHost;

    fn declared() -> DeclaredCapabilities {
        DeclaredCapabilities::new(["tabs", "management", "bookmarks", "topSites"]).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_default_bookmark_limit() {
        let host = Arc::new(MockHost::new().with_granted(&["bookmarks"]));
        let config = FacadeConfig {
            default_bookmark_limit: 0,
            ..Default::default()
        };

        match OperationFacade::new(host.clone(), declared(), config) {
            Err(GateError::InvalidArgument(msg)) => {
                assert!(msg.contains("default_bookmark_limit"))
            }
            Ok(_) => panic!("Expected InvalidArgument, facade was built"),
            Err(other) => panic!("Expected InvalidArgument, got {:?}", other),
        }
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_new_rejects_zero_event_capacity() {
        let host = Arc::new(MockHost::new());
        let config = FacadeConfig {
            event_capacity: 0,
            ..Default::default()
        };

        assert!(matches!(
            OperationFacade::new(host, declared(), config),
            Err(GateError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_new_keeps_valid_config() {
        let host = Arc::new(MockHost::new());
        let config = FacadeConfig {
            default_bookmark_limit: 3,
            ..Default::default()
        };

        let facade = OperationFacade::new(host, declared(), config).unwrap();

        assert_eq!(facade.config().default_bookmark_limit, 3);
        assert_eq!(facade.registry().declared().len(), 4);
    }
}
