use crate::registry::CapabilityRegistry;
use std::sync::Arc;
use tabgate_core::{CapabilityName, GateError, Metrics, Result};
use tracing::warn;

/// Guard in front of privileged operations. Every call re-verifies against
/// the live host state.
#[derive(Clone)]
pub struct CapabilityGate {
    registry: Arc<CapabilityRegistry>,
    metrics: Arc<Metrics>,
}

impl CapabilityGate {
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        let metrics = registry.metrics().clone();
        Self { registry, metrics }
    }

    pub async fn verify(&self, name: &CapabilityName) -> Result<bool> {
        self.metrics.inc_gate_checks();
        self.registry.check(name).await
    }

    /// `PermissionDenied(name)` unless the host currently grants `name`.
    /// A failed check propagates as `HostQuery`.
    pub async fn require(&self, name: &str) -> Result<()> {
        let name = CapabilityName::from(name);
        if self.verify(&name).await? {
            return Ok(());
        }

        self.metrics.inc_permission_denials();
        warn!("Permission denied: {}", name);
        Err(GateError::PermissionDenied(name))
    }

    pub fn registry(&self) -> &Arc<CapabilityRegistry> {
        &self.registry
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::DeclaredCapabilities;
    use tabgate_core::mock_host::{HostApi, MockHost};
    use tabgate_core::EventBus;

    fn gate(host: &Arc<MockHost>) -> CapabilityGate {
        let declared = DeclaredCapabilities::new(["tabs", "management"]).unwrap();
        let registry = CapabilityRegistry::new(host.clone(), declared, EventBus::new(4));
        CapabilityGate::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_require_granted() {
        let host = Arc::new(MockHost::new().with_granted(&["management"]));
        assert!(gate(&host).require("management").await.is_ok());
    }

    #[tokio::test]
    async fn test_require_denied() {
        let host = Arc::new(MockHost::new());
        match gate(&host).require("management").await {
            Err(GateError::PermissionDenied(name)) => assert_eq!(name.as_str(), "management"),
            other => panic!("Expected PermissionDenied, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_check_failure_is_not_a_denial() {
        let host = Arc::new(MockHost::new());
        host.fail(HostApi::Contains, "host unavailable");

        let result = gate(&host).require("tabs").await;
        assert!(matches!(result, Err(GateError::HostQuery(_))));
    }

    #[tokio::test]
    async fn test_every_verify_hits_host() {
        let host = Arc::new(MockHost::new().with_granted(&["tabs"]));
        let gate = gate(&host);

        assert!(gate.verify(&"tabs".into()).await.unwrap());
        host.revoke(&["tabs"]);
        assert!(!gate.verify(&"tabs".into()).await.unwrap());
        assert_eq!(host.calls(HostApi::Contains), 2);
    }

    #[tokio::test]
    async fn test_metrics_track_checks_and_denials() {
        let host = Arc::new(MockHost::new().with_granted(&["tabs"]));
        let gate = gate(&host);

        gate.require("tabs").await.unwrap();
        let _ = gate.require("management").await;

        let snapshot = gate.registry().metrics().snapshot();
        assert_eq!(snapshot.gate_checks, 2);
        assert_eq!(snapshot.permission_denials, 1);
    }
}
