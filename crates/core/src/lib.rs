//! Data model, error taxonomy and host interfaces shared by every tabgate crate.

pub mod error;
pub mod events;
pub mod host;
pub mod metrics;
#[cfg(any(test, feature = "mock"))]
pub mod mock_host;
pub mod types;

pub use error::{GateError, HostError, Result};
pub use events::{EventBus, EventEnvelope, GateEvent};
pub use host::{
    BookmarksHost, BrowsingHost, CapabilityChange, CapabilityHost, CapabilityListener, Host,
    ManagementHost, StorageHost, SubscriptionId, TopSitesHost,
};
pub use metrics::{Metrics, MetricsSnapshot};
pub use types::*;
