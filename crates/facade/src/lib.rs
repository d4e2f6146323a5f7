//! Permission-aware asynchronous facade over the host platform.

pub mod apps;
pub mod browsing;
pub mod config;
pub mod facade;
pub mod settings;
pub mod sites;

pub use config::FacadeConfig;
pub use facade::OperationFacade;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
pub(crate) mod testing {
    use crate::{FacadeConfig, OperationFacade};
    use std::sync::Arc;
    use tabgate_core::mock_host::MockHost;
    use tabgate_policy::DeclaredCapabilities;

    pub fn facade_with(host: MockHost) -> (Arc<MockHost>, OperationFacade) {
        let host = Arc::new(host);
        let declared =
            DeclaredCapabilities::new(["tabs", "management", "bookmarks", "topSites"]).unwrap();
        let facade =
            OperationFacade::new(host.clone(), declared, FacadeConfig::default()).unwrap();
        (host, facade)
    }
}
