use crate::facade::OperationFacade;
use tabgate_core::well_known::TABS;
use tabgate_core::{CreateTab, CreateWindow, Result, TabHandle, UpdateTab, WindowHandle};
use tracing::debug;

impl OperationFacade {
    /// Open a pinned tab in the background.
    pub async fn open_pinned_tab(&self, url: impl Into<String>) -> Result<TabHandle> {
        let request = CreateTab {
            url: url.into(),
            active: Some(false),
            pinned: Some(true),
        };
        debug!("Opening pinned tab: {}", request.url);
        self.host_call("open_pinned_tab", self.browsing.create_tab(request))
            .await
    }

    /// Open a focused window. The host gates window creation behind the
    /// `tabs` capability, not a window-specific one.
    pub async fn open_new_window(&self, url: impl Into<String>) -> Result<WindowHandle> {
        self.gate.require(TABS).await?;

        let request = CreateWindow {
            url: url.into(),
            focused: true,
        };
        debug!("Opening window: {}", request.url);
        self.host_call("open_new_window", self.browsing.create_window(request))
            .await
    }

    pub async fn open_tab(&self, url: impl Into<String>) -> Result<TabHandle> {
        let request = CreateTab {
            url: url.into(),
            active: Some(true),
            pinned: None,
        };
        debug!("Opening tab: {}", request.url);
        self.host_call("open_tab", self.browsing.create_tab(request))
            .await
    }

    /// Point the currently active tab at `url`.
    pub async fn navigate_active_tab(&self, url: impl Into<String>) -> Result<TabHandle> {
        let request = UpdateTab { url: url.into() };
        debug!("Navigating active tab: {}", request.url);
        self.host_call("navigate_active_tab", self.browsing.update_active_tab(request))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use crate::testing::facade_with;
    use tabgate_core::mock_host::{HostApi, MockHost};
    use tabgate_core::GateError;

    #[tokio::test]
    async fn test_pinned_tab_is_background() {
        let (host, facade) = facade_with(MockHost::new());

        let tab = facade.open_pinned_tab("https://mail.example.com").await.unwrap();

        assert!(tab.pinned);
        assert!(!tab.active);
        assert_eq!(host.tab_requests()[0].active, Some(false));
        assert_eq!(host.calls(HostApi::Contains), 0);
    }

    #[tokio::test]
    async fn test_open_tab_is_active() {
        let (_host, facade) = facade_with(MockHost::new());

        let tab = facade.open_tab("https://example.com").await.unwrap();

        assert!(tab.active);
        assert!(!tab.pinned);
        assert_eq!(tab.url.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn test_new_window_gated_by_tabs() {
        let (host, facade) = facade_with(MockHost::new().with_granted(&["management"]));

        match facade.open_new_window("https://example.com").await {
            Err(GateError::PermissionDenied(name)) => assert_eq!(name.as_str(), "tabs"),
            other => panic!("Expected PermissionDenied, got {:?}", other),
        }
        assert_eq!(host.calls(HostApi::CreateWindow), 0);

        host.grant(&["tabs"]);
        let window = facade.open_new_window("https://example.com").await.unwrap();
        assert!(window.focused);
        assert_eq!(window.tabs.len(), 1);
    }

    #[tokio::test]
    async fn test_navigate_updates_active_tab() {
        let (host, facade) = facade_with(MockHost::new());

        let tab = facade.navigate_active_tab("https://news.example.com").await.unwrap();

        assert_eq!(tab.id, 1);
        assert_eq!(host.tabs()[0].url.as_deref(), Some("https://news.example.com"));
    }

    #[tokio::test]
    async fn test_tab_host_error() {
        let (host, facade) = facade_with(MockHost::new());
        host.fail(HostApi::CreateTab, "Cannot access contents of url");

        match facade.open_tab("chrome://settings").await {
            Err(GateError::HostOperation(msg)) => assert_eq!(msg, "Cannot access contents of url"),
            other => panic!("Expected HostOperation, got {:?}", other),
        }
    }
}
