use crate::facade::OperationFacade;
use tabgate_core::well_known::{BOOKMARKS, TOP_SITES};
use tabgate_core::{BookmarkNode, GateError, Result, TopSite};
use tracing::debug;

impl OperationFacade {
    /// Most visited sites, in host order.
    pub async fn fetch_top_sites(&self) -> Result<Vec<TopSite>> {
        self.gate.require(TOP_SITES).await?;
        self.host_call("fetch_top_sites", self.top_sites.top_sites())
            .await
    }

    /// Links (not sub-folders) directly inside the folder titled exactly
    /// `name`, truncated to `limit` in host order.
    ///
    /// `None` and `Some(0)` both fall back to the configured default limit,
    /// so a caller wanting zero results has to skip the call.
    pub async fn fetch_bookmarks_folder(
        &self,
        name: &str,
        limit: Option<usize>,
    ) -> Result<Vec<BookmarkNode>> {
        let limit = match limit {
            None | Some(0) => self.config.default_bookmark_limit,
            Some(limit) => limit,
        };

        self.gate.require(BOOKMARKS).await?;

        let matches = self
            .host_call("bookmark_search", self.bookmarks.search(name))
            .await?;
        let folder = matches
            .into_iter()
            .find(|node| node.is_folder() && node.title == name)
            .ok_or_else(|| GateError::NotFound(format!("bookmark folder '{}'", name)))?;

        let children = self
            .host_call("bookmark_children", self.bookmarks.children(&folder.id))
            .await?;
        let links: Vec<BookmarkNode> = children
            .into_iter()
            .filter(|node| node.url.is_some())
            .take(limit)
            .collect();

        debug!("Folder '{}' yielded {} link(s)", name, links.len());
        Ok(links)
    }

    /// [`fetch_bookmarks_folder`](Self::fetch_bookmarks_folder) on the
    /// configured bookmarks bar folder.
    pub async fn fetch_bookmarks_bar(&self, limit: Option<usize>) -> Result<Vec<BookmarkNode>> {
        let folder = self.config.bookmarks_folder.clone();
        self.fetch_bookmarks_folder(&folder, limit).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use crate::testing::facade_with;
    use tabgate_core::mock_host::{folder, link, site, HostApi, MockHost};
    use tabgate_core::{BookmarkNode, GateError};

    fn bookmark_tree(links: usize) -> Vec<BookmarkNode> {
        let mut nodes = vec![
            folder("0", "root", None),
            folder("1", "Bookmarks Bar", Some("0")),
            folder("2", "Other Bookmarks", Some("0")),
            folder("3", "Bookmarks Bar Archive", Some("1")),
        ];
        for i in 0..links {
            nodes.push(link(
                &format!("l{}", i),
                &format!("Link {}", i),
                &format!("https://site{}.example.com", i),
                "1",
            ));
        }
        nodes
    }

    #[tokio::test]
    async fn test_top_sites_in_host_order() {
        let (_host, facade) = facade_with(
            MockHost::new()
                .with_granted(&["topSites"])
                .with_top_sites(vec![site("https://a.com", "A"), site("https://b.com", "B")]),
        );

        let sites = facade.fetch_top_sites().await.unwrap();

        assert_eq!(sites[0].title, "A");
        assert_eq!(sites[1].url, "https://b.com");
    }

    #[tokio::test]
    async fn test_top_sites_check_failure_is_distinct_from_denial() {
        let (host, facade) = facade_with(MockHost::new().with_granted(&["topSites"]));
        host.fail(HostApi::Contains, "host gone");

        let result = facade.fetch_top_sites().await;

        assert!(matches!(result, Err(GateError::HostQuery(_))));
        assert_eq!(host.calls(HostApi::TopSites), 0);
    }

    #[tokio::test]
    async fn test_folder_children_filtered_and_truncated() {
        let (_host, facade) = facade_with(
            MockHost::new()
                .with_granted(&["bookmarks"])
                .with_bookmarks(bookmark_tree(8)),
        );

        let links = facade.fetch_bookmarks_folder("Bookmarks Bar", Some(5)).await.unwrap();

        let ids: Vec<&str> = links.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["l0", "l1", "l2", "l3", "l4"]);
        assert!(links.iter().all(|n| n.url.is_some()));
    }

    #[tokio::test]
    async fn test_zero_limit_means_default() {
        let (_host, facade) = facade_with(
            MockHost::new()
                .with_granted(&["bookmarks"])
                .with_bookmarks(bookmark_tree(12)),
        );

        assert_eq!(facade.fetch_bookmarks_folder("Bookmarks Bar", Some(0)).await.unwrap().len(), 10);
        assert_eq!(facade.fetch_bookmarks_folder("Bookmarks Bar", None).await.unwrap().len(), 10);
        assert_eq!(facade.fetch_bookmarks_folder("Bookmarks Bar", Some(11)).await.unwrap().len(), 11);
    }

    #[tokio::test]
    async fn test_missing_folder_not_found() {
        let (host, facade) = facade_with(
            MockHost::new()
                .with_granted(&["bookmarks"])
                .with_bookmarks(bookmark_tree(2)),
        );

        let result = facade.fetch_bookmarks_folder("Bookmarks", None).await;

        assert!(matches!(result, Err(GateError::NotFound(_))));
        assert_eq!(host.calls(HostApi::BookmarkChildren), 0);
    }

    #[tokio::test]
    async fn test_bookmarks_denied_skips_search() {
        let (host, facade) = facade_with(MockHost::new().with_bookmarks(bookmark_tree(3)));

        let result = facade.fetch_bookmarks_bar(None).await;

        assert!(matches!(result, Err(GateError::PermissionDenied(_))));
        assert_eq!(host.calls(HostApi::BookmarkSearch), 0);
    }

    #[tokio::test]
    async fn test_children_error_is_host_operation() {
        let (host, facade) = facade_with(
            MockHost::new()
                .with_granted(&["bookmarks"])
                .with_bookmarks(bookmark_tree(3)),
        );
        host.fail(HostApi::BookmarkChildren, "Can't find parent bookmark for id.");

        let result = facade.fetch_bookmarks_bar(Some(2)).await;

        assert!(matches!(result, Err(GateError::HostOperation(_))));
    }
}
