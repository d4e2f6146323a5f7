//! Interfaces the facade consumes from the host platform.
//!
//! Every host future settles exactly once with either the host's result or a
//! [`HostError`] carrying the host message verbatim.

use crate::error::HostError;
use crate::types::*;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Grant or revoke pushed by the host outside of any request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityChange {
    Added(Vec<CapabilityName>),
    Removed(Vec<CapabilityName>),
}

pub type CapabilityListener = Arc<dyn Fn(CapabilityChange) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Optional capability grants.
#[async_trait]
pub trait CapabilityHost: Send + Sync {
    /// Every capability the host currently grants, in host order.
    async fn granted(&self) -> Result<Vec<CapabilityName>, HostError>;

    async fn contains(&self, name: &CapabilityName) -> Result<bool, HostError>;

    /// `Ok(false)` when nothing was removed, e.g. the capability is implied
    /// by a broader grant.
    async fn remove(&self, name: &CapabilityName) -> Result<bool, HostError>;

    fn subscribe(&self, listener: CapabilityListener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// Installed application management.
#[async_trait]
pub trait ManagementHost: Send + Sync {
    async fn list_apps(&self) -> Result<Vec<AppDescriptor>, HostError>;

    async fn launch_app(&self, id: &str) -> Result<(), HostError>;

    async fn uninstall_app(&self, id: &str, options: UninstallOptions) -> Result<(), HostError>;
}

/// Tabs and windows.
#[async_trait]
pub trait BrowsingHost: Send + Sync {
    async fn create_tab(&self, request: CreateTab) -> Result<TabHandle, HostError>;

    async fn update_active_tab(&self, request: UpdateTab) -> Result<TabHandle, HostError>;

    async fn create_window(&self, request: CreateWindow) -> Result<WindowHandle, HostError>;
}

#[async_trait]
pub trait TopSitesHost: Send + Sync {
    async fn top_sites(&self) -> Result<Vec<TopSite>, HostError>;
}

#[async_trait]
pub trait BookmarksHost: Send + Sync {
    /// Nodes whose title or url matches `query`, in host order.
    async fn search(&self, query: &str) -> Result<Vec<BookmarkNode>, HostError>;

    async fn children(&self, folder_id: &str) -> Result<Vec<BookmarkNode>, HostError>;
}

/// Two-area key-value persistence.
#[async_trait]
pub trait StorageHost: Send + Sync {
    async fn set(&self, area: StorageArea, items: Map<String, Value>) -> Result<(), HostError>;

    /// An empty `keys` slice returns every stored key in the area.
    async fn get(&self, area: StorageArea, keys: &[String]) -> Result<Map<String, Value>, HostError>;
}

/// The full host surface.
pub trait Host:
    CapabilityHost + ManagementHost + BrowsingHost + TopSitesHost + BookmarksHost + StorageHost
{
}

impl<T> Host for T where
    T: CapabilityHost + ManagementHost + BrowsingHost + TopSitesHost + BookmarksHost + StorageHost
{
}
