//! In-memory host used by tests and the demo binary.
//!
//! Records how often each host API is called and lets callers inject a
//! failure per API, so gated operations can be checked for "never reached
//! the host".

use crate::error::HostError;
use crate::host::*;
use crate::types::*;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostApi {
    Granted,
    Contains,
    Remove,
    ListApps,
    LaunchApp,
    UninstallApp,
    CreateTab,
    UpdateTab,
    CreateWindow,
    TopSites,
    BookmarkSearch,
    BookmarkChildren,
    StorageSet,
    StorageGet,
}

#[derive(Default)]
struct MockState {
    granted: Vec<CapabilityName>,
    implied: HashSet<CapabilityName>,
    apps: Vec<AppDescriptor>,
    launched: Vec<String>,
    uninstalls: Vec<(String, UninstallOptions)>,
    tabs: Vec<TabHandle>,
    tab_requests: Vec<CreateTab>,
    windows: Vec<WindowHandle>,
    next_id: i64,
    top_sites: Vec<TopSite>,
    bookmarks: Vec<BookmarkNode>,
    sync: Map<String, Value>,
    local: Map<String, Value>,
    storage_queries: Vec<(StorageArea, Vec<String>)>,
    failures: HashMap<HostApi, String>,
    calls: HashMap<HostApi, usize>,
}

pub struct MockHost {
    state: Mutex<MockState>,
    listeners: Mutex<HashMap<SubscriptionId, CapabilityListener>>,
    next_subscription: AtomicU64,
}

impl MockHost {
    /// A host with one window holding one active new-tab page.
    pub fn new() -> Self {
        let state = MockState {
            tabs: vec![tab(1, 1, "chrome://newtab/", true, false)],
            next_id: 2,
            ..Default::default()
        };

        Self {
            state: Mutex::new(state),
            listeners: Mutex::new(HashMap::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    pub fn with_granted(self, names: &[&str]) -> Self {
        self.state.lock().granted = names.iter().map(|n| CapabilityName::from(*n)).collect();
        self
    }

    /// Mark a capability as implied by a broader grant: it stays granted and
    /// `remove` reports `false`.
    pub fn with_implied(self, names: &[&str]) -> Self {
        {
            let mut state = self.state.lock();
            for name in names {
                let name = CapabilityName::from(*name);
                if !state.granted.contains(&name) {
                    state.granted.push(name.clone());
                }
                state.implied.insert(name);
            }
        }
        self
    }

    pub fn with_apps(self, apps: Vec<AppDescriptor>) -> Self {
        self.state.lock().apps = apps;
        self
    }

    pub fn with_top_sites(self, sites: Vec<TopSite>) -> Self {
        self.state.lock().top_sites = sites;
        self
    }

    pub fn with_bookmarks(self, nodes: Vec<BookmarkNode>) -> Self {
        self.state.lock().bookmarks = nodes;
        self
    }

    /// Grant capabilities and push the change to every listener.
    pub fn grant(&self, names: &[&str]) {
        let added: Vec<CapabilityName> = names.iter().map(|n| CapabilityName::from(*n)).collect();
        {
            let mut state = self.state.lock();
            for name in &added {
                if !state.granted.contains(name) {
                    state.granted.push(name.clone());
                }
            }
        }
        self.notify(CapabilityChange::Added(added));
    }

    /// Revoke capabilities from outside the facade (e.g. the user in the
    /// browser settings) and push the change to every listener.
    pub fn revoke(&self, names: &[&str]) {
        let removed: Vec<CapabilityName> =
            names.iter().map(|n| CapabilityName::from(*n)).collect();
        self.state.lock().granted.retain(|n| !removed.contains(n));
        self.notify(CapabilityChange::Removed(removed));
    }

    /// Make every subsequent call to `api` fail with `message`.
    pub fn fail(&self, api: HostApi, message: &str) {
        self.state.lock().failures.insert(api, message.to_string());
    }

    pub fn recover(&self, api: HostApi) {
        self.state.lock().failures.remove(&api);
    }

    pub fn calls(&self, api: HostApi) -> usize {
        self.state.lock().calls.get(&api).copied().unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn launched(&self) -> Vec<String> {
        self.state.lock().launched.clone()
    }

    pub fn uninstalls(&self) -> Vec<(String, UninstallOptions)> {
        self.state.lock().uninstalls.clone()
    }

    pub fn tab_requests(&self) -> Vec<CreateTab> {
        self.state.lock().tab_requests.clone()
    }

    pub fn tabs(&self) -> Vec<TabHandle> {
        self.state.lock().tabs.clone()
    }

    pub fn stored(&self, area: StorageArea) -> Map<String, Value> {
        let state = self.state.lock();
        match area {
            StorageArea::Sync => state.sync.clone(),
            StorageArea::Local => state.local.clone(),
        }
    }

    /// Key filters the host has been asked for, in call order.
    pub fn storage_queries(&self) -> Vec<(StorageArea, Vec<String>)> {
        self.state.lock().storage_queries.clone()
    }

    fn record(&self, api: HostApi) -> Result<(), HostError> {
        let mut state = self.state.lock();
        *state.calls.entry(api).or_insert(0) += 1;
        match state.failures.get(&api) {
            Some(message) => Err(HostError::new(message.clone())),
            None => Ok(()),
        }
    }

    fn notify(&self, change: CapabilityChange) {
        let listeners: Vec<CapabilityListener> = self.listeners.lock().values().cloned().collect();
        for listener in listeners {
            listener(change.clone());
        }
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CapabilityHost for MockHost {
    async fn granted(&self) -> Result<Vec<CapabilityName>, HostError> {
        self.record(HostApi::Granted)?;
        Ok(self.state.lock().granted.clone())
    }

    async fn contains(&self, name: &CapabilityName) -> Result<bool, HostError> {
        self.record(HostApi::Contains)?;
        Ok(self.state.lock().granted.contains(name))
    }

    async fn remove(&self, name: &CapabilityName) -> Result<bool, HostError> {
        self.record(HostApi::Remove)?;
        let removed = {
            let mut state = self.state.lock();
            if state.implied.contains(name) || !state.granted.contains(name) {
                false
            } else {
                state.granted.retain(|n| n != name);
                true
            }
        };
        if removed {
            self.notify(CapabilityChange::Removed(vec![name.clone()]));
        }
        Ok(removed)
    }

    fn subscribe(&self, listener: CapabilityListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        self.listeners.lock().insert(id, listener);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.lock().remove(&id);
    }
}

#[async_trait]
impl ManagementHost for MockHost {
    async fn list_apps(&self) -> Result<Vec<AppDescriptor>, HostError> {
        self.record(HostApi::ListApps)?;
        Ok(self.state.lock().apps.clone())
    }

    async fn launch_app(&self, id: &str) -> Result<(), HostError> {
        self.record(HostApi::LaunchApp)?;
        let mut state = self.state.lock();
        if !state.apps.iter().any(|app| app.id == id) {
            return Err(HostError::new(format!("Failed to find extension with id {}.", id)));
        }
        state.launched.push(id.to_string());
        Ok(())
    }

    async fn uninstall_app(&self, id: &str, options: UninstallOptions) -> Result<(), HostError> {
        self.record(HostApi::UninstallApp)?;
        let mut state = self.state.lock();
        let before = state.apps.len();
        state.apps.retain(|app| app.id != id);
        if state.apps.len() == before {
            return Err(HostError::new(format!("Failed to find extension with id {}.", id)));
        }
        state.uninstalls.push((id.to_string(), options));
        Ok(())
    }
}

#[async_trait]
impl BrowsingHost for MockHost {
    async fn create_tab(&self, request: CreateTab) -> Result<TabHandle, HostError> {
        self.record(HostApi::CreateTab)?;
        let mut state = self.state.lock();
        let active = request.active.unwrap_or(true);
        if active {
            for existing in state.tabs.iter_mut() {
                existing.active = false;
            }
        }
        let id = state.next_id;
        state.next_id += 1;
        let created = tab(id, 1, &request.url, active, request.pinned.unwrap_or(false));
        state.tabs.push(created.clone());
        state.tab_requests.push(request);
        Ok(created)
    }

    async fn update_active_tab(&self, request: UpdateTab) -> Result<TabHandle, HostError> {
        self.record(HostApi::UpdateTab)?;
        let mut state = self.state.lock();
        match state.tabs.iter_mut().find(|t| t.active) {
            Some(active) => {
                active.url = Some(request.url);
                Ok(active.clone())
            }
            None => Err(HostError::new("No current window")),
        }
    }

    async fn create_window(&self, request: CreateWindow) -> Result<WindowHandle, HostError> {
        self.record(HostApi::CreateWindow)?;
        let mut state = self.state.lock();
        let window_id = state.next_id;
        let tab_id = state.next_id + 1;
        state.next_id += 2;
        let window = WindowHandle {
            id: window_id,
            focused: request.focused,
            tabs: vec![tab(tab_id, window_id, &request.url, true, false)],
            extra: Map::new(),
        };
        state.windows.push(window.clone());
        Ok(window)
    }
}

#[async_trait]
impl TopSitesHost for MockHost {
    async fn top_sites(&self) -> Result<Vec<TopSite>, HostError> {
        self.record(HostApi::TopSites)?;
        Ok(self.state.lock().top_sites.clone())
    }
}

#[async_trait]
impl BookmarksHost for MockHost {
    async fn search(&self, query: &str) -> Result<Vec<BookmarkNode>, HostError> {
        self.record(HostApi::BookmarkSearch)?;
        let needle = query.to_lowercase();
        Ok(self
            .state
            .lock()
            .bookmarks
            .iter()
            .filter(|node| {
                node.title.to_lowercase().contains(&needle)
                    || node
                        .url
                        .as_deref()
                        .is_some_and(|url| url.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn children(&self, folder_id: &str) -> Result<Vec<BookmarkNode>, HostError> {
        self.record(HostApi::BookmarkChildren)?;
        Ok(self
            .state
            .lock()
            .bookmarks
            .iter()
            .filter(|node| node.parent_id.as_deref() == Some(folder_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StorageHost for MockHost {
    async fn set(&self, area: StorageArea, items: Map<String, Value>) -> Result<(), HostError> {
        self.record(HostApi::StorageSet)?;
        let mut state = self.state.lock();
        let target = match area {
            StorageArea::Sync => &mut state.sync,
            StorageArea::Local => &mut state.local,
        };
        target.extend(items);
        Ok(())
    }

    async fn get(&self, area: StorageArea, keys: &[String]) -> Result<Map<String, Value>, HostError> {
        self.record(HostApi::StorageGet)?;
        let mut state = self.state.lock();
        state.storage_queries.push((area, keys.to_vec()));
        let source = match area {
            StorageArea::Sync => &state.sync,
            StorageArea::Local => &state.local,
        };
        if keys.is_empty() {
            return Ok(source.clone());
        }
        Ok(keys
            .iter()
            .filter_map(|key| source.get(key).map(|value| (key.clone(), value.clone())))
            .collect())
    }
}

pub fn app(id: &str, name: &str) -> AppDescriptor {
    AppDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        enabled: true,
        extra: Map::new(),
    }
}

pub fn folder(id: &str, title: &str, parent_id: Option<&str>) -> BookmarkNode {
    BookmarkNode {
        id: id.to_string(),
        title: title.to_string(),
        url: None,
        parent_id: parent_id.map(str::to_string),
        extra: Map::new(),
    }
}

pub fn link(id: &str, title: &str, url: &str, parent_id: &str) -> BookmarkNode {
    BookmarkNode {
        id: id.to_string(),
        title: title.to_string(),
        url: Some(url.to_string()),
        parent_id: Some(parent_id.to_string()),
        extra: Map::new(),
    }
}

pub fn site(url: &str, title: &str) -> TopSite {
    TopSite {
        url: url.to_string(),
        title: title.to_string(),
    }
}

fn tab(id: i64, window_id: i64, url: &str, active: bool, pinned: bool) -> TabHandle {
    TabHandle {
        id,
        window_id,
        url: Some(url.to_string()),
        active,
        pinned,
        extra: Map::new(),
    }
}
