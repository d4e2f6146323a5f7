use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;

/// Capability names the host platform ships with.
pub mod well_known {
    pub const MANAGEMENT: &str = "management";
    pub const TABS: &str = "tabs";
    pub const TOP_SITES: &str = "topSites";
    pub const BOOKMARKS: &str = "bookmarks";
}

/// Opaque identifier of one optional host capability.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityName(String);

impl CapabilityName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CapabilityName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for CapabilityName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for CapabilityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CapabilityName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Every declared capability mapped to whether the host currently grants it.
///
/// The key set is always exactly the declared set, kept in declaration order:
/// names the host reports but nobody declared are dropped, declared names the
/// host omits are `false`. Serializes as a plain JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityGrantMap(Vec<(CapabilityName, bool)>);

impl CapabilityGrantMap {
    pub fn from_report<'a, D, G>(declared: D, granted: G) -> Self
    where
        D: IntoIterator<Item = &'a CapabilityName>,
        G: IntoIterator<Item = &'a CapabilityName>,
    {
        let mut map = Self::default();
        for name in declared {
            map.insert(name.clone(), false);
        }

        for name in granted {
            if let Some(slot) = map.slot_mut(name.as_str()) {
                *slot = true;
            }
        }

        map
    }

    /// Set `name`, appending it when absent.
    pub fn insert(&mut self, name: CapabilityName, granted: bool) {
        match self.slot_mut(name.as_str()) {
            Some(slot) => *slot = granted,
            None => self.0.push((name, granted)),
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut bool> {
        self.0
            .iter_mut()
            .find(|(declared, _)| declared.as_str() == name)
            .map(|(_, granted)| granted)
    }

    /// `None` when `name` was never declared.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.0
            .iter()
            .find(|(declared, _)| declared.as_str() == name)
            .map(|(_, granted)| *granted)
    }

    pub fn is_granted(&self, name: &str) -> bool {
        self.get(name).unwrap_or(false)
    }

    pub fn granted(&self) -> impl Iterator<Item = &CapabilityName> {
        self.0.iter().filter(|(_, granted)| *granted).map(|(name, _)| name)
    }

    pub fn names(&self) -> impl Iterator<Item = &CapabilityName> {
        self.0.iter().map(|(name, _)| name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CapabilityName, bool)> {
        self.0.iter().map(|(name, granted)| (name, *granted))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CapabilityGrantMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, granted) in &self.0 {
            map.serialize_entry(name, granted)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CapabilityGrantMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GrantMapVisitor;

        impl<'de> Visitor<'de> for GrantMapVisitor {
            type Value = CapabilityGrantMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of capability names to booleans")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = CapabilityGrantMap::default();
                while let Some((name, granted)) = access.next_entry::<CapabilityName, bool>()? {
                    map.insert(name, granted);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(GrantMapVisitor)
    }
}

/// Installed application as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabHandle {
    pub id: i64,
    #[serde(default)]
    pub window_id: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowHandle {
    pub id: i64,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub tabs: Vec<TabHandle>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A bookmark or bookmark folder. Folders carry no `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BookmarkNode {
    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSite {
    pub url: String,
    pub title: String,
}

/// One of the two disjoint persistent areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageArea {
    Sync,
    Local,
}

impl fmt::Display for StorageArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageArea::Sync => f.write_str("sync"),
            StorageArea::Local => f.write_str("local"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTab {
    pub url: String,
    pub active: Option<bool>,
    pub pinned: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTab {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWindow {
    pub url: String,
    pub focused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UninstallOptions {
    pub show_confirm_dialog: bool,
}
