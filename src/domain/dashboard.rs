// Dashboard domain model - tabs, items and the whole-state document
use super::error::{SubmitError, ValidationError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const DEFAULT_TAB_NAME: &str = "Default";
pub const SERVICES_LIST: &str = "services";
pub const ADDRESSES_LIST: &str = "addresses";

/// A link shortcut. Its position in the containing list is its only identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl Item {
    /// Build an item from user input, trimming both fields and normalizing the url.
    pub fn new(name: &str, url: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        let url = url.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if url.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }

        Ok(Self {
            name: name.to_string(),
            url: normalize_url(url),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<Item>,
}

impl Tab {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        Ok(Self {
            name: name.to_string(),
            items: Vec::new(),
        })
    }
}

/// How activating an item in a list behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Clicking navigates the browser to the item url.
    Navigable,
    /// Clicking only reveals the url text.
    DisplayOnly,
}

/// Address of one list inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKey {
    /// Items of the tab at this position. Tab names are not unique.
    Tab(usize),
    Services,
    Addresses,
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKey::Tab(index) => write!(f, "tab {}", index),
            ListKey::Services => f.write_str(SERVICES_LIST),
            ListKey::Addresses => f.write_str(ADDRESSES_LIST),
        }
    }
}

/// A whole-state document the store can own and the backends can persist.
pub trait Document: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Bring a freshly loaded document back within its structural invariants.
    fn repair(&mut self);

    fn list(&self, key: ListKey) -> Option<&Vec<Item>>;

    fn list_mut(&mut self, key: ListKey) -> Option<&mut Vec<Item>>;

    fn list_kind(&self, _key: ListKey) -> ListKind {
        ListKind::Navigable
    }
}

/// Tabbed dashboard: `0 <= active_tab_index < tabs.len()`, or `0` when there are no tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredDashboard")]
pub struct DashboardState {
    pub tabs: Vec<Tab>,
    #[serde(rename = "activeTabIndex")]
    pub active_tab_index: usize,
}

/// Wire form accepted on load. Either index key may be present; `activeTabIndex` wins.
#[derive(Deserialize)]
struct StoredDashboard {
    #[serde(default, deserialize_with = "null_as_empty")]
    tabs: Vec<Tab>,
    #[serde(rename = "activeTabIndex", default)]
    active_tab_index: Option<serde_json::Value>,
    #[serde(rename = "activeTab", default)]
    active_tab: Option<serde_json::Value>,
}

impl From<StoredDashboard> for DashboardState {
    fn from(stored: StoredDashboard) -> Self {
        let active_tab_index = stored
            .active_tab_index
            .or(stored.active_tab)
            .as_ref()
            .map(lenient_index)
            .unwrap_or(0);

        Self {
            tabs: stored.tabs,
            active_tab_index,
        }
    }
}

impl DashboardState {
    /// A dashboard with no tabs at all.
    pub fn empty() -> Self {
        Self {
            tabs: Vec::new(),
            active_tab_index: 0,
        }
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.active_tab_index)
    }

    pub fn clamp_active(&mut self) {
        self.active_tab_index = match self.tabs.len() {
            0 => 0,
            len => self.active_tab_index.min(len - 1),
        };
    }

    /// Parse a document submitted for whole-document replacement.
    ///
    /// The body must carry a `tabs` array and an integer active index; anything
    /// else inside is repaired rather than refused.
    pub fn from_submitted(body: &[u8]) -> Result<Self, SubmitError> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        let object = value
            .as_object()
            .ok_or_else(|| SubmitError::InvalidStructure("expected an object".to_string()))?;

        if !object.get("tabs").is_some_and(|tabs| tabs.is_array()) {
            return Err(SubmitError::InvalidStructure(
                "tabs must be an array".to_string(),
            ));
        }
        let index = object
            .get("activeTabIndex")
            .or_else(|| object.get("activeTab"));
        if !index.is_some_and(|index| index.is_i64() || index.is_u64()) {
            return Err(SubmitError::InvalidStructure(
                "activeTabIndex must be an integer".to_string(),
            ));
        }

        let mut state: Self = serde_json::from_value(value)
            .map_err(|e| SubmitError::InvalidStructure(e.to_string()))?;
        state.repair();
        Ok(state)
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            tabs: vec![Tab {
                name: DEFAULT_TAB_NAME.to_string(),
                items: Vec::new(),
            }],
            active_tab_index: 0,
        }
    }
}

impl Document for DashboardState {
    fn repair(&mut self) {
        for tab in &mut self.tabs {
            retain_named(&mut tab.items);
        }
        self.clamp_active();
    }

    fn list(&self, key: ListKey) -> Option<&Vec<Item>> {
        match key {
            ListKey::Tab(index) => self.tabs.get(index).map(|tab| &tab.items),
            _ => None,
        }
    }

    fn list_mut(&mut self, key: ListKey) -> Option<&mut Vec<Item>> {
        match key {
            ListKey::Tab(index) => self.tabs.get_mut(index).map(|tab| &mut tab.items),
            _ => None,
        }
    }
}

/// Non-tabbed dashboard with two independent lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatLists {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub services: Vec<Item>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub addresses: Vec<Item>,
}

impl Document for FlatLists {
    fn repair(&mut self) {
        retain_named(&mut self.services);
        retain_named(&mut self.addresses);
    }

    fn list(&self, key: ListKey) -> Option<&Vec<Item>> {
        match key {
            ListKey::Services => Some(&self.services),
            ListKey::Addresses => Some(&self.addresses),
            ListKey::Tab(_) => None,
        }
    }

    fn list_mut(&mut self, key: ListKey) -> Option<&mut Vec<Item>> {
        match key {
            ListKey::Services => Some(&mut self.services),
            ListKey::Addresses => Some(&mut self.addresses),
            ListKey::Tab(_) => None,
        }
    }

    fn list_kind(&self, key: ListKey) -> ListKind {
        if key == ListKey::Addresses {
            ListKind::DisplayOnly
        } else {
            ListKind::Navigable
        }
    }
}

/// Prefix `http://` unless the url is already absolute or scheme-relative.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

fn retain_named(items: &mut Vec<Item>) {
    items.retain(|item| !item.name.trim().is_empty());
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// Negative, fractional or non-numeric indices fall back to the first tab.
fn lenient_index(value: &serde_json::Value) -> usize {
    value
        .as_u64()
        .and_then(|index| usize::try_from(index).ok())
        .unwrap_or(0)
}
