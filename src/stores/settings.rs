use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::errors::StoreError;
use crate::models::{NewSavedView, SavedView, Settings};

/// Storage key for the dark mode preference.
pub const DARK_MODE_KEY: &str = "darkMode";
/// Storage key for the sidebar preference.
pub const SIDEBAR_COLLAPSED_KEY: &str = "sidebarCollapsed";

/// String key/value preference persistence, the browser-storage boundary.
///
/// Boolean preferences are stored as the strings `"true"` / `"false"`.
#[async_trait]
pub trait PreferenceBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory preference backend used when no host storage is wired in.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPreferences {
    store: Arc<std::sync::RwLock<HashMap<String, String>>>,
}

impl InMemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceBackend for InMemoryPreferences {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let store = self.store.read().unwrap();
        Ok(store.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut store = self.store.write().unwrap();
        store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut store = self.store.write().unwrap();
        store.remove(key);
        Ok(())
    }
}

/// Stand-in for the theme class on the document root: a single shared
/// boolean the styling layer reads.
#[derive(Clone, Debug, Default)]
pub struct ThemeToggle(Arc<AtomicBool>);

impl ThemeToggle {
    pub fn is_dark(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn set(&self, dark: bool) {
        self.0.store(dark, Ordering::Relaxed);
    }
}

/// Store for UI preferences.
///
/// Lifecycle: hydrate once at startup via [`SettingsStore::initialize`],
/// mutate via actions, no explicit teardown. Dark mode is the one place a
/// store reaches outside its own state: it mirrors the value into the
/// preference backend and flips the shared theme toggle.
#[derive(Clone)]
pub struct SettingsStore {
    state: Arc<RwLock<Settings>>,
    prefs: Arc<dyn PreferenceBackend>,
    theme: ThemeToggle,
}

impl SettingsStore {
    pub fn new(prefs: Arc<dyn PreferenceBackend>) -> Self {
        Self {
            state: Arc::new(RwLock::new(Settings::default())),
            prefs,
            theme: ThemeToggle::default(),
        }
    }

    /// Hydrates persisted preferences. Missing or malformed values leave
    /// the defaults in place.
    pub async fn initialize(&self) {
        if let Some(dark_mode) = self.read_bool(DARK_MODE_KEY).await {
            let mut state = self.state.write().await;
            state.dark_mode = dark_mode;
            drop(state);
            self.theme.set(dark_mode);
        }
        if let Some(collapsed) = self.read_bool(SIDEBAR_COLLAPSED_KEY).await {
            self.state.write().await.sidebar_collapsed = collapsed;
        }
        info!("settings hydrated");
    }

    async fn read_bool(&self, key: &str) -> Option<bool> {
        match self.prefs.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<bool>(&raw) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(%key, %raw, "ignoring malformed persisted preference");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(%key, %err, "preference read failed");
                None
            }
        }
    }

    async fn persist_bool(&self, key: &str, value: bool) {
        let raw = if value { "true" } else { "false" };
        if let Err(err) = self.prefs.set(key, raw).await {
            warn!(%key, %err, "preference write failed");
        }
    }

    pub async fn set_dark_mode(&self, dark_mode: bool) {
        {
            let mut state = self.state.write().await;
            state.dark_mode = dark_mode;
        }
        self.theme.set(dark_mode);
        self.persist_bool(DARK_MODE_KEY, dark_mode).await;
    }

    /// Flips dark mode and returns the new value.
    pub async fn toggle_dark_mode(&self) -> bool {
        let dark_mode = !self.state.read().await.dark_mode;
        self.set_dark_mode(dark_mode).await;
        dark_mode
    }

    pub async fn set_sidebar_collapsed(&self, collapsed: bool) {
        {
            let mut state = self.state.write().await;
            state.sidebar_collapsed = collapsed;
        }
        self.persist_bool(SIDEBAR_COLLAPSED_KEY, collapsed).await;
    }

    /// Updates the printing preferences supplied; `None` fields are left
    /// as they are.
    pub async fn update_printer_settings(
        &self,
        default_printer: Option<String>,
        auto_print: Option<bool>,
    ) {
        let mut state = self.state.write().await;
        if let Some(printer) = default_printer {
            state.default_printer = printer;
        }
        if let Some(auto_print) = auto_print {
            state.auto_print = auto_print;
        }
    }

    pub async fn set_default_carrier(&self, carrier: impl Into<String>) {
        self.state.write().await.default_carrier = carrier.into();
    }

    pub async fn set_label_size(&self, size: impl Into<String>) {
        self.state.write().await.label_size = size.into();
    }

    /// Saves a view snapshot under a generated id.
    pub async fn save_view(&self, new: NewSavedView) -> Result<SavedView, StoreError> {
        new.validate()?;
        let view = SavedView {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            route: new.route,
            filters: new.filters,
            columns: new.columns,
            sort_by: new.sort_by,
            sort_order: new.sort_order,
        };
        self.state.write().await.saved_views.push(view.clone());
        Ok(view)
    }

    /// Replaces a saved view wholesale, matched by id. Unknown ids are a
    /// no-op.
    pub async fn update_view(&self, view: SavedView) -> Option<SavedView> {
        let mut state = self.state.write().await;
        let slot = state.saved_views.iter_mut().find(|v| v.id == view.id)?;
        *slot = view.clone();
        Some(view)
    }

    /// Removes a saved view by id. Removing an absent id is a no-op.
    pub async fn delete_view(&self, id: &str) {
        let mut state = self.state.write().await;
        state.saved_views.retain(|v| v.id != id);
    }

    pub async fn settings(&self) -> Settings {
        self.state.read().await.clone()
    }

    pub async fn is_dark_mode(&self) -> bool {
        self.state.read().await.dark_mode
    }

    pub async fn saved_views(&self) -> Vec<SavedView> {
        self.state.read().await.saved_views.clone()
    }

    /// Handle for the styling layer.
    pub fn theme(&self) -> ThemeToggle {
        self.theme.clone()
    }
}
