use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumString};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A saved table/filter configuration for a dashboard route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedView {
    pub id: String,
    pub name: String,
    pub route: String,
    /// Snapshot of the route's active filters as string key/value pairs.
    pub filters: HashMap<String, String>,
    pub columns: Option<Vec<String>>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

/// Payload for saving a view. The store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewSavedView {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub route: String,
    #[serde(default)]
    pub filters: HashMap<String, String>,
    pub columns: Option<Vec<String>>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

/// UI preferences. Hydrated once at startup, mutated via store actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub dark_mode: bool,
    pub sidebar_collapsed: bool,
    pub default_printer: String,
    pub default_carrier: String,
    pub label_size: String,
    pub auto_print: bool,
    pub saved_views: Vec<SavedView>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            sidebar_collapsed: false,
            default_printer: "Default Printer".to_string(),
            default_carrier: "Royal Mail".to_string(),
            label_size: "A6".to_string(),
            auto_print: false,
            saved_views: Vec::new(),
        }
    }
}
