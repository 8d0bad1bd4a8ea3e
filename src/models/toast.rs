use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Error,
}

/// An action button attached to a toast; the view layer interprets the
/// action string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastAction {
    pub label: String,
    pub action: String,
}

/// An ephemeral notification. `duration_ms <= 0` means the toast persists
/// until removed explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub id: String,
    pub kind: ToastKind,
    pub title: String,
    pub message: Option<String>,
    pub duration_ms: i64,
    pub actions: Vec<ToastAction>,
}

/// Payload for showing a toast. A missing duration takes the configured
/// default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewToast {
    pub kind: ToastKind,
    pub title: String,
    pub message: Option<String>,
    pub duration_ms: Option<i64>,
    #[serde(default)]
    pub actions: Vec<ToastAction>,
}

impl NewToast {
    pub fn new(kind: ToastKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: None,
            duration_ms: None,
            actions: Vec::new(),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn duration_ms(mut self, duration_ms: i64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}
