use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::time::Duration;
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::deferred::DeferredTasks;
use crate::models::{NewToast, Toast, ToastKind};

/// Process-wide queue of ephemeral messages.
///
/// Every toast with a positive duration schedules its own removal through
/// a cancellable per-id timer; explicit removal cancels the timer, and an
/// expiry firing after a removal is a harmless no-op because removal is
/// keyed by id.
#[derive(Clone)]
pub struct ToastStore {
    state: Arc<RwLock<Vec<Toast>>>,
    expiry: DeferredTasks,
    default_duration_ms: i64,
}

impl ToastStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(Vec::new())),
            expiry: DeferredTasks::new(),
            default_duration_ms: config.toast_duration_ms,
        }
    }

    /// Enqueues a toast, filling in an id and the default duration when
    /// none is given. Durations <= 0 persist until removed.
    pub async fn show(&self, new: NewToast) -> Toast {
        let toast = Toast {
            id: Uuid::new_v4().to_string(),
            kind: new.kind,
            title: new.title,
            message: new.message,
            duration_ms: new.duration_ms.unwrap_or(self.default_duration_ms),
            actions: new.actions,
        };
        self.state.write().await.push(toast.clone());
        if toast.duration_ms > 0 {
            let store = self.clone();
            let id = toast.id.clone();
            self.expiry.schedule(
                &toast.id,
                Duration::from_millis(toast.duration_ms as u64),
                async move {
                    store.expire(&id).await;
                },
            );
        }
        toast
    }

    async fn expire(&self, id: &str) {
        self.state.write().await.retain(|toast| toast.id != id);
    }

    /// Removes a toast immediately and cancels its pending expiry.
    /// Removing an absent id is a no-op.
    pub async fn remove(&self, id: &str) {
        self.expiry.cancel(id);
        self.expire(id).await;
    }

    /// Empties the queue; all pending expiries are cancelled.
    pub async fn clear(&self) {
        self.expiry.cancel_all();
        self.state.write().await.clear();
    }

    pub async fn active(&self) -> Vec<Toast> {
        self.state.read().await.clone()
    }

    pub async fn success(&self, title: impl Into<String>, message: Option<String>) -> Toast {
        self.show_kind(ToastKind::Success, title, message).await
    }

    pub async fn error(&self, title: impl Into<String>, message: Option<String>) -> Toast {
        self.show_kind(ToastKind::Error, title, message).await
    }

    pub async fn warning(&self, title: impl Into<String>, message: Option<String>) -> Toast {
        self.show_kind(ToastKind::Warning, title, message).await
    }

    pub async fn info(&self, title: impl Into<String>, message: Option<String>) -> Toast {
        self.show_kind(ToastKind::Info, title, message).await
    }

    async fn show_kind(
        &self,
        kind: ToastKind,
        title: impl Into<String>,
        message: Option<String>,
    ) -> Toast {
        let mut new = NewToast::new(kind, title);
        new.message = message;
        self.show(new).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn store() -> ToastStore {
        ToastStore::new(&StoreConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn default_duration_applies_and_expires() {
        let store = store();
        let toast = store.success("Saved", None).await;
        assert_eq!(toast.duration_ms, 5_000);
        assert_eq!(store.active().await.len(), 1);

        sleep(Duration::from_millis(5_100)).await;
        assert!(store.active().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn early_removal_beats_the_expiry_timer() {
        let store = store();
        let toast = store.success("Saved", None).await;
        sleep(Duration::from_millis(2_000)).await;
        store.remove(&toast.id).await;
        assert!(store.active().await.is_empty());

        // The original expiry slot passes without effect.
        sleep(Duration::from_millis(4_000)).await;
        assert!(store.active().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn non_positive_duration_persists() {
        let store = store();
        let toast = store
            .show(NewToast::new(ToastKind::Warning, "Printer offline").duration_ms(0))
            .await;
        sleep(Duration::from_millis(60_000)).await;
        assert_eq!(store.active().await.len(), 1);
        store.remove(&toast.id).await;
        assert!(store.active().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_empties_the_queue_and_cancels_expiries() {
        let store = store();
        store.success("One", None).await;
        store.info("Two", None).await;
        store.clear().await;
        assert!(store.active().await.is_empty());

        // A toast shown after the clear is unaffected by stale timers.
        store.success("Three", None).await;
        sleep(Duration::from_millis(1_000)).await;
        assert_eq!(store.active().await.len(), 1);
    }

    #[tokio::test]
    async fn wrappers_fix_the_kind() {
        let store = store();
        store.error("Failed", Some("Label printer jammed".to_string())).await;
        let active = store.active().await;
        assert_eq!(active[0].kind, ToastKind::Error);
        assert_eq!(active[0].message.as_deref(), Some("Label printer jammed"));
    }
}
