use dashmap::DashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Registry of pending deferred mutations keyed by record id.
///
/// Timer-driven state transitions (toast expiry, simulated label printing)
/// are registered here so they can be cancelled when the record they target
/// is removed or rescheduled. Scheduling a task for an id aborts any task
/// already pending for that id. Tasks must still re-check record existence
/// when they fire; cancellation closes the common window, not every one.
#[derive(Clone, Default)]
pub(crate) struct DeferredTasks {
    tasks: Arc<DashMap<String, (u64, JoinHandle<()>)>>,
    next_generation: Arc<AtomicU64>,
}

impl DeferredTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` after `delay`, replacing (and aborting) any task already
    /// registered for `id`.
    pub fn schedule<F>(&self, id: &str, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let key = id.to_string();
        let tasks = Arc::clone(&self.tasks);
        let handle = tokio::spawn({
            let key = key.clone();
            async move {
                tokio::time::sleep(delay).await;
                task.await;
                // Deregister only if this task is still the registered one;
                // a reschedule may have replaced the entry mid-flight.
                tasks.remove_if(&key, |_, entry| entry.0 == generation);
            }
        });
        if let Some((_, previous)) = self.tasks.insert(key, (generation, handle)) {
            previous.abort();
        }
    }

    pub fn cancel(&self, id: &str) {
        if let Some((_, (_, handle))) = self.tasks.remove(id) {
            handle.abort();
        }
    }

    pub fn cancel_all(&self) {
        self.tasks.retain(|_, entry| {
            entry.1.abort();
            false
        });
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}
