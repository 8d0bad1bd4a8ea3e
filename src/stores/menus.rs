use std::sync::Arc;

use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MenuState {
    active_main: Option<String>,
    active_sub: Option<String>,
}

/// Store for the currently highlighted navigation entries.
#[derive(Clone, Default)]
pub struct MenuStore {
    state: Arc<RwLock<MenuState>>,
}

impl MenuStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_main(&self, name: Option<String>) {
        self.state.write().await.active_main = name;
    }

    pub async fn set_sub(&self, name: Option<String>) {
        self.state.write().await.active_sub = name;
    }

    pub async fn active_main(&self) -> Option<String> {
        self.state.read().await.active_main.clone()
    }

    pub async fn active_sub(&self) -> Option<String> {
        self.state.read().await.active_sub.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn main_and_sub_selections_are_independent() {
        let store = MenuStore::new();
        store.set_main(Some("inventory".to_string())).await;
        store.set_sub(Some("in-stock".to_string())).await;
        assert_eq!(store.active_main().await.as_deref(), Some("inventory"));

        store.set_sub(None).await;
        assert_eq!(store.active_main().await.as_deref(), Some("inventory"));
        assert_eq!(store.active_sub().await, None);
    }
}
