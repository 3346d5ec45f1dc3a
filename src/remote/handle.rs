// SPDX-License-Identifier: GPL-3.0-only
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{PluginError, PluginResult};
use crate::remote::traits::StoreProxy;

/// Holds the single logical connection to the store service
#[derive(Default)]
pub struct ServiceHandle {
    proxy: RwLock<Option<Arc<dyn StoreProxy>>>,
}

impl ServiceHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new proxy, returning the one it supersedes
    pub async fn replace(&self, proxy: Arc<dyn StoreProxy>) -> Option<Arc<dyn StoreProxy>> {
        self.proxy.write().await.replace(proxy)
    }

    /// Current proxy; calls issued before a successful setup fail with `NotConnected`
    pub async fn get(&self) -> PluginResult<Arc<dyn StoreProxy>> {
        self.proxy
            .read()
            .await
            .as_ref()
            .map(Arc::clone)
            .ok_or(PluginError::NotConnected)
    }

    pub async fn is_connected(&self) -> bool {
        self.proxy.read().await.is_some()
    }

    pub async fn release(&self) -> Option<Arc<dyn StoreProxy>> {
        self.proxy.write().await.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MockStore;

    #[tokio::test]
    async fn test_get_before_setup() {
        let handle = ServiceHandle::new();
        assert!(!handle.is_connected().await);
        assert!(matches!(handle.get().await, Err(PluginError::NotConnected)));
    }

    #[tokio::test]
    async fn test_replace_supersedes_previous_proxy() {
        let handle = ServiceHandle::new();
        let first: Arc<dyn StoreProxy> = Arc::new(MockStore::new());
        let second: Arc<dyn StoreProxy> = Arc::new(MockStore::new());

        assert!(handle.replace(Arc::clone(&first)).await.is_none());
        let previous = handle.replace(Arc::clone(&second)).await.unwrap();
        assert!(Arc::ptr_eq(&previous, &first));

        let current = handle.get().await.unwrap();
        assert!(Arc::ptr_eq(&current, &second));
    }

    #[tokio::test]
    async fn test_release() {
        let handle = ServiceHandle::new();
        handle.replace(Arc::new(MockStore::new())).await;
        assert!(handle.release().await.is_some());
        assert!(!handle.is_connected().await);
    }
}
