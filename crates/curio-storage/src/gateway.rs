//! Client-side gateway preferences
//!
//! The server publishes a read-only list of default gateways. A user may add
//! their own, which are persisted through a [`GatewayStore`] and always tried
//! before the defaults.

use std::sync::Arc;

use async_trait::async_trait;
use curio_core::constants::{DEFAULT_IPFS_GATEWAYS, MAX_USER_GATEWAYS};
use curio_core::models::StorageSource;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::traits::{GatewayProvider, GatewayStore, StorageResult, SystemGatewaySource};

/// Outcome of a user edit. Rejections carry a message instead of an error value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayChange {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GatewayChange {
    fn applied() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Comparison key: gateways differing only by trailing slashes are the same gateway.
fn gateway_key(url: &str) -> &str {
    url.trim().trim_end_matches('/')
}

fn builtin_defaults() -> Vec<String> {
    DEFAULT_IPFS_GATEWAYS.iter().map(|g| g.to_string()).collect()
}

/// Merge lists in order, keeping the first occurrence of each gateway.
fn merge_unique<'a>(lists: impl IntoIterator<Item = &'a [String]>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for list in lists {
        for gateway in list {
            let key = gateway_key(gateway);
            if key.is_empty() {
                continue;
            }
            if !merged.iter().any(|existing| gateway_key(existing) == key) {
                merged.push(gateway.trim().to_string());
            }
        }
    }
    merged
}

pub struct GatewayPreferenceManager {
    store: Arc<dyn GatewayStore>,
    system_defaults: RwLock<Vec<String>>,
    // Serializes read-modify-write cycles against the store.
    edit_lock: Mutex<()>,
}

impl GatewayPreferenceManager {
    pub fn new(store: Arc<dyn GatewayStore>, system_defaults: Vec<String>) -> Self {
        Self {
            store,
            system_defaults: RwLock::new(system_defaults),
            edit_lock: Mutex::new(()),
        }
    }

    /// Manager seeded with the built-in public gateways until the server's list is fetched.
    pub fn with_builtin_defaults(store: Arc<dyn GatewayStore>) -> Self {
        Self::new(store, builtin_defaults())
    }

    pub async fn system_defaults(&self) -> Vec<String> {
        self.system_defaults.read().await.clone()
    }

    pub async fn set_system_defaults(&self, gateways: Vec<String>) {
        *self.system_defaults.write().await = gateways;
    }

    /// Fetch the server's defaults. An unreachable server or an empty answer
    /// leaves the built-in public gateways in place.
    pub async fn refresh_system_defaults(&self, source: &dyn SystemGatewaySource) -> Vec<String> {
        let gateways = match source.fetch_system_gateways().await {
            Ok(list) if !list.is_empty() => list,
            Ok(_) => {
                tracing::warn!("Server returned no gateways, using built-in defaults");
                builtin_defaults()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch system gateways, using built-in defaults");
                builtin_defaults()
            }
        };
        self.set_system_defaults(gateways.clone()).await;
        gateways
    }

    pub async fn user_gateways(&self) -> StorageResult<Vec<String>> {
        self.store.get().await
    }

    pub async fn add_gateway(&self, url: &str) -> GatewayChange {
        let candidate = match self.store.validate(url) {
            Ok(valid) => valid,
            Err(message) => return GatewayChange::rejected(message),
        };

        let _guard = self.edit_lock.lock().await;
        let mut user = match self.store.get().await {
            Ok(list) => list,
            Err(e) => return GatewayChange::rejected(format!("Could not read saved gateways: {}", e)),
        };

        let key = gateway_key(&candidate);
        if user.iter().any(|g| gateway_key(g) == key) {
            return GatewayChange::rejected("Gateway is already in your list");
        }
        if self
            .system_defaults
            .read()
            .await
            .iter()
            .any(|g| gateway_key(g) == key)
        {
            return GatewayChange::rejected("Gateway is already provided by the server");
        }
        if user.len() >= MAX_USER_GATEWAYS {
            return GatewayChange::rejected(format!(
                "You can keep at most {} custom gateways",
                MAX_USER_GATEWAYS
            ));
        }

        user.push(candidate);
        match self.store.set(&user).await {
            Ok(()) => {
                tracing::debug!(count = user.len(), "Custom gateway added");
                GatewayChange::applied()
            }
            Err(e) => GatewayChange::rejected(format!("Could not save gateways: {}", e)),
        }
    }

    /// Remove a custom gateway. Returns `false` when it was not in the user's
    /// list, including when it is one of the system defaults.
    pub async fn remove_gateway(&self, url: &str) -> StorageResult<bool> {
        let _guard = self.edit_lock.lock().await;
        let mut user = self.store.get().await?;
        let key = gateway_key(url);
        let before = user.len();
        user.retain(|g| gateway_key(g) != key);
        if user.len() == before {
            return Ok(false);
        }
        self.store.set(&user).await?;
        Ok(true)
    }

    pub async fn clear_user_gateways(&self) -> StorageResult<()> {
        let _guard = self.edit_lock.lock().await;
        self.store.clear().await
    }

    /// User gateways first, then system defaults, without duplicates.
    ///
    /// An unreadable store degrades to the system defaults alone.
    pub async fn effective_list(&self) -> Vec<String> {
        let user = match self.store.get().await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read custom gateways");
                Vec::new()
            }
        };
        let system = self.system_defaults.read().await;
        merge_unique([user.as_slice(), system.as_slice()])
    }
}

#[async_trait]
impl GatewayProvider for GatewayPreferenceManager {
    async fn gateways(&self, _source: &StorageSource) -> StorageResult<Vec<String>> {
        Ok(self.effective_list().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::MemoryGatewayStore;
    use crate::traits::StorageError;

    fn manager() -> (Arc<MemoryGatewayStore>, GatewayPreferenceManager) {
        let store = Arc::new(MemoryGatewayStore::new());
        let manager = GatewayPreferenceManager::new(
            store.clone(),
            vec![
                "https://ipfs.io/ipfs/".to_string(),
                "https://gateway.pinata.cloud/ipfs/".to_string(),
            ],
        );
        (store, manager)
    }

    struct Unreachable;

    #[async_trait]
    impl SystemGatewaySource for Unreachable {
        async fn fetch_system_gateways(&self) -> StorageResult<Vec<String>> {
            Err(StorageError::LookupFailed("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_add_and_effective_order() {
        let (_, manager) = manager();
        let change = manager.add_gateway(" https://dweb.link/ipfs/ ").await;
        assert!(change.success, "{:?}", change.error);

        assert_eq!(
            manager.effective_list().await,
            vec![
                "https://dweb.link/ipfs/".to_string(),
                "https://ipfs.io/ipfs/".to_string(),
                "https://gateway.pinata.cloud/ipfs/".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_rejects_system_duplicate_and_bad_scheme() {
        let (store, manager) = manager();

        let dup = manager.add_gateway("https://ipfs.io/ipfs").await;
        assert!(!dup.success);
        assert!(dup.error.is_some());

        let bad = manager.add_gateway("javascript:alert(1)").await;
        assert!(!bad.success);

        let no_ipfs_path = manager.add_gateway("https://static.example.com/").await;
        assert!(!no_ipfs_path.success);
        assert!(no_ipfs_path.error.unwrap_or_default().contains("/ipfs/"));

        assert!(store.get().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_user_duplicate_and_caps_count() {
        let (store, manager) = manager();
        assert!(manager.add_gateway("https://gw0.example.com/ipfs/").await.success);
        assert!(!manager.add_gateway("https://gw0.example.com/ipfs").await.success);

        for i in 1..MAX_USER_GATEWAYS {
            let url = format!("https://gw{}.example.com/ipfs/", i);
            assert!(manager.add_gateway(&url).await.success);
        }
        let over = manager.add_gateway("https://one-too-many.example.com/ipfs/").await;
        assert!(!over.success);
        assert_eq!(store.get().await.unwrap().len(), MAX_USER_GATEWAYS);
    }

    #[tokio::test]
    async fn test_remove_only_touches_user_list() {
        let (_, manager) = manager();
        manager.add_gateway("https://dweb.link/ipfs/").await;

        assert!(!manager.remove_gateway("https://ipfs.io/ipfs/").await.unwrap());
        assert!(manager.remove_gateway("https://dweb.link/ipfs/").await.unwrap());
        assert!(!manager.remove_gateway("https://dweb.link/ipfs/").await.unwrap());
        assert_eq!(manager.system_defaults().await.len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_falls_back_to_builtin() {
        let store = Arc::new(MemoryGatewayStore::new());
        let manager = GatewayPreferenceManager::new(store, Vec::new());
        let list = manager.refresh_system_defaults(&Unreachable).await;
        assert_eq!(list.len(), DEFAULT_IPFS_GATEWAYS.len());
        assert_eq!(manager.system_defaults().await, list);
    }

    #[tokio::test]
    async fn test_clear_and_provider() {
        let (_, manager) = manager();
        manager.add_gateway("https://dweb.link/ipfs/").await;
        manager.clear_user_gateways().await.unwrap();
        assert!(manager.user_gateways().await.unwrap().is_empty());

        let source = StorageSource {
            id: 1,
            external_key: curio_core::ExternalKey::new(),
            kind: curio_core::SourceKind::Ipfs,
            display_name: "Pinned".to_string(),
            endpoint_template: None,
        };
        let gateways = manager.gateways(&source).await.unwrap();
        assert_eq!(gateways[0], "https://ipfs.io/ipfs/");
    }

    #[test]
    fn test_merge_unique_keeps_first() {
        let a = vec!["https://a/".to_string(), "https://b".to_string()];
        let b = vec!["https://b/".to_string(), "https://c/".to_string()];
        assert_eq!(
            merge_unique([a.as_slice(), b.as_slice()]),
            vec!["https://a/", "https://b", "https://c/"]
        );
    }
}
