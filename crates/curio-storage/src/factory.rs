use std::path::PathBuf;
use std::sync::Arc;

use crate::local::{FileGatewayStore, MemoryGatewayStore};
use crate::traits::{GatewayStore, StorageResult};

/// Where user gateway preferences are kept
#[derive(Debug, Clone)]
pub enum GatewayStoreKind {
    File(PathBuf),
    Memory,
}

/// Create a gateway store for the requested backend
pub async fn create_gateway_store(kind: GatewayStoreKind) -> StorageResult<Arc<dyn GatewayStore>> {
    match kind {
        GatewayStoreKind::File(path) => {
            let store = FileGatewayStore::new(path).await?;
            tracing::debug!(path = %store.path().display(), "Using file gateway store");
            Ok(Arc::new(store))
        }
        GatewayStoreKind::Memory => Ok(Arc::new(MemoryGatewayStore::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gateways.json");

        let first = create_gateway_store(GatewayStoreKind::File(path.clone()))
            .await
            .unwrap();
        first
            .set(&["https://dweb.link/ipfs/".to_string()])
            .await
            .unwrap();

        let second = create_gateway_store(GatewayStoreKind::File(path)).await.unwrap();
        assert_eq!(second.get().await.unwrap().len(), 1);
    }
}
