//! Server-side gateway candidates for IPFS sources
//!
//! Candidates come from the source's own template, then from replica sources
//! sharing its display name, then from the configured system gateways.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use curio_core::models::StorageSource;
use curio_core::SourceKind;
use curio_db::StorageSourceRepo;
use curio_storage::{gateway_base, GatewayProvider, StorageError, StorageResult};

#[derive(Clone)]
pub struct ServerGatewayPool {
    sources: Arc<dyn StorageSourceRepo>,
    system: Vec<String>,
}

impl ServerGatewayPool {
    pub fn new(sources: Arc<dyn StorageSourceRepo>, system: Vec<String>) -> Self {
        Self { sources, system }
    }

    pub fn system_gateways(&self) -> &[String] {
        &self.system
    }
}

fn push_unique(out: &mut Vec<String>, seen: &mut HashSet<String>, gateway: &str) {
    let gateway = gateway.trim();
    if gateway.is_empty() {
        return;
    }
    if seen.insert(gateway.trim_end_matches('/').to_string()) {
        out.push(gateway.to_string());
    }
}

#[async_trait]
impl GatewayProvider for ServerGatewayPool {
    async fn gateways(&self, source: &StorageSource) -> StorageResult<Vec<String>> {
        let mut candidates = Vec::new();
        let mut seen = HashSet::new();

        if let Some(base) = source.endpoint_template.as_deref().and_then(gateway_base) {
            push_unique(&mut candidates, &mut seen, &base);
        }

        let replicas = self
            .sources
            .list_by_name_and_kind(&source.display_name, SourceKind::Ipfs)
            .await
            .map_err(|e| StorageError::LookupFailed(e.to_string()))?;
        for replica in replicas.iter().filter(|r| r.id != source.id) {
            if let Some(base) = replica.endpoint_template.as_deref().and_then(gateway_base) {
                push_unique(&mut candidates, &mut seen, &base);
            }
        }

        for gateway in &self.system {
            push_unique(&mut candidates, &mut seen, gateway);
        }

        tracing::trace!(
            source_key = %source.external_key,
            candidates = candidates.len(),
            "Collected gateway candidates"
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curio_core::models::NewStorageSource;
    use curio_db::MemoryStore;

    fn ipfs(store: &MemoryStore, name: &str, template: Option<&str>) -> StorageSource {
        store.add_source(NewStorageSource {
            kind: SourceKind::Ipfs,
            display_name: name.to_string(),
            endpoint_template: template.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_candidate_order_and_dedup() {
        let store = MemoryStore::new();
        let primary = ipfs(&store, "Pinned", Some("https://gw-a.example/ipfs/{FILE_ID}"));
        ipfs(&store, "Pinned", Some("https://gw-b.example/ipfs/{FILE_ID}"));
        ipfs(&store, "Pinned", Some("https://gw-a.example/ipfs/{FILE_ID}"));
        ipfs(&store, "Other", Some("https://gw-c.example/ipfs/{FILE_ID}"));

        let pool = ServerGatewayPool::new(
            Arc::new(store),
            vec![
                "https://ipfs.io/ipfs/".to_string(),
                "https://gw-b.example/ipfs".to_string(),
            ],
        );
        let candidates = pool.gateways(&primary).await.unwrap();
        assert_eq!(
            candidates,
            vec![
                "https://gw-a.example/ipfs/".to_string(),
                "https://gw-b.example/ipfs/".to_string(),
                "https://ipfs.io/ipfs/".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_template_uses_system_gateways() {
        let store = MemoryStore::new();
        let source = ipfs(&store, "Bare", None);
        let pool = ServerGatewayPool::new(Arc::new(store), vec!["https://dweb.link/ipfs/".to_string()]);
        assert_eq!(
            pool.gateways(&source).await.unwrap(),
            vec!["https://dweb.link/ipfs/".to_string()]
        );

        let empty = ServerGatewayPool::new(Arc::new(MemoryStore::new()), Vec::new());
        assert!(empty.gateways(&source).await.unwrap().is_empty());
    }
}
