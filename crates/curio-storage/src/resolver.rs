//! URL resolution for external objects.

use std::sync::Arc;

use async_trait::async_trait;
use curio_core::models::StorageSource;
use curio_core::validation::is_absolute_http_url;
use curio_core::SourceKind;

use crate::template::{gateway_base, join_gateway, substitute};
use crate::traits::{GatewayProvider, StorageResult};

/// Resolve by template substitution alone. Always returns a non-empty string
/// for a non-empty identifier.
///
/// Without a template, IPFS sources yield an `ipfs://` URI and direct sources
/// yield the identifier itself. An identifier that is already a full URL
/// embedding the template's base is returned as-is rather than prefixed twice.
pub fn resolve_sync(source: &StorageSource, file_id: &str) -> String {
    match source.endpoint_template.as_deref() {
        Some(template) if !template.is_empty() => {
            if overlaps_base(template, file_id) {
                tracing::warn!(
                    source_key = %source.external_key,
                    file_id,
                    "File id already contains the endpoint base, using it directly"
                );
                return file_id.to_string();
            }
            substitute(template, file_id)
        }
        _ => match source.kind {
            SourceKind::Ipfs => format!("ipfs://{}", file_id.trim_start_matches('/')),
            SourceKind::DirectUrl => file_id.to_string(),
        },
    }
}

fn overlaps_base(template: &str, file_id: &str) -> bool {
    if !is_absolute_http_url(file_id) {
        return false;
    }
    gateway_base(template).is_some_and(|base| file_id.contains(base.as_str()))
}

/// Resolver preferring gateway load-balancing for IPFS sources.
#[derive(Clone)]
pub struct UrlResolver {
    provider: Arc<dyn GatewayProvider>,
}

impl UrlResolver {
    pub fn new(provider: Arc<dyn GatewayProvider>) -> Self {
        Self { provider }
    }

    /// First candidate gateway joined with `file_id`, or `None` when there is
    /// no candidate. Non-IPFS sources go straight to [`resolve_sync`].
    pub async fn resolve_with_load_balancing(
        &self,
        source: &StorageSource,
        file_id: &str,
    ) -> Option<String> {
        if source.kind != SourceKind::Ipfs {
            return Some(resolve_sync(source, file_id));
        }

        match self.provider.gateways(source).await {
            Ok(candidates) => candidates
                .iter()
                .map(|g| g.trim())
                .find(|g| !g.is_empty())
                .map(|gateway| join_gateway(gateway, file_id)),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    source_key = %source.external_key,
                    "Gateway lookup failed, falling back to template resolution"
                );
                None
            }
        }
    }

    /// Load-balanced resolution with the sync fallback applied.
    pub async fn resolve(&self, source: &StorageSource, file_id: &str) -> String {
        match self.resolve_with_load_balancing(source, file_id).await {
            Some(url) => url,
            None => resolve_sync(source, file_id),
        }
    }
}

/// Fixed gateway list, independent of the source asked about.
#[derive(Debug, Clone, Default)]
pub struct StaticGateways(pub Vec<String>);

#[async_trait]
impl GatewayProvider for StaticGateways {
    async fn gateways(&self, _source: &StorageSource) -> StorageResult<Vec<String>> {
        Ok(self.0.clone())
    }
}
