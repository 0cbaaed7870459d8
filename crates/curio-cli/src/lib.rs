//! Shared pieces of the `curio` command-line client.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use curio_core::models::StorageSource;
use curio_core::{ExternalKey, SourceKind};
use curio_storage::{
    create_gateway_store, GatewayPreferenceManager, GatewayStoreKind, UrlResolver,
};
use serde::Serialize;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// CURIO_GATEWAYS_FILE, else `$HOME/.config/curio/gateways.json`.
pub fn gateways_file_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CURIO_GATEWAYS_FILE") {
        return Ok(PathBuf::from(path));
    }
    let home = std::env::var("HOME").context("Set CURIO_GATEWAYS_FILE or HOME")?;
    Ok(PathBuf::from(home).join(".config/curio/gateways.json"))
}

pub async fn open_gateway_manager(path: PathBuf) -> Result<Arc<GatewayPreferenceManager>> {
    let store = create_gateway_store(GatewayStoreKind::File(path))
        .await
        .context("Failed to open gateway preferences")?;
    Ok(Arc::new(GatewayPreferenceManager::with_builtin_defaults(store)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayOrigin {
    User,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayRow {
    pub position: usize,
    pub url: String,
    pub origin: GatewayOrigin,
}

/// The effective list in resolution order, each entry tagged with where it came from.
pub async fn gateway_rows(manager: &GatewayPreferenceManager) -> Result<Vec<GatewayRow>> {
    let user = manager.user_gateways().await?;
    let rows = manager
        .effective_list()
        .await
        .into_iter()
        .enumerate()
        .map(|(index, url)| {
            let key = url.trim_end_matches('/');
            let origin = if user.iter().any(|u| u.trim_end_matches('/') == key) {
                GatewayOrigin::User
            } else {
                GatewayOrigin::System
            };
            GatewayRow {
                position: index + 1,
                url,
                origin,
            }
        })
        .collect();
    Ok(rows)
}

/// URL an IPFS identifier resolves to with the current preferences.
pub async fn resolve_ipfs(manager: Arc<GatewayPreferenceManager>, file_id: &str) -> String {
    let source = StorageSource {
        id: 0,
        external_key: ExternalKey::new(),
        kind: SourceKind::Ipfs,
        display_name: "Local Preferences".to_string(),
        endpoint_template: None,
    };
    UrlResolver::new(manager).resolve(&source, file_id).await
}
