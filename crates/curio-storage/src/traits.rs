//! Storage abstraction traits
//!
//! Seams between URL resolution and wherever gateway lists come from: a local
//! preference file, the server's configuration, or replica sources in the database.

use async_trait::async_trait;
use curio_core::models::StorageSource;
use curio_core::validation::validate_ipfs_gateway_url;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Gateway store read failed: {0}")]
    ReadFailed(String),

    #[error("Gateway store write failed: {0}")]
    WriteFailed(String),

    #[error("Gateway lookup failed: {0}")]
    LookupFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence for a user's custom gateway list.
#[async_trait]
pub trait GatewayStore: Send + Sync {
    async fn get(&self) -> StorageResult<Vec<String>>;

    async fn set(&self, gateways: &[String]) -> StorageResult<()>;

    async fn clear(&self) -> StorageResult<()>;

    /// Check a candidate gateway and return its normalized form.
    fn validate(&self, url: &str) -> Result<String, String> {
        validate_ipfs_gateway_url(url)
    }
}

/// Ordered gateway base URLs to try for an IPFS source, most preferred first.
#[async_trait]
pub trait GatewayProvider: Send + Sync {
    async fn gateways(&self, source: &StorageSource) -> StorageResult<Vec<String>>;
}

/// Where the client learns the server's default gateway list.
#[async_trait]
pub trait SystemGatewaySource: Send + Sync {
    async fn fetch_system_gateways(&self) -> StorageResult<Vec<String>>;
}
