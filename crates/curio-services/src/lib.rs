//! Curio Services Layer
//!
//! Orchestration on top of the repositories: the storage source registry,
//! legacy reference migration and repair, migration status, the server-side
//! gateway pool and file location for the redirect endpoint. HTTP handling
//! stays in curio-api.

pub mod file_locator;
pub mod gateway_pool;
pub mod migration;
pub mod registry;

pub use curio_storage::{resolve_sync, GatewayProvider, UrlResolver};
pub use file_locator::{FileLocation, FileLocator};
pub use gateway_pool::ServerGatewayPool;
pub use migration::{
    classify_media_url, strip_base_prefix, MediaPlacement, MigrationEngine,
    MigrationStatusService, RepairPass,
};
pub use registry::StorageSourceRegistry;
