//! Application state shared by every handler.
//!
//! Split into migration and resolution halves so handlers only touch what
//! they need.

use curio_services::{FileLocator, MigrationEngine, MigrationStatusService, RepairPass};

/// Migration admin services plus the defaults applied to request bodies.
#[derive(Clone)]
pub struct MigrationState {
    pub engine: MigrationEngine,
    pub repair: RepairPass,
    pub status: MigrationStatusService,
    pub asset_base_url: Option<String>,
    pub batch_size: u32,
}

impl MigrationState {
    /// Request value first, configured value second.
    pub fn base_asset_url(&self, requested: Option<String>) -> Option<String> {
        requested
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| self.asset_base_url.clone())
    }
}

/// File redirect resolution and the gateway list published to clients.
#[derive(Clone)]
pub struct ResolutionState {
    pub locator: FileLocator,
    pub system_gateways: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub migration: MigrationState,
    pub resolution: ResolutionState,
}
