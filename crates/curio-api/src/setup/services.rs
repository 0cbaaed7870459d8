//! Service wiring

use crate::state::{AppState, MigrationState, ResolutionState};
use curio_core::Config;
use curio_db::Repositories;
use curio_services::{
    FileLocator, MigrationEngine, MigrationStatusService, RepairPass, ServerGatewayPool,
    UrlResolver,
};
use std::sync::Arc;

/// Build every service over one set of repositories.
pub fn build_state(config: &Config, repos: Repositories) -> Arc<AppState> {
    let system_gateways = config.ipfs_gateways().to_vec();
    let pool = ServerGatewayPool::new(repos.sources.clone(), system_gateways.clone());
    let resolver = UrlResolver::new(Arc::new(pool));
    let asset_base_url = config.asset_base_url().map(str::to_string);

    tracing::info!(
        gateways = system_gateways.len(),
        asset_base_url = asset_base_url.as_deref().unwrap_or("<unset>"),
        batch_size = config.migration_batch_size(),
        "Services initialized"
    );

    Arc::new(AppState {
        migration: MigrationState {
            engine: MigrationEngine::new(repos.clone()),
            repair: RepairPass::new(repos.clone()),
            status: MigrationStatusService::new(repos.clone()),
            asset_base_url: asset_base_url.clone(),
            batch_size: config.migration_batch_size(),
        },
        resolution: ResolutionState {
            locator: FileLocator::new(repos, resolver, asset_base_url),
            system_gateways,
        },
    })
}
