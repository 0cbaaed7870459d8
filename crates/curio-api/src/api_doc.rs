//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use curio_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Curio Archive API",
        version = "0.1.0",
        description = "File redirects through external object storage, the published IPFS gateway list and migration administration. JSON endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::file_redirect::redirect_file,
        handlers::gateways::list_system_gateways,
        handlers::migration::migration_status,
        handlers::migration::run_migration,
        handlers::migration::repair_file_ids,
        handlers::migration::validate_migration,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::file_redirect::FileNotFoundResponse,
        models::GatewayListResponse,
        models::MigrationStatus,
        models::MigrationState,
        models::MigrationResult,
        models::RepairReport,
        models::RepairRequest,
        models::RunMigrationRequest,
        models::ValidationReport,
        curio_core::ExternalKey,
    )),
    tags(
        (name = "files", description = "Public file redirects"),
        (name = "config", description = "Client configuration"),
        (name = "migration", description = "Legacy reference migration and repair")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
