use crate::state::AppState;
use axum::{extract::State, Json};
use curio_core::models::GatewayListResponse;
use std::sync::Arc;

/// The system default IPFS gateways clients merge their own list with.
#[utoipa::path(
    get,
    path = "/api/v0/config/gateways",
    tag = "config",
    responses(
        (status = 200, description = "System gateway list", body = GatewayListResponse)
    )
)]
pub async fn list_system_gateways(State(state): State<Arc<AppState>>) -> Json<GatewayListResponse> {
    Json(GatewayListResponse {
        gateways: state.resolution.system_gateways.clone(),
    })
}
