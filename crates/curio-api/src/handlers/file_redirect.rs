//! Public file route: redirects a content key to its current download URL.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use curio_core::{AppError, ExternalKey};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Body of the 404 answer for a key with nothing to redirect to.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileNotFoundResponse {
    pub error: String,
    pub message: String,
    pub key: String,
}

#[utoipa::path(
    get,
    path = "/file/{key}",
    tag = "files",
    params(
        ("key" = String, Path, description = "External key of an asset or media source")
    ),
    responses(
        (status = 307, description = "Redirect to the resolved download URL"),
        (status = 400, description = "Malformed key", body = crate::error::ErrorResponse),
        (status = 404, description = "Nothing resolvable for this key", body = FileNotFoundResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "file_redirect"))]
pub async fn redirect_file(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Response, HttpAppError> {
    let parsed: ExternalKey = key
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("'{}' is not a valid file key", key)))?;

    match state.resolution.locator.locate(parsed).await? {
        Some(location) => {
            tracing::debug!(url = location.url(), kind = %location.kind(), "Redirecting file request");
            Ok(Redirect::temporary(location.url()).into_response())
        }
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(FileNotFoundResponse {
                error: "not_found".to_string(),
                message: "No file could be resolved for this key".to_string(),
                key: parsed.to_string(),
            }),
        )
            .into_response()),
    }
}
