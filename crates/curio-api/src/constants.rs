//! API constants

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

pub const API_VERSION: &str = "v0";

/// Versioned prefix for every JSON endpoint.
pub const API_PREFIX: &str = "/api/v0";

/// Where the generated OpenAPI document is served.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Admin requests carry small JSON bodies only.
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;
