//! Curio API Library
//!
//! HTTP handlers and application setup for the archive server.

mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
mod telemetry;

pub mod error;
pub mod state;

pub use api_doc::{get_openapi_spec, ApiDoc};
pub use error::{ErrorResponse, HttpAppError};
pub use handlers::file_redirect::FileNotFoundResponse;
