//! Curio Core Library
//!
//! Domain models, error types, configuration and validation shared by every
//! Curio component that deals with external object storage.

pub mod config;
pub mod constants;
pub mod error;
pub mod key;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{ArchiveConfig, BaseConfig, Config};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use key::ExternalKey;
pub use storage_types::SourceKind;
