//! Validation modules

pub mod gateway;

pub use gateway::{is_absolute_http_url, validate_gateway_url, validate_ipfs_gateway_url};
