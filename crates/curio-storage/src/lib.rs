//! Curio Storage Library
//!
//! Turns a storage source plus a file identifier into a downloadable URL.
//!
//! # Resolution modes
//!
//! - **Sync**: substitute the identifier into the source's endpoint template.
//!   Never fails, though the result may be wrong for a malformed template.
//! - **Load-balanced**: for IPFS sources, ask a [`GatewayProvider`] for an
//!   ordered candidate list and use the first gateway. Yields `None` when no
//!   candidate exists, and callers fall back to sync mode.
//!
//! The client-side [`GatewayPreferenceManager`] is one such provider. It merges
//! the server's default gateways with a user's locally persisted list.

pub mod factory;
pub mod gateway;
pub mod local;
pub mod resolver;
pub(crate) mod template;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_gateway_store, GatewayStoreKind};
pub use gateway::{GatewayChange, GatewayPreferenceManager};
pub use local::{FileGatewayStore, MemoryGatewayStore};
pub use resolver::{resolve_sync, StaticGateways, UrlResolver};
pub use template::{gateway_base, join_gateway};
pub use traits::{
    GatewayProvider, GatewayStore, StorageError, StorageResult, SystemGatewaySource,
};
