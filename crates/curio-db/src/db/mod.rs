//! Database repositories for the external object storage layer
//!
//! Each entity gets a trait in `traits` so services can run against Postgres
//! or the in-memory store. `Repositories` bundles one implementation of each.

pub mod external_object;
pub mod keys;
pub mod legacy;
pub mod link;
pub mod memory;
pub mod source;
pub mod traits;

use std::sync::Arc;

use sqlx::PgPool;

pub use external_object::ExternalObjectRepository;
pub use keys::PgKeyResolver;
pub use legacy::LegacyContentRepository;
pub use link::LinkRepository;
pub use memory::MemoryStore;
pub use source::StorageSourceRepository;
pub use traits::{ExternalObjectRepo, KeyResolver, LegacyContentRepo, LinkRepo, StorageSourceRepo};

/// One implementation of every repository trait, shared behind `Arc`s.
#[derive(Clone)]
pub struct Repositories {
    pub sources: Arc<dyn StorageSourceRepo>,
    pub objects: Arc<dyn ExternalObjectRepo>,
    pub links: Arc<dyn LinkRepo>,
    pub legacy: Arc<dyn LegacyContentRepo>,
    pub keys: Arc<dyn KeyResolver>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            sources: Arc::new(StorageSourceRepository::new(pool.clone())),
            objects: Arc::new(ExternalObjectRepository::new(pool.clone())),
            links: Arc::new(LinkRepository::new(pool.clone())),
            legacy: Arc::new(LegacyContentRepository::new(pool.clone())),
            keys: Arc::new(PgKeyResolver::new(pool)),
        }
    }

    pub fn in_memory(store: MemoryStore) -> Self {
        let shared = Arc::new(store);
        Self {
            sources: shared.clone(),
            objects: shared.clone(),
            links: shared.clone(),
            legacy: shared.clone(),
            keys: shared,
        }
    }
}
