//! Curio Database Layer
//!
//! Repository traits for external object storage plus their Postgres and
//! in-memory implementations.

pub mod db;

pub use db::{
    ExternalObjectRepo, ExternalObjectRepository, KeyResolver, LegacyContentRepo,
    LegacyContentRepository, LinkRepo, LinkRepository, MemoryStore, PgKeyResolver, Repositories,
    StorageSourceRepo, StorageSourceRepository,
};
