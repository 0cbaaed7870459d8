//! Legacy reference migration
//!
//! Moves inline filenames and URLs on legacy rows into external objects.
//! There are no multi-statement transactions: every row is an independent
//! existence-check, insert, link sequence, so a truncated run is resumed by
//! simply running again.

mod classify;
mod engine;
mod repair;
mod status;

pub use classify::{classify_media_url, strip_base_prefix, MediaPlacement};
pub use engine::MigrationEngine;
pub use repair::RepairPass;
pub use status::MigrationStatusService;
