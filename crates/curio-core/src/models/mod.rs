//! Data models for external object storage
//!
//! Each sub-module covers one side of the indirection: where bytes live
//! (sources), what points at them (external objects), the legacy rows being
//! migrated and the reports produced by migration runs.

mod external_object;
mod legacy;
mod migration;
mod source;

pub use external_object::*;
pub use legacy::*;
pub use migration::*;
pub use source::*;
