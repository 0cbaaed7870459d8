//! Opaque public identifiers.
//!
//! Rows are addressed internally by `i64` ids. Everything that crosses a process
//! boundary (HTTP paths, JSON payloads, CLI arguments) uses an [`ExternalKey`]
//! instead, and a `KeyResolver` maps it back to the internal id.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct ExternalKey(Uuid);

impl ExternalKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ExternalKey {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ExternalKey {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for ExternalKey {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl Display for ExternalKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}
