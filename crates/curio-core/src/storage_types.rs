use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use utoipa::ToSchema;

/// Kind of backend a storage source resolves against.
///
/// Stored and serialized with the historical names `raw_url` and `ipfs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "storage_source_kind"))]
pub enum SourceKind {
    #[serde(rename = "raw_url", alias = "direct_url")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "raw_url"))]
    DirectUrl,
    #[serde(rename = "ipfs")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "ipfs"))]
    Ipfs,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::DirectUrl => "raw_url",
            SourceKind::Ipfs => "ipfs",
        }
    }
}

impl FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw_url" | "direct_url" => Ok(SourceKind::DirectUrl),
            "ipfs" => Ok(SourceKind::Ipfs),
            _ => Err(anyhow::anyhow!("Invalid storage source kind: {}", s)),
        }
    }
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
