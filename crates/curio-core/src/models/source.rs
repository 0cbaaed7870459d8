use crate::key::ExternalKey;
use crate::storage_types::SourceKind;

/// A named, typed backend able to turn a file identifier into a URL.
///
/// Sources sharing a `display_name` are replicas of the same logical pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSource {
    pub id: i64,
    pub external_key: ExternalKey,
    pub kind: SourceKind,
    pub display_name: String,
    pub endpoint_template: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStorageSource {
    pub kind: SourceKind,
    pub display_name: String,
    pub endpoint_template: Option<String>,
}
