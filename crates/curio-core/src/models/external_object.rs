use crate::key::ExternalKey;

/// Indirection record: a file identifier owned by exactly one storage source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalObject {
    pub id: i64,
    pub external_key: ExternalKey,
    pub source_id: i64,
    pub mime_type: String,
    pub file_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExternalObject {
    pub source_id: i64,
    pub mime_type: String,
    pub file_id: String,
}
