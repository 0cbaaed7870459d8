use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::key::ExternalKey;

/// Asset row as it existed before external objects: a bare inline filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyAsset {
    pub id: i64,
    pub external_key: ExternalKey,
    pub file_name: Option<String>,
}

/// Media source row with its inline URL, absolute or relative to the asset base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyMedia {
    pub id: i64,
    pub external_key: ExternalKey,
    pub url: Option<String>,
    pub mime_type: Option<String>,
}

/// Which legacy table a key or link belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Asset,
    Media,
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ContentKind::Asset => write!(f, "asset"),
            ContentKind::Media => write!(f, "media"),
        }
    }
}
