//! Well-known names and defaults for external object storage.

/// Placeholder substituted with the file identifier when resolving a source template.
pub const FILE_ID_PLACEHOLDER: &str = "{FILE_ID}";

/// Older templates used a lowercase `{id}` marker; still honoured by the resolver.
pub const LEGACY_FILE_ID_PLACEHOLDER: &str = "{id}";

/// Source holding relative identifiers derived from the asset base URL.
pub const DEFAULT_SOURCE_NAME: &str = "Default Asset Storage";

/// Source whose file identifiers are already complete URLs on foreign hosts.
pub const DIRECT_URL_SOURCE_NAME: &str = "Direct URL Storage";

/// Mime type recorded when a legacy row carries none.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Public IPFS gateways used when neither the server nor the user configured any.
pub const DEFAULT_IPFS_GATEWAYS: [&str; 3] = [
    "https://ipfs.io/ipfs/",
    "https://gateway.pinata.cloud/ipfs/",
    "https://cf-ipfs.com/ipfs/",
];

/// Upper bound on custom gateways a user may keep locally.
pub const MAX_USER_GATEWAYS: usize = 10;

pub const MAX_GATEWAY_URL_LENGTH: usize = 2048;

pub const DEFAULT_MIGRATION_BATCH_SIZE: u32 = 50;
pub const MAX_MIGRATION_BATCH_SIZE: u32 = 1000;
