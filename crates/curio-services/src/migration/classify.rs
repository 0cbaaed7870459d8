use curio_core::validation::is_absolute_http_url;

/// Where a legacy media URL lands after migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaPlacement {
    /// Relative identifier under the Default Asset Storage source.
    Default(String),
    /// Complete foreign URL under the Direct URL Storage source.
    Direct(String),
}

/// Strip `base` from the front of `value`, returning the remainder.
///
/// A base ending in `/` must match as-is; a base without one must be followed
/// by `/` in `value`. `None` when it does not match or nothing remains.
pub fn strip_base_prefix(value: &str, base: &str) -> Option<String> {
    if base.is_empty() {
        return None;
    }
    let rest = if base.ends_with('/') {
        value.strip_prefix(base)?
    } else {
        value.strip_prefix(base)?.strip_prefix('/')?
    };
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

/// Decide how a non-empty legacy media URL is stored.
pub fn classify_media_url(url: &str, base_asset_url: &str) -> MediaPlacement {
    if !is_absolute_http_url(url) {
        return MediaPlacement::Default(url.to_string());
    }
    match strip_base_prefix(url, base_asset_url) {
        Some(relative) => MediaPlacement::Default(relative),
        None => MediaPlacement::Direct(url.to_string()),
    }
}
