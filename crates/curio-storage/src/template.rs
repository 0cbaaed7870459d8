//! Endpoint template substitution and gateway joining.
//!
//! Templates carry `{FILE_ID}` (or the older `{id}`) where the identifier goes.
//! Substitution is verbatim: no escaping is applied to the identifier.

use curio_core::constants::{FILE_ID_PLACEHOLDER, LEGACY_FILE_ID_PLACEHOLDER};

/// Substitute `file_id` into `template`. A template without a marker comes back unchanged.
pub fn substitute(template: &str, file_id: &str) -> String {
    if template.contains(FILE_ID_PLACEHOLDER) {
        template.replace(FILE_ID_PLACEHOLDER, file_id)
    } else if template.contains(LEGACY_FILE_ID_PLACEHOLDER) {
        template.replace(LEGACY_FILE_ID_PLACEHOLDER, file_id)
    } else {
        template.to_string()
    }
}

/// Join a gateway base URL and a file identifier with exactly one `/` between them.
pub fn join_gateway(base: &str, file_id: &str) -> String {
    let file_id = file_id.trim_start_matches('/');
    if base.ends_with('/') {
        format!("{}{}", base, file_id)
    } else {
        format!("{}/{}", base, file_id)
    }
}

/// The part of a template in front of its marker, usable as a gateway base.
///
/// Returns `None` when the template has no marker or nothing precedes it.
pub fn gateway_base(template: &str) -> Option<String> {
    let index = template
        .find(FILE_ID_PLACEHOLDER)
        .or_else(|| template.find(LEGACY_FILE_ID_PLACEHOLDER))?;
    let base = &template[..index];
    if base.is_empty() {
        None
    } else {
        Some(base.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_markers() {
        assert_eq!(
            substitute("https://assets.example.com/{FILE_ID}", "a.png"),
            "https://assets.example.com/a.png"
        );
        assert_eq!(substitute("https://old.example.com/{id}?dl=1", "x"), "https://old.example.com/x?dl=1");
        assert_eq!(substitute("{FILE_ID}", "https://cdn.other.com/x.png"), "https://cdn.other.com/x.png");
    }

    #[test]
    fn test_substitute_without_marker_is_unchanged() {
        assert_eq!(substitute("https://static.example.com/", "a.png"), "https://static.example.com/");
    }

    #[test]
    fn test_join_gateway_slashes() {
        assert_eq!(join_gateway("https://ipfs.io/ipfs/", "bafy"), "https://ipfs.io/ipfs/bafy");
        assert_eq!(join_gateway("https://ipfs.io/ipfs", "bafy"), "https://ipfs.io/ipfs/bafy");
        assert_eq!(join_gateway("https://ipfs.io/ipfs/", "/bafy"), "https://ipfs.io/ipfs/bafy");
    }

    #[test]
    fn test_gateway_base() {
        assert_eq!(
            gateway_base("https://gw.example.com/ipfs/{FILE_ID}").as_deref(),
            Some("https://gw.example.com/ipfs/")
        );
        assert_eq!(gateway_base("{FILE_ID}"), None);
        assert_eq!(gateway_base("https://gw.example.com/"), None);
    }
}
