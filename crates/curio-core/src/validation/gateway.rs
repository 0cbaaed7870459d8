//! Gateway URL validation shared by the server configuration and the client
//! preference manager.

use url::Url;

use crate::constants::MAX_GATEWAY_URL_LENGTH;

/// Validate a gateway base URL and return its trimmed form.
///
/// Errors are plain messages meant to be shown next to the input that produced them.
pub fn validate_gateway_url(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Gateway URL cannot be empty".to_string());
    }
    if trimmed.len() > MAX_GATEWAY_URL_LENGTH {
        return Err(format!(
            "Gateway URL exceeds maximum length of {} characters",
            MAX_GATEWAY_URL_LENGTH
        ));
    }

    let parsed = Url::parse(trimmed).map_err(|e| format!("Invalid gateway URL: {}", e))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(format!(
                "Gateway URL must use http or https, got '{}'",
                other
            ))
        }
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err("Gateway URL must include a host".to_string());
    }

    Ok(trimmed.to_string())
}

/// Validate a user-supplied IPFS gateway: a gateway URL whose path ends in `/ipfs/`.
///
/// The trailing slash may be omitted since joining adds it.
pub fn validate_ipfs_gateway_url(input: &str) -> Result<String, String> {
    let valid = validate_gateway_url(input)?;
    let parsed = Url::parse(&valid).map_err(|e| format!("Invalid gateway URL: {}", e))?;
    let path = parsed.path();
    if parsed.query().is_some() || !(path.ends_with("/ipfs/") || path.ends_with("/ipfs")) {
        return Err("Gateway URL must end with /ipfs/".to_string());
    }
    Ok(valid)
}

/// Whether `value` is a fully-qualified http(s) URL. Scheme match is case-insensitive.
pub fn is_absolute_http_url(value: &str) -> bool {
    let lower = value.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https_gateway() {
        assert_eq!(
            validate_gateway_url("  https://dweb.link/ipfs/ ").unwrap(),
            "https://dweb.link/ipfs/"
        );
    }

    #[test]
    fn test_rejects_other_schemes() {
        let err = validate_gateway_url("ipfs://bafy").unwrap_err();
        assert!(err.contains("http or https"));
        assert!(validate_gateway_url("ftp://mirror.example.com/").is_err());
    }

    #[test]
    fn test_rejects_malformed_and_empty() {
        assert!(validate_gateway_url("not a url").is_err());
        assert!(validate_gateway_url("   ").is_err());
        let long = format!("https://example.com/{}", "a".repeat(MAX_GATEWAY_URL_LENGTH));
        assert!(validate_gateway_url(&long).is_err());
    }

    #[test]
    fn test_ipfs_gateway_path_rule() {
        assert!(validate_ipfs_gateway_url("https://dweb.link/ipfs/").is_ok());
        assert!(validate_ipfs_gateway_url("https://my.gateway.example/ipfs").is_ok());
        let err = validate_ipfs_gateway_url("https://static.example.com/").unwrap_err();
        assert!(err.contains("/ipfs/"));
        assert!(validate_ipfs_gateway_url("https://gw.example.com/ipfs/?x=1").is_err());
        assert!(validate_ipfs_gateway_url("https://gw.example.com/ipfsy/").is_err());
    }

    #[test]
    fn test_absolute_url_detection() {
        assert!(is_absolute_http_url("HTTPS://cdn.other.com/x.png"));
        assert!(is_absolute_http_url("http://a"));
        assert!(!is_absolute_http_url("songs/1.mp3"));
        assert!(!is_absolute_http_url("ipfs://bafy"));
    }
}
