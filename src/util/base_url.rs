use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors that can occur while validating a feed service base URL.
#[derive(Error, Debug)]
pub enum BaseUrlError {
    /// The URL string could not be parsed.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// Plain HTTP pointed at a non-local host.
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    Insecure,
    /// Base URLs carry no query string or fragment; request parameters are added per call.
    #[error("Base URL must not contain a query string or fragment")]
    HasQueryOrFragment,
}

/// Validates and normalises the root URL of a feed service.
///
/// Rejects:
/// - Non-HTTP(S) schemes (e.g., `file://`, `ftp://`)
/// - Plain `http` for anything other than a loopback host
/// - URLs with a query string or fragment
///
/// The returned URL always ends in `/`, so request paths can be appended
/// directly without dropping the last segment of the base.
///
/// # Examples
///
/// ```
/// use feedmedia::util::validate_base_url;
///
/// let url = validate_base_url("https://feed.theplatform.com/f").unwrap();
/// assert_eq!(url.as_str(), "https://feed.theplatform.com/f/");
///
/// assert!(validate_base_url("http://feed.example.com/f/").is_err());
/// assert!(validate_base_url("http://127.0.0.1:8080/f/").is_ok());
/// ```
pub fn validate_base_url(url_str: &str) -> Result<Url, BaseUrlError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "https" => {}
        "http" => {
            if !is_loopback_host(&url) {
                tracing::error!(base_url = %url, "Rejecting non-HTTPS base URL (HTTPS required except for localhost)");
                return Err(BaseUrlError::Insecure);
            }
            tracing::warn!(base_url = %url, "Using non-HTTPS base URL (localhost only)");
        }
        scheme => return Err(BaseUrlError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(BaseUrlError::HasQueryOrFragment);
    }

    Ok(with_trailing_slash(url))
}

/// Ensures the URL path ends with `/`.
pub fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn is_loopback_host(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    if host == "localhost" {
        return true;
    }

    // Strip brackets from IPv6 addresses for parsing
    let host_for_parse = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    host_for_parse
        .parse::<IpAddr>()
        .is_ok_and(|ip| ip.is_loopback())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_accepted() {
        let url = validate_base_url("https://feed.theplatform.com/f/").unwrap();
        assert_eq!(url.as_str(), "https://feed.theplatform.com/f/");
    }

    #[test]
    fn test_trailing_slash_added() {
        let url = validate_base_url("https://feed.theplatform.com/f").unwrap();
        assert_eq!(url.path(), "/f/");

        let url = validate_base_url("https://feed.theplatform.com").unwrap();
        assert_eq!(url.path(), "/");
    }

    #[test]
    fn test_invalid_schemes() {
        assert!(matches!(
            validate_base_url("ftp://example.com"),
            Err(BaseUrlError::UnsupportedScheme(_))
        ));
        assert!(validate_base_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn test_unparseable_rejected() {
        assert!(matches!(
            validate_base_url("not a url"),
            Err(BaseUrlError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_plain_http_rejected() {
        assert!(matches!(
            validate_base_url("http://feed.example.com/f/"),
            Err(BaseUrlError::Insecure)
        ));
    }

    #[test]
    fn test_plain_http_loopback_allowed() {
        assert!(validate_base_url("http://localhost:8080/f/").is_ok());
        assert!(validate_base_url("http://127.0.0.1:8080/f/").is_ok());
        assert!(validate_base_url("http://[::1]:8080/f/").is_ok());
    }

    #[test]
    fn test_query_and_fragment_rejected() {
        assert!(matches!(
            validate_base_url("https://feed.example.com/f/?form=json"),
            Err(BaseUrlError::HasQueryOrFragment)
        ));
        assert!(matches!(
            validate_base_url("https://feed.example.com/f/#top"),
            Err(BaseUrlError::HasQueryOrFragment)
        ));
    }
}
