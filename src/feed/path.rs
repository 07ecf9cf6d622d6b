use super::FeedRequestConfig;
use thiserror::Error;

/// Placeholder owner meaning "the owner of the FeedConfig".
const OWNER_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Numeric IDs and GUIDs select items in incompatible ways.
    #[error("Cannot provide IDs and GUIDs for the feed media client")]
    IdsAndGuids,
}

/// Builds the request path for a feed.
///
/// Segments are concatenated in a fixed order, each contributing its own
/// delimiters:
///
/// ```text
/// path        := account_pid feed_pid [feed_type] ["feed"] (ids | guid_segment) [seo_terms]
/// guid_segment := "guid/" (account_pid | "-") guids
/// ```
///
/// Lists are comma-joined. The GUID owner is the account PID, or `-` when it is
/// empty.
///
/// # Errors
///
/// [`PathError::IdsAndGuids`] when both `ids` and `guids` are non-empty.
///
/// # Examples
///
/// ```
/// use feedmedia::feed::{build_path, FeedRequestConfig};
///
/// let config = FeedRequestConfig::new("acct1", "feed1").with_guids(["g1", "g2"]);
/// assert_eq!(build_path(&config).unwrap(), "acct1feed1guid/acct1g1,g2");
/// ```
pub fn build_path(config: &FeedRequestConfig) -> Result<String, PathError> {
    if !config.ids.is_empty() && !config.guids.is_empty() {
        return Err(PathError::IdsAndGuids);
    }

    let mut path = String::new();
    path.push_str(&config.account_pid);
    path.push_str(&config.feed_pid);
    if let Some(feed_type) = &config.feed_type {
        path.push_str(feed_type);
    }
    if config.feed {
        path.push_str("feed");
    }
    path.push_str(&config.ids.join(","));
    if !config.guids.is_empty() {
        path.push_str("guid/");
        if config.account_pid.is_empty() {
            path.push_str(OWNER_PLACEHOLDER);
        } else {
            path.push_str(&config.account_pid);
        }
        path.push_str(&config.guids.join(","));
    }
    path.push_str(&config.seo_terms.join(","));

    Ok(path)
}
