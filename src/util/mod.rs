//! Utility functions for common operations.
//!
//! - **Base URL validation**: scheme and transport checks for the feed service root
//!
//! # Examples
//!
//! ```
//! use feedmedia::util::validate_base_url;
//!
//! let url = validate_base_url("https://feed.theplatform.com/f/").unwrap();
//! assert_eq!(url.host_str(), Some("feed.theplatform.com"));
//! ```

mod base_url;

pub use base_url::{validate_base_url, with_trailing_slash, BaseUrlError};
