//! Media feed requests.
//!
//! - `request` - the immutable [`FeedRequestConfig`] describing a feed request
//! - `path` - [`build_path`], turning a config into the feed service path
//! - `media` - [`FeedMediaClient`], which builds the path and delegates to an
//!   [`MpxClient`](crate::client::MpxClient)
//!
//! # Example
//!
//! ```ignore
//! use feedmedia::client::HttpMpxClient;
//! use feedmedia::feed::{FeedMediaClient, FeedRequestConfig};
//!
//! let config = FeedRequestConfig::new("acct", "feed").with_ids(["1", "2"]);
//! let client = FeedMediaClient::new(HttpMpxClient::new(reqwest::Client::new()), base_url, config);
//! let response = client.get().await?;
//! let total = client.count().await?;
//! ```

mod media;
mod path;
mod request;

pub use media::{FeedError, FeedMediaClient};
pub use path::{build_path, PathError};
pub use request::FeedRequestConfig;
