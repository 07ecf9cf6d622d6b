//! HTTP collaborator contract for the feed media client.
//!
//! [`FeedMediaClient`](crate::feed::FeedMediaClient) never talks to the network
//! itself. It builds a path and hands it, together with the query parameters, to
//! an [`MpxClient`]. Transport, authentication and response parsing all live on
//! the other side of this trait.
//!
//! - [`MpxClient`] - the collaborator trait
//! - [`HttpMpxClient`] - a reqwest-backed implementation
//! - [`CountResult`] - the typed result of a count query

mod http;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::future::Future;
use url::Url;

pub use http::{ClientError, FeedResponse, HttpMpxClient, ResponseFormat};

/// Query-string parameters sent with a feed request.
///
/// A sorted map so the generated query string is stable between calls.
pub type QueryParams = BTreeMap<String, String>;

/// Result of a count query.
///
/// `elements` is required. A response without it is a contract violation and
/// fails deserialization inside the collaborator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CountResult {
    /// Number of items matched by the request
    pub elements: u64,
    /// Any other fields the service returned alongside the count
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CountResult {
    pub fn new(elements: u64) -> Self {
        Self {
            elements,
            extra: serde_json::Map::new(),
        }
    }
}

/// An HTTP client able to serve feed media requests.
///
/// Implementations own their transport and error types. Errors are passed
/// through to the caller of [`FeedMediaClient`](crate::feed::FeedMediaClient)
/// untouched.
pub trait MpxClient {
    /// Opaque response returned by [`MpxClient::get`].
    type Response;
    /// Transport-level error.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sets the root URL every subsequent path is resolved against.
    fn set_base_url(&mut self, url: Url);

    /// Performs a read of `path` with the given query parameters.
    fn get(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send;

    /// Performs a count query of `path` with the given query parameters.
    fn count(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> impl Future<Output = Result<CountResult, Self::Error>> + Send;
}
