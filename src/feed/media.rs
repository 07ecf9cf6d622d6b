use super::path::{build_path, PathError};
use super::FeedRequestConfig;
use crate::client::MpxClient;
use thiserror::Error;
use url::Url;

/// Errors returned by [`FeedMediaClient`] operations.
#[derive(Debug, Error)]
pub enum FeedError<E> {
    /// The request configuration is invalid. Raised before any network call.
    #[error(transparent)]
    Configuration(#[from] PathError),
    /// Error reported by the HTTP client, passed through unchanged.
    #[error(transparent)]
    Client(E),
}

impl<E> FeedError<E> {
    /// Returns true if the failure came from the request configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, FeedError::Configuration(_))
    }
}

/// Client for a single media feed.
///
/// Holds an immutable [`FeedRequestConfig`] and an [`MpxClient`]. Every call
/// rebuilds the path from the config, so a `FeedMediaClient` can be shared
/// read-only across tasks as long as `C` allows it.
///
/// See <http://help.theplatform.com/display/vms2/Requesting+Media+feeds>.
#[derive(Debug)]
pub struct FeedMediaClient<C> {
    client: C,
    base_url: Url,
    config: FeedRequestConfig,
}

impl<C: MpxClient> FeedMediaClient<C> {
    /// Creates a client and registers `base_url` with the HTTP client.
    ///
    /// The config is not validated here; see [`FeedMediaClient::build_path`].
    pub fn new(mut client: C, base_url: Url, config: FeedRequestConfig) -> Self {
        client.set_base_url(base_url.clone());
        Self {
            client,
            base_url,
            config,
        }
    }

    pub fn config(&self) -> &FeedRequestConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Builds the request path from the config.
    pub fn build_path(&self) -> Result<String, PathError> {
        build_path(&self.config)
    }

    /// Requests the feed and returns the HTTP client's response as-is.
    pub async fn get(&self) -> Result<C::Response, FeedError<C::Error>> {
        let path = self.build_path()?;
        tracing::debug!(
            path = %path,
            params = self.config.query_params.len(),
            "Requesting media feed"
        );
        self.client
            .get(&path, &self.config.query_params)
            .await
            .map_err(FeedError::Client)
    }

    /// Returns the number of items the feed request matches.
    pub async fn count(&self) -> Result<u64, FeedError<C::Error>> {
        let path = self.build_path()?;
        tracing::debug!(
            path = %path,
            params = self.config.query_params.len(),
            "Counting media feed items"
        );
        let result = self
            .client
            .count(&path, &self.config.query_params)
            .await
            .map_err(FeedError::Client)?;
        Ok(result.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{CountResult, QueryParams};
    use std::sync::Mutex;

    #[derive(Debug, Error)]
    #[error("transport down")]
    struct TransportDown;

    /// Records every call made through the collaborator contract.
    #[derive(Default)]
    struct RecordingClient {
        base_urls: Vec<Url>,
        calls: Mutex<Vec<(&'static str, String, QueryParams)>>,
        elements: u64,
        fail: bool,
    }

    impl RecordingClient {
        fn calls(&self) -> Vec<(&'static str, String, QueryParams)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl MpxClient for RecordingClient {
        type Response = String;
        type Error = TransportDown;

        fn set_base_url(&mut self, url: Url) {
            self.base_urls.push(url);
        }

        async fn get(&self, path: &str, query: &QueryParams) -> Result<String, TransportDown> {
            self.calls
                .lock()
                .unwrap()
                .push(("get", path.to_string(), query.clone()));
            if self.fail {
                return Err(TransportDown);
            }
            Ok(format!("body for {path}"))
        }

        async fn count(
            &self,
            path: &str,
            query: &QueryParams,
        ) -> Result<CountResult, TransportDown> {
            self.calls
                .lock()
                .unwrap()
                .push(("count", path.to_string(), query.clone()));
            if self.fail {
                return Err(TransportDown);
            }
            Ok(CountResult::new(self.elements))
        }
    }

    fn base_url() -> Url {
        Url::parse("https://feed.theplatform.com/f/").unwrap()
    }

    #[test]
    fn test_new_registers_base_url_once() {
        let client = FeedMediaClient::new(
            RecordingClient::default(),
            base_url(),
            FeedRequestConfig::new("acct1", "feed1"),
        );
        assert_eq!(client.client().base_urls, vec![base_url()]);
        assert_eq!(client.base_url(), &base_url());
    }

    #[test]
    fn test_new_does_not_validate() {
        let config = FeedRequestConfig::new("acct1", "feed1")
            .with_ids(["1"])
            .with_guids(["g1"]);
        let client = FeedMediaClient::new(RecordingClient::default(), base_url(), config);
        assert_eq!(client.build_path(), Err(PathError::IdsAndGuids));
    }

    #[test]
    fn test_build_path_is_repeatable() {
        let config = FeedRequestConfig::new("acct1", "feed1").with_guids(["g1"]);
        let client = FeedMediaClient::new(RecordingClient::default(), base_url(), config);
        assert_eq!(client.build_path(), client.build_path());
    }

    #[tokio::test]
    async fn test_get_delegates_path_and_query() {
        let config = FeedRequestConfig::new("acct1", "feed1")
            .with_ids(["1", "2"])
            .with_query_param("form", "json");
        let client = FeedMediaClient::new(RecordingClient::default(), base_url(), config);

        let response = client.get().await.unwrap();
        assert_eq!(response, "body for acct1feed11,2");

        let calls = client.client().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "get");
        assert_eq!(calls[0].1, "acct1feed11,2");
        assert_eq!(calls[0].2.get("form").map(String::as_str), Some("json"));
    }

    #[tokio::test]
    async fn test_get_conflict_skips_client() {
        let config = FeedRequestConfig::new("acct1", "feed1")
            .with_ids(["1"])
            .with_guids(["g1"]);
        let client = FeedMediaClient::new(RecordingClient::default(), base_url(), config);

        let err = client.get().await.unwrap_err();
        assert!(err.is_configuration());
        assert!(client.client().calls().is_empty());
    }

    #[tokio::test]
    async fn test_count_returns_elements() {
        let collaborator = RecordingClient {
            elements: 1234,
            ..Default::default()
        };
        let client = FeedMediaClient::new(
            collaborator,
            base_url(),
            FeedRequestConfig::new("acct1", "feed1"),
        );

        assert_eq!(client.count().await.unwrap(), 1234);
        let calls = client.client().calls();
        assert_eq!(calls[0].0, "count");
        assert_eq!(calls[0].1, "acct1feed1");
    }

    #[tokio::test]
    async fn test_count_conflict_skips_client() {
        let config = FeedRequestConfig::new("acct1", "feed1")
            .with_ids(["1"])
            .with_guids(["g1"]);
        let client = FeedMediaClient::new(RecordingClient::default(), base_url(), config);

        assert!(matches!(
            client.count().await,
            Err(FeedError::Configuration(PathError::IdsAndGuids))
        ));
        assert!(client.client().calls().is_empty());
    }

    #[tokio::test]
    async fn test_client_error_passes_through() {
        let collaborator = RecordingClient {
            fail: true,
            ..Default::default()
        };
        let client = FeedMediaClient::new(
            collaborator,
            base_url(),
            FeedRequestConfig::new("acct1", "feed1"),
        );

        let err = client.get().await.unwrap_err();
        assert!(matches!(err, FeedError::Client(TransportDown)));
        assert_eq!(err.to_string(), "transport down");

        let err = client.count().await.unwrap_err();
        assert!(!err.is_configuration());
    }
}
