use super::{CountResult, MpxClient, QueryParams};
use crate::util::with_trailing_slash;
use futures::TryStreamExt;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("No base URL configured")]
    MissingBaseUrl,
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid UTF-8 in response")]
    InvalidUtf8,
    #[error("Malformed count response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Response format requested through the `form` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Rss,
    Atom,
    Json,
    Cjson,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Rss => "rss",
            ResponseFormat::Atom => "atom",
            ResponseFormat::Json => "json",
            ResponseFormat::Cjson => "cjson",
        }
    }
}

impl FromStr for ResponseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rss" => Ok(ResponseFormat::Rss),
            "atom" => Ok(ResponseFormat::Atom),
            "json" => Ok(ResponseFormat::Json),
            "cjson" => Ok(ResponseFormat::Cjson),
            other => Err(format!(
                "unknown response format '{other}' (expected rss, atom, json or cjson)"
            )),
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful feed response. The body is not interpreted.
#[derive(Debug, Clone)]
pub struct FeedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// reqwest-backed [`MpxClient`].
///
/// Every request is sent to `base_url + path`. The default `form` parameter is
/// added first, so a caller-supplied `form` wins. Failures are reported once;
/// there is no retry.
#[derive(Debug, Clone)]
pub struct HttpMpxClient {
    http: reqwest::Client,
    base_url: Option<Url>,
    form: ResponseFormat,
    timeout: Duration,
    max_response_size: usize,
}

impl HttpMpxClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: None,
            form: ResponseFormat::default(),
            timeout: DEFAULT_TIMEOUT,
            max_response_size: MAX_RESPONSE_SIZE,
        }
    }

    pub fn with_form(mut self, form: ResponseFormat) -> Self {
        self.form = form;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_response_size(mut self, limit: usize) -> Self {
        self.max_response_size = limit;
        self
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Query parameters sent with every request unless the caller overrides them.
    pub fn defaults(&self) -> QueryParams {
        QueryParams::from([("form".to_string(), self.form.as_str().to_string())])
    }

    /// Appends `path` to the base URL path.
    ///
    /// `set_path` percent-encodes `?`, `#` and spaces, so every character of the
    /// feed path reaches the server as path. `/` and `,` pass through unchanged.
    fn request_url(&self, path: &str) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone().ok_or(ClientError::MissingBaseUrl)?;
        let full_path = format!("{}{}", url.path(), path);
        url.set_path(&full_path);
        Ok(url)
    }

    fn merged_query(&self, query: &QueryParams) -> QueryParams {
        let mut merged = self.defaults();
        merged.extend(query.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    async fn send(&self, path: &str, query: &QueryParams) -> Result<FeedResponse, ClientError> {
        let url = self.request_url(path)?;
        tracing::debug!(url = %url, params = query.len(), "Sending feed request");

        let request = self.http.get(url).query(query);
        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| ClientError::Timeout(self.timeout))?
            .map_err(ClientError::Network)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Feed request failed");
            return Err(ClientError::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = read_body(response, self.max_response_size).await?;

        Ok(FeedResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

impl MpxClient for HttpMpxClient {
    type Response = FeedResponse;
    type Error = ClientError;

    fn set_base_url(&mut self, url: Url) {
        tracing::info!(base_url = %url, "Using feed base URL");
        self.base_url = Some(with_trailing_slash(url));
    }

    async fn get(&self, path: &str, query: &QueryParams) -> Result<FeedResponse, ClientError> {
        self.send(path, &self.merged_query(query)).await
    }

    async fn count(&self, path: &str, query: &QueryParams) -> Result<CountResult, ClientError> {
        let mut query = self.merged_query(query);
        query.insert("form".to_string(), ResponseFormat::Json.as_str().to_string());
        query.insert("count".to_string(), "true".to_string());
        query.insert("entries".to_string(), "false".to_string());

        let response = self.send(path, &query).await?;
        Ok(serde_json::from_str(&response.body)?)
    }
}

/// Collects the body, giving up as soon as it grows past `limit` bytes.
async fn read_body(response: reqwest::Response, limit: usize) -> Result<String, ClientError> {
    if response.content_length().unwrap_or(0) > limit as u64 {
        return Err(ClientError::ResponseTooLarge(limit));
    }

    let body = response
        .bytes_stream()
        .map_err(ClientError::Network)
        .try_fold(Vec::new(), |mut body, chunk| async move {
            if body.len().saturating_add(chunk.len()) > limit {
                return Err(ClientError::ResponseTooLarge(limit));
            }
            body.extend_from_slice(&chunk);
            Ok(body)
        })
        .await?;

    String::from_utf8(body).map_err(|_| ClientError::InvalidUtf8)
}
