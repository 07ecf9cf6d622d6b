use crate::client::QueryParams;
use serde::Deserialize;

/// Everything that identifies a feed request.
///
/// Built once and handed to [`FeedMediaClient`](super::FeedMediaClient); it is
/// never mutated afterwards. Optional fields keep exactly what the caller gave,
/// so `Some("")` and `None` stay distinguishable.
///
/// `ids` and `guids` are two mutually exclusive ways of selecting items. The
/// conflict is only reported when a path is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedRequestConfig {
    /// The Account.pid of the account that owns the feed.
    pub account_pid: String,

    /// The FeedConfig.pid of the feed.
    pub feed_pid: String,

    /// SubFeed.FeedType value selecting a subfeed of the main feed.
    #[serde(default)]
    pub feed_type: Option<String>,

    /// Forces feed format even when only one item is returned.
    #[serde(default)]
    pub feed: bool,

    /// Numeric IDs of individual items.
    #[serde(default)]
    pub ids: Vec<String>,

    /// Owner qualifying the GUIDs. `None` means the owner of the FeedConfig.
    #[serde(default)]
    pub owner_id: Option<String>,

    /// Item GUIDs, unique within an account.
    #[serde(default)]
    pub guids: Vec<String>,

    /// SEO terms for the feed.
    #[serde(default)]
    pub seo_terms: Vec<String>,

    /// Extra query-string parameters.
    #[serde(default, rename = "query")]
    pub query_params: QueryParams,
}

impl FeedRequestConfig {
    pub fn new(account_pid: impl Into<String>, feed_pid: impl Into<String>) -> Self {
        Self {
            account_pid: account_pid.into(),
            feed_pid: feed_pid.into(),
            ..Default::default()
        }
    }

    pub fn with_feed_type(mut self, feed_type: impl Into<String>) -> Self {
        self.feed_type = Some(feed_type.into());
        self
    }

    pub fn with_feed_format(mut self, feed: bool) -> Self {
        self.feed = feed;
        self
    }

    pub fn with_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_owner_id(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn with_guids<I, S>(mut self, guids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.guids = guids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_seo_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seo_terms = terms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }
}
