//! Request builder and HTTP client for thePlatform media feed service.
//!
//! A [`feed::FeedMediaClient`] turns a [`feed::FeedRequestConfig`] into a feed
//! path and hands it to a [`client::MpxClient`], which owns the transport.

pub mod client;
pub mod config;
pub mod feed;
pub mod util;
