//! TikTok Research API query client.
//!
//! Every list-returning endpoint is driven by one paginated engine that
//! yields items lazily, threads the cursor (and search id) between pages,
//! and retries rate limits and transient gateway failures in place.

mod paginate;
mod request;
mod user_videos;
mod users;
mod videos;
#[cfg(test)]
mod tests;

pub mod envelope;
pub mod models;
pub mod query;

pub use paginate::{ItemStream, PageState};
pub use query::{BuildQueryError, QueryVideosRequest};
pub use request::build_headers;

use std::sync::Arc;

use reqwest::header::HeaderMap;
use serde_json::{Map, Value};

use self::envelope::{ResponseData, Variant};
use self::models::{Comment, UserFollowerInfo, UserInfo, Video};
use self::paginate::{Endpoint, Page, PageSession, RetryPolicy};
use crate::fields::{USER_INFO_FIELDS, USER_VIDEO_FIELDS, VIDEO_COMMENT_FIELDS, VIDEO_FIELDS};
use crate::{BearerToken, ClientConfig, ResearchError};

/// Default and maximum page size accepted by the list endpoints.
pub const DEFAULT_MAX_COUNT: u32 = 100;

const VIDEO_QUERY_PATH: &str = "/v2/research/video/query/";
const VIDEO_COMMENTS_PATH: &str = "/v2/research/video/comment/list/";
const USER_INFO_PATH: &str = "/v2/research/user/info/";
const USER_FOLLOWERS_PATH: &str = "/v2/research/user/followers/";
const USER_FOLLOWING_PATH: &str = "/v2/research/user/following/";
const USER_LIKED_VIDEOS_PATH: &str = "/v2/research/user/liked_videos/";
const USER_PINNED_VIDEOS_PATH: &str = "/v2/research/user/pinned_videos/";
const USER_REPOSTED_VIDEOS_PATH: &str = "/v2/research/user/reposted_videos/";

/// Research API client with the bearer token baked into its headers.
///
/// Cloning is cheap; clones share the connection pool and configuration.
#[derive(Debug, Clone)]
pub struct ResearchClient {
    pub(super) http: reqwest::Client,
    pub(super) headers: HeaderMap,
    pub(super) config: Arc<ClientConfig>,
}

impl ResearchClient {
    pub fn new(token: &BearerToken) -> Result<Self, ResearchError> {
        Self::with_config(token, ClientConfig::default())
    }

    pub fn with_config(token: &BearerToken, config: ClientConfig) -> Result<Self, ResearchError> {
        Ok(Self {
            http: config.http_client()?,
            headers: build_headers(token),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
