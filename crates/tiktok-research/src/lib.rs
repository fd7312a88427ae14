//! TikTok Research API client library.
//!
//! Provides client-credentials authentication, typed response models,
//! and lazily paginated streams over the research endpoints with
//! in-place retry for rate limits and transient gateway failures.

pub mod api;
pub mod auth;
pub mod config;
pub mod fields;

use std::fmt;

use reqwest::header::HeaderValue;

pub use api::{
    BuildQueryError, DEFAULT_MAX_COUNT, ItemStream, PageState, QueryVideosRequest, ResearchClient,
    build_headers,
    envelope::{ResponseData, ResponseEnvelope, Variant, parse_envelope},
    models::{
        Comment, QueryVideoResponseData, ResponseError, UserFollowerData, UserFollowerInfo,
        UserFollowingData, UserInfo, UserLikedVideosData, UserPinnedVideosData,
        UserRepostedVideosData, Video, VideoCommentsData,
    },
    query::{Condition, Operation, VideoQuery},
};
pub use auth::{ResearchAuth, create_bearer_token};
pub use config::ClientConfig;

/// Bearer credential returned by the token endpoint.
///
/// The authorization header value is built once at construction so that
/// every later request can attach it without a failure path.
#[derive(Clone)]
pub struct BearerToken {
    access_token: String,
    authorization: HeaderValue,
}

impl BearerToken {
    /// Wrap a raw access token. Fails if the token contains bytes that
    /// cannot appear in an HTTP header.
    pub fn new(access_token: impl Into<String>) -> Result<Self, ResearchError> {
        let access_token = access_token.into();
        let mut authorization = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|_| ResearchError::InvalidToken)?;
        authorization.set_sensitive(true);
        Ok(Self {
            access_token,
            authorization,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.access_token
    }

    pub(crate) fn authorization(&self) -> &HeaderValue {
        &self.authorization
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Unified error type for the tiktok-research crate.
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Access token cannot be used as an HTTP header value")]
    InvalidToken,

    #[error("Research API request failed (status {status}): {message}")]
    ApiRequest { status: u16, message: String },

    #[error("Research API error {code} (log_id {log_id}): {message}")]
    Api {
        code: String,
        message: String,
        log_id: String,
    },

    #[error("Response does not match {variant}: {reason}")]
    SchemaValidation { variant: Variant, reason: String },

    #[error("Aborted after {attempts} gateway timeouts: {message}")]
    Aborted { attempts: u32, message: String },

    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] BuildQueryError),
}
