//! Response envelope decoding.
//!
//! Every endpoint wraps its payload as `{ "data": ..., "error": ... }`.
//! The payload shapes overlap (liked and reposted videos differ only in
//! the list key), so the caller names the [`Variant`] it expects and the
//! payload is decoded against that shape alone.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::models::{
    QueryVideoResponseData, ResponseError, UserFollowerData, UserFollowingData, UserInfo,
    UserLikedVideosData, UserPinnedVideosData, UserRepostedVideosData, VideoCommentsData,
};
use crate::ResearchError;

/// Closed set of payload shapes the envelope's `data` may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    QueryVideos,
    VideoComments,
    UserInfo,
    UserFollowers,
    UserFollowing,
    UserLikedVideos,
    UserPinnedVideos,
    UserRepostedVideos,
}

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Self::QueryVideos => "query videos",
            Self::VideoComments => "video comments",
            Self::UserInfo => "user info",
            Self::UserFollowers => "user followers",
            Self::UserFollowing => "user following",
            Self::UserLikedVideos => "user liked videos",
            Self::UserPinnedVideos => "user pinned videos",
            Self::UserRepostedVideos => "user reposted videos",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded `data` field.
///
/// `Unrecognized` holds an object that did not fit the expected variant;
/// the remote service returns such degraded payloads at exhaustion.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    QueryVideos(QueryVideoResponseData),
    VideoComments(VideoCommentsData),
    UserInfo(UserInfo),
    UserFollowers(UserFollowerData),
    UserFollowing(UserFollowingData),
    UserLikedVideos(UserLikedVideosData),
    UserPinnedVideos(UserPinnedVideosData),
    UserRepostedVideos(UserRepostedVideosData),
    Unrecognized(Map<String, Value>),
}

impl ResponseData {
    /// The variant this payload was decoded as, if any.
    pub fn variant(&self) -> Option<Variant> {
        match self {
            Self::QueryVideos(_) => Some(Variant::QueryVideos),
            Self::VideoComments(_) => Some(Variant::VideoComments),
            Self::UserInfo(_) => Some(Variant::UserInfo),
            Self::UserFollowers(_) => Some(Variant::UserFollowers),
            Self::UserFollowing(_) => Some(Variant::UserFollowing),
            Self::UserLikedVideos(_) => Some(Variant::UserLikedVideos),
            Self::UserPinnedVideos(_) => Some(Variant::UserPinnedVideos),
            Self::UserRepostedVideos(_) => Some(Variant::UserRepostedVideos),
            Self::Unrecognized(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub data: ResponseData,
    pub error: ResponseError,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    // Distinguishes an absent `data` from an explicit `null`.
    #[serde(default, deserialize_with = "present")]
    data: Option<Value>,
    error: ResponseError,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Validate a raw response body against the variant the caller expects.
///
/// Fails with [`ResearchError::SchemaValidation`] when the envelope itself is
/// malformed, and with [`ResearchError::Api`] when `error` reports a failure.
/// A `data` object that does not fit `expected` decodes to
/// [`ResponseData::Unrecognized`]; callers decide whether that is fatal.
pub fn parse_envelope(raw: Value, expected: Variant) -> Result<ResponseEnvelope, ResearchError> {
    let raw: RawEnvelope =
        serde_json::from_value(raw).map_err(|e| ResearchError::SchemaValidation {
            variant: expected,
            reason: format!("malformed envelope: {e}"),
        })?;

    if !raw.error.is_ok() {
        return Err(ResearchError::Api {
            code: raw.error.code,
            message: raw.error.message,
            log_id: raw.error.log_id,
        });
    }

    let data = match raw.data {
        Some(value @ Value::Object(_)) => decode_data(value, expected),
        Some(other) => {
            return Err(ResearchError::SchemaValidation {
                variant: expected,
                reason: format!("`data` must be an object, got {}", json_kind(&other)),
            });
        }
        None => {
            return Err(ResearchError::SchemaValidation {
                variant: expected,
                reason: "missing `data`".into(),
            });
        }
    };

    Ok(ResponseEnvelope {
        data,
        error: raw.error,
    })
}

fn decode_data(value: Value, expected: Variant) -> ResponseData {
    let decoded = match expected {
        Variant::QueryVideos => decode(&value).map(ResponseData::QueryVideos),
        Variant::VideoComments => decode(&value).map(ResponseData::VideoComments),
        Variant::UserInfo => decode(&value).map(ResponseData::UserInfo),
        Variant::UserFollowers => decode(&value).map(ResponseData::UserFollowers),
        Variant::UserFollowing => decode(&value).map(ResponseData::UserFollowing),
        Variant::UserLikedVideos => decode(&value).map(ResponseData::UserLikedVideos),
        Variant::UserPinnedVideos => decode(&value).map(ResponseData::UserPinnedVideos),
        Variant::UserRepostedVideos => decode(&value).map(ResponseData::UserRepostedVideos),
    };

    match decoded {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!(
                variant = %expected,
                error = %e,
                "Payload does not match expected variant"
            );
            match value {
                Value::Object(map) => ResponseData::Unrecognized(map),
                _ => ResponseData::Unrecognized(Map::new()),
            }
        }
    }
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, serde_json::Error> {
    T::deserialize(value)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
