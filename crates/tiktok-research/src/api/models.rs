use serde::{Deserialize, Serialize};

/// The `error` object carried by every research API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    pub code: String,
    pub message: String,
    pub log_id: String,
}

impl ResponseError {
    /// Successful responses carry `"ok"` (or nothing) as their code.
    pub fn is_ok(&self) -> bool {
        self.code.is_empty() || self.code.eq_ignore_ascii_case("ok")
    }
}

/// Video record from the query, liked, pinned and reposted endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: u64,
    /// UTC epoch seconds at which the video was posted.
    pub create_time: i64,
    pub username: String,
    pub region_code: String,
    pub video_description: String,
    #[serde(default)]
    pub music_id: Option<u64>,
    #[serde(default)]
    pub like_count: Option<u64>,
    pub comment_count: u64,
    pub share_count: u64,
    pub view_count: u64,
    #[serde(default)]
    pub effect_ids: Option<Vec<String>>,
    pub hashtag_names: Vec<String>,
    #[serde(default)]
    pub playlist_id: Option<u64>,
    #[serde(default)]
    pub voice_to_text: Option<String>,
    #[serde(default)]
    pub is_stem_verified: Option<bool>,
    #[serde(default)]
    pub favorites_count: Option<u64>,
    /// Length in seconds.
    #[serde(default)]
    pub video_duration: Option<u64>,
}

/// Comment record from the video comment list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub text: String,
    pub video_id: u64,
    pub parent_comment_id: u64,
    #[serde(default)]
    pub like_count: Option<u64>,
    pub reply_count: u64,
    pub create_time: i64,
}

/// Profile summary from the user info endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub display_name: String,
    pub bio_description: String,
    pub avatar_url: String,
    pub is_verified: bool,
    pub following_count: u64,
    pub follower_count: u64,
    pub video_count: u64,
    pub likes_count: u64,
}

/// Entry in a follower or following list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFollowerInfo {
    pub display_name: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryVideoResponseData {
    pub videos: Vec<Video>,
    pub cursor: i64,
    pub has_more: bool,
    /// Handle to the cached search; must accompany `cursor` on the next page.
    pub search_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoCommentsData {
    pub comments: Vec<Comment>,
    pub cursor: i64,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLikedVideosData {
    pub user_liked_videos: Vec<Video>,
    /// UTC epoch seconds to resume from.
    pub cursor: i64,
    pub has_more: bool,
    pub search_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPinnedVideosData {
    pub pinned_videos_list: Vec<Video>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRepostedVideosData {
    pub user_reposted_videos: Vec<Video>,
    pub cursor: i64,
    pub has_more: bool,
    pub search_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFollowerData {
    pub user_followers: Vec<UserFollowerInfo>,
    pub cursor: i64,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFollowingData {
    pub user_following: Vec<UserFollowerInfo>,
    pub cursor: i64,
    pub has_more: bool,
}
