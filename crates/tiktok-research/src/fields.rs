//! Field lists sent as the `fields` query parameter.
//!
//! Each endpoint returns only the fields named here, so the item models
//! in [`crate::api::models`] treat anything outside these lists as optional.

/// Fields requested from the video query endpoint.
pub const VIDEO_FIELDS: &str = "id,video_description,create_time,region_code,share_count,view_count,like_count,comment_count,music_id,hashtag_names,username,effect_ids,playlist_id,voice_to_text,is_stem_verified,favorites_count,video_duration";

/// Fields requested from the video comment list endpoint.
pub const VIDEO_COMMENT_FIELDS: &str =
    "id,video_id,text,like_count,reply_count,parent_comment_id,create_time";

/// Fields requested from the user info endpoint.
pub const USER_INFO_FIELDS: &str = "display_name,bio_description,avatar_url,is_verified,follower_count,following_count,likes_count,video_count";

/// Fields requested from the liked, pinned and reposted video endpoints.
pub const USER_VIDEO_FIELDS: &str = "id,create_time,username,region_code,video_description,music_id,like_count,comment_count,share_count,view_count,hashtag_names,is_stem_verified,video_duration";
