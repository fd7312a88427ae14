use chrono::{DateTime, Utc};

use super::users::user_list_body;
use super::*;

impl ResearchClient {
    /// Stream videos liked by `username`, starting from `start_time`.
    pub fn query_user_liked_videos(
        &self,
        username: &str,
        start_time: DateTime<Utc>,
        max_count: u32,
    ) -> ItemStream<Video> {
        let endpoint = Endpoint {
            path: USER_LIKED_VIDEOS_PATH,
            fields: Some(USER_VIDEO_FIELDS),
            variant: Variant::UserLikedVideos,
            retry: RetryPolicy::RateLimit,
            paginated: true,
            extract: liked_page,
        };
        self.paginate(endpoint, Ok(user_video_body(username, start_time, max_count)))
    }

    /// Stream the videos pinned on `username`'s profile. The service
    /// returns them in a single page.
    pub fn query_user_pinned_videos(
        &self,
        username: &str,
        start_time: DateTime<Utc>,
        max_count: u32,
    ) -> ItemStream<Video> {
        let endpoint = Endpoint {
            path: USER_PINNED_VIDEOS_PATH,
            fields: Some(USER_VIDEO_FIELDS),
            variant: Variant::UserPinnedVideos,
            retry: RetryPolicy::RateLimit,
            paginated: false,
            extract: pinned_page,
        };
        self.paginate(endpoint, Ok(user_video_body(username, start_time, max_count)))
    }

    /// Stream videos reposted by `username`, starting from `start_time`.
    pub fn query_user_reposted_videos(
        &self,
        username: &str,
        start_time: DateTime<Utc>,
        max_count: u32,
    ) -> ItemStream<Video> {
        let endpoint = Endpoint {
            path: USER_REPOSTED_VIDEOS_PATH,
            fields: Some(USER_VIDEO_FIELDS),
            variant: Variant::UserRepostedVideos,
            retry: RetryPolicy::RateLimit,
            paginated: true,
            extract: reposted_page,
        };
        self.paginate(endpoint, Ok(user_video_body(username, start_time, max_count)))
    }
}

/// The start time rides in `cursor` as epoch seconds on the first request.
fn user_video_body(
    username: &str,
    start_time: DateTime<Utc>,
    max_count: u32,
) -> Map<String, Value> {
    let mut body = user_list_body(username, max_count);
    body.insert("cursor".into(), start_time.timestamp().into());
    body
}

fn liked_page(data: ResponseData) -> Option<Page<Video>> {
    match data {
        ResponseData::UserLikedVideos(d) => Some(Page::resumable(
            d.user_liked_videos,
            d.cursor,
            Some(d.search_id),
            d.has_more,
        )),
        _ => None,
    }
}

fn pinned_page(data: ResponseData) -> Option<Page<Video>> {
    match data {
        ResponseData::UserPinnedVideos(d) => Some(Page::last(d.pinned_videos_list)),
        _ => None,
    }
}

fn reposted_page(data: ResponseData) -> Option<Page<Video>> {
    match data {
        ResponseData::UserRepostedVideos(d) => Some(Page::resumable(
            d.user_reposted_videos,
            d.cursor,
            Some(d.search_id),
            d.has_more,
        )),
        _ => None,
    }
}
