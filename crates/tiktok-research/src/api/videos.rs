use super::*;

impl ResearchClient {
    /// Stream videos matching a search.
    ///
    /// This endpoint alone also retries 500s immediately, backs off on 504s
    /// until the configured cap, and waits out a search id that the service
    /// does not recognise yet.
    pub fn query_videos(&self, request: &QueryVideosRequest) -> ItemStream<Video> {
        let endpoint = Endpoint {
            path: VIDEO_QUERY_PATH,
            fields: Some(VIDEO_FIELDS),
            variant: Variant::QueryVideos,
            retry: RetryPolicy::Search,
            paginated: true,
            extract: query_videos_page,
        };
        self.paginate(endpoint, request.to_body())
    }

    /// Stream comments on a video. The service returns at most the top
    /// 1000 comments.
    pub fn query_video_comments(&self, video_id: u64, max_count: u32) -> ItemStream<Comment> {
        let endpoint = Endpoint {
            path: VIDEO_COMMENTS_PATH,
            fields: Some(VIDEO_COMMENT_FIELDS),
            variant: Variant::VideoComments,
            retry: RetryPolicy::RateLimit,
            paginated: true,
            extract: comments_page,
        };

        let mut body = Map::new();
        body.insert("video_id".into(), video_id.into());
        body.insert("max_count".into(), max_count.into());
        self.paginate(endpoint, Ok(body))
    }
}

fn query_videos_page(data: ResponseData) -> Option<Page<Video>> {
    match data {
        ResponseData::QueryVideos(d) => Some(Page::resumable(
            d.videos,
            d.cursor,
            Some(d.search_id),
            d.has_more,
        )),
        _ => None,
    }
}

fn comments_page(data: ResponseData) -> Option<Page<Comment>> {
    match data {
        ResponseData::VideoComments(d) => {
            Some(Page::resumable(d.comments, d.cursor, None, d.has_more))
        }
        _ => None,
    }
}
