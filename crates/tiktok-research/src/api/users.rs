use super::*;

impl ResearchClient {
    /// Get a user's profile summary by username.
    pub async fn query_user_info(&self, username: &str) -> Result<UserInfo, ResearchError> {
        let endpoint = Endpoint {
            path: USER_INFO_PATH,
            fields: Some(USER_INFO_FIELDS),
            variant: Variant::UserInfo,
            retry: RetryPolicy::Never,
            paginated: false,
            extract: user_info_page,
        };

        let mut body = Map::new();
        body.insert("username".into(), username.into());
        PageSession::new(self, endpoint, body)?.into_single().await
    }

    /// Stream the accounts following `username`.
    pub fn query_user_followers(
        &self,
        username: &str,
        max_count: u32,
    ) -> ItemStream<UserFollowerInfo> {
        let endpoint = Endpoint {
            path: USER_FOLLOWERS_PATH,
            fields: None,
            variant: Variant::UserFollowers,
            retry: RetryPolicy::RateLimit,
            paginated: true,
            extract: followers_page,
        };
        self.paginate(endpoint, Ok(user_list_body(username, max_count)))
    }

    /// Stream the accounts `username` follows.
    pub fn query_user_following(
        &self,
        username: &str,
        max_count: u32,
    ) -> ItemStream<UserFollowerInfo> {
        let endpoint = Endpoint {
            path: USER_FOLLOWING_PATH,
            fields: None,
            variant: Variant::UserFollowing,
            retry: RetryPolicy::RateLimit,
            paginated: true,
            extract: following_page,
        };
        self.paginate(endpoint, Ok(user_list_body(username, max_count)))
    }
}

pub(super) fn user_list_body(username: &str, max_count: u32) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("username".into(), username.into());
    body.insert("max_count".into(), max_count.into());
    body
}

fn user_info_page(data: ResponseData) -> Option<Page<UserInfo>> {
    match data {
        ResponseData::UserInfo(info) => Some(Page::last(vec![info])),
        _ => None,
    }
}

fn followers_page(data: ResponseData) -> Option<Page<UserFollowerInfo>> {
    match data {
        ResponseData::UserFollowers(d) => {
            Some(Page::resumable(d.user_followers, d.cursor, None, d.has_more))
        }
        _ => None,
    }
}

fn following_page(data: ResponseData) -> Option<Page<UserFollowerInfo>> {
    match data {
        ResponseData::UserFollowing(d) => {
            Some(Page::resumable(d.user_following, d.cursor, None, d.has_more))
        }
        _ => None,
    }
}
