use std::time::Duration;

use chrono::{NaiveDate, TimeZone, Utc};
use futures_util::{StreamExt, TryStreamExt};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use super::query::{Condition, VideoQuery};
use super::*;
use crate::auth::ResearchAuth;

fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        base_url: server.uri(),
        rate_limit_backoff: Duration::from_millis(5),
        gateway_timeout_backoff: Duration::from_millis(5),
        search_id_backoff: Duration::from_millis(5),
        max_gateway_timeouts: 10,
        request_timeout: None,
    }
}

fn test_client(server: &MockServer) -> ResearchClient {
    let token = BearerToken::new("clt.test").unwrap();
    ResearchClient::with_config(&token, test_config(server)).unwrap()
}

fn ok_envelope(data: Value) -> Value {
    json!({
        "data": data,
        "error": {"code": "ok", "message": "", "log_id": "20240101"}
    })
}

fn comment(id: u64) -> Value {
    json!({
        "id": id,
        "text": format!("comment {id}"),
        "video_id": 123,
        "parent_comment_id": 123,
        "like_count": 1,
        "reply_count": 0,
        "create_time": 1700000000
    })
}

fn video(id: u64) -> Value {
    json!({
        "id": id,
        "create_time": 1700000000,
        "username": "creator",
        "region_code": "US",
        "video_description": "clip",
        "hashtag_names": ["rust"],
        "like_count": 3,
        "comment_count": 0,
        "share_count": 0,
        "view_count": 42
    })
}

async fn bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r: &Request| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

async fn mount_status_once(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

fn video_page(ids: &[u64], cursor: i64, has_more: bool) -> ResponseTemplate {
    let videos: Vec<Value> = ids.iter().copied().map(video).collect();
    ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
        "videos": videos,
        "cursor": cursor,
        "has_more": has_more,
        "search_id": "s1"
    })))
}

fn client_with_gateway_limit(server: &MockServer, max_gateway_timeouts: u32) -> ResearchClient {
    let config = ClientConfig {
        max_gateway_timeouts,
        ..test_config(server)
    };
    let token = BearerToken::new("clt.test").unwrap();
    ResearchClient::with_config(&token, config).unwrap()
}

fn video_request() -> QueryVideosRequest {
    let query = VideoQuery::new().and(Condition::is_in("region_code", ["US", "CA"]));
    QueryVideosRequest::new(
        query,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
    )
}

#[tokio::test]
async fn user_info_is_a_single_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(USER_INFO_PATH))
        .and(query_param("fields", USER_INFO_FIELDS))
        .and(header("authorization", "Bearer clt.test"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "display_name": "TikTok",
            "bio_description": "",
            "avatar_url": "https://example.com/a.jpg",
            "is_verified": true,
            "following_count": 1,
            "follower_count": 2,
            "video_count": 3,
            "likes_count": 4
        }))))
        .mount(&server)
        .await;

    let info = test_client(&server).query_user_info("tiktok").await.unwrap();
    assert_eq!(info.display_name, "TikTok");

    assert_eq!(bodies(&server).await, vec![json!({"username": "tiktok"})]);
}

#[tokio::test]
async fn user_info_shape_mismatch_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(USER_INFO_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({}))))
        .mount(&server)
        .await;

    let err = test_client(&server).query_user_info("tiktok").await.unwrap_err();
    assert!(
        matches!(err, ResearchError::SchemaValidation { variant: Variant::UserInfo, .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn user_info_does_not_retry_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(USER_INFO_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = test_client(&server).query_user_info("tiktok").await.unwrap_err();
    assert!(matches!(err, ResearchError::ApiRequest { status: 429, .. }));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn comments_follow_cursor_until_has_more_is_false() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VIDEO_COMMENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "comments": [comment(1), comment(2)],
            "cursor": 2,
            "has_more": true
        }))))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(VIDEO_COMMENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "comments": [comment(3)],
            "cursor": 3,
            "has_more": false
        }))))
        .mount(&server)
        .await;

    let comments: Vec<Comment> = test_client(&server)
        .query_video_comments(123, 2)
        .try_collect()
        .await
        .unwrap();

    let ids: Vec<u64> = comments.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(
        bodies(&server).await,
        vec![
            json!({"video_id": 123, "max_count": 2}),
            json!({"video_id": 123, "max_count": 2, "cursor": 2}),
        ]
    );
}

#[tokio::test]
async fn stopping_early_skips_later_pages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VIDEO_COMMENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "comments": [comment(1), comment(2)],
            "cursor": 2,
            "has_more": true
        }))))
        .mount(&server)
        .await;

    let first: Vec<Comment> = test_client(&server)
        .query_video_comments(123, 2)
        .take(1)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn rate_limit_resends_the_same_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(USER_FOLLOWERS_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(USER_FOLLOWERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "user_followers": [{"display_name": "A", "username": "a"}],
            "cursor": 1,
            "has_more": false
        }))))
        .mount(&server)
        .await;

    let followers: Vec<UserFollowerInfo> = test_client(&server)
        .query_user_followers("tiktok", 10)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].username, "a");

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.query().is_none()));
    let bodies = bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn video_query_threads_search_id_and_retries_expired_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VIDEO_QUERY_PATH))
        .and(query_param("fields", VIDEO_FIELDS))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "videos": [video(10)],
            "cursor": 100,
            "has_more": true,
            "search_id": "7391"
        }))))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(VIDEO_QUERY_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": "invalid_params",
                "message": "Search Id 7391 is invalid or expired",
                "log_id": "x"
            }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(VIDEO_QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "videos": [video(11)],
            "cursor": 200,
            "has_more": false,
            "search_id": "7391"
        }))))
        .mount(&server)
        .await;

    let videos: Vec<Video> = test_client(&server)
        .query_videos(&video_request())
        .try_collect()
        .await
        .unwrap();

    assert_eq!(videos.iter().map(|v| v.id).collect::<Vec<_>>(), vec![10, 11]);

    let bodies = bodies(&server).await;
    assert_eq!(bodies.len(), 3);
    assert_eq!(bodies[0]["start_date"], "20240101");
    assert_eq!(bodies[0]["end_date"], "20240131");
    assert!(bodies[0].get("cursor").is_none());
    assert_eq!(bodies[1]["cursor"], 100);
    assert_eq!(bodies[1]["search_id"], "7391");
    assert_eq!(bodies[1], bodies[2]);
}

#[tokio::test]
async fn video_query_retries_internal_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VIDEO_QUERY_PATH))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(VIDEO_QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "videos": [video(10)],
            "cursor": 1,
            "has_more": false,
            "search_id": "1"
        }))))
        .mount(&server)
        .await;

    let videos: Vec<Video> = test_client(&server)
        .query_videos(&video_request())
        .try_collect()
        .await
        .unwrap();

    assert_eq!(videos.len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn video_query_aborts_after_repeated_gateway_timeouts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VIDEO_QUERY_PATH))
        .respond_with(ResponseTemplate::new(504).set_body_string("gateway timeout"))
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.max_gateway_timeouts = 3;
    let token = BearerToken::new("clt.test").unwrap();
    let client = ResearchClient::with_config(&token, config).unwrap();

    let err = client
        .query_videos(&video_request())
        .try_collect::<Vec<Video>>()
        .await
        .unwrap_err();

    match err {
        ResearchError::Aborted { attempts, message } => {
            assert_eq!(attempts, 3);
            assert_eq!(message, "gateway timeout");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn gateway_timeout_followed_by_success_does_not_abort() {
    let server = MockServer::start().await;
    mount_status_once(&server, VIDEO_QUERY_PATH, 504).await;
    Mock::given(method("POST"))
        .and(path(VIDEO_QUERY_PATH))
        .respond_with(video_page(&[10], 1, false))
        .mount(&server)
        .await;

    let videos: Vec<Video> = client_with_gateway_limit(&server, 2)
        .query_videos(&video_request())
        .try_collect()
        .await
        .unwrap();

    assert_eq!(videos.len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn server_errors_break_a_gateway_timeout_run() {
    let server = MockServer::start().await;
    for status in [504, 504, 500, 504, 504] {
        mount_status_once(&server, VIDEO_QUERY_PATH, status).await;
    }
    Mock::given(method("POST"))
        .and(path(VIDEO_QUERY_PATH))
        .respond_with(video_page(&[10], 1, false))
        .mount(&server)
        .await;

    let videos: Vec<Video> = client_with_gateway_limit(&server, 3)
        .query_videos(&video_request())
        .try_collect()
        .await
        .unwrap();

    assert_eq!(videos.len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 6);
}

#[tokio::test]
async fn rate_limits_break_a_gateway_timeout_run() {
    let server = MockServer::start().await;
    for status in [504, 429, 504] {
        mount_status_once(&server, VIDEO_QUERY_PATH, status).await;
    }
    Mock::given(method("POST"))
        .and(path(VIDEO_QUERY_PATH))
        .respond_with(video_page(&[10], 1, false))
        .mount(&server)
        .await;

    let videos: Vec<Video> = client_with_gateway_limit(&server, 2)
        .query_videos(&video_request())
        .try_collect()
        .await
        .unwrap();

    assert_eq!(videos.len(), 1);
    let bodies = bodies(&server).await;
    assert_eq!(bodies.len(), 4);
    assert!(bodies.iter().all(|b| *b == bodies[0]));
}

#[tokio::test]
async fn video_query_rate_limit_resends_the_same_body() {
    let server = MockServer::start().await;
    mount_status_once(&server, VIDEO_QUERY_PATH, 429).await;
    Mock::given(method("POST"))
        .and(path(VIDEO_QUERY_PATH))
        .respond_with(video_page(&[10, 11], 2, false))
        .mount(&server)
        .await;

    let videos: Vec<Video> = test_client(&server)
        .query_videos(&video_request())
        .try_collect()
        .await
        .unwrap();

    assert_eq!(videos.len(), 2);
    let bodies = bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], bodies[1]);
    assert!(bodies[0].get("cursor").is_none());
}

#[tokio::test]
async fn gateway_timeout_count_restarts_on_each_page() {
    let server = MockServer::start().await;
    mount_status_once(&server, VIDEO_QUERY_PATH, 504).await;
    Mock::given(method("POST"))
        .and(path(VIDEO_QUERY_PATH))
        .respond_with(video_page(&[10], 100, true))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_status_once(&server, VIDEO_QUERY_PATH, 504).await;
    Mock::given(method("POST"))
        .and(path(VIDEO_QUERY_PATH))
        .respond_with(video_page(&[11], 200, false))
        .mount(&server)
        .await;

    let videos: Vec<Video> = client_with_gateway_limit(&server, 2)
        .query_videos(&video_request())
        .try_collect()
        .await
        .unwrap();

    assert_eq!(videos.iter().map(|v| v.id).collect::<Vec<_>>(), vec![10, 11]);
    let bodies = bodies(&server).await;
    assert_eq!(bodies.len(), 4);
    assert_eq!(bodies[3]["cursor"], 100);
    assert_eq!(bodies[3]["search_id"], "s1");
}

#[tokio::test]
async fn gateway_timeouts_are_not_retried_outside_video_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VIDEO_COMMENTS_PATH))
        .respond_with(ResponseTemplate::new(504).set_body_string("gateway timeout"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .query_video_comments(123, 10)
        .try_collect::<Vec<Comment>>()
        .await
        .unwrap_err();

    assert!(matches!(err, ResearchError::ApiRequest { status: 504, .. }));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn plain_bad_request_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VIDEO_QUERY_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"error":{"code":"invalid_params","message":"Invalid query","log_id":"x"}}"#,
        ))
        .mount(&server)
        .await;

    let mut stream = test_client(&server).query_videos(&video_request());
    let err = stream.next().await.unwrap().unwrap_err();

    match err {
        ResearchError::ApiRequest { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("Invalid query"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn unexpected_page_shape_ends_the_stream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(USER_FOLLOWING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "unexpected": true
        }))))
        .mount(&server)
        .await;

    let following: Vec<UserFollowerInfo> = test_client(&server)
        .query_user_following("tiktok", 10)
        .try_collect()
        .await
        .unwrap();

    assert!(following.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn envelope_error_ends_the_stream_with_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(USER_LIKED_VIDEOS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {},
            "error": {"code": "access_denied", "message": "private account", "log_id": "L1"}
        })))
        .mount(&server)
        .await;

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let err = test_client(&server)
        .query_user_liked_videos("tiktok", start, 10)
        .try_collect::<Vec<Video>>()
        .await
        .unwrap_err();

    match err {
        ResearchError::Api { code, log_id, .. } => {
            assert_eq!(code, "access_denied");
            assert_eq!(log_id, "L1");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn liked_videos_start_from_the_given_time() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(USER_LIKED_VIDEOS_PATH))
        .and(query_param("fields", USER_VIDEO_FIELDS))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "user_liked_videos": [video(1), video(2)],
            "cursor": 1704000000,
            "has_more": false,
            "search_id": "s"
        }))))
        .mount(&server)
        .await;

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let videos: Vec<Video> = test_client(&server)
        .query_user_liked_videos("tiktok", start, 2)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(videos.len(), 2);
    assert_eq!(
        bodies(&server).await,
        vec![json!({"username": "tiktok", "max_count": 2, "cursor": 1704067200})]
    );
}

#[tokio::test]
async fn pinned_videos_are_a_single_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(USER_PINNED_VIDEOS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "pinned_videos_list": [video(5)]
        }))))
        .mount(&server)
        .await;

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let videos: Vec<Video> = test_client(&server)
        .query_user_pinned_videos("tiktok", start, 10)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(videos.len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn pinned_videos_shape_mismatch_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(USER_PINNED_VIDEOS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({}))))
        .mount(&server)
        .await;

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let err = test_client(&server)
        .query_user_pinned_videos("tiktok", start, 10)
        .try_collect::<Vec<Video>>()
        .await
        .unwrap_err();

    assert!(matches!(err, ResearchError::SchemaValidation { .. }));
}

#[tokio::test]
async fn reposted_videos_thread_cursor_and_search_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(USER_REPOSTED_VIDEOS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "user_reposted_videos": [video(1)],
            "cursor": 1703000000,
            "has_more": true,
            "search_id": "r1"
        }))))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(USER_REPOSTED_VIDEOS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "user_reposted_videos": [],
            "cursor": 1702000000,
            "has_more": false,
            "search_id": "r1"
        }))))
        .mount(&server)
        .await;

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let videos: Vec<Video> = test_client(&server)
        .query_user_reposted_videos("tiktok", start, 10)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(videos.len(), 1);
    let bodies = bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[1]["cursor"], 1703000000);
    assert_eq!(bodies[1]["search_id"], "r1");
}

#[tokio::test]
async fn empty_query_fails_before_any_request() {
    let server = MockServer::start().await;
    let request = QueryVideosRequest::new(
        VideoQuery::new(),
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
    );

    let err = test_client(&server)
        .query_videos(&request)
        .try_collect::<Vec<Video>>()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ResearchError::InvalidQuery(BuildQueryError::EmptyQuery)
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn token_exchange_posts_client_credentials_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/oauth/token/"))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "clt.fresh",
            "expires_in": 7200,
            "token_type": "Bearer"
        })))
        .mount(&server)
        .await;

    let auth = ResearchAuth::new("key", "secret", &test_config(&server)).unwrap();
    let token = auth.create_bearer_token().await.unwrap();
    assert_eq!(token.as_str(), "clt.fresh");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let form = String::from_utf8(requests[0].body.clone()).unwrap();
    assert_eq!(
        form,
        "client_key=key&client_secret=secret&grant_type=client_credentials"
    );
}

#[tokio::test]
async fn token_exchange_failure_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/oauth/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "Client key or secret is incorrect."
        })))
        .mount(&server)
        .await;

    let auth = ResearchAuth::new("key", "wrong", &test_config(&server)).unwrap();
    let err = auth.create_bearer_token().await.unwrap_err();

    assert!(matches!(err, ResearchError::Authentication(_)));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
