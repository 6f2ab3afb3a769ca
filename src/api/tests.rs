//! Tests for the API session

use super::*;
use crate::auth::AuthConfig;
use crate::error::{Error, FetchError};
use crate::http::HttpClientConfig;
use crate::types::{BackoffType, Cursor, JsonValue};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::ops::Range;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECOND_PAGE: i64 = 1_417_903_878_302_254_556;

fn test_api(server: &MockServer) -> Api {
    Api::builder()
        .http_config(
            HttpClientConfig::builder()
                .max_retries(0)
                .backoff(
                    BackoffType::Constant,
                    Duration::from_millis(5),
                    Duration::from_millis(5),
                )
                .build(),
        )
        .base_url(server.uri())
        .bearer_token("test-token")
        .build()
        .unwrap()
}

fn users(ids: Range<u64>) -> Vec<JsonValue> {
    ids.map(|id| json!({ "id": id, "screen_name": format!("user{id}") }))
        .collect()
}

fn ids(ids: Range<u64>) -> Vec<u64> {
    ids.collect()
}

fn page(key: &str, items: impl serde::Serialize, next: i64, previous: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        key: items,
        "next_cursor": next,
        "previous_cursor": previous,
    }))
}

/// Query pairs of every request the server has seen
async fn received_queries(server: &MockServer) -> Vec<Vec<(String, String)>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|req| req.url.query_pairs().into_owned().collect())
        .collect()
}

async fn mount_friend_ids(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/friends/ids.json"))
        .and(query_param("screen_name", "EricHolthaus"))
        .and(query_param("count", "5000"))
        .and(query_param("stringify_ids", "false"))
        .and(query_param("cursor", "-1"))
        .respond_with(page("ids", ids(0..5000), SECOND_PAGE, 0))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/friends/ids.json"))
        .and(query_param("cursor", SECOND_PAGE.to_string().as_str()))
        .respond_with(page("ids", ids(5000..6452), 0, -SECOND_PAGE))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Aggregated mode
// ============================================================================

#[tokio::test]
async fn test_friend_ids_aggregates_all_pages() {
    let server = MockServer::start().await;
    mount_friend_ids(&server).await;
    let api = test_api(&server);

    let result = api
        .get_friend_ids(&IdListOptions::for_screen_name("EricHolthaus"))
        .await
        .unwrap();

    assert_eq!(result.len(), 6452);
    assert_eq!(result[0], UserId::Numeric(0));
    assert_eq!(result[6451], UserId::Numeric(6451));
}

#[tokio::test]
async fn test_friend_ids_total_count_truncates_second_page() {
    let server = MockServer::start().await;
    mount_friend_ids(&server).await;
    let api = test_api(&server);

    let result = api
        .get_friend_ids(&IdListOptions::for_screen_name("EricHolthaus").total_count(5500))
        .await
        .unwrap();

    assert_eq!(result.len(), 5500);
    assert_eq!(result.last(), Some(&UserId::Numeric(5499)));
}

#[tokio::test]
async fn test_small_total_count_lowers_page_size() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/followers/ids.json"))
        .and(query_param("count", "10"))
        .respond_with(page("ids", ids(0..10), SECOND_PAGE, 0))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let result = api
        .get_follower_ids(&IdListOptions::for_user_id(12).total_count(10))
        .await
        .unwrap();

    assert_eq!(result.len(), 10);
}

#[tokio::test]
async fn test_total_count_zero_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let result = api
        .get_friends(&UserListOptions::for_screen_name("codebear").total_count(0))
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_followers_walk_for_authenticating_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/followers/list.json"))
        .and(query_param("cursor", "-1"))
        .and(query_param("count", "200"))
        .and(query_param("skip_status", "false"))
        .and(query_param("include_user_entities", "true"))
        .respond_with(page("users", users(0..200), 1_516_933_260_114_270_762, 0))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/followers/list.json"))
        .and(query_param("cursor", "1516933260114270762"))
        .respond_with(page("users", users(200..335), 0, 1_516_933_260_114_270_762))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let result = api.get_followers(&UserListOptions::new()).await.unwrap();

    assert_eq!(result.len(), 335);
    assert_eq!(result[200].screen_name, "user200");

    for query in received_queries(&server).await {
        assert!(query.iter().all(|(k, _)| k != "screen_name" && k != "user_id"));
    }
}

#[tokio::test]
async fn test_friends_walk_threads_cursors() {
    let server = MockServer::start().await;
    let cursors = [-1_i64, 101, 102, 103, 104];

    for (i, cursor) in cursors.iter().enumerate() {
        let next = cursors.get(i + 1).copied().unwrap_or(0);
        let start = i as u64 * 200;
        let end = if next == 0 { start + 19 } else { start + 200 };
        Mock::given(method("GET"))
            .and(path("/friends/list.json"))
            .and(query_param("cursor", cursor.to_string().as_str()))
            .respond_with(page("users", users(start..end), next, 0))
            .expect(1)
            .mount(&server)
            .await;
    }

    let api = test_api(&server);
    let result = api
        .get_friends(&UserListOptions::for_screen_name("codebear"))
        .await
        .unwrap();

    assert_eq!(result.len(), 819);
    let sent: Vec<String> = received_queries(&server)
        .await
        .into_iter()
        .filter_map(|q| q.into_iter().find(|(k, _)| k == "cursor").map(|(_, v)| v))
        .collect();
    assert_eq!(sent, vec!["-1", "101", "102", "103", "104"]);
}

#[tokio::test]
async fn test_error_on_second_page_discards_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/friends/ids.json"))
        .and(query_param("cursor", "-1"))
        .respond_with(page("ids", ids(0..5000), SECOND_PAGE, 0))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/friends/ids.json"))
        .and(query_param("cursor", SECOND_PAGE.to_string().as_str()))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{ "code": 89, "message": "Invalid or expired token." }]
        })))
        .mount(&server)
        .await;

    let api = test_api(&server);
    let err = api
        .get_friend_ids(&IdListOptions::for_screen_name("EricHolthaus"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Fetch(FetchError::Api { code: 89, .. })));
}

#[tokio::test]
async fn test_rate_limit_aborts_aggregation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/followers/ids.json"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "900"))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let err = api
        .get_follower_ids(&IdListOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Fetch(FetchError::RateLimited {
            retry_after_seconds: 900
        })
    ));
}

#[tokio::test]
async fn test_zero_budget_issues_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = test_api(&server).with_budget(Duration::ZERO);
    let err = api.get_friend_ids(&IdListOptions::new()).await.unwrap_err();

    assert!(matches!(err, Error::BudgetExceeded { pages: 0, .. }));
}

// ============================================================================
// Paged mode
// ============================================================================

#[tokio::test]
async fn test_friends_paged_returns_cursors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/friends/list.json"))
        .and(query_param("user_id", "12"))
        .and(query_param("cursor", "-1"))
        .and(query_param("count", "200"))
        .respond_with(page("users", users(0..200), 1_510_410_423_140_902_959, 0))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let result = api
        .get_friends_paged(&UserListOptions::for_user_id(12))
        .await
        .unwrap();

    assert_eq!(result.next_cursor, Cursor::new(1_510_410_423_140_902_959));
    assert_eq!(result.previous_cursor, Cursor::END);
    assert_eq!(result.items.len(), 200);
}

#[tokio::test]
async fn test_paged_resume_from_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/friends/list.json"))
        .and(query_param("cursor", "1494734862149901956"))
        .respond_with(page("users", users(0..3), 0, -1_494_734_862_149_901_956))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let (next, previous, items) = api
        .get_friends_paged(
            &UserListOptions::for_screen_name("codebear").cursor(1_494_734_862_149_901_956_i64),
        )
        .await
        .unwrap()
        .into_parts();

    assert!(next.is_end());
    assert_eq!(previous, Cursor::new(-1_494_734_862_149_901_956));
    assert_eq!(items.len(), 3);
}

#[tokio::test]
async fn test_follower_ids_paged_stringified() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/followers/ids.json"))
        .and(query_param("stringify_ids", "true"))
        .respond_with(page("ids", ["123", "456"], 0, 0))
        .mount(&server)
        .await;

    let api = test_api(&server);
    let result = api
        .get_follower_ids_paged(&IdListOptions::for_screen_name("codebear").stringify_ids(true))
        .await
        .unwrap();

    assert_eq!(
        result.items,
        vec![UserId::Text("123".into()), UserId::Text("456".into())]
    );
    assert!(result.is_last());
}

#[tokio::test]
async fn test_blocks_target_authenticating_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blocks/list.json"))
        .and(query_param("cursor", "-1"))
        .respond_with(page("users", users(0..2), 0, 0))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blocks/ids.json"))
        .respond_with(page("ids", ids(0..4), 0, 0))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let blocks = api
        .get_blocks(&UserListOptions::for_screen_name("ignored"))
        .await
        .unwrap();
    let block_ids = api.get_block_ids_paged(&IdListOptions::new()).await.unwrap();

    assert_eq!(blocks.len(), 2);
    assert_eq!(block_ids.len(), 4);
    for query in received_queries(&server).await {
        assert!(query.iter().all(|(k, _)| k != "screen_name"));
    }
}

// ============================================================================
// Validation
// ============================================================================

async fn server_expecting_nothing() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_graph_validation_happens_before_io() {
    let server = server_expecting_nothing().await;
    let api = test_api(&server);

    let err = api
        .get_follower_ids(&IdListOptions::for_screen_name("codebear").total_count("infinity"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { ref field, .. } if field == "total_count"));

    let err = api
        .get_friends(&UserListOptions::new().count(4000))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { ref field, .. } if field == "count"));

    let err = api
        .get_friends_paged(&UserListOptions::for_screen_name("codebear").user_id(12))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = api
        .get_friend_ids(&IdListOptions::new().count(5001))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_timeline_validation() {
    let server = server_expecting_nothing().await;
    let api = test_api(&server);

    for options in [
        TimelineOptions::new().count("literally infinity"),
        TimelineOptions::new().count(4000),
        TimelineOptions::new().max_id("a"),
        TimelineOptions::new().since_id("b"),
    ] {
        let err = api.get_home_timeline(&options).await.unwrap_err();
        assert!(err.is_validation(), "{options:?} gave {err}");
    }
}

#[tokio::test]
async fn test_list_timeline_requires_list_identity() {
    let server = server_expecting_nothing().await;
    let api = test_api(&server);

    let err = api
        .get_list_timeline(&ListTimelineOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let slug_only = ListTimelineOptions {
        slug: Some("space-nerds".into()),
        ..ListTimelineOptions::default()
    };
    let err = api.get_list_timeline(&slug_only).await.unwrap_err();
    assert!(err.is_validation());
}

// ============================================================================
// Single-shot endpoints
// ============================================================================

#[tokio::test]
async fn test_home_timeline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/statuses/home_timeline.json"))
        .and(query_param("count", "20"))
        .and(query_param("max_id", "960000000000000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "text": "first", "user": { "id": 12, "screen_name": "jack" } },
            { "id": 2, "text": "second" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let statuses = api
        .get_home_timeline(
            &TimelineOptions::new()
                .count(20)
                .max_id("960000000000000000"),
        )
        .await
        .unwrap();

    assert_eq!(statuses.len(), 2);
    assert_eq!(
        statuses[0].user.as_ref().map(|u| u.screen_name.as_str()),
        Some("jack")
    );
}

#[tokio::test]
async fn test_user_timeline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/statuses/user_timeline.json"))
        .and(query_param("screen_name", "kesuke"))
        .and(query_param("include_rts", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 3, "text": "x" }])))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let statuses = api
        .get_user_timeline(&UserTimelineOptions::for_screen_name("@kesuke").include_rts(false))
        .await
        .unwrap();

    assert_eq!(statuses[0].id, 3);
}

#[tokio::test]
async fn test_list_timeline_by_slug() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lists/statuses.json"))
        .and(query_param("slug", "space-nerds"))
        .and(query_param("owner_screen_name", "inky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let statuses = api
        .get_list_timeline(&ListTimelineOptions::for_slug("space-nerds", "inky"))
        .await
        .unwrap();

    assert!(statuses.is_empty());
}

#[tokio::test]
async fn test_search_without_term_is_empty() {
    let server = server_expecting_nothing().await;
    let api = test_api(&server);

    let statuses = api.get_search(&SearchOptions::default()).await.unwrap();
    assert!(statuses.is_empty());
}

#[tokio::test]
async fn test_search_term_and_raw_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/tweets.json"))
        .and(query_param("q", "python"))
        .and(query_param("result_type", "recent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statuses": [{ "id": 10, "text": "python" }],
            "search_metadata": {}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let by_term = api
        .get_search(&SearchOptions::for_term("python").result_type(ResultType::Recent))
        .await
        .unwrap();
    let by_raw = api
        .get_search(&SearchOptions::raw("q=python&result_type=recent&count=100"))
        .await
        .unwrap();

    assert_eq!(by_term, by_raw);
    assert_eq!(by_term[0].id, 10);
}

#[tokio::test]
async fn test_users_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/search.json"))
        .and(query_param("q", "python"))
        .and(query_param("count", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(users(0..20))))
        .mount(&server)
        .await;

    let api = test_api(&server);
    let found = api
        .get_users_search(&UsersSearchOptions::for_term("python").count(20))
        .await
        .unwrap();
    assert_eq!(found.len(), 20);

    let err = api
        .get_users_search(&UsersSearchOptions::for_term("python").count(21))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_verify_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/account/verify_credentials.json"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4012966701_u64,
            "screen_name": "notinourselves",
            "name": "notinourselves"
        })))
        .mount(&server)
        .await;

    let api = test_api(&server);
    let user = api.verify_credentials().await.unwrap();
    assert_eq!(user.id, 4_012_966_701);
    assert_eq!(user.name.as_deref(), Some("notinourselves"));
}

// ============================================================================
// Retweeters, profiles, favorites, trends
// ============================================================================

#[tokio::test]
async fn test_retweeters_aggregated_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/statuses/retweeters/ids.json"))
        .and(query_param("id", "397"))
        .and(query_param("cursor", "-1"))
        .respond_with(page("ids", ids(0..100), SECOND_PAGE, 0))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/statuses/retweeters/ids.json"))
        .and(query_param("id", "397"))
        .and(query_param("cursor", SECOND_PAGE.to_string().as_str()))
        .respond_with(page("ids", ids(100..130), 0, -SECOND_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let retweeters = api
        .get_retweeters(&RetweetersOptions::for_status(397))
        .await
        .unwrap();

    assert_eq!(retweeters.len(), 130);
    assert_eq!(retweeters[0], UserId::Numeric(0));
    for query in received_queries(&server).await {
        assert!(query.contains(&("count".to_string(), "100".to_string())));
        assert!(query.contains(&("stringify_ids".to_string(), "false".to_string())));
    }
}

#[tokio::test]
async fn test_retweeters_paged() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/statuses/retweeters/ids.json"))
        .and(query_param("id", "397"))
        .and(query_param("cursor", "-1"))
        .and(query_param("count", "10"))
        .respond_with(page("ids", ["1", "2"], 42, 0))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let result = api
        .get_retweeters_paged(
            &RetweetersOptions::for_status("397")
                .count(10)
                .stringify_ids(true),
        )
        .await
        .unwrap();

    assert_eq!(result.next_cursor, Cursor::new(42));
    assert_eq!(result.items, vec![UserId::Text("1".into()), UserId::Text("2".into())]);
}

#[tokio::test]
async fn test_lookup_validation_happens_before_io() {
    let server = server_expecting_nothing().await;
    let api = test_api(&server);

    let err = api
        .get_retweeters(&RetweetersOptions::for_status("not-a-status"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { ref field, .. } if field == "status_id"));

    let err = api
        .get_retweeters(&RetweetersOptions::for_status(397).count(101))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = api.get_user(&UserShowOptions::default()).await.unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { ref field, .. } if field == "user_id"));

    let err = api
        .get_user(&UserShowOptions {
            screen_name: Some("kesuke".into()),
            user_id: Some(718_443_u64.into()),
            include_entities: None,
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());

    for options in [
        UsersLookupOptions::new(),
        UsersLookupOptions::new().user_ids(0..101_u64),
        UsersLookupOptions::new().user_id("x"),
        UsersLookupOptions::new().screen_name("not a handle"),
    ] {
        let err = api.users_lookup(&options).await.unwrap_err();
        assert!(err.is_validation(), "{options:?} gave {err}");
    }

    let err = api
        .get_retweets(&RetweetsOptions::for_status(-5))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = api
        .get_favorites(&FavoritesOptions::new().count(201))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = api
        .get_trends(&TrendsOptions::for_woeid("earth"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { ref field, .. } if field == "woeid"));
}

#[tokio::test]
async fn test_get_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/show.json"))
        .and(query_param("user_id", "718443"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 718_443,
            "screen_name": "kesuke",
            "followers_count": 9
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let user = api
        .get_user(&UserShowOptions::for_user_id(718_443))
        .await
        .unwrap();

    assert_eq!(user.id, 718_443);
    assert_eq!(user.screen_name, "kesuke");
    assert_eq!(user.extra["followers_count"], 9);
}

#[tokio::test]
async fn test_users_lookup_joins_identifiers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/lookup.json"))
        .and(query_param("user_id", "718443,12"))
        .and(query_param("screen_name", "kesuke,jack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 718_443, "screen_name": "kesuke" },
            { "id": 12, "screen_name": "jack" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let found = api
        .users_lookup(
            &UsersLookupOptions::new()
                .user_ids([718_443_u64, 12])
                .screen_name("@kesuke")
                .screen_name("jack"),
        )
        .await
        .unwrap();

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].screen_name, "kesuke");
}

#[tokio::test]
async fn test_get_retweets() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/statuses/retweets/397.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 681_588_103_445_655_552_u64,
            "text": "RT @notinourselves: hello",
            "user": { "id": 3_656_548_634_u64, "screen_name": "example" }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let retweets = api
        .get_retweets(&RetweetsOptions::for_status(397))
        .await
        .unwrap();

    assert_eq!(retweets.len(), 1);
    assert_eq!(
        retweets[0].user.as_ref().map(|u| u.screen_name.as_str()),
        Some("example")
    );
}

#[tokio::test]
async fn test_get_favorites() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/favorites/list.json"))
        .and(query_param("include_entities", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 677_180_133_447_372_800_u64,
            "text": "Extremely helpful thread"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let favorites = api
        .get_favorites(&FavoritesOptions::new().include_entities(true))
        .await
        .unwrap();

    assert_eq!(favorites[0].id, 677_180_133_447_372_800);
    assert!(favorites[0].text.contains("Extremely"));
}

#[tokio::test]
async fn test_trends_current() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/trends/place.json"))
        .and(query_param("id", "1"))
        .and(query_param("exclude", "hashtags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "trends": [
                { "name": "Boxing Day", "query": "%22Boxing+Day%22", "tweet_volume": 35_000 },
                { "name": "Sunday Funday", "tweet_volume": null }
            ],
            "as_of": "2015-12-26T15:08:35Z",
            "locations": [{ "name": "Worldwide", "woeid": 1 }]
        }])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/trends/place.json"))
        .and(query_param("id", "2459115"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let trends = api.get_trends_current(true).await.unwrap();

    assert_eq!(trends.len(), 2);
    assert_eq!(trends[0].name, "Boxing Day");
    assert_eq!(trends[0].tweet_volume, Some(35_000));
    assert_eq!(trends[1].tweet_volume, None);

    let empty = api
        .get_trends(&TrendsOptions::for_woeid(2_459_115))
        .await
        .unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_help_configuration_fetched_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/help/configuration.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "short_url_length": 23,
            "short_url_length_https": 23,
            "characters_reserved_per_media": 24
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let config = api.get_help_configuration().await.unwrap();
    assert_eq!(config["characters_reserved_per_media"], 24);

    assert_eq!(api.get_short_url_length(false).await.unwrap(), 23);
    assert_eq!(api.get_short_url_length(true).await.unwrap(), 23);
}

#[tokio::test]
async fn test_short_url_length_missing_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/help/configuration.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let api = test_api(&server);
    let err = api.get_short_url_length(true).await.unwrap_err();
    assert!(matches!(err, Error::Fetch(FetchError::Decode { .. })));
}

// ============================================================================
// Credentials
// ============================================================================

#[test]
fn test_builder_rejects_key_without_secret() {
    let err = Api::builder().consumer_key("ck").build().unwrap_err();
    assert!(matches!(err, Error::MissingCredential { ref field } if field == "consumer_secret"));
}

#[tokio::test]
async fn test_clear_and_set_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/account/verify_credentials.json"))
        .and(header("Authorization", "Bearer replacement"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let mut api = test_api(&server);
    api.clear_credentials();
    assert!(!api.has_credentials());

    let err = api.verify_credentials().await.unwrap_err();
    assert!(matches!(err, Error::Fetch(FetchError::Auth { .. })));

    api.set_credentials(AuthConfig::bearer("replacement"));
    assert!(api.has_credentials());
    assert_eq!(api.verify_credentials().await.unwrap().id, 1);
}

#[tokio::test]
async fn test_app_only_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "bearer",
            "access_token": "app-token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blocks/ids.json"))
        .and(header("Authorization", "Bearer app-token"))
        .respond_with(page("ids", ids(0..3), 0, 0))
        .expect(2)
        .mount(&server)
        .await;

    let api = Api::builder()
        .base_url(server.uri())
        .consumer_key("ck")
        .consumer_secret("cs")
        .token_url(format!("{}/oauth2/token", server.uri()))
        .build()
        .unwrap();

    for _ in 0..2 {
        let result = api.get_block_ids(&IdListOptions::new()).await.unwrap();
        assert_eq!(result.len(), 3);
    }
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_aggregations_share_session() {
    let server = MockServer::start().await;
    mount_friend_ids(&server).await;

    Mock::given(method("GET"))
        .and(path("/followers/list.json"))
        .respond_with(page("users", users(0..7), 0, 0))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server);
    let friend_options = IdListOptions::for_screen_name("EricHolthaus");
    let follower_options = UserListOptions::for_screen_name("EricHolthaus");

    let (friend_ids, followers) = tokio::join!(
        api.get_friend_ids(&friend_options),
        api.get_followers(&follower_options),
    );

    assert_eq!(friend_ids.unwrap().len(), 6452);
    assert_eq!(followers.unwrap().len(), 7);
}
