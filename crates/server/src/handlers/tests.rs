use std::str::FromStr;
use std::sync::{Arc, Mutex};

use anicards_core::anilist::AniListClient;
use anicards_core::domain::model::CardColors;
use anicards_core::ports::http::{GraphqlHttp, PostResult};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tower::ServiceExt;

use super::router;
use crate::app_state::AppState;
use crate::schema::execute_schema_sqlite;

/// AniList stand-in whose stats answer can be swapped mid-test.
struct StubAniList {
    stats: Mutex<PostResult>,
}

#[async_trait::async_trait]
impl GraphqlHttp for StubAniList {
    async fn post_json(&self, _url: &str, payload: &Value) -> PostResult {
        let query = payload["query"].as_str().unwrap_or_default();
        if query.contains("statistics") {
            self.stats.lock().unwrap().clone()
        } else {
            PostResult::ok(200, json!({ "data": { "User": { "id": 4242 } } }).to_string())
        }
    }
}

fn stats_body() -> PostResult {
    let body = json!({
        "data": {
            "User": {
                "statistics": {
                    "anime": {
                        "count": 120, "episodesWatched": 2400, "minutesWatched": 57600,
                        "meanScore": 78.2, "standardDeviation": 11.4,
                        "genres": [
                            { "genre": "Action", "count": 40 },
                            { "genre": "Drama", "count": 10 }
                        ],
                        "tags": [], "voiceActors": [], "studios": [], "staff": []
                    },
                    "manga": {
                        "count": 15, "chaptersRead": 900, "volumesRead": 80,
                        "meanScore": 81.0, "standardDeviation": 9.1,
                        "genres": [], "tags": [], "staff": []
                    }
                },
                "stats": { "activityHistory": [{ "amount": 4 }] }
            },
            "followersPage": { "pageInfo": { "total": 11 } },
            "followingPage": { "pageInfo": { "total": 9 } },
            "threadsPage": { "pageInfo": { "total": 2 } },
            "threadCommentsPage": { "pageInfo": { "total": 5 } },
            "reviewsPage": { "pageInfo": { "total": 1 } }
        }
    });
    PostResult::ok(200, body.to_string())
}

async fn test_app() -> (Router, Arc<StubAniList>, SqlitePool) {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    execute_schema_sqlite(&pool, include_str!("../../res/sql/sqlite/schema.sql"))
        .await
        .unwrap();

    let stub = Arc::new(StubAniList {
        stats: Mutex::new(stats_body()),
    });
    let state = AppState {
        sqlite: Some(pool.clone()),
        postgres: None,
        anilist: AniListClient::new(stub.clone(), "http://anilist.test"),
        default_colors: CardColors::default(),
    };
    (router(state), stub, pool)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<(String, String)>, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post_form(app: &Router, uri: &str, form: &str) -> (StatusCode, Vec<(String, String)>, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Vec<(String, String)>, String) {
    let status = response.status();
    let headers = response
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

#[tokio::test]
async fn static_pages_render() {
    let (app, _, _) = test_app().await;

    let (status, _, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, _, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>AniCards Home</title>"));
    assert!(body.contains("<h1>Welcome to AniCards</h1>"));

    let (_, _, body) = get(&app, "/faq").await;
    assert!(body.contains("<title>AniCards FAQ</title>"));
    assert!(body.contains("<h1>Frequently Asked Questions</h1>"));

    let (status, _, body) = get(&app, "/StatCards").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>AniList Stat Cards Generator</title>"));
    assert!(body.contains(r#"<input type="text" id="usernameInput" placeholder="Enter username"/>"#));
    assert!(body.contains(r#"<form id="colorForm" action="/username/generate_svgs" method="post">"#));
    assert!(body.contains(r#"<form id="dataForm" action="/username/generate_svgs" method="post">"#));
    assert!(body.contains(r#"value="animeVoiceActors""#));
}

#[tokio::test]
async fn username_redirects_to_user_page() {
    let (app, _, _) = test_app().await;
    let (status, headers, _) = get(&app, "/Alpha49").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(header_value(&headers, "location"), Some("/StatCards/Alpha49"));
}

#[tokio::test]
async fn generate_then_serve_cards() {
    let (app, _, _) = test_app().await;

    let (status, headers, _) = post_form(
        &app,
        "/Alpha49/generate_svgs",
        "keys=animeStats&keys=animeGenres&keys=socialStats&titleColor=%23ff0000",
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(header_value(&headers, "location"), Some("/StatCards/Alpha49"));

    let (status, headers, svg) = get(&app, "/get_svg/Alpha49/animeStats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(header_value(&headers, "content-type"), Some("image/svg+xml"));
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Alpha49"));
    assert!(svg.contains("#ff0000"));

    let (status, _, page) = get(&app, "/StatCards/Alpha49").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains(r#"<div class="svg-container">"#));
    assert_eq!(page.matches(r#"<div class="svg-item">"#).count(), 3);
    assert!(page.contains(r#"alt="SVG image of animeStats""#));
    assert!(page.contains(r#"alt="SVG image of socialStats""#));
    assert!(page.contains("data:image/svg+xml;base64,"));

    let (status, _, body) = get(&app, "/v1/users/Alpha49/statcards").await;
    assert_eq!(status, StatusCode::OK);
    let summary: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(summary["username"], "Alpha49");
    assert_eq!(summary["keys"], json!(["animeStats", "animeGenres", "socialStats"]));
    assert_eq!(summary["colors"]["title"], "#ff0000");
    assert_eq!(summary["card_type"], "Default");
}

#[tokio::test]
async fn regenerating_replaces_previous_cards() {
    let (app, _, _) = test_app().await;

    post_form(&app, "/Alpha49/generate_svgs", "keys=animeStats&keys=mangaStats").await;
    let (status, _, _) = post_form(&app, "/Alpha49/generate_svgs", "keys=socialStats").await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (status, _, _) = get(&app, "/get_svg/Alpha49/animeStats").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _, _) = get(&app, "/get_svg/Alpha49/socialStats").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn upstream_failure_keeps_stored_cards() {
    let (app, stub, _) = test_app().await;
    post_form(&app, "/Alpha49/generate_svgs", "keys=animeStats").await;

    *stub.stats.lock().unwrap() = PostResult::ok(429, "{}");
    let (status, _, body) = post_form(&app, "/Alpha49/generate_svgs", "keys=mangaStats").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    let envelope: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(envelope["error"]["code"], "rate_limited");

    let (status, _, _) = get(&app, "/get_svg/Alpha49/animeStats").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn bad_input_is_rejected() {
    let (app, _, _) = test_app().await;

    let (status, _, _) = post_form(&app, "/Alpha49/generate_svgs", "keys=animeFoo").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = post_form(&app, "/Alpha49/generate_svgs", "titleColor=%23fff").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = post_form(&app, "/Alpha49/generate_svgs", "keys=animeStats&circleColor=red").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = get(&app, "/get_svg/Alpha49/notAKey").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = get(&app, "/StatCards/bad%20name").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_user_pages_are_not_found() {
    let (app, _, _) = test_app().await;

    let (status, _, body) = get(&app, "/StatCards/Nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let envelope: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(envelope["error"]["code"], "not_found");

    let (status, _, _) = get(&app, "/v1/users/Nobody/statcards").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn failed_store_rolls_back_to_previous_cards() {
    let (app, _, pool) = test_app().await;
    post_form(&app, "/Alpha49/generate_svgs", "keys=animeStats&keys=mangaStats").await;

    // Fails after the old rows are deleted and the new statcard is written.
    sqlx::query(
        "CREATE TRIGGER reject_svgs BEFORE INSERT ON svgs \
         BEGIN SELECT RAISE(ABORT, 'svg store unavailable'); END",
    )
    .execute(&pool)
    .await
    .unwrap();

    let (status, _, _) = post_form(&app, "/Alpha49/generate_svgs", "keys=socialStats").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let keys: String = sqlx::query_scalar(
        "SELECT s.keys FROM statcards s JOIN users u ON u.id = s.user_id WHERE u.username = ?1",
    )
    .bind("Alpha49")
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(keys, "animeStats,mangaStats");

    let (status, _, _) = get(&app, "/get_svg/Alpha49/animeStats").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = get(&app, "/get_svg/Alpha49/mangaStats").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = get(&app, "/get_svg/Alpha49/socialStats").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
