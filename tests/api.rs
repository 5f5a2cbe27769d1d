//! End-to-end tests for the HTTP API.
//!
//! Every test builds its own router over a fresh store and a dictionary-backed
//! translator, then drives it with `oneshot` requests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use parallel_diary::create_router;
use parallel_diary::data::repositories::{DiaryStore, MemoryStore, SqliteStore};
use parallel_diary::features::auth::TokenIssuer;
use parallel_diary::features::translation::{TranslationError, TranslationService, Translator};
use parallel_diary::state::AppState;

// =============================================================================
// Helpers
// =============================================================================

const SECRET: &str = "test-secret";

/// Known phrases come from the table, anything else gets an `EN:` prefix.
struct DictionaryTranslator(HashMap<&'static str, &'static str>);

impl DictionaryTranslator {
    fn new() -> Self {
        Self(HashMap::from([
            ("こんにちは", "Hello"),
            ("こんばんは", "Good evening"),
            ("ありがとう", "Thank you"),
        ]))
    }
}

#[async_trait]
impl Translator for DictionaryTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        Ok(self
            .0
            .get(text)
            .map(|t| t.to_string())
            .unwrap_or_else(|| format!("EN:{text}")))
    }
}

struct OfflineTranslator;

#[async_trait]
impl Translator for OfflineTranslator {
    async fn translate(&self, _text: &str) -> Result<String, TranslationError> {
        Err(TranslationError::UnexpectedResponse("service offline".into()))
    }
}

fn state_with(store: Arc<dyn DiaryStore>, translator: impl Translator + 'static) -> AppState {
    AppState::new(
        store,
        TranslationService::new(translator),
        TokenIssuer::new(SECRET, chrono::Duration::days(7)),
    )
    .with_bcrypt_cost(4)
}

fn make_app() -> Router {
    create_router(state_with(
        Arc::new(MemoryStore::new()),
        DictionaryTranslator::new(),
    ))
}

fn make_sqlite_app() -> Router {
    create_router(state_with(
        Arc::new(SqliteStore::in_memory().unwrap()),
        DictionaryTranslator::new(),
    ))
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/register",
            None,
            json!({ "email": email, "password": "password123", "name": "Taro" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    body["access_token"].as_str().unwrap().to_string()
}

async fn create_entry(app: &Router, token: &str, content: &str) -> Value {
    let (status, body) = send(
        app,
        json_request("POST", "/diary", Some(token), json!({ "content": content })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    body
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn healthz_reports_ok() {
    let app = make_app();
    let (status, body) = send(&app, empty_request("GET", "/healthz", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn register_returns_bearer_token_usable_on_me() {
    let app = make_app();
    let token = register(&app, "taro@example.com").await;

    let (status, body) = send(&app, empty_request("GET", "/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "taro@example.com");
    assert_eq!(body["name"], "Taro");
    assert!(body.get("hashed_password").is_none());
}

#[tokio::test]
async fn register_reports_bearer_token_type() {
    let app = make_app();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/register",
            None,
            json!({ "email": "taro@example.com", "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = make_app();
    register(&app, "taro@example.com").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/register",
            None,
            json!({ "email": "taro@example.com", "password": "different123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn invalid_registration_is_bad_request() {
    let app = make_app();
    for payload in [
        json!({ "email": "not-an-email", "password": "password123" }),
        json!({ "email": "taro@example.com", "password": "short" }),
    ] {
        let (status, _) = send(&app, json_request("POST", "/register", None, payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn auth_forms_missing_fields_are_bad_request() {
    let app = make_app();
    register(&app, "taro@example.com").await;

    for (uri, payload) in [
        ("/register", json!({ "email": "hanako@example.com" })),
        ("/login", json!({ "email": "taro@example.com" })),
        ("/login", json!({ "password": "password123" })),
    ] {
        let (status, body) = send(&app, json_request("POST", uri, None, payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["status"], 400);
        assert!(body["error"].is_string());
    }

    let (_, body) = send(
        &app,
        json_request("POST", "/register", None, json!({ "email": "jiro@example.com" })),
    )
    .await;
    assert!(body["error"].as_str().unwrap().contains("password"));
}

#[tokio::test]
async fn login_with_correct_password_succeeds() {
    let app = make_app();
    register(&app, "taro@example.com").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/login",
            None,
            json!({ "email": "taro@example.com", "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap();

    let (status, _) = send(&app, empty_request("GET", "/me", Some(token))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = make_app();
    register(&app, "taro@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            None,
            json!({ "email": "taro@example.com", "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
}

#[tokio::test]
async fn login_with_unknown_email_is_unauthorized() {
    let app = make_app();
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/login",
            None,
            json!({ "email": "nobody@example.com", "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn entity_routes_require_a_valid_token() {
    let app = make_app();

    let (status, _) = send(&app, empty_request("GET", "/diary", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, empty_request("GET", "/me", Some("garbage"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request("POST", "/diary", None, json!({ "content": "こんにちは" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_from_another_secret_is_rejected() {
    let app = make_app();
    register(&app, "taro@example.com").await;

    let foreign = TokenIssuer::new("other-secret", chrono::Duration::days(7));
    let user = parallel_diary::data::models::User {
        id: "someone".to_string(),
        email: "taro@example.com".to_string(),
        name: None,
        picture: None,
        hashed_password: None,
        created_at: chrono::Utc::now().naive_utc(),
    };
    let token = foreign.issue(&user).unwrap();

    let (status, _) = send(&app, empty_request("GET", "/me", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn oauth_routes_answer_unavailable_without_credentials() {
    let app = make_app();
    let (status, _) = send(&app, empty_request("GET", "/auth/login", None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = send(
        &app,
        empty_request("GET", "/auth/callback?code=abc&state=xyz", None),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// Diary entries
// =============================================================================

#[tokio::test]
async fn diary_lifecycle() {
    let app = make_app();
    let token = register(&app, "taro@example.com").await;

    let entry = create_entry(&app, &token, "こんにちは").await;
    assert_eq!(entry["content"], "こんにちは");
    assert_eq!(entry["translated_content"], "Hello");
    assert!(entry["updated_at"].is_null());
    assert_eq!(entry["favorite_expressions"], json!([]));
    assert!(entry.get("user_id").is_none());
    let id = entry["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(
        &app,
        empty_request("GET", &format!("/diary/{id}"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, entry);

    let (status, body) = send(
        &app,
        empty_request("DELETE", &format!("/diary/{id}"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Diary entry deleted successfully");

    let (status, _) = send(
        &app,
        empty_request("GET", &format!("/diary/{id}"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_always_retranslates() {
    let app = make_app();
    let token = register(&app, "taro@example.com").await;
    let entry = create_entry(&app, &token, "こんにちは").await;
    let id = entry["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        json_request(
            "PUT",
            &format!("/diary/{id}"),
            Some(&token),
            json!({ "content": "こんばんは" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["content"], "こんばんは");
    assert_eq!(updated["translated_content"], "Good evening");
    assert!(updated["updated_at"].is_string());
    assert_eq!(updated["created_at"], entry["created_at"]);

    let (_, again) = send(
        &app,
        json_request(
            "PUT",
            &format!("/diary/{id}"),
            Some(&token),
            json!({ "content": "こんばんは！" }),
        ),
    )
    .await;
    assert_eq!(again["translated_content"], "EN:こんばんは！");
}

#[tokio::test]
async fn empty_content_is_bad_request() {
    let app = make_app();
    let token = register(&app, "taro@example.com").await;

    let (status, _) = send(
        &app,
        json_request("POST", "/diary", Some(&token), json!({ "content": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let entry = create_entry(&app, &token, "ありがとう").await;
    let id = entry["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/diary/{id}"),
            Some(&token),
            json!({ "content": "" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_diary_bodies_are_bad_request() {
    let app = make_app();
    let token = register(&app, "taro@example.com").await;
    let entry = create_entry(&app, &token, "こんにちは").await;
    let id = entry["id"].as_str().unwrap();

    for request in [
        json_request("POST", "/diary", Some(&token), json!({})),
        json_request("PUT", &format!("/diary/{id}"), Some(&token), json!({})),
        json_request("POST", "/diary", Some(&token), json!({ "content": 42 })),
        json_request(
            "POST",
            &format!("/diary/{id}/favorite"),
            Some(&token),
            json!({ "japanese_text": "こんにちは" }),
        ),
    ] {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
        assert!(body["error"].is_string());
    }

    let (_, unchanged) = send(
        &app,
        empty_request("GET", &format!("/diary/{id}"), Some(&token)),
    )
    .await;
    assert_eq!(unchanged["content"], "こんにちは");
}

#[tokio::test]
async fn body_without_json_content_type_is_bad_request() {
    let app = make_app();
    let token = register(&app, "taro@example.com").await;

    let request = Request::builder()
        .method("POST")
        .uri("/diary")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(r#"{"content":"こんにちは"}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn unknown_entry_is_not_found() {
    let app = make_app();
    let token = register(&app, "taro@example.com").await;

    for request in [
        empty_request("GET", "/diary/does-not-exist", Some(&token)),
        empty_request("DELETE", "/diary/does-not-exist", Some(&token)),
        json_request(
            "PUT",
            "/diary/does-not-exist",
            Some(&token),
            json!({ "content": "こんにちは" }),
        ),
        json_request(
            "POST",
            "/diary/does-not-exist/favorite",
            Some(&token),
            json!({ "japanese_text": "猫", "english_text": "cat" }),
        ),
    ] {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
    }
}

#[tokio::test]
async fn users_cannot_reach_each_others_entries() {
    let app = make_app();
    let taro = register(&app, "taro@example.com").await;
    let hanako = register(&app, "hanako@example.com").await;

    let entry = create_entry(&app, &taro, "こんにちは").await;
    let id = entry["id"].as_str().unwrap();

    for request in [
        empty_request("GET", &format!("/diary/{id}"), Some(&hanako)),
        empty_request("DELETE", &format!("/diary/{id}"), Some(&hanako)),
        json_request(
            "PUT",
            &format!("/diary/{id}"),
            Some(&hanako),
            json!({ "content": "乗っ取り" }),
        ),
        json_request(
            "POST",
            &format!("/diary/{id}/favorite"),
            Some(&hanako),
            json!({ "japanese_text": "こんにちは", "english_text": "Hello" }),
        ),
    ] {
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let (_, hanako_entries) = send(&app, empty_request("GET", "/diary", Some(&hanako))).await;
    assert_eq!(hanako_entries, json!([]));

    let (status, still_there) = send(
        &app,
        empty_request("GET", &format!("/diary/{id}"), Some(&taro)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(still_there["content"], "こんにちは");
    assert_eq!(still_there["favorite_expressions"], json!([]));
}

#[tokio::test]
async fn listing_returns_own_entries_newest_first() {
    let app = make_app();
    let token = register(&app, "taro@example.com").await;
    let first = create_entry(&app, &token, "こんにちは").await;
    let second = create_entry(&app, &token, "ありがとう").await;

    let (status, entries) = send(&app, empty_request("GET", "/diary", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![second["id"].as_str().unwrap(), first["id"].as_str().unwrap()]
    );
}

#[tokio::test]
async fn translation_outage_still_saves_the_entry() {
    let app = create_router(state_with(Arc::new(MemoryStore::new()), OfflineTranslator));
    let token = register(&app, "taro@example.com").await;

    let entry = create_entry(&app, &token, "こんにちは").await;
    assert_eq!(
        entry["translated_content"],
        "[Translation error: unexpected response: service offline]"
    );
}

#[tokio::test]
async fn diary_routes_are_also_served_under_api() {
    let app = make_app();
    let token = register(&app, "taro@example.com").await;

    let (status, entry) = send(
        &app,
        json_request(
            "POST",
            "/api/diary",
            Some(&token),
            json!({ "content": "こんにちは" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, entries) = send(&app, empty_request("GET", "/diary", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entries[0]["id"], entry["id"]);
}

// =============================================================================
// Favorites
// =============================================================================

#[tokio::test]
async fn favorites_attach_to_entries_and_die_with_them() {
    let app = make_app();
    let token = register(&app, "taro@example.com").await;
    let entry = create_entry(&app, &token, "こんにちは").await;
    let id = entry["id"].as_str().unwrap();

    let (status, favorite) = send(
        &app,
        json_request(
            "POST",
            &format!("/diary/{id}/favorite"),
            Some(&token),
            json!({ "japanese_text": "こんにちは", "english_text": "Hello", "note": "greeting" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(favorite["diary_entry_id"], id);
    assert_eq!(favorite["note"], "greeting");

    let (_, fetched) = send(
        &app,
        empty_request("GET", &format!("/diary/{id}"), Some(&token)),
    )
    .await;
    assert_eq!(fetched["favorite_expressions"], json!([favorite.clone()]));

    let (_, favorites) = send(&app, empty_request("GET", "/favorites", Some(&token))).await;
    assert_eq!(favorites, json!([favorite]));

    send(
        &app,
        empty_request("DELETE", &format!("/diary/{id}"), Some(&token)),
    )
    .await;

    let (status, favorites) = send(&app, empty_request("GET", "/favorites", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(favorites, json!([]));
}

#[tokio::test]
async fn favorites_are_listed_per_user() {
    let app = make_app();
    let taro = register(&app, "taro@example.com").await;
    let hanako = register(&app, "hanako@example.com").await;

    let entry = create_entry(&app, &taro, "ありがとう").await;
    let id = entry["id"].as_str().unwrap();
    send(
        &app,
        json_request(
            "POST",
            &format!("/diary/{id}/favorite"),
            Some(&taro),
            json!({ "japanese_text": "ありがとう", "english_text": "Thank you" }),
        ),
    )
    .await;

    let (_, taro_favorites) = send(&app, empty_request("GET", "/favorites", Some(&taro))).await;
    assert_eq!(taro_favorites.as_array().unwrap().len(), 1);
    assert!(taro_favorites[0]["note"].is_null());

    let (_, hanako_favorites) =
        send(&app, empty_request("GET", "/favorites", Some(&hanako))).await;
    assert_eq!(hanako_favorites, json!([]));
}

// =============================================================================
// SQLite-backed store
// =============================================================================

#[tokio::test]
async fn sqlite_store_serves_the_same_flow() {
    let app = make_sqlite_app();
    let taro = register(&app, "taro@example.com").await;
    let hanako = register(&app, "hanako@example.com").await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/register",
            None,
            json!({ "email": "taro@example.com", "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let entry = create_entry(&app, &taro, "こんにちは").await;
    assert_eq!(entry["translated_content"], "Hello");
    let id = entry["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        empty_request("GET", &format!("/diary/{id}"), Some(&hanako)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    send(
        &app,
        json_request(
            "POST",
            &format!("/diary/{id}/favorite"),
            Some(&taro),
            json!({ "japanese_text": "こんにちは", "english_text": "Hello" }),
        ),
    )
    .await;

    let (_, updated) = send(
        &app,
        json_request(
            "PUT",
            &format!("/diary/{id}"),
            Some(&taro),
            json!({ "content": "こんばんは" }),
        ),
    )
    .await;
    assert_eq!(updated["translated_content"], "Good evening");
    assert_eq!(updated["favorite_expressions"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        empty_request("DELETE", &format!("/diary/{id}"), Some(&taro)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, favorites) = send(&app, empty_request("GET", "/favorites", Some(&taro))).await;
    assert_eq!(favorites, json!([]));

    let (status, _) = send(
        &app,
        empty_request("GET", &format!("/diary/{id}"), Some(&taro)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
