//! # Integration Tests for booking-api
//!
//! Drives the assembled router end to end with the in-memory record store
//! and static credential tables: authentication, booking CRUD, caller
//! account lookup, error mapping, health checks, metrics, and OpenAPI.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use booking_api::AppState;
use booking_auth::fixed::{StaticTokenVerifier, StaticUserDirectory};
use booking_auth::UserRecord;
use booking_core::{Booking, BookingId};
use booking_store::{BookingCollection, BookingDraft, BookingGateway, StoreError};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

const TOKEN: &str = "test-token";
const EMAIL: &str = "ada@example.com";

fn tokens() -> StaticTokenVerifier {
    StaticTokenVerifier::new().with_email(TOKEN, EMAIL)
}

fn users() -> StaticUserDirectory {
    StaticUserDirectory::new().with_user(UserRecord::with_email("uid-ada", EMAIL))
}

/// Helper: in-memory store, one known token, one known account.
fn test_app() -> axum::Router {
    booking_api::app(AppState::with_static_auth(
        BookingGateway::in_memory(),
        tokens(),
        users(),
    ))
}

fn app_with_gateway(gateway: BookingGateway) -> axum::Router {
    booking_api::app(AppState::with_static_auth(gateway, tokens(), users()))
}

fn authed(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {TOKEN}"))
}

fn get(uri: &str) -> Request<Body> {
    authed("GET", uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    authed("POST", uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

/// Collection that counts calls and stores nothing.
#[derive(Default)]
struct CountingCollection {
    calls: AtomicUsize,
}

#[async_trait]
impl BookingCollection for CountingCollection {
    async fn insert(&self, _draft: &BookingDraft) -> Result<BookingId, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(BookingId::generate())
    }

    async fn find_all(&self) -> Result<Vec<Booking>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: BookingId) -> Result<Option<Booking>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Collection whose backend is unreachable.
struct DownCollection;

#[async_trait]
impl BookingCollection for DownCollection {
    async fn insert(&self, _draft: &BookingDraft) -> Result<BookingId, StoreError> {
        Err(StoreError::StorageWriteError("connection reset".into()))
    }

    async fn find_all(&self) -> Result<Vec<Booking>, StoreError> {
        Err(StoreError::StorageUnavailable("connection refused".into()))
    }

    async fn find_by_id(&self, _id: BookingId) -> Result<Option<Booking>, StoreError> {
        Err(StoreError::StorageUnavailable("connection refused".into()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::StorageUnavailable("connection refused".into()))
    }
}

// -- Ping ---------------------------------------------------------------------

#[tokio::test]
async fn test_ping_returns_hello_world() {
    let response = test_app().oneshot(get("/api/ping")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"message": "Hello World"})
    );
}

#[tokio::test]
async fn test_ping_requires_credential() {
    let response = test_app()
        .oneshot(Request::get("/api/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("missing"));
}

// -- Authentication -----------------------------------------------------------

#[tokio::test]
async fn test_unknown_token_is_rejected() {
    let response = test_app()
        .oneshot(
            Request::get("/api/bookings")
                .header("authorization", "Bearer nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "invalid token");
}

#[tokio::test]
async fn test_header_without_scheme_is_rejected() {
    let response = test_app()
        .oneshot(
            Request::get("/api/bookings")
                .header("authorization", TOKEN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "invalid token format");
}

#[tokio::test]
async fn test_rejected_request_never_reaches_storage() {
    let collection = Arc::new(CountingCollection::default());
    let app = app_with_gateway(BookingGateway::new(collection.clone()));

    let response = app
        .oneshot(
            Request::post("/api/bookings/add")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"Room 1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(collection.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_token_verified_once_per_request() {
    let tokens = tokens();
    let counter = tokens.call_counter();
    let app = booking_api::app(AppState::with_static_auth(
        BookingGateway::in_memory(),
        tokens,
        users(),
    ));

    let response = app
        .oneshot(post_json("/api/bookings/add", r#"{"name":"Room 1"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(counter.get(), 1);
}

#[tokio::test]
async fn test_identity_provider_outage_is_500() {
    let app = booking_api::app(AppState::with_static_auth(
        BookingGateway::in_memory(),
        StaticTokenVerifier::unavailable(),
        users(),
    ));
    let response = app.oneshot(get("/api/ping")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// -- Bookings -----------------------------------------------------------------

#[tokio::test]
async fn test_create_then_fetch_booking() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json("/api/bookings/add", r#"{"name":"Conference room"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);
    assert_eq!(created["name"], "Conference room");
    assert_eq!(created["created_at"], created["updated_at"]);

    let response = app
        .oneshot(get(&format!("/api/bookings/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["id"], id.as_str());
    assert_eq!(fetched["name"], "Conference room");
    assert_eq!(fetched["created_at"], created["created_at"]);
}

#[tokio::test]
async fn test_list_returns_every_booking() {
    let app = test_app();

    let response = app.clone().oneshot(get("/api/bookings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));

    for name in ["A", "B", "C"] {
        let body = serde_json::json!({ "name": name }).to_string();
        let response = app
            .clone()
            .oneshot(post_json("/api/bookings/add", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.oneshot(get("/api/bookings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    let mut names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    names.sort_unstable();
    assert_eq!(names, ["A", "B", "C"]);
}

#[tokio::test]
async fn test_malformed_id_is_400_without_storage_call() {
    let collection = Arc::new(CountingCollection::default());
    let app = app_with_gateway(BookingGateway::new(collection.clone()));

    let response = app.oneshot(get("/api/bookings/not-an-id")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
    assert_eq!(collection.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_id_is_404() {
    let response = test_app()
        .oneshot(get("/api/bookings/65f1a2b3c4d5e6f708192a3b"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("65f1a2b3c4d5e6f708192a3b"));
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let response = test_app()
        .oneshot(post_json("/api/bookings/add", "{not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .starts_with("invalid payload"));
}

#[tokio::test]
async fn test_missing_name_is_400() {
    let response = test_app()
        .oneshot(post_json("/api/bookings/add", r#"{"title":"x"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_name_is_400() {
    let collection = Arc::new(CountingCollection::default());
    let app = app_with_gateway(BookingGateway::new(collection.clone()));

    let response = app
        .oneshot(post_json("/api/bookings/add", r#"{"name":""}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(collection.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_storage_failure_is_500() {
    let app = app_with_gateway(BookingGateway::new(Arc::new(DownCollection)));

    let response = app.clone().oneshot(get("/api/bookings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(response).await["error"].is_string());

    let response = app
        .oneshot(post_json("/api/bookings/add", r#"{"name":"x"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_get_on_add_path_is_not_an_id_lookup() {
    let response = test_app().oneshot(get("/api/bookings/add")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// -- Caller Account -----------------------------------------------------------

#[tokio::test]
async fn test_user_and_verify_return_account() {
    for path in ["/api/user", "/api/verify"] {
        let response = test_app().oneshot(get(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let body = body_json(response).await;
        assert_eq!(body["userData"]["uid"], "uid-ada");
        assert_eq!(body["userData"]["email"], EMAIL);
    }
}

#[tokio::test]
async fn test_user_without_account_is_404() {
    let app = booking_api::app(AppState::with_static_auth(
        BookingGateway::in_memory(),
        tokens(),
        StaticUserDirectory::new(),
    ));
    let response = app.oneshot(get("/api/user")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "User record not found");
}

#[tokio::test]
async fn test_directory_outage_is_500() {
    let app = booking_api::app(AppState::with_static_auth(
        BookingGateway::in_memory(),
        tokens(),
        StaticUserDirectory::unavailable(),
    ));
    let response = app.oneshot(get("/api/verify")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// -- Health Checks ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_check() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health/liveness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_check() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health/readiness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

#[tokio::test]
async fn test_readiness_fails_when_store_is_down() {
    let app = app_with_gateway(BookingGateway::new(Arc::new(DownCollection)));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/readiness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// -- Metrics & OpenAPI --------------------------------------------------------

#[tokio::test]
async fn test_metrics_count_requests() {
    let app = test_app();
    let response = app.clone().oneshot(get("/api/ping")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("booking_api_requests_total 1"));
}

#[tokio::test]
async fn test_openapi_spec_is_served() {
    let response = test_app()
        .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let spec = body_json(response).await;
    assert!(spec["openapi"].as_str().unwrap().starts_with("3."));
    assert!(spec["paths"]["/api/bookings/add"]["post"].is_object());
}
