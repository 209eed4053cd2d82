#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use http_body_util::BodyExt;
use prodtrack::app::{
    config::Config,
    mail::{EmailError, EmailMessage, EmailSender},
    AppState,
};
use prodtrack::create_router;
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tower::ServiceExt;

/// In-memory database with migrations applied. A single connection that never
/// recycles, so every query sees the same database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

/// Mailer that keeps every message for inspection.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
}

#[async_trait::async_trait]
impl EmailSender for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Mailer whose every delivery fails.
pub struct FailingMailer;

#[async_trait::async_trait]
impl EmailSender for FailingMailer {
    async fn send(&self, _message: &EmailMessage) -> Result<(), EmailError> {
        Err(EmailError::Send("connection refused".to_string()))
    }
}

pub fn test_router_with_mailer(pool: SqlitePool, mailer: Arc<dyn EmailSender>) -> axum::Router {
    let state = AppState {
        db: pool,
        mail: mailer,
        config: Config::for_tests(),
    };
    create_router(state)
}

pub fn test_router(pool: SqlitePool) -> axum::Router {
    test_router_with_mailer(pool, Arc::new(RecordingMailer::default()))
}

pub async fn test_app() -> (SqlitePool, axum::Router) {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    (pool, app)
}

/// Build a request, with a JSON body when one is given.
pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> http::Request<Body> {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request and return the status with the decoded body (`Null` when empty).
pub async fn send(app: &axum::Router, request: http::Request<Body>) -> (http::StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn get(app: &axum::Router, uri: &str, cookie: Option<&str>) -> (http::StatusCode, Value) {
    send(app, json_request("GET", uri, cookie, None)).await
}

pub async fn post(app: &axum::Router, uri: &str, cookie: Option<&str>, body: Value) -> (http::StatusCode, Value) {
    send(app, json_request("POST", uri, cookie, Some(body))).await
}

pub async fn patch(app: &axum::Router, uri: &str, cookie: Option<&str>, body: Value) -> (http::StatusCode, Value) {
    send(app, json_request("PATCH", uri, cookie, Some(body))).await
}

pub async fn delete(app: &axum::Router, uri: &str, cookie: Option<&str>) -> (http::StatusCode, Value) {
    send(app, json_request("DELETE", uri, cookie, None)).await
}

pub fn extract_session_id_from_cookie(set_cookie_header: &str) -> Option<&str> {
    set_cookie_header.split(';').next()?.strip_prefix("session_id=")
}

/// Sign up through the API and return a cookie header for authenticated requests.
pub async fn sign_up(app: &axum::Router, name: &str, email: &str) -> String {
    let request = json_request(
        "POST",
        "/api/auth/sign-up",
        None,
        Some(serde_json::json!({ "name": name, "email": email, "password": "Password123" })),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), http::StatusCode::CREATED);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap();
    let session_id = extract_session_id_from_cookie(set_cookie).unwrap();
    format!("session_id={}", session_id)
}

/// Create an organization as the cookie's user and return its id.
pub async fn create_org(app: &axum::Router, cookie: &str, name: &str, slug: &str) -> String {
    let (status, body) = post(
        app,
        "/api/organizations",
        Some(cookie),
        serde_json::json!({ "name": name, "slug": slug }),
    )
    .await;
    assert_eq!(status, http::StatusCode::CREATED, "create org failed: {}", body);
    body["id"].as_str().unwrap().to_string()
}

/// Create a product in `org_id` and return its id.
pub async fn create_product(app: &axum::Router, cookie: &str, org_id: &str, name: &str) -> String {
    let (status, body) = post(
        app,
        &format!("/api/organizations/{}/products", org_id),
        Some(cookie),
        serde_json::json!({ "name": name, "criticality": "medium" }),
    )
    .await;
    assert_eq!(status, http::StatusCode::CREATED, "create product failed: {}", body);
    body["id"].as_str().unwrap().to_string()
}

pub async fn user_id_from_cookie(pool: &SqlitePool, cookie: &str) -> String {
    let session_id = extract_session_id_from_cookie(cookie).expect("cookie must contain session_id");
    let session = prodtrack::app::db::sessions::find_valid(pool, session_id)
        .await
        .unwrap()
        .expect("session should be valid");
    session.user_id
}
