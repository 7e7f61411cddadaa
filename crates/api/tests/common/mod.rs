#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use beatstore_cloud::media::{MediaError, MediaKind, MediaStorage};
use beatstore_cloud::payments::{CheckoutSession, NewCheckout, PaymentError, PaymentGateway};
use beatstore_db::models::account::CreateAccount;
use beatstore_db::store::{MemoryStore, Store};
use http_body_util::BodyExt;
use tower::ServiceExt;

use beatstore_api::auth::jwt::JwtConfig;
use beatstore_api::auth::password::hash_password;
use beatstore_api::config::{AdminConfig, CheckoutConfig, Environment, ServerConfig};
use beatstore_api::router::build_app_router;
use beatstore_api::state::AppState;

pub const JWT_SECRET: &str = "integration-test-secret-long-enough";
pub const WEBHOOK_SECRET: &str = "whsec_integration";
pub const ADMIN_EMAIL: &str = "admin@beatstore.test";
pub const ADMIN_PASSWORD: &str = "admin-password-123";
pub const PASSWORD: &str = "producer-pass-1";

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// Records every checkout it is asked to open and every session it is asked
/// to look up, and answers with a fixed session.
#[derive(Default)]
pub struct FakeGateway {
    pub created: Mutex<Vec<NewCheckout>>,
    pub retrieved: Mutex<Vec<String>>,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout_session(
        &self,
        checkout: &NewCheckout,
    ) -> Result<CheckoutSession, PaymentError> {
        self.created.lock().unwrap().push(checkout.clone());
        Ok(CheckoutSession {
            id: "cs_test_123".into(),
            url: Some("https://checkout.test/pay/cs_test_123".into()),
            status: Some("open".into()),
            payment_status: Some("unpaid".into()),
            amount_total: Some(checkout.items.iter().map(|i| i.unit_amount).sum()),
            currency: Some(checkout.currency.clone()),
            customer_email: None,
        })
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        self.retrieved.lock().unwrap().push(session_id.to_string());
        if session_id != "cs_test_123" {
            return Err(PaymentError::Api {
                status: 404,
                message: "No such checkout.session".into(),
            });
        }
        Ok(CheckoutSession {
            id: session_id.into(),
            status: Some("complete".into()),
            payment_status: Some("paid".into()),
            amount_total: Some(2999),
            currency: Some("usd".into()),
            customer_email: Some("buyer@beatstore.test".into()),
            ..Default::default()
        })
    }
}

/// Records every deletion; fails for URLs containing `fail`.
#[derive(Default)]
pub struct FakeMedia {
    pub deleted: Mutex<Vec<(String, MediaKind)>>,
}

#[async_trait]
impl MediaStorage for FakeMedia {
    async fn delete(&self, url: &str, kind: MediaKind) -> Result<(), MediaError> {
        if url.contains("fail") {
            return Err(MediaError::UnmanagedUrl(url.to_string()));
        }
        self.deleted.lock().unwrap().push((url.to_string(), kind));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and the admin fallback
/// login disabled.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        environment: Environment::Production,
        client_dir: None,
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            expiry_hours: 1,
        },
        admin: AdminConfig {
            email: Some(ADMIN_EMAIL.to_string()),
            password_hash: Some(hash_password(ADMIN_PASSWORD).expect("hashing should succeed")),
            password_login: false,
        },
        checkout: CheckoutConfig {
            currency: "usd".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            webhook_secret: Some(WEBHOOK_SECRET.to_string()),
            webhook_tolerance_secs: 300,
        },
        stripe: None,
        cloudinary: None,
    }
}

/// Handles to everything behind a test app, for assertions.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub payments: Arc<FakeGateway>,
    pub media: Arc<FakeMedia>,
    pub config: ServerConfig,
}

impl TestApp {
    /// A fresh router over the same state (requests consume the router).
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let payments = Arc::new(FakeGateway::default());
    let media = Arc::new(FakeMedia::default());

    let state = AppState {
        store: store.clone(),
        config: Arc::new(config.clone()),
        payments: payments.clone(),
        media: media.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        payments,
        media,
        config,
    }
}

/// Full application router, with all middleware layers, over an empty
/// in-memory store.
pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert an account directly into the store.
pub async fn create_account(store: &MemoryStore, email: &str, is_admin: bool) -> i64 {
    store
        .create_account(&CreateAccount {
            username: "Producer".into(),
            email: email.into(),
            password_hash: hash_password(PASSWORD).expect("hashing should succeed"),
            is_admin,
        })
        .await
        .expect("account creation should succeed")
        .id
}

/// Log in over HTTP and return the token.
pub async fn login(app: Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/login", body).await;
    assert_eq!(response.status(), 200, "login should succeed");
    body_json(response).await["token"]
        .as_str()
        .expect("token should be a string")
        .to_string()
}

/// Create an admin account and return a token for it.
pub async fn admin_token(test: &TestApp) -> String {
    create_account(&test.store, "staff@beatstore.test", true).await;
    login(test.app(), "staff@beatstore.test", PASSWORD).await
}

/// Create a regular account and return a token for it.
pub async fn user_token(test: &TestApp) -> String {
    create_account(&test.store, "fan@beatstore.test", false).await;
    login(test.app(), "fan@beatstore.test", PASSWORD).await
}

pub fn beat_body(title: &str, genre: &str, price: f64) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "bpm": 140,
        "price": price,
        "genre": genre,
        "picture": format!("https://res.cloudinary.com/demo/image/upload/v1/{title}.jpg"),
        "audio": format!("https://res.cloudinary.com/demo/video/upload/v1/{title}.mp3"),
    })
}

/// Upload a beat as `token` and return its id.
pub async fn upload_beat(app: Router, token: &str, body: serde_json::Value) -> i64 {
    let response = post_json_auth(app, "/api/upload-beat", body, token).await;
    assert_eq!(response.status(), 201, "upload should succeed");
    body_json(response).await["id"]
        .as_i64()
        .expect("id should be an integer")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Read the full response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

fn json_request(method: Method, uri: &str, body: &serde_json::Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request should build")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn get_with_header(app: Router, uri: &str, name: &str, value: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(name, value)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &body, None)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &body, Some(token))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, &body, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

/// POST a raw body with extra headers (webhooks, malformed JSON).
pub async fn post_raw(app: Router, uri: &str, body: &str, headers: &[(&str, &str)]) -> Response<Body> {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    send(app, builder.body(Body::from(body.to_string())).expect("request should build")).await
}
