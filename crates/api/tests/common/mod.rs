//! Common test utilities for integration tests.
//!
//! Every test builds its own app over an isolated in-memory SQLite
//! database, so tests never observe each other's state.

// Allow dead code in this module - these are helper utilities that may not be
// used by all integration tests but are intentionally available for all of them.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use fleet_registry_api::{app::create_app, config::Config};
use sqlx::AnyPool;
use tower::ServiceExt;

/// Device key installed by [`test_config`].
pub const TEST_DEVICE_KEY: &str = "test-device-key";

/// JWT secret installed by [`test_config`].
pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// Create an isolated in-memory SQLite pool with the schema applied.
///
/// A single connection kept for the lifetime of the pool, so every query
/// in a test sees the same in-memory database.
pub async fn create_test_pool() -> AnyPool {
    let pool = persistence::db::create_pool(&persistence::db::DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        connect_timeout_secs: 5,
        idle_timeout_secs: 600,
    })
    .await
    .expect("Failed to open in-memory test database");

    persistence::schema::init_schema(&pool, persistence::db::StoreKind::Sqlite)
        .await
        .expect("Failed to apply schema");

    pool
}

/// Test configuration with fixed keys.
pub fn test_config() -> Config {
    Config {
        server: fleet_registry_api::config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Use random port
            request_timeout_secs: 30,
        },
        database: fleet_registry_api::config::DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_secs: 5,
            idle_timeout_secs: 600,
        },
        auth: fleet_registry_api::config::AuthConfig {
            device_key: TEST_DEVICE_KEY.to_string(),
            jwt_secret: TEST_JWT_SECRET.to_string(),
            token_expiry_secs: 3600,
            leeway_secs: 30,
            bootstrap_username: String::new(),
            bootstrap_password: String::new(),
        },
        client: fleet_registry_api::config::ClientConfig {
            sync_interval_minutes: 15,
            heartbeat_interval_minutes: 5,
            location_enabled: true,
        },
        logging: fleet_registry_api::config::LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: fleet_registry_api::config::SecurityConfig {
            cors_origins: vec![],
        },
    }
}

/// Create a test application router over the given pool.
pub fn create_test_app(pool: AnyPool) -> Router {
    create_app(test_config(), pool).expect("Failed to build test app")
}

/// Test device data.
#[derive(Debug, Clone)]
pub struct TestDevice {
    pub device_id: String,
    pub model: String,
    pub manufacturer: String,
    pub os_version: Option<String>,
    pub app_version: Option<String>,
}

impl TestDevice {
    pub fn new() -> Self {
        Self {
            device_id: format!("device-{}", uuid::Uuid::new_v4().simple()),
            model: "Pixel 8".to_string(),
            manufacturer: "Google".to_string(),
            os_version: Some("14".to_string()),
            app_version: Some("1.0.0".to_string()),
        }
    }

    pub fn with_id(mut self, device_id: &str) -> Self {
        self.device_id = device_id.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: &str) -> Self {
        self.manufacturer = manufacturer.to_string();
        self
    }

    pub fn register_body(&self) -> serde_json::Value {
        serde_json::json!({
            "device_id": self.device_id,
            "model": self.model,
            "manufacturer": self.manufacturer,
            "os_version": self.os_version,
            "app_version": self.app_version,
        })
    }
}

impl Default for TestDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a JSON request with no authentication.
pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a JSON request carrying the test device key.
pub fn device_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    device_request_with_key(method, uri, body, TEST_DEVICE_KEY)
}

/// Build a JSON request carrying an arbitrary device key.
pub fn device_request_with_key(
    method: Method,
    uri: &str,
    body: serde_json::Value,
    key: &str,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-API-Key", key)
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a JSON request with Bearer authentication.
pub fn json_request_with_auth(
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a GET request with Bearer authentication.
pub fn get_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Build a DELETE request with Bearer authentication.
pub fn delete_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Build an unauthenticated GET request.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

/// Register a device via the API, asserting success.
pub async fn register_test_device(app: &Router, device: &TestDevice) -> serde_json::Value {
    let request = device_request(Method::POST, "/register", device.register_body());
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = parse_response_body(response).await;
    assert!(
        status.is_success(),
        "registration failed: {} {}",
        status,
        body
    );
    body
}

/// Submit a telemetry record via the API, asserting success.
pub async fn sync_test_device(
    app: &Router,
    device_id: &str,
    timestamp: i64,
    battery_level: i64,
) -> serde_json::Value {
    let request = device_request(
        Method::POST,
        "/sync",
        serde_json::json!({
            "device_id": device_id,
            "timestamp": timestamp,
            "battery_level": battery_level,
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = parse_response_body(response).await;
    assert!(status.is_success(), "sync failed: {} {}", status, body);
    body
}

/// Insert an operator account directly, bypassing the API.
pub async fn create_test_operator(
    pool: &AnyPool,
    username: &str,
    password: &str,
) -> persistence::entities::OperatorEntity {
    let password_hash = shared::password::hash_password(password).expect("hash password");
    persistence::repositories::OperatorRepository::new(pool.clone())
        .create_operator(username, &password_hash, chrono::Utc::now().timestamp_millis())
        .await
        .expect("Failed to create test operator")
}

/// Disable an operator account directly.
pub async fn disable_test_operator(pool: &AnyPool, username: &str) {
    sqlx::query("UPDATE operators SET is_active = 0 WHERE username = $1")
        .bind(username)
        .execute(pool)
        .await
        .expect("Failed to disable test operator");
}

/// Remove an operator account directly.
pub async fn delete_test_operator(pool: &AnyPool, username: &str) {
    sqlx::query("DELETE FROM operators WHERE username = $1")
        .bind(username)
        .execute(pool)
        .await
        .expect("Failed to delete test operator");
}

/// Log in through the API and return the bearer token.
pub async fn login_operator(app: &Router, username: &str, password: &str) -> String {
    let request = json_request(
        Method::POST,
        "/login",
        serde_json::json!({ "username": username, "password": password }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = parse_response_body(response).await;
    assert_eq!(status, axum::http::StatusCode::OK, "login failed: {}", body);
    body["data"]["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}

/// Create an operator, log in, and return the token.
pub async fn operator_token(app: &Router, pool: &AnyPool) -> String {
    create_test_operator(pool, "ops", "correct horse battery").await;
    login_operator(app, "ops", "correct horse battery").await
}

/// Backdate a device's `last_seen`, bypassing the API.
pub async fn backdate_last_seen(pool: &AnyPool, device_id: &str, last_seen_millis: i64) {
    sqlx::query("UPDATE devices SET last_seen = $1 WHERE device_id = $2")
        .bind(last_seen_millis)
        .bind(device_id)
        .execute(pool)
        .await
        .expect("Failed to backdate last_seen");
}

/// Backdate the receipt time of every log of a device, bypassing the API.
pub async fn backdate_log_receipts(pool: &AnyPool, device_id: &str, created_at_millis: i64) {
    sqlx::query("UPDATE device_logs SET created_at = $1 WHERE device_id = $2")
        .bind(created_at_millis)
        .bind(device_id)
        .execute(pool)
        .await
        .expect("Failed to backdate log receipts");
}
