//! Integration tests for the device-facing endpoints: registration,
//! telemetry sync, heartbeats, and client configuration.
//!
//! Every test runs against its own in-memory SQLite database, so tests
//! are isolated and need no cleanup.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{
    create_test_app, create_test_pool, device_request, device_request_with_key, json_request,
    parse_response_body, register_test_device, TestDevice, TEST_DEVICE_KEY,
};
use persistence::repositories::{DeviceRepository, TelemetryRepository};
use serde_json::json;
use tower::ServiceExt;

// ============================================================================
// Device Registration Tests
// ============================================================================

#[tokio::test]
async fn test_register_new_device_returns_created() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);
    let device = TestDevice::new();

    let request = device_request(Method::POST, "/register", device.register_body());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Device registered");
    assert_eq!(body["data"]["device_id"], device.device_id);
    assert_eq!(body["data"]["status"], "created");
}

#[tokio::test]
async fn test_reregister_updates_metadata_and_keeps_first_seen() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let repo = DeviceRepository::new(pool);
    let device = TestDevice::new();

    register_test_device(&app, &device).await;
    let initial = repo
        .find_by_device_id(&device.device_id)
        .await
        .unwrap()
        .expect("device stored");

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let renamed = TestDevice::new()
        .with_id(&device.device_id)
        .with_model("Pixel 9 Pro");
    let request = device_request(Method::POST, "/register", renamed.register_body());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Device updated");
    assert_eq!(body["data"]["status"], "updated");

    let stored = repo
        .find_by_device_id(&device.device_id)
        .await
        .unwrap()
        .expect("device stored");
    assert_eq!(stored.first_seen, initial.first_seen);
    assert!(stored.last_seen > initial.last_seen);
    assert_eq!(stored.model, "Pixel 9 Pro");
}

#[tokio::test]
async fn test_concurrent_registration_creates_one_row() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let device = TestDevice::new();

    let first = device_request(Method::POST, "/register", device.register_body());
    let second = device_request(Method::POST, "/register", device.register_body());
    let (first, second) = tokio::join!(app.clone().oneshot(first), app.clone().oneshot(second));

    let mut statuses = vec![first.unwrap().status(), second.unwrap().status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CREATED]);

    let repo = DeviceRepository::new(pool);
    assert_eq!(repo.count_devices(None, None).await.unwrap(), 1);
}

#[tokio::test]
async fn test_register_without_key_is_unauthorized() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);
    let device = TestDevice::new();

    let request = json_request(Method::POST, "/register", device.register_body());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = parse_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "API key required");
    assert_eq!(body["error_code"], "unauthorized");
}

#[tokio::test]
async fn test_register_with_wrong_key_is_unauthorized() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);
    let device = TestDevice::new();

    let request = device_request_with_key(
        Method::POST,
        "/register",
        device.register_body(),
        "wrong-key",
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Invalid API key");
}

#[tokio::test]
async fn test_register_accepts_key_as_query_param() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);
    let device = TestDevice::new();

    let uri = format!("/register?key={}", TEST_DEVICE_KEY);
    let request = json_request(Method::POST, &uri, device.register_body());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_missing_key_wins_over_bad_payload() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    let request = json_request(Method::POST, "/register", json!({}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_missing_fields() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    let request = device_request(Method::POST, "/register", json!({"device_id": "dev-1"}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "validation_error");
    assert!(
        body["message"].as_str().unwrap().contains("model"),
        "unexpected message: {}",
        body["message"]
    );
}

#[tokio::test]
async fn test_register_rejects_empty_device_id() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    let request = device_request(
        Method::POST,
        "/register",
        json!({"device_id": "", "model": "Pixel 8", "manufacturer": "Google"}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert!(
        body["message"].as_str().unwrap().contains("device_id"),
        "unexpected message: {}",
        body["message"]
    );
}

#[tokio::test]
async fn test_register_rejects_malformed_json() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-API-Key", TEST_DEVICE_KEY)
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "validation_error");
}

// ============================================================================
// Telemetry Sync Tests
// ============================================================================

#[tokio::test]
async fn test_sync_appends_log_and_bumps_last_seen() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let device = TestDevice::new();
    register_test_device(&app, &device).await;

    let device_repo = DeviceRepository::new(pool.clone());
    let before = device_repo
        .find_by_device_id(&device.device_id)
        .await
        .unwrap()
        .expect("device stored");

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let request = device_request(
        Method::POST,
        "/sync",
        json!({
            "device_id": device.device_id,
            "battery_level": 87,
            "network_status": "wifi",
            "latitude": 48.1486,
            "longitude": 17.1077,
            "local_ip": "192.168.1.20",
            "public_ip": "203.0.113.9",
            "timestamp": 1_700_000_000_000_i64,
        }),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Sync completed");
    assert_eq!(body["data"]["status"], "completed");

    let log = TelemetryRepository::new(pool)
        .latest_for_device(&device.device_id)
        .await
        .unwrap()
        .expect("log stored");
    assert_eq!(log.battery_level, Some(87));
    assert_eq!(log.network_status.as_deref(), Some("wifi"));
    assert_eq!(log.local_ip.as_deref(), Some("192.168.1.20"));
    assert_eq!(log.timestamp, 1_700_000_000_000);

    let after = device_repo
        .find_by_device_id(&device.device_id)
        .await
        .unwrap()
        .expect("device stored");
    assert!(after.last_seen > before.last_seen);
}

#[tokio::test]
async fn test_sync_accepts_minimal_payload() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let device = TestDevice::new();
    register_test_device(&app, &device).await;

    let request = device_request(
        Method::POST,
        "/sync",
        json!({"device_id": device.device_id, "timestamp": 0}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let log = TelemetryRepository::new(pool)
        .latest_for_device(&device.device_id)
        .await
        .unwrap()
        .expect("log stored");
    assert_eq!(log.battery_level, None);
    assert_eq!(log.network_status, None);
    assert_eq!(log.timestamp, 0);
}

#[tokio::test]
async fn test_sync_unknown_device_requires_registration() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());

    let request = device_request(
        Method::POST,
        "/sync",
        json!({"device_id": "never-registered", "timestamp": 1000}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = parse_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Device not found, register first");
    assert_eq!(body["error_code"], "not_found");

    let count = TelemetryRepository::new(pool)
        .count_for_device("never-registered")
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_sync_rejects_battery_out_of_range() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let device = TestDevice::new();
    register_test_device(&app, &device).await;

    for level in [-1, 101] {
        let request = device_request(
            Method::POST,
            "/sync",
            json!({"device_id": device.device_id, "battery_level": level, "timestamp": 1000}),
        );
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_response_body(response).await;
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("Battery level must be between 0 and 100"),
            "unexpected message: {}",
            body["message"]
        );
    }

    let count = TelemetryRepository::new(pool)
        .count_for_device(&device.device_id)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_sync_rejects_out_of_range_coordinates() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);
    let device = TestDevice::new();
    register_test_device(&app, &device).await;

    let request = device_request(
        Method::POST,
        "/sync",
        json!({"device_id": device.device_id, "latitude": 90.5, "timestamp": 1000}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Latitude must be between -90 and 90"));

    let request = device_request(
        Method::POST,
        "/sync",
        json!({"device_id": device.device_id, "longitude": -180.5, "timestamp": 1000}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Longitude must be between -180 and 180"));
}

#[tokio::test]
async fn test_sync_requires_timestamp() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);
    let device = TestDevice::new();
    register_test_device(&app, &device).await;

    let request = device_request(
        Method::POST,
        "/sync",
        json!({"device_id": device.device_id, "battery_level": 50}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert!(
        body["message"].as_str().unwrap().contains("timestamp"),
        "unexpected message: {}",
        body["message"]
    );
}

#[tokio::test]
async fn test_sync_rejects_negative_timestamp() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);
    let device = TestDevice::new();
    register_test_device(&app, &device).await;

    let request = device_request(
        Method::POST,
        "/sync",
        json!({"device_id": device.device_id, "timestamp": -5}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Timestamp must be a non-negative integer"));
}

#[tokio::test]
async fn test_sync_reactivates_inactive_device() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let device = TestDevice::new();
    register_test_device(&app, &device).await;

    sqlx::query("UPDATE devices SET is_active = 0 WHERE device_id = $1")
        .bind(&device.device_id)
        .execute(&pool)
        .await
        .unwrap();

    let request = device_request(
        Method::POST,
        "/sync",
        json!({"device_id": device.device_id, "timestamp": 1000}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = DeviceRepository::new(pool)
        .find_by_device_id(&device.device_id)
        .await
        .unwrap()
        .expect("device stored");
    assert_eq!(stored.is_active, 1);
}

// ============================================================================
// Heartbeat Tests
// ============================================================================

#[tokio::test]
async fn test_heartbeat_touches_last_seen_without_logging() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let device = TestDevice::new();
    register_test_device(&app, &device).await;

    let device_repo = DeviceRepository::new(pool.clone());
    let before = device_repo
        .find_by_device_id(&device.device_id)
        .await
        .unwrap()
        .expect("device stored");

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let request = device_request(
        Method::POST,
        "/heartbeat",
        json!({"device_id": device.device_id}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Heartbeat received");
    assert!(body["data"].is_null());

    let after = device_repo
        .find_by_device_id(&device.device_id)
        .await
        .unwrap()
        .expect("device stored");
    assert!(after.last_seen > before.last_seen);

    let count = TelemetryRepository::new(pool)
        .count_for_device(&device.device_id)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_heartbeat_unknown_device() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    let request = device_request(
        Method::POST,
        "/heartbeat",
        json!({"device_id": "never-registered"}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Device not found, register first");
}

#[tokio::test]
async fn test_heartbeat_requires_device_key() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    let request = json_request(Method::POST, "/heartbeat", json!({"device_id": "dev-1"}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Client Config Tests
// ============================================================================

#[tokio::test]
async fn test_config_returns_polling_intervals() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);
    let device = TestDevice::new();
    register_test_device(&app, &device).await;

    let request = device_request(
        Method::POST,
        "/config",
        json!({"device_id": device.device_id}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["sync_interval_minutes"], 15);
    assert_eq!(body["data"]["heartbeat_interval_minutes"], 5);
    assert_eq!(body["data"]["location_enabled"], true);
}

#[tokio::test]
async fn test_config_unknown_device() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    let request = device_request(
        Method::POST,
        "/config",
        json!({"device_id": "never-registered"}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Device not found, register first");
}
