//! Device-facing endpoint handlers: register, sync, heartbeat, config.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{DeviceKeyAuth, ValidatedJson};
use crate::response::ApiResponse;
use domain::models::device::{RegisterDeviceRequest, RegisterDeviceResponse, RegisterStatus};
use domain::models::telemetry::{
    ClientConfig, DeviceConfigRequest, HeartbeatRequest, SyncRequest,
};
use persistence::repositories::{DeviceRepository, TelemetryRepository};

/// Response for a sync submission.
#[derive(Debug, serde::Serialize)]
pub struct SyncResponse {
    pub status: &'static str,
}

/// Register a device, or refresh its attributes if already known.
///
/// POST /register
pub async fn register_device(
    State(state): State<AppState>,
    _auth: DeviceKeyAuth,
    ValidatedJson(request): ValidatedJson<RegisterDeviceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = DeviceRepository::new(state.pool.clone());
    let now = Utc::now().timestamp_millis();

    let status = repo
        .register_device(
            &request.device_id,
            &request.model,
            &request.manufacturer,
            request.os_version.as_deref(),
            request.app_version.as_deref(),
            now,
        )
        .await?;

    let (http_status, message) = match status {
        RegisterStatus::Created => (StatusCode::CREATED, "Device registered"),
        RegisterStatus::Updated => (StatusCode::OK, "Device updated"),
    };

    tracing::info!(device_id = %request.device_id, status = %status, "device registration");

    Ok((
        http_status,
        Json(ApiResponse::with_message(
            message,
            RegisterDeviceResponse {
                device_id: request.device_id,
                status,
            },
        )),
    ))
}

/// Accept one telemetry record from a device.
///
/// POST /sync
pub async fn sync_device(
    State(state): State<AppState>,
    _auth: DeviceKeyAuth,
    ValidatedJson(request): ValidatedJson<SyncRequest>,
) -> Result<Json<ApiResponse<SyncResponse>>, ApiError> {
    let repo = TelemetryRepository::new(state.pool.clone());
    let now = Utc::now().timestamp_millis();

    let recorded = repo.record_sync(&request, now).await?;
    if !recorded {
        return Err(ApiError::NotFound(
            "Device not found, register first".to_string(),
        ));
    }

    tracing::debug!(device_id = %request.device_id, "telemetry recorded");

    Ok(Json(ApiResponse::with_message(
        "Sync completed",
        SyncResponse {
            status: "completed",
        },
    )))
}

/// Record a liveness ping without a telemetry payload.
///
/// POST /heartbeat
pub async fn heartbeat(
    State(state): State<AppState>,
    _auth: DeviceKeyAuth,
    ValidatedJson(request): ValidatedJson<HeartbeatRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let repo = DeviceRepository::new(state.pool.clone());
    let now = Utc::now().timestamp_millis();

    let touched = repo.touch_last_seen(&request.device_id, now).await?;
    if !touched {
        return Err(ApiError::NotFound(
            "Device not found, register first".to_string(),
        ));
    }

    Ok(Json(ApiResponse::message("Heartbeat received")))
}

/// Return the fleet-wide operating parameters for a device.
///
/// POST /config
pub async fn device_config(
    State(state): State<AppState>,
    _auth: DeviceKeyAuth,
    ValidatedJson(request): ValidatedJson<DeviceConfigRequest>,
) -> Result<Json<ApiResponse<ClientConfig>>, ApiError> {
    let repo = DeviceRepository::new(state.pool.clone());

    if repo.find_by_device_id(&request.device_id).await?.is_none() {
        return Err(ApiError::NotFound(
            "Device not found, register first".to_string(),
        ));
    }

    let client = &state.config.client;
    Ok(Json(ApiResponse::data(ClientConfig {
        sync_interval_minutes: client.sync_interval_minutes,
        heartbeat_interval_minutes: client.heartbeat_interval_minutes,
        location_enabled: client.location_enabled,
    })))
}
