//! Operator fleet endpoints.
//!
//! Listing, detail, lifecycle and statistics routes for the operator
//! dashboard. All of them require a Bearer token.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{OperatorAuth, ValidatedJson};
use crate::response::ApiResponse;
use domain::models::device::{DeviceStatusFilter, DeviceWithTelemetry, SetDeviceActiveRequest};
use domain::models::{Device, FleetStats, TelemetryRecord};
use persistence::repositories::{DeviceRepository, StatsRepository, TelemetryRepository};
use shared::pagination::{PageMeta, PageParams};

/// Query parameters for the fleet listing.
#[derive(Debug, Deserialize)]
pub struct ListDevicesQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
}

/// Response payload for the fleet listing.
#[derive(Debug, Serialize)]
pub struct DeviceListResponse {
    pub devices: Vec<DeviceWithTelemetry>,
    pub pagination: PageMeta,
}

/// Query parameters for the telemetry page of the device detail.
#[derive(Debug, Deserialize)]
pub struct DeviceDetailQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Response payload for the device detail.
#[derive(Debug, Serialize)]
pub struct DeviceDetailResponse {
    pub device: Device,
    pub logs: Vec<TelemetryRecord>,
    pub pagination: PageMeta,
}

/// List devices, most recently seen first.
///
/// GET /devices?page=&limit=&search=&status=
pub async fn list_devices(
    State(state): State<AppState>,
    _operator: OperatorAuth,
    Query(query): Query<ListDevicesQuery>,
) -> Result<Json<ApiResponse<DeviceListResponse>>, ApiError> {
    let page = PageParams::new(query.page, query.limit)?;

    let status = match query.status.as_deref() {
        None | Some("") => DeviceStatusFilter::All,
        Some(raw) => raw.parse().map_err(ApiError::Validation)?,
    };
    let active_filter = match status {
        DeviceStatusFilter::All => None,
        DeviceStatusFilter::Active => Some(true),
        DeviceStatusFilter::Inactive => Some(false),
    };
    let search_filter = query.search.as_deref().filter(|s| !s.is_empty());

    let repo = DeviceRepository::new(state.pool.clone());
    let total = repo.count_devices(active_filter, search_filter).await?;
    let rows = repo
        .list_devices(active_filter, search_filter, page.limit(), page.offset())
        .await?;

    Ok(Json(ApiResponse::data(DeviceListResponse {
        devices: rows.into_iter().map(Into::into).collect(),
        pagination: page.meta(total),
    })))
}

/// Fetch one device together with a page of its telemetry history.
///
/// GET /devices/:device_id?page=&limit=
pub async fn get_device_detail(
    State(state): State<AppState>,
    _operator: OperatorAuth,
    Path(device_id): Path<String>,
    Query(query): Query<DeviceDetailQuery>,
) -> Result<Json<ApiResponse<DeviceDetailResponse>>, ApiError> {
    let page = PageParams::new(query.page, query.limit)?;

    let devices = DeviceRepository::new(state.pool.clone());
    let device = devices
        .find_by_device_id(&device_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Device not found".to_string()))?;

    let telemetry = TelemetryRepository::new(state.pool.clone());
    let total = telemetry.count_for_device(&device_id).await?;
    let logs = telemetry
        .list_for_device(&device_id, page.limit(), page.offset())
        .await?;

    Ok(Json(ApiResponse::data(DeviceDetailResponse {
        device: device.into(),
        logs: logs.into_iter().map(Into::into).collect(),
        pagination: page.meta(total),
    })))
}

/// Set or clear the stored active flag on a device.
///
/// PATCH /devices/:device_id
pub async fn set_device_active(
    State(state): State<AppState>,
    operator: OperatorAuth,
    Path(device_id): Path<String>,
    ValidatedJson(request): ValidatedJson<SetDeviceActiveRequest>,
) -> Result<Json<ApiResponse<Device>>, ApiError> {
    let repo = DeviceRepository::new(state.pool.clone());
    let now = Utc::now().timestamp_millis();

    let updated = repo
        .set_active(&device_id, request.is_active, now)
        .await?
        .ok_or_else(|| ApiError::NotFound("Device not found".to_string()))?;

    info!(
        device_id = %device_id,
        is_active = request.is_active,
        operator = %operator.username,
        "device active flag changed"
    );

    Ok(Json(ApiResponse::with_message(
        "Device updated",
        updated.into(),
    )))
}

/// Delete a device; the cascade removes its telemetry history.
///
/// DELETE /devices/:device_id
pub async fn delete_device(
    State(state): State<AppState>,
    operator: OperatorAuth,
    Path(device_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let repo = DeviceRepository::new(state.pool.clone());

    let deleted = repo.delete_device(&device_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Device not found".to_string()));
    }

    info!(device_id = %device_id, operator = %operator.username, "device deleted");

    Ok(Json(ApiResponse::message("Device deleted")))
}

/// Fleet-wide statistics for the dashboard.
///
/// GET /stats
pub async fn get_stats(
    State(state): State<AppState>,
    _operator: OperatorAuth,
) -> Result<Json<ApiResponse<FleetStats>>, ApiError> {
    let repo = StatsRepository::new(state.pool.clone());
    let stats = repo.fleet_stats(Utc::now()).await?;

    Ok(Json(ApiResponse::data(stats)))
}
