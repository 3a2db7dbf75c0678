use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::AnyPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{security_headers_middleware, trace_id};
use crate::routes::{admin, auth, devices, health};
use shared::jwt::{JwtConfig, JwtError};

#[derive(Clone)]
pub struct AppState {
    pub pool: AnyPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
}

pub fn create_app(config: Config, pool: AnyPool) -> Result<Router, JwtError> {
    let config = Arc::new(config);

    let jwt = JwtConfig::with_leeway(
        &config.auth.jwt_secret,
        config.auth.token_expiry_secs,
        config.auth.leeway_secs,
    )?;

    let state = AppState {
        pool,
        config: config.clone(),
        jwt: Arc::new(jwt),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Device-facing routes; the DeviceKeyAuth extractor gates each handler
    // before the body is read, so a missing key wins over a bad payload.
    let device_routes = Router::new()
        .route("/register", post(devices::register_device))
        .route("/sync", post(devices::sync_device))
        .route("/heartbeat", post(devices::heartbeat))
        .route("/config", post(devices::device_config));

    // Operator routes, gated by the OperatorAuth extractor.
    let operator_routes = Router::new()
        .route("/devices", get(admin::list_devices))
        .route(
            "/devices/:device_id",
            get(admin::get_device_detail)
                .patch(admin::set_device_active)
                .delete(admin::delete_device),
        )
        .route("/stats", get(admin::get_stats));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/health", get(health::health_check));

    // Merge all routes
    let router = Router::new()
        .merge(device_routes)
        .merge(operator_routes)
        .merge(public_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state);

    Ok(router)
}
