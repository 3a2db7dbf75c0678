//! Idempotent schema bootstrap.
//!
//! Tables are created at startup with `IF NOT EXISTS` guards instead of
//! versioned migrations, so a single code path serves both backends.
//! Flags are stored as 0/1 integers and moments as UNIX epoch
//! milliseconds; the `Any` driver decodes neither booleans nor datetime
//! columns.

use sqlx::AnyPool;
use tracing::info;

use crate::db::StoreKind;

const POSTGRES_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS devices (
        id BIGSERIAL PRIMARY KEY,
        device_id TEXT NOT NULL UNIQUE,
        model TEXT NOT NULL,
        manufacturer TEXT NOT NULL,
        os_version TEXT,
        app_version TEXT,
        is_active BIGINT NOT NULL DEFAULT 1,
        first_seen BIGINT NOT NULL,
        last_seen BIGINT NOT NULL,
        created_at BIGINT NOT NULL,
        updated_at BIGINT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS device_logs (
        id BIGSERIAL PRIMARY KEY,
        device_id TEXT NOT NULL REFERENCES devices (device_id) ON DELETE CASCADE,
        battery_level BIGINT,
        network_status TEXT,
        latitude DOUBLE PRECISION,
        longitude DOUBLE PRECISION,
        local_ip TEXT,
        public_ip TEXT,
        timestamp BIGINT NOT NULL,
        created_at BIGINT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS operators (
        id BIGSERIAL PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        is_active BIGINT NOT NULL DEFAULT 1,
        last_login BIGINT,
        created_at BIGINT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_devices_last_seen ON devices (last_seen DESC)",
    "CREATE INDEX IF NOT EXISTS idx_device_logs_device_timestamp ON device_logs (device_id, timestamp DESC)",
    "CREATE INDEX IF NOT EXISTS idx_device_logs_created_at ON device_logs (created_at)",
];

const SQLITE_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS devices (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        device_id TEXT NOT NULL UNIQUE,
        model TEXT NOT NULL,
        manufacturer TEXT NOT NULL,
        os_version TEXT,
        app_version TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        first_seen INTEGER NOT NULL,
        last_seen INTEGER NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS device_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        device_id TEXT NOT NULL REFERENCES devices (device_id) ON DELETE CASCADE,
        battery_level INTEGER,
        network_status TEXT,
        latitude REAL,
        longitude REAL,
        local_ip TEXT,
        public_ip TEXT,
        timestamp INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS operators (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 1,
        last_login INTEGER,
        created_at INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_devices_last_seen ON devices (last_seen DESC)",
    "CREATE INDEX IF NOT EXISTS idx_device_logs_device_timestamp ON device_logs (device_id, timestamp DESC)",
    "CREATE INDEX IF NOT EXISTS idx_device_logs_created_at ON device_logs (created_at)",
];

/// Creates tables and indexes that do not exist yet.
pub async fn init_schema(pool: &AnyPool, kind: StoreKind) -> Result<(), sqlx::Error> {
    let statements = match kind {
        StoreKind::Postgres => POSTGRES_STATEMENTS,
        StoreKind::Sqlite => SQLITE_STATEMENTS,
    };

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }

    info!(backend = ?kind, "database schema ready");
    Ok(())
}
