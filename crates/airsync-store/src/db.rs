//! Schema bootstrap for both stores. Safe to call on every startup (idempotent).

use airsync_core::config::StoreConfig;
use sqlx::{Connection, MySqlConnection, PgConnection};
use tracing::info;

use crate::error::{Result, StoreError};
use crate::{mysql, postgres};

/// Longest database name accepted by both backends (PostgreSQL caps names at 63 bytes).
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Maintenance database used to create the mirror database.
const PG_ADMIN_DATABASE: &str = "postgres";

/// Database names end up interpolated into DDL, so only a conservative
/// character set is accepted.
pub fn validate_identifier(name: &str) -> Result<&str> {
    let invalid = |reason| StoreError::InvalidIdentifier {
        name: name.to_string(),
        reason,
    };
    if name.is_empty() {
        return Err(invalid("empty"));
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(invalid("too long"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("only ASCII letters, digits and '_' are allowed"));
    }
    Ok(name)
}

fn primary_table_ddl(database: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS `{database}`.air_sensors (
            id          BIGINT AUTO_INCREMENT PRIMARY KEY,
            sensor_id   VARCHAR(50) NOT NULL,
            timestamp   DATETIME    NOT NULL,
            pm25        DOUBLE      NOT NULL,
            pm10        DOUBLE      NOT NULL,
            co          DOUBLE      NOT NULL,
            no2         DOUBLE      NOT NULL,
            o3          DOUBLE      NOT NULL,
            so2         DOUBLE      NOT NULL,
            temperature DOUBLE      NOT NULL,
            humidity    DOUBLE      NOT NULL,
            INDEX idx_air_sensors_timestamp (timestamp)
        )"
    )
}

const SECONDARY_TABLE_DDL: &str = "
    CREATE TABLE IF NOT EXISTS air_sensors (
        id          BIGSERIAL PRIMARY KEY,
        sensor_id   VARCHAR(50)      NOT NULL,
        timestamp   TIMESTAMP        NOT NULL,
        pm25        DOUBLE PRECISION NOT NULL,
        pm10        DOUBLE PRECISION NOT NULL,
        co          DOUBLE PRECISION NOT NULL,
        no2         DOUBLE PRECISION NOT NULL,
        o3          DOUBLE PRECISION NOT NULL,
        so2         DOUBLE PRECISION NOT NULL,
        temperature DOUBLE PRECISION NOT NULL,
        humidity    DOUBLE PRECISION NOT NULL
    )";

/// Create the primary database and its `air_sensors` table if missing.
pub async fn ensure_primary(cfg: &StoreConfig) -> Result<()> {
    let database = validate_identifier(&cfg.database)?;

    let mut conn = MySqlConnection::connect_with(&mysql::connect_options(cfg)).await?;
    sqlx::raw_sql(&format!("CREATE DATABASE IF NOT EXISTS `{database}`"))
        .execute(&mut conn)
        .await?;
    sqlx::raw_sql(&primary_table_ddl(database))
        .execute(&mut conn)
        .await?;
    conn.close().await?;

    info!(store = %cfg.summary(), "primary schema ready");
    Ok(())
}

/// Create the mirror database (via the `postgres` maintenance database) and
/// its `air_sensors` table if missing.
pub async fn ensure_secondary(cfg: &StoreConfig) -> Result<()> {
    let database = validate_identifier(&cfg.database)?;

    let mut admin =
        PgConnection::connect_with(&postgres::connect_options(cfg, PG_ADMIN_DATABASE)).await?;
    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(database)
        .fetch_optional(&mut admin)
        .await?;
    if exists.is_none() {
        // CREATE DATABASE cannot take bind parameters.
        sqlx::raw_sql(&format!("CREATE DATABASE \"{database}\""))
            .execute(&mut admin)
            .await?;
        info!(database, "created secondary database");
    }
    admin.close().await?;

    let mut conn = PgConnection::connect_with(&postgres::connect_options(cfg, database)).await?;
    sqlx::raw_sql(SECONDARY_TABLE_DDL).execute(&mut conn).await?;
    conn.close().await?;

    info!(store = %cfg.summary(), "secondary schema ready");
    Ok(())
}
