//! MySQL primary store.

use airsync_core::config::{SslMode, StoreConfig};
use airsync_core::{NewReading, SensorReading};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlSslMode};
use tracing::{debug, info};

use crate::error::Result;
use crate::row::{ReadingRow, COLUMNS};
use crate::traits::PrimaryStore;

/// Maximum pooled connections to the primary store.
pub const POOL_SIZE: u32 = 10;

/// Server-level connect options (no database selected).
pub fn connect_options(cfg: &StoreConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.user)
        .password(&cfg.password)
        .ssl_mode(ssl_mode(cfg.ssl_mode))
}

fn ssl_mode(mode: SslMode) -> MySqlSslMode {
    match mode {
        SslMode::Disable => MySqlSslMode::Disabled,
        SslMode::Prefer => MySqlSslMode::Preferred,
        SslMode::Require => MySqlSslMode::Required,
    }
}

/// Pooled MySQL store appending to `air_sensors`.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Open the pool against `cfg.database`. The schema must already exist
    /// (see [`crate::db::ensure_primary`]).
    pub async fn connect(cfg: &StoreConfig) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(POOL_SIZE)
            .connect_with(connect_options(cfg).database(&cfg.database))
            .await?;
        info!(store = %cfg.summary(), "primary store pool ready");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrimaryStore for MySqlStore {
    async fn insert(&self, reading: &NewReading) -> Result<SensorReading> {
        let result = sqlx::query(
            "INSERT INTO air_sensors
             (sensor_id, timestamp, pm25, pm10, co, no2, o3, so2, temperature, humidity)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&reading.sensor_id)
        .bind(reading.timestamp.naive_utc())
        .bind(reading.pm25)
        .bind(reading.pm10)
        .bind(reading.co)
        .bind(reading.no2)
        .bind(reading.o3)
        .bind(reading.so2)
        .bind(reading.temperature)
        .bind(reading.humidity)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        debug!(id, "primary insert acknowledged");
        Ok(reading.clone().with_id(id))
    }

    async fn latest(&self, limit: u32) -> Result<Vec<SensorReading>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM air_sensors ORDER BY timestamp DESC, id DESC LIMIT ?"
        );
        let rows: Vec<ReadingRow> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(SensorReading::from).collect())
    }
}
