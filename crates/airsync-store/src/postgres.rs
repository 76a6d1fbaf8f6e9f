//! PostgreSQL mirror store.

use airsync_core::config::{SslMode, StoreConfig};
use airsync_core::SensorReading;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use tracing::info;

use crate::error::Result;
use crate::traits::SecondaryStore;

/// The mirror is written by a single task; one connection is enough.
pub const POOL_SIZE: u32 = 1;

const UPSERT: &str = "
    INSERT INTO air_sensors
        (id, sensor_id, timestamp, pm25, pm10, co, no2, o3, so2, temperature, humidity)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
    ON CONFLICT (id) DO UPDATE SET
        sensor_id   = EXCLUDED.sensor_id,
        timestamp   = EXCLUDED.timestamp,
        pm25        = EXCLUDED.pm25,
        pm10        = EXCLUDED.pm10,
        co          = EXCLUDED.co,
        no2         = EXCLUDED.no2,
        o3          = EXCLUDED.o3,
        so2         = EXCLUDED.so2,
        temperature = EXCLUDED.temperature,
        humidity    = EXCLUDED.humidity";

/// Connect options for `database` on the configured server.
pub fn connect_options(cfg: &StoreConfig, database: &str) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.user)
        .password(&cfg.password)
        .database(database)
        .ssl_mode(ssl_mode(cfg.ssl_mode))
}

fn ssl_mode(mode: SslMode) -> PgSslMode {
    match mode {
        SslMode::Disable => PgSslMode::Disable,
        SslMode::Prefer => PgSslMode::Prefer,
        SslMode::Require => PgSslMode::Require,
    }
}

/// PostgreSQL mirror of `air_sensors`, keyed by the primary row id.
#[derive(Clone)]
pub struct PgMirrorStore {
    pool: PgPool,
}

impl PgMirrorStore {
    pub async fn connect(cfg: &StoreConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(POOL_SIZE)
            .connect_with(connect_options(cfg, &cfg.database))
            .await?;
        info!(store = %cfg.summary(), "secondary store connection ready");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SecondaryStore for PgMirrorStore {
    async fn upsert(&self, reading: &SensorReading) -> Result<()> {
        sqlx::query(UPSERT)
            .bind(reading.id)
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
        Ok(())
    }
}
