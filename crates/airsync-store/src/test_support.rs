//! Settings for the `#[ignore]`d tests that need a live server.
//!
//! They read the same `MYSQL_*` / `PG_*` variables as the service, e.g.
//! `MYSQL_HOST=localhost MYSQL_PASSWORD=secret cargo test -p airsync-store -- --ignored`.
//! Each test gets its own database so they can run in parallel.

use airsync_core::config::StoreConfig;
use airsync_core::{AirsyncConfig, NewReading};
use chrono::{DateTime, Utc};

fn config() -> AirsyncConfig {
    AirsyncConfig::load(None).expect("load config from environment")
}

pub fn primary(database: &str) -> StoreConfig {
    let mut cfg = config().primary;
    cfg.database = database.to_string();
    cfg
}

pub fn secondary(database: &str) -> StoreConfig {
    let mut cfg = config().secondary;
    cfg.database = database.to_string();
    cfg
}

/// Fixed values with enough decimals to catch any float narrowing.
pub fn reading(sensor: u32, timestamp: DateTime<Utc>) -> NewReading {
    NewReading {
        sensor_id: format!("sensor-{sensor}"),
        timestamp,
        pm25: 123.4,
        pm10: 499.9,
        co: 12.34,
        no2: 199.99,
        o3: 0.01,
        so2: 87.65,
        temperature: -9.9,
        humidity: 55.5,
    }
}
