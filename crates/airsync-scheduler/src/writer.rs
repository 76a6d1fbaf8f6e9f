use std::sync::Arc;

use airsync_core::{generator, LatestReading, SensorReading};
use airsync_store::PrimaryStore;
use async_trait::async_trait;
use tracing::info;

use crate::engine::PeriodicJob;
use crate::error::Result;

/// Generates one reading per tick and appends it to the primary store.
///
/// At most one insert per tick, no retry. The latest-reading slot is only
/// updated once the insert succeeded, so it always holds a stored row.
pub struct WriterJob {
    store: Arc<dyn PrimaryStore>,
    latest: LatestReading,
}

impl WriterJob {
    pub fn new(store: Arc<dyn PrimaryStore>, latest: LatestReading) -> Self {
        Self { store, latest }
    }

    /// Generate, insert and publish one reading.
    pub async fn write_once(&self) -> Result<SensorReading> {
        let reading = generator::generate();
        let stored = self.store.insert(&reading).await?;
        info!(
            id = stored.id,
            sensor_id = %stored.sensor_id,
            pm25 = stored.pm25,
            pm10 = stored.pm10,
            temperature = stored.temperature,
            humidity = stored.humidity,
            "inserted sensor reading"
        );
        self.latest.set(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl PeriodicJob for WriterJob {
    fn name(&self) -> &'static str {
        "writer"
    }

    async fn tick(&mut self) -> Result<()> {
        self.write_once().await.map(|_| ())
    }
}
