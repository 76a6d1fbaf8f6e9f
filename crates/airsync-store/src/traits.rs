use airsync_core::{NewReading, SensorReading};
use async_trait::async_trait;

use crate::error::Result;

/// The store readings are first written to. It owns id assignment.
#[async_trait]
pub trait PrimaryStore: Send + Sync + 'static {
    /// Append one reading and return it with the id the store assigned.
    async fn insert(&self, reading: &NewReading) -> Result<SensorReading>;

    /// Up to `limit` rows, newest timestamp first.
    async fn latest(&self, limit: u32) -> Result<Vec<SensorReading>>;
}

/// The mirror readings are replicated into.
#[async_trait]
pub trait SecondaryStore: Send + Sync + 'static {
    /// Insert the row, or overwrite every non-key column of the row with the
    /// same id.
    async fn upsert(&self, reading: &SensorReading) -> Result<()>;
}
