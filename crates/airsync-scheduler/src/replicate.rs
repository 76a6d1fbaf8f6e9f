use std::sync::Arc;

use airsync_store::{PrimaryStore, SecondaryStore};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::engine::PeriodicJob;
use crate::error::Result;

/// Copies the newest primary rows into the mirror, one upsert per row.
///
/// No transaction wraps a batch: if an upsert fails the tick stops there and
/// rows already written stay written. Re-running a batch is harmless because
/// every upsert is keyed by id.
pub struct ReplicationJob {
    primary: Arc<dyn PrimaryStore>,
    mirror: Arc<dyn SecondaryStore>,
    batch_size: u32,
}

impl ReplicationJob {
    pub fn new(
        primary: Arc<dyn PrimaryStore>,
        mirror: Arc<dyn SecondaryStore>,
        batch_size: u32,
    ) -> Self {
        Self {
            primary,
            mirror,
            batch_size,
        }
    }

    /// Run one batch. Returns the number of rows upserted.
    pub async fn sync_once(&self) -> Result<usize> {
        let rows = self.primary.latest(self.batch_size).await?;
        debug!(fetched = rows.len(), "fetched recent rows from primary store");
        for row in &rows {
            self.mirror.upsert(row).await?;
        }
        info!(rows = rows.len(), "synced latest data to secondary store");
        Ok(rows.len())
    }
}

#[async_trait]
impl PeriodicJob for ReplicationJob {
    fn name(&self) -> &'static str {
        "replication"
    }

    async fn tick(&mut self) -> Result<()> {
        self.sync_once().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchedulerError;
    use airsync_core::{generator, NewReading, SensorReading};
    use airsync_store::{MemoryMirrorStore, MemoryPrimaryStore, StoreError};
    use chrono::{Duration, TimeZone, Utc};

    struct Fixture {
        primary: Arc<MemoryPrimaryStore>,
        mirror: Arc<MemoryMirrorStore>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                primary: Arc::new(MemoryPrimaryStore::new()),
                mirror: Arc::new(MemoryMirrorStore::new()),
            }
        }

        fn job(&self, batch_size: u32) -> ReplicationJob {
            ReplicationJob::new(self.primary.clone(), self.mirror.clone(), batch_size)
        }

        /// Insert `n` readings one minute apart, oldest first.
        async fn seed(&self, n: i64) -> Vec<SensorReading> {
            let base = Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap();
            let mut stored = Vec::new();
            for i in 0..n {
                let mut r: NewReading = generator::generate();
                r.timestamp = base + Duration::minutes(i);
                stored.push(self.primary.insert(&r).await.unwrap());
            }
            stored
        }
    }

    #[tokio::test]
    async fn mirrored_rows_match_primary_exactly() {
        let fx = Fixture::new();
        let stored = fx.seed(10).await;

        assert_eq!(fx.job(100).sync_once().await.unwrap(), 10);
        for row in stored {
            assert_eq!(fx.mirror.get(row.id), Some(row));
        }
    }

    #[tokio::test]
    async fn only_the_newest_batch_is_copied() {
        let fx = Fixture::new();
        let stored = fx.seed(120).await;

        assert_eq!(fx.job(100).sync_once().await.unwrap(), 100);
        assert_eq!(fx.mirror.len(), 100);
        // ids 1..=20 are the oldest and fall outside the batch
        assert!(fx.mirror.get(stored[19].id).is_none());
        assert!(fx.mirror.get(stored[20].id).is_some());
        assert!(fx.mirror.get(stored[119].id).is_some());
    }

    #[tokio::test]
    async fn repeated_sync_is_idempotent() {
        let fx = Fixture::new();
        fx.seed(7).await;
        let job = fx.job(100);

        job.sync_once().await.unwrap();
        let first: Vec<_> = (1..=7).map(|id| fx.mirror.get(id)).collect();
        job.sync_once().await.unwrap();
        let second: Vec<_> = (1..=7).map(|id| fx.mirror.get(id)).collect();

        assert_eq!(fx.mirror.len(), 7);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn sync_never_shrinks_the_mirror() {
        let fx = Fixture::new();
        fx.seed(30).await;
        let job = fx.job(10);

        for _ in 0..3 {
            let before = fx.mirror.len();
            job.sync_once().await.unwrap();
            let after = fx.mirror.len();
            assert!(after >= before);
            assert!(after - before <= 10);
            fx.seed(5).await;
        }
    }

    #[tokio::test]
    async fn conflicting_mirror_row_is_overwritten() {
        let fx = Fixture::new();
        let stored = fx.seed(1).await;

        let mut stale = stored[0].clone();
        stale.pm25 = 499.9;
        stale.sensor_id = "sensor-10".to_string();
        fx.mirror.upsert(&stale).await.unwrap();

        fx.job(100).sync_once().await.unwrap();
        assert_eq!(fx.mirror.len(), 1);
        assert_eq!(fx.mirror.get(stored[0].id), Some(stored[0].clone()));
    }

    #[tokio::test]
    async fn unreachable_mirror_fails_the_tick() {
        let fx = Fixture::new();
        fx.seed(3).await;
        fx.mirror.set_offline(true);

        let mut job = fx.job(100);
        let err = job.tick().await.unwrap_err();
        assert!(matches!(err, SchedulerError::Store(StoreError::Unavailable(_))));
        assert!(fx.mirror.is_empty());

        fx.mirror.set_offline(false);
        job.tick().await.unwrap();
        assert_eq!(fx.mirror.len(), 3);
    }

    #[tokio::test]
    async fn unreachable_primary_fails_the_tick() {
        let fx = Fixture::new();
        fx.seed(3).await;
        fx.primary.set_offline(true);
        assert!(fx.job(100).sync_once().await.is_err());
        assert!(fx.mirror.is_empty());
    }

    #[tokio::test]
    async fn empty_primary_syncs_nothing() {
        let fx = Fixture::new();
        assert_eq!(fx.job(100).sync_once().await.unwrap(), 0);
        assert!(fx.mirror.is_empty());
    }
}
