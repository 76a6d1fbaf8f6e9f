//! In-memory stores for testing.
//!
//! Both can be switched offline to simulate a lost connection; while offline
//! every call fails with [`StoreError::Unavailable`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use airsync_core::{NewReading, SensorReading};
use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::traits::{PrimaryStore, SecondaryStore};

/// In-memory primary store. Ids start at 1 and increase by one per insert.
#[derive(Debug, Default)]
pub struct MemoryPrimaryStore {
    rows: RwLock<Vec<SensorReading>>,
    offline: AtomicBool,
}

impl MemoryPrimaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All rows in insertion order.
    pub fn rows(&self) -> Vec<SensorReading> {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("primary store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PrimaryStore for MemoryPrimaryStore {
    async fn insert(&self, reading: &NewReading) -> Result<SensorReading> {
        self.check_online()?;
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        let id = rows.last().map_or(1, |r| r.id + 1);
        let stored = reading.clone().with_id(id);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn latest(&self, limit: u32) -> Result<Vec<SensorReading>> {
        self.check_online()?;
        let mut rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?
            .clone();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

/// In-memory mirror keyed by reading id.
#[derive(Debug, Default)]
pub struct MemoryMirrorStore {
    rows: RwLock<BTreeMap<i64, SensorReading>>,
    offline: AtomicBool,
}

impl MemoryMirrorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: i64) -> Option<SensorReading> {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}

#[async_trait]
impl SecondaryStore for MemoryMirrorStore {
    async fn upsert(&self, reading: &SensorReading) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("secondary store offline".to_string()));
        }
        self.rows
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?
            .insert(reading.id, reading.clone());
        Ok(())
    }
}
