use std::sync::{Arc, PoisonError, RwLock};

use crate::types::SensorReading;

/// Holder for the most recently stored reading.
///
/// Written by the writer task, read by HTTP handlers. Starts empty and stays
/// populated once the first reading has been set. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct LatestReading {
    slot: Arc<RwLock<Option<SensorReading>>>,
}

impl LatestReading {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held reading.
    pub fn set(&self, reading: SensorReading) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(reading);
    }

    /// A copy of the held reading, or `None` before the first successful write.
    pub fn get(&self) -> Option<SensorReading> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}
