use thiserror::Error;

/// Errors a periodic job tick can end with.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Underlying store / sqlx error.
    #[error("Store error: {0}")]
    Store(#[from] airsync_store::StoreError),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
