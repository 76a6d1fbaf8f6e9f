//! `airsync-scheduler`: the two periodic tasks and the engine that drives them.
//!
//! # Overview
//!
//! A [`PeriodicEngine`] owns one [`PeriodicJob`] and calls its `tick` on a
//! fixed interval until a shutdown signal arrives. A tick is awaited before
//! the next one may start; ticks that would have fired meanwhile are skipped.
//! Tick errors are logged and never stop the engine.
//!
//! | Job               | Default interval | Per tick                                   |
//! |-------------------|------------------|--------------------------------------------|
//! | [`WriterJob`]     | 10 s             | generate + insert one reading, update slot |
//! | [`ReplicationJob`]| 60 s             | copy newest 100 rows into the mirror       |

pub mod engine;
pub mod error;
pub mod replicate;
pub mod writer;

pub use engine::{PeriodicEngine, PeriodicJob};
pub use error::{Result, SchedulerError};
pub use replicate::ReplicationJob;
pub use writer::WriterJob;
