//! `airsync-core`: shared model, configuration and in-process state for the
//! air-quality replication service.
//!
//! # Overview
//!
//! A [`generator`] produces synthetic [`NewReading`]s. Once the primary store
//! assigns an id they become [`SensorReading`]s, and the most recent one is
//! kept in a [`LatestReading`] slot for the status endpoint.

pub mod config;
pub mod error;
pub mod generator;
pub mod latest;
pub mod types;

pub use config::AirsyncConfig;
pub use error::{AirsyncError, Result};
pub use latest::LatestReading;
pub use types::{NewReading, SensorReading};
