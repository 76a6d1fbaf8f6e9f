//! `airsync-store`: primary and secondary reading stores.
//!
//! # Overview
//!
//! Readings are appended to a MySQL table ([`MySqlStore`]) and mirrored into
//! a PostgreSQL table ([`PgMirrorStore`]) keyed by the MySQL row id. Both sides
//! are reached through the [`PrimaryStore`] / [`SecondaryStore`] traits so the
//! periodic jobs can run against the in-memory stores in tests.
//!
//! | Store       | Backend    | Pool size | Table         |
//! |-------------|------------|-----------|---------------|
//! | primary     | MySQL      | 10        | `air_sensors` |
//! | secondary   | PostgreSQL | 1         | `air_sensors` |

pub mod db;
pub mod error;
pub mod memory;
pub mod mysql;
pub mod postgres;
mod row;
#[cfg(test)]
mod test_support;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::{MemoryMirrorStore, MemoryPrimaryStore};
pub use mysql::MySqlStore;
pub use postgres::PgMirrorStore;
pub use traits::{PrimaryStore, SecondaryStore};
