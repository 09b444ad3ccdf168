//! Core domain types and persistence for the navigation data generator.
//!
//! Responsibilities:
//! - Model ways, their nodes, raw data and derived navigation entries.
//! - Define the [`NaviStore`] interface the generation pipeline writes through.
//! - Provide the SQLite-backed store (feature `store-sqlite`): schema
//!   lifecycle, transactional writes, cascading deletes, way id allocation and
//!   navigation shard selection.
//!
//! Boundaries:
//! - Do not decide what to ingest; the pipeline owns that.
//! - Keep SQL and column encodings inside `store::sqlite`.
//!
//! Invariants:
//! - Way ids are non-zero; absent links are `None`, stored as SQL `NULL`.
//! - Multi-row writes are all-or-nothing.
#![forbid(unsafe_code)]

pub mod config;
mod ids;
mod navi;
pub mod store;
mod way;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{DEFAULT_BUSY_TIMEOUT, DEFAULT_DATABASE_FILE, MAX_ROWS_PER_SHARD, StoreConfig};
pub use ids::{
    SPEED_BASE_KMH, SPEED_STEP_KMH, ShardId, SpeedLimitError, SpeedLimitId, WayId, ZeroWayIdError,
};
pub use navi::{NaviData, NaviInfo};
pub use store::{InitOutcome, InvalidTableIndex, NaviStore, TableName};
pub use way::{NewWay, Node, SpeedLimit, Way, WayData, WayNodes};

#[cfg(feature = "store-sqlite")]
pub use store::{NaviStoreError, SharedNaviStore, ShardRegistry, SqliteNaviStore};
