//! Facade crate for the navigation data generator's persistence layer.
//!
//! This crate re-exports the domain types and the [`NaviStore`] interface, and
//! exposes the SQLite-backed store behind the `store-sqlite` feature.

#![forbid(unsafe_code)]

pub use navi_core::{
    DEFAULT_BUSY_TIMEOUT, DEFAULT_DATABASE_FILE, InitOutcome, InvalidTableIndex,
    MAX_ROWS_PER_SHARD, NaviData, NaviInfo, NaviStore, NewWay, Node, ShardId, SpeedLimit,
    SpeedLimitError, SpeedLimitId, StoreConfig, TableName, Way, WayData, WayId, WayNodes,
    ZeroWayIdError,
};

#[cfg(feature = "store-sqlite")]
pub use navi_core::{NaviStoreError, SharedNaviStore, ShardRegistry, SqliteNaviStore};

#[cfg(feature = "test-support")]
pub use navi_core::test_support;
