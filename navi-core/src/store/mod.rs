//! Persistence interface for way aggregates.
//!
//! The [`NaviStore`] trait is the surface the generation pipeline writes
//! through. A way is the aggregation root: its node list, raw data and
//! navigation entries are dependent rows keyed by the way id and are removed
//! together with it.

use std::fmt;

use thiserror::Error;

use crate::{NaviData, NaviInfo, NewWay, ShardId, SpeedLimitId, Way, WayData, WayId, WayNodes};

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{NaviStoreError, SharedNaviStore, ShardRegistry, SqliteNaviStore};

/// The fixed set of tables managed by the store, in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableName {
    /// Immutable speed limit reference rows.
    SpeedLimit,
    /// Way topology; the aggregation root.
    Way,
    /// Node rows of each way.
    WayNodes,
    /// Raw data of each way.
    WayData,
    /// Navigation entries of each way.
    NaviData,
}

impl TableName {
    /// Every table, in the order the schema is created.
    pub const ALL: [Self; 5] = [
        Self::SpeedLimit,
        Self::Way,
        Self::WayNodes,
        Self::WayData,
        Self::NaviData,
    ];

    /// Name of the table in the database catalogue.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SpeedLimit => "speed_limit",
            Self::Way => "way",
            Self::WayNodes => "way_nodes",
            Self::WayData => "way_data",
            Self::NaviData => "navi_data",
        }
    }

    /// Position of the table in [`TableName::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::SpeedLimit => 0,
            Self::Way => 1,
            Self::WayNodes => 2,
            Self::WayData => 3,
            Self::NaviData => 4,
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<usize> for TableName {
    type Error = InvalidTableIndex;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(InvalidTableIndex { index })
    }
}

/// A table index outside `0..5`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("table index {index} does not name one of the {} managed tables", TableName::ALL.len())]
pub struct InvalidTableIndex {
    /// Rejected index.
    pub index: usize,
}

/// Result of initialising a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The schema was created and the speed limits seeded.
    Created,
    /// The `way` table already existed; nothing was changed.
    AlreadyInitialised,
}

/// Read/write access to way aggregates and the derived-value allocators.
///
/// Queries distinguish "not found" from failure: a missing way or an empty
/// child list is `Ok(None)`. Child lists come back in the order they were
/// saved. Updates of node lists and navigation entries replace the whole
/// list.
pub trait NaviStore {
    /// Error raised by the backing storage.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert a way row.
    fn save_way(&mut self, way: &Way) -> Result<(), Self::Error>;

    /// Insert every node of `way_nodes`, or none of them.
    fn save_way_nodes(&mut self, way_nodes: &WayNodes) -> Result<(), Self::Error>;

    /// Insert the raw data row of a way.
    fn save_way_data(&mut self, way_data: &WayData) -> Result<(), Self::Error>;

    /// Insert every navigation entry of `navi_info`, or none of them.
    fn save_navi_info(&mut self, navi_info: &NaviInfo) -> Result<(), Self::Error>;

    /// Fetch a way.
    fn query_way(&self, way_id: WayId) -> Result<Option<Way>, Self::Error>;

    /// Fetch the node list of a way; `None` when it has no nodes.
    fn query_way_nodes(&self, way_id: WayId) -> Result<Option<WayNodes>, Self::Error>;

    /// Fetch the raw data of a way.
    fn query_way_data(&self, way_id: WayId) -> Result<Option<WayData>, Self::Error>;

    /// Fetch the navigation entries of a way; `None` when it has none.
    fn query_navi_data(&self, way_id: WayId) -> Result<Option<Vec<NaviData>>, Self::Error>;

    /// Fetch a single navigation entry by index.
    fn query_navi_data_entry(
        &self,
        way_id: WayId,
        navi_index: u8,
    ) -> Result<Option<NaviData>, Self::Error>;

    /// Overwrite the links and speed range of `way.way_id`.
    ///
    /// Returns `false` when no such way exists.
    fn update_way(&mut self, way: &Way) -> Result<bool, Self::Error>;

    /// Overwrite only the speed range of a way.
    fn update_way_speed_limit(
        &mut self,
        way_id: WayId,
        speed_min: Option<SpeedLimitId>,
        speed_max: Option<SpeedLimitId>,
    ) -> Result<bool, Self::Error>;

    /// Replace the node list of `way_nodes.way_id`.
    fn update_way_nodes(&mut self, way_nodes: &WayNodes) -> Result<(), Self::Error>;

    /// Overwrite the raw data row of `way_data.way_id`.
    fn update_way_data(&mut self, way_data: &WayData) -> Result<bool, Self::Error>;

    /// Replace the navigation entries of `navi_info.way_id`.
    fn update_navi_info(&mut self, navi_info: &NaviInfo) -> Result<(), Self::Error>;

    /// Delete a way together with its nodes, raw data and navigation entries.
    ///
    /// Returns whether the way row existed.
    fn delete_way(&mut self, way_id: WayId) -> Result<bool, Self::Error>;

    /// Delete the node rows of a way, returning how many were removed.
    fn delete_way_nodes(&mut self, way_id: WayId) -> Result<usize, Self::Error>;

    /// Delete the raw data row of a way, returning how many were removed.
    fn delete_way_data(&mut self, way_id: WayId) -> Result<usize, Self::Error>;

    /// Delete the navigation entries of a way, returning how many were removed.
    fn delete_navi_data(&mut self, way_id: WayId) -> Result<usize, Self::Error>;

    /// One past the largest stored way id, or [`WayId::FIRST`] when empty.
    ///
    /// The value is only a prediction; use [`NaviStore::create_way`] when
    /// other writers may allocate concurrently.
    fn next_way_id(&self) -> Result<WayId, Self::Error>;

    /// Allocate an id and insert the way in one step.
    fn create_way(&mut self, new_way: &NewWay) -> Result<Way, Self::Error>;

    /// Shard that should receive the next navigation entries.
    ///
    /// This is the highest shard referenced by raw data while it holds fewer
    /// rows than the configured maximum, and the following shard otherwise.
    fn navi_table_shard(&self) -> Result<ShardId, Self::Error>;
}
