//! Way id allocation and navigation shard selection.

use log::debug;
use rusqlite::Connection;

use super::{
    NaviStoreError,
    codec::encode_way_id,
    shard::ShardRegistry,
    way::{insert_way, max_way_id},
    way_data::max_shard,
};
use crate::{NewWay, ShardId, Way, WayId};

/// One past the largest stored way id.
pub(super) fn next_way_id(connection: &Connection) -> Result<WayId, NaviStoreError> {
    let Some(max) = max_way_id(connection)? else {
        return Ok(WayId::FIRST);
    };
    let next = max.checked_next().ok_or(NaviStoreError::IdOutOfRange {
        field: "way_id",
        value: u64::MAX,
    })?;
    // Reject ids SQLite cannot store before handing them out.
    encode_way_id(next)?;
    Ok(next)
}

/// Allocate the next id and insert the way with it. Run inside a write
/// transaction so concurrent allocators serialise.
pub(super) fn create_way(connection: &Connection, new_way: &NewWay) -> Result<Way, NaviStoreError> {
    let way_id = next_way_id(connection)?;
    let way = Way::from_new(way_id, new_way);
    insert_way(connection, &way)?;
    debug!("allocated way {way_id}");
    Ok(way)
}

pub(super) fn navi_table_shard(
    connection: &Connection,
    registry: &ShardRegistry,
    max_rows_per_shard: u64,
) -> Result<ShardId, NaviStoreError> {
    let current = max_shard(connection)?;
    let rows = registry.row_count(connection, current)?;
    if rows < max_rows_per_shard {
        return Ok(current);
    }
    current.checked_next().ok_or(NaviStoreError::IdOutOfRange {
        field: "navi_table_id",
        value: current.get(),
    })
}
