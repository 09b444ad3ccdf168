//! Statements on the `way_data` table.

use rusqlite::{Connection, OptionalExtension};

use super::{
    NaviStoreError,
    codec::{decode_shard, decode_u8, encode_shard, encode_way_id},
    error::sqlite_failure,
};
use crate::{ShardId, WayData, WayId};

pub(super) fn insert_way_data(
    connection: &Connection,
    way_data: &WayData,
) -> Result<(), NaviStoreError> {
    let params = (
        encode_way_id(way_data.way_id)?,
        way_data.raw_data.as_slice(),
        way_data.navi_number,
        encode_shard(way_data.navi_table_id)?,
    );
    connection
        .prepare_cached(
            "INSERT INTO way_data (way_id, raw_data, navi_number, navi_table_id)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .and_then(|mut statement| statement.execute(params))
        .map_err(sqlite_failure("insert way data"))?;
    Ok(())
}

pub(super) fn select_way_data(
    connection: &Connection,
    way_id: WayId,
) -> Result<Option<WayData>, NaviStoreError> {
    let key = encode_way_id(way_id)?;
    let row: Option<(Option<Vec<u8>>, Option<i64>, Option<i64>)> = connection
        .prepare_cached(
            "SELECT raw_data, navi_number, navi_table_id FROM way_data WHERE way_id = ?1",
        )
        .and_then(|mut statement| {
            statement
                .query_row([key], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
                .optional()
        })
        .map_err(sqlite_failure("query way data"))?;

    let Some((raw_data, navi_number, navi_table_id)) = row else {
        return Ok(None);
    };
    Ok(Some(WayData {
        way_id,
        raw_data: raw_data.unwrap_or_default(),
        navi_number: decode_u8("navi_number", navi_number.unwrap_or_default())?,
        navi_table_id: decode_shard(navi_table_id.unwrap_or_default())?,
    }))
}

pub(super) fn update_way_data(
    connection: &Connection,
    way_data: &WayData,
) -> Result<bool, NaviStoreError> {
    let params = (
        encode_way_id(way_data.way_id)?,
        way_data.raw_data.as_slice(),
        way_data.navi_number,
        encode_shard(way_data.navi_table_id)?,
    );
    let changed = connection
        .prepare_cached(
            "UPDATE way_data SET raw_data = ?2, navi_number = ?3, navi_table_id = ?4
             WHERE way_id = ?1",
        )
        .and_then(|mut statement| statement.execute(params))
        .map_err(sqlite_failure("update way data"))?;
    Ok(changed > 0)
}

pub(super) fn delete_way_data(
    connection: &Connection,
    way_id: WayId,
) -> Result<usize, NaviStoreError> {
    let key = encode_way_id(way_id)?;
    connection
        .prepare_cached("DELETE FROM way_data WHERE way_id = ?1")
        .and_then(|mut statement| statement.execute([key]))
        .map_err(sqlite_failure("delete way data"))
}

/// Highest shard referenced by raw data, [`ShardId::FIRST`] when none is.
pub(super) fn max_shard(connection: &Connection) -> Result<ShardId, NaviStoreError> {
    let max: Option<i64> = connection
        .query_row("SELECT max(navi_table_id) FROM way_data", [], |row| row.get(0))
        .map_err(sqlite_failure("query max navi table id"))?;
    max.map_or(Ok(ShardId::FIRST), decode_shard)
}
