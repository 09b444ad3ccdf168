//! Statements on the `navi_data` table.

use rusqlite::{Connection, OptionalExtension};

use super::{
    NaviStoreError,
    codec::{decode_u8, encode_way_id},
    error::sqlite_failure,
};
use crate::{NaviData, NaviInfo, WayId};

/// Insert every entry. Callers wrap this in a transaction.
pub(super) fn insert_navi_info(
    connection: &Connection,
    navi_info: &NaviInfo,
) -> Result<(), NaviStoreError> {
    let way_id = encode_way_id(navi_info.way_id)?;
    let mut statement = connection
        .prepare_cached("INSERT INTO navi_data (way_id, navi_index, data) VALUES (?1, ?2, ?3)")
        .map_err(sqlite_failure("prepare navi data insert"))?;
    for entry in &navi_info.navi_data {
        statement
            .execute((way_id, entry.navi_index, entry.data.as_slice()))
            .map_err(sqlite_failure("insert navi data"))?;
    }
    Ok(())
}

fn decode_entry(
    navi_index: Option<i64>,
    data: Option<Vec<u8>>,
) -> Result<NaviData, NaviStoreError> {
    Ok(NaviData {
        navi_index: decode_u8("navi_index", navi_index.unwrap_or_default())?,
        data: data.unwrap_or_default(),
    })
}

pub(super) fn select_navi_data(
    connection: &Connection,
    way_id: WayId,
) -> Result<Option<Vec<NaviData>>, NaviStoreError> {
    let key = encode_way_id(way_id)?;
    let mut statement = connection
        .prepare_cached("SELECT navi_index, data FROM navi_data WHERE way_id = ?1 ORDER BY rowid")
        .map_err(sqlite_failure("prepare navi data query"))?;
    let rows = statement
        .query_map([key], |row| {
            Ok((
                row.get::<_, Option<i64>>(0)?,
                row.get::<_, Option<Vec<u8>>>(1)?,
            ))
        })
        .map_err(sqlite_failure("query navi data"))?;

    let mut entries = Vec::new();
    for row in rows {
        let (navi_index, data) = row.map_err(sqlite_failure("read navi data row"))?;
        entries.push(decode_entry(navi_index, data)?);
    }

    Ok((!entries.is_empty()).then_some(entries))
}

/// The first entry with `navi_index`, in insertion order.
pub(super) fn select_navi_entry(
    connection: &Connection,
    way_id: WayId,
    navi_index: u8,
) -> Result<Option<NaviData>, NaviStoreError> {
    let key = encode_way_id(way_id)?;
    let row: Option<(Option<i64>, Option<Vec<u8>>)> = connection
        .prepare_cached(
            "SELECT navi_index, data FROM navi_data
             WHERE way_id = ?1 AND navi_index = ?2 ORDER BY rowid LIMIT 1",
        )
        .and_then(|mut statement| {
            statement
                .query_row((key, navi_index), |row| Ok((row.get(0)?, row.get(1)?)))
                .optional()
        })
        .map_err(sqlite_failure("query navi data entry"))?;
    row.map(|(index, data)| decode_entry(index, data)).transpose()
}

pub(super) fn delete_navi_data(
    connection: &Connection,
    way_id: WayId,
) -> Result<usize, NaviStoreError> {
    let key = encode_way_id(way_id)?;
    connection
        .prepare_cached("DELETE FROM navi_data WHERE way_id = ?1")
        .and_then(|mut statement| statement.execute([key]))
        .map_err(sqlite_failure("delete navi data"))
}
