//! Statements on the `way_nodes` table.

use rusqlite::Connection;

use super::{
    NaviStoreError,
    codec::{decode_u64, encode_u64, encode_way_id},
    error::sqlite_failure,
};
use crate::{Node, WayId, WayNodes};

/// Insert every node of the list. Callers wrap this in a transaction.
pub(super) fn insert_nodes(
    connection: &Connection,
    way_nodes: &WayNodes,
) -> Result<(), NaviStoreError> {
    let way_id = encode_way_id(way_nodes.way_id)?;
    let mut statement = connection
        .prepare_cached(
            "INSERT INTO way_nodes (way_id, node_index, data_line_number, node_value)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .map_err(sqlite_failure("prepare way node insert"))?;
    for node in &way_nodes.nodes {
        let node_index = encode_u64("node_index", node.node_index)?;
        let data_line_number = encode_u64("data_line_number", node.data_line_number)?;
        statement
            .execute((way_id, node_index, data_line_number, node.node_value.as_str()))
            .map_err(sqlite_failure("insert way node"))?;
    }
    Ok(())
}

pub(super) fn select_nodes(
    connection: &Connection,
    way_id: WayId,
) -> Result<Option<WayNodes>, NaviStoreError> {
    let key = encode_way_id(way_id)?;
    let mut statement = connection
        .prepare_cached(
            "SELECT node_index, data_line_number, node_value
             FROM way_nodes WHERE way_id = ?1 ORDER BY rowid",
        )
        .map_err(sqlite_failure("prepare way node query"))?;
    let rows = statement
        .query_map([key], |row| {
            Ok((
                row.get::<_, Option<i64>>(0)?,
                row.get::<_, Option<i64>>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })
        .map_err(sqlite_failure("query way nodes"))?;

    let mut nodes = Vec::new();
    for row in rows {
        let (node_index, data_line_number, node_value) =
            row.map_err(sqlite_failure("read way node row"))?;
        nodes.push(Node {
            node_index: decode_u64("node_index", node_index.unwrap_or_default())?,
            data_line_number: decode_u64("data_line_number", data_line_number.unwrap_or_default())?,
            node_value: node_value.unwrap_or_default(),
        });
    }

    if nodes.is_empty() {
        return Ok(None);
    }
    Ok(Some(WayNodes::new(way_id, nodes)))
}

pub(super) fn delete_nodes(
    connection: &Connection,
    way_id: WayId,
) -> Result<usize, NaviStoreError> {
    let key = encode_way_id(way_id)?;
    connection
        .prepare_cached("DELETE FROM way_nodes WHERE way_id = ?1")
        .and_then(|mut statement| statement.execute([key]))
        .map_err(sqlite_failure("delete way nodes"))
}
