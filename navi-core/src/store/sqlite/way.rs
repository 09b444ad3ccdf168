//! Statements on the `way` table.

use rusqlite::{Connection, OptionalExtension};

use super::{
    NaviStoreError,
    codec::{decode_link, decode_speed, decode_way_id, encode_link, encode_speed, encode_way_id},
    error::sqlite_failure,
};
use crate::{SpeedLimitId, Way, WayId};

type WayRow = (i64, Option<i64>, Option<i64>, Option<i64>, Option<i64>);

fn decode_way(row: WayRow) -> Result<Way, NaviStoreError> {
    let (way_id, pre_way_id, next_way_id, speed_min, speed_max) = row;
    Ok(Way {
        way_id: decode_way_id(way_id)?,
        pre_way_id: decode_link("pre_way_id", pre_way_id)?,
        next_way_id: decode_link("next_way_id", next_way_id)?,
        speed_min: decode_speed("speed_min", speed_min)?,
        speed_max: decode_speed("speed_max", speed_max)?,
    })
}

pub(super) fn insert_way(connection: &Connection, way: &Way) -> Result<(), NaviStoreError> {
    let params = (
        encode_way_id(way.way_id)?,
        encode_link("pre_way_id", way.pre_way_id)?,
        encode_link("next_way_id", way.next_way_id)?,
        encode_speed(way.speed_min),
        encode_speed(way.speed_max),
    );
    connection
        .prepare_cached(
            "INSERT INTO way (way_id, pre_way_id, next_way_id, speed_min, speed_max)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .and_then(|mut statement| statement.execute(params))
        .map_err(sqlite_failure("insert way"))?;
    Ok(())
}

pub(super) fn select_way(
    connection: &Connection,
    way_id: WayId,
) -> Result<Option<Way>, NaviStoreError> {
    let key = encode_way_id(way_id)?;
    let row: Option<WayRow> = connection
        .prepare_cached(
            "SELECT way_id, pre_way_id, next_way_id, speed_min, speed_max
             FROM way WHERE way_id = ?1",
        )
        .and_then(|mut statement| {
            statement
                .query_row([key], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
                })
                .optional()
        })
        .map_err(sqlite_failure("query way"))?;
    row.map(decode_way).transpose()
}

pub(super) fn update_way(connection: &Connection, way: &Way) -> Result<bool, NaviStoreError> {
    let params = (
        encode_way_id(way.way_id)?,
        encode_link("pre_way_id", way.pre_way_id)?,
        encode_link("next_way_id", way.next_way_id)?,
        encode_speed(way.speed_min),
        encode_speed(way.speed_max),
    );
    let changed = connection
        .prepare_cached(
            "UPDATE way SET pre_way_id = ?2, next_way_id = ?3, speed_min = ?4, speed_max = ?5
             WHERE way_id = ?1",
        )
        .and_then(|mut statement| statement.execute(params))
        .map_err(sqlite_failure("update way"))?;
    Ok(changed > 0)
}

pub(super) fn update_speed_limit(
    connection: &Connection,
    way_id: WayId,
    speed_min: Option<SpeedLimitId>,
    speed_max: Option<SpeedLimitId>,
) -> Result<bool, NaviStoreError> {
    let params = (
        encode_way_id(way_id)?,
        encode_speed(speed_min),
        encode_speed(speed_max),
    );
    let changed = connection
        .prepare_cached("UPDATE way SET speed_min = ?2, speed_max = ?3 WHERE way_id = ?1")
        .and_then(|mut statement| statement.execute(params))
        .map_err(sqlite_failure("update way speed limit"))?;
    Ok(changed > 0)
}

pub(super) fn delete_way_row(
    connection: &Connection,
    way_id: WayId,
) -> Result<bool, NaviStoreError> {
    let key = encode_way_id(way_id)?;
    let removed = connection
        .prepare_cached("DELETE FROM way WHERE way_id = ?1")
        .and_then(|mut statement| statement.execute([key]))
        .map_err(sqlite_failure("delete way"))?;
    Ok(removed > 0)
}

/// Largest stored way id, `None` for an empty table.
pub(super) fn max_way_id(connection: &Connection) -> Result<Option<WayId>, NaviStoreError> {
    let max: Option<i64> = connection
        .query_row("SELECT max(way_id) FROM way", [], |row| row.get(0))
        .map_err(sqlite_failure("query max way id"))?;
    max.map(decode_way_id).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::sqlite::schema::create_schema;
    use crate::test_support::{linked_way, way_id};
    use rstest::{fixture, rstest};

    #[fixture]
    fn connection() -> Connection {
        let connection = Connection::open_in_memory().expect("open in-memory database");
        create_schema(&connection).expect("create schema");
        connection
    }

    #[rstest]
    fn absent_links_are_stored_as_null(connection: Connection) {
        insert_way(&connection, &Way::new(way_id(4))).expect("insert");
        let nulls: i64 = connection
            .query_row(
                "SELECT count(*) FROM way WHERE pre_way_id IS NULL AND next_way_id IS NULL",
                [],
                |row| row.get(0),
            )
            .expect("count null links");
        assert_eq!(nulls, 1);
    }

    #[rstest]
    fn legacy_zero_links_read_as_absent(connection: Connection) {
        connection
            .execute(
                "INSERT INTO way (way_id, pre_way_id, next_way_id) VALUES (5, 0, 0)",
                [],
            )
            .expect("insert legacy row");
        let way = select_way(&connection, way_id(5))
            .expect("query")
            .expect("way present");
        assert_eq!(way, Way::new(way_id(5)));
    }

    #[rstest]
    fn max_tracks_largest_id(connection: Connection) {
        assert_eq!(max_way_id(&connection).expect("empty max"), None);
        insert_way(&connection, &linked_way(way_id(3))).expect("insert 3");
        insert_way(&connection, &Way::new(way_id(9))).expect("insert 9");
        assert_eq!(max_way_id(&connection).expect("max"), Some(way_id(9)));
    }

    #[rstest]
    fn update_reports_missing_rows(connection: Connection) {
        assert!(!update_way(&connection, &Way::new(way_id(1))).expect("update"));
        assert!(!update_speed_limit(&connection, way_id(1), None, None).expect("update speeds"));
    }
}
