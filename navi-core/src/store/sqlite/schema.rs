//! Table definitions, catalogue lookups and speed limit seeding.

use log::debug;
use rusqlite::Connection;

use super::{NaviStoreError, codec::decode_u64, error::sqlite_failure};
use crate::{SpeedLimit, SpeedLimitId, store::TableName};

/// Column layout shared by `navi_data` and its shard tables.
pub(super) const NAVI_DATA_COLUMNS: &str = "way_id INTEGER REFERENCES way(way_id) \
     ON UPDATE CASCADE ON DELETE CASCADE,
    navi_index INTEGER,
    data BLOB";

fn table_ddl(table: TableName) -> String {
    match table {
        TableName::SpeedLimit => "CREATE TABLE speed_limit (
                id INTEGER PRIMARY KEY,
                speed INTEGER NOT NULL
            );"
        .to_owned(),
        TableName::Way => "CREATE TABLE way (
                way_id INTEGER PRIMARY KEY,
                pre_way_id INTEGER,
                next_way_id INTEGER,
                speed_min INTEGER REFERENCES speed_limit(id) ON UPDATE CASCADE,
                speed_max INTEGER REFERENCES speed_limit(id) ON UPDATE CASCADE
            );"
        .to_owned(),
        TableName::WayNodes => "CREATE TABLE way_nodes (
                way_id INTEGER REFERENCES way(way_id) ON UPDATE CASCADE ON DELETE CASCADE,
                node_index INTEGER,
                data_line_number INTEGER,
                node_value TEXT
            );
            CREATE INDEX idx_way_nodes_way_id ON way_nodes(way_id);"
            .to_owned(),
        TableName::WayData => "CREATE TABLE way_data (
                way_id INTEGER PRIMARY KEY REFERENCES way(way_id)
                    ON UPDATE CASCADE ON DELETE CASCADE,
                raw_data BLOB,
                navi_number INTEGER,
                navi_table_id INTEGER
            );"
        .to_owned(),
        TableName::NaviData => format!(
            "CREATE TABLE navi_data (
                {NAVI_DATA_COLUMNS}
            );
            CREATE INDEX idx_navi_data_way_id ON navi_data(way_id);"
        ),
    }
}

fn create_operation(table: TableName) -> &'static str {
    match table {
        TableName::SpeedLimit => "create speed_limit table",
        TableName::Way => "create way table",
        TableName::WayNodes => "create way_nodes table",
        TableName::WayData => "create way_data table",
        TableName::NaviData => "create navi_data table",
    }
}

/// Whether the catalogue lists a table called `name`.
pub(super) fn table_exists_named(
    connection: &Connection,
    name: &str,
) -> Result<bool, NaviStoreError> {
    connection
        .prepare_cached("SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")
        .and_then(|mut statement| statement.query_row([name], |row| row.get::<_, i64>(0)))
        .map(|count| count > 0)
        .map_err(sqlite_failure("look up table in catalogue"))
}

/// Run the DDL of one table. Fails if the table already exists.
pub(super) fn create_table(
    connection: &Connection,
    table: TableName,
) -> Result<(), NaviStoreError> {
    connection
        .execute_batch(&table_ddl(table))
        .map_err(sqlite_failure(create_operation(table)))?;
    debug!("created table {table}");
    Ok(())
}

/// Insert the thirteen speed limit rows.
pub(super) fn seed_speed_limits(connection: &Connection) -> Result<(), NaviStoreError> {
    let mut statement = connection
        .prepare_cached("INSERT INTO speed_limit (id, speed) VALUES (?1, ?2)")
        .map_err(sqlite_failure("prepare speed limit seed"))?;
    for row in SpeedLimit::seed() {
        statement
            .execute((row.id.get(), row.speed))
            .map_err(sqlite_failure("seed speed limit"))?;
    }
    Ok(())
}

/// Create every table in order and seed the speed limits.
pub(super) fn create_schema(connection: &Connection) -> Result<(), NaviStoreError> {
    for table in TableName::ALL {
        create_table(connection, table)?;
    }
    seed_speed_limits(connection)
}

pub(super) fn query_speed_limits(
    connection: &Connection,
) -> Result<Vec<SpeedLimit>, NaviStoreError> {
    let mut statement = connection
        .prepare_cached("SELECT id, speed FROM speed_limit ORDER BY id")
        .map_err(sqlite_failure("prepare speed limit query"))?;
    let rows = statement
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))
        .map_err(sqlite_failure("query speed limits"))?;

    let mut limits = Vec::new();
    for row in rows {
        let (id, speed) = row.map_err(sqlite_failure("read speed limit row"))?;
        let id = u8::try_from(id)
            .ok()
            .and_then(|raw| SpeedLimitId::new(raw).ok())
            .ok_or(NaviStoreError::InvalidStoredValue {
                field: "speed_limit.id",
                value: id,
            })?;
        let speed = u32::try_from(speed).map_err(|_| NaviStoreError::InvalidStoredValue {
            field: "speed_limit.speed",
            value: speed,
        })?;
        limits.push(SpeedLimit { id, speed });
    }
    Ok(limits)
}

/// Number of rows in the table called `name`. The caller guarantees the
/// name is a known identifier.
pub(super) fn row_count_named(connection: &Connection, name: &str) -> Result<u64, NaviStoreError> {
    let count: i64 = connection
        .query_row(&format!("SELECT count(*) FROM {name}"), [], |row| row.get(0))
        .map_err(sqlite_failure("count table rows"))?;
    decode_u64("row count", count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn connection() -> Connection {
        Connection::open_in_memory().expect("open in-memory database")
    }

    #[rstest]
    fn creates_schema_in_order(connection: Connection) {
        create_schema(&connection).expect("create schema");
        for table in TableName::ALL {
            assert!(
                table_exists_named(&connection, table.name()).expect("catalogue lookup"),
                "{table} should exist"
            );
        }
        assert_eq!(row_count_named(&connection, "speed_limit").expect("count"), 13);
    }

    #[rstest]
    fn creating_existing_table_fails(connection: Connection) {
        create_table(&connection, TableName::SpeedLimit).expect("first create");
        let err = create_table(&connection, TableName::SpeedLimit).expect_err("second create");
        assert!(matches!(
            err,
            NaviStoreError::Sqlite {
                operation: "create speed_limit table",
                ..
            }
        ));
    }

    #[rstest]
    fn seeded_speeds_follow_progression(connection: Connection) {
        create_table(&connection, TableName::SpeedLimit).expect("create table");
        seed_speed_limits(&connection).expect("seed");
        let limits = query_speed_limits(&connection).expect("query");
        assert_eq!(limits, SpeedLimit::seed().collect::<Vec<_>>());
        assert_eq!(limits.get(1).map(|row| row.speed), Some(40));
    }

    #[rstest]
    fn indexes_are_created_with_child_tables(connection: Connection) {
        create_schema(&connection).expect("create schema");
        let indexes: i64 = connection
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%'",
                [],
                |row| row.get(0),
            )
            .expect("count indexes");
        assert_eq!(indexes, 2);
    }
}
