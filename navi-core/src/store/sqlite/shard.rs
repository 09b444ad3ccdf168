//! Navigation shard tables.
//!
//! Navigation entries may be split across tables named `navi_data_{id}`.
//! [`ShardRegistry`] is the only place that formats those names.

use std::{cell::RefCell, collections::BTreeSet};

use log::{debug, info};
use rusqlite::Connection;

use super::{
    NaviStoreError,
    error::sqlite_failure,
    schema::{NAVI_DATA_COLUMNS, row_count_named, table_exists_named},
};
use crate::ShardId;

const SHARD_PREFIX: &str = "navi_data_";

/// Maps shard ids to table names and remembers which shard tables exist.
#[derive(Debug, Default)]
pub struct ShardRegistry {
    known: RefCell<BTreeSet<ShardId>>,
}

impl ShardRegistry {
    /// An empty registry; existence checks fall back to the catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the table backing `shard`.
    ///
    /// # Examples
    ///
    /// ```
    /// use navi_core::{ShardId, ShardRegistry};
    ///
    /// assert_eq!(ShardRegistry::table_name(ShardId::new(2)), "navi_data_2");
    /// ```
    pub fn table_name(shard: ShardId) -> String {
        format!("{SHARD_PREFIX}{shard}")
    }

    /// Whether the table for `shard` exists.
    pub fn exists(&self, connection: &Connection, shard: ShardId) -> Result<bool, NaviStoreError> {
        if self.known.borrow().contains(&shard) {
            return Ok(true);
        }
        let exists = table_exists_named(connection, &Self::table_name(shard))?;
        if exists {
            self.known.borrow_mut().insert(shard);
        }
        Ok(exists)
    }

    /// Create the table for `shard` if it is missing.
    pub fn ensure(&self, connection: &Connection, shard: ShardId) -> Result<(), NaviStoreError> {
        let name = Self::table_name(shard);
        if table_exists_named(connection, &name)? {
            self.known.borrow_mut().insert(shard);
            return Ok(());
        }
        connection
            .execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {name} (
                    {NAVI_DATA_COLUMNS}
                );
                CREATE INDEX IF NOT EXISTS idx_{name}_way_id ON {name}(way_id);"
            ))
            .map_err(sqlite_failure("create navi shard table"))?;
        self.known.borrow_mut().insert(shard);
        info!("created navigation shard table {name}");
        Ok(())
    }

    /// Rows held by `shard`; a missing table holds none.
    ///
    /// Consults the catalogue on every call; a dropped shard table is
    /// forgotten.
    pub fn row_count(
        &self,
        connection: &Connection,
        shard: ShardId,
    ) -> Result<u64, NaviStoreError> {
        let name = Self::table_name(shard);
        if !table_exists_named(connection, &name)? {
            if self.known.borrow_mut().remove(&shard) {
                debug!("shard table {name} was dropped; forgetting it");
            }
            debug!("shard table for {shard} is absent; counting it as empty");
            return Ok(0);
        }
        self.known.borrow_mut().insert(shard);
        row_count_named(connection, &name)
    }

    /// Shard tables present in the catalogue, in ascending order.
    pub fn list(&self, connection: &Connection) -> Result<Vec<ShardId>, NaviStoreError> {
        let mut statement = connection
            .prepare_cached(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name GLOB 'navi_data_[0-9]*'",
            )
            .map_err(sqlite_failure("prepare shard listing"))?;
        let names = statement
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(sqlite_failure("list shard tables"))?;

        let mut shards = BTreeSet::new();
        for name in names {
            let name = name.map_err(sqlite_failure("read shard table name"))?;
            match name
                .strip_prefix(SHARD_PREFIX)
                .and_then(|suffix| suffix.parse::<u64>().ok())
            {
                Some(raw) => {
                    shards.insert(ShardId::new(raw));
                }
                None => debug!("ignoring table {name}: not a shard table"),
            }
        }
        self.known.borrow_mut().extend(shards.iter().copied());
        Ok(shards.into_iter().collect())
    }
}
