//! Helpers shared by the integration test binaries.
// Each test binary uses a subset of these helpers.
#![allow(dead_code)]

use camino::Utf8PathBuf;
use navi_core::{NaviStore, ShardId, SqliteNaviStore, StoreConfig, Way, WayId};
use tempfile::TempDir;

/// Build a way id from a non-zero literal.
pub fn way_id(raw: u64) -> WayId {
    WayId::new(raw).unwrap_or_else(|| panic!("way id literal {raw} must be non-zero"))
}

/// An in-memory store with the schema created.
pub fn initialised_store() -> SqliteNaviStore {
    initialised_store_with(&StoreConfig::default())
}

/// An in-memory store opened with `config`, schema created.
pub fn initialised_store_with(config: &StoreConfig) -> SqliteNaviStore {
    let mut store = SqliteNaviStore::open_in_memory_with(config)
        .unwrap_or_else(|err| panic!("open in-memory store: {err}"));
    store
        .init_database()
        .unwrap_or_else(|err| panic!("initialise schema: {err}"));
    store
}

/// Store configuration for a database file inside `dir`.
pub fn file_config(dir: &TempDir) -> StoreConfig {
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .unwrap_or_else(|path| panic!("temp dir {path:?} is not UTF-8"));
    StoreConfig::at_path(root.join("navi.sqlite"))
}

/// Insert `rows` placeholder entries into the table of `shard`, creating it
/// if needed.
pub fn fill_shard(store: &SqliteNaviStore, shard: ShardId, rows: u64) {
    store
        .ensure_shard_table(shard)
        .unwrap_or_else(|err| panic!("ensure shard {shard}: {err}"));
    if rows == 0 {
        return;
    }
    let rows = i64::try_from(rows).unwrap_or_else(|_| panic!("row count {rows} too large"));
    store
        .connection()
        .execute(
            &format!(
                "INSERT INTO {} (way_id, navi_index, data)
                 WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < ?1)
                 SELECT NULL, 0, x'00' FROM seq",
                navi_core::ShardRegistry::table_name(shard)
            ),
            [rows],
        )
        .unwrap_or_else(|err| panic!("fill shard {shard}: {err}"));
}

/// Save a bare way, panicking on failure.
pub fn save_bare_way(store: &mut SqliteNaviStore, raw: u64) {
    store
        .save_way(&Way::new(way_id(raw)))
        .unwrap_or_else(|err| panic!("save way {raw}: {err}"));
}
