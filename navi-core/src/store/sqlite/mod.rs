//! SQLite-backed navigation store.
//!
//! [`SqliteNaviStore`] owns one connection. Multi-statement writes run in a
//! single transaction that is committed on success and rolled back on the
//! first failure, so callers never observe a half-written aggregate.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use log::{debug, error, info};
use rusqlite::{Connection, OpenFlags, TransactionBehavior};

use crate::{
    DEFAULT_BUSY_TIMEOUT, NaviData, NaviInfo, NewWay, ShardId, SpeedLimit, SpeedLimitId,
    StoreConfig, Way, WayData, WayId, WayNodes,
    store::{InitOutcome, NaviStore, TableName},
};

mod allocator;
mod codec;
mod error;
mod navi_data;
mod nodes;
mod schema;
mod shard;
mod shared;
mod way;
mod way_data;

pub use error::NaviStoreError;
pub use shard::ShardRegistry;
pub use shared::SharedNaviStore;

use error::sqlite_failure;

/// Navigation store backed by a single SQLite connection.
///
/// The store is `Send` but not `Sync`; wrap it in [`SharedNaviStore`] to use
/// it from several threads.
#[derive(Debug)]
pub struct SqliteNaviStore {
    connection: Connection,
    config: StoreConfig,
    shards: ShardRegistry,
}

impl SqliteNaviStore {
    /// Open (or create) the database file named by `config`.
    ///
    /// Missing parent directories are created. The schema is not touched;
    /// call [`SqliteNaviStore::init_database`] before the first write.
    pub fn open(config: &StoreConfig) -> Result<Self, NaviStoreError> {
        ensure_parent_dir(&config.database_path)?;
        Self::open_with_flags(config, OpenFlags::default())
    }

    /// Open a database file that must already exist.
    ///
    /// Nothing is created on disk; a missing file is [`NaviStoreError::Open`].
    pub fn open_existing(config: &StoreConfig) -> Result<Self, NaviStoreError> {
        Self::open_with_flags(
            config,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }

    fn open_with_flags(config: &StoreConfig, flags: OpenFlags) -> Result<Self, NaviStoreError> {
        let path = config.database_path.as_path();
        let connection = Connection::open_with_flags(path.as_std_path(), flags).map_err(|source| {
            error!("opening {path} failed: {source}");
            NaviStoreError::Open {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let store = Self::configure(connection, config.clone())?;
        info!("opened navigation database at {path}");
        Ok(store)
    }

    /// An in-memory store with default settings.
    pub fn open_in_memory() -> Result<Self, NaviStoreError> {
        Self::open_in_memory_with(&StoreConfig::default())
    }

    /// An in-memory store; `config.database_path` is ignored.
    pub fn open_in_memory_with(config: &StoreConfig) -> Result<Self, NaviStoreError> {
        let connection = Connection::open_in_memory().map_err(|source| NaviStoreError::Open {
            path: Utf8PathBuf::from(":memory:"),
            source,
        })?;
        Self::configure(connection, config.clone())
    }

    fn configure(connection: Connection, config: StoreConfig) -> Result<Self, NaviStoreError> {
        connection
            .pragma_update(None, "foreign_keys", config.enforce_foreign_keys)
            .map_err(|source| {
                error!("configuring foreign keys failed: {source}");
                NaviStoreError::ForeignKeys { source }
            })?;
        connection
            .busy_timeout(DEFAULT_BUSY_TIMEOUT)
            .map_err(sqlite_failure("set busy timeout"))?;
        Ok(Self {
            connection,
            config,
            shards: ShardRegistry::new(),
        })
    }

    /// Close the connection, reporting any error SQLite raises while doing so.
    pub fn close(self) -> Result<(), NaviStoreError> {
        self.connection
            .close()
            .map_err(|(_, source)| sqlite_failure("close database")(source))
    }

    /// The underlying connection, for diagnostics and ad hoc queries.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Settings the store was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn in_transaction<T>(
        &mut self,
        behavior: TransactionBehavior,
        operation: &'static str,
        body: impl FnOnce(&Connection) -> Result<T, NaviStoreError>,
    ) -> Result<T, NaviStoreError> {
        let transaction = self
            .connection
            .transaction_with_behavior(behavior)
            .map_err(sqlite_failure("begin transaction"))?;
        match body(&transaction) {
            Ok(value) => {
                transaction
                    .commit()
                    .map_err(sqlite_failure("commit transaction"))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(source) = transaction.rollback() {
                    error!("rolling back {operation} failed: {source}");
                } else {
                    debug!("rolled back {operation}");
                }
                Err(err)
            }
        }
    }

    /// Create the schema and seed the speed limits unless the `way` table
    /// already exists.
    ///
    /// The existence check runs inside the write transaction, so concurrent
    /// callers on one file see exactly one `Created`.
    pub fn init_database(&mut self) -> Result<InitOutcome, NaviStoreError> {
        let outcome = self.in_transaction(
            TransactionBehavior::Immediate,
            "initialise database",
            |connection| {
                if schema::table_exists_named(connection, TableName::Way.name())? {
                    return Ok(InitOutcome::AlreadyInitialised);
                }
                schema::create_schema(connection)?;
                Ok(InitOutcome::Created)
            },
        )?;
        match outcome {
            InitOutcome::Created => info!("initialised navigation database schema"),
            InitOutcome::AlreadyInitialised => debug!("database already initialised"),
        }
        Ok(outcome)
    }

    /// Whether `table` is present in the catalogue.
    pub fn table_exists(&self, table: TableName) -> Result<bool, NaviStoreError> {
        schema::table_exists_named(&self.connection, table.name())
    }

    /// [`SqliteNaviStore::table_exists`] addressed by table index.
    pub fn table_exists_at(&self, index: usize) -> Result<bool, NaviStoreError> {
        self.table_exists(TableName::try_from(index)?)
    }

    /// Create `table`. Fails if it already exists.
    pub fn create_table(&mut self, table: TableName) -> Result<(), NaviStoreError> {
        self.in_transaction(TransactionBehavior::Deferred, "create table", |connection| {
            schema::create_table(connection, table)
        })
    }

    /// [`SqliteNaviStore::create_table`] addressed by table index.
    pub fn create_table_at(&mut self, index: usize) -> Result<(), NaviStoreError> {
        self.create_table(TableName::try_from(index)?)
    }

    /// Insert the thirteen speed limit rows in one transaction.
    pub fn seed_speed_limits(&mut self) -> Result<(), NaviStoreError> {
        self.in_transaction(
            TransactionBehavior::Deferred,
            "seed speed limits",
            schema::seed_speed_limits,
        )
    }

    /// Every speed limit row, ordered by id.
    pub fn query_speed_limits(&self) -> Result<Vec<SpeedLimit>, NaviStoreError> {
        schema::query_speed_limits(&self.connection)
    }

    /// Number of rows in `table`.
    pub fn table_row_count(&self, table: TableName) -> Result<u64, NaviStoreError> {
        schema::row_count_named(&self.connection, table.name())
    }

    /// Create the table for `shard` if it is missing.
    pub fn ensure_shard_table(&self, shard: ShardId) -> Result<(), NaviStoreError> {
        self.shards.ensure(&self.connection, shard)
    }

    /// Rows held by `shard`; zero when its table does not exist.
    pub fn shard_row_count(&self, shard: ShardId) -> Result<u64, NaviStoreError> {
        self.shards.row_count(&self.connection, shard)
    }

    /// Shard tables present in the database.
    pub fn shards(&self) -> Result<Vec<ShardId>, NaviStoreError> {
        self.shards.list(&self.connection)
    }
}

impl NaviStore for SqliteNaviStore {
    type Error = NaviStoreError;

    fn save_way(&mut self, way: &Way) -> Result<(), Self::Error> {
        way::insert_way(&self.connection, way)
    }

    fn save_way_nodes(&mut self, way_nodes: &WayNodes) -> Result<(), Self::Error> {
        self.in_transaction(TransactionBehavior::Deferred, "save way nodes", |connection| {
            nodes::insert_nodes(connection, way_nodes)
        })
    }

    fn save_way_data(&mut self, way_data: &WayData) -> Result<(), Self::Error> {
        way_data::insert_way_data(&self.connection, way_data)
    }

    fn save_navi_info(&mut self, navi_info: &NaviInfo) -> Result<(), Self::Error> {
        self.in_transaction(TransactionBehavior::Deferred, "save navi info", |connection| {
            navi_data::insert_navi_info(connection, navi_info)
        })
    }

    fn query_way(&self, way_id: WayId) -> Result<Option<Way>, Self::Error> {
        way::select_way(&self.connection, way_id)
    }

    fn query_way_nodes(&self, way_id: WayId) -> Result<Option<WayNodes>, Self::Error> {
        nodes::select_nodes(&self.connection, way_id)
    }

    fn query_way_data(&self, way_id: WayId) -> Result<Option<WayData>, Self::Error> {
        way_data::select_way_data(&self.connection, way_id)
    }

    fn query_navi_data(&self, way_id: WayId) -> Result<Option<Vec<NaviData>>, Self::Error> {
        navi_data::select_navi_data(&self.connection, way_id)
    }

    fn query_navi_data_entry(
        &self,
        way_id: WayId,
        navi_index: u8,
    ) -> Result<Option<NaviData>, Self::Error> {
        navi_data::select_navi_entry(&self.connection, way_id, navi_index)
    }

    fn update_way(&mut self, way: &Way) -> Result<bool, Self::Error> {
        way::update_way(&self.connection, way)
    }

    fn update_way_speed_limit(
        &mut self,
        way_id: WayId,
        speed_min: Option<SpeedLimitId>,
        speed_max: Option<SpeedLimitId>,
    ) -> Result<bool, Self::Error> {
        way::update_speed_limit(&self.connection, way_id, speed_min, speed_max)
    }

    fn update_way_nodes(&mut self, way_nodes: &WayNodes) -> Result<(), Self::Error> {
        self.in_transaction(TransactionBehavior::Deferred, "replace way nodes", |connection| {
            nodes::delete_nodes(connection, way_nodes.way_id)?;
            nodes::insert_nodes(connection, way_nodes)
        })
    }

    fn update_way_data(&mut self, way_data: &WayData) -> Result<bool, Self::Error> {
        way_data::update_way_data(&self.connection, way_data)
    }

    fn update_navi_info(&mut self, navi_info: &NaviInfo) -> Result<(), Self::Error> {
        self.in_transaction(TransactionBehavior::Deferred, "replace navi info", |connection| {
            navi_data::delete_navi_data(connection, navi_info.way_id)?;
            navi_data::insert_navi_info(connection, navi_info)
        })
    }

    fn delete_way(&mut self, way_id: WayId) -> Result<bool, Self::Error> {
        let existed = self.in_transaction(
            TransactionBehavior::Deferred,
            "delete way",
            |connection| {
                let existed = way::delete_way_row(connection, way_id)?;
                nodes::delete_nodes(connection, way_id)?;
                way_data::delete_way_data(connection, way_id)?;
                navi_data::delete_navi_data(connection, way_id)?;
                Ok(existed)
            },
        )?;
        debug!("deleted way {way_id} (existed: {existed})");
        Ok(existed)
    }

    fn delete_way_nodes(&mut self, way_id: WayId) -> Result<usize, Self::Error> {
        nodes::delete_nodes(&self.connection, way_id)
    }

    fn delete_way_data(&mut self, way_id: WayId) -> Result<usize, Self::Error> {
        way_data::delete_way_data(&self.connection, way_id)
    }

    fn delete_navi_data(&mut self, way_id: WayId) -> Result<usize, Self::Error> {
        navi_data::delete_navi_data(&self.connection, way_id)
    }

    fn next_way_id(&self) -> Result<WayId, Self::Error> {
        allocator::next_way_id(&self.connection)
    }

    fn create_way(&mut self, new_way: &NewWay) -> Result<Way, Self::Error> {
        self.in_transaction(TransactionBehavior::Immediate, "create way", |connection| {
            allocator::create_way(connection, new_way)
        })
    }

    fn navi_table_shard(&self) -> Result<ShardId, Self::Error> {
        allocator::navi_table_shard(
            &self.connection,
            &self.shards,
            self.config.max_rows_per_shard,
        )
    }
}

fn ensure_parent_dir(path: &Utf8Path) -> Result<(), NaviStoreError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base, relative) = if parent.is_absolute() {
        ("/", parent.strip_prefix("/").unwrap_or(parent))
    } else {
        (".", parent)
    };
    let create_failed = |source: std::io::Error| NaviStoreError::CreateDirectory {
        path: parent.to_path_buf(),
        source,
    };
    fs_utf8::Dir::open_ambient_dir(base, ambient_authority())
        .and_then(|dir| dir.create_dir_all(relative))
        .map_err(create_failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{initialised_store, sample_nodes, way_id};
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    fn init_is_idempotent() {
        let mut store = SqliteNaviStore::open_in_memory().expect("open store");
        assert_eq!(store.init_database().expect("first init"), InitOutcome::Created);
        assert_eq!(
            store.init_database().expect("second init"),
            InitOutcome::AlreadyInitialised
        );
        assert_eq!(store.table_row_count(TableName::SpeedLimit).expect("count"), 13);
    }

    #[rstest]
    fn init_rolls_back_when_a_table_already_exists() {
        let mut store = SqliteNaviStore::open_in_memory().expect("open store");
        store
            .create_table(TableName::WayData)
            .expect("pre-create way_data");
        let err = store.init_database().expect_err("init must fail");
        assert!(matches!(
            err,
            NaviStoreError::Sqlite {
                operation: "create way_data table",
                ..
            }
        ));
        assert!(!store.table_exists(TableName::SpeedLimit).expect("lookup"));
        assert!(!store.table_exists(TableName::Way).expect("lookup"));
    }

    #[rstest]
    #[case(5)]
    #[case(42)]
    fn index_based_access_rejects_unknown_tables(#[case] index: usize) {
        let mut store = SqliteNaviStore::open_in_memory().expect("open store");
        assert!(matches!(
            store.table_exists_at(index),
            Err(NaviStoreError::InvalidTableIndex(_))
        ));
        assert!(matches!(
            store.create_table_at(index),
            Err(NaviStoreError::InvalidTableIndex(_))
        ));
    }

    #[rstest]
    fn creates_missing_parent_directories() {
        let dir = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
        let config = StoreConfig::at_path(root.join("nested/deeper/navi.sqlite"));
        let mut store = SqliteNaviStore::open(&config).expect("open store");
        store.init_database().expect("init");
        store.close().expect("close");
        assert!(root.join("nested/deeper/navi.sqlite").exists());
    }

    #[rstest]
    fn open_existing_leaves_missing_files_alone() {
        let dir = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
        let path = root.join("typo/navi.sqlite");
        let err = SqliteNaviStore::open_existing(&StoreConfig::at_path(path.clone()))
            .expect_err("missing file must not open");
        assert!(matches!(err, NaviStoreError::Open { .. }));
        assert!(!path.exists());
        assert!(!root.join("typo").exists());
    }

    #[rstest]
    fn open_existing_reads_an_initialised_file() {
        let dir = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
        let config = StoreConfig::at_path(root.join("navi.sqlite"));
        let mut store = SqliteNaviStore::open(&config).expect("open store");
        store.init_database().expect("init");
        store.close().expect("close");

        let mut reopened = SqliteNaviStore::open_existing(&config).expect("reopen");
        assert_eq!(
            reopened.init_database().expect("init again"),
            InitOutcome::AlreadyInitialised
        );
        assert_eq!(reopened.next_way_id().expect("next id"), WayId::FIRST);
    }

    #[rstest]
    fn replacing_nodes_is_atomic() {
        let mut store = initialised_store();
        store.create_way(&NewWay::default()).expect("create way");
        store.save_way_nodes(&sample_nodes(way_id(1))).expect("save nodes");

        let mut broken = sample_nodes(way_id(1));
        broken.nodes[1].node_index = u64::MAX;
        let err = store.update_way_nodes(&broken).expect_err("out-of-range node");
        assert!(matches!(err, NaviStoreError::IdOutOfRange { field: "node_index", .. }));

        assert_eq!(
            store.query_way_nodes(way_id(1)).expect("query"),
            Some(sample_nodes(way_id(1)))
        );
    }

    #[rstest]
    fn save_nodes_is_all_or_nothing() {
        let mut store = initialised_store();
        store.create_way(&NewWay::default()).expect("create way");
        let mut broken = sample_nodes(way_id(1));
        broken.nodes[2].data_line_number = u64::MAX;
        store.save_way_nodes(&broken).expect_err("out-of-range line");
        assert_eq!(store.query_way_nodes(way_id(1)).expect("query"), None);
    }
}
