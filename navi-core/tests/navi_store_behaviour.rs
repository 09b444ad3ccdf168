//! Behavioural tests for `SqliteNaviStore` using rstest-bdd.

mod support;

use std::{cell::RefCell, fs, path::PathBuf};

use navi_core::{
    InitOutcome, NaviData, NaviInfo, NaviStore, Node, ShardId, SqliteNaviStore, TableName, Way,
    WayData, WayNodes,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use support::way_id;

/// Shared state for navigation store scenarios.
struct NaviStoreWorld {
    store: RefCell<Option<SqliteNaviStore>>,
    init_outcome: RefCell<Option<InitOutcome>>,
}

impl NaviStoreWorld {
    fn new() -> Self {
        Self {
            store: RefCell::new(None),
            init_outcome: RefCell::new(None),
        }
    }

    fn with_store<T>(&self, action: impl FnOnce(&mut SqliteNaviStore) -> T) -> T {
        let mut borrowed = self.store.borrow_mut();
        let store = borrowed
            .as_mut()
            .expect("a database should be opened by an earlier step");
        action(store)
    }
}

#[fixture]
fn world() -> NaviStoreWorld {
    NaviStoreWorld::new()
}

#[given("an empty navigation database")]
fn empty_database(world: &NaviStoreWorld) {
    let store = SqliteNaviStore::open_in_memory().expect("open in-memory store");
    world.store.replace(Some(store));
}

#[given("an initialised navigation database")]
fn initialised_database(world: &NaviStoreWorld) {
    world.store.replace(Some(support::initialised_store()));
}

#[given("way 1 is saved without neighbours")]
fn way_without_neighbours(world: &NaviStoreWorld) {
    world.with_store(|store| store.save_way(&Way::new(way_id(1))).expect("save way"));
}

#[given("way 1 is saved with nodes, raw data and navigation entries")]
fn way_with_children(world: &NaviStoreWorld) {
    let id = way_id(1);
    world.with_store(|store| {
        store.save_way(&Way::new(id)).expect("save way");
        store
            .save_way_nodes(&WayNodes::new(
                id,
                vec![Node::new(0, 1, "a"), Node::new(1, 2, "b")],
            ))
            .expect("save nodes");
        store
            .save_way_data(&WayData {
                way_id: id,
                raw_data: vec![0x01],
                navi_number: 1,
                navi_table_id: ShardId::FIRST,
            })
            .expect("save way data");
        store
            .save_navi_info(&NaviInfo::new(id, vec![NaviData::new(0, [0x02])]))
            .expect("save navi info");
    });
}

#[when("the database is initialised")]
fn initialise(world: &NaviStoreWorld) {
    let outcome = world.with_store(|store| store.init_database().expect("initialise database"));
    world.init_outcome.replace(Some(outcome));
}

#[when("raw data AA BB is saved for way 1")]
fn save_raw_data(world: &NaviStoreWorld) {
    world.with_store(|store| {
        store
            .save_way_data(&WayData {
                way_id: way_id(1),
                raw_data: vec![0xAA, 0xBB],
                navi_number: 1,
                navi_table_id: ShardId::FIRST,
            })
            .expect("save way data");
    });
}

#[when("way 1 is deleted")]
fn delete_way(world: &NaviStoreWorld) {
    let existed = world.with_store(|store| store.delete_way(way_id(1)).expect("delete way"));
    assert!(existed, "way 1 should have existed");
}

#[then("every managed table exists")]
fn tables_exist(world: &NaviStoreWorld) {
    assert_eq!(*world.init_outcome.borrow(), Some(InitOutcome::Created));
    world.with_store(|store| {
        for table in TableName::ALL {
            assert!(store.table_exists(table).expect("lookup"), "{table} missing");
        }
    });
}

#[then("the speed limit table holds the thirteen seeded rows")]
fn speed_limits_seeded(world: &NaviStoreWorld) {
    let speeds: Vec<u32> = world.with_store(|store| {
        store
            .query_speed_limits()
            .expect("query speed limits")
            .into_iter()
            .map(|row| row.speed)
            .collect()
    });
    assert_eq!(speeds, (3..=15).map(|step| step * 10).collect::<Vec<u32>>());
}

#[then("initialisation reports the database was already present")]
fn already_initialised(world: &NaviStoreWorld) {
    assert_eq!(
        *world.init_outcome.borrow(),
        Some(InitOutcome::AlreadyInitialised)
    );
}

#[then("querying raw data for way 1 returns AA BB")]
fn raw_data_round_trips(world: &NaviStoreWorld) {
    let stored = world.with_store(|store| store.query_way_data(way_id(1)).expect("query way data"));
    let stored = stored.expect("raw data should be present");
    assert_eq!(stored.raw_data, vec![0xAA, 0xBB]);
    assert_eq!(stored.navi_number, 1);
}

#[then("no records remain for way 1")]
fn nothing_remains(world: &NaviStoreWorld) {
    let id = way_id(1);
    world.with_store(|store| {
        assert_eq!(store.query_way(id).expect("query way"), None);
        assert_eq!(store.query_way_nodes(id).expect("query nodes"), None);
        assert_eq!(store.query_way_data(id).expect("query data"), None);
        assert_eq!(store.query_navi_data(id).expect("query navi"), None);
    });
}

#[scenario(path = "tests/features/navi_store.feature", index = 0)]
fn fresh_initialisation(world: NaviStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/navi_store.feature", index = 1)]
fn repeated_initialisation(world: NaviStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/navi_store.feature", index = 2)]
fn raw_data_round_trip(world: NaviStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/navi_store.feature", index = 3)]
fn cascading_delete(world: NaviStoreWorld) {
    let _ = world;
}

#[test]
fn scenario_indices_follow_feature_order() {
    let feature_path =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/features/navi_store.feature");
    let contents = fs::read_to_string(&feature_path)
        .unwrap_or_else(|err| panic!("failed to read feature file {feature_path:?}: {err}"));
    let titles: Vec<&str> = contents
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Scenario: "))
        .collect();
    assert_eq!(
        titles,
        [
            "initialising a fresh database",
            "re-initialising an existing database",
            "saving and reading back raw way data",
            "deleting a way removes its dependent rows",
        ]
    );
}
