//! Fixtures shared by unit, integration and behaviour tests.
//!
//! Only compiled for tests or with the `test-support` feature.

use crate::{NaviData, NaviInfo, Node, ShardId, SpeedLimitId, Way, WayData, WayId, WayNodes};

#[cfg(feature = "store-sqlite")]
use crate::{NaviStore, SqliteNaviStore};

/// Build a way id from a literal.
///
/// # Panics
///
/// Panics when `raw` is zero.
pub const fn way_id(raw: u64) -> WayId {
    match WayId::new(raw) {
        Some(id) => id,
        None => panic!("way id literals must be non-zero"),
    }
}

/// Build a speed limit id from a literal.
///
/// # Panics
///
/// Panics when `raw` is outside `1..=13`.
pub const fn speed(raw: u8) -> SpeedLimitId {
    match SpeedLimitId::new(raw) {
        Ok(id) => id,
        Err(_) => panic!("speed limit literals must be within 1..=13"),
    }
}

/// A way linked to its numeric neighbours, limited to 30..=50 km/h.
pub fn linked_way(id: WayId) -> Way {
    Way::new(id)
        .with_links(WayId::new(id.get() - 1), id.checked_next())
        .with_speed_range(Some(speed(1)), Some(speed(3)))
}

/// Three nodes read from consecutive source lines.
pub fn sample_nodes(id: WayId) -> WayNodes {
    WayNodes::new(
        id,
        vec![
            Node::new(0, 120, "13.4050,52.5200"),
            Node::new(1, 121, "13.4061,52.5208"),
            Node::new(2, 122, "13.4075,52.5213"),
        ],
    )
}

/// Raw data stored in shard `navi_table_id`.
pub fn sample_way_data(id: WayId, navi_table_id: u64) -> WayData {
    WayData {
        way_id: id,
        raw_data: vec![0xAA, 0xBB],
        navi_number: 2,
        navi_table_id: ShardId::new(navi_table_id),
    }
}

/// Two navigation entries.
pub fn sample_navi_info(id: WayId) -> NaviInfo {
    NaviInfo::new(
        id,
        vec![NaviData::new(0, [0x01, 0x02]), NaviData::new(1, [0x03])],
    )
}

/// An in-memory store with the schema created.
///
/// # Panics
///
/// Panics when SQLite cannot open or initialise the database.
#[cfg(feature = "store-sqlite")]
pub fn initialised_store() -> SqliteNaviStore {
    let mut store = SqliteNaviStore::open_in_memory().expect("open in-memory store");
    store.init_database().expect("initialise schema");
    store
}

/// An initialised store holding way 1 with nodes, raw data and navigation
/// entries.
///
/// # Panics
///
/// Panics when any write fails.
#[cfg(feature = "store-sqlite")]
pub fn store_with_way() -> SqliteNaviStore {
    let mut store = initialised_store();
    let id = way_id(1);
    store.save_way(&linked_way(id)).expect("save way");
    store.save_way_nodes(&sample_nodes(id)).expect("save nodes");
    store
        .save_way_data(&sample_way_data(id, 0))
        .expect("save way data");
    store
        .save_navi_info(&sample_navi_info(id))
        .expect("save navi info");
    store
}
