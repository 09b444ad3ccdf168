//! Thread-safe handle to a [`SqliteNaviStore`].

use std::sync::{Arc, Mutex};

use log::error;

use super::{NaviStoreError, SqliteNaviStore};
use crate::{
    NaviData, NaviInfo, NewWay, ShardId, SpeedLimitId, StoreConfig, Way, WayData, WayId,
    WayNodes, store::NaviStore,
};

/// A cloneable handle that serialises access to one store.
///
/// Each call holds the lock for a single operation, so a
/// [`NaviStore::create_way`] issued from several threads hands out distinct
/// ids.
#[derive(Debug, Clone)]
pub struct SharedNaviStore {
    inner: Arc<Mutex<SqliteNaviStore>>,
}

impl SharedNaviStore {
    /// Share an open store.
    pub fn new(store: SqliteNaviStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Open the database named by `config` and share it.
    pub fn open(config: &StoreConfig) -> Result<Self, NaviStoreError> {
        SqliteNaviStore::open(config).map(Self::new)
    }

    /// Run `operation` with exclusive access to the store.
    pub fn with<T>(
        &self,
        operation: impl FnOnce(&mut SqliteNaviStore) -> Result<T, NaviStoreError>,
    ) -> Result<T, NaviStoreError> {
        let mut store = self.inner.lock().map_err(|_| {
            error!("navigation store lock poisoned");
            NaviStoreError::LockPoisoned
        })?;
        operation(&mut store)
    }
}

impl NaviStore for SharedNaviStore {
    type Error = NaviStoreError;

    fn save_way(&mut self, way: &Way) -> Result<(), Self::Error> {
        self.with(|store| store.save_way(way))
    }

    fn save_way_nodes(&mut self, way_nodes: &WayNodes) -> Result<(), Self::Error> {
        self.with(|store| store.save_way_nodes(way_nodes))
    }

    fn save_way_data(&mut self, way_data: &WayData) -> Result<(), Self::Error> {
        self.with(|store| store.save_way_data(way_data))
    }

    fn save_navi_info(&mut self, navi_info: &NaviInfo) -> Result<(), Self::Error> {
        self.with(|store| store.save_navi_info(navi_info))
    }

    fn query_way(&self, way_id: WayId) -> Result<Option<Way>, Self::Error> {
        self.with(|store| store.query_way(way_id))
    }

    fn query_way_nodes(&self, way_id: WayId) -> Result<Option<WayNodes>, Self::Error> {
        self.with(|store| store.query_way_nodes(way_id))
    }

    fn query_way_data(&self, way_id: WayId) -> Result<Option<WayData>, Self::Error> {
        self.with(|store| store.query_way_data(way_id))
    }

    fn query_navi_data(&self, way_id: WayId) -> Result<Option<Vec<NaviData>>, Self::Error> {
        self.with(|store| store.query_navi_data(way_id))
    }

    fn query_navi_data_entry(
        &self,
        way_id: WayId,
        navi_index: u8,
    ) -> Result<Option<NaviData>, Self::Error> {
        self.with(|store| store.query_navi_data_entry(way_id, navi_index))
    }

    fn update_way(&mut self, way: &Way) -> Result<bool, Self::Error> {
        self.with(|store| store.update_way(way))
    }

    fn update_way_speed_limit(
        &mut self,
        way_id: WayId,
        speed_min: Option<SpeedLimitId>,
        speed_max: Option<SpeedLimitId>,
    ) -> Result<bool, Self::Error> {
        self.with(|store| store.update_way_speed_limit(way_id, speed_min, speed_max))
    }

    fn update_way_nodes(&mut self, way_nodes: &WayNodes) -> Result<(), Self::Error> {
        self.with(|store| store.update_way_nodes(way_nodes))
    }

    fn update_way_data(&mut self, way_data: &WayData) -> Result<bool, Self::Error> {
        self.with(|store| store.update_way_data(way_data))
    }

    fn update_navi_info(&mut self, navi_info: &NaviInfo) -> Result<(), Self::Error> {
        self.with(|store| store.update_navi_info(navi_info))
    }

    fn delete_way(&mut self, way_id: WayId) -> Result<bool, Self::Error> {
        self.with(|store| store.delete_way(way_id))
    }

    fn delete_way_nodes(&mut self, way_id: WayId) -> Result<usize, Self::Error> {
        self.with(|store| store.delete_way_nodes(way_id))
    }

    fn delete_way_data(&mut self, way_id: WayId) -> Result<usize, Self::Error> {
        self.with(|store| store.delete_way_data(way_id))
    }

    fn delete_navi_data(&mut self, way_id: WayId) -> Result<usize, Self::Error> {
        self.with(|store| store.delete_navi_data(way_id))
    }

    fn next_way_id(&self) -> Result<WayId, Self::Error> {
        self.with(|store| store.next_way_id())
    }

    fn create_way(&mut self, new_way: &NewWay) -> Result<Way, Self::Error> {
        self.with(|store| store.create_way(new_way))
    }

    fn navi_table_shard(&self) -> Result<ShardId, Self::Error> {
        self.with(|store| store.navi_table_shard())
    }
}
