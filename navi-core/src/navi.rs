//! Derived navigation payloads attached to a way.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::WayId;

/// One serialized navigation instruction set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NaviData {
    /// Position of the entry within its way.
    pub navi_index: u8,
    /// Opaque serialized payload.
    pub data: Vec<u8>,
}

impl NaviData {
    /// Construct an entry.
    pub fn new(navi_index: u8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            navi_index,
            data: data.into(),
        }
    }
}

/// All navigation entries of one way. Replaced wholesale on update.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NaviInfo {
    /// Owning way.
    pub way_id: WayId,
    /// Entries in storage order.
    pub navi_data: Vec<NaviData>,
}

impl NaviInfo {
    /// Construct the entry list for a way.
    pub const fn new(way_id: WayId, navi_data: Vec<NaviData>) -> Self {
        Self { way_id, navi_data }
    }

    /// Entry with the given index, if present.
    pub fn entry(&self, navi_index: u8) -> Option<&NaviData> {
        self.navi_data
            .iter()
            .find(|entry| entry.navi_index == navi_index)
    }
}
