//! Way topology records: ways, their node lists, raw data and speed limits.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ShardId, SpeedLimitId, WayId};

/// A row of the immutable `speed_limit` reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpeedLimit {
    /// Row id referenced by [`Way::speed_min`] and [`Way::speed_max`].
    pub id: SpeedLimitId,
    /// Speed in km/h.
    pub speed: u32,
}

impl SpeedLimit {
    /// Build the row for `id` using the fixed speed progression.
    pub const fn for_id(id: SpeedLimitId) -> Self {
        Self {
            id,
            speed: id.speed_kmh(),
        }
    }

    /// The thirteen rows seeded into a fresh database, `(1, 30)` through
    /// `(13, 150)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use navi_core::SpeedLimit;
    ///
    /// let speeds: Vec<u32> = SpeedLimit::seed().map(|row| row.speed).collect();
    /// assert_eq!(speeds.first(), Some(&30));
    /// assert_eq!(speeds.last(), Some(&150));
    /// assert_eq!(speeds.len(), 13);
    /// ```
    pub fn seed() -> impl Iterator<Item = Self> {
        SpeedLimitId::all().map(Self::for_id)
    }
}

/// A directed road segment with predecessor/successor links and a speed
/// range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Way {
    /// Primary key, issued by the allocator.
    pub way_id: WayId,
    /// Preceding way, if any.
    pub pre_way_id: Option<WayId>,
    /// Following way, if any.
    pub next_way_id: Option<WayId>,
    /// Lower bound of the speed range.
    pub speed_min: Option<SpeedLimitId>,
    /// Upper bound of the speed range.
    pub speed_max: Option<SpeedLimitId>,
}

impl Way {
    /// A way without links or speed range.
    pub const fn new(way_id: WayId) -> Self {
        Self {
            way_id,
            pre_way_id: None,
            next_way_id: None,
            speed_min: None,
            speed_max: None,
        }
    }

    /// Combine an allocated id with the remaining fields.
    pub const fn from_new(way_id: WayId, new_way: &NewWay) -> Self {
        Self {
            way_id,
            pre_way_id: new_way.pre_way_id,
            next_way_id: new_way.next_way_id,
            speed_min: new_way.speed_min,
            speed_max: new_way.speed_max,
        }
    }

    /// Set the predecessor and successor links.
    #[must_use]
    pub const fn with_links(
        mut self,
        pre_way_id: Option<WayId>,
        next_way_id: Option<WayId>,
    ) -> Self {
        self.pre_way_id = pre_way_id;
        self.next_way_id = next_way_id;
        self
    }

    /// Set the speed range.
    #[must_use]
    pub const fn with_speed_range(
        mut self,
        speed_min: Option<SpeedLimitId>,
        speed_max: Option<SpeedLimitId>,
    ) -> Self {
        self.speed_min = speed_min;
        self.speed_max = speed_max;
        self
    }
}

/// The fields of a [`Way`] supplied by the caller when the store allocates
/// the identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NewWay {
    /// Preceding way, if any.
    pub pre_way_id: Option<WayId>,
    /// Following way, if any.
    pub next_way_id: Option<WayId>,
    /// Lower bound of the speed range.
    pub speed_min: Option<SpeedLimitId>,
    /// Upper bound of the speed range.
    pub speed_max: Option<SpeedLimitId>,
}

/// A single node of a way, referencing its position in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    /// Position of the node along the way.
    pub node_index: u64,
    /// Line of the source file the node was read from.
    pub data_line_number: u64,
    /// Raw coordinate/attribute payload.
    pub node_value: String,
}

impl Node {
    /// Construct a node.
    pub fn new(node_index: u64, data_line_number: u64, node_value: impl Into<String>) -> Self {
        Self {
            node_index,
            data_line_number,
            node_value: node_value.into(),
        }
    }
}

/// The ordered node list of one way. Replaced wholesale on update.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WayNodes {
    /// Owning way.
    pub way_id: WayId,
    /// Nodes in storage order.
    pub nodes: Vec<Node>,
}

impl WayNodes {
    /// Construct a node list.
    pub const fn new(way_id: WayId, nodes: Vec<Node>) -> Self {
        Self { way_id, nodes }
    }
}

/// Raw ingested data of one way, plus where its navigation entries live.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WayData {
    /// Owning way; also the primary key.
    pub way_id: WayId,
    /// Opaque raw payload.
    pub raw_data: Vec<u8>,
    /// Number of derived navigation entries.
    pub navi_number: u8,
    /// Shard holding the navigation entries.
    pub navi_table_id: ShardId,
}
