//! Identifier newtypes for ways, speed limits and navigation shards.

use std::{fmt, num::NonZeroU64};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest speed in the speed limit table, in km/h.
pub const SPEED_BASE_KMH: u32 = 30;
/// Increment between consecutive speed limit rows, in km/h.
pub const SPEED_STEP_KMH: u32 = 10;

/// Identifier of a way (a directed road segment).
///
/// Way identifiers are never zero. Producers that still use `0` to mean
/// "no way" can translate at the boundary with [`WayId::from_sentinel`] and
/// [`WayId::to_sentinel`].
///
/// # Examples
///
/// ```
/// use navi_core::WayId;
///
/// assert_eq!(WayId::from_sentinel(0), None);
/// let id = WayId::new(7).expect("non-zero id");
/// assert_eq!(WayId::to_sentinel(Some(id)), 7);
/// assert_eq!(WayId::to_sentinel(None), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct WayId(NonZeroU64);

impl WayId {
    /// The identifier handed out for an empty `way` table.
    pub const FIRST: Self = Self(NonZeroU64::MIN);

    /// Wrap a raw identifier, returning `None` for zero.
    pub const fn new(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Raw identifier value.
    pub const fn get(self) -> u64 {
        self.0.get()
    }

    /// Decode the legacy `0 == none` convention.
    pub const fn from_sentinel(raw: u64) -> Option<Self> {
        Self::new(raw)
    }

    /// Encode an optional link using the legacy `0 == none` convention.
    pub fn to_sentinel(link: Option<Self>) -> u64 {
        link.map_or(0, Self::get)
    }

    /// The identifier following this one, if it does not overflow.
    pub fn checked_next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for WayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<WayId> for u64 {
    fn from(id: WayId) -> Self {
        id.get()
    }
}

impl TryFrom<u64> for WayId {
    type Error = ZeroWayIdError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or(ZeroWayIdError)
    }
}

/// Returned when `0` is used where a concrete way is required.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("way id must be non-zero")]
pub struct ZeroWayIdError;

/// Row identifier in the `speed_limit` reference table.
///
/// Valid identifiers are `1..=13`; row `n` carries
/// `30 + 10 * (n - 1)` km/h.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct SpeedLimitId(u8);

impl SpeedLimitId {
    /// Slowest speed limit row (30 km/h).
    pub const MIN: Self = Self(1);
    /// Fastest speed limit row (150 km/h).
    pub const MAX: Self = Self(13);

    /// Validate a raw speed limit row id.
    pub const fn new(raw: u8) -> Result<Self, SpeedLimitError> {
        if raw < Self::MIN.0 || raw > Self::MAX.0 {
            return Err(SpeedLimitError::OutOfRange { value: raw });
        }
        Ok(Self(raw))
    }

    /// Raw row id.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Speed in km/h associated with this row.
    pub const fn speed_kmh(self) -> u32 {
        SPEED_BASE_KMH + SPEED_STEP_KMH * (self.0 as u32 - 1)
    }

    /// Every valid speed limit id in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN.0..=Self::MAX.0).map(Self)
    }
}

impl fmt::Display for SpeedLimitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SpeedLimitId> for u8 {
    fn from(id: SpeedLimitId) -> Self {
        id.get()
    }
}

impl TryFrom<u8> for SpeedLimitId {
    type Error = SpeedLimitError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

/// Errors returned by [`SpeedLimitId::new`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SpeedLimitError {
    /// The id does not name a row of the speed limit table.
    #[error("speed limit id {value} is outside 1..=13")]
    OutOfRange {
        /// Rejected id.
        value: u8,
    },
}

/// Identifier of a navigation data shard table (`navi_table_id`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ShardId(u64);

impl ShardId {
    /// Shard used before any navigation data exists.
    pub const FIRST: Self = Self(0);

    /// Wrap a raw shard id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw shard id.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The shard after this one, if it does not overflow.
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(Self(next)),
            None => None,
        }
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ShardId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}
