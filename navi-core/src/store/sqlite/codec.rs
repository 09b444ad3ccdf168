//! Column encodings between the domain model and SQLite integers.
//!
//! SQLite integers are signed 64-bit. Identifiers above `i64::MAX` are
//! rejected on the way in; negative or otherwise unrepresentable values are
//! rejected on the way out.

use log::warn;

use super::NaviStoreError;
use crate::{ShardId, SpeedLimitId, WayId};

pub(super) fn encode_u64(field: &'static str, value: u64) -> Result<i64, NaviStoreError> {
    i64::try_from(value).map_err(|_| NaviStoreError::IdOutOfRange { field, value })
}

pub(super) fn decode_u64(field: &'static str, value: i64) -> Result<u64, NaviStoreError> {
    u64::try_from(value).map_err(|_| NaviStoreError::InvalidStoredValue { field, value })
}

pub(super) fn decode_u8(field: &'static str, value: i64) -> Result<u8, NaviStoreError> {
    u8::try_from(value).map_err(|_| NaviStoreError::InvalidStoredValue { field, value })
}

pub(super) fn encode_way_id(way_id: WayId) -> Result<i64, NaviStoreError> {
    encode_u64("way_id", way_id.get())
}

pub(super) fn decode_way_id(value: i64) -> Result<WayId, NaviStoreError> {
    u64::try_from(value)
        .ok()
        .and_then(WayId::new)
        .ok_or(NaviStoreError::InvalidStoredValue {
            field: "way_id",
            value,
        })
}

/// Absent links are bound as `NULL`.
pub(super) fn encode_link(
    field: &'static str,
    link: Option<WayId>,
) -> Result<Option<i64>, NaviStoreError> {
    link.map(|way_id| encode_u64(field, way_id.get()))
        .transpose()
}

/// `NULL` and the legacy `0` both decode to `None`.
pub(super) fn decode_link(
    field: &'static str,
    value: Option<i64>,
) -> Result<Option<WayId>, NaviStoreError> {
    match value {
        None => Ok(None),
        Some(0) => {
            warn!("stored {field} uses legacy 0 sentinel; treating as absent");
            Ok(None)
        }
        Some(raw) => decode_u64(field, raw).map(WayId::new),
    }
}

pub(super) fn encode_speed(speed: Option<SpeedLimitId>) -> Option<i64> {
    speed.map(|id| i64::from(id.get()))
}

pub(super) fn decode_speed(
    field: &'static str,
    value: Option<i64>,
) -> Result<Option<SpeedLimitId>, NaviStoreError> {
    value
        .map(|raw| {
            decode_u8(field, raw)
                .and_then(|id| {
                    SpeedLimitId::new(id)
                        .map_err(|_| NaviStoreError::InvalidStoredValue { field, value: raw })
                })
        })
        .transpose()
}

pub(super) fn encode_shard(shard: ShardId) -> Result<i64, NaviStoreError> {
    encode_u64("navi_table_id", shard.get())
}

pub(super) fn decode_shard(value: i64) -> Result<ShardId, NaviStoreError> {
    decode_u64("navi_table_id", value).map(ShardId::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rejects_ids_beyond_sqlite_range() {
        let err = encode_u64("way_id", u64::MAX).expect_err("u64::MAX must not fit");
        assert!(matches!(
            err,
            NaviStoreError::IdOutOfRange {
                field: "way_id",
                value: u64::MAX
            }
        ));
        assert_eq!(
            encode_u64("way_id", i64::MAX as u64).expect("i64::MAX fits"),
            i64::MAX
        );
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(0), None)]
    #[case(Some(42), WayId::new(42))]
    fn decodes_links(#[case] stored: Option<i64>, #[case] expected: Option<WayId>) {
        assert_eq!(decode_link("pre_way_id", stored).expect("decode"), expected);
    }

    #[rstest]
    fn negative_links_are_invalid() {
        let err = decode_link("next_way_id", Some(-3)).expect_err("negative link");
        assert!(matches!(
            err,
            NaviStoreError::InvalidStoredValue {
                field: "next_way_id",
                value: -3
            }
        ));
    }

    #[rstest]
    #[case(0)]
    #[case(14)]
    #[case(-1)]
    fn invalid_speeds_are_rejected(#[case] raw: i64) {
        assert!(decode_speed("speed_min", Some(raw)).is_err());
    }

    #[rstest]
    fn zero_way_id_is_invalid() {
        assert!(decode_way_id(0).is_err());
        assert_eq!(decode_way_id(9).expect("decode"), WayId::new(9).expect("non-zero"));
    }
}
