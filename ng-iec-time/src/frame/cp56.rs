//! CP56Time2a, the seven octet binary time (IEC 60870-5-4 § 6.8,
//! IEC 60870-5-101 § 7.2.6.18).
//!
//! The year field holds an offset from 2000, so only 2000..=2127 survive a
//! round trip. All timestamps are best exchanged in UTC.

use super::{
    calendar::{compose, WireFields},
    fixed, split_millis, take, zone_or_utc, CP56_SIZE, DAY_MASK, HOUR_MASK, INVALID_FLAG,
    MINUTE_MASK, MONTH_MASK, YEAR_BASE, YEAR_MASK,
};
use crate::error::Result;
use byteorder::{ByteOrder, LittleEndian};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike};

const TAG: &str = "CP56Time2a";

/// Encodes `time`, viewed in `loc` (UTC when `None`), as a CP56Time2a tag.
///
/// The IV and SU bits are always clear. Years outside 2000..=2127 keep only
/// the low seven bits of their offset.
pub fn cp56time2a<Tz: TimeZone>(time: &DateTime<Tz>, loc: Option<&FixedOffset>) -> Bytes {
    let ts = time.with_timezone(&zone_or_utc(loc));
    let mut buf = BytesMut::with_capacity(CP56_SIZE);

    // leap seconds are not represented
    let msec = (ts.nanosecond() / 1_000_000).min(999) as u16 + ts.second() as u16 * 1000;
    let weekday = ts.weekday().number_from_monday() as u8;

    buf.put_u16_le(msec);
    buf.put_u8(ts.minute() as u8);
    buf.put_u8(ts.hour() as u8);
    buf.put_u8(weekday << 5 | ts.day() as u8);
    buf.put_u8(ts.month() as u8);
    buf.put_u8(year_offset(ts.year(), YEAR_MASK) & YEAR_MASK);

    buf.freeze()
}

/// Encodes `time` in the six octet layout some peers still emit.
///
/// Octets: millisecond low byte, second, minute, hour, month, year - 2000.
/// The millisecond count keeps only its low eight bits (leap-second counts of
/// 1000 and above are first clamped to 999), the day of month is not written
/// and the month sits where [`decode_cp56time2a`] expects the day, so this
/// output does not decode back to `time`. Years outside 2000..=2255 keep the
/// low eight bits of their offset.
pub fn cp56time2a_legacy<Tz: TimeZone>(time: &DateTime<Tz>, loc: Option<&FixedOffset>) -> Bytes {
    let ts = time.with_timezone(&zone_or_utc(loc));
    let mut buf = BytesMut::with_capacity(CP56_SIZE - 1);

    let msec = (ts.nanosecond() / 1_000_000).min(999);
    if msec > u8::MAX as u32 {
        tracing::warn!(msec, "{TAG} legacy layout truncates milliseconds to one octet");
    }

    // 0..=255 ms survive, anything above wraps
    buf.put_u8(msec as u8);
    buf.put_u8(ts.second() as u8);
    buf.put_u8(ts.minute() as u8);
    buf.put_u8(ts.hour() as u8);
    buf.put_u8(ts.month() as u8);
    buf.put_u8(year_offset(ts.year(), u8::MAX));

    buf.freeze()
}

/// Decodes a CP56Time2a tag from the head of `bytes`.
///
/// Returns `Ok(None)` when the IV bit is set and an error when fewer than seven
/// octets are supplied. Octets past the seventh are ignored.
pub fn decode_cp56time2a(
    bytes: &[u8],
    loc: Option<&FixedOffset>,
) -> Result<Option<DateTime<FixedOffset>>> {
    parse(fixed(TAG, bytes)?, loc)
}

/// Reads one CP56Time2a tag from `rdr`, consuming seven octets.
pub fn read_cp56time2a<B: Buf>(
    rdr: &mut B,
    loc: Option<&FixedOffset>,
) -> Result<Option<DateTime<FixedOffset>>> {
    parse(take(TAG, rdr)?, loc)
}

fn parse(
    raw: [u8; CP56_SIZE],
    loc: Option<&FixedOffset>,
) -> Result<Option<DateTime<FixedOffset>>> {
    if raw[2] & INVALID_FLAG != 0 {
        tracing::trace!(raw = ?raw, "{TAG} invalid flag set");
        return Ok(None);
    }

    let (second, millisecond) = split_millis(LittleEndian::read_u16(&raw[..2]));
    let fields = WireFields {
        year: YEAR_BASE + (raw[6] & YEAR_MASK) as i32,
        month: (raw[5] & MONTH_MASK) as u32,
        day: (raw[4] & DAY_MASK) as u32,
        hour: (raw[3] & HOUR_MASK) as u32,
        minute: (raw[2] & MINUTE_MASK) as u32,
        second,
        millisecond,
    };

    compose(TAG, fields, &zone_or_utc(loc)).map(Some)
}

/// Year minus 2000 narrowed to one octet, warning when the offset exceeds
/// `max`, the largest offset the caller's layout keeps.
fn year_offset(year: i32, max: u8) -> u8 {
    let offset = year - YEAR_BASE;
    if !(0..=max as i32).contains(&offset) {
        tracing::warn!(
            year,
            last_year = YEAR_BASE + max as i32,
            "{TAG}: year offset truncated"
        );
    }
    // low eight bits only
    offset as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};
    use std::io::Cursor;
    use tokio_test::{assert_err, assert_ok};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap() + Duration::milliseconds(ms)
    }

    #[test]
    fn encode_standard_layout() {
        // Wednesday
        let time = at(2019, 6, 5, 4, 3, 1, 2);
        let bytes = cp56time2a(&time, None);
        assert_eq!(bytes.as_ref(), &[0xEA, 0x03, 0x03, 0x04, 0x65, 0x06, 0x13]);
    }

    #[test]
    fn encode_converts_into_target_zone() {
        let cst = FixedOffset::east_opt(8 * 3600).unwrap();
        let time = at(2024, 12, 31, 20, 0, 0, 0);
        let bytes = cp56time2a(&time, Some(&cst));
        // 2025-01-01 04:00 local, Wednesday
        assert_eq!(bytes[3], 4);
        assert_eq!(bytes[4], 3 << 5 | 1);
        assert_eq!(bytes[5], 1);
        assert_eq!(bytes[6], 25);
    }

    #[test]
    fn encode_masks_year_offset() {
        let bytes = cp56time2a(&at(2130, 1, 1, 0, 0, 0, 0), None);
        assert_eq!(bytes[6], 2);
        let bytes = cp56time2a(&at(1999, 1, 1, 0, 0, 0, 0), None);
        assert_eq!(bytes[6], 0x7f);
    }

    #[test]
    fn decode_fields() -> anyhow::Result<()> {
        let ts = decode_cp56time2a(&[0x01, 0x02, 0x03, 0x04, 0x65, 0x06, 0x13], None)?;
        // 0x0201 = 513 ms
        assert_eq!(ts, Some(at(2019, 6, 5, 4, 3, 0, 513).fixed_offset()));
        Ok(())
    }

    #[test]
    fn decode_ignores_reserved_and_flag_bits() -> anyhow::Result<()> {
        let ts = decode_cp56time2a(&[0x00, 0x00, 0x40, 0x84, 0xE5, 0xF6, 0x93], None)?;
        assert_eq!(ts, Some(at(2019, 6, 5, 4, 0, 0, 0).fixed_offset()));
        Ok(())
    }

    #[test]
    fn decode_invalid_flag() {
        for raw in [
            [0x80u8; 7],
            [0x00, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00],
            [0xFF, 0xFF, 0xBB, 0x17, 0x1F, 0x0C, 0x7F],
        ] {
            assert!(assert_ok!(decode_cp56time2a(&raw, None)).is_none());
        }
    }

    #[test]
    fn decode_in_zone() -> anyhow::Result<()> {
        let cst = FixedOffset::east_opt(8 * 3600).unwrap();
        let ts = decode_cp56time2a(&[0x00, 0x00, 0x00, 0x08, 0x01, 0x01, 0x18], Some(&cst))?
            .expect("valid tag");
        assert_eq!(ts.offset(), &cst);
        assert_eq!(ts.with_timezone(&Utc), at(2024, 1, 1, 0, 0, 0, 0));
        Ok(())
    }

    #[test]
    fn decode_short_buffer() {
        assert_err!(decode_cp56time2a(&[0x00; 6], None));
        assert_err!(decode_cp56time2a(&[], None));
    }

    #[test]
    fn read_consumes_exactly_one_tag() -> anyhow::Result<()> {
        let raw = Bytes::from_static(&[
            0x01, 0x02, 0x03, 0x04, 0x65, 0x06, 0x13, 0x00, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
            0xAA,
        ]);
        let mut rdr = Cursor::new(&raw);
        assert!(read_cp56time2a(&mut rdr, None)?.is_some());
        assert!(read_cp56time2a(&mut rdr, None)?.is_none());
        assert_eq!(rdr.remaining(), 1);
        assert_err!(read_cp56time2a(&mut rdr, None));
        Ok(())
    }

    #[test]
    fn legacy_layout_is_pinned() {
        let time = at(2019, 6, 5, 4, 3, 1, 200);
        let bytes = cp56time2a_legacy(&time, None);
        assert_eq!(bytes.as_ref(), &[200, 1, 3, 4, 6, 19]);

        // 300 ms wraps to 44
        let bytes = cp56time2a_legacy(&at(2019, 6, 5, 4, 3, 1, 300), None);
        assert_eq!(bytes[0], 44);

        // the full octet holds offsets up to 255
        let bytes = cp56time2a_legacy(&at(2200, 1, 1, 0, 0, 0, 0), None);
        assert_eq!(bytes[5], 200);
    }

    #[test]
    fn year_offset_limit_follows_layout() {
        assert_eq!(year_offset(2127, YEAR_MASK), 127);
        assert_eq!(year_offset(2200, u8::MAX), 200);
        assert_eq!(year_offset(2256, u8::MAX), 0);
    }

    fn leap_second() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2016, 12, 31)
            .and_then(|date| date.and_hms_milli_opt(23, 59, 59, 1500))
            .unwrap()
            .and_utc()
    }

    #[test]
    fn leap_second_clamps_to_last_millisecond() {
        let bytes = cp56time2a(&leap_second(), None);
        // 59_999 = 0xEA5F
        assert_eq!(&bytes[..2], &[0x5F, 0xEA]);
        assert_eq!(bytes[2], 59);
        assert_eq!(bytes[3], 23);
    }

    #[test]
    fn legacy_leap_second_clamps_before_narrowing() {
        let bytes = cp56time2a_legacy(&leap_second(), None);
        // 999 & 0xff
        assert_eq!(bytes[0], 0xE7);
        assert_eq!(bytes[1], 59);
    }
}
