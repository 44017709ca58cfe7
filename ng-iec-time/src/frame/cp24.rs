//! CP24Time2a, the three octet binary time (IEC 60870-5-4 § 6.8,
//! IEC 60870-5-101 § 7.2.6.19).
//!
//! Only minute, second and millisecond travel on the wire. Decoding borrows
//! the date and hour from a reference moment and assumes the tag lies in the
//! recent past, which is a best-effort guess rather than an exact inversion.

use super::{
    calendar::{compose, WireFields},
    fixed, split_millis, take, zone_or_utc, CP24_SIZE, INVALID_FLAG, MINUTE_MASK,
};
use crate::{
    clock::Clock,
    error::{Error, Result},
};
use byteorder::{ByteOrder, LittleEndian};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use chrono::{DateTime, Datelike, Duration, FixedOffset, TimeZone, Timelike};

const TAG: &str = "CP24Time2a";

/// Minutes a tag may run ahead of the reference before it is assigned to the
/// previous hour.
pub const DEFAULT_ROLLBACK_TOLERANCE_MINS: u32 = 5;

/// Largest tolerance that still leaves a previous-hour window.
pub const MAX_ROLLBACK_TOLERANCE_MINS: u32 = 59;

/// Encodes the minute, second and millisecond of `time`, viewed in `loc`.
pub fn cp24time2a<Tz: TimeZone>(time: &DateTime<Tz>, loc: Option<&FixedOffset>) -> Bytes {
    let ts = time.with_timezone(&zone_or_utc(loc));
    let mut buf = BytesMut::with_capacity(CP24_SIZE);

    let msec = (ts.nanosecond() / 1_000_000).min(999) as u16 + ts.second() as u16 * 1000;

    buf.put_u16_le(msec);
    buf.put_u8(ts.minute() as u8);

    buf.freeze()
}

/// Decodes a CP24Time2a tag against the current time of `clock`.
pub fn decode_cp24time2a<C: Clock + ?Sized>(
    bytes: &[u8],
    loc: Option<&FixedOffset>,
    clock: &C,
) -> Result<Option<DateTime<FixedOffset>>> {
    decode_cp24time2a_at(bytes, loc, &clock.now())
}

/// Decodes a CP24Time2a tag, taking year, month, day and hour from `now`.
///
/// A minute more than five past `now`'s minute is taken to belong to the
/// previous hour. Returns `Ok(None)` when the IV bit is set.
pub fn decode_cp24time2a_at<Tz: TimeZone>(
    bytes: &[u8],
    loc: Option<&FixedOffset>,
    now: &DateTime<Tz>,
) -> Result<Option<DateTime<FixedOffset>>> {
    parse(
        fixed(TAG, bytes)?,
        &zone_or_utc(loc),
        now,
        DEFAULT_ROLLBACK_TOLERANCE_MINS,
    )
}

/// Reads one CP24Time2a tag from `rdr`, consuming three octets.
pub fn read_cp24time2a<B: Buf, Tz: TimeZone>(
    rdr: &mut B,
    loc: Option<&FixedOffset>,
    now: &DateTime<Tz>,
) -> Result<Option<DateTime<FixedOffset>>> {
    parse(
        take(TAG, rdr)?,
        &zone_or_utc(loc),
        now,
        DEFAULT_ROLLBACK_TOLERANCE_MINS,
    )
}

pub(crate) fn parse<Tz: TimeZone>(
    raw: [u8; CP24_SIZE],
    zone: &FixedOffset,
    now: &DateTime<Tz>,
    tolerance_mins: u32,
) -> Result<Option<DateTime<FixedOffset>>> {
    if raw[2] & INVALID_FLAG != 0 {
        tracing::trace!(raw = ?raw, "{TAG} invalid flag set");
        return Ok(None);
    }

    let (second, millisecond) = split_millis(LittleEndian::read_u16(&raw[..2]));
    let minute = (raw[2] & MINUTE_MASK) as u32;

    let now = now.with_timezone(zone);
    let val = compose(
        TAG,
        WireFields {
            year: now.year(),
            month: now.month(),
            day: now.day(),
            hour: now.hour(),
            minute,
            second,
            millisecond,
        },
        zone,
    )?;

    // 5 minute rounding - 55 minute span
    if minute > now.minute().saturating_add(tolerance_mins) {
        tracing::debug!(
            minute,
            now_minute = now.minute(),
            "{TAG} minute ahead of reference, assigning previous hour"
        );
        return val
            .checked_sub_signed(Duration::hours(1))
            .map(Some)
            .ok_or(Error::OutOfRange { tag: TAG });
    }

    Ok(Some(val))
}
