//! CP16Time2a, a two octet little-endian millisecond counter used for short
//! durations such as transmission delays.

use super::{fixed, take, zone_or_utc, CP16_SIZE};
use crate::error::Result;
use byteorder::{ByteOrder, LittleEndian};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use chrono::{DateTime, FixedOffset, TimeZone, Timelike};

const TAG: &str = "CP16Time2a";

pub fn cp16time2a(msec: u16) -> Bytes {
    let mut buf = BytesMut::with_capacity(CP16_SIZE);
    buf.put_u16_le(msec);
    buf.freeze()
}

/// Encodes the second-of-minute and millisecond of `time` as a CP16 counter.
pub fn cp16time2a_of<Tz: TimeZone>(time: &DateTime<Tz>, loc: Option<&FixedOffset>) -> Bytes {
    let ts = time.with_timezone(&zone_or_utc(loc));
    let msec = (ts.nanosecond() / 1_000_000).min(999) as u16 + ts.second() as u16 * 1000;
    cp16time2a(msec)
}

pub fn decode_cp16time2a(bytes: &[u8]) -> Result<u16> {
    let raw: [u8; CP16_SIZE] = fixed(TAG, bytes)?;
    Ok(LittleEndian::read_u16(&raw))
}

pub fn read_cp16time2a<B: Buf>(rdr: &mut B) -> Result<u16> {
    let raw: [u8; CP16_SIZE] = take(TAG, rdr)?;
    Ok(LittleEndian::read_u16(&raw))
}
