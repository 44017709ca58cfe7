pub mod cp16;
pub mod cp24;
pub mod cp56;
mod calendar;

use crate::error::{Error, Result};
use bytes::Buf;
use chrono::{FixedOffset, Offset, Utc};

// CP56Time2a , CP24Time2a, CP16Time2a
// |         Milliseconds(D7--D0)        | Milliseconds = 0-59999
// |         Milliseconds(D15--D8)       |
// | IV(D7)   RES1(D6)  Minutes(D5--D0)  | Minutes = 0-59, IV = invalid,0 = valid, 1 = invalid
// | SU(D7)   RES2(D6-D5)  Hours(D4--D0) | Hours = 0-23, SU = summer Time,0 = standard time, 1 = summer time,
// | DayOfWeek(D7--D5) DayOfMonth(D4--D0)| DayOfMonth = 1-31  DayOfWeek = 1-7
// | RES3(D7--D4)        Months(D3--D0)  | Months = 1-12
// | RES4(D7)            Year(D6--D0)    | Year = 0-99
//
// CP24Time2a carries the first three octets, CP16Time2a the first two.

pub const CP56_SIZE: usize = 7;
pub const CP24_SIZE: usize = 3;
pub const CP16_SIZE: usize = 2;

pub(crate) const INVALID_FLAG: u8 = 0x80;
pub(crate) const MINUTE_MASK: u8 = 0x3f;
pub(crate) const HOUR_MASK: u8 = 0x1f;
pub(crate) const DAY_MASK: u8 = 0x1f;
pub(crate) const MONTH_MASK: u8 = 0x0f;
pub(crate) const YEAR_MASK: u8 = 0x7f;

/// Base of the 7-bit year field.
pub const YEAR_BASE: i32 = 2000;

/// Resolves an optional zone, `None` meaning UTC.
#[inline]
pub(crate) fn zone_or_utc(loc: Option<&FixedOffset>) -> FixedOffset {
    loc.copied().unwrap_or_else(|| Utc.fix())
}

/// Splits the leading little-endian millisecond word into (seconds, milliseconds).
#[inline]
pub(crate) fn split_millis(word: u16) -> (u32, u32) {
    let word = word as u32;
    (word / 1000, word % 1000)
}

/// Copies the first `N` octets of `bytes`, failing when fewer are supplied.
pub(crate) fn fixed<const N: usize>(tag: &'static str, bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .get(..N)
        .and_then(|head| head.try_into().ok())
        .ok_or(Error::Truncated {
            tag,
            need: N,
            got: bytes.len(),
        })
}

/// Consumes exactly `N` octets from `rdr`, failing without consuming when fewer remain.
pub(crate) fn take<const N: usize, B: Buf>(tag: &'static str, rdr: &mut B) -> Result<[u8; N]> {
    if rdr.remaining() < N {
        return Err(Error::Truncated {
            tag,
            need: N,
            got: rdr.remaining(),
        });
    }
    let mut raw = [0u8; N];
    rdr.copy_to_slice(&mut raw);
    Ok(raw)
}
