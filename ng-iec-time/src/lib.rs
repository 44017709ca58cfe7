//! Binary time tags of the IEC 60870-5 companion standards.
//!
//! | Tag        | Octets | Content                                        |
//! |------------|--------|------------------------------------------------|
//! | CP56Time2a | 7      | milliseconds up to year, IV flag               |
//! | CP24Time2a | 3      | milliseconds and minute, IV flag               |
//! | CP16Time2a | 2      | millisecond counter                            |
//!
//! Decoders return `Ok(None)` for tags carrying the IV (invalid) flag and an
//! error when the buffer is shorter than the tag. Zones are fixed offsets, UTC
//! when omitted.

pub mod clock;
mod codec;
pub mod config;
mod error;
pub mod frame;

pub use self::{
    clock::{Clock, FixedClock, SystemClock},
    codec::TimeCodec,
    config::TimeCodecConfig,
    error::{Error, Result},
    frame::{
        cp16::{cp16time2a, cp16time2a_of, decode_cp16time2a, read_cp16time2a},
        cp24::{
            cp24time2a, decode_cp24time2a, decode_cp24time2a_at, read_cp24time2a,
            DEFAULT_ROLLBACK_TOLERANCE_MINS, MAX_ROLLBACK_TOLERANCE_MINS,
        },
        cp56::{cp56time2a, cp56time2a_legacy, decode_cp56time2a, read_cp56time2a},
        CP16_SIZE, CP24_SIZE, CP56_SIZE, YEAR_BASE,
    },
};
