use crate::{
    clock::{Clock, SystemClock},
    config::TimeCodecConfig,
    error::Result,
    frame::{
        cp16::{cp16time2a, decode_cp16time2a},
        cp24::{self, cp24time2a},
        cp56::{cp56time2a, decode_cp56time2a},
        fixed, CP24_SIZE,
    },
};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use std::{fmt, sync::Arc};

/// Time tag codec bound to one zone, CP24 tolerance and reference clock.
///
/// Cheap to clone and safe to share between sessions.
#[derive(Clone)]
pub struct TimeCodec {
    zone: FixedOffset,
    rollback_tolerance_mins: u32,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TimeCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeCodec")
            .field("zone", &self.zone)
            .field("rollback_tolerance_mins", &self.rollback_tolerance_mins)
            .finish_non_exhaustive()
    }
}

impl Default for TimeCodec {
    fn default() -> Self {
        Self {
            zone: Utc.fix(),
            rollback_tolerance_mins: cp24::DEFAULT_ROLLBACK_TOLERANCE_MINS,
            clock: Arc::new(SystemClock),
        }
    }
}

impl TimeCodec {
    pub fn new(config: &TimeCodecConfig) -> Result<Self> {
        config.validate()?;
        let zone = config.zone()?;
        tracing::debug!(
            utc_offset_secs = config.utc_offset_secs,
            rollback_tolerance_mins = config.rollback_tolerance_mins,
            "time codec configured"
        );
        Ok(Self {
            zone,
            rollback_tolerance_mins: config.rollback_tolerance_mins,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the reference clock used by [`TimeCodec::decode_cp24`].
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[inline]
    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    pub fn encode_cp56<Tz: TimeZone>(&self, time: &DateTime<Tz>) -> Bytes {
        cp56time2a(time, Some(&self.zone))
    }

    pub fn decode_cp56(&self, bytes: &[u8]) -> Result<Option<DateTime<FixedOffset>>> {
        decode_cp56time2a(bytes, Some(&self.zone))
    }

    pub fn encode_cp24<Tz: TimeZone>(&self, time: &DateTime<Tz>) -> Bytes {
        cp24time2a(time, Some(&self.zone))
    }

    /// Decodes a CP24Time2a tag against the codec's clock.
    pub fn decode_cp24(&self, bytes: &[u8]) -> Result<Option<DateTime<FixedOffset>>> {
        self.decode_cp24_at(bytes, &self.clock.now())
    }

    pub fn decode_cp24_at<Tz: TimeZone>(
        &self,
        bytes: &[u8],
        now: &DateTime<Tz>,
    ) -> Result<Option<DateTime<FixedOffset>>> {
        let raw: [u8; CP24_SIZE] = fixed("CP24Time2a", bytes)?;
        cp24::parse(raw, &self.zone, now, self.rollback_tolerance_mins)
    }

    #[inline]
    pub fn encode_cp16(&self, msec: u16) -> Bytes {
        cp16time2a(msec)
    }

    #[inline]
    pub fn decode_cp16(&self, bytes: &[u8]) -> Result<u16> {
        decode_cp16time2a(bytes)
    }
}
