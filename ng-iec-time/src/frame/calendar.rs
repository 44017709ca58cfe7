use crate::error::{Error, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone};

/// Calendar fields as carried on the wire, before any range check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WireFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

/// Composes wire fields into a timestamp in `zone`.
///
/// The masks bound every field but do not make the combination a valid date,
/// so out-of-range values carry into the next larger unit instead of failing:
/// day 0 is the last day of the previous month, 31 April is 1 May, month 0 is
/// December of the previous year and a second field of 60..=65 rolls into the
/// next minute.
pub(crate) fn compose(
    tag: &'static str,
    fields: WireFields,
    zone: &FixedOffset,
) -> Result<DateTime<FixedOffset>> {
    let out_of_range = || Error::OutOfRange { tag };

    let month0 = fields.month as i32 - 1;
    let year = fields.year + month0.div_euclid(12);
    let month = (month0.rem_euclid(12) + 1) as u32;

    let start_of_month = NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(out_of_range)?;

    let elapsed = Duration::days(fields.day as i64 - 1)
        + Duration::hours(fields.hour as i64)
        + Duration::minutes(fields.minute as i64)
        + Duration::seconds(fields.second as i64)
        + Duration::milliseconds(fields.millisecond as i64);

    let naive = start_of_month
        .checked_add_signed(elapsed)
        .ok_or_else(out_of_range)?;

    zone.from_local_datetime(&naive)
        .single()
        .ok_or_else(out_of_range)
}
