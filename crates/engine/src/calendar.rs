//! Calendar helpers shared by the period and grouping code.
//!
//! Every calendar field (day, month, year, weekday) is read in the configured
//! time zone, never in UTC.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// First instant of `date` in `tz`.
///
/// When local midnight falls in a DST gap the first valid instant after it is
/// used.
pub(crate) fn start_of_day(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    if let Some(dt) = tz.from_local_datetime(&midnight).earliest() {
        return dt.with_timezone(&Utc);
    }
    let shifted = midnight + Duration::hours(1);
    match tz.from_local_datetime(&shifted).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&midnight),
    }
}

/// Last whole second of `date` in `tz` (`23:59:59`).
pub(crate) fn end_of_day(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    match date.succ_opt() {
        Some(next) => start_of_day(tz, next) - Duration::seconds(1),
        None => DateTime::<Utc>::MAX_UTC,
    }
}

/// Calendar day of `instant` as seen in `tz`.
pub(crate) fn local_date(instant: &DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// First day of the month containing `date`.
pub(crate) fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day0(0).unwrap_or(date)
}
