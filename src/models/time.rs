//! Time-zone conversion and work-calendar checks.
//!
//! All functions here are pure: the engine never consults the system clock,
//! so every computation is reproducible from its inputs.

use crate::api::{Interval, User};
use crate::error::EngineError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Resolve an IANA zone name, failing with `InvalidTimeZone` when the name is
/// not in the time-zone database.
pub fn resolve_zone(zone: &str) -> Result<Tz, EngineError> {
    zone.parse::<Tz>()
        .map_err(|_| EngineError::InvalidTimeZone(zone.to_string()))
}

/// Convert an absolute instant to wall-clock time in the named zone.
pub fn to_zone(instant: DateTime<Utc>, zone: &str) -> Result<DateTime<Tz>, EngineError> {
    Ok(instant.with_timezone(&resolve_zone(zone)?))
}

/// Whether an instant falls inside the user's work hours: the local weekday
/// is one of their work days and the local hour is in
/// `[work_start_hour, work_end_hour)`.
pub fn is_work_time(instant: DateTime<Utc>, user: &User) -> Result<bool, EngineError> {
    let local = to_zone(instant, &user.timezone)?;
    Ok(user.is_work_day(local.weekday())
        && local.hour() >= user.work_start_hour
        && local.hour() < user.work_end_hour)
}

/// Whether an interval sits entirely inside one of the user's local work
/// days. An interval that straddles the work-hours boundary (or a local
/// midnight) is not contained; an end landing exactly on `work_end_hour:00`
/// is, because the interval is half-open.
pub fn interval_within_work_hours(
    interval: &Interval,
    user: &User,
) -> Result<bool, EngineError> {
    let tz = resolve_zone(&user.timezone)?;
    let start = interval.start.with_timezone(&tz);
    let end = interval.end.with_timezone(&tz);

    if !user.is_work_day(start.weekday()) {
        return Ok(false);
    }

    let end_minutes = if end.date_naive() == start.date_naive() {
        minutes_into_day(&end)
    } else if end.time() == NaiveTime::MIN
        && Some(end.date_naive()) == start.date_naive().succ_opt()
    {
        // Ending exactly at the next local midnight closes out the same day.
        24 * 60
    } else {
        return Ok(false);
    };

    Ok(minutes_into_day(&start) >= i64::from(user.work_start_hour) * 60
        && end_minutes <= i64::from(user.work_end_hour) * 60)
}

/// Whether the interval spans a local midnight in the given zone. An end
/// landing exactly on the next midnight does not count as a crossing.
pub fn crosses_local_midnight(interval: &Interval, tz: Tz) -> bool {
    let start = interval.start.with_timezone(&tz);
    let end = interval.end.with_timezone(&tz);
    if start.date_naive() == end.date_naive() {
        return false;
    }
    !(end.time() == NaiveTime::MIN && Some(end.date_naive()) == start.date_naive().succ_opt())
}

/// Absolute instant of a local wall-clock hour on a date. Returns `None` for
/// wall-clock times skipped by a DST transition; ambiguous times resolve to
/// the earlier instant. Hour 24 means midnight at the end of the date.
pub fn local_instant(tz: Tz, date: NaiveDate, hour: u32) -> Option<DateTime<Utc>> {
    if hour >= 24 {
        return local_instant(tz, date.succ_opt()?, hour - 24);
    }
    let naive = date.and_hms_opt(hour, 0, 0)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Wall-clock minutes elapsed since the local midnight.
pub fn minutes_into_day<T: TimeZone>(local: &DateTime<T>) -> i64 {
    i64::from(local.hour()) * 60 + i64::from(local.minute())
}

/// Fractional local hour of an instant in the given zone, e.g. 9.5 for 09:30.
pub fn fractional_hour<T: TimeZone>(local: &DateTime<T>) -> f64 {
    f64::from(local.hour()) + f64::from(local.minute()) / 60.0
}
