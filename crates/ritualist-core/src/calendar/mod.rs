//! Calendar day-boundary normalization.
//!
//! An instant only has a calendar day relative to a timezone. A log written
//! at 23:30 in Tokyo and a viewing date in Los Angeles are compared by first
//! normalizing each to its own local civil date. Every date comparison in the
//! engine goes through this module; raw instant equality is never used.

mod week;

pub use week::{week_bucket, week_start, WeekBucket};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoreError, Result};
use crate::habit::HabitLog;

/// A civil date as seen from one specific timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    date: NaiveDate,
    timezone: Tz,
}

impl CalendarDay {
    pub fn new(date: NaiveDate, timezone: Tz) -> Self {
        Self { date, timezone }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// First instant of this day in its timezone.
    ///
    /// When local midnight does not exist (a DST jump at 00:00), this is the
    /// first local time that does.
    pub fn start_instant(&self) -> DateTime<Utc> {
        let midnight = self.date.and_time(NaiveTime::MIN);
        for hour in 0..24 {
            let local = midnight + Duration::hours(hour);
            if let Some(dt) = self.timezone.from_local_datetime(&local).earliest() {
                return dt.with_timezone(&Utc);
            }
        }
        midnight.and_utc()
    }

    /// Whether two days name the same civil date, whatever their timezones.
    pub fn same_civil_date(&self, other: &CalendarDay) -> bool {
        self.date == other.date
    }
}

/// Normalize an instant to its calendar day in `timezone`.
pub fn start_of_day(instant: DateTime<Utc>, timezone: Tz) -> CalendarDay {
    CalendarDay::new(local_date(instant, timezone), timezone)
}

/// Local civil date of an instant in `timezone`.
pub fn local_date(instant: DateTime<Utc>, timezone: Tz) -> NaiveDate {
    instant.with_timezone(&timezone).date_naive()
}

/// Whether two instants fall on the same calendar day, each normalized in its
/// own timezone.
pub fn same_day(a: DateTime<Utc>, tz_a: Tz, b: DateTime<Utc>, tz_b: Tz) -> bool {
    start_of_day(a, tz_a).same_civil_date(&start_of_day(b, tz_b))
}

/// Shift a calendar day by `n` days (negative goes back).
///
/// Saturates at the representable date range.
pub fn add_days(n: i64, day: CalendarDay) -> CalendarDay {
    let shifted = Duration::try_days(n)
        .and_then(|delta| day.date.checked_add_signed(delta))
        .unwrap_or(if n < 0 { NaiveDate::MIN } else { NaiveDate::MAX });
    CalendarDay::new(shifted, day.timezone)
}

/// Timezone a log is interpreted in: its own, or `fallback` when it carries
/// none or an identifier outside the IANA database.
pub fn resolve_timezone(log: &HabitLog, fallback: Tz) -> Tz {
    match log.timezone.as_deref() {
        None | Some("") => fallback,
        Some(id) => match id.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(log_id = %log.id, timezone = id, "unknown log timezone, using fallback");
                fallback
            }
        },
    }
}

/// Parse an IANA timezone identifier.
///
/// # Errors
///
/// Returns [`CoreError::UnknownTimezone`] for identifiers chrono-tz does not
/// know.
pub fn parse_timezone(id: &str) -> Result<Tz> {
    id.parse::<Tz>()
        .map_err(|_| CoreError::UnknownTimezone(id.to_string()))
}
