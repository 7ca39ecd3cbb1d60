use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A (year, week-of-year) grouping key for weekly quotas.
///
/// A week belongs to the year that contains its fourth day, so with a Monday
/// first weekday this is ISO-8601 week numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeekBucket {
    pub year: i32,
    pub week: u32,
}

/// First day of the week containing `date`.
pub fn week_start(date: NaiveDate, first_weekday: Weekday) -> NaiveDate {
    let offset = (date.weekday().num_days_from_monday() + 7
        - first_weekday.num_days_from_monday())
        % 7;
    date.checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(date)
}

/// Week bucket containing `date` for the given first weekday.
pub fn week_bucket(date: NaiveDate, first_weekday: Weekday) -> WeekBucket {
    let start = week_start(date, first_weekday);
    let year = start.checked_add_days(Days::new(3)).unwrap_or(start).year();

    // Week 1 is the week holding January 4th.
    let first_week = NaiveDate::from_ymd_opt(year, 1, 4)
        .map(|jan4| week_start(jan4, first_weekday))
        .unwrap_or(start);
    let week = (start - first_week).num_days() / 7 + 1;

    WeekBucket {
        year,
        week: week as u32,
    }
}
