//! Schedule evaluation: is a habit due on a given day?
//!
//! Per-day eligibility only. Weekly quotas for times-per-week habits live in
//! [`crate::weekly`], and start/end bounds are checked separately through
//! [`is_within_active_range`].

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::calendar::start_of_day;
use crate::habit::weekday::habit_weekday;
use crate::habit::{Habit, HabitSchedule};

/// Whether `date`, seen from `timezone`, is a due day under the habit's
/// schedule.
pub fn is_scheduled_day(habit: &Habit, date: DateTime<Utc>, timezone: Tz) -> bool {
    is_scheduled_on(&habit.schedule, start_of_day(date, timezone).date())
}

/// Whether a civil date is a due day under `schedule`.
pub fn is_scheduled_on(schedule: &HabitSchedule, day: NaiveDate) -> bool {
    match schedule {
        HabitSchedule::Daily => true,
        HabitSchedule::DaysOfWeek { days } => days.contains(&habit_weekday(day.weekday())),
        HabitSchedule::TimesPerWeek { .. } => true,
    }
}

/// Whether a civil date lies within the habit's `[start_date, end_date]`.
pub fn is_within_active_range(habit: &Habit, day: NaiveDate) -> bool {
    day >= habit.start_date && habit.end_date.map_or(true, |end| day <= end)
}
