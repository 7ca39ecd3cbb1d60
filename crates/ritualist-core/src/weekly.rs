//! Weekly quota tracking.
//!
//! Days are grouped into [`WeekBucket`]s and checked against the habit's
//! weekly expectation: a count of days for times-per-week habits, the full
//! weekday set for days-of-week habits.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Days, NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::{local_date, resolve_timezone, week_bucket, week_start, WeekBucket};
use crate::habit::weekday::habit_weekday;
use crate::habit::{Habit, HabitKind, HabitLog, HabitSchedule};

/// Logged value per local calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyValues {
    by_day: BTreeMap<NaiveDate, f64>,
}

impl DailyValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum each log's value into its local day, logs read in their resolved
    /// timezone.
    pub fn from_logs(logs: &[HabitLog], timezone: Tz) -> Self {
        let mut values = Self::new();
        for log in logs {
            values.add(local_date(log.date, resolve_timezone(log, timezone)), log.logged_value());
        }
        values
    }

    pub fn add(&mut self, day: NaiveDate, value: f64) {
        *self.by_day.entry(day).or_insert(0.0) += value;
    }

    pub fn get(&self, day: NaiveDate) -> f64 {
        self.by_day.get(&day).copied().unwrap_or(0.0)
    }

    /// Days in `[from, to]` with their values.
    pub fn range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.by_day
            .range(from..)
            .take_while(move |(day, _)| **day <= to)
            .map(|(day, value)| (*day, *value))
    }
}

impl FromIterator<(NaiveDate, f64)> for DailyValues {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (day, value) in iter {
            values.add(day, value);
        }
        values
    }
}

/// Progress toward the weekly expectation of one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyProgress {
    pub bucket: WeekBucket,
    pub week_start: NaiveDate,
    /// Qualifying days that count toward the target
    pub completed_days: u32,
    /// Days required for the week
    pub target: u32,
    pub met: bool,
}

/// Whether a day's value counts as "done" for weekly purposes.
///
/// Binary habits need any positive value; numeric habits need the daily
/// target, matching per-day completion.
pub fn day_qualifies(habit: &Habit, value: f64) -> bool {
    match habit.kind {
        HabitKind::Binary => value > 0.0,
        HabitKind::Numeric => value > 0.0 && value >= habit.effective_daily_target(),
    }
}

/// Progress of the week containing `reference_date`.
pub fn weekly_progress(
    habit: &Habit,
    reference_date: NaiveDate,
    values_by_day: &DailyValues,
    first_weekday: Weekday,
) -> WeeklyProgress {
    week_to_date_progress(habit, reference_date, NaiveDate::MAX, values_by_day, first_weekday)
}

/// Progress of the week containing `reference_date`, counting only days up
/// to and including `through`.
pub fn week_to_date_progress(
    habit: &Habit,
    reference_date: NaiveDate,
    through: NaiveDate,
    values_by_day: &DailyValues,
    first_weekday: Weekday,
) -> WeeklyProgress {
    let start = week_start(reference_date, first_weekday);
    let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
    let bucket = week_bucket(reference_date, first_weekday);

    let logged_weekdays: BTreeSet<u8> = values_by_day
        .range(start, end.min(through))
        .filter(|(_, value)| day_qualifies(habit, *value))
        .map(|(day, _)| habit_weekday(day.weekday()))
        .collect();

    let (completed_days, target, met) = match &habit.schedule {
        HabitSchedule::TimesPerWeek { target } => {
            let done = logged_weekdays.len() as u32;
            let target = u32::from(*target);
            (done, target, done >= target)
        }
        HabitSchedule::DaysOfWeek { days } => {
            // An empty required set is vacuously satisfied.
            let done = days.intersection(&logged_weekdays).count() as u32;
            (done, days.len() as u32, days.is_subset(&logged_weekdays))
        }
        HabitSchedule::Daily => {
            let done = logged_weekdays.len() as u32;
            (done, 7, done == 7)
        }
    };

    WeeklyProgress {
        bucket,
        week_start: start,
        completed_days,
        target,
        met,
    }
}

/// Whether the weekly expectation was met in the week containing
/// `reference_date`.
pub fn weekly_target_met(
    habit: &Habit,
    reference_date: NaiveDate,
    values_by_day: &DailyValues,
    first_weekday: Weekday,
) -> bool {
    weekly_progress(habit, reference_date, values_by_day, first_weekday).met
}

/// Group per-day values by week bucket, keeping qualifying days only.
pub fn qualifying_days_by_week(
    habit: &Habit,
    values_by_day: &DailyValues,
    first_weekday: Weekday,
) -> BTreeMap<WeekBucket, BTreeSet<NaiveDate>> {
    let mut weeks: BTreeMap<WeekBucket, BTreeSet<NaiveDate>> = BTreeMap::new();
    for (day, value) in values_by_day.by_day.iter() {
        if day_qualifies(habit, *value) {
            weeks
                .entry(week_bucket(*day, first_weekday))
                .or_default()
                .insert(*day);
        }
    }
    weeks
}
