//! Completion rate over a date range
//!
//! Measures how much of what the schedule asked for was actually done:
//! - **Daily / days-of-week**: fulfilled due days over due days
//! - **Times-per-week**: qualifying days over the weekly quota, with weeks
//!   cut by the range (or by the habit's start/end) prorated

use std::collections::BTreeMap;

use chrono::{NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::{week_bucket, WeekBucket};
use crate::completion::DailyLedger;
use crate::habit::{Habit, HabitLog, HabitSchedule};
use crate::schedule::is_scheduled_on;
use crate::weekly::{qualifying_days_by_week, DailyValues};

/// Completion statistics for a habit over `[from, to]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRate {
    /// First day evaluated (after clamping to the habit's start)
    pub from: NaiveDate,
    /// Last day evaluated (after clamping to the habit's end)
    pub to: NaiveDate,
    /// Days the schedule asked for
    pub expected: u32,
    /// Days actually fulfilled, never above `expected`
    pub completed: u32,
    /// `completed / expected`, 0.0 when nothing was expected
    pub rate: f64,
}

/// Analyzer for completion rates
#[derive(Debug, Clone)]
pub struct CompletionRateAnalyzer {
    /// First day of the week, for times-per-week quotas
    pub first_weekday: Weekday,
}

impl Default for CompletionRateAnalyzer {
    fn default() -> Self {
        Self {
            first_weekday: Weekday::Mon,
        }
    }
}

impl CompletionRateAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_first_weekday(first_weekday: Weekday) -> Self {
        Self { first_weekday }
    }

    /// Compute the completion rate of `habit` over `[from, to]`, logs read
    /// in their resolved timezone with `timezone` as fallback.
    pub fn analyze(
        &self,
        habit: &Habit,
        logs: &[HabitLog],
        from: NaiveDate,
        to: NaiveDate,
        timezone: Tz,
    ) -> CompletionRate {
        let from = from.max(habit.start_date);
        let to = habit.end_date.map_or(to, |end| to.min(end));

        let (expected, completed) = if from > to {
            (0, 0)
        } else {
            match &habit.schedule {
                HabitSchedule::TimesPerWeek { target } => {
                    self.weekly_counts(habit, logs, from, to, timezone, u32::from(*target))
                }
                HabitSchedule::Daily | HabitSchedule::DaysOfWeek { .. } => {
                    let ledger = DailyLedger::new(logs, timezone);
                    let mut expected = 0u32;
                    let mut completed = 0u32;
                    for day in days_between(from, to) {
                        if is_scheduled_on(&habit.schedule, day) {
                            expected += 1;
                            if ledger.is_completed(habit, day) {
                                completed += 1;
                            }
                        }
                    }
                    (expected, completed)
                }
            }
        };

        let rate = if expected > 0 {
            f64::from(completed) / f64::from(expected)
        } else {
            0.0
        };

        CompletionRate {
            from,
            to,
            expected,
            completed,
            rate,
        }
    }

    fn weekly_counts(
        &self,
        habit: &Habit,
        logs: &[HabitLog],
        from: NaiveDate,
        to: NaiveDate,
        timezone: Tz,
        target: u32,
    ) -> (u32, u32) {
        let mut days_in_range: BTreeMap<WeekBucket, u32> = BTreeMap::new();
        for day in days_between(from, to) {
            *days_in_range
                .entry(week_bucket(day, self.first_weekday))
                .or_insert(0) += 1;
        }

        let values = DailyValues::from_logs(logs, timezone);
        let qualifying = qualifying_days_by_week(habit, &values, self.first_weekday);

        let mut expected = 0u32;
        let mut completed = 0u32;
        for (bucket, available) in days_in_range {
            let week_target = target.min(available);
            let done = qualifying
                .get(&bucket)
                .map(|days| days.range(from..=to).count() as u32)
                .unwrap_or(0);
            expected += week_target;
            completed += done.min(week_target);
        }
        (expected, completed)
    }
}

fn days_between(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |day| *day <= to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use chrono_tz::UTC;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn logs_on(habit: &Habit, days: &[u32]) -> Vec<HabitLog> {
        days.iter()
            .map(|d| {
                HabitLog::new(
                    habit.id,
                    Utc.with_ymd_and_hms(2025, 1, *d, 12, 0, 0).unwrap(),
                    Some(1.0),
                )
            })
            .collect()
    }

    #[test]
    fn daily_rate_counts_every_day() {
        let habit = Habit::binary("Read", HabitSchedule::Daily, date(2025, 1, 1));
        let logs = logs_on(&habit, &[1, 2, 4, 5]);
        let rate = CompletionRateAnalyzer::new().analyze(
            &habit,
            &logs,
            date(2025, 1, 1),
            date(2025, 1, 10),
            UTC,
        );
        assert_eq!(rate.expected, 10);
        assert_eq!(rate.completed, 4);
        assert!((rate.rate - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn days_of_week_rate_ignores_unscheduled_days() {
        let habit = Habit::binary("Run", HabitSchedule::days_of_week([1, 3, 5]), date(2025, 1, 1));
        // Mon 6, Wed 8, and an off-schedule Tuesday 7
        let logs = logs_on(&habit, &[6, 7, 8]);
        let rate = CompletionRateAnalyzer::new().analyze(
            &habit,
            &logs,
            date(2025, 1, 6),
            date(2025, 1, 12),
            UTC,
        );
        assert_eq!((rate.expected, rate.completed), (3, 2));
    }

    #[test]
    fn range_is_clamped_to_habit_lifetime() {
        let habit = Habit::binary("Read", HabitSchedule::Daily, date(2025, 1, 5))
            .with_end_date(date(2025, 1, 8));
        let rate = CompletionRateAnalyzer::new().analyze(
            &habit,
            &logs_on(&habit, &[5, 6, 7, 8]),
            date(2025, 1, 1),
            date(2025, 1, 31),
            UTC,
        );
        assert_eq!((rate.from, rate.to), (date(2025, 1, 5), date(2025, 1, 8)));
        assert_eq!(rate.rate, 1.0);
    }

    #[test]
    fn empty_range_has_zero_rate() {
        let habit = Habit::binary("Read", HabitSchedule::Daily, date(2025, 2, 1));
        let rate = CompletionRateAnalyzer::new().analyze(
            &habit,
            &[],
            date(2025, 1, 1),
            date(2025, 1, 31),
            UTC,
        );
        assert_eq!(rate.expected, 0);
        assert_eq!(rate.rate, 0.0);
    }

    #[test]
    fn times_per_week_caps_and_prorates_weeks() {
        let habit = Habit::binary(
            "Gym",
            HabitSchedule::TimesPerWeek { target: 3 },
            date(2025, 1, 1),
        );
        // Week of Jan 6: four sessions (capped at three). Jan 13-14: one session.
        let logs = logs_on(&habit, &[6, 7, 8, 9, 13]);
        let rate = CompletionRateAnalyzer::new().analyze(
            &habit,
            &logs,
            date(2025, 1, 6),
            date(2025, 1, 14),
            UTC,
        );
        // 3 for the full week + min(3, 2 days) for the partial one
        assert_eq!(rate.expected, 5);
        assert_eq!(rate.completed, 4);
    }
}
