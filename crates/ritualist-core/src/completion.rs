//! Per-day completion and progress.
//!
//! A log counts toward a day when its own calendar day, taken in its resolved
//! timezone, matches the viewing day in the viewing timezone.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::{local_date, resolve_timezone, same_day};
use crate::habit::{Habit, HabitKind, HabitLog};

/// Evaluation of one habit on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayOutcome {
    /// Sum of logged values
    pub logged_total: f64,
    /// Fraction of the day's requirement met, in [0, 1]
    pub progress: f64,
    pub completed: bool,
}

impl DayOutcome {
    /// Evaluate the logs already known to belong to one day.
    pub fn evaluate<'a, I>(habit: &Habit, logs: I) -> Self
    where
        I: IntoIterator<Item = &'a HabitLog>,
    {
        match habit.kind {
            HabitKind::Binary => {
                let mut logged_total = 0.0;
                let mut completed = false;
                for log in logs {
                    let value = log.logged_value();
                    logged_total += value;
                    completed |= value > 0.0;
                }
                Self {
                    logged_total,
                    progress: if completed { 1.0 } else { 0.0 },
                    completed,
                }
            }
            HabitKind::Numeric => {
                let logged_total: f64 = logs.into_iter().map(HabitLog::logged_value).sum();
                let target = habit.effective_daily_target();
                Self {
                    logged_total,
                    progress: (logged_total / target).clamp(0.0, 1.0),
                    completed: logged_total >= target,
                }
            }
        }
    }
}

/// Logs whose calendar day equals `date` as seen from `timezone`.
///
/// Logs without their own timezone are read in `timezone` as well.
pub fn logs_on_date<'a>(
    logs: &'a [HabitLog],
    date: DateTime<Utc>,
    timezone: Tz,
) -> Vec<&'a HabitLog> {
    logs.iter()
        .filter(|log| same_day(log.date, resolve_timezone(log, timezone), date, timezone))
        .collect()
}

/// Whether the habit counts as done on `date`.
pub fn is_completed(habit: &Habit, date: DateTime<Utc>, logs: &[HabitLog], timezone: Tz) -> bool {
    DayOutcome::evaluate(habit, logs_on_date(logs, date, timezone)).completed
}

/// Fraction of the day's requirement logged on `date`, in [0, 1].
///
/// Binary habits report exactly 0.0 or 1.0.
pub fn daily_progress(habit: &Habit, date: DateTime<Utc>, logs: &[HabitLog], timezone: Tz) -> f64 {
    DayOutcome::evaluate(habit, logs_on_date(logs, date, timezone)).progress
}

/// A log snapshot grouped by local calendar day.
///
/// Built once per evaluation so day-by-day walks look logs up instead of
/// rescanning the snapshot for every day.
#[derive(Debug, Clone, Default)]
pub struct DailyLedger<'a> {
    days: BTreeMap<NaiveDate, Vec<&'a HabitLog>>,
}

impl<'a> DailyLedger<'a> {
    pub fn new(logs: &'a [HabitLog], timezone: Tz) -> Self {
        let mut days: BTreeMap<NaiveDate, Vec<&'a HabitLog>> = BTreeMap::new();
        for log in logs {
            let day = local_date(log.date, resolve_timezone(log, timezone));
            days.entry(day).or_default().push(log);
        }
        Self { days }
    }

    pub fn logs_on(&self, day: NaiveDate) -> &[&'a HabitLog] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn outcome(&self, habit: &Habit, day: NaiveDate) -> DayOutcome {
        DayOutcome::evaluate(habit, self.logs_on(day).iter().copied())
    }

    pub fn is_completed(&self, habit: &Habit, day: NaiveDate) -> bool {
        self.outcome(habit, day).completed
    }
}
