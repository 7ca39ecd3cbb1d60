//! Pre-write schedule validation.
//!
//! Turns schedule eligibility into an accept/reject verdict with a reason a
//! user can read. Log-creation workflows consult this before persisting a
//! log and decide themselves what to do with a rejection.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::start_of_day;
use crate::habit::weekday::{habit_weekday, plural_name, weekday_from_habit};
use crate::habit::{Habit, HabitSchedule};
use crate::schedule::is_scheduled_on;

/// Why a date cannot take a log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleViolation {
    /// The habit is archived or paused
    Inactive,
    /// The date precedes the habit's start date
    BeforeStart { start_date: NaiveDate },
    /// The date follows the habit's end date
    AfterEnd { end_date: NaiveDate },
    /// The schedule does not ask for this weekday
    NotScheduledDay {
        weekday: u8,
        scheduled_days: BTreeSet<u8>,
    },
}

impl ScheduleViolation {
    /// Human-readable explanation.
    pub fn reason(&self) -> String {
        match self {
            ScheduleViolation::Inactive => "This habit is not active".to_string(),
            ScheduleViolation::BeforeStart { start_date } => {
                format!("This habit starts on {}", start_date.format("%Y-%m-%d"))
            }
            ScheduleViolation::AfterEnd { end_date } => {
                format!("This habit ended on {}", end_date.format("%Y-%m-%d"))
            }
            ScheduleViolation::NotScheduledDay { scheduled_days, .. } => {
                if scheduled_days.is_empty() {
                    "This habit has no scheduled days".to_string()
                } else {
                    format!(
                        "This habit is only scheduled for {}",
                        describe_days(scheduled_days)
                    )
                }
            }
        }
    }
}

/// Outcome of validating a date for a habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "violation", rename_all = "snake_case")]
pub enum ScheduleVerdict {
    Valid,
    Invalid(ScheduleViolation),
}

impl ScheduleVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, ScheduleVerdict::Valid)
    }

    pub fn violation(&self) -> Option<&ScheduleViolation> {
        match self {
            ScheduleVerdict::Valid => None,
            ScheduleVerdict::Invalid(violation) => Some(violation),
        }
    }

    pub fn reason(&self) -> Option<String> {
        self.violation().map(ScheduleViolation::reason)
    }
}

/// Whether a log may be written for `habit` on `date` seen from `timezone`.
pub fn validate(habit: &Habit, date: DateTime<Utc>, timezone: Tz) -> ScheduleVerdict {
    let day = start_of_day(date, timezone).date();

    if !habit.is_active {
        return ScheduleVerdict::Invalid(ScheduleViolation::Inactive);
    }
    if day < habit.start_date {
        return ScheduleVerdict::Invalid(ScheduleViolation::BeforeStart {
            start_date: habit.start_date,
        });
    }
    if let Some(end_date) = habit.end_date {
        if day > end_date {
            return ScheduleVerdict::Invalid(ScheduleViolation::AfterEnd { end_date });
        }
    }
    if is_scheduled_on(&habit.schedule, day) {
        return ScheduleVerdict::Valid;
    }

    let scheduled_days = match &habit.schedule {
        HabitSchedule::DaysOfWeek { days } => days.clone(),
        HabitSchedule::Daily | HabitSchedule::TimesPerWeek { .. } => BTreeSet::new(),
    };
    ScheduleVerdict::Invalid(ScheduleViolation::NotScheduledDay {
        weekday: habit_weekday(day.weekday()),
        scheduled_days,
    })
}

/// "Mondays", "Mondays and Wednesdays", "Mondays, Wednesdays and Fridays".
fn describe_days(days: &BTreeSet<u8>) -> String {
    let names: Vec<&str> = days
        .iter()
        .filter_map(|n| weekday_from_habit(*n))
        .map(plural_name)
        .collect();
    match names.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
