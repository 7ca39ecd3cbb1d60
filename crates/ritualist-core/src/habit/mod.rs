//! Habit and habit log snapshots.
//!
//! Habits and logs are owned by external repositories. The engine only reads
//! immutable snapshots of them.

pub mod weekday;

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// How a habit is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitKind {
    /// Done or not done
    Binary,
    /// A quantity measured against a daily target
    Numeric,
}

/// When a habit is expected to be acted upon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HabitSchedule {
    /// Every day
    Daily,
    /// Specific weekdays, Monday=1..Sunday=7
    DaysOfWeek { days: BTreeSet<u8> },
    /// Any days, a number of times per week
    TimesPerWeek { target: u8 },
}

impl HabitSchedule {
    /// Convenience constructor for a days-of-week schedule.
    pub fn days_of_week<I: IntoIterator<Item = u8>>(days: I) -> Self {
        HabitSchedule::DaysOfWeek {
            days: days.into_iter().collect(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A habit snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    pub kind: HabitKind,
    /// Required iff `kind` is numeric
    #[serde(default)]
    pub daily_target: Option<f64>,
    pub schedule: HabitSchedule,
    /// First calendar day the habit exists (inclusive)
    pub start_date: NaiveDate,
    /// Last calendar day the habit exists (inclusive)
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Habit {
    /// Create an active binary habit.
    pub fn binary(name: impl Into<String>, schedule: HabitSchedule, start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: HabitKind::Binary,
            daily_target: None,
            schedule,
            start_date,
            end_date: None,
            is_active: true,
        }
    }

    /// Create an active numeric habit with a daily target.
    pub fn numeric(
        name: impl Into<String>,
        daily_target: f64,
        schedule: HabitSchedule,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            kind: HabitKind::Numeric,
            daily_target: Some(daily_target),
            ..Self::binary(name, schedule, start_date)
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Daily target used for numeric evaluation.
    ///
    /// A missing, non-finite or non-positive target evaluates as 1.0 so that
    /// progress stays defined. [`Habit::validate`] reports such habits.
    pub fn effective_daily_target(&self) -> f64 {
        match self.daily_target {
            Some(target) if target.is_finite() && target > 0.0 => target,
            _ => 1.0,
        }
    }

    /// Check the configuration invariants of this habit.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.kind == HabitKind::Numeric {
            match self.daily_target {
                Some(target) if target.is_finite() && target > 0.0 => {}
                other => return Err(ValidationError::MissingDailyTarget(other)),
            }
        }

        match &self.schedule {
            HabitSchedule::Daily => {}
            HabitSchedule::DaysOfWeek { days } => {
                if days.is_empty() {
                    return Err(ValidationError::EmptyWeekdaySet);
                }
                if let Some(&bad) = days.iter().find(|d| !(1..=7).contains(*d)) {
                    return Err(ValidationError::WeekdayOutOfRange(bad));
                }
            }
            HabitSchedule::TimesPerWeek { target } => {
                if !(1..=7).contains(target) {
                    return Err(ValidationError::WeeklyTargetOutOfRange(*target));
                }
            }
        }

        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(ValidationError::InvalidDateRange {
                    start: self.start_date,
                    end,
                });
            }
        }

        Ok(())
    }
}

/// A single recorded log for a habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitLog {
    pub id: Uuid,
    pub habit_id: Uuid,
    /// Instant the log was recorded for
    pub date: DateTime<Utc>,
    /// Absent or zero means "not logged" for binary habits
    #[serde(default)]
    pub value: Option<f64>,
    /// IANA timezone the log was recorded in
    #[serde(default)]
    pub timezone: Option<String>,
}

impl HabitLog {
    pub fn new(habit_id: Uuid, date: DateTime<Utc>, value: Option<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            habit_id,
            date,
            value,
            timezone: None,
        }
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Logged quantity, with absent or non-finite values reading as zero.
    pub fn logged_value(&self) -> f64 {
        match self.value {
            Some(v) if v.is_finite() => v,
            _ => 0.0,
        }
    }
}
