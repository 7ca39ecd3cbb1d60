//! # Ritualist Core Library
//!
//! This library provides the habit evaluation engine for Ritualist. Given a
//! habit definition and a snapshot of its logs, it answers the questions a
//! tracker asks every day: is today a due day, is it done, how far along is
//! it, how long is the streak, and may a log be written for this date.
//!
//! ## Architecture
//!
//! - **Calendar**: Day-boundary normalization. Every instant is reduced to a
//!   civil date in an explicit timezone before any comparison
//! - **Schedule**: Due-day evaluation for daily, days-of-week and
//!   times-per-week schedules
//! - **Completion / Weekly**: Per-day completion and progress, and weekly
//!   quota aggregation
//! - **Streak**: Backward walk over scheduled days with a grace policy for
//!   the day in progress
//! - **Validation**: Accept/reject verdicts with readable reasons for log
//!   writes
//! - **Storage**: TOML-based engine configuration
//!
//! Evaluation is pure and synchronous. Nothing here reads the clock or the
//! machine's locale; callers pass the reference instant and timezone.
//!
//! ## Key Components
//!
//! - [`HabitEngine`]: Configured facade over a [`LogSource`]
//! - [`StreakWalker`]: Streak computation
//! - [`EngineConfig`]: Engine configuration management

pub mod calendar;
pub mod completion;
pub mod engine;
pub mod error;
pub mod habit;
pub mod schedule;
pub mod source;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod validation;
pub mod weekly;

pub use calendar::{
    add_days, local_date, same_day, start_of_day, week_bucket, week_start, CalendarDay,
    WeekBucket,
};
pub use completion::{daily_progress, is_completed, DailyLedger, DayOutcome};
pub use engine::HabitEngine;
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use habit::{Habit, HabitKind, HabitLog, HabitSchedule};
pub use schedule::is_scheduled_day;
pub use source::{DateRange, InMemoryLogSource, LogSource};
pub use stats::{CompletionRate, CompletionRateAnalyzer};
pub use storage::{EngineConfig, StreakSettings};
pub use streak::{
    current_streak, streak_status, GracePolicy, HabitStreakStatus, StreakConfig, StreakWalker,
};
pub use validation::{validate, ScheduleVerdict, ScheduleViolation};
pub use weekly::{weekly_progress, weekly_target_met, DailyValues, WeeklyProgress};
