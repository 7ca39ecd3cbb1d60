//! Streak computation.
//!
//! A streak is the number of consecutive fulfilled scheduled days ending at a
//! reference day. Days the schedule does not ask for are skipped without
//! effect. The walk runs backward from the reference day and stops at the
//! habit's start date, at the first unfulfilled scheduled day, or at the
//! configured lookback cap.
//!
//! Times-per-week habits have no fixed due days, so they are judged by week.
//! In a week that met its quota, logged days extend the streak and unlogged
//! days are skipped. A finished week that missed its quota breaks the streak.
//! The week in progress only breaks it once the quota is out of reach.

use chrono::{DateTime, Days, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{local_date, CalendarDay};
use crate::completion::DailyLedger;
use crate::habit::{Habit, HabitLog, HabitSchedule};
use crate::schedule::{is_scheduled_on, is_within_active_range};
use crate::weekly::{week_to_date_progress, DailyValues};

/// Default number of days a walk may look back.
pub const DEFAULT_MAX_LOOKBACK_DAYS: u32 = 3650;

/// Whether an unfinished reference day may break a streak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GracePolicy {
    /// The reference day is still in progress; leaving it unlogged never
    /// breaks the streak, it just does not count yet.
    #[default]
    TodayNeverBreaks,
    /// The reference day is judged like any other day.
    Strict,
}

/// Settings for streak walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakConfig {
    pub grace_policy: GracePolicy,
    /// Maximum number of days examined by one walk
    pub max_lookback_days: u32,
    /// First day of the week, for times-per-week quotas
    pub first_weekday: Weekday,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            grace_policy: GracePolicy::TodayNeverBreaks,
            max_lookback_days: DEFAULT_MAX_LOOKBACK_DAYS,
            first_weekday: Weekday::Mon,
        }
    }
}

/// Streak state of a habit as of a reference instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitStreakStatus {
    pub current_streak_length: u32,
    /// Whether a streak is currently running
    pub is_active: bool,
    /// Most recent fulfilled day counted by the streak
    pub last_qualifying_day: Option<CalendarDay>,
    /// Longest streak within the lookback window
    pub longest_streak: u32,
    /// Whether the reference day is a due day
    pub scheduled_today: bool,
    /// Whether the reference day is already fulfilled
    pub completed_today: bool,
}

impl HabitStreakStatus {
    /// A running streak whose reference day is due but not yet done.
    pub fn is_at_risk(&self) -> bool {
        self.is_active && self.scheduled_today && !self.completed_today
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayVerdict {
    Fulfilled,
    Skipped,
    Broken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    StartDate,
    Lookback,
    Break,
}

struct Walk {
    length: u32,
    last_qualifying: Option<NaiveDate>,
    stop: StopReason,
}

/// Everything a walk needs to judge one day, built once per evaluation.
struct DayJudge<'h, 'l> {
    habit: &'h Habit,
    ledger: DailyLedger<'l>,
    values: DailyValues,
    today: NaiveDate,
    config: StreakConfig,
}

impl<'h, 'l> DayJudge<'h, 'l> {
    fn new(
        habit: &'h Habit,
        logs: &'l [HabitLog],
        today: NaiveDate,
        timezone: Tz,
        config: StreakConfig,
    ) -> Self {
        Self {
            habit,
            ledger: DailyLedger::new(logs, timezone),
            values: DailyValues::from_logs(logs, timezone),
            today,
            config,
        }
    }

    fn judge(&self, day: NaiveDate) -> DayVerdict {
        if !is_within_active_range(self.habit, day)
            || !is_scheduled_on(&self.habit.schedule, day)
        {
            return DayVerdict::Skipped;
        }
        let completed = self.ledger.is_completed(self.habit, day);
        if let HabitSchedule::TimesPerWeek { target } = &self.habit.schedule {
            return self.judge_weekly(day, completed, *target);
        }
        if completed {
            DayVerdict::Fulfilled
        } else if self.excused_today(day) {
            DayVerdict::Skipped
        } else {
            DayVerdict::Broken
        }
    }

    /// Times-per-week days are judged by their week's quota.
    fn judge_weekly(&self, day: NaiveDate, completed: bool, target: u8) -> DayVerdict {
        // Only days up to the reference day count; later logs are unknown as of today.
        let progress = week_to_date_progress(
            self.habit,
            day,
            self.today,
            &self.values,
            self.config.first_weekday,
        );
        let start = progress.week_start;
        let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
        let target = u32::from(target).min(self.active_days_in_week(start));

        if progress.completed_days >= target {
            return if completed {
                DayVerdict::Fulfilled
            } else {
                DayVerdict::Skipped
            };
        }
        if end < self.today {
            // A finished week that missed its quota.
            return DayVerdict::Broken;
        }

        // The week in progress: fine while the quota is still reachable.
        if completed {
            return DayVerdict::Fulfilled;
        }
        if self.excused_today(day) {
            return DayVerdict::Skipped;
        }
        let mut open_days = (end - self.today).num_days() as u32;
        if self.config.grace_policy == GracePolicy::TodayNeverBreaks
            && !self.ledger.is_completed(self.habit, self.today)
        {
            open_days += 1;
        }
        if progress.completed_days + open_days >= target {
            DayVerdict::Skipped
        } else {
            DayVerdict::Broken
        }
    }

    fn excused_today(&self, day: NaiveDate) -> bool {
        day == self.today && self.config.grace_policy == GracePolicy::TodayNeverBreaks
    }

    /// Days of the week starting at `start` within the habit's active range.
    fn active_days_in_week(&self, start: NaiveDate) -> u32 {
        start
            .iter_days()
            .take(7)
            .filter(|day| is_within_active_range(self.habit, *day))
            .count() as u32
    }

    fn first_day(&self) -> NaiveDate {
        let lookback = u64::from(self.config.max_lookback_days.saturating_sub(1));
        let window_start = self
            .today
            .checked_sub_days(Days::new(lookback))
            .unwrap_or(NaiveDate::MIN);
        window_start.max(self.habit.start_date)
    }

    fn walk_back(&self) -> Walk {
        let mut day = self.today;
        let mut length = 0u32;
        let mut last_qualifying = None;
        let mut examined = 0u32;

        let stop = loop {
            if day < self.habit.start_date {
                break StopReason::StartDate;
            }
            if examined >= self.config.max_lookback_days {
                break StopReason::Lookback;
            }
            match self.judge(day) {
                DayVerdict::Fulfilled => {
                    length += 1;
                    last_qualifying.get_or_insert(day);
                }
                DayVerdict::Skipped => {}
                DayVerdict::Broken => break StopReason::Break,
            }
            examined += 1;
            day = match day.pred_opt() {
                Some(previous) => previous,
                None => break StopReason::StartDate,
            };
        };

        Walk {
            length,
            last_qualifying,
            stop,
        }
    }

    fn longest(&self) -> u32 {
        if self.today < self.habit.start_date {
            return 0;
        }
        let mut best = 0u32;
        let mut run = 0u32;
        for day in self.first_day().iter_days().take_while(|day| *day <= self.today) {
            match self.judge(day) {
                DayVerdict::Fulfilled => {
                    run += 1;
                    best = best.max(run);
                }
                DayVerdict::Skipped => {}
                DayVerdict::Broken => run = 0,
            }
        }
        best
    }
}

/// Computes streaks with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct StreakWalker {
    config: StreakConfig,
}

impl StreakWalker {
    /// Create a walker with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StreakConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StreakConfig {
        &self.config
    }

    /// Length of the streak ending at `as_of`.
    pub fn current_streak(
        &self,
        habit: &Habit,
        logs: &[HabitLog],
        as_of: DateTime<Utc>,
        timezone: Tz,
    ) -> u32 {
        let today = local_date(as_of, timezone);
        let walk = DayJudge::new(habit, logs, today, timezone, self.config).walk_back();
        debug!(
            habit_id = %habit.id,
            %today,
            length = walk.length,
            stop = ?walk.stop,
            "streak walk finished"
        );
        walk.length
    }

    /// Longest streak between the habit's start (or the lookback window) and
    /// `as_of`.
    pub fn longest_streak(
        &self,
        habit: &Habit,
        logs: &[HabitLog],
        as_of: DateTime<Utc>,
        timezone: Tz,
    ) -> u32 {
        let today = local_date(as_of, timezone);
        DayJudge::new(habit, logs, today, timezone, self.config).longest()
    }

    /// Full streak status as of `as_of`.
    pub fn streak_status(
        &self,
        habit: &Habit,
        logs: &[HabitLog],
        as_of: DateTime<Utc>,
        timezone: Tz,
    ) -> HabitStreakStatus {
        let today = local_date(as_of, timezone);
        let judge = DayJudge::new(habit, logs, today, timezone, self.config);
        let walk = judge.walk_back();
        let longest = judge.longest().max(walk.length);

        debug!(
            habit_id = %habit.id,
            %today,
            length = walk.length,
            longest,
            stop = ?walk.stop,
            "streak status computed"
        );

        let scheduled_today = is_within_active_range(habit, today)
            && is_scheduled_on(&habit.schedule, today);

        HabitStreakStatus {
            current_streak_length: walk.length,
            is_active: walk.length > 0,
            last_qualifying_day: walk
                .last_qualifying
                .map(|day| CalendarDay::new(day, timezone)),
            longest_streak: longest,
            scheduled_today,
            completed_today: judge.ledger.is_completed(habit, today),
        }
    }
}

/// Streak length with the default configuration.
pub fn current_streak(
    habit: &Habit,
    logs: &[HabitLog],
    as_of: DateTime<Utc>,
    timezone: Tz,
) -> u32 {
    StreakWalker::new().current_streak(habit, logs, as_of, timezone)
}

/// Streak status with the default configuration.
pub fn streak_status(
    habit: &Habit,
    logs: &[HabitLog],
    as_of: DateTime<Utc>,
    timezone: Tz,
) -> HabitStreakStatus {
    StreakWalker::new().streak_status(habit, logs, as_of, timezone)
}

#[cfg(test)]
mod walker_tests;
