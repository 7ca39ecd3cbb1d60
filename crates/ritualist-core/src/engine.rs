//! Engine facade over a log source.
//!
//! [`HabitEngine`] binds the user's evaluation settings to the pure
//! functions of this crate. Each call fetches one snapshot from a
//! [`LogSource`], wide enough to cover every civil day the question
//! touches, and evaluates it.

use chrono::{DateTime, Days, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use tracing::debug;

use crate::calendar::{local_date, week_start, CalendarDay};
use crate::completion::DailyLedger;
use crate::error::Result;
use crate::habit::{Habit, HabitLog};
use crate::source::{DateRange, LogSource};
use crate::stats::{CompletionRate, CompletionRateAnalyzer};
use crate::storage::EngineConfig;
use crate::streak::{HabitStreakStatus, StreakWalker};
use crate::validation::{self, ScheduleVerdict};
use crate::weekly::{self, DailyValues, WeeklyProgress};

/// Logs are stored as instants but judged on civil days in their own
/// timezone, which can sit up to 26 hours away from UTC.
const FETCH_MARGIN_DAYS: u64 = 2;

/// Habit evaluation with a fixed configuration.
#[derive(Debug, Clone)]
pub struct HabitEngine {
    walker: StreakWalker,
    rates: CompletionRateAnalyzer,
    fallback_timezone: Tz,
    first_weekday: Weekday,
}

impl Default for HabitEngine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl HabitEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from loaded settings.
    pub fn from_config(config: &EngineConfig) -> Self {
        let first_weekday = config.first_weekday();
        Self {
            walker: StreakWalker::with_config(config.streak_config()),
            rates: CompletionRateAnalyzer::with_first_weekday(first_weekday),
            fallback_timezone: config.fallback_timezone(),
            first_weekday,
        }
    }

    /// Timezone used when the caller has none of its own.
    pub fn fallback_timezone(&self) -> Tz {
        self.fallback_timezone
    }

    pub fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    pub fn walker(&self) -> &StreakWalker {
        &self.walker
    }

    /// Streak status of `habit` as of `as_of`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot deliver logs.
    pub fn streak_status(
        &self,
        source: &dyn LogSource,
        habit: &Habit,
        as_of: DateTime<Utc>,
        timezone: Tz,
    ) -> Result<HabitStreakStatus> {
        let today = local_date(as_of, timezone);
        let lookback = u64::from(self.walker.config().max_lookback_days);
        // Times-per-week days are judged by their whole week, so the fetch
        // starts at the first day of the oldest week the walk can reach.
        let earliest = week_start(
            today
                .checked_sub_days(Days::new(lookback))
                .unwrap_or(NaiveDate::MIN)
                .max(habit.start_date),
            self.first_weekday,
        );
        let logs = self.fetch(source, habit, earliest, today, timezone)?;
        Ok(self.walker.streak_status(habit, &logs, as_of, timezone))
    }

    /// Current streak length of `habit` as of `as_of`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot deliver logs.
    pub fn current_streak(
        &self,
        source: &dyn LogSource,
        habit: &Habit,
        as_of: DateTime<Utc>,
        timezone: Tz,
    ) -> Result<u32> {
        Ok(self
            .streak_status(source, habit, as_of, timezone)?
            .current_streak_length)
    }

    /// Whether a log may be written for `habit` at `date`. Needs no logs.
    pub fn validate(&self, habit: &Habit, date: DateTime<Utc>, timezone: Tz) -> ScheduleVerdict {
        validation::validate(habit, date, timezone)
    }

    /// Progress ratio of the civil day containing `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot deliver logs.
    pub fn daily_progress(
        &self,
        source: &dyn LogSource,
        habit: &Habit,
        date: DateTime<Utc>,
        timezone: Tz,
    ) -> Result<f64> {
        let day = local_date(date, timezone);
        let logs = self.fetch(source, habit, day, day, timezone)?;
        Ok(DailyLedger::new(&logs, timezone).outcome(habit, day).progress)
    }

    /// Whether the civil day containing `date` is fulfilled.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot deliver logs.
    pub fn is_completed(
        &self,
        source: &dyn LogSource,
        habit: &Habit,
        date: DateTime<Utc>,
        timezone: Tz,
    ) -> Result<bool> {
        let day = local_date(date, timezone);
        let logs = self.fetch(source, habit, day, day, timezone)?;
        Ok(DailyLedger::new(&logs, timezone).is_completed(habit, day))
    }

    /// Progress of the week containing `reference`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot deliver logs.
    pub fn weekly_progress(
        &self,
        source: &dyn LogSource,
        habit: &Habit,
        reference: DateTime<Utc>,
        timezone: Tz,
    ) -> Result<WeeklyProgress> {
        let day = local_date(reference, timezone);
        let start = week_start(day, self.first_weekday);
        let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
        let logs = self.fetch(source, habit, start, end, timezone)?;
        let values = DailyValues::from_logs(&logs, timezone);
        Ok(weekly::weekly_progress(habit, day, &values, self.first_weekday))
    }

    /// Completion rate over the civil days `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot deliver logs.
    pub fn completion_rate(
        &self,
        source: &dyn LogSource,
        habit: &Habit,
        from: NaiveDate,
        to: NaiveDate,
        timezone: Tz,
    ) -> Result<CompletionRate> {
        let logs = self.fetch(source, habit, from, to, timezone)?;
        Ok(self.rates.analyze(habit, &logs, from, to, timezone))
    }

    /// Fetch the logs that may land on any civil day in `[first, last]`.
    fn fetch(
        &self,
        source: &dyn LogSource,
        habit: &Habit,
        first: NaiveDate,
        last: NaiveDate,
        timezone: Tz,
    ) -> Result<Vec<HabitLog>> {
        let margin = Days::new(FETCH_MARGIN_DAYS);
        let start = first.checked_sub_days(margin).unwrap_or(NaiveDate::MIN);
        let end = last
            .checked_add_days(margin)
            .and_then(|day| day.succ_opt())
            .unwrap_or(NaiveDate::MAX);
        let range = DateRange::new(
            CalendarDay::new(start, timezone).start_instant(),
            CalendarDay::new(end, timezone).start_instant(),
        );

        let logs = source.logs_for(habit.id, Some(range))?;
        debug!(
            habit_id = %habit.id,
            source = source.name(),
            %first,
            %last,
            count = logs.len(),
            "fetched log snapshot"
        );
        Ok(logs)
    }
}
