use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::habit::HabitLog;

/// Half-open instant range `[start, end)` for log retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// Where habit logs come from. The engine never fetches on its own; callers
/// hand it a source, or a snapshot they already fetched.
///
/// Implementations must return a consistent snapshot: the engine evaluates
/// whatever one call returns as the complete history for the range.
pub trait LogSource: Send + Sync {
    /// Identifier used in errors (e.g. "memory", "sqlite").
    fn name(&self) -> &str;

    /// Logs of `habit_id`, optionally restricted to `range`.
    fn logs_for(&self, habit_id: Uuid, range: Option<DateRange>) -> Result<Vec<HabitLog>>;
}

/// A log source over logs held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLogSource {
    logs: Vec<HabitLog>,
}

impl InMemoryLogSource {
    pub fn new(logs: Vec<HabitLog>) -> Self {
        Self { logs }
    }
}

impl LogSource for InMemoryLogSource {
    fn name(&self) -> &str {
        "memory"
    }

    fn logs_for(&self, habit_id: Uuid, range: Option<DateRange>) -> Result<Vec<HabitLog>> {
        Ok(self
            .logs
            .iter()
            .filter(|log| log.habit_id == habit_id)
            .filter(|log| range.map_or(true, |r| r.contains(log.date)))
            .cloned()
            .collect())
    }
}
