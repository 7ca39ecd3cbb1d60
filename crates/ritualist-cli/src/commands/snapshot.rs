use std::path::PathBuf;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::Args;
use ritualist_core::calendar::parse_timezone;
use ritualist_core::{EngineConfig, Habit, HabitEngine, HabitLog, InMemoryLogSource};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A habit and the logs recorded for it, as exported by a tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub habit: Habit,
    #[serde(default)]
    pub logs: Vec<HabitLog>,
}

/// Arguments shared by every evaluation command.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Snapshot file with a habit and its logs (JSON)
    #[arg(long, short)]
    pub file: PathBuf,
    /// Reference instant in RFC 3339 (defaults to now)
    #[arg(long)]
    pub as_of: Option<DateTime<Utc>>,
    /// IANA timezone of the viewer (defaults to the configured fallback)
    #[arg(long)]
    pub tz: Option<String>,
}

/// Everything a command needs to answer one question.
pub struct Evaluation {
    pub engine: HabitEngine,
    pub habit: Habit,
    pub source: InMemoryLogSource,
    pub as_of: DateTime<Utc>,
    pub timezone: Tz,
}

impl EvalArgs {
    pub fn load(&self) -> Result<Evaluation, Box<dyn std::error::Error>> {
        let engine = HabitEngine::from_config(&EngineConfig::load()?);

        let content = std::fs::read_to_string(&self.file)
            .map_err(|e| format!("cannot read {}: {e}", self.file.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;

        if let Err(e) = snapshot.habit.validate() {
            warn!(
                habit_id = %snapshot.habit.id,
                error = %e,
                "habit configuration is invalid, evaluating with clamped values"
            );
        }

        let timezone = match &self.tz {
            Some(id) => parse_timezone(id)?,
            None => engine.fallback_timezone(),
        };

        Ok(Evaluation {
            engine,
            habit: snapshot.habit,
            source: InMemoryLogSource::new(snapshot.logs),
            as_of: self.as_of.unwrap_or_else(Utc::now),
            timezone,
        })
    }
}
