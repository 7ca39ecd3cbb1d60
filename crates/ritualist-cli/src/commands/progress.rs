use chrono::NaiveDate;
use ritualist_core::{is_scheduled_day, local_date};
use serde::Serialize;

use super::snapshot::EvalArgs;

#[derive(Serialize)]
struct DayOutput {
    date: NaiveDate,
    scheduled: bool,
    progress: f64,
    completed: bool,
}

/// Print the progress of the reference day.
pub fn run_progress(args: EvalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let eval = args.load()?;
    let (engine, habit, source) = (&eval.engine, &eval.habit, &eval.source);

    let output = DayOutput {
        date: local_date(eval.as_of, eval.timezone),
        scheduled: is_scheduled_day(habit, eval.as_of, eval.timezone),
        progress: engine.daily_progress(source, habit, eval.as_of, eval.timezone)?,
        completed: engine.is_completed(source, habit, eval.as_of, eval.timezone)?,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print the progress of the week containing the reference day.
pub fn run_weekly(args: EvalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let eval = args.load()?;
    let progress = eval
        .engine
        .weekly_progress(&eval.source, &eval.habit, eval.as_of, eval.timezone)?;
    println!("{}", serde_json::to_string_pretty(&progress)?);
    Ok(())
}
