use serde::Serialize;
use uuid::Uuid;

use super::snapshot::EvalArgs;

#[derive(Serialize)]
struct StreakOutput {
    habit_id: Uuid,
    current_streak: u32,
}

/// Print the current streak length.
pub fn run_streak(args: EvalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let eval = args.load()?;
    let current_streak = eval
        .engine
        .current_streak(&eval.source, &eval.habit, eval.as_of, eval.timezone)?;
    let output = StreakOutput {
        habit_id: eval.habit.id,
        current_streak,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print the full streak status.
pub fn run_status(args: EvalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let eval = args.load()?;
    let status = eval
        .engine
        .streak_status(&eval.source, &eval.habit, eval.as_of, eval.timezone)?;
    let mut json = serde_json::to_value(&status)?;
    json["is_at_risk"] = serde_json::Value::Bool(status.is_at_risk());
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
