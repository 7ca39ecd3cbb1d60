use ritualist_core::ScheduleVerdict;
use serde::Serialize;

use super::snapshot::EvalArgs;

#[derive(Serialize)]
struct ValidateOutput {
    valid: bool,
    reason: Option<String>,
    verdict: ScheduleVerdict,
}

/// Check whether a log may be written at the reference instant.
pub fn run(args: EvalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let eval = args.load()?;
    let verdict = eval.engine.validate(&eval.habit, eval.as_of, eval.timezone);
    let output = ValidateOutput {
        valid: verdict.is_valid(),
        reason: verdict.reason(),
        verdict,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
