use chrono::{Days, NaiveDate};
use clap::Args;
use ritualist_core::local_date;

use super::snapshot::EvalArgs;

#[derive(Args, Debug)]
pub struct RateArgs {
    #[command(flatten)]
    pub eval: EvalArgs,
    /// First day of the range (defaults to 29 days before the reference day)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day of the range (defaults to the reference day)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

/// Print the completion rate over a date range.
pub fn run(args: RateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let eval = args.eval.load()?;
    let to = args
        .to
        .unwrap_or_else(|| local_date(eval.as_of, eval.timezone));
    let from = args
        .from
        .unwrap_or_else(|| to.checked_sub_days(Days::new(29)).unwrap_or(to));
    if from > to {
        return Err(format!("--from {from} is after --to {to}").into());
    }

    let rate = eval
        .engine
        .completion_rate(&eval.source, &eval.habit, from, to, eval.timezone)?;
    println!("{}", serde_json::to_string_pretty(&rate)?);
    Ok(())
}
