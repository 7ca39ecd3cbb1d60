use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::snapshot::EvalArgs;

#[derive(Parser)]
#[command(name = "ritualist-cli", version, about = "Ritualist habit engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current streak length
    Streak(EvalArgs),
    /// Full streak status (current, longest, at risk)
    Status(EvalArgs),
    /// Progress of the reference day
    Progress(EvalArgs),
    /// Progress of the week containing the reference day
    Weekly(EvalArgs),
    /// Whether a log may be written at the reference instant
    Validate(EvalArgs),
    /// Completion rate over a date range
    Rate(commands::stats::RateArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Streak(args) => commands::streak::run_streak(args),
        Commands::Status(args) => commands::streak::run_status(args),
        Commands::Progress(args) => commands::progress::run_progress(args),
        Commands::Weekly(args) => commands::progress::run_weekly(args),
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Rate(args) => commands::stats::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
