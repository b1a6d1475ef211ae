use crate::commands::{run_authorize, run_intents, run_operations, run_rank};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use smash_rank::config::AppConfig;
use smash_rank::error::AppError;
use smash_rank::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "smash-rank",
    about = "Rank players by intent from precomputed metric exports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank a metric export for one intent
    Rank(RankArgs),
    /// List the supported ranking intents and their weights
    Intents(FormatArgs),
    /// Check whether the policy allows a backend operation
    Authorize(AuthorizeArgs),
    /// List known backend operations and their intensity class
    Operations(FormatArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug)]
pub(crate) struct FormatArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Ranking intent, e.g. strongest, clutch, underrated
    #[arg(long)]
    pub(crate) intent: String,
    /// Precomputed metric export (.json or .csv)
    #[arg(long)]
    pub(crate) records: PathBuf,
    /// Maximum rows to return; zero or negative returns everything
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) top_n: Option<i64>,
    /// Minimum sample size (entrants) a player needs to be listed
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) min_sample_size: Option<i64>,
    /// Two-letter state code
    #[arg(long)]
    pub(crate) state: Option<String>,
    /// Rolling window the export covers, in months
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) months_back: Option<i64>,
    /// Rank a single tournament instead of a statewide export
    #[arg(long)]
    pub(crate) tournament_slug: Option<String>,
    /// Free text of the user's ask, used to gate live analytics
    #[arg(long)]
    pub(crate) request: Option<String>,
    /// Reference date for the window (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    #[command(flatten)]
    pub(crate) output: FormatArgs,
}

#[derive(Args, Debug)]
pub(crate) struct AuthorizeArgs {
    /// Backend operation name, e.g. tournamentPlayerAnalytics
    pub(crate) operation: String,
    /// Free text of the user's ask
    #[arg(long)]
    pub(crate) request: Option<String>,
    #[command(flatten)]
    pub(crate) output: FormatArgs,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Rank(args) => run_rank(&config, args),
        Command::Intents(args) => run_intents(&config, args.format),
        Command::Authorize(args) => run_authorize(&config, args),
        Command::Operations(args) => run_operations(args.format),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
