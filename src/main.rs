//! trip-settle CLI
//!
//! Split and settle a trip's expenses from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Settle a trip described in a JSON file
//! trip-settle settle --input trip.json
//!
//! # Provably minimal payments, as JSON
//! trip-settle settle --input trip.json --strategy exact --format json
//!
//! # Show how one participant's share adds up
//! trip-settle explain --input trip.json --participant ravi
//!
//! # Spending by category, day and payer
//! trip-settle analytics --input trip.json
//!
//! # Generate a random trip for testing
//! trip-settle generate --participants 8 --expenses 40 --seed 7
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use trip_settle::config::{EngineConfig, Strategy};
use trip_settle::core::participant::ParticipantId;
use trip_settle::settlement::SettlementEngine;
use trip_settle::simulation::{generate_random_trip, TripConfig};
use trip_settle::split::Splitter;
use trip_settle::trip::Trip;

#[derive(Parser, Debug)]
#[command(name = "trip-settle")]
#[command(about = "Split shared trip expenses and settle them with as few payments as possible")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute balances and the payments that clear them
    Settle(SettleArgs),
    /// Break down one participant's share expense by expense
    Explain(ExplainArgs),
    /// Spending totals by category, day and payer
    Analytics(AnalyticsArgs),
    /// Generate a random trip (for testing)
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Path to the trip JSON file.
    #[arg(long)]
    input: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Engine config JSON (also read from `TRIP_SETTLE_CONFIG`).
    #[arg(long, env = "TRIP_SETTLE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AnalyticsArgs {
    /// Path to the trip JSON file.
    #[arg(long)]
    input: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Args, Debug)]
struct SettleArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Overrides the strategy from the config file.
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
}

#[derive(Args, Debug)]
struct ExplainArgs {
    #[command(flatten)]
    input: InputArgs,

    #[arg(long)]
    participant: String,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(long, default_value_t = 6)]
    participants: usize,

    #[arg(long, default_value_t = 30)]
    expenses: usize,

    /// Seed for a reproducible trip.
    #[arg(long)]
    seed: Option<u64>,

    /// Write to file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Greedy,
    Exact,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Greedy => Strategy::Greedy,
            StrategyArg::Exact => Strategy::Exact,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, Box<dyn Error>> {
    match path {
        Some(path) => {
            info!("loading engine config from {}", path.display());
            Ok(EngineConfig::from_json_file(path)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn load_trip(path: &Path) -> Result<Trip, Box<dyn Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
    let trip = Trip::from_json_str(&content)?;
    info!(
        "loaded {} participants and {} expenses from {}",
        trip.participants().len(),
        trip.expenses().len(),
        path.display()
    );
    Ok(trip)
}

fn cmd_settle(args: SettleArgs) -> Result<(), Box<dyn Error>> {
    let mut config = load_config(args.input.config.as_deref())?;
    if let Some(strategy) = args.strategy {
        config = config.with_strategy(strategy.into());
    }
    let trip = load_trip(&args.input.input)?;
    let report = trip.settle(&Splitter::new(&config), &SettlementEngine::new(&config))?;

    match args.input.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => print!("{}", report),
    }
    Ok(())
}

fn cmd_explain(args: ExplainArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(args.input.config.as_deref())?;
    let trip = load_trip(&args.input.input)?;
    let explanation = trip.explain(&ParticipantId::new(args.participant), &Splitter::new(&config))?;

    match args.input.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&explanation)?),
        Format::Text => print!("{}", explanation),
    }
    Ok(())
}

fn cmd_analytics(args: AnalyticsArgs) -> Result<(), Box<dyn Error>> {
    let trip = load_trip(&args.input)?;
    let analytics = trip.analytics();

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&analytics)?),
        Format::Text => print!("{}", analytics),
    }
    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> Result<(), Box<dyn Error>> {
    let config = TripConfig {
        participant_count: args.participants,
        expense_count: args.expenses,
        seed: args.seed,
        ..Default::default()
    };
    let trip = generate_random_trip(&config);
    let json = serde_json::to_string_pretty(&trip)?;

    match args.output {
        Some(path) => {
            fs::write(&path, &json)
                .map_err(|e| format!("failed to write '{}': {}", path.display(), e))?;
            eprintln!(
                "Generated {} expenses across {} participants → {}",
                trip.expenses().len(),
                trip.participants().len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Settle(args) => cmd_settle(args),
        Command::Explain(args) => cmd_explain(args),
        Command::Analytics(args) => cmd_analytics(args),
        Command::Generate(args) => cmd_generate(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
