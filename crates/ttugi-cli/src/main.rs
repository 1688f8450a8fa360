//! `ttugi` -- CLI for the ttugi Busan restaurant recommender.
//!
//! Provides the following subcommands:
//!
//! - `ttugi recommend` -- Rank restaurants for a dining situation.
//! - `ttugi ask` -- Free-text chat turns with session memory.
//! - `ttugi analyze` -- Show the criteria extracted from a message.
//! - `ttugi weather` / `budget` / `now` / `group` -- Other ranked lists.
//! - `ttugi catalog` -- Catalog statistics and listing.

use clap::{Parser, Subcommand};

mod commands;

use commands::CommonArgs;

/// ttugi restaurant recommender CLI.
#[derive(Parser)]
#[command(name = "ttugi", about = "Busan restaurant recommendations", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Rank restaurants for a situation (데이트, 회식, 야식, ...).
    Recommend(commands::recommend::RecommendArgs),

    /// Ask in free text; several messages form one conversation.
    Ask(commands::ask::AskArgs),

    /// Show the criteria extracted from a message.
    Analyze(commands::ask::AnalyzeArgs),

    /// Dishes that suit the weather.
    Weather(commands::recommend::WeatherArgs),

    /// Restaurants within a per-person budget.
    Budget(commands::recommend::BudgetArgs),

    /// Recommendations for the current time of day.
    Now(commands::recommend::NowArgs),

    /// Restaurants a whole group is likely to enjoy.
    Group(commands::recommend::GroupArgs),

    /// Inspect the restaurant catalog.
    Catalog {
        #[command(subcommand)]
        action: commands::catalog_cmd::CatalogAction,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let common = &cli.common;
    match cli.command {
        Commands::Recommend(args) => commands::recommend::run_recommend(args, common).await?,
        Commands::Ask(args) => commands::ask::run_ask(args, common).await?,
        Commands::Analyze(args) => commands::ask::run_analyze(args, common)?,
        Commands::Weather(args) => commands::recommend::run_weather(args, common)?,
        Commands::Budget(args) => commands::recommend::run_budget(args, common)?,
        Commands::Now(args) => commands::recommend::run_now(args, common)?,
        Commands::Group(args) => commands::recommend::run_group(args, common).await?,
        Commands::Catalog { action } => commands::catalog_cmd::run(action, common)?,
    }

    Ok(())
}
