mod cli;
mod data;
mod error;
mod models;
mod services;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::data::{match_log_path, predictions_path, ExportFormat};

#[derive(Parser)]
#[command(name = "matchform")]
#[command(about = "Leakage-free match features and home-win predictions from a match log")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict future fixtures, or backtest a date window if none remain
    Predict {
        /// Backtest window start (dd/mm/yyyy)
        #[arg(short, long)]
        start: String,
        /// Backtest window end (dd/mm/yyyy)
        #[arg(short, long)]
        end: String,
        /// Match log CSV [env: MATCH_LOG_PATH]
        #[arg(short, long)]
        input: Option<String>,
        /// Prediction table path [env: PREDICTIONS_PATH]
        #[arg(short, long)]
        output: Option<String>,
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,
        /// Exclude the backtest window from training
        #[arg(long)]
        holdout: bool,
    },
    /// Export the full feature table
    Features {
        #[arg(short, long)]
        input: Option<String>,
        #[arg(short, long, default_value = "features.csv")]
        output: String,
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,
    },
    /// Show a team's timeline with form and rest days
    Team {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Show the strongest players in the final ledger
    Players {
        #[arg(short, long, default_value = "20")]
        top: usize,
        #[arg(short, long, default_value = "3.0")]
        min_games: f64,
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    // Load environment variables (RUST_LOG may come from .env)
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Predict {
            start,
            end,
            input,
            output,
            format,
            holdout,
        } => {
            let input = input.unwrap_or_else(match_log_path);
            let output = output.unwrap_or_else(predictions_path);
            tracing::info!("Running predictions from {} ({} to {})", input, start, end);
            cli::predict(&input, &output, format, &start, &end, holdout)?;
        }
        Commands::Features {
            input,
            output,
            format,
        } => {
            let input = input.unwrap_or_else(match_log_path);
            tracing::info!("Exporting features from {}", input);
            cli::export_features(&input, &output, format)?;
        }
        Commands::Team { name, input } => {
            let input = input.unwrap_or_else(match_log_path);
            tracing::info!("Querying team: {}", name);
            cli::query_team(&input, &name)?;
        }
        Commands::Players {
            top,
            min_games,
            input,
        } => {
            let input = input.unwrap_or_else(match_log_path);
            cli::show_players(&input, top, min_games)?;
        }
    }

    Ok(())
}
