use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{Match, Outcome};
use crate::utils::{parse_day_first_date, parse_lineup};

const DEFAULT_MATCH_LOG: &str = "Top14_Raw_Scrape.csv";
const DEFAULT_PREDICTIONS: &str = "final_predictions.csv";

pub fn match_log_path() -> String {
    env::var("MATCH_LOG_PATH").unwrap_or_else(|_| DEFAULT_MATCH_LOG.to_string())
}

pub fn predictions_path() -> String {
    env::var("PREDICTIONS_PATH").unwrap_or_else(|_| DEFAULT_PREDICTIONS.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// A match log row as written by the crawler. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawMatchRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Home_Team")]
    home_team: String,
    #[serde(rename = "Away_Team")]
    away_team: String,
    #[serde(rename = "Home_Score", default)]
    home_score: Option<String>,
    #[serde(rename = "Away_Score", default)]
    away_score: Option<String>,
    #[serde(rename = "Winner", default)]
    winner: Option<String>,
    #[serde(rename = "Home_Lineup", default)]
    home_lineup: Option<String>,
    #[serde(rename = "Away_Lineup", default)]
    away_lineup: Option<String>,
}

pub fn load_match_log(path: impl AsRef<Path>) -> PipelineResult<Vec<Match>> {
    let file = File::open(path.as_ref())?;
    let matches = read_match_log(file)?;
    tracing::info!(
        "Loaded {} matches from {}",
        matches.len(),
        path.as_ref().display()
    );
    Ok(matches)
}

/// Read and validate a match log, returning matches sorted by date (ties keep log order)
pub fn read_match_log<R: Read>(reader: R) -> PipelineResult<Vec<Match>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut matches = Vec::new();
    for (i, record) in rdr.deserialize::<RawMatchRecord>().enumerate() {
        let row = i + 1;
        let raw = record?;

        let date = parse_day_first_date(&raw.date).ok_or_else(|| PipelineError::InvalidDate {
            row,
            value: raw.date.clone(),
        })?;

        let outcome = parse_outcome(raw.winner.as_deref(), &raw.home_team, &raw.away_team, row);

        matches.push(Match {
            date,
            home_score: parse_score(raw.home_score.as_deref()),
            away_score: parse_score(raw.away_score.as_deref()),
            outcome,
            home_lineup: parse_lineup(raw.home_lineup.as_deref()),
            away_lineup: parse_lineup(raw.away_lineup.as_deref()),
            home_team: raw.home_team,
            away_team: raw.away_team,
        });
    }

    // sort_by_key is stable
    matches.sort_by_key(|m| m.date);
    Ok(matches)
}

fn parse_outcome(winner: Option<&str>, home_team: &str, away_team: &str, row: usize) -> Outcome {
    let winner = match winner.map(str::trim) {
        Some(w) if !w.is_empty() => w,
        _ => return Outcome::Unresolved,
    };

    if winner == home_team {
        Outcome::HomeWin
    } else if winner == away_team {
        Outcome::AwayWin
    } else if winner.eq_ignore_ascii_case("draw") {
        Outcome::Draw
    } else {
        tracing::warn!(
            "Row {}: winner '{}' is neither '{}' nor '{}', treating as unplayed",
            row,
            winner,
            home_team,
            away_team
        );
        Outcome::Unresolved
    }
}

/// Scores may be blank for unplayed fixtures or written as floats ("25.0")
fn parse_score(raw: Option<&str>) -> i32 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map(|v| v.round() as i32)
        .unwrap_or(0)
}

pub fn write_table<T: Serialize>(
    path: impl AsRef<Path>,
    rows: &[T],
    format: ExportFormat,
) -> PipelineResult<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    match format {
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_path(path.as_ref())?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        ExportFormat::Json => {
            let writer = BufWriter::new(File::create(path.as_ref())?);
            serde_json::to_writer_pretty(writer, rows)?;
        }
    }

    tracing::info!("Wrote {} rows to {}", rows.len(), path.as_ref().display());
    Ok(())
}
