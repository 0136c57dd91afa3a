use anyhow::{Context, Result};

use crate::data::{load_match_log, write_table, ExportFormat};
use crate::models::PredictionRow;
use crate::services::{backtest_model, build_feature_table, ModelConfig, PredictionMode};
use crate::utils::format_day_first;

pub fn predict(
    input: &str,
    output: &str,
    format: ExportFormat,
    start: &str,
    end: &str,
    holdout: bool,
) -> Result<()> {
    let matches = load_match_log(input).with_context(|| format!("reading match log {}", input))?;

    println!("🏉 Building features from {} matches...", matches.len());

    let Some(report) = backtest_model(&matches, start, end, holdout, ModelConfig::default())? else {
        println!("📭 No matches to score: no future fixtures and nothing played between {} and {}", start, end);
        return Ok(());
    };

    match report.mode {
        PredictionMode::Future => println!(
            "🔮 Predicted {} upcoming matches (trained on {} games)",
            report.rows.len(),
            report.training_rows
        ),
        PredictionMode::Backtest => println!(
            "📊 Backtest {} → {}: accuracy {:.2}% over {} games (trained on {} games)",
            start,
            end,
            report.accuracy.unwrap_or(0.0) * 100.0,
            report.rows.len(),
            report.training_rows
        ),
    }

    print_predictions(&report.rows);

    write_table(output, &report.rows, format)?;
    println!("\n✅ Saved to '{}'", output);

    Ok(())
}

fn print_predictions(rows: &[PredictionRow]) {
    println!(
        "\n{:<12} {:<22} {:<22} {:<22} {:>10} {:<22} {:<8}",
        "Date", "Home", "Away", "Predicted winner", "Confidence", "Winner", "Outcome"
    );
    for row in rows {
        let outcome = match row.correct {
            Some(true) => "Correct",
            Some(false) => "WRONG",
            None => "-",
        };
        println!(
            "{:<12} {:<22} {:<22} {:<22} {:>9.1}% {:<22} {:<8}",
            format_day_first(row.date),
            row.home_team,
            row.away_team,
            row.predicted_winner,
            row.confidence * 100.0,
            row.winner.as_deref().unwrap_or("TBD"),
            outcome
        );
    }
}

pub fn export_features(input: &str, output: &str, format: ExportFormat) -> Result<()> {
    let matches = load_match_log(input).with_context(|| format!("reading match log {}", input))?;
    let table = build_feature_table(&matches);

    let complete = table.rows.iter().filter(|r| r.feature_vector().is_some()).count();
    println!(
        "🧮 {} feature rows ({} complete, {} with missing features)",
        table.rows.len(),
        complete,
        table.rows.len() - complete
    );

    write_table(output, &table.rows, format)?;
    println!("✅ Saved to '{}'", output);
    Ok(())
}

pub fn query_team(input: &str, team_name: &str) -> Result<()> {
    let matches = load_match_log(input).with_context(|| format!("reading match log {}", input))?;
    let table = build_feature_table(&matches);

    let timeline = table.timeline.team(team_name);
    if timeline.is_empty() {
        println!("❌ No matches found for '{}'", team_name);
        println!("\n💡 Available teams:");
        for team in table.timeline.teams() {
            println!("   • {}", team);
        }
        return Ok(());
    }

    println!("📊 {} ({} matches)\n", team_name, timeline.len());
    println!(
        "{:<12} {:<3} {:<22} {:>6} {:>6} {:>5} {:>7} {:>9}",
        "Date", "", "Opponent", "Pts", "Diff", "Rest", "Form", "Form diff"
    );
    for entry in timeline {
        println!(
            "{:<12} {:<3} {:<22} {:>6.1} {:>+6.0} {:>5.0} {:>7.2} {:>+9.2}",
            format_day_first(entry.date),
            if entry.is_home { "vs" } else { "at" },
            entry.opponent,
            entry.game_points,
            entry.score_diff,
            entry.rest_days,
            entry.form_points,
            entry.form_score_diff
        );
    }

    Ok(())
}

pub fn show_players(input: &str, top: usize, min_games: f64) -> Result<()> {
    let matches = load_match_log(input).with_context(|| format!("reading match log {}", input))?;
    let table = build_feature_table(&matches);

    let ranked = table.ledger.ranked(min_games);
    if ranked.is_empty() {
        println!("📭 No players with at least {:.1} weighted games", min_games);
        return Ok(());
    }

    println!(
        "🏆 Top {} of {} tracked players (min {:.1} weighted games):\n",
        top.min(ranked.len()),
        table.ledger.len(),
        min_games
    );
    for (i, (name, strength, entry)) in ranked.iter().take(top).enumerate() {
        println!(
            "{:>3}. {:<28} strength {:.3}  ({:.2} pts / {:.2} games)",
            i + 1,
            name,
            strength,
            entry.weighted_sum_points,
            entry.weighted_games
        );
    }

    Ok(())
}
