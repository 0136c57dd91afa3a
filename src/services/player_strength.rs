//! Decayed, Bayesian-smoothed player strength ledger.
//!
//! The ledger is walked forward once over the match log. For every match the
//! lineup strengths are read first, then (for played matches only) each
//! player's record is decayed and updated with the result.

use statrs::statistics::Statistics;
use std::collections::HashMap;

use crate::models::{Match, PlayerLedgerEntry, SideStrengths};

/// Prior strength of an unseen player or unknown lineup
pub const GLOBAL_MEAN: f64 = 0.5;
/// Pseudo-count weighting the prior
pub const SMOOTHING_C: f64 = 5.0;
/// Applied to a player's record before each update
pub const DECAY: f64 = 0.99;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerLedger {
    players: HashMap<String, PlayerLedgerEntry>,
}

impl PlayerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player: &str) -> Option<&PlayerLedgerEntry> {
        self.players.get(player)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Bayesian average of a player's decayed record; `GLOBAL_MEAN` if unseen
    pub fn smoothed(&self, player: &str) -> f64 {
        let entry = self.players.get(player).copied().unwrap_or_default();
        smoothed_strength(&entry)
    }

    /// Mean smoothed strength of a lineup; `GLOBAL_MEAN` if the lineup is empty
    pub fn lineup_strength(&self, lineup: &[String]) -> f64 {
        if lineup.is_empty() {
            return GLOBAL_MEAN;
        }
        lineup.iter().map(|p| self.smoothed(p)).mean()
    }

    /// Decay then credit every player in the lineup with `points`
    pub fn record(&mut self, lineup: &[String], points: f64) {
        for player in lineup {
            let entry = self.players.entry(player.clone()).or_default();
            entry.weighted_sum_points *= DECAY;
            entry.weighted_games *= DECAY;

            entry.weighted_sum_points += points;
            entry.weighted_games += 1.0;
        }
    }

    /// Players with at least `min_games` weighted games, strongest first
    pub fn ranked(&self, min_games: f64) -> Vec<(&str, f64, &PlayerLedgerEntry)> {
        let mut ranked: Vec<_> = self
            .players
            .iter()
            .filter(|(_, e)| e.weighted_games >= min_games)
            .map(|(name, e)| (name.as_str(), smoothed_strength(e), e))
            .collect();

        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        ranked
    }
}

fn smoothed_strength(entry: &PlayerLedgerEntry) -> f64 {
    (entry.weighted_sum_points + SMOOTHING_C * GLOBAL_MEAN) / (entry.weighted_games + SMOOTHING_C)
}

/// Pre-match strengths for every match, in input order.
///
/// `matches` must be sorted by date. The ledger is taken by value and handed
/// back so the caller owns its lifetime.
pub fn estimate_strengths(
    matches: &[Match],
    mut ledger: PlayerLedger,
) -> (Vec<SideStrengths>, PlayerLedger) {
    let mut strengths = Vec::with_capacity(matches.len());

    for m in matches {
        strengths.push(SideStrengths {
            home: ledger.lineup_strength(&m.home_lineup),
            away: ledger.lineup_strength(&m.away_lineup),
        });

        // Unplayed fixtures are read but never written
        let Some((home_points, away_points)) = m.outcome.points() else {
            continue;
        };

        ledger.record(&m.home_lineup, home_points);
        ledger.record(&m.away_lineup, away_points);
    }

    tracing::debug!(
        "Player strength pass over {} matches, {} players tracked",
        matches.len(),
        ledger.len()
    );

    (strengths, ledger)
}
