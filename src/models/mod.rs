use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::utils::format_day_first;

/// Number of features in the canonical feature vector
pub const FEATURE_COUNT: usize = 11;

/// Canonical feature names, in the column order the classifier sees
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "H_Lineup_Strength",
    "A_Lineup_Strength",
    "Strength_Diff",
    "H_Rest_Days",
    "A_Rest_Days",
    "Rest_Diff",
    "H_Form_Points",
    "A_Form_Points",
    "Form_Point_Diff",
    "H_Form_Diff",
    "A_Form_Diff",
];

pub type FeatureVector = [f64; FEATURE_COUNT];

/// Result of a match, decided once when the log is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
    /// Not yet played (future fixture)
    Unresolved,
}

impl Outcome {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Outcome::Unresolved)
    }

    /// Ledger points for (home side, away side)
    pub fn points(&self) -> Option<(f64, f64)> {
        match self {
            Outcome::HomeWin => Some((1.0, 0.0)),
            Outcome::Draw => Some((0.5, 0.5)),
            Outcome::AwayWin => Some((0.0, 1.0)),
            Outcome::Unresolved => None,
        }
    }

    /// Binary classification target: true iff the home team won
    pub fn target(&self) -> Option<bool> {
        match self {
            Outcome::HomeWin => Some(true),
            Outcome::AwayWin | Outcome::Draw => Some(false),
            Outcome::Unresolved => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Match {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i32,
    pub away_score: i32,
    pub outcome: Outcome,
    /// Empty when the lineup is unknown
    pub home_lineup: Vec<String>,
    pub away_lineup: Vec<String>,
}

impl Match {
    /// The `Winner` column as it appears in the match log
    pub fn winner_label(&self) -> Option<String> {
        match self.outcome {
            Outcome::HomeWin => Some(self.home_team.clone()),
            Outcome::AwayWin => Some(self.away_team.clone()),
            Outcome::Draw => Some("Draw".to_string()),
            Outcome::Unresolved => None,
        }
    }
}

/// One team's view of one match, with form computed from strictly earlier matches
#[derive(Debug, Clone, PartialEq)]
pub struct TeamTimelineEntry {
    pub date: NaiveDate,
    pub team: String,
    pub opponent: String,
    pub is_home: bool,
    pub game_points: f64,
    pub score_diff: f64,
    pub rest_days: f64,
    pub form_points: f64,
    pub form_score_diff: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerLedgerEntry {
    pub weighted_sum_points: f64,
    pub weighted_games: f64,
}

/// Pre-match lineup strengths for one match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideStrengths {
    pub home: f64,
    pub away: f64,
}

/// A match row with every joined team/player feature
#[derive(Debug, Clone, Serialize)]
pub struct FeatureRow {
    #[serde(rename = "Date", serialize_with = "serialize_date")]
    pub date: NaiveDate,
    #[serde(rename = "Home_Team")]
    pub home_team: String,
    #[serde(rename = "Away_Team")]
    pub away_team: String,
    #[serde(rename = "Winner")]
    pub winner: Option<String>,
    #[serde(skip)]
    pub outcome: Outcome,
    #[serde(rename = "Target")]
    pub target: Option<u8>,
    #[serde(rename = "H_Lineup_Strength")]
    pub h_lineup_strength: f64,
    #[serde(rename = "A_Lineup_Strength")]
    pub a_lineup_strength: f64,
    #[serde(rename = "Strength_Diff")]
    pub strength_diff: f64,
    #[serde(rename = "H_Rest_Days")]
    pub h_rest_days: Option<f64>,
    #[serde(rename = "A_Rest_Days")]
    pub a_rest_days: Option<f64>,
    #[serde(rename = "Rest_Diff")]
    pub rest_diff: Option<f64>,
    #[serde(rename = "H_Form_Points")]
    pub h_form_points: Option<f64>,
    #[serde(rename = "A_Form_Points")]
    pub a_form_points: Option<f64>,
    #[serde(rename = "Form_Point_Diff")]
    pub form_point_diff: Option<f64>,
    #[serde(rename = "H_Form_Diff")]
    pub h_form_diff: Option<f64>,
    #[serde(rename = "A_Form_Diff")]
    pub a_form_diff: Option<f64>,
}

impl FeatureRow {
    /// Feature vector in `FEATURE_NAMES` order, or `None` if any feature is missing
    pub fn feature_vector(&self) -> Option<FeatureVector> {
        Some([
            self.h_lineup_strength,
            self.a_lineup_strength,
            self.strength_diff,
            self.h_rest_days?,
            self.a_rest_days?,
            self.rest_diff?,
            self.h_form_points?,
            self.a_form_points?,
            self.form_point_diff?,
            self.h_form_diff?,
            self.a_form_diff?,
        ])
    }
}

/// One scored match in the output prediction table
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRow {
    #[serde(rename = "Date", serialize_with = "serialize_date")]
    pub date: NaiveDate,
    #[serde(rename = "Home_Team")]
    pub home_team: String,
    #[serde(rename = "Away_Team")]
    pub away_team: String,
    #[serde(rename = "Winner")]
    pub winner: Option<String>,
    #[serde(rename = "Home_Win_Probability")]
    pub home_win_probability: f64,
    #[serde(rename = "Predicted_Home_Win")]
    pub predicted_home_win: bool,
    /// `None` for future fixtures (no ground truth yet)
    #[serde(rename = "Correct")]
    pub correct: Option<bool>,
    #[serde(rename = "Predicted_Winner")]
    pub predicted_winner: String,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
}

fn serialize_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_day_first(*date))
}
