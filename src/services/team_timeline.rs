//! Per-team match timelines with rolling form and rest days.
//!
//! Every match is split into a home view and an away view. Form and rest
//! are computed from the team's strictly earlier matches only.

use chrono::NaiveDate;
use statrs::statistics::Statistics;
use std::collections::{HashMap, VecDeque};

use crate::models::{Match, TeamTimelineEntry};
use crate::utils::days_between;

/// Number of prior matches averaged into form
pub const FORM_WINDOW: usize = 5;
/// Rest assumed before a team's first match
pub const DEFAULT_REST_DAYS: f64 = 30.0;

pub struct TeamTimeline {
    by_team: HashMap<String, Vec<TeamTimelineEntry>>,
    /// (date, team) -> index into that team's timeline
    index: HashMap<(NaiveDate, String), usize>,
}

impl TeamTimeline {
    /// Build timelines from matches already sorted by date
    pub fn build(matches: &[Match]) -> Self {
        let mut raw: HashMap<String, Vec<TeamTimelineEntry>> = HashMap::new();

        for m in matches {
            raw.entry(m.home_team.clone())
                .or_default()
                .push(team_view(m, true));
            raw.entry(m.away_team.clone())
                .or_default()
                .push(team_view(m, false));
        }

        let mut index = HashMap::new();
        for (team, entries) in raw.iter_mut() {
            apply_rolling_form(entries);
            for (i, entry) in entries.iter().enumerate() {
                // A team playing twice on one day keeps the first entry
                index.entry((entry.date, team.clone())).or_insert(i);
            }
        }

        tracing::debug!("Built timelines for {} teams", raw.len());

        Self { by_team: raw, index }
    }

    /// Entry for `team` on `date`, if the team played that day
    pub fn lookup(&self, date: NaiveDate, team: &str) -> Option<&TeamTimelineEntry> {
        let i = *self.index.get(&(date, team.to_string()))?;
        self.by_team.get(team).and_then(|entries| entries.get(i))
    }

    /// Chronological timeline for one team (empty if unknown)
    pub fn team(&self, team: &str) -> &[TeamTimelineEntry] {
        self.by_team.get(team).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Team names, sorted
    pub fn teams(&self) -> Vec<&str> {
        let mut teams: Vec<&str> = self.by_team.keys().map(String::as_str).collect();
        teams.sort_unstable();
        teams
    }
}

fn team_view(m: &Match, is_home: bool) -> TeamTimelineEntry {
    let (team, opponent, score, opp_score) = if is_home {
        (&m.home_team, &m.away_team, m.home_score, m.away_score)
    } else {
        (&m.away_team, &m.home_team, m.away_score, m.home_score)
    };

    let game_points = match score.cmp(&opp_score) {
        std::cmp::Ordering::Greater => 1.0,
        std::cmp::Ordering::Equal => 0.5,
        std::cmp::Ordering::Less => 0.0,
    };

    TeamTimelineEntry {
        date: m.date,
        team: team.clone(),
        opponent: opponent.clone(),
        is_home,
        game_points,
        score_diff: (score - opp_score) as f64,
        rest_days: DEFAULT_REST_DAYS,
        form_points: 0.0,
        form_score_diff: 0.0,
    }
}

/// Fill rest days and trailing-window form; entries must be in date order
fn apply_rolling_form(entries: &mut [TeamTimelineEntry]) {
    let mut window: VecDeque<(f64, f64)> = VecDeque::with_capacity(FORM_WINDOW);
    let mut last_date: Option<NaiveDate> = None;

    for entry in entries.iter_mut() {
        entry.rest_days = last_date
            .map(|prev| days_between(prev, entry.date) as f64)
            .unwrap_or(DEFAULT_REST_DAYS);

        if window.is_empty() {
            entry.form_points = 0.0;
            entry.form_score_diff = 0.0;
        } else {
            entry.form_points = window.iter().map(|(p, _)| *p).mean();
            entry.form_score_diff = window.iter().map(|(_, d)| *d).mean();
        }

        if window.len() == FORM_WINDOW {
            window.pop_front();
        }
        window.push_back((entry.game_points, entry.score_diff));
        last_date = Some(entry.date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Outcome;

    fn date(d: u32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn game(date: NaiveDate, home: &str, away: &str, hs: i32, aws: i32) -> Match {
        let outcome = match hs.cmp(&aws) {
            std::cmp::Ordering::Greater => Outcome::HomeWin,
            std::cmp::Ordering::Less => Outcome::AwayWin,
            std::cmp::Ordering::Equal => Outcome::Draw,
        };
        Match {
            date,
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_score: hs,
            away_score: aws,
            outcome,
            home_lineup: Vec::new(),
            away_lineup: Vec::new(),
        }
    }

    #[test]
    fn test_first_match_has_default_rest_and_no_form() {
        let matches = vec![game(date(6, 9), "Toulouse", "Pau", 30, 10)];
        let timeline = TeamTimeline::build(&matches);

        for team in ["Toulouse", "Pau"] {
            let entry = timeline.lookup(date(6, 9), team).unwrap();
            assert_eq!(entry.rest_days, DEFAULT_REST_DAYS);
            assert_eq!(entry.form_points, 0.0);
            assert_eq!(entry.form_score_diff, 0.0);
        }
    }

    #[test]
    fn test_home_and_away_views_are_mirrored() {
        let matches = vec![game(date(6, 9), "Toulouse", "Pau", 30, 10)];
        let timeline = TeamTimeline::build(&matches);

        let home = timeline.lookup(date(6, 9), "Toulouse").unwrap();
        let away = timeline.lookup(date(6, 9), "Pau").unwrap();
        assert_eq!((home.game_points, home.score_diff), (1.0, 20.0));
        assert_eq!((away.game_points, away.score_diff), (0.0, -20.0));
        assert!(home.is_home && !away.is_home);
    }

    #[test]
    fn test_three_wins_then_fourth_match() {
        let matches = vec![
            game(date(6, 9), "X", "A", 20, 10),
            game(date(13, 9), "B", "X", 3, 9),
            game(date(20, 9), "X", "C", 15, 14),
            game(date(4, 10), "D", "X", 0, 0),
        ];
        let timeline = TeamTimeline::build(&matches);

        let fourth = timeline.lookup(date(4, 10), "X").unwrap();
        assert_eq!(fourth.form_points, 1.0);
        assert_eq!(fourth.rest_days, 14.0);
        assert!((fourth.form_score_diff - (10.0 + 6.0 + 1.0) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_covers_exactly_five_prior_matches() {
        // X: W, W, L, D, W, then match 6, then match 7 (a heavy loss)
        let matches = vec![
            game(date(1, 9), "X", "A", 10, 0),
            game(date(8, 9), "X", "B", 10, 5),
            game(date(15, 9), "X", "C", 0, 10),
            game(date(22, 9), "X", "D", 7, 7),
            game(date(29, 9), "X", "E", 3, 0),
            game(date(6, 10), "X", "F", 20, 0),
            game(date(13, 10), "X", "G", 0, 50),
        ];
        let timeline = TeamTimeline::build(&matches);

        let sixth = timeline.lookup(date(6, 10), "X").unwrap();
        assert!((sixth.form_points - 3.5 / 5.0).abs() < 1e-12);
        assert!((sixth.form_score_diff - (10.0 + 5.0 - 10.0 + 0.0 + 3.0) / 5.0).abs() < 1e-12);

        // Match 7 drops match 1 from the window
        let seventh = timeline.lookup(date(13, 10), "X").unwrap();
        assert!((seventh.form_points - 3.5 / 5.0).abs() < 1e-12);
        assert!((seventh.form_score_diff - (5.0 - 10.0 + 0.0 + 3.0 + 20.0) / 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_fewer_than_five_prior_matches_are_averaged() {
        let matches = vec![
            game(date(1, 9), "X", "A", 10, 0),
            game(date(8, 9), "X", "B", 0, 10),
            game(date(15, 9), "X", "C", 5, 5),
        ];
        let timeline = TeamTimeline::build(&matches);

        let third = timeline.lookup(date(15, 9), "X").unwrap();
        assert!((third.form_points - 0.5).abs() < 1e-12);
        assert_eq!(third.form_score_diff, 0.0);
        assert_eq!(third.rest_days, 7.0);
    }

    #[test]
    fn test_team_and_lookup_misses() {
        let matches = vec![game(date(6, 9), "Toulouse", "Pau", 30, 10)];
        let timeline = TeamTimeline::build(&matches);

        assert!(timeline.lookup(date(7, 9), "Toulouse").is_none());
        assert!(timeline.team("Bayonne").is_empty());
        assert_eq!(timeline.team("Pau").len(), 1);
        assert_eq!(timeline.teams(), vec!["Pau", "Toulouse"]);
    }
}
