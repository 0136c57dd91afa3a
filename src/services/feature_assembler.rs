use crate::models::{FeatureRow, Match, SideStrengths, TeamTimelineEntry};
use crate::services::player_strength::{estimate_strengths, PlayerLedger};
use crate::services::team_timeline::TeamTimeline;

/// Output of one featurization run
pub struct FeatureTable {
    pub rows: Vec<FeatureRow>,
    pub timeline: TeamTimeline,
    pub ledger: PlayerLedger,
}

/// Run the full chronological pass over a date-sorted match log
pub fn build_feature_table(matches: &[Match]) -> FeatureTable {
    let timeline = TeamTimeline::build(matches);
    let (strengths, ledger) = estimate_strengths(matches, PlayerLedger::new());
    let rows = assemble(matches, &timeline, &strengths);

    tracing::info!(
        "Assembled {} feature rows ({} teams, {} players)",
        rows.len(),
        timeline.teams().len(),
        ledger.len()
    );

    FeatureTable {
        rows,
        timeline,
        ledger,
    }
}

/// Join team form and lineup strengths onto each match
pub fn assemble(
    matches: &[Match],
    timeline: &TeamTimeline,
    strengths: &[SideStrengths],
) -> Vec<FeatureRow> {
    matches
        .iter()
        .zip(strengths)
        .map(|(m, s)| {
            let home = timeline.lookup(m.date, &m.home_team);
            let away = timeline.lookup(m.date, &m.away_team);

            let h_rest_days = home.map(|e| e.rest_days);
            let a_rest_days = away.map(|e| e.rest_days);
            let h_form_points = home.map(|e| e.form_points);
            let a_form_points = away.map(|e| e.form_points);

            FeatureRow {
                date: m.date,
                home_team: m.home_team.clone(),
                away_team: m.away_team.clone(),
                winner: m.winner_label(),
                outcome: m.outcome,
                target: m.outcome.target().map(u8::from),
                h_lineup_strength: s.home,
                a_lineup_strength: s.away,
                strength_diff: s.home - s.away,
                h_rest_days,
                a_rest_days,
                rest_diff: diff(h_rest_days, a_rest_days),
                h_form_points,
                a_form_points,
                form_point_diff: diff(h_form_points, a_form_points),
                h_form_diff: home.map(form_diff),
                a_form_diff: away.map(form_diff),
            }
        })
        .collect()
}

fn form_diff(entry: &TeamTimelineEntry) -> f64 {
    entry.form_score_diff
}

fn diff(home: Option<f64>, away: Option<f64>) -> Option<f64> {
    Some(home? - away?)
}
