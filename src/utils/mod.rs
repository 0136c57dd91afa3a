use chrono::NaiveDate;

use crate::models::PredictionRow;

const DAY_FIRST_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Calculate the difference between two dates in days
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

/// Parse a day-first date such as "06/10/2025"
pub fn parse_day_first_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DAY_FIRST_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Format a date day-first ("dd/mm/yyyy")
pub fn format_day_first(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Split a comma-separated lineup into trimmed player names, dropping empty tokens
pub fn parse_lineup(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Confidence in the predicted side: max(p, 1 - p)
pub fn confidence(home_win_probability: f64) -> f64 {
    home_win_probability.max(1.0 - home_win_probability)
}

/// Share of scored rows whose prediction matched the result; 0.0 for an empty set
pub fn calculate_prediction_accuracy(rows: &[PredictionRow]) -> f64 {
    let graded: Vec<bool> = rows.iter().filter_map(|r| r.correct).collect();
    if graded.is_empty() {
        return 0.0;
    }

    let correct = graded.iter().filter(|&&c| c).count();
    correct as f64 / graded.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(correct: Option<bool>) -> PredictionRow {
        PredictionRow {
            date: NaiveDate::from_ymd_opt(2025, 10, 6).unwrap(),
            home_team: "Toulon".to_string(),
            away_team: "Pau".to_string(),
            winner: None,
            home_win_probability: 0.6,
            predicted_home_win: true,
            correct,
            predicted_winner: "Toulon".to_string(),
            confidence: 0.6,
        }
    }

    #[test]
    fn test_parse_day_first_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap();
        assert_eq!(parse_day_first_date("06/10/2025"), Some(expected));
        assert_eq!(parse_day_first_date(" 06-10-2025 "), Some(expected));
        assert_eq!(parse_day_first_date("2025-10-06"), None);
        assert_eq!(parse_day_first_date(""), None);
    }

    #[test]
    fn test_format_day_first() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();
        assert_eq!(format_day_first(date), "30/11/2025");
    }

    #[test]
    fn test_days_between() {
        let a = NaiveDate::from_ymd_opt(2025, 9, 6).unwrap();
        let b = NaiveDate::from_ymd_opt(2025, 9, 13).unwrap();
        assert_eq!(days_between(a, b), 7);
    }

    #[test]
    fn test_parse_lineup() {
        assert_eq!(
            parse_lineup(Some("Antoine Dupont, Romain Ntamack,,  Thomas Ramos ")),
            vec!["Antoine Dupont", "Romain Ntamack", "Thomas Ramos"]
        );
        assert!(parse_lineup(Some("  ")).is_empty());
        assert!(parse_lineup(None).is_empty());
    }

    #[test]
    fn test_confidence() {
        assert!((confidence(0.7) - 0.7).abs() < 1e-12);
        assert!((confidence(0.2) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_of_empty_set_is_zero() {
        assert_eq!(calculate_prediction_accuracy(&[]), 0.0);
        assert_eq!(calculate_prediction_accuracy(&[row(None)]), 0.0);
    }

    #[test]
    fn test_accuracy() {
        let rows = vec![row(Some(true)), row(Some(false)), row(Some(true)), row(Some(true))];
        assert!((calculate_prediction_accuracy(&rows) - 0.75).abs() < 1e-12);
    }
}
