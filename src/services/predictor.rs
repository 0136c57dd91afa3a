use chrono::NaiveDate;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{FeatureRow, FeatureVector, Match, PredictionRow};
use crate::services::classifier::{Classifier, LogisticRegression, ModelConfig};
use crate::services::feature_assembler::build_feature_table;
use crate::utils::{calculate_prediction_accuracy, confidence, parse_day_first_date};

/// Inclusive date range used for backtesting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse a window from two day-first date strings
    pub fn parse(start: &str, end: &str) -> PipelineResult<Self> {
        let parse = |s: &str| {
            parse_day_first_date(s).ok_or_else(|| PipelineError::InvalidDateArgument(s.to_string()))
        };
        Ok(Self::new(parse(start)?, parse(end)?))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionMode {
    /// Scoring fixtures that have not been played yet
    Future,
    /// Scoring played matches inside the date window
    Backtest,
}

#[derive(Debug, Clone)]
pub struct PredictionReport {
    pub mode: PredictionMode,
    pub training_rows: usize,
    pub rows: Vec<PredictionRow>,
    /// Only set for backtests
    pub accuracy: Option<f64>,
}

pub struct PredictionEngine<C: Classifier> {
    classifier: C,
}

impl PredictionEngine<LogisticRegression> {
    pub fn with_config(config: ModelConfig) -> Self {
        Self::new(LogisticRegression::new(config))
    }
}

impl<C: Classifier> PredictionEngine<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Train on resolved rows and score either the future fixtures or, if
    /// there are none, the resolved rows inside `window`.
    ///
    /// Returns `Ok(None)` when no row qualifies for scoring.
    pub fn run(
        &mut self,
        rows: &[FeatureRow],
        window: DateWindow,
        holdout: bool,
    ) -> PipelineResult<Option<PredictionReport>> {
        let has_future = rows.iter().any(|r| !r.outcome.is_resolved());
        let mode = if has_future {
            PredictionMode::Future
        } else {
            PredictionMode::Backtest
        };

        // Rows missing any feature are dropped from both sides
        let complete: Vec<(&FeatureRow, FeatureVector)> = rows
            .iter()
            .filter_map(|r| r.feature_vector().map(|v| (r, v)))
            .collect();
        let dropped = rows.len() - complete.len();
        if dropped > 0 {
            tracing::warn!("Dropping {} rows with missing features", dropped);
        }

        let in_holdout = |r: &FeatureRow| {
            holdout && mode == PredictionMode::Backtest && window.contains(r.date)
        };

        let (train_x, train_y): (Vec<FeatureVector>, Vec<bool>) = complete
            .iter()
            .filter(|(r, _)| !in_holdout(*r))
            .filter_map(|(r, v)| r.outcome.target().map(|t| (*v, t)))
            .unzip();

        if train_x.is_empty() {
            return Err(PipelineError::EmptyTrainingSet);
        }

        tracing::info!("Training on {} past games", train_x.len());
        self.classifier.fit(&train_x, &train_y)?;

        let targets: Vec<&(&FeatureRow, FeatureVector)> = match mode {
            PredictionMode::Future => complete
                .iter()
                .filter(|(r, _)| !r.outcome.is_resolved())
                .collect(),
            PredictionMode::Backtest => complete
                .iter()
                .filter(|(r, _)| window.contains(r.date))
                .collect(),
        };

        match mode {
            PredictionMode::Future => {
                tracing::info!("Predicting {} future games", targets.len())
            }
            PredictionMode::Backtest => tracing::info!(
                "No future games, backtesting {} games between {} and {}",
                targets.len(),
                window.start,
                window.end
            ),
        }

        let vectors: Vec<FeatureVector> = targets.iter().map(|(_, v)| *v).collect();
        let probs = self.classifier.predict_proba(&vectors);
        let preds = self.classifier.predict(&vectors);

        let scored: Vec<PredictionRow> = targets
            .iter()
            .zip(probs.into_iter().zip(preds))
            .map(|((row, _), (p, predicted))| {
                let correct = match mode {
                    PredictionMode::Future => None,
                    PredictionMode::Backtest => row.outcome.target().map(|t| t == predicted),
                };
                PredictionRow {
                    date: row.date,
                    home_team: row.home_team.clone(),
                    away_team: row.away_team.clone(),
                    winner: row.winner.clone(),
                    home_win_probability: p,
                    predicted_home_win: predicted,
                    correct,
                    predicted_winner: if p > 0.5 {
                        row.home_team.clone()
                    } else {
                        row.away_team.clone()
                    },
                    confidence: confidence(p),
                }
            })
            .collect();

        let accuracy = match mode {
            PredictionMode::Future => None,
            PredictionMode::Backtest => {
                let acc = calculate_prediction_accuracy(&scored);
                tracing::info!("Backtest accuracy: {:.2}% over {} games", acc * 100.0, scored.len());
                Some(acc)
            }
        };

        if scored.is_empty() {
            tracing::warn!("No matches qualified for scoring");
            return Ok(None);
        }

        Ok(Some(PredictionReport {
            mode,
            training_rows: train_x.len(),
            rows: scored,
            accuracy,
        }))
    }
}

/// Featurize a date-sorted match log and score it.
///
/// `start_date` and `end_date` are day-first strings bounding the backtest
/// window; they are ignored when the log contains unplayed fixtures.
pub fn backtest_model(
    matches: &[Match],
    start_date: &str,
    end_date: &str,
    holdout: bool,
    config: ModelConfig,
) -> PipelineResult<Option<PredictionReport>> {
    let window = DateWindow::parse(start_date, end_date)?;
    let table = build_feature_table(matches);

    let mut engine = PredictionEngine::<LogisticRegression>::with_config(config);
    engine.run(&table.rows, window, holdout)
}
