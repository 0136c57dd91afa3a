use nalgebra::{DMatrix, DVector};
use statrs::statistics::Statistics;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::services::player_strength::GLOBAL_MEAN;

/// Binary classifier used as an opaque fit/score capability
pub trait Classifier {
    fn fit(&mut self, features: &[FeatureVector], targets: &[bool]) -> PipelineResult<()>;

    /// Probability of the positive class (home win) per row
    fn predict_proba(&self, features: &[FeatureVector]) -> Vec<f64>;

    fn predict(&self, features: &[FeatureVector]) -> Vec<bool> {
        self.predict_proba(features)
            .into_iter()
            .map(|p| p > 0.5)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub learning_rate: f64,
    pub epochs: usize,
    pub l2: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            epochs: 2000,
            l2: 0.001,
        }
    }
}

/// L2-regularized logistic regression on standardized features
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    config: ModelConfig,
    means: DVector<f64>,
    scales: DVector<f64>,
    weights: DVector<f64>,
    bias: f64,
    fitted: bool,
}

impl LogisticRegression {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            means: DVector::zeros(FEATURE_COUNT),
            scales: DVector::from_element(FEATURE_COUNT, 1.0),
            weights: DVector::zeros(FEATURE_COUNT),
            bias: 0.0,
            fitted: false,
        }
    }

    fn design_matrix(&self, features: &[FeatureVector]) -> DMatrix<f64> {
        DMatrix::from_fn(features.len(), FEATURE_COUNT, |i, j| {
            (features[i][j] - self.means[j]) / self.scales[j]
        })
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, features: &[FeatureVector], targets: &[bool]) -> PipelineResult<()> {
        if features.len() != targets.len() {
            return Err(PipelineError::ShapeMismatch {
                features: features.len(),
                targets: targets.len(),
            });
        }
        if features.is_empty() {
            return Err(PipelineError::EmptyTrainingSet);
        }

        for j in 0..FEATURE_COUNT {
            let column: Vec<f64> = features.iter().map(|row| row[j]).collect();
            let mean = column.iter().mean();
            let std_dev = column.iter().population_std_dev();
            self.means[j] = mean;
            self.scales[j] = if std_dev.is_finite() && std_dev > 1e-12 {
                std_dev
            } else {
                1.0
            };
        }

        let x = self.design_matrix(features);
        let y = DVector::from_iterator(targets.len(), targets.iter().map(|&t| f64::from(u8::from(t))));
        let n = features.len() as f64;

        self.weights = DVector::zeros(FEATURE_COUNT);
        self.bias = 0.0;

        for _ in 0..self.config.epochs {
            let logits = &x * &self.weights;
            let errors = logits.map(|z| sigmoid(z + self.bias)) - &y;

            let grad_w = x.tr_mul(&errors) / n + &self.weights * self.config.l2;
            let grad_b = errors.sum() / n;

            self.weights -= grad_w * self.config.learning_rate;
            self.bias -= grad_b * self.config.learning_rate;
        }

        self.fitted = true;
        tracing::debug!(
            "Fitted logistic regression on {} rows, bias {:.4}",
            features.len(),
            self.bias
        );
        for (name, w) in FEATURE_NAMES.iter().zip(self.weights.iter()) {
            tracing::debug!("  {:<18} {:+.4}", name, w);
        }
        Ok(())
    }

    fn predict_proba(&self, features: &[FeatureVector]) -> Vec<f64> {
        if !self.fitted {
            return vec![GLOBAL_MEAN; features.len()];
        }
        if features.is_empty() {
            return Vec::new();
        }

        let logits = self.design_matrix(features) * &self.weights;
        logits.iter().map(|z| sigmoid(z + self.bias)).collect()
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(strength_diff: f64, form_diff: f64) -> FeatureVector {
        let mut v = [0.0; FEATURE_COUNT];
        v[0] = 0.5 + strength_diff / 2.0;
        v[1] = 0.5 - strength_diff / 2.0;
        v[2] = strength_diff;
        v[3] = 7.0;
        v[4] = 7.0;
        v[8] = form_diff;
        v
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_fit_empty_is_an_error() {
        let mut model = LogisticRegression::default();
        assert!(matches!(
            model.fit(&[], &[]),
            Err(PipelineError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn test_fit_shape_mismatch() {
        let mut model = LogisticRegression::default();
        let result = model.fit(&[row(0.1, 0.0)], &[true, false]);
        assert!(matches!(
            result,
            Err(PipelineError::ShapeMismatch { features: 1, targets: 2 })
        ));
    }

    #[test]
    fn test_unfitted_model_predicts_prior() {
        let model = LogisticRegression::default();
        assert_eq!(model.predict_proba(&[row(0.3, 0.2)]), vec![GLOBAL_MEAN]);
    }

    #[test]
    fn test_learns_separable_signal() {
        let mut features = Vec::new();
        let mut targets = Vec::new();
        for i in 0..40 {
            let d = (i as f64 - 19.5) / 20.0;
            features.push(row(d, d * 0.5));
            targets.push(d > 0.0);
        }

        let mut model = LogisticRegression::default();
        model.fit(&features, &targets).unwrap();

        let probs = model.predict_proba(&[row(0.8, 0.4), row(-0.8, -0.4)]);
        assert!(probs[0] > 0.8);
        assert!(probs[1] < 0.2);
        assert_eq!(model.predict(&[row(0.8, 0.4), row(-0.8, -0.4)]), vec![true, false]);

        let predicted = model.predict(&features);
        let hits = predicted.iter().zip(&targets).filter(|(p, t)| p == t).count();
        let accuracy = hits as f64 / features.len() as f64;
        assert!(accuracy > 0.9);
    }

    #[test]
    fn test_probabilities_are_in_unit_interval() {
        let features = vec![row(0.2, 0.1), row(-0.1, 0.3), row(0.05, -0.2)];
        let mut model = LogisticRegression::default();
        model.fit(&features, &[true, false, true]).unwrap();

        for p in model.predict_proba(&features) {
            assert!((0.0..=1.0).contains(&p));
        }
    }
}
