use serde::Deserialize;

use super::{check_feature_count, ArtifactError, Classifier, PredictionError};
use crate::screening::features::FeatureVector;

fn default_threshold() -> f64 {
    0.5
}

/// Logistic regression over the raw feature vector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogisticModel {
    pub n_features: usize,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticModel {
    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        check_feature_count(self.n_features)?;
        if self.coefficients.len() != self.n_features {
            return Err(ArtifactError::CoefficientCount {
                expected: self.n_features,
                found: self.coefficients.len(),
            });
        }

        let finite = self
            .coefficients
            .iter()
            .chain([&self.intercept, &self.threshold])
            .all(|value| value.is_finite());
        if !finite {
            return Err(ArtifactError::NonFinite);
        }

        Ok(())
    }

    pub fn probability(&self, features: &FeatureVector) -> f64 {
        let z = self
            .coefficients
            .iter()
            .zip(features.as_slice())
            .fold(self.intercept, |acc, (weight, value)| acc + weight * value);
        1.0 / (1.0 + (-z).exp())
    }
}

impl Classifier for LogisticModel {
    fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>, PredictionError> {
        let probability = self.probability(features);
        if probability.is_nan() {
            return Err(PredictionError::Model(
                "logistic score is not a number".to_string(),
            ));
        }

        let label = if probability >= self.threshold { 1.0 } else { 0.0 };
        Ok(vec![label])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::features::FEATURE_COUNT;

    fn model(coefficients: Vec<f64>, intercept: f64) -> LogisticModel {
        LogisticModel {
            n_features: FEATURE_COUNT,
            coefficients,
            intercept,
            threshold: 0.5,
        }
    }

    #[test]
    fn thresholds_the_sigmoid() {
        let mut weights = vec![0.0; FEATURE_COUNT];
        weights[11] = 0.05;
        let model = model(weights, -5.0);

        let low = FeatureVector::from([0.0; FEATURE_COUNT]);
        let mut raw = [0.0; FEATURE_COUNT];
        raw[11] = 200.0;
        let high = FeatureVector::from(raw);

        assert_eq!(model.predict(&low).expect("predicts"), vec![0.0]);
        assert_eq!(model.predict(&high).expect("predicts"), vec![1.0]);
    }

    #[test]
    fn validation_catches_shape_and_value_errors() {
        let short = model(vec![0.0; 3], 0.0);
        assert!(matches!(
            short.validate(),
            Err(ArtifactError::CoefficientCount { found: 3, .. })
        ));

        let infinite = model(vec![f64::INFINITY; FEATURE_COUNT], 0.0);
        assert!(matches!(infinite.validate(), Err(ArtifactError::NonFinite)));
    }
}
