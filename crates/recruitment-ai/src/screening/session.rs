use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::features::FeatureVector;
use super::loader::{ClassifierCache, ClassifierStatus, ModelUnavailable};
use super::model::{Classifier, PredictionError};
use super::profile::{CandidateProfile, ProfileError};

/// Accept/reject decision shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    NotAccepted,
}

impl Verdict {
    /// Only an exact `1` is an acceptance; every other output, including `2`, `-1` or
    /// fractional values from a misbehaving model, is treated as a rejection.
    pub fn from_prediction(prediction: &[f64]) -> Result<Self, PredictionError> {
        let first = prediction.first().ok_or(PredictionError::EmptyOutput)?;
        Ok(if *first == 1.0 {
            Self::Accepted
        } else {
            Self::NotAccepted
        })
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::NotAccepted => "not_accepted",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::Accepted => "Candidate is likely to be accepted.",
            Self::NotAccepted => "Candidate is likely not to be accepted.",
        }
    }
}

/// Result of one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningOutcome {
    pub verdict: Verdict,
    pub features: FeatureVector,
    pub prediction: Vec<f64>,
    pub evaluated_at: DateTime<Utc>,
}

/// Error raised while handling a submission.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    ModelUnavailable(#[from] ModelUnavailable),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

/// Orchestrates vector assembly, classifier invocation, and verdict mapping.
#[derive(Debug)]
pub struct InferenceSession {
    cache: Arc<ClassifierCache>,
}

impl InferenceSession {
    pub fn new(cache: Arc<ClassifierCache>) -> Self {
        Self { cache }
    }

    pub fn load_classifier(&self) -> Result<Arc<dyn Classifier>, ModelUnavailable> {
        self.cache.load()
    }

    pub fn classifier_status(&self) -> ClassifierStatus {
        self.cache.status()
    }

    pub fn model_source(&self) -> &str {
        self.cache.source()
    }

    /// Score one candidate. Halts before assembling a vector when the model is unavailable.
    pub fn submit(&self, profile: &CandidateProfile) -> Result<ScreeningOutcome, SessionError> {
        let classifier = self.cache.load()?;
        profile.validate()?;

        let started = Instant::now();
        let features = FeatureVector::from_profile(profile);
        let prediction = classifier.predict(&features)?;
        let verdict = Verdict::from_prediction(&prediction)?;

        if prediction.len() != 1 || !(prediction[0] == 0.0 || prediction[0] == 1.0) {
            warn!(?prediction, "classifier returned an unexpected label");
        }
        info!(
            verdict = verdict.label(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "candidate scored"
        );

        Ok(ScreeningOutcome {
            verdict,
            features,
            prediction,
            evaluated_at: Utc::now(),
        })
    }
}
