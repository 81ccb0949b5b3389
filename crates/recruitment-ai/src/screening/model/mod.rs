//! Classifier seam and the serialized model formats this crate can load.
//!
//! The rest of the crate only sees [`Classifier`]; the artifact formats live behind
//! [`ModelArtifact`] so a new format never touches the session or the HTTP surface.

mod linear;
mod tree;

pub use linear::LogisticModel;
pub use tree::TreeEnsemble;

use std::sync::Arc;

use serde::Deserialize;

use super::features::{FeatureVector, FEATURE_COUNT};

/// Opaque binary classifier exposing a single prediction capability.
pub trait Classifier: Send + Sync {
    /// Predict labels for one feature vector. Well-behaved models return a single `0` or `1`.
    fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>, PredictionError>;
}

/// Failure raised by a classifier while producing a prediction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("classifier returned no prediction")]
    EmptyOutput,
    #[error("classifier failed: {0}")]
    Model(String),
}

/// On-disk model description, tagged by `kind`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ArtifactDef {
    TreeEnsemble(tree::TreeEnsembleDef),
    Logistic(LogisticModel),
}

/// A parsed and structurally checked model. Built only by [`ModelArtifact::from_json`].
#[derive(Debug, Clone, PartialEq)]
pub enum ModelArtifact {
    TreeEnsemble(TreeEnsemble),
    Logistic(LogisticModel),
}

impl ModelArtifact {
    pub fn from_json(raw: &str) -> Result<Self, ArtifactError> {
        match serde_json::from_str::<ArtifactDef>(raw)? {
            ArtifactDef::TreeEnsemble(def) => Ok(Self::TreeEnsemble(TreeEnsemble::from_def(def)?)),
            ArtifactDef::Logistic(model) => {
                model.validate()?;
                Ok(Self::Logistic(model))
            }
        }
    }

    pub fn into_classifier(self) -> Arc<dyn Classifier> {
        match self {
            Self::TreeEnsemble(model) => Arc::new(model),
            Self::Logistic(model) => Arc::new(model),
        }
    }
}

/// Structural problems detected while parsing a model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact is not valid model JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model expects {found} features but candidates encode to {expected}")]
    FeatureCount { expected: usize, found: usize },
    #[error("logistic model has {found} coefficients, expected {expected}")]
    CoefficientCount { expected: usize, found: usize },
    #[error("model parameters must be finite")]
    NonFinite,
    #[error("tree ensemble declares no classes")]
    NoClasses,
    #[error("tree ensemble contains no trees")]
    NoTrees,
    #[error("tree {tree} has no nodes")]
    EmptyTree { tree: usize },
    #[error("tree {tree} node {node} splits on unknown feature {feature}")]
    FeatureIndex {
        tree: usize,
        node: usize,
        feature: usize,
    },
    #[error("tree {tree} node {node} points at child {child}, which is not a later node")]
    ChildIndex {
        tree: usize,
        node: usize,
        child: usize,
    },
    #[error("tree {tree} node {node} has {found} class weights, expected {expected}")]
    LeafArity {
        tree: usize,
        node: usize,
        expected: usize,
        found: usize,
    },
}

fn check_feature_count(found: usize) -> Result<(), ArtifactError> {
    if found == FEATURE_COUNT {
        Ok(())
    } else {
        Err(ArtifactError::FeatureCount {
            expected: FEATURE_COUNT,
            found,
        })
    }
}
