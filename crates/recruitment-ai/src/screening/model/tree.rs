use serde::Deserialize;

use super::{check_feature_count, ArtifactError, Classifier, PredictionError};
use crate::screening::features::{FeatureVector, FEATURE_COUNT};

/// Class means closer than this are a tie; summing normalized votes leaves rounding noise.
const TIE_TOLERANCE: f64 = 1e-9;

/// Tree ensemble as written in the artifact, before structural checks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct TreeEnsembleDef {
    pub(crate) n_features: usize,
    pub(crate) classes: Vec<i64>,
    pub(crate) trees: Vec<DecisionTree>,
}

/// Averaged-vote decision tree ensemble (a single tree is an ensemble of one).
///
/// Only built from a checked artifact, so every split points at a later node and a known
/// feature.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsemble {
    classes: Vec<i64>,
    trees: Vec<DecisionTree>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct DecisionTree {
    pub(crate) nodes: Vec<TreeNode>,
}

/// Split nodes send a sample left when `x[feature] <= threshold`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

impl DecisionTree {
    // Children always sit after their parent (checked on load), so the walk terminates.
    fn leaf(&self, features: &[f64]) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

impl TreeEnsembleDef {
    fn validate(&self) -> Result<(), ArtifactError> {
        check_feature_count(self.n_features)?;
        if self.classes.is_empty() {
            return Err(ArtifactError::NoClasses);
        }
        if self.trees.is_empty() {
            return Err(ArtifactError::NoTrees);
        }

        for (tree_index, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ArtifactError::EmptyTree { tree: tree_index });
            }

            for (node_index, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= FEATURE_COUNT {
                            return Err(ArtifactError::FeatureIndex {
                                tree: tree_index,
                                node: node_index,
                                feature: *feature,
                            });
                        }
                        if !threshold.is_finite() {
                            return Err(ArtifactError::NonFinite);
                        }
                        for child in [*left, *right] {
                            if child <= node_index || child >= tree.nodes.len() {
                                return Err(ArtifactError::ChildIndex {
                                    tree: tree_index,
                                    node: node_index,
                                    child,
                                });
                            }
                        }
                    }
                    TreeNode::Leaf { value } => {
                        if value.len() != self.classes.len() {
                            return Err(ArtifactError::LeafArity {
                                tree: tree_index,
                                node: node_index,
                                expected: self.classes.len(),
                                found: value.len(),
                            });
                        }
                        if value.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
                            return Err(ArtifactError::NonFinite);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

impl TreeEnsemble {
    pub(crate) fn from_def(def: TreeEnsembleDef) -> Result<Self, ArtifactError> {
        def.validate()?;
        Ok(Self {
            classes: def.classes,
            trees: def.trees,
        })
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    /// Mean normalized class weights across all trees.
    pub fn class_scores(&self, features: &FeatureVector) -> Vec<f64> {
        let mut scores = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = tree.leaf(features.as_slice());
            let total: f64 = leaf.iter().sum();
            if total <= 0.0 {
                continue;
            }
            for (score, weight) in scores.iter_mut().zip(leaf) {
                *score += weight / total;
            }
        }

        let count = self.trees.len() as f64;
        scores.iter_mut().for_each(|score| *score /= count);
        scores
    }
}

impl Classifier for TreeEnsemble {
    fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>, PredictionError> {
        let scores = self.class_scores(features);

        // A later class must clear the leader by more than the tolerance; ties keep the lower index.
        let best = scores
            .iter()
            .enumerate()
            .fold(None::<(usize, f64)>, |best, (index, score)| match best {
                Some((_, top)) if *score <= top + TIE_TOLERANCE => best,
                _ => Some((index, *score)),
            })
            .map(|(index, _)| index)
            .ok_or(PredictionError::EmptyOutput)?;

        Ok(vec![self.classes[best] as f64])
    }
}
