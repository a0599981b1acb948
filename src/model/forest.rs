//! Random-forest classifier evaluated from a JSON artifact.
//!
//! Each tree walks from node 0: split nodes send the sample left when
//! `features[feature] <= threshold`, leaves hold per-class probabilities.
//! The forest averages leaf probabilities across trees and picks the most
//! likely class, with ties going to class 0.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use super::{ChurnLabel, Classifier};
use crate::error::{LoadError, ModelError};
use crate::preprocessing::{FeatureVector, FIELD_COUNT};

/// A tree node (split or leaf)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// `[p(no churn), p(churn)]`
        value: [f64; 2],
    },
}

/// A single decision tree, nodes in depth-first order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<Tree>,
}

impl RandomForest {
    pub fn new(n_features: usize, trees: Vec<Tree>) -> Result<Self, LoadError> {
        let forest = Self { n_features, trees };
        forest.check()?;
        Ok(forest)
    }

    pub fn from_json(content: &str, origin: &str) -> Result<Self, LoadError> {
        let forest: Self = serde_json::from_str(content).map_err(|source| LoadError::Json {
            path: origin.to_string(),
            source,
        })?;
        forest.check()?;
        Ok(forest)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Structural checks that make evaluation total: every child index points
    /// forward and in bounds, so a walk always ends on a leaf.
    fn check(&self) -> Result<(), LoadError> {
        let invalid = |msg: String| Err(LoadError::InvalidModel(msg));

        if self.n_features != FIELD_COUNT {
            return invalid(format!(
                "model expects {} features, records have {}",
                self.n_features, FIELD_COUNT
            ));
        }
        if self.trees.is_empty() {
            return invalid("forest has no trees".to_string());
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return invalid(format!("tree {} has no nodes", t));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match *node {
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if feature >= self.n_features {
                            return invalid(format!(
                                "tree {} node {}: feature {} out of range",
                                t, i, feature
                            ));
                        }
                        if !threshold.is_finite() {
                            return invalid(format!("tree {} node {}: non-finite threshold", t, i));
                        }
                        for child in [left, right] {
                            if child <= i || child >= tree.nodes.len() {
                                return invalid(format!(
                                    "tree {} node {}: bad child index {}",
                                    t, i, child
                                ));
                            }
                        }
                    }
                    Node::Leaf { value } => {
                        if value.iter().any(|p| !p.is_finite() || *p < 0.0) {
                            return invalid(format!("tree {} node {}: bad leaf value", t, i));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Mean class probabilities over all trees.
    pub fn probabilities(&self, features: &FeatureVector) -> Result<[f64; 2], ModelError> {
        if features.len() != self.n_features {
            return Err(ModelError::FeatureCount {
                expected: self.n_features,
                got: features.len(),
            });
        }

        let view = features.view();
        let mut sum = [0.0f64; 2];
        for (t, tree) in self.trees.iter().enumerate() {
            let leaf = eval_tree(tree, &view).ok_or(ModelError::CorruptTree(t))?;
            sum[0] += leaf[0];
            sum[1] += leaf[1];
        }

        let n = self.trees.len() as f64;
        Ok([sum[0] / n, sum[1] / n])
    }
}

fn eval_tree(tree: &Tree, features: &ArrayView1<'_, f64>) -> Option<[f64; 2]> {
    let mut idx = 0usize;
    loop {
        match tree.nodes.get(idx)? {
            Node::Leaf { value } => return Some(*value),
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                let next = if *features.get(*feature)? <= *threshold {
                    *left
                } else {
                    *right
                };
                // forward-only walk
                if next <= idx {
                    return None;
                }
                idx = next;
            }
        }
    }
}

impl Classifier for RandomForest {
    fn predict(&self, features: &FeatureVector) -> Result<ChurnLabel, ModelError> {
        let [no_churn, churn] = self.probabilities(features)?;
        Ok(if churn > no_churn {
            ChurnLabel::Churn
        } else {
            ChurnLabel::NoChurn
        })
    }
}
