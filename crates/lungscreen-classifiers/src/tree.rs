//! Decision tree evaluation shared by the ensemble models

use lungscreen_core::{Error, FeatureVector, Result, FEATURE_COUNT};
use serde::{Deserialize, Serialize};

/// A single tree node.
///
/// Children are addressed by index into the tree's node list and must come
/// after their parent, which keeps every traversal finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// Go `left` when `features[feature] < threshold`, else `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },

    /// Terminal output: a class distribution (forests) or a single margin
    /// contribution (boosting)
    Leaf { value: Vec<f64> },
}

impl TreeNode {
    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Self::Split {
            feature,
            threshold,
            left,
            right,
        }
    }

    pub fn leaf(value: Vec<f64>) -> Self {
        Self::Leaf { value }
    }
}

/// Binary decision tree over the fixed feature layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Build a tree, checking structure and that every leaf has `leaf_width` values
    pub fn new(nodes: Vec<TreeNode>, leaf_width: usize) -> Result<Self> {
        let tree = Self { nodes };
        tree.validate(leaf_width)?;
        Ok(tree)
    }

    /// Check node references, feature indices, and leaf widths
    pub fn validate(&self, leaf_width: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::invalid_artifact("tree has no nodes"));
        }

        for (id, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= FEATURE_COUNT {
                        return Err(Error::invalid_artifact(format!(
                            "node {} splits on feature {} but only {} features exist",
                            id, feature, FEATURE_COUNT
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(Error::invalid_artifact(format!(
                            "node {} has a non-finite threshold",
                            id
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= id || child >= self.nodes.len() {
                            return Err(Error::invalid_artifact(format!(
                                "node {} references child {} (must be in {}..{})",
                                id,
                                child,
                                id + 1,
                                self.nodes.len()
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != leaf_width {
                        return Err(Error::invalid_artifact(format!(
                            "leaf {} has {} values, expected {}",
                            id,
                            value.len(),
                            leaf_width
                        )));
                    }
                    if value.iter().any(|v| !v.is_finite()) {
                        return Err(Error::invalid_artifact(format!(
                            "leaf {} has a non-finite value",
                            id
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Walk from the root to the leaf selected by `features`
    pub fn leaf(&self, features: &FeatureVector) -> Result<&[f64]> {
        let mut id = 0;
        loop {
            let node = self
                .nodes
                .get(id)
                .ok_or_else(|| Error::inference(format!("tree node {} does not exist", id)))?;

            match node {
                TreeNode::Leaf { value } => return Ok(value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = features.as_slice().get(*feature).ok_or_else(|| {
                        Error::inference(format!("feature index {} out of range", feature))
                    })?;
                    let next = if *x < *threshold { *left } else { *right };
                    if next <= id {
                        return Err(Error::inference(format!(
                            "tree node {} points backwards to {}",
                            id, next
                        )));
                    }
                    id = next;
                }
            }
        }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Prefix an artifact validation error with the tree's position in its ensemble
pub(crate) fn in_tree(index: usize, err: Error) -> Error {
    match err {
        Error::InvalidArtifact(msg) => Error::invalid_artifact(format!("tree {}: {}", index, msg)),
        other => other,
    }
}
