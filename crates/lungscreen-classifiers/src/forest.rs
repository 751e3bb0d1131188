//! Random forest ensemble
//!
//! Every tree ends in a class distribution (raw counts or fractions). The
//! forest probability is the mean of the per-tree normalized distributions,
//! and the predicted class is its argmax.

use crate::model::{ModelKind, Prediction, RiskModel};
use crate::tree::{in_tree, DecisionTree, TreeNode};
use lungscreen_core::{Error, FeatureVector, Result};

/// Random forest classifier
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForest {
    /// Create a forest; each tree's leaves must carry `n_classes` values
    pub fn new(trees: Vec<DecisionTree>, n_classes: usize) -> Result<Self> {
        if n_classes < 2 {
            return Err(Error::invalid_artifact(format!(
                "random forest needs at least 2 classes, got {}",
                n_classes
            )));
        }
        if trees.is_empty() {
            return Err(Error::invalid_artifact("random forest has no trees"));
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.validate(n_classes)
                .and_then(|()| check_class_mass(tree))
                .map_err(|e| in_tree(i, e))?;
        }

        Ok(Self { trees, n_classes })
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn distribution(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        let mut totals = vec![0.0; self.n_classes];

        for tree in &self.trees {
            let leaf = tree.leaf(features)?;
            let sum: f64 = leaf.iter().sum();
            if sum <= 0.0 {
                return Err(Error::inference("random forest leaf has no class mass"));
            }
            for (total, value) in totals.iter_mut().zip(leaf) {
                *total += value / sum;
            }
        }

        let n_trees = self.trees.len() as f64;
        for total in &mut totals {
            *total /= n_trees;
        }

        Ok(totals)
    }
}

/// Every leaf must be a usable class distribution: no negative entries and
/// some positive mass
fn check_class_mass(tree: &DecisionTree) -> Result<()> {
    for (id, node) in tree.nodes().iter().enumerate() {
        if let TreeNode::Leaf { value } = node {
            if value.iter().any(|v| *v < 0.0) {
                return Err(Error::invalid_artifact(format!(
                    "leaf {} has a negative class weight",
                    id
                )));
            }
            if value.iter().sum::<f64>() <= 0.0 {
                return Err(Error::invalid_artifact(format!(
                    "leaf {} has no class mass",
                    id
                )));
            }
        }
    }
    Ok(())
}

/// Index of the largest probability; ties go to the lower class
fn argmax(probabilities: &[f64]) -> Result<usize> {
    probabilities
        .iter()
        .enumerate()
        .try_fold(None::<(usize, f64)>, |best, (i, &p)| {
            if p.is_nan() {
                return Err(Error::inference("class probability is NaN"));
            }
            Ok(match best {
                Some((_, best_p)) if best_p >= p => best,
                _ => Some((i, p)),
            })
        })?
        .map(|(i, _)| i)
        .ok_or_else(|| Error::inference("empty class distribution"))
}

impl RiskModel for RandomForest {
    fn predict(&self, features: &FeatureVector) -> Result<usize> {
        argmax(&self.distribution(features)?)
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        self.distribution(features)
    }

    fn predict_with_proba(&self, features: &FeatureVector) -> Result<Prediction> {
        let probabilities = self.distribution(features)?;
        Ok(Prediction {
            class: argmax(&probabilities)?,
            probabilities,
        })
    }

    fn kind(&self) -> ModelKind {
        ModelKind::RandomForest
    }

    fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
