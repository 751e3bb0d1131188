//! Gradient-boosted trees with a logistic link (binary objective)

use crate::model::{ModelKind, Prediction, RiskModel};
use crate::tree::{in_tree, DecisionTree};
use lungscreen_core::{Error, FeatureVector, Result};

/// Default prior probability of the positive class
pub const DEFAULT_BASE_SCORE: f64 = 0.5;

/// Boosted ensemble for binary classification.
///
/// `p(high risk) = sigmoid(logit(base_score) + sum of leaf values)`; the
/// positive class is predicted when that probability exceeds 0.5.
#[derive(Debug, Clone)]
pub struct GradientBoostedTrees {
    trees: Vec<DecisionTree>,
    base_score: f64,
    base_margin: f64,
}

impl GradientBoostedTrees {
    pub fn new(trees: Vec<DecisionTree>, base_score: f64) -> Result<Self> {
        if !(base_score > 0.0 && base_score < 1.0) {
            return Err(Error::invalid_artifact(format!(
                "base_score must be in (0, 1), got {}",
                base_score
            )));
        }
        if trees.is_empty() {
            return Err(Error::invalid_artifact("boosted ensemble has no trees"));
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.validate(1).map_err(|e| in_tree(i, e))?;
        }

        Ok(Self {
            trees,
            base_score,
            base_margin: (base_score / (1.0 - base_score)).ln(),
        })
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    /// Raw log-odds before the logistic link
    pub fn margin(&self, features: &FeatureVector) -> Result<f64> {
        let mut margin = self.base_margin;
        for tree in &self.trees {
            let leaf = tree.leaf(features)?;
            let value = leaf
                .first()
                .ok_or_else(|| Error::inference("boosted tree leaf has no value"))?;
            margin += value;
        }
        Ok(margin)
    }

    fn positive_probability(&self, features: &FeatureVector) -> Result<f64> {
        let margin = self.margin(features)?;
        if !margin.is_finite() {
            return Err(Error::inference("boosted margin is not finite"));
        }
        Ok(sigmoid(margin))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn class_for(p_high: f64) -> usize {
    usize::from(p_high > 0.5)
}

impl RiskModel for GradientBoostedTrees {
    fn predict(&self, features: &FeatureVector) -> Result<usize> {
        Ok(class_for(self.positive_probability(features)?))
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        let p_high = self.positive_probability(features)?;
        Ok(vec![1.0 - p_high, p_high])
    }

    fn predict_with_proba(&self, features: &FeatureVector) -> Result<Prediction> {
        let p_high = self.positive_probability(features)?;
        Ok(Prediction {
            class: class_for(p_high),
            probabilities: vec![1.0 - p_high, p_high],
        })
    }

    fn kind(&self) -> ModelKind {
        ModelKind::GradientBoosting
    }

    fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeNode;
    use lungscreen_core::FEATURE_COUNT;

    fn stump(feature: usize, low: f64, high: f64) -> DecisionTree {
        DecisionTree::new(
            vec![
                TreeNode::split(feature, 0.5, 1, 2),
                TreeNode::leaf(vec![low]),
                TreeNode::leaf(vec![high]),
            ],
            1,
        )
        .unwrap()
    }

    fn zeros() -> FeatureVector {
        FeatureVector::new([0.0; FEATURE_COUNT])
    }

    #[test]
    fn test_margin_sums_leaves_over_base() {
        let model =
            GradientBoostedTrees::new(vec![stump(8, -0.4, 0.4), stump(9, -0.2, 0.3)], 0.5).unwrap();
        assert!((model.margin(&zeros()).unwrap() + 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_probability_is_logistic_of_margin() {
        let model = GradientBoostedTrees::new(vec![stump(0, -1.0, 1.0)], 0.5).unwrap();
        let proba = model.predict_proba(&zeros()).unwrap();

        let expected_high = 1.0 / (1.0 + 1.0f64.exp());
        assert!((proba[1] - expected_high).abs() < 1e-12);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
        assert_eq!(model.predict(&zeros()).unwrap(), 0);
    }

    #[test]
    fn test_base_score_shifts_prior() {
        // A zero-contribution tree leaves the prior untouched
        let model = GradientBoostedTrees::new(vec![stump(0, 0.0, 0.0)], 0.8).unwrap();
        let prediction = model.predict_with_proba(&zeros()).unwrap();
        assert_eq!(prediction.class, 1);
        assert!((prediction.probabilities[1] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_exact_half_predicts_low_class() {
        let model = GradientBoostedTrees::new(vec![stump(0, 0.0, 0.0)], 0.5).unwrap();
        assert_eq!(model.predict(&zeros()).unwrap(), 0);
    }

    #[test]
    fn test_rejects_invalid_base_score() {
        assert!(GradientBoostedTrees::new(vec![stump(0, 0.0, 0.0)], 1.0).is_err());
        assert!(GradientBoostedTrees::new(vec![stump(0, 0.0, 0.0)], 0.0).is_err());
        assert!(GradientBoostedTrees::new(vec![stump(0, 0.0, 0.0)], f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_distribution_leaves() {
        let forest_tree = DecisionTree::new(vec![TreeNode::leaf(vec![0.3, 0.7])], 2).unwrap();
        assert!(GradientBoostedTrees::new(vec![forest_tree], 0.5).is_err());
    }
}
