//! Binary classifiers
//!
//! Supports the model families commonly exported for this dataset:
//! logistic regression, a single decision tree, and a random forest of
//! such trees. Trees use the flat node-array layout of the training side.

use serde::{Deserialize, Serialize};

use super::error::PredictError;

/// Fitted classifier over the full feature row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Classifier {
    LogisticRegression {
        coef: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    DecisionTree(DecisionTree),
    RandomForest { trees: Vec<DecisionTree> },
}

#[allow(clippy::missing_const_for_fn)]
fn default_threshold() -> f64 {
    0.5
}

/// Decision tree stored as a node array; node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

/// Tree node; a split sends `x[feature] <= threshold` to `left`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: u8,
    },
}

impl DecisionTree {
    /// Structural checks: in-range features, forward-only child links
    fn validate(&self, width: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("decision tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } = node
            {
                if *feature >= width {
                    return Err(format!(
                        "node {i} splits on feature {feature}, row has {width}"
                    ));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {i} has a non-finite threshold"));
                }
                for child in [*left, *right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(format!("node {i} links to invalid child {child}"));
                    }
                }
            }
        }
        Ok(())
    }

    fn predict(&self, row: &[f64]) -> Result<u8, PredictError> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { class }) => return Ok(*class),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = row.get(*feature).ok_or_else(|| {
                        PredictError::MalformedModel(format!("feature {feature} out of range"))
                    })?;
                    index = if value <= threshold { *left } else { *right };
                }
                None => {
                    return Err(PredictError::MalformedModel(format!(
                        "node {index} does not exist"
                    )))
                }
            }
        }
    }
}

impl Classifier {
    /// Check the classifier can consume rows of `width` features
    pub fn validate(&self, width: usize) -> Result<(), String> {
        match self {
            Self::LogisticRegression {
                coef,
                intercept,
                threshold,
            } => {
                if coef.len() != width {
                    return Err(format!(
                        "logistic regression has {} coefficients, row has {width}",
                        coef.len()
                    ));
                }
                if coef.iter().any(|c| !c.is_finite()) || !intercept.is_finite() {
                    return Err("coefficients must be finite".to_string());
                }
                if !(0.0..=1.0).contains(threshold) {
                    return Err(format!("threshold {threshold} is not a probability"));
                }
                Ok(())
            }
            Self::DecisionTree(tree) => tree.validate(width),
            Self::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err("random forest has no trees".to_string());
                }
                trees
                    .iter()
                    .enumerate()
                    .try_for_each(|(i, t)| t.validate(width).map_err(|e| format!("tree {i}: {e}")))
            }
        }
    }

    /// Predict the class label (0 or 1) of one row
    pub fn predict(&self, row: &[f64]) -> Result<u8, PredictError> {
        match self {
            Self::LogisticRegression {
                coef,
                intercept,
                threshold,
            } => {
                if row.len() != coef.len() {
                    return Err(PredictError::DimensionMismatch {
                        stage: "classifier",
                        expected: coef.len(),
                        actual: row.len(),
                    });
                }
                let z = row
                    .iter()
                    .zip(coef)
                    .fold(*intercept, |acc, (x, c)| x.mul_add(*c, acc));
                let p = 1.0 / (1.0 + (-z).exp());
                Ok(u8::from(p > *threshold))
            }
            Self::DecisionTree(tree) => tree.predict(row),
            Self::RandomForest { trees } => {
                let mut votes = [0usize; 2];
                for tree in trees {
                    let class = tree.predict(row)?;
                    votes[usize::from(class != 0)] += 1;
                }
                // ties go to class 0
                Ok(u8::from(votes[1] > votes[0]))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64) -> DecisionTree {
        DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { class: 0 },
                TreeNode::Leaf { class: 1 },
            ],
        }
    }

    #[test]
    fn test_logistic_regression() {
        let model = Classifier::LogisticRegression {
            coef: vec![1.0, -1.0],
            intercept: 0.0,
            threshold: 0.5,
        };
        assert_eq!(model.predict(&[2.0, 1.0]).unwrap(), 1);
        assert_eq!(model.predict(&[1.0, 2.0]).unwrap(), 0);
        // exactly on the boundary is class 0
        assert_eq!(model.predict(&[1.0, 1.0]).unwrap(), 0);
    }

    #[test]
    fn test_logistic_regression_dimension_mismatch() {
        let model = Classifier::LogisticRegression {
            coef: vec![1.0; 12],
            intercept: 0.0,
            threshold: 0.5,
        };
        assert!(matches!(
            model.predict(&[0.0; 7]),
            Err(PredictError::DimensionMismatch { expected: 12, actual: 7, .. })
        ));
    }

    #[test]
    fn test_decision_tree_split_is_inclusive_left() {
        let model = Classifier::DecisionTree(stump(0, 0.5));
        assert_eq!(model.predict(&[0.5]).unwrap(), 0);
        assert_eq!(model.predict(&[0.6]).unwrap(), 1);
    }

    #[test]
    fn test_random_forest_majority_and_tie() {
        let forest = Classifier::RandomForest {
            trees: vec![stump(0, 0.0), stump(0, 1.0), stump(0, 2.0)],
        };
        assert_eq!(forest.predict(&[1.5]).unwrap(), 1);
        assert_eq!(forest.predict(&[0.5]).unwrap(), 0);

        let tied = Classifier::RandomForest {
            trees: vec![stump(0, 0.0), stump(0, 1.0)],
        };
        assert_eq!(tied.predict(&[0.5]).unwrap(), 0);
    }

    #[test]
    fn test_validate_rejects_bad_trees() {
        let backwards = DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 0,
                    right: 1,
                },
                TreeNode::Leaf { class: 1 },
            ],
        };
        assert!(Classifier::DecisionTree(backwards).validate(12).is_err());
        assert!(Classifier::DecisionTree(stump(12, 0.0)).validate(12).is_err());
        assert!(Classifier::DecisionTree(stump(11, 0.0)).validate(12).is_ok());
        assert!(Classifier::RandomForest { trees: vec![] }.validate(12).is_err());
    }

    #[test]
    fn test_deserialize_tree_nodes() {
        let json = r#"{
            "type": "decision_tree",
            "nodes": [
                {"feature": 4, "threshold": -0.3, "left": 1, "right": 2},
                {"class": 1},
                {"class": 0}
            ]
        }"#;
        let model: Classifier = serde_json::from_str(json).unwrap();
        assert!(model.validate(12).is_ok());
        let mut row = [0.0; 12];
        row[4] = -1.0;
        assert_eq!(model.predict(&row).unwrap(), 1);
    }
}
