//! Pretrained attrition classifier
//!
//! The artifact is a gradient-boosted ensemble of binary decision trees
//! serialized as JSON. Scoring encodes the model's feature columns from the
//! record set, sums the tree outputs on the log-odds scale and applies the
//! logistic function to obtain the probability of attrition (class 1).

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating or scoring a model
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("feature column '{0}' required by the model is missing from the record set")]
    MissingFeature(String),

    #[error("feature column '{column}' cannot be read as {expected}")]
    InvalidFeature {
        column: String,
        expected: &'static str,
    },

    #[error("tree {tree} is malformed: {reason}")]
    MalformedTree { tree: usize, reason: String },

    #[error("invalid model parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Capability shared by every attrition classifier
pub trait AttritionModel: Send + Sync {
    /// Probability of attrition (class 1) for every row of `df`, in row order
    fn predict_proba(&self, df: &DataFrame) -> Result<Vec<f64>, ModelError>;

    /// Human-readable model name
    fn name(&self) -> &str {
        "Attrition model"
    }

    /// Accuracy reported at training time, as a percentage
    fn reported_accuracy(&self) -> Option<f64> {
        None
    }
}

/// How one model input is derived from the record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSpec {
    /// Column value cast to a float
    Numeric { column: String },
    /// 1.0 when the column equals `value`, else 0.0
    OneHot { column: String, value: String },
}

impl FeatureSpec {
    pub fn column(&self) -> &str {
        match self {
            FeatureSpec::Numeric { column } | FeatureSpec::OneHot { column, .. } => column.as_str(),
        }
    }
}

fn default_left() -> bool {
    true
}

/// A node of an array-encoded decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Go `left` when `feature <= threshold`, otherwise `right`.
    /// Missing inputs follow `default_left`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default = "default_left")]
        default_left: bool,
    },
    Leaf { value: f64 },
}

/// A regression tree; node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Check that every split points forward to an existing node.
    ///
    /// Children must have a larger index than their parent, which rules out
    /// cycles and guarantees traversal terminates.
    fn validate(&self, tree: usize, n_features: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::MalformedTree {
                tree,
                reason: "tree has no nodes".to_string(),
            });
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= n_features {
                        return Err(ModelError::MalformedTree {
                            tree,
                            reason: format!(
                                "node {} uses feature {} but the model has {} features",
                                idx, feature, n_features
                            ),
                        });
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::MalformedTree {
                            tree,
                            reason: format!("node {} has a non-finite threshold", idx),
                        });
                    }
                    for child in [left, right] {
                        if *child <= idx || *child >= self.nodes.len() {
                            return Err(ModelError::MalformedTree {
                                tree,
                                reason: format!("node {} has invalid child index {}", idx, child),
                            });
                        }
                    }
                }
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(ModelError::MalformedTree {
                            tree,
                            reason: format!("leaf {} has a non-finite value", idx),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Raw output for one row; `feature(i)` returns the i-th encoded input.
    /// Assumes the tree has been validated.
    fn evaluate(&self, feature: impl Fn(usize) -> Option<f64>) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature: f,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    idx = match feature(*f) {
                        Some(x) if x <= *threshold => *left,
                        Some(_) => *right,
                        None if *default_left => *left,
                        None => *right,
                    };
                }
            }
        }
    }
}

/// Gradient-boosted tree ensemble for binary attrition prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedModel {
    pub name: String,
    /// Test-set accuracy in percent, as reported by the training run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    pub features: Vec<FeatureSpec>,
    /// Prior log-odds added to every prediction
    pub init_score: f64,
    pub learning_rate: f64,
    pub trees: Vec<Tree>,
}

impl GradientBoostedModel {
    /// Read and validate a model artifact
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to load model from {}", path.display()))
    }

    /// Parse and validate a model from its JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let model: GradientBoostedModel =
            serde_json::from_str(json).context("Model artifact is not valid JSON")?;
        model.validate()?;
        Ok(model)
    }

    /// Structural checks: finite parameters and well-formed trees
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.init_score.is_finite() {
            return Err(ModelError::InvalidParameter(
                "init_score must be finite".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ModelError::InvalidParameter(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, self.features.len())?;
        }
        Ok(())
    }

    /// Columns of the record set the model reads
    pub fn required_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for spec in &self.features {
            if !columns.contains(&spec.column()) {
                columns.push(spec.column());
            }
        }
        columns
    }

    /// Encode every model input as a column of optional floats
    fn encode(&self, df: &DataFrame) -> Result<Vec<Vec<Option<f64>>>, ModelError> {
        self.features
            .iter()
            .map(|spec| {
                let column = df
                    .column(spec.column())
                    .map_err(|_| ModelError::MissingFeature(spec.column().to_string()))?;

                match spec {
                    FeatureSpec::Numeric { column: name } => {
                        let numeric = column.cast(&DataType::Float64).map_err(|_| {
                            ModelError::InvalidFeature {
                                column: name.clone(),
                                expected: "a number",
                            }
                        })?;
                        Ok(numeric.f64()?.into_iter().collect())
                    }
                    FeatureSpec::OneHot { column: name, value } => {
                        let text = column.cast(&DataType::String).map_err(|_| {
                            ModelError::InvalidFeature {
                                column: name.clone(),
                                expected: "text",
                            }
                        })?;
                        Ok(text
                            .str()?
                            .into_iter()
                            .map(|v| v.map(|s| if s == value { 1.0 } else { 0.0 }))
                            .collect())
                    }
                }
            })
            .collect()
    }

    fn score_row(&self, inputs: &[Vec<Option<f64>>], row: usize) -> f64 {
        let raw: f64 = self
            .trees
            .iter()
            .map(|tree| tree.evaluate(|f| inputs[f][row]))
            .sum();
        sigmoid(self.init_score + self.learning_rate * raw)
    }
}

impl AttritionModel for GradientBoostedModel {
    fn predict_proba(&self, df: &DataFrame) -> Result<Vec<f64>, ModelError> {
        self.validate()?;
        let inputs = self.encode(df)?;

        Ok((0..df.height())
            .into_par_iter()
            .map(|row| self.score_row(&inputs, row))
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn reported_accuracy(&self) -> Option<f64> {
        self.accuracy
    }
}

/// Logistic function mapping log-odds to a probability
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One stump on OverTime plus one on MonthlyIncome
    fn stump_model() -> GradientBoostedModel {
        GradientBoostedModel {
            name: "Test Boosting".to_string(),
            accuracy: Some(85.85),
            features: vec![
                FeatureSpec::OneHot {
                    column: "OverTime".to_string(),
                    value: "Yes".to_string(),
                },
                FeatureSpec::Numeric {
                    column: "MonthlyIncome".to_string(),
                },
            ],
            init_score: 0.0,
            learning_rate: 1.0,
            trees: vec![
                Tree {
                    nodes: vec![
                        Node::Split {
                            feature: 0,
                            threshold: 0.5,
                            left: 1,
                            right: 2,
                            default_left: true,
                        },
                        Node::Leaf { value: -1.0 },
                        Node::Leaf { value: 1.0 },
                    ],
                },
                Tree {
                    nodes: vec![
                        Node::Split {
                            feature: 1,
                            threshold: 3000.0,
                            left: 1,
                            right: 2,
                            default_left: false,
                        },
                        Node::Leaf { value: 1.0 },
                        Node::Leaf { value: -1.0 },
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_predict_proba_row_order() {
        let df = df! {
            "OverTime" => ["Yes", "No", "Yes"],
            "MonthlyIncome" => [2000.0f64, 8000.0, 8000.0],
        }
        .unwrap();

        let probs = stump_model().predict_proba(&df).unwrap();

        assert_eq!(probs.len(), 3);
        assert!((probs[0] - sigmoid(2.0)).abs() < 1e-12);
        assert!((probs[1] - sigmoid(-2.0)).abs() < 1e-12);
        assert!((probs[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_missing_input_follows_default_direction() {
        let df = df! {
            "OverTime" => [None::<&str>],
            "MonthlyIncome" => [None::<f64>],
        }
        .unwrap();

        // OverTime defaults left (-1), income defaults right (-1)
        let probs = stump_model().predict_proba(&df).unwrap();
        assert!((probs[0] - sigmoid(-2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_missing_feature_column_errors() {
        let df = df! {
            "OverTime" => ["Yes"],
        }
        .unwrap();

        let err = stump_model().predict_proba(&df).unwrap_err();
        assert!(matches!(err, ModelError::MissingFeature(ref c) if c == "MonthlyIncome"));
    }

    #[test]
    fn test_json_roundtrip_preserves_model() {
        let model = stump_model();
        let json = serde_json::to_string_pretty(&model).unwrap();
        let parsed = GradientBoostedModel::from_json(&json).unwrap();
        assert_eq!(parsed, model);
        assert!(json.contains("\"kind\": \"one_hot\""));
    }

    #[test]
    fn test_default_left_defaults_to_true() {
        let json = r#"{
            "name": "m",
            "features": [{"kind": "numeric", "column": "Age"}],
            "init_score": 0.0,
            "learning_rate": 0.1,
            "trees": [{"nodes": [
                {"type": "split", "feature": 0, "threshold": 30.0, "left": 1, "right": 2},
                {"type": "leaf", "value": 1.0},
                {"type": "leaf", "value": -1.0}
            ]}]
        }"#;
        let model = GradientBoostedModel::from_json(json).unwrap();
        assert!(matches!(
            model.trees[0].nodes[0],
            Node::Split { default_left: true, .. }
        ));
        assert_eq!(model.accuracy, None);
    }

    #[test]
    fn test_backward_child_index_rejected() {
        let mut model = stump_model();
        model.trees[0].nodes[0] = Node::Split {
            feature: 0,
            threshold: 0.5,
            left: 0,
            right: 2,
            default_left: true,
        };
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("invalid child index"));
    }

    #[test]
    fn test_out_of_range_feature_rejected() {
        let mut model = stump_model();
        model.trees[1].nodes[0] = Node::Split {
            feature: 7,
            threshold: 0.5,
            left: 1,
            right: 2,
            default_left: true,
        };
        assert!(matches!(
            model.validate(),
            Err(ModelError::MalformedTree { tree: 1, .. })
        ));
    }

    #[test]
    fn test_invalid_learning_rate_rejected() {
        let mut model = stump_model();
        model.learning_rate = 0.0;
        assert!(matches!(
            model.validate(),
            Err(ModelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_required_columns_deduplicated() {
        let mut model = stump_model();
        model.features.push(FeatureSpec::OneHot {
            column: "OverTime".to_string(),
            value: "No".to_string(),
        });
        assert_eq!(model.required_columns(), vec!["OverTime", "MonthlyIncome"]);
    }

    #[test]
    fn test_trait_metadata() {
        let model = stump_model();
        let dynamic: &dyn AttritionModel = &model;
        assert_eq!(dynamic.name(), "Test Boosting");
        assert_eq!(dynamic.reported_accuracy(), Some(85.85));
    }

    #[test]
    fn test_empty_frame_scores_nothing() {
        let df = df! {
            "OverTime" => Vec::<&str>::new(),
            "MonthlyIncome" => Vec::<f64>::new(),
        }
        .unwrap();
        assert!(stump_model().predict_proba(&df).unwrap().is_empty());
    }
}
