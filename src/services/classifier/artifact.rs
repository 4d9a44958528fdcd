use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{Classifier, ClassifierError, FeatureRecord};

/// Serialized model, tagged by model family
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression {
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    },
    DecisionTree {
        feature_names: Vec<String>,
        nodes: Vec<TreeNode>,
    },
    Threshold {
        feature_names: Vec<String>,
        threshold: f64,
    },
}

/// Decision tree node; splits go left when `value <= threshold`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: i64,
    },
}

impl ModelArtifact {
    /// Validates the artifact and builds the matching classifier
    pub fn into_classifier(self) -> Result<Arc<dyn Classifier>, ClassifierError> {
        let classifier: Arc<dyn Classifier> = match self {
            ModelArtifact::LogisticRegression {
                feature_names,
                coefficients,
                intercept,
            } => Arc::new(LogisticRegressionClassifier::new(
                feature_names,
                coefficients,
                intercept,
            )?),
            ModelArtifact::DecisionTree {
                feature_names,
                nodes,
            } => Arc::new(DecisionTreeClassifier::new(feature_names, nodes)?),
            ModelArtifact::Threshold {
                feature_names,
                threshold,
            } => Arc::new(ThresholdClassifier::new(feature_names, threshold)?),
        };

        Ok(classifier)
    }
}

fn require_features(feature_names: &[String]) -> Result<(), ClassifierError> {
    if feature_names.is_empty() {
        return Err(ClassifierError::InvalidArtifact(
            "model declares no feature names".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Model families
// ============================================================================

/// Linear model: predicts 1 when `intercept + coefficients · x > 0`
#[derive(Debug, Clone)]
pub struct LogisticRegressionClassifier {
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LogisticRegressionClassifier {
    pub fn new(
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, ClassifierError> {
        require_features(&feature_names)?;
        if coefficients.len() != feature_names.len() {
            return Err(ClassifierError::InvalidArtifact(format!(
                "{} coefficients for {} features",
                coefficients.len(),
                feature_names.len()
            )));
        }

        Ok(Self {
            feature_names,
            coefficients,
            intercept,
        })
    }

    /// Signed distance from the decision boundary
    pub fn decision_function(&self, record: &FeatureRecord) -> Result<f64, ClassifierError> {
        let values = record.aligned_to(&self.feature_names)?;
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(values)
                .map(|(coef, x)| coef * x)
                .sum::<f64>())
    }
}

impl Classifier for LogisticRegressionClassifier {
    fn predict(&self, record: &FeatureRecord) -> Result<i64, ClassifierError> {
        Ok(i64::from(self.decision_function(record)? > 0.0))
    }

    fn name(&self) -> &'static str {
        "logistic_regression"
    }
}

/// Binary decision tree stored as a flat node array rooted at index 0
#[derive(Debug, Clone)]
pub struct DecisionTreeClassifier {
    feature_names: Vec<String>,
    nodes: Vec<TreeNode>,
}

impl DecisionTreeClassifier {
    /// Children must sit after their parent, which rules out cycles
    pub fn new(feature_names: Vec<String>, nodes: Vec<TreeNode>) -> Result<Self, ClassifierError> {
        require_features(&feature_names)?;
        if nodes.is_empty() {
            return Err(ClassifierError::InvalidArtifact(
                "decision tree has no nodes".to_string(),
            ));
        }

        for (idx, node) in nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= feature_names.len() {
                    return Err(ClassifierError::InvalidArtifact(format!(
                        "node {idx} splits on unknown feature {feature}"
                    )));
                }
                for child in [*left, *right] {
                    if child <= idx || child >= nodes.len() {
                        return Err(ClassifierError::InvalidArtifact(format!(
                            "node {idx} has invalid child {child}"
                        )));
                    }
                }
            }
        }

        Ok(Self {
            feature_names,
            nodes,
        })
    }
}

impl Classifier for DecisionTreeClassifier {
    fn predict(&self, record: &FeatureRecord) -> Result<i64, ClassifierError> {
        let values = record.aligned_to(&self.feature_names)?;
        let mut idx = 0;

        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { class } => return Ok(*class),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if values[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "decision_tree"
    }
}

/// Single-feature cutoff: predicts 1 when `value >= threshold`
#[derive(Debug, Clone)]
pub struct ThresholdClassifier {
    feature_names: Vec<String>,
    threshold: f64,
}

impl ThresholdClassifier {
    pub fn new(feature_names: Vec<String>, threshold: f64) -> Result<Self, ClassifierError> {
        if feature_names.len() != 1 {
            return Err(ClassifierError::InvalidArtifact(format!(
                "threshold model needs exactly one feature, got {}",
                feature_names.len()
            )));
        }

        Ok(Self {
            feature_names,
            threshold,
        })
    }
}

impl Classifier for ThresholdClassifier {
    fn predict(&self, record: &FeatureRecord) -> Result<i64, ClassifierError> {
        let values = record.aligned_to(&self.feature_names)?;
        Ok(i64::from(values[0] >= self.threshold))
    }

    fn name(&self) -> &'static str {
        "threshold"
    }
}

// ============================================================================
// Loading
// ============================================================================

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ClassifierError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ClassifierError::Io {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| ClassifierError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Loads and validates a model artifact
pub fn load_classifier(path: &Path) -> Result<Arc<dyn Classifier>, ClassifierError> {
    read_json::<ModelArtifact>(path)?.into_classifier()
}

/// Loads the feature column names persisted alongside the model
pub fn load_feature_columns(path: &Path) -> Result<Vec<String>, ClassifierError> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(score: f64) -> FeatureRecord {
        FeatureRecord::single_row(&["final_score".to_string()], &[score]).unwrap()
    }

    fn parse(json: &str) -> Result<Arc<dyn Classifier>, ClassifierError> {
        serde_json::from_str::<ModelArtifact>(json)
            .unwrap()
            .into_classifier()
    }

    #[test]
    fn test_logistic_regression_artifact() {
        let model = parse(
            r#"{"model": "logistic_regression", "feature_names": ["final_score"],
                "coefficients": [2.0], "intercept": -1}"#,
        )
        .unwrap();

        assert_eq!(model.name(), "logistic_regression");
        assert_eq!(model.predict(&record(0.0)).unwrap(), 0);
        assert_eq!(model.predict(&record(1.0)).unwrap(), 1);
        assert_eq!(model.predict(&record(9.0)).unwrap(), 1);
    }

    #[test]
    fn test_logistic_regression_coefficient_count() {
        let result = LogisticRegressionClassifier::new(vec!["final_score".to_string()], vec![], 0.0);
        assert!(matches!(result, Err(ClassifierError::InvalidArtifact(_))));
    }

    #[test]
    fn test_decision_tree_artifact() {
        // score <= 2.5 -> no match, else score <= 20 -> match, else no match
        let model = parse(
            r#"{"model": "decision_tree", "feature_names": ["final_score"], "nodes": [
                {"feature": 0, "threshold": 2.5, "left": 1, "right": 2},
                {"class": 0},
                {"feature": 0, "threshold": 20.0, "left": 3, "right": 4},
                {"class": 1},
                {"class": 0}
            ]}"#,
        )
        .unwrap();

        assert_eq!(model.predict(&record(2.0)).unwrap(), 0);
        assert_eq!(model.predict(&record(2.5)).unwrap(), 0);
        assert_eq!(model.predict(&record(3.0)).unwrap(), 1);
        assert_eq!(model.predict(&record(21.0)).unwrap(), 0);
    }

    #[test]
    fn test_decision_tree_rejects_back_edges() {
        let nodes = vec![
            TreeNode::Split {
                feature: 0,
                threshold: 1.0,
                left: 0,
                right: 1,
            },
            TreeNode::Leaf { class: 1 },
        ];
        let result = DecisionTreeClassifier::new(vec!["final_score".to_string()], nodes);
        assert!(matches!(result, Err(ClassifierError::InvalidArtifact(_))));
    }

    #[test]
    fn test_decision_tree_rejects_unknown_feature() {
        let nodes = vec![
            TreeNode::Split {
                feature: 3,
                threshold: 1.0,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { class: 0 },
            TreeNode::Leaf { class: 1 },
        ];
        let result = DecisionTreeClassifier::new(vec!["final_score".to_string()], nodes);
        assert!(matches!(result, Err(ClassifierError::InvalidArtifact(_))));
    }

    #[test]
    fn test_threshold_artifact() {
        let model = parse(
            r#"{"model": "threshold", "feature_names": ["final_score"], "threshold": 4}"#,
        )
        .unwrap();

        assert_eq!(model.predict(&record(3.0)).unwrap(), 0);
        assert_eq!(model.predict(&record(4.0)).unwrap(), 1);
    }

    #[test]
    fn test_predict_with_mismatched_feature_name() {
        let model = ThresholdClassifier::new(vec!["score".to_string()], 1.0).unwrap();
        assert!(matches!(
            model.predict(&record(3.0)),
            Err(ClassifierError::UnexpectedFeature(_))
        ));
    }

    #[test]
    fn test_unknown_model_family_fails_to_parse() {
        let result = serde_json::from_str::<ModelArtifact>(
            r#"{"model": "random_forest", "feature_names": ["final_score"]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_classifier(Path::new("/nonexistent/model.json"));
        assert!(matches!(result, Err(ClassifierError::Io { .. })));
    }

    #[test]
    fn test_load_shipped_artifacts() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("artifacts");
        let model = load_classifier(&dir.join("job_recommendation_model.json")).unwrap();
        let columns = load_feature_columns(&dir.join("model_features.json")).unwrap();

        assert_eq!(columns, vec!["final_score".to_string()]);
        assert_eq!(model.predict(&record(0.0)).unwrap(), 0);
        assert_eq!(model.predict(&record(1.0)).unwrap(), 1);
    }
}
