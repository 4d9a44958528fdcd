//! Binary match classification
//!
//! The trained model is an opaque dependency behind the `Classifier` trait.
//! Concrete model families live in `artifact` and are loaded from disk once at
//! startup; the `ClassifierAdapter` turns a score into the single-column
//! record the model was trained on and interprets its output.

use std::sync::Arc;

use thiserror::Error;

use super::scorer::Score;

pub mod artifact;

pub use artifact::{
    load_classifier, load_feature_columns, DecisionTreeClassifier, LogisticRegressionClassifier,
    ModelArtifact, ThresholdClassifier, TreeNode,
};

/// Class label the adapter treats as a match
pub const MATCH_LABEL: i64 = 1;

/// Errors raised while loading or evaluating a classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Feature record has {values} value(s) for {columns} column(s)")]
    ShapeMismatch { columns: usize, values: usize },

    #[error("Feature '{0}' the model was trained on is missing from the input")]
    MissingFeature(String),

    #[error("Feature '{0}' is unknown to the model")]
    UnexpectedFeature(String),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One-row structured record of named numeric features
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureRecord {
    /// Builds a single-row record, failing when column and value counts differ
    pub fn single_row(columns: &[String], values: &[f64]) -> Result<Self, ClassifierError> {
        if columns.len() != values.len() {
            return Err(ClassifierError::ShapeMismatch {
                columns: columns.len(),
                values: values.len(),
            });
        }

        Ok(Self {
            columns: columns.to_vec(),
            values: values.to_vec(),
        })
    }

    /// Value of the named column
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| self.values[idx])
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Orders the record's values by the model's trained feature names
    ///
    /// Every trained feature must be present and no extra columns are allowed.
    pub fn aligned_to(&self, feature_names: &[String]) -> Result<Vec<f64>, ClassifierError> {
        if let Some(extra) = self.columns.iter().find(|c| !feature_names.contains(c)) {
            return Err(ClassifierError::UnexpectedFeature(extra.clone()));
        }

        feature_names
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| ClassifierError::MissingFeature(name.clone()))
            })
            .collect()
    }
}

/// A pre-trained binary classifier
#[cfg_attr(test, mockall::automock)]
pub trait Classifier: Send + Sync {
    /// Predicts the class label for one record
    fn predict(&self, record: &FeatureRecord) -> Result<i64, ClassifierError>;

    /// Model family, for logging
    fn name(&self) -> &'static str;
}

/// Wraps a classifier and the feature name it was trained with
#[derive(Clone)]
pub struct ClassifierAdapter {
    classifier: Arc<dyn Classifier>,
    feature_columns: Vec<String>,
}

impl ClassifierAdapter {
    pub fn new(classifier: Arc<dyn Classifier>, feature_columns: Vec<String>) -> Self {
        Self {
            classifier,
            feature_columns,
        }
    }

    /// Returns whether the model labels this score a match
    ///
    /// Classifier failures are returned to the caller untouched.
    pub fn is_match(&self, score: Score) -> Result<bool, ClassifierError> {
        let record = FeatureRecord::single_row(&self.feature_columns, &[f64::from(score)])?;
        let label = self.classifier.predict(&record)?;
        Ok(label == MATCH_LABEL)
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }
}
