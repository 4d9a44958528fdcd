use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        classifier::{load_classifier, load_feature_columns, ClassifierAdapter},
        weights::WeightTable,
        Recommender,
    },
};

/// Shared application state
///
/// Everything in here is loaded once at startup and only read afterwards,
/// so requests share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

impl AppState {
    pub fn new(recommender: Recommender) -> Self {
        Self {
            recommender: Arc::new(recommender),
        }
    }

    /// Loads the classifier artifacts named by the config
    ///
    /// Any failure here is fatal: the server must not start without a model.
    pub fn load(config: &Config) -> anyhow::Result<Self> {
        let model_path = config.model_path()?;
        let features_path = config.features_path()?;

        let classifier = load_classifier(&model_path)
            .map_err(|e| anyhow::anyhow!("Failed to load classifier: {}", e))?;
        let feature_columns = load_feature_columns(&features_path)
            .map_err(|e| anyhow::anyhow!("Failed to load model features: {}", e))?;

        if feature_columns.len() != 1 {
            tracing::warn!(
                features = ?feature_columns,
                "Expected exactly one feature column; every request will fail"
            );
        }

        tracing::info!(
            model = %model_path.display(),
            features = %features_path.display(),
            classifier = classifier.name(),
            "Classifier loaded"
        );

        let adapter = ClassifierAdapter::new(classifier, feature_columns);
        Ok(Self::new(Recommender::new(
            Arc::new(WeightTable::seeded()),
            adapter,
        )))
    }
}
