//! Inference Engine Implementation

use crate::labels::{fallback_label, LabelEncoder};
use crate::model::{HealthClassifier, ValueRegressor};
use crate::InferenceError;
use feature_engine::{
    FeatureError, HealthFeatureVector, ValueFeatureBuilder, ValueFeatureRow, ValueInput,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Decoded health classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthPrediction {
    /// Raw class index from the model
    pub index: usize,
    /// Class name
    pub label: String,
}

/// Health classifier paired with its label decoding
#[derive(Clone)]
pub struct HealthPredictor {
    classifier: Arc<dyn HealthClassifier>,
    labels: Option<LabelEncoder>,
}

impl HealthPredictor {
    /// Create a predictor. Without an encoder, indices decode through
    /// `fallback_label`.
    pub fn new(classifier: Arc<dyn HealthClassifier>, labels: Option<LabelEncoder>) -> Self {
        info!(
            classes = ?labels.as_ref().map(LabelEncoder::classes),
            "Creating health predictor"
        );
        Self { classifier, labels }
    }

    /// Classify a feature vector and decode the label
    pub fn predict(&self, features: &HealthFeatureVector) -> Result<HealthPrediction, InferenceError> {
        let start = Instant::now();
        let index = self.classifier.classify(features)?;

        let label = match &self.labels {
            Some(encoder) => encoder
                .inverse_transform(index)
                .ok_or_else(|| {
                    InferenceError::InvalidOutput(format!(
                        "class index {} outside {} known labels",
                        index,
                        encoder.classes().len()
                    ))
                })?
                .to_string(),
            None => fallback_label(index).to_string(),
        };

        debug!(
            index,
            label = %label,
            latency_us = start.elapsed().as_micros() as u64,
            "Health prediction"
        );

        Ok(HealthPrediction { index, label })
    }
}

/// Value regressor paired with the row builder for its training columns
#[derive(Clone)]
pub struct ValuePredictor {
    regressor: Arc<dyn ValueRegressor>,
    builder: Option<ValueFeatureBuilder>,
}

impl ValuePredictor {
    /// Create a predictor, capturing the regressor's feature names once
    pub fn new(regressor: Arc<dyn ValueRegressor>) -> Self {
        let builder = match ValueFeatureBuilder::from_feature_names(regressor.feature_names()) {
            Ok(builder) => Some(builder),
            Err(e) => {
                warn!(error = %e, "Value model does not expose feature names");
                None
            }
        };
        Self { regressor, builder }
    }

    /// Whether requests can be turned into model rows
    pub fn has_feature_names(&self) -> bool {
        self.builder.is_some()
    }

    /// Build the model row for an input
    pub fn preprocess(&self, input: &ValueInput) -> Result<ValueFeatureRow, FeatureError> {
        let builder = self.builder.as_ref().ok_or_else(|| {
            FeatureError::Configuration("model feature names not available".to_string())
        })?;
        Ok(builder.build(input))
    }

    /// Score an input
    pub fn predict(&self, input: &ValueInput) -> Result<f64, InferenceError> {
        let start = Instant::now();
        let row = self.preprocess(input)?;
        let score = self.regressor.predict(&row)?;

        debug!(
            score,
            columns = row.len(),
            latency_us = start.elapsed().as_micros() as u64,
            "Value prediction"
        );

        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockHealthClassifier, MockValueRegressor};
    use feature_engine::HEALTH_FEATURE_DIMENSION;

    fn features(retention: f64) -> HealthFeatureVector {
        let mut values = [0.0; HEALTH_FEATURE_DIMENSION];
        values[HEALTH_FEATURE_DIMENSION - 1] = retention;
        HealthFeatureVector { values }
    }

    struct FixedClassifier(usize);

    impl HealthClassifier for FixedClassifier {
        fn classify(&self, _: &HealthFeatureVector) -> Result<usize, InferenceError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_health_prediction_decodes_label() {
        let predictor = HealthPredictor::new(
            Arc::new(MockHealthClassifier::new()),
            Some(LabelEncoder::default_health()),
        );

        let healthy = predictor.predict(&features(95.0)).unwrap();
        assert_eq!(healthy, HealthPrediction { index: 1, label: "Healthy".into() });

        let moderate = predictor.predict(&features(80.0)).unwrap();
        assert_eq!(moderate.label, "Moderate");

        let degraded = predictor.predict(&features(60.0)).unwrap();
        assert_eq!(degraded.index, 0);
        assert_eq!(degraded.label, "Degraded");
    }

    #[test]
    fn test_out_of_range_index_with_encoder_is_error() {
        let predictor =
            HealthPredictor::new(Arc::new(FixedClassifier(5)), Some(LabelEncoder::default_health()));
        assert!(matches!(
            predictor.predict(&features(95.0)),
            Err(InferenceError::InvalidOutput(_))
        ));
    }

    #[test]
    fn test_out_of_range_index_without_encoder_is_unknown() {
        let predictor = HealthPredictor::new(Arc::new(FixedClassifier(5)), None);
        assert_eq!(predictor.predict(&features(95.0)).unwrap().label, "Unknown");
    }

    #[test]
    fn test_value_prediction() {
        let regressor = MockValueRegressor::new(1.2).with_feature_names(["range_km", "brand_Tesla"]);
        let predictor = ValuePredictor::new(Arc::new(regressor));
        assert!(predictor.has_feature_names());

        let input = ValueInput {
            brand: "Tesla".into(),
            range_km: 400.0,
            ..Default::default()
        };
        assert_eq!(predictor.preprocess(&input).unwrap().values, vec![400.0, 1.0]);
        assert_eq!(predictor.predict(&input).unwrap(), 1.2);
    }

    #[test]
    fn test_value_prediction_without_feature_names() {
        let predictor = ValuePredictor::new(Arc::new(MockValueRegressor::new(1.2)));
        assert!(!predictor.has_feature_names());

        let err = predictor.predict(&ValueInput::default()).unwrap_err();
        assert!(matches!(err, InferenceError::Features(FeatureError::Configuration(_))));
    }
}
