//! Service Context

use crate::config::ModelsConfig;
use inference_engine::{
    load_health_labels, HealthClassifier, HealthPredictor, LabelEncoder, OnnxHealthClassifier,
    OnnxValueRegressor, ValuePredictor, ValueRegressor,
};
use insights::SelectionPolicy;
use sales_forecast::{SalesForecaster, SeasonalForecastModel, SeriesModel};
use std::sync::Arc;
use tracing::{info, warn};

/// Models and policies shared by every handler; built once, never mutated.
///
/// A model that failed to load is `None`, and its route answers 500.
#[derive(Clone, Default)]
pub struct AppState {
    pub health: Option<HealthPredictor>,
    pub value: Option<ValuePredictor>,
    pub sales: Option<SalesForecaster>,
    pub selection: SelectionPolicy,
}

impl AppState {
    /// State with no models loaded
    pub fn new(selection: SelectionPolicy) -> Self {
        Self {
            selection,
            ..Default::default()
        }
    }

    /// Load every artifact, logging and skipping the ones that fail
    pub fn load(models: &ModelsConfig, selection: SelectionPolicy) -> Self {
        let health = match OnnxHealthClassifier::load(&models.health_model_path) {
            Ok(classifier) => {
                let labels = load_health_labels(&models.health_dataset_path);
                Some(HealthPredictor::new(Arc::new(classifier), labels))
            }
            Err(e) => {
                warn!(error = %e, "Health model unavailable");
                None
            }
        };

        let value = match OnnxValueRegressor::load(
            &models.value_model_path,
            &models.value_features_path,
        ) {
            Ok(regressor) => Some(ValuePredictor::new(Arc::new(regressor))),
            Err(e) => {
                warn!(error = %e, "Value model unavailable");
                None
            }
        };

        let sales = match SeasonalForecastModel::load(&models.sales_model_path) {
            Ok(model) => Some(SalesForecaster::new(Arc::new(model))),
            Err(e) => {
                warn!(error = %e, "Sales model unavailable");
                None
            }
        };

        let state = Self {
            health,
            value,
            sales,
            selection,
        };
        info!(
            health_model_loaded = state.health.is_some(),
            value_model_loaded = state.value.is_some(),
            value_feature_names = state.value.as_ref().is_some_and(ValuePredictor::has_feature_names),
            sales_model_loaded = state.sales.is_some(),
            "Service state ready"
        );
        state
    }

    pub fn with_health_model(
        mut self,
        classifier: Arc<dyn HealthClassifier>,
        labels: Option<LabelEncoder>,
    ) -> Self {
        self.health = Some(HealthPredictor::new(classifier, labels));
        self
    }

    pub fn with_value_model(mut self, regressor: Arc<dyn ValueRegressor>) -> Self {
        self.value = Some(ValuePredictor::new(regressor));
        self
    }

    pub fn with_sales_model(mut self, model: Arc<dyn SeriesModel>) -> Self {
        self.sales = Some(SalesForecaster::new(model));
        self
    }
}
