//! Value-for-Money Feature Assembly

use crate::error::FeatureError;
use crate::schema::{CategoryFamily, FeatureSchema};
use data_validator::RequestFields;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default purchase year when the request omits it
pub const DEFAULT_PURCHASE_YEAR: i64 = 2020;
/// Default current year when the request omits it
pub const DEFAULT_CURRENT_YEAR: i64 = 2025;
/// Default vehicle type when the request omits it
pub const DEFAULT_VEHICLE_TYPE: &str = "Car";

/// Parsed value-analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueInput {
    pub brand: String,
    pub model: String,
    pub vehicle_type: String,
    pub initial_battery_capacity_kwh: f64,
    pub current_battery_capacity_kwh: f64,
    pub battery_health_pct: f64,
    pub range_km: f64,
    pub top_speed_kmph: f64,
    pub odometer_km: f64,
    pub warranty_remaining_years: f64,
    pub annual_maintenance_cost: f64,
    pub purchase_year: i64,
    pub current_year: i64,
    /// Purchase price (lakh)
    pub purchase_price: f64,
    pub initial_mileage: f64,
    pub current_mileage: f64,
    pub initial_perf: f64,
    pub current_perf: f64,
    /// Asking resale value (lakh)
    pub resale_value: f64,
}

impl Default for ValueInput {
    fn default() -> Self {
        Self {
            brand: String::new(),
            model: String::new(),
            vehicle_type: DEFAULT_VEHICLE_TYPE.to_string(),
            initial_battery_capacity_kwh: 0.0,
            current_battery_capacity_kwh: 0.0,
            battery_health_pct: 0.0,
            range_km: 0.0,
            top_speed_kmph: 0.0,
            odometer_km: 0.0,
            warranty_remaining_years: 0.0,
            annual_maintenance_cost: 0.0,
            purchase_year: DEFAULT_PURCHASE_YEAR,
            current_year: DEFAULT_CURRENT_YEAR,
            purchase_price: 0.0,
            initial_mileage: 0.0,
            current_mileage: 0.0,
            initial_perf: 0.0,
            current_perf: 0.0,
            resale_value: 0.0,
        }
    }
}

impl ValueInput {
    /// Read every field, applying defaults for absent ones
    pub fn from_fields(fields: &RequestFields) -> Result<Self, FeatureError> {
        Ok(Self {
            brand: fields.text_or("brand", ""),
            model: fields.text_or("model", ""),
            vehicle_type: fields.text_or("vehicle_type", DEFAULT_VEHICLE_TYPE),
            initial_battery_capacity_kwh: fields.f64_or("initial_battery_capacity_kwh", 0.0)?,
            current_battery_capacity_kwh: fields.f64_or("current_battery_capacity_kwh", 0.0)?,
            battery_health_pct: fields.f64_or("battery_health_pct", 0.0)?,
            range_km: fields.f64_or("range_km", 0.0)?,
            top_speed_kmph: fields.f64_or("top_speed_kmph", 0.0)?,
            odometer_km: fields.f64_or("odometer_km", 0.0)?,
            warranty_remaining_years: fields.f64_or("warranty_remaining_years", 0.0)?,
            annual_maintenance_cost: fields.f64_or("annual_maintenance_cost", 0.0)?,
            purchase_year: fields.i64_or("Purchase_Year", DEFAULT_PURCHASE_YEAR)?,
            current_year: fields.i64_or("Current_Year", DEFAULT_CURRENT_YEAR)?,
            purchase_price: fields.f64_or("Purchase_Price_L", 0.0)?,
            initial_mileage: fields.f64_or("Initial_Mileage", 0.0)?,
            current_mileage: fields.f64_or("Current_Mileage", 0.0)?,
            initial_perf: fields.f64_or("Initial_Perf", 0.0)?,
            current_perf: fields.f64_or("Current_Perf", 0.0)?,
            resale_value: fields.f64_or("Resale_Value_L", 0.0)?,
        })
    }

    /// Years between purchase and now
    pub fn vehicle_age(&self) -> i64 {
        self.current_year - self.purchase_year
    }

    /// Compute the derived features
    pub fn derived(&self) -> DerivedFeatures {
        let battery_loss_pct = if self.initial_battery_capacity_kwh > 0.0 {
            (self.initial_battery_capacity_kwh - self.current_battery_capacity_kwh)
                / self.initial_battery_capacity_kwh
                * 100.0
        } else {
            0.0
        };

        let battery_efficiency = if self.current_battery_capacity_kwh > 0.0 {
            self.range_km / self.current_battery_capacity_kwh
        } else {
            0.0
        };

        DerivedFeatures {
            vehicle_age: self.vehicle_age(),
            battery_loss_pct,
            performance_drop: self.initial_perf - self.current_perf,
            battery_efficiency,
        }
    }

    /// Value of one of the request's own numeric fields
    pub fn raw_feature(&self, name: &str) -> Option<f64> {
        let value = match name {
            "initial_battery_capacity_kwh" => self.initial_battery_capacity_kwh,
            "current_battery_capacity_kwh" => self.current_battery_capacity_kwh,
            "battery_health_pct" => self.battery_health_pct,
            "range_km" => self.range_km,
            "top_speed_kmph" => self.top_speed_kmph,
            "odometer_km" => self.odometer_km,
            "warranty_remaining_years" => self.warranty_remaining_years,
            "annual_maintenance_cost" => self.annual_maintenance_cost,
            "Purchase_Year" => self.purchase_year as f64,
            "Current_Year" => self.current_year as f64,
            "Purchase_Price_L" => self.purchase_price,
            "Initial_Mileage" => self.initial_mileage,
            "Current_Mileage" => self.current_mileage,
            "Initial_Perf" => self.initial_perf,
            "Current_Perf" => self.current_perf,
            "Resale_Value_L" => self.resale_value,
            _ => return None,
        };
        Some(value)
    }

    /// Category value for a one-hot family
    pub fn category(&self, family: CategoryFamily) -> &str {
        match family {
            CategoryFamily::Brand => self.brand.as_str(),
            CategoryFamily::Model => self.model.as_str(),
            CategoryFamily::VehicleType => self.vehicle_type.as_str(),
        }
    }
}

/// Features computed from the raw inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatures {
    pub vehicle_age: i64,
    pub battery_loss_pct: f64,
    pub performance_drop: f64,
    pub battery_efficiency: f64,
}

impl DerivedFeatures {
    /// Derived value by column name
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "vehicle_age" => Some(self.vehicle_age as f64),
            "battery_loss_pct" => Some(self.battery_loss_pct),
            "performance_drop" => Some(self.performance_drop),
            "battery_efficiency" => Some(self.battery_efficiency),
            _ => None,
        }
    }
}

/// Single model input row, one value per schema column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueFeatureRow {
    pub values: Vec<f64>,
}

impl ValueFeatureRow {
    /// Values in schema order
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no columns
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builds value regressor input rows against a fixed schema
#[derive(Debug, Clone)]
pub struct ValueFeatureBuilder {
    schema: FeatureSchema,
}

impl ValueFeatureBuilder {
    /// Create a builder for a known schema
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    /// Create a builder from the feature names a model exposes.
    ///
    /// A model that does not expose its training columns cannot be fed.
    pub fn from_feature_names(names: Option<&[String]>) -> Result<Self, FeatureError> {
        let names = names.ok_or_else(|| {
            FeatureError::Configuration("model feature names not available".to_string())
        })?;
        Ok(Self::new(FeatureSchema::new(names.iter().cloned())))
    }

    /// Schema the builder targets
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Build a row: zeros everywhere, numeric columns filled, one indicator
    /// per categorical field when the model was trained on that value.
    pub fn build(&self, input: &ValueInput) -> ValueFeatureRow {
        let mut values = vec![0.0; self.schema.len()];
        let derived = input.derived();

        for &(name, idx) in self.schema.numeric_columns() {
            if let Some(value) = input.raw_feature(name).or_else(|| derived.get(name)) {
                values[idx] = value;
            }
        }

        for family in CategoryFamily::ALL {
            let category = input.category(family);
            match self.schema.one_hot_index(family, category) {
                Some(idx) => values[idx] = 1.0,
                None => debug!(
                    family = ?family,
                    value = %category,
                    "Category not seen in training, leaving indicators unset"
                ),
            }
        }

        ValueFeatureRow { values }
    }

    /// Parse a request and build its row
    pub fn preprocess(&self, fields: &RequestFields) -> Result<ValueFeatureRow, FeatureError> {
        let input = ValueInput::from_fields(fields)?;
        Ok(self.build(&input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::VALUE_NUMERIC_FEATURES;
    use proptest::prelude::*;
    use serde_json::json;

    fn tesla_request() -> RequestFields {
        RequestFields::from_value(json!({
            "brand": "Tesla",
            "model": "Model 3",
            "vehicle_type": "Car",
            "initial_battery_capacity_kwh": 75.0,
            "current_battery_capacity_kwh": 70.0,
            "battery_health_pct": 93.3,
            "range_km": 450.0,
            "top_speed_kmph": 225.0,
            "odometer_km": 30000.0,
            "warranty_remaining_years": 4.5,
            "annual_maintenance_cost": 5000.0,
            "Purchase_Year": 2022,
            "Current_Year": 2025,
            "Purchase_Price_L": 45.0,
            "Initial_Mileage": 150.0,
            "Current_Mileage": 140.0,
            "Initial_Perf": 9.0,
            "Current_Perf": 8.5,
            "Resale_Value_L": 30.0
        }))
        .unwrap()
    }

    fn full_schema(extra: &[&str]) -> FeatureSchema {
        FeatureSchema::new(
            VALUE_NUMERIC_FEATURES
                .iter()
                .chain(extra.iter())
                .map(|s| s.to_string()),
        )
    }

    #[test]
    fn test_derived_features() {
        let input = ValueInput::from_fields(&tesla_request()).unwrap();
        let derived = input.derived();

        assert_eq!(derived.vehicle_age, 3);
        assert!((derived.battery_loss_pct - 6.666_666).abs() < 1e-3);
        assert!((derived.performance_drop - 0.5).abs() < 1e-9);
        assert!((derived.battery_efficiency - 450.0 / 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_derived_features_zero_capacity() {
        let input = ValueInput {
            range_km: 300.0,
            ..Default::default()
        };
        let derived = input.derived();
        assert_eq!(derived.battery_loss_pct, 0.0);
        assert_eq!(derived.battery_efficiency, 0.0);
        assert_eq!(derived.vehicle_age, 5);
    }

    #[test]
    fn test_defaults_for_absent_fields() {
        let fields = RequestFields::from_value(json!({})).unwrap();
        let input = ValueInput::from_fields(&fields).unwrap();
        assert_eq!(input, ValueInput::default());
    }

    #[test]
    fn test_null_field_is_preprocessing_error() {
        let fields = RequestFields::from_value(json!({"range_km": null})).unwrap();
        let err = ValueInput::from_fields(&fields).unwrap_err();
        assert!(matches!(err, FeatureError::Preprocessing(_)));
        assert!(err.to_string().starts_with("Preprocessing error:"));
    }

    #[test]
    fn test_row_sets_one_indicator_per_family() {
        let schema = full_schema(&[
            "brand_Tesla",
            "brand_Tata",
            "model_Model 3",
            "model_Nexon EV",
            "vehicle_type_Car",
            "vehicle_type_Scooter",
        ]);
        let builder = ValueFeatureBuilder::new(schema.clone());
        let row = builder.preprocess(&tesla_request()).unwrap();

        assert_eq!(row.len(), schema.len());
        let at = |name: &str| row.values[schema.column_index(name).unwrap()];
        assert_eq!(at("brand_Tesla"), 1.0);
        assert_eq!(at("brand_Tata"), 0.0);
        assert_eq!(at("model_Model 3"), 1.0);
        assert_eq!(at("model_Nexon EV"), 0.0);
        assert_eq!(at("vehicle_type_Car"), 1.0);
        assert_eq!(at("vehicle_type_Scooter"), 0.0);
        assert_eq!(at("Purchase_Year"), 2022.0);
        assert_eq!(at("vehicle_age"), 3.0);
        assert_eq!(at("battery_health_pct"), 93.3);
    }

    #[test]
    fn test_unknown_categories_silently_dropped() {
        let schema = full_schema(&["brand_Tata", "model_Nexon EV", "vehicle_type_Scooter"]);
        let builder = ValueFeatureBuilder::new(schema.clone());
        let row = builder.preprocess(&tesla_request()).unwrap();

        let one_hot_total: f64 = row.values[VALUE_NUMERIC_FEATURES.len()..].iter().sum();
        assert_eq!(one_hot_total, 0.0);
    }

    #[test]
    fn test_columns_follow_model_order() {
        let schema = FeatureSchema::new(["vehicle_type_Car", "range_km", "brand_Tesla"]);
        let row = ValueFeatureBuilder::new(schema).preprocess(&tesla_request()).unwrap();
        assert_eq!(row.values, vec![1.0, 450.0, 1.0]);
    }

    #[test]
    fn test_missing_feature_names_is_configuration_error() {
        let err = ValueFeatureBuilder::from_feature_names(None).unwrap_err();
        assert!(matches!(err, FeatureError::Configuration(_)));

        let names = vec!["range_km".to_string()];
        let builder = ValueFeatureBuilder::from_feature_names(Some(&names)).unwrap();
        assert_eq!(builder.schema().len(), 1);
    }

    proptest! {
        #[test]
        fn prop_row_width_matches_schema(
            brand in "[A-Za-z]{1,8}",
            extra in proptest::collection::vec("x_[a-z]{1,10}", 0..8),
        ) {
            let mut names: Vec<String> = VALUE_NUMERIC_FEATURES.iter().map(|s| s.to_string()).collect();
            names.extend(extra);
            names.push(format!("brand_{brand}"));
            let schema = FeatureSchema::new(names.clone());
            let input = ValueInput { brand: brand.clone(), ..Default::default() };
            let row = ValueFeatureBuilder::new(schema).build(&input);

            prop_assert_eq!(row.len(), names.len());
            prop_assert!(row.values.iter().all(|v| v.is_finite()));
            prop_assert_eq!(row.values[names.len() - 1], 1.0);
        }
    }
}
