//! Value Model Feature Schema
//!
//! The regressor was trained on a fixed table: the numeric inputs, four
//! derived columns and one-hot columns for every brand, model and vehicle
//! type seen during training. The schema is read once from the model's
//! declared feature names and turned into index lookups so that building a
//! row never has to compose or compare column strings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Raw and derived numeric columns the builder knows how to fill
pub const VALUE_NUMERIC_FEATURES: [&str; 20] = [
    "initial_battery_capacity_kwh",
    "current_battery_capacity_kwh",
    "battery_health_pct",
    "range_km",
    "top_speed_kmph",
    "odometer_km",
    "warranty_remaining_years",
    "annual_maintenance_cost",
    "Purchase_Year",
    "Current_Year",
    "Purchase_Price_L",
    "Initial_Mileage",
    "Current_Mileage",
    "Initial_Perf",
    "Current_Perf",
    "Resale_Value_L",
    "vehicle_age",
    "battery_loss_pct",
    "performance_drop",
    "battery_efficiency",
];

/// Categorical request fields that were one-hot encoded at training time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryFamily {
    Brand,
    Model,
    VehicleType,
}

impl CategoryFamily {
    /// All families, in request order
    pub const ALL: [CategoryFamily; 3] = [
        CategoryFamily::Brand,
        CategoryFamily::Model,
        CategoryFamily::VehicleType,
    ];

    /// Column name prefix used by the training pipeline
    pub fn prefix(&self) -> &'static str {
        match self {
            CategoryFamily::Brand => "brand_",
            CategoryFamily::Model => "model_",
            CategoryFamily::VehicleType => "vehicle_type_",
        }
    }
}

/// Column layout of the value regressor
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    numeric: Vec<(&'static str, usize)>,
    one_hot: HashMap<CategoryFamily, HashMap<String, usize>>,
}

impl FeatureSchema {
    /// Build the schema from the model's feature names, in model order
    pub fn new<I, S>(feature_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = feature_names.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(columns.len());
        let mut numeric = Vec::new();
        let mut one_hot: HashMap<CategoryFamily, HashMap<String, usize>> = HashMap::new();

        for (idx, column) in columns.iter().enumerate() {
            if index.contains_key(column) {
                warn!(column = %column, "Duplicate feature column, keeping first occurrence");
                continue;
            }
            index.insert(column.clone(), idx);

            if let Some(name) = VALUE_NUMERIC_FEATURES.iter().find(|n| **n == column.as_str()) {
                numeric.push((*name, idx));
                continue;
            }

            let family = CategoryFamily::ALL
                .into_iter()
                .find_map(|f| column.strip_prefix(f.prefix()).map(|value| (f, value)));
            match family {
                Some((family, value)) => {
                    one_hot
                        .entry(family)
                        .or_default()
                        .insert(value.to_string(), idx);
                }
                None => debug!(column = %column, "Feature column is neither numeric nor one-hot"),
            }
        }

        info!(
            columns = columns.len(),
            numeric = numeric.len(),
            brands = one_hot.get(&CategoryFamily::Brand).map_or(0, HashMap::len),
            models = one_hot.get(&CategoryFamily::Model).map_or(0, HashMap::len),
            vehicle_types = one_hot.get(&CategoryFamily::VehicleType).map_or(0, HashMap::len),
            "Feature schema built"
        );

        Self {
            columns,
            index,
            numeric,
            one_hot,
        }
    }

    /// Column names in model order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Numeric columns present in the model, with their positions
    pub fn numeric_columns(&self) -> &[(&'static str, usize)] {
        &self.numeric
    }

    /// Position of the one-hot column for a category value, if trained
    pub fn one_hot_index(&self, family: CategoryFamily, value: &str) -> Option<usize> {
        self.one_hot.get(&family).and_then(|values| values.get(value)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::new([
            "battery_health_pct",
            "brand_Tesla",
            "model_Model 3",
            "vehicle_type_Car",
            "vehicle_age",
            "brand_Tata",
            "dealer_rating",
        ])
    }

    #[test]
    fn test_numeric_columns_indexed() {
        let schema = schema();
        assert_eq!(schema.len(), 7);
        assert_eq!(
            schema.numeric_columns(),
            &[("battery_health_pct", 0), ("vehicle_age", 4)]
        );
    }

    #[test]
    fn test_one_hot_lookup() {
        let schema = schema();
        assert_eq!(schema.one_hot_index(CategoryFamily::Brand, "Tesla"), Some(1));
        assert_eq!(schema.one_hot_index(CategoryFamily::Model, "Model 3"), Some(2));
        assert_eq!(schema.one_hot_index(CategoryFamily::VehicleType, "Car"), Some(3));
        assert_eq!(schema.one_hot_index(CategoryFamily::Brand, "Model 3"), None);
        assert_eq!(schema.one_hot_index(CategoryFamily::Brand, "Tata"), Some(5));
    }

    #[test]
    fn test_unrecognised_column_kept_in_layout() {
        let schema = schema();
        assert_eq!(schema.column_index("dealer_rating"), Some(6));
    }

    #[test]
    fn test_duplicate_columns_keep_first() {
        let schema = FeatureSchema::new(["brand_Kia", "brand_Kia"]);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.one_hot_index(CategoryFamily::Brand, "Kia"), Some(0));
    }
}
