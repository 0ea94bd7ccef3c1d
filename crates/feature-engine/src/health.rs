//! Battery Health Feature Encoding

use data_validator::{RequestFields, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of features the health classifier consumes
pub const HEALTH_FEATURE_DIMENSION: usize = 10;

/// Feature names in classifier training order
pub const HEALTH_FEATURES: [&str; HEALTH_FEATURE_DIMENSION] = [
    "vehicle_age_years",
    "total_charge_cycles",
    "avg_depth_of_discharge_percent",
    "avg_charging_time_hours",
    "fast_charging_frequency_percent",
    "avg_battery_temperature_c",
    "max_battery_temperature_c",
    "avg_voltage",
    "internal_resistance_mohm",
    "capacity_retention_percent",
];

const CHARGE_CYCLES: usize = 1;
const MAX_TEMPERATURE: usize = 6;
const CAPACITY_RETENTION: usize = 9;

/// Ordered 1x10 feature vector for the health classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthFeatureVector {
    /// Values in `HEALTH_FEATURES` order
    pub values: [f64; HEALTH_FEATURE_DIMENSION],
}

impl HealthFeatureVector {
    /// Look up a feature by name
    pub fn get(&self, name: &str) -> Option<f64> {
        HEALTH_FEATURES
            .iter()
            .position(|f| *f == name)
            .map(|idx| self.values[idx])
    }

    /// Values as a slice, in training order
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Charge cycles, truncated to a whole count
    pub fn charge_cycles(&self) -> i64 {
        self.values[CHARGE_CYCLES].trunc() as i64
    }

    /// Peak battery temperature (°C)
    pub fn max_temperature(&self) -> f64 {
        self.values[MAX_TEMPERATURE]
    }

    /// Capacity retention (%)
    pub fn capacity_retention(&self) -> f64 {
        self.values[CAPACITY_RETENTION]
    }
}

/// Maps a request payload onto the classifier's feature order
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthFeatureEncoder;

impl HealthFeatureEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self
    }

    /// Extract the ten required fields in training order.
    ///
    /// Stops at the first missing or non-numeric field.
    pub fn encode(&self, fields: &RequestFields) -> Result<HealthFeatureVector, ValidationError> {
        let mut values = [0.0; HEALTH_FEATURE_DIMENSION];
        for (slot, name) in values.iter_mut().zip(HEALTH_FEATURES) {
            *slot = fields.require_f64(name)?;
        }

        debug!(
            charge_cycles = values[CHARGE_CYCLES],
            capacity_retention = values[CAPACITY_RETENTION],
            "Encoded health features"
        );

        Ok(HealthFeatureVector { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "vehicle_age_years": 3,
            "total_charge_cycles": 500,
            "avg_depth_of_discharge_percent": 60,
            "avg_charging_time_hours": 4,
            "fast_charging_frequency_percent": 20,
            "avg_battery_temperature_c": 30,
            "max_battery_temperature_c": 40,
            "avg_voltage": 350,
            "internal_resistance_mohm": 25,
            "capacity_retention_percent": 85
        })
    }

    #[test]
    fn test_encode_preserves_training_order() {
        let fields = RequestFields::from_value(sample()).unwrap();
        let features = HealthFeatureEncoder::new().encode(&fields).unwrap();

        assert_eq!(
            features.values,
            [3.0, 500.0, 60.0, 4.0, 20.0, 30.0, 40.0, 350.0, 25.0, 85.0]
        );
        assert_eq!(features.charge_cycles(), 500);
        assert_eq!(features.max_temperature(), 40.0);
        assert_eq!(features.capacity_retention(), 85.0);
        assert_eq!(features.get("avg_voltage"), Some(350.0));
        assert_eq!(features.get("unknown"), None);
    }

    #[test]
    fn test_encode_accepts_numeric_strings() {
        let mut payload = sample();
        payload["avg_voltage"] = json!("351.5");
        let fields = RequestFields::from_value(payload).unwrap();
        let features = HealthFeatureEncoder::new().encode(&fields).unwrap();
        assert_eq!(features.get("avg_voltage"), Some(351.5));
    }

    #[test]
    fn test_every_missing_field_is_named() {
        for name in HEALTH_FEATURES {
            let mut payload = sample();
            payload.as_object_mut().unwrap().remove(name);
            let fields = RequestFields::from_value(payload).unwrap();

            let err = HealthFeatureEncoder::new().encode(&fields).unwrap_err();
            assert_eq!(err, ValidationError::MissingField(name));
            assert!(err.to_string().contains(name));
        }
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let mut payload = sample();
        payload["internal_resistance_mohm"] = json!("high");
        let fields = RequestFields::from_value(payload).unwrap();
        let err = HealthFeatureEncoder::new().encode(&fields).unwrap_err();
        assert_eq!(err.field(), Some("internal_resistance_mohm"));
    }
}
