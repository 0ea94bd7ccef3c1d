//! Feature Engineering Engine
//!
//! Turns loosely-typed request payloads into the exact numeric inputs each
//! trained model expects.

mod error;
mod health;
mod schema;
mod value;

pub use error::FeatureError;
pub use health::{HealthFeatureEncoder, HealthFeatureVector, HEALTH_FEATURES, HEALTH_FEATURE_DIMENSION};
pub use schema::{CategoryFamily, FeatureSchema, VALUE_NUMERIC_FEATURES};
pub use value::{
    DerivedFeatures, ValueFeatureBuilder, ValueFeatureRow, ValueInput, DEFAULT_CURRENT_YEAR,
    DEFAULT_PURCHASE_YEAR, DEFAULT_VEHICLE_TYPE,
};
