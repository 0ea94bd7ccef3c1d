//! Rule-Based Insights
//!
//! Turns model outputs into the text shown to users: health
//! recommendations and risk levels, and value-for-money tiers with their
//! rationale.

mod format;
mod health;
mod selection;
mod value;

pub use format::{group_thousands, join_reasons, py_float, rupee_range};
pub use health::{
    calculate_risk_level, insight, recommendation, HealthContext, HealthStatus, RiskLevel,
};
pub use selection::{
    FirstNSelector, RandomSelector, ReasonSelector, SelectionPolicy, SelectionStrategy,
    MAX_REASONS,
};
pub use value::{analyze, ValueAssessment, ValueTier};

