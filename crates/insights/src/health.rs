//! Battery Health Recommendations

use crate::format::py_float;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Health class, parsed from a predicted label ignoring case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Moderate,
    Degraded,
}

impl HealthStatus {
    /// Parse a label; unknown labels give `None`
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "healthy" => Some(Self::Healthy),
            "moderate" => Some(Self::Moderate),
            "degraded" => Some(Self::Degraded),
            _ => None,
        }
    }
}

/// Measurements quoted in the narrative insight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthContext {
    pub charge_cycles: i64,
    pub max_temperature: f64,
    pub capacity_retention: f64,
}

/// Replacement risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maintenance recommendation for a predicted label
pub fn recommendation(label: &str) -> &'static str {
    match HealthStatus::from_label(label) {
        Some(HealthStatus::Healthy) => "Battery is in good condition. Continue normal usage.",
        Some(HealthStatus::Moderate) => {
            "Battery health is moderate. Avoid overcharging and monitor performance. And also try to replace the battery within 1 year. "
        }
        Some(HealthStatus::Degraded) => {
            "Battery health is poor. Replacement is needed, try to replace the battery within 6 months."
        }
        None => "No recommendation available.",
    }
}

/// Narrative explanation of a predicted label
pub fn insight(label: &str, ctx: &HealthContext) -> String {
    let cycles = ctx.charge_cycles;
    let max_temp = py_float(ctx.max_temperature);
    let retention = py_float(ctx.capacity_retention);

    match HealthStatus::from_label(label) {
        Some(HealthStatus::Healthy) => format!(
            "With only {} charge cycles and stable temperature around {}°C, the battery maintains strong capacity retention at {}%, indicating minimal degradation.",
            cycles, max_temp, retention
        ),
        Some(HealthStatus::Moderate) => format!(
            "Increasing charge cycles ({}) and moderate thermal exposure near {}°C are gradually impacting performance, with capacity retention at {}%.",
            cycles, max_temp, retention
        ),
        Some(HealthStatus::Degraded) => format!(
            "High thermal stress above {}°C combined with excessive {} charge cycles and reduced capacity retention ({}%) indicates advanced battery degradation.",
            max_temp, cycles, retention
        ),
        None => "No detailed insight available.".to_string(),
    }
}

/// Risk from measurements alone, independent of the predicted label
pub fn calculate_risk_level(capacity_retention: f64, charge_cycles: i64, max_temp: f64) -> RiskLevel {
    if capacity_retention > 90.0 && charge_cycles < 500 && max_temp < 40.0 {
        RiskLevel::Low
    } else if (75.0..=90.0).contains(&capacity_retention) {
        RiskLevel::Moderate
    } else {
        RiskLevel::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ctx() -> HealthContext {
        HealthContext {
            charge_cycles: 320,
            max_temperature: 38.0,
            capacity_retention: 93.3,
        }
    }

    #[test]
    fn test_recommendation_ignores_case() {
        assert_eq!(
            recommendation("HEALTHY"),
            "Battery is in good condition. Continue normal usage."
        );
        assert!(recommendation("moderate").ends_with("within 1 year. "));
        assert!(recommendation("Degraded").starts_with("Battery health is poor."));
        assert_eq!(recommendation("Critical"), "No recommendation available.");
    }

    #[test]
    fn test_insight_text() {
        assert_eq!(
            insight("Healthy", &ctx()),
            "With only 320 charge cycles and stable temperature around 38.0°C, the battery maintains strong capacity retention at 93.3%, indicating minimal degradation."
        );
        assert_eq!(
            insight("degraded", &ctx()),
            "High thermal stress above 38.0°C combined with excessive 320 charge cycles and reduced capacity retention (93.3%) indicates advanced battery degradation."
        );
        assert!(insight("Moderate", &ctx()).starts_with("Increasing charge cycles (320)"));
        assert_eq!(insight("Unknown", &ctx()), "No detailed insight available.");
    }

    #[test]
    fn test_risk_levels() {
        assert_eq!(calculate_risk_level(95.0, 100, 30.0), RiskLevel::Low);
        assert_eq!(calculate_risk_level(80.0, 1000, 50.0), RiskLevel::Moderate);
        assert_eq!(calculate_risk_level(95.0, 600, 30.0), RiskLevel::High);
        assert_eq!(calculate_risk_level(91.0, 600, 30.0), RiskLevel::High);
        assert_eq!(calculate_risk_level(95.0, 100, 45.0), RiskLevel::High);
        assert_eq!(calculate_risk_level(90.0, 100, 30.0), RiskLevel::Moderate);
        assert_eq!(calculate_risk_level(74.9, 100, 30.0), RiskLevel::High);
    }

    #[test]
    fn test_risk_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&RiskLevel::Moderate).unwrap(), "\"MODERATE\"");
        assert_eq!(RiskLevel::Low.to_string(), "LOW");
    }

    proptest! {
        #[test]
        fn prop_moderate_band(retention in 75.0f64..=90.0, cycles in 0i64..5000, temp in -20.0f64..80.0) {
            prop_assert_eq!(calculate_risk_level(retention, cycles, temp), RiskLevel::Moderate);
        }

        #[test]
        fn prop_low_requires_all_conditions(retention in 0.0f64..120.0, cycles in 0i64..5000, temp in -20.0f64..80.0) {
            let low = calculate_risk_level(retention, cycles, temp) == RiskLevel::Low;
            prop_assert_eq!(low, retention > 90.0 && cycles < 500 && temp < 40.0);
        }
    }
}
