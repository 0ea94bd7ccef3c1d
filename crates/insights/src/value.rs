//! Value-for-Money Assessment
//!
//! Maps a regressor score and the request that produced it to a price
//! tier, a short rationale and, for overpriced vehicles, a suggested price
//! band.

use crate::format::{group_thousands, join_reasons, py_float, rupee_range};
use crate::selection::{ReasonSelector, MAX_REASONS};
use feature_engine::ValueInput;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

const NEGOTIATE: &str = "Consider negotiation or look for better deals.";

/// Price tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueTier {
    #[serde(rename = "Excellent Price")]
    Excellent,
    #[serde(rename = "Fair Price")]
    Fair,
    #[serde(rename = "Overpriced")]
    Overpriced,
}

impl ValueTier {
    /// Tier for a score alone
    pub fn from_score(score: f64) -> Self {
        if score > 1.0 {
            Self::Excellent
        } else if score >= 0.9 {
            Self::Fair
        } else {
            Self::Overpriced
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent Price",
            Self::Fair => "Fair Price",
            Self::Overpriced => "Overpriced",
        }
    }
}

impl fmt::Display for ValueTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a value analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueAssessment {
    pub score: f64,
    pub recommendation: ValueTier,
    pub insights: Vec<String>,
    pub fair_price_range: Option<String>,
}

/// Classify a scored request and explain the result.
///
/// An asking price above the purchase price is always overpriced,
/// whatever the score.
pub fn analyze(score: f64, input: &ValueInput, selector: &mut dyn ReasonSelector) -> ValueAssessment {
    if input.resale_value > input.purchase_price {
        debug!(
            score,
            resale_value = input.resale_value,
            purchase_price = input.purchase_price,
            "Resale value above purchase price"
        );
        return ValueAssessment {
            score,
            recommendation: ValueTier::Overpriced,
            insights: vec![
                "⚠️ The resale value exceeds the purchase price, indicating the vehicle is overpriced."
                    .to_string(),
                NEGOTIATE.to_string(),
            ],
            fair_price_range: Some(rupee_range(
                input.purchase_price * 0.50,
                input.purchase_price * 0.70,
            )),
        };
    }

    let tier = ValueTier::from_score(score);
    let mut insights = Vec::with_capacity(2);
    let mut fair_price_range = None;

    match tier {
        ValueTier::Excellent => {
            let reasons = excellent_reasons(input);
            if reasons.is_empty() {
                insights.push(
                    "✅ The vehicle is priced significantly below market value, offering a great deal."
                        .to_string(),
                );
            } else {
                let chosen = selector.select(reasons, MAX_REASONS);
                insights.push(format!(
                    "✅ The vehicle delivers exceptional value with {}.",
                    join_reasons(&chosen)
                ));
            }
        }
        ValueTier::Fair => {
            let chosen = selector.select(fair_reasons(input), MAX_REASONS);
            insights.push(format!(
                "👍 The pricing is reasonable considering {}.",
                join_reasons(&chosen)
            ));
        }
        ValueTier::Overpriced => {
            let chosen = selector.select(overpriced_reasons(input), MAX_REASONS);
            insights.push(format!(
                "The vehicle appears overpriced mainly due to {}.",
                join_reasons(&chosen)
            ));
            fair_price_range = Some(rupee_range(
                input.resale_value * 0.60,
                input.resale_value * 0.80,
            ));
            insights.push(NEGOTIATE.to_string());
        }
    }

    debug!(score, tier = tier.as_str(), "Value assessed");

    ValueAssessment {
        score,
        recommendation: tier,
        insights,
        fair_price_range,
    }
}

fn excellent_reasons(input: &ValueInput) -> Vec<String> {
    let mut reasons = Vec::new();
    if input.battery_health_pct >= 90.0 {
        reasons.push(format!("battery health at {}%", py_float(input.battery_health_pct)));
    }
    if input.warranty_remaining_years >= 5.0 {
        reasons.push(format!(
            "{} years warranty remaining",
            input.warranty_remaining_years as i64
        ));
    }
    if input.odometer_km < 40_000.0 {
        reasons.push(format!(
            "only {} km driven",
            group_thousands(input.odometer_km as i64)
        ));
    }
    if input.vehicle_age() <= 2 {
        reasons.push(format!("a relatively new {} model", input.purchase_year));
    }
    reasons
}

fn fair_reasons(input: &ValueInput) -> Vec<String> {
    vec![
        format!("battery health at {}%", py_float(input.battery_health_pct)),
        format!("{} km usage", group_thousands(input.odometer_km as i64)),
        format!("{} years warranty left", input.warranty_remaining_years as i64),
        format!("{} years vehicle age", input.vehicle_age()),
    ]
}

fn overpriced_reasons(input: &ValueInput) -> Vec<String> {
    let mut reasons = Vec::new();
    if input.battery_health_pct < 80.0 {
        reasons.push("battery wear over time".to_string());
    }
    if input.odometer_km > 80_000.0 {
        reasons.push("higher accumulated mileage".to_string());
    }
    if input.warranty_remaining_years <= 1.0 {
        reasons.push("limited remaining warranty".to_string());
    }
    if input.vehicle_age() >= 6 {
        reasons.push("age-related depreciation".to_string());
    }
    if reasons.is_empty() {
        reasons.push("overall market depreciation factors".to_string());
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{FirstNSelector, RandomSelector};
    use proptest::prelude::*;

    fn input() -> ValueInput {
        ValueInput {
            brand: "Tesla".into(),
            model: "Model 3".into(),
            battery_health_pct: 98.0,
            odometer_km: 25_000.0,
            warranty_remaining_years: 6.0,
            purchase_year: 2024,
            current_year: 2025,
            purchase_price: 45.0,
            resale_value: 38.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(ValueTier::from_score(1.01), ValueTier::Excellent);
        assert_eq!(ValueTier::from_score(1.0), ValueTier::Fair);
        assert_eq!(ValueTier::from_score(0.9), ValueTier::Fair);
        assert_eq!(ValueTier::from_score(0.89), ValueTier::Overpriced);
    }

    #[test]
    fn test_excellent_with_reasons() {
        let result = analyze(1.2, &input(), &mut FirstNSelector);
        assert_eq!(result.recommendation, ValueTier::Excellent);
        assert_eq!(
            result.insights,
            vec![
                "✅ The vehicle delivers exceptional value with battery health at 98.0%, 6 years warranty remaining and only 25,000 km driven."
            ]
        );
        assert_eq!(result.fair_price_range, None);
    }

    #[test]
    fn test_excellent_without_reasons() {
        let input = ValueInput {
            battery_health_pct: 70.0,
            odometer_km: 90_000.0,
            warranty_remaining_years: 0.0,
            purchase_year: 2015,
            ..input()
        };
        let result = analyze(1.5, &input, &mut FirstNSelector);
        assert_eq!(
            result.insights,
            vec!["✅ The vehicle is priced significantly below market value, offering a great deal."]
        );
    }

    #[test]
    fn test_fair_random_membership() {
        let expected = fair_reasons(&input());
        assert_eq!(
            expected,
            vec![
                "battery health at 98.0%",
                "25,000 km usage",
                "6 years warranty left",
                "1 years vehicle age"
            ]
        );

        let mut selector = RandomSelector::from_entropy();
        for _ in 0..20 {
            let result = analyze(0.95, &input(), &mut selector);
            assert_eq!(result.recommendation, ValueTier::Fair);
            assert_eq!(result.insights.len(), 1);

            let text = &result.insights[0];
            let body = text
                .strip_prefix("👍 The pricing is reasonable considering ")
                .and_then(|t| t.strip_suffix('.'))
                .unwrap();
            let quoted = expected.iter().filter(|r| body.contains(r.as_str())).count();
            assert_eq!(quoted, 3);
        }
    }

    #[test]
    fn test_overpriced_by_score() {
        let input = ValueInput {
            battery_health_pct: 75.0,
            odometer_km: 85_000.0,
            resale_value: 10.0,
            ..input()
        };
        let result = analyze(0.5, &input, &mut FirstNSelector);
        assert_eq!(result.recommendation, ValueTier::Overpriced);
        assert_eq!(
            result.insights,
            vec![
                "The vehicle appears overpriced mainly due to battery wear over time and higher accumulated mileage.",
                NEGOTIATE
            ]
        );
        assert_eq!(result.fair_price_range.as_deref(), Some("₹6 - ₹8"));
    }

    #[test]
    fn test_overpriced_fallback_reason() {
        let result = analyze(0.5, &input(), &mut FirstNSelector);
        assert_eq!(
            result.insights[0],
            "The vehicle appears overpriced mainly due to overall market depreciation factors."
        );
    }

    #[test]
    fn test_resale_above_purchase_overrides_score() {
        let input = ValueInput {
            purchase_price: 1_000_000.0,
            resale_value: 1_200_000.0,
            ..input()
        };
        let result = analyze(1.4, &input, &mut FirstNSelector);
        assert_eq!(result.recommendation, ValueTier::Overpriced);
        assert_eq!(result.score, 1.4);
        assert_eq!(
            result.fair_price_range.as_deref(),
            Some("₹500,000 - ₹700,000")
        );
        assert_eq!(
            result.insights,
            vec![
                "⚠️ The resale value exceeds the purchase price, indicating the vehicle is overpriced.",
                NEGOTIATE
            ]
        );
    }

    #[test]
    fn test_tier_serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&ValueTier::Excellent).unwrap(),
            "\"Excellent Price\""
        );
    }

    proptest! {
        #[test]
        fn prop_override_always_overpriced(score in -5.0f64..5.0, purchase in 0.0f64..100.0, extra in 0.01f64..50.0) {
            let input = ValueInput {
                purchase_price: purchase,
                resale_value: purchase + extra,
                ..input()
            };
            let result = analyze(score, &input, &mut FirstNSelector);
            prop_assert_eq!(result.recommendation, ValueTier::Overpriced);
            prop_assert!(result.fair_price_range.is_some());
        }

        #[test]
        fn prop_at_most_three_reasons(score in 0.0f64..2.0, health in 0.0f64..100.0, odo in 0.0f64..200_000.0) {
            let input = ValueInput {
                battery_health_pct: health,
                odometer_km: odo,
                ..input()
            };
            let result = analyze(score, &input, &mut RandomSelector::seeded(1));
            let sentence = &result.insights[0];
            prop_assert!(sentence.matches(" and ").count() <= 1);
            prop_assert!(sentence.matches(", ").count() <= 2);
        }
    }
}
