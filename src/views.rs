//! Display-ready views derived from a committed [`DecisionResult`].
//!
//! Everything here is a pure function of its inputs and is recomputed on every render.

use crate::models::{Decision, DecisionResult, Recommendation};
use std::cmp::Ordering;

/// How many attributions the influence panel shows.
pub const TOP_ATTRIBUTIONS: usize = 5;

/// Length of the OOD gauge arc, in stroke units.
pub const GAUGE_ARC_LENGTH: f64 = 552.0;

// ============ Headline ============

/// The top-of-page verdict block.
#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    /// Upper-cased decision label, e.g. `DENIED`.
    pub verdict: String,
    pub decision: Decision,
    /// Risk as a percentage with one decimal, e.g. `71.0%`.
    pub risk: String,
    /// Confidence as a whole percentage, e.g. `80%`.
    pub confidence: String,
    pub confidence_status: String,
    pub review_required: bool,
    pub narrative: String,
    pub fairness_warning: String,
    pub model_version: String,
}

pub fn headline(result: &DecisionResult) -> Headline {
    Headline {
        verdict: result.prediction.label().to_uppercase(),
        decision: result.prediction,
        risk: format!("{:.1}%", result.probability * 100.0),
        confidence: format!("{:.0}%", result.confidence_score * 100.0),
        confidence_status: result.confidence_status.clone(),
        review_required: result.review_required,
        narrative: result.narrative.clone(),
        fairness_warning: result.fairness_warning.clone(),
        model_version: result.model_version.clone(),
    }
}

// ============ Attribution Ranking ============

/// Display polarity of an attribution. Positive weights are adverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    RiskIncreasing,
    RiskDecreasing,
}

impl Polarity {
    pub fn of(weight: f64) -> Self {
        if weight > 0.0 {
            Polarity::RiskIncreasing
        } else {
            Polarity::RiskDecreasing
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedAttribution {
    pub feature: String,
    pub weight: f64,
    pub polarity: Polarity,
}

impl RankedAttribution {
    /// Feature name with underscores shown as spaces.
    pub fn label(&self) -> String {
        self.feature.replace('_', " ")
    }

    /// Magnitude with three decimals, prefixed by `+` when adverse.
    pub fn signed_magnitude(&self) -> String {
        let sign = match self.polarity {
            Polarity::RiskIncreasing => "+",
            Polarity::RiskDecreasing => "",
        };
        format!("{}{:.3}", sign, self.weight.abs())
    }

    /// Bar width in percent, saturating at 100.
    pub fn bar_width(&self) -> f64 {
        (self.weight.abs() * 50.0).min(100.0)
    }
}

/// Orders attributions by descending absolute weight and keeps the first `limit`.
///
/// The sort is stable, so equal magnitudes keep their service order.
pub fn rank_attributions(
    contributions: &[crate::models::Contribution],
    limit: usize,
) -> Vec<RankedAttribution> {
    let mut ranked: Vec<RankedAttribution> = contributions
        .iter()
        .map(|c| RankedAttribution {
            feature: c.feature.clone(),
            weight: c.weight,
            polarity: Polarity::of(c.weight),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.weight
            .abs()
            .partial_cmp(&a.weight.abs())
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}

// ============ Remediation Plan ============

#[derive(Debug, Clone, PartialEq)]
pub struct RemediationStep {
    pub feature: String,
    pub current: f64,
    pub suggested: f64,
    pub improvement: String,
    pub new_prob: f64,
    /// `suggested - current`.
    pub delta: f64,
}

impl From<&Recommendation> for RemediationStep {
    fn from(rec: &Recommendation) -> Self {
        Self {
            feature: rec.feature.clone(),
            current: rec.current,
            suggested: rec.suggested,
            improvement: rec.improvement.clone(),
            new_prob: rec.new_prob,
            delta: rec.suggested - rec.current,
        }
    }
}

/// Path to approval. Only defined for denied applicants with counterfactuals.
#[derive(Debug, Clone, PartialEq)]
pub enum RemediationPlan {
    NotApplicable,
    Steps {
        current_prob: f64,
        can_be_approved: bool,
        steps: Vec<RemediationStep>,
    },
}

impl RemediationPlan {
    pub fn is_applicable(&self) -> bool {
        matches!(self, RemediationPlan::Steps { .. })
    }

    pub fn steps(&self) -> &[RemediationStep] {
        match self {
            RemediationPlan::Steps { steps, .. } => steps,
            RemediationPlan::NotApplicable => &[],
        }
    }
}

pub fn remediation_plan(result: &DecisionResult) -> RemediationPlan {
    match (&result.prediction, &result.counterfactuals) {
        (Decision::Denied, Some(cf)) => RemediationPlan::Steps {
            current_prob: cf.current_prob,
            can_be_approved: cf.can_be_approved,
            steps: cf.recommendations.iter().map(RemediationStep::from).collect(),
        },
        _ => RemediationPlan::NotApplicable,
    }
}

// ============ Fairness Scorecard ============

pub const DEMOGRAPHIC_PARITY_PLACEHOLDER: f64 = 0.03;
pub const EQUAL_OPPORTUNITY_PLACEHOLDER: f64 = 0.04;
pub const INDIVIDUAL_FAIRNESS_PLACEHOLDER: f64 = 0.02;

/// A fairness reading. `Placeholder` marks the "no data yet" stand-in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Measured(f64),
    Placeholder(f64),
}

impl MetricValue {
    pub fn value(self) -> f64 {
        match self {
            MetricValue::Measured(v) | MetricValue::Placeholder(v) => v,
        }
    }

    pub fn is_measured(self) -> bool {
        matches!(self, MetricValue::Measured(_))
    }

    fn or_placeholder(reading: Option<f64>, placeholder: f64) -> Self {
        match reading {
            Some(v) => MetricValue::Measured(v),
            None => MetricValue::Placeholder(placeholder),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FairnessCheck {
    pub label: &'static str,
    pub metric: &'static str,
    pub status: &'static str,
    pub value: MetricValue,
}

pub fn fairness_scorecard(result: &DecisionResult) -> [FairnessCheck; 3] {
    let metrics = result.fairness_metrics.clone().unwrap_or_default();
    [
        FairnessCheck {
            label: "Demographic Parity",
            metric: "DPD",
            status: "Optimal",
            value: MetricValue::or_placeholder(
                metrics.demographic_parity_diff,
                DEMOGRAPHIC_PARITY_PLACEHOLDER,
            ),
        },
        FairnessCheck {
            label: "Equal Opportunity",
            metric: "EOD",
            status: "Compliant",
            value: MetricValue::or_placeholder(
                metrics.equal_opportunity_diff,
                EQUAL_OPPORTUNITY_PLACEHOLDER,
            ),
        },
        FairnessCheck {
            label: "Individual Fairness",
            metric: "IFS",
            status: "Verified",
            value: MetricValue::or_placeholder(
                metrics.treatment_equality,
                INDIVIDUAL_FAIRNESS_PLACEHOLDER,
            ),
        },
    ]
}

// ============ OOD Gauge ============

#[derive(Debug, Clone, PartialEq)]
pub struct OodGauge {
    /// Similarity clamped to `[0, 1]`.
    pub similarity: f64,
    /// Stroke offset of the filled arc: `552 - 552 * similarity`.
    pub arc_offset: f64,
    /// Taken from `is_ood` alone; never reconciled with `similarity`.
    pub out_of_distribution: bool,
}

impl OodGauge {
    pub fn percent(&self) -> String {
        format!("{:.0}%", self.similarity * 100.0)
    }

    pub fn label(&self) -> &'static str {
        if self.out_of_distribution {
            "OOD DETECTED"
        } else {
            "NOMINAL DATA MATCH"
        }
    }
}

pub fn ood_gauge(result: &DecisionResult) -> OodGauge {
    let similarity = if result.similarity_score.is_finite() {
        result.similarity_score.clamp(0.0, 1.0)
    } else {
        0.0
    };
    OodGauge {
        similarity,
        arc_offset: GAUGE_ARC_LENGTH - GAUGE_ARC_LENGTH * similarity,
        out_of_distribution: result.is_ood,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::*;

    pub fn denied_result() -> DecisionResult {
        DecisionResult {
            prediction: Decision::Denied,
            probability: 0.71,
            confidence_score: 0.8,
            confidence_status: "Moderate".to_string(),
            review_required: false,
            narrative: "Loan size relative to income drives the risk.".to_string(),
            contributions: vec![
                Contribution {
                    feature: "loan_percent_income".to_string(),
                    weight: 0.62,
                },
                Contribution {
                    feature: "loan_grade".to_string(),
                    weight: -0.11,
                },
            ],
            fairness_warning: "Sensitivity check complete.".to_string(),
            is_ood: false,
            similarity_score: 0.87,
            fairness_metrics: None,
            counterfactuals: Some(Counterfactuals {
                current_prob: 0.71,
                recommendations: vec![Recommendation {
                    feature: "loan_amnt".to_string(),
                    current: 15_000.0,
                    suggested: 9_000.0,
                    improvement: "Reduce loan amount".to_string(),
                    new_prob: 0.38,
                }],
                can_be_approved: true,
            }),
            brier_score: None,
            model_version: "v1.3".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::denied_result;
    use super::*;
    use crate::models::{Contribution, FairnessMetrics};

    fn contribution(feature: &str, weight: f64) -> Contribution {
        Contribution {
            feature: feature.to_string(),
            weight,
        }
    }

    #[test]
    fn test_ranking_orders_by_magnitude_and_keeps_ties_stable() {
        let ranked = rank_attributions(
            &[
                contribution("f1", -0.2),
                contribution("f2", 0.5),
                contribution("f3", -0.5),
            ],
            TOP_ATTRIBUTIONS,
        );
        let order: Vec<&str> = ranked.iter().map(|r| r.feature.as_str()).collect();
        assert_eq!(order, vec!["f2", "f3", "f1"]);
        assert_eq!(ranked[0].polarity, Polarity::RiskIncreasing);
        assert_eq!(ranked[1].polarity, Polarity::RiskDecreasing);
    }

    #[test]
    fn test_ranking_keeps_top_five() {
        let contributions: Vec<_> = (0..8)
            .map(|i| contribution(&format!("f{}", i), i as f64 / 10.0))
            .collect();
        let ranked = rank_attributions(&contributions, TOP_ATTRIBUTIONS);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].feature, "f7");
        assert_eq!(ranked[4].feature, "f3");
    }

    #[test]
    fn test_zero_weight_is_not_adverse() {
        assert_eq!(Polarity::of(0.0), Polarity::RiskDecreasing);
    }

    #[test]
    fn test_attribution_display_helpers() {
        let ranked = rank_attributions(&[contribution("loan_int_rate", 0.4567)], 5);
        assert_eq!(ranked[0].label(), "loan int rate");
        assert_eq!(ranked[0].signed_magnitude(), "+0.457");
        assert!((ranked[0].bar_width() - 22.835).abs() < 1e-9);

        let ranked = rank_attributions(&[contribution("person_income", -3.0)], 5);
        assert_eq!(ranked[0].signed_magnitude(), "3.000");
        assert_eq!(ranked[0].bar_width(), 100.0);
    }

    #[test]
    fn test_headline_formatting() {
        let head = headline(&denied_result());
        assert_eq!(head.verdict, "DENIED");
        assert_eq!(head.risk, "71.0%");
        assert_eq!(head.confidence, "80%");
    }

    #[test]
    fn test_remediation_for_denied_with_counterfactuals() {
        let plan = remediation_plan(&denied_result());
        assert!(plan.is_applicable());
        let steps = plan.steps();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].delta, -6_000.0);
        assert_eq!(steps[0].new_prob, 0.38);
    }

    #[test]
    fn test_remediation_not_applicable_when_approved() {
        let mut result = denied_result();
        result.prediction = Decision::Approved;
        assert_eq!(remediation_plan(&result), RemediationPlan::NotApplicable);
    }

    #[test]
    fn test_remediation_not_applicable_without_counterfactuals() {
        let mut result = denied_result();
        result.counterfactuals = None;
        assert_eq!(remediation_plan(&result), RemediationPlan::NotApplicable);
        assert!(remediation_plan(&result).steps().is_empty());
    }

    #[test]
    fn test_fairness_placeholders_when_absent() {
        let card = fairness_scorecard(&denied_result());
        let values: Vec<MetricValue> = card.iter().map(|c| c.value).collect();
        assert_eq!(
            values,
            vec![
                MetricValue::Placeholder(0.03),
                MetricValue::Placeholder(0.04),
                MetricValue::Placeholder(0.02),
            ]
        );
    }

    #[test]
    fn test_fairness_uses_measured_values() {
        let mut result = denied_result();
        result.fairness_metrics = Some(FairnessMetrics {
            demographic_parity_diff: Some(0.032),
            equal_opportunity_diff: Some(0.0),
            treatment_equality: None,
        });
        let card = fairness_scorecard(&result);
        assert_eq!(card[0].value, MetricValue::Measured(0.032));
        assert_eq!(card[1].value, MetricValue::Measured(0.0));
        assert_eq!(card[2].value, MetricValue::Placeholder(0.02));
        assert!(!card[2].value.is_measured());
    }

    #[test]
    fn test_ood_flag_independent_of_similarity() {
        let mut result = denied_result();
        result.similarity_score = 0.95;
        result.is_ood = true;
        let gauge = ood_gauge(&result);
        assert!(gauge.out_of_distribution);
        assert_eq!(gauge.label(), "OOD DETECTED");
        assert_eq!(gauge.percent(), "95%");

        result.similarity_score = 0.1;
        result.is_ood = false;
        assert_eq!(ood_gauge(&result).label(), "NOMINAL DATA MATCH");
    }

    #[test]
    fn test_ood_arc_is_linear_and_bounded() {
        let mut result = denied_result();
        result.similarity_score = 1.0;
        assert_eq!(ood_gauge(&result).arc_offset, 0.0);
        result.similarity_score = 0.5;
        assert_eq!(ood_gauge(&result).arc_offset, 276.0);
        result.similarity_score = 1.7;
        assert_eq!(ood_gauge(&result).arc_offset, 0.0);
        result.similarity_score = -0.2;
        assert_eq!(ood_gauge(&result).arc_offset, GAUGE_ARC_LENGTH);
    }
}
