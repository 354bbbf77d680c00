//! Plain-text rendering of the dashboard panels.

use crate::audit::{audit_rows, AuditRow};
use crate::models::{Profile, ProfileField};
use crate::session::SessionState;
use crate::tabs::{ActiveTab, SliderRange};
use crate::views::{
    fairness_scorecard, headline, ood_gauge, rank_attributions, remediation_plan, MetricValue,
    RemediationPlan, TOP_ATTRIBUTIONS,
};
use chrono::Utc;
use std::fmt::Write;

/// Renders the tab strip, the error banner and the active panel.
pub fn render_dashboard(
    state: &SessionState,
    tab: ActiveTab,
    profile: &Profile,
    audit_filler: usize,
) -> String {
    let mut out = String::new();
    out.push_str(&tab_strip(tab));
    out.push('\n');

    match state {
        SessionState::Idle => {
            out.push_str("Awaiting profile scan. Run `submit` to request a decision.\n");
        }
        SessionState::Loading => {
            out.push_str("Decrypting...\n");
        }
        SessionState::Failed(message) => {
            let _ = writeln!(out, "!! PROTOCOL FAULT: {}", message);
        }
        SessionState::Ready(result) => {
            let head = headline(result);
            let _ = writeln!(
                out,
                "{}  | risk {} | confidence {}{}",
                head.verdict,
                head.risk,
                head.confidence,
                if head.review_required {
                    " | REVIEW REQUIRED"
                } else {
                    ""
                }
            );
            out.push('\n');

            match tab {
                ActiveTab::Insight => {
                    let _ = writeln!(out, "Briefing ({}): \"{}\"", profile.tone, head.narrative);
                    out.push_str("Feature influence:\n");
                    for attribution in rank_attributions(&result.contributions, TOP_ATTRIBUTIONS) {
                        let _ = writeln!(
                            out,
                            "  {:<28} {:>8}  {}",
                            attribution.label(),
                            attribution.signed_magnitude(),
                            bar(attribution.bar_width())
                        );
                    }
                }
                ActiveTab::WhatIf => {
                    for field in [ProfileField::LoanAmount, ProfileField::Income] {
                        if let (Some(range), Some(value)) =
                            (SliderRange::for_field(field), profile.numeric(field))
                        {
                            let _ = writeln!(
                                out,
                                "  {:<14} {:>10} [{} - {}]",
                                field.as_str(),
                                value,
                                range.min,
                                range.max
                            );
                        }
                    }
                    out.push('\n');
                    match remediation_plan(result) {
                        RemediationPlan::NotApplicable => {
                            out.push_str("No remediation path needed.\n");
                        }
                        RemediationPlan::Steps { steps, .. } if steps.is_empty() => {
                            out.push_str("No remediation path found.\n");
                        }
                        RemediationPlan::Steps { steps, .. } => {
                            out.push_str("Path to approval:\n");
                            for step in steps {
                                let _ = writeln!(
                                    out,
                                    "  {:<30} delta {:>10.2}  -> {:.1}%",
                                    step.improvement,
                                    step.delta,
                                    step.new_prob * 100.0
                                );
                            }
                        }
                    }
                }
                ActiveTab::Trust => {
                    let gauge = ood_gauge(result);
                    let _ = writeln!(
                        out,
                        "Manifold similarity {}  {}  [{}]",
                        gauge.percent(),
                        bar(gauge.similarity * 100.0),
                        gauge.label()
                    );
                    out.push_str("Fairness checks:\n");
                    for check in fairness_scorecard(result) {
                        let value = match check.value {
                            MetricValue::Measured(v) => format!("{:.3}", v),
                            MetricValue::Placeholder(v) => format!("{:.3} (default)", v),
                        };
                        let _ = writeln!(
                            out,
                            "  {:<20} {}: {}  {}",
                            check.label, check.metric, value, check.status
                        );
                    }
                    let _ = writeln!(out, "{}", head.fairness_warning);
                }
                ActiveTab::Governance => {
                    let rows = audit_rows(result, audit_filler, Utc::now(), &mut rand::rng());
                    out.push_str("TIMESTAMP            CLEARANCE  PROBABILITY  UNCERTAINTY  VECTOR ID\n");
                    for row in &rows {
                        out.push_str(&audit_line(row));
                    }
                    let _ = writeln!(out, "model {}", head.model_version);
                }
            }
        }
    }

    out
}

fn tab_strip(active: ActiveTab) -> String {
    ActiveTab::ALL
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.title())
            } else {
                format!(" {} ", tab.title())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn audit_line(row: &AuditRow) -> String {
    format!(
        "{}  {:<9}  {:>11}  {:>11}  {}{}\n",
        row.formatted_timestamp(),
        row.decision.label().to_uppercase(),
        row.formatted_probability(),
        row.formatted_uncertainty(),
        row.reference,
        if row.is_synthetic() { "  (demo)" } else { "" }
    )
}

fn bar(percent: f64) -> String {
    let filled = (percent.clamp(0.0, 100.0) / 5.0).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(20 - filled))
}

/// Lists every profile field with its current value.
pub fn render_profile(profile: &Profile) -> String {
    let mut out = String::new();
    for field in ProfileField::ALL {
        let options = field.options();
        if options.is_empty() {
            let _ = writeln!(out, "  {:<28} {}", field.as_str(), profile.display_value(field));
        } else {
            let _ = writeln!(
                out,
                "  {:<28} {}  ({})",
                field.as_str(),
                profile.display_value(field),
                options.join("|")
            );
        }
    }
    out
}
