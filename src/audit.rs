//! Audit log rows for the governance view.
//!
//! Only the first row reflects the live decision. The rows after it are
//! synthetic demo filler with random values; nothing here is persisted and
//! nothing here should be treated as a real audit trail.

use crate::models::{Decision, DecisionResult};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Where a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Derived from the committed decision.
    Live,
    /// Randomly generated filler.
    Synthetic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditRow {
    pub timestamp: DateTime<Utc>,
    pub decision: Decision,
    /// Probability in percent.
    pub probability_pct: f64,
    /// `100 - confidence` in percent.
    pub uncertainty_pct: f64,
    /// `DOC_REF_` followed by five digits.
    pub reference: String,
    pub provenance: Provenance,
}

impl AuditRow {
    pub fn is_synthetic(&self) -> bool {
        self.provenance == Provenance::Synthetic
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn formatted_probability(&self) -> String {
        format!("{:.2}%", self.probability_pct)
    }

    pub fn formatted_uncertainty(&self) -> String {
        format!("{:.1}%", self.uncertainty_pct)
    }
}

fn reference_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("DOC_REF_{}", rng.random_range(10_000..=99_999))
}

/// The row for the committed decision.
pub fn live_row<R: Rng + ?Sized>(
    result: &DecisionResult,
    now: DateTime<Utc>,
    rng: &mut R,
) -> AuditRow {
    AuditRow {
        timestamp: now,
        decision: result.prediction,
        probability_pct: result.probability * 100.0,
        uncertainty_pct: 100.0 - result.confidence_score * 100.0,
        reference: reference_id(rng),
        provenance: Provenance::Live,
    }
}

/// Random placeholder history, one minute apart going back from `now`.
pub fn synthetic_rows<R: Rng + ?Sized>(count: usize, now: DateTime<Utc>, rng: &mut R) -> Vec<AuditRow> {
    (1..=count)
        .map(|i| AuditRow {
            timestamp: now - Duration::minutes(i as i64),
            decision: Decision::Denied,
            probability_pct: rng.random_range(60.0..100.0),
            uncertainty_pct: rng.random_range(0.0..5.0),
            reference: reference_id(rng),
            provenance: Provenance::Synthetic,
        })
        .collect()
}

/// The live row followed by `filler` synthetic rows.
pub fn audit_rows<R: Rng + ?Sized>(
    result: &DecisionResult,
    filler: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<AuditRow> {
    let mut rows = Vec::with_capacity(filler + 1);
    rows.push(live_row(result, now, rng));
    rows.extend(synthetic_rows(filler, now, rng));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fixtures::denied_result;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_live_row_reflects_result() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc::now();
        let row = live_row(&denied_result(), now, &mut rng);

        assert_eq!(row.timestamp, now);
        assert_eq!(row.decision, Decision::Denied);
        assert_eq!(row.formatted_probability(), "71.00%");
        assert_eq!(row.formatted_uncertainty(), "20.0%");
        assert_eq!(row.provenance, Provenance::Live);
    }

    #[test]
    fn test_reference_ids_are_five_digits() {
        let mut rng = StdRng::seed_from_u64(42);
        for row in audit_rows(&denied_result(), 50, Utc::now(), &mut rng) {
            let digits = row.reference.strip_prefix("DOC_REF_").unwrap();
            assert_eq!(digits.len(), 5);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_exactly_one_live_row() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc::now();
        let rows = audit_rows(&denied_result(), 2, now, &mut rng);

        assert_eq!(rows.len(), 3);
        assert!(!rows[0].is_synthetic());
        assert!(rows[1..].iter().all(AuditRow::is_synthetic));
        assert_eq!(rows[1].timestamp, now - Duration::minutes(1));
        assert_eq!(rows[2].timestamp, now - Duration::minutes(2));
    }

    #[test]
    fn test_synthetic_values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(99);
        for row in synthetic_rows(200, Utc::now(), &mut rng) {
            assert_eq!(row.decision, Decision::Denied);
            assert!((60.0..100.0).contains(&row.probability_pct));
            assert!((0.0..5.0).contains(&row.uncertainty_pct));
        }
    }
}
