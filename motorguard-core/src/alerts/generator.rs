//! Ranking, Deduplication, and the Alert Ledger
//!
//! ## Ranking
//!
//! Candidates are ordered by a composite of what the finding is and how
//! sure the rule was:
//!
//! ```text
//! composite = 0.4·priority + 0.3·severity + 0.2·urgency + 0.1·confidence
//! ```
//!
//! with LOW..CRITICAL weighing 1..4 and immediate..within_month weighing
//! 4..1. The top ten survive as the cycle's recommendations.
//!
//! ## Deduplication
//!
//! Promotion to a persisted alert is read-then-write against the ledger:
//! an unacknowledged alert of the same type created within the last 30
//! minutes suppresses the new one. The engine serializes cycles, so the
//! check and the insert cannot interleave across concurrent evaluations.

use crate::alerts::{Alert, Level, Recommendation};
use crate::constants::scoring;
use crate::constants::time as time_consts;
use crate::time::{age_ms, Timestamp};

/// How long resolved (acknowledged) alerts stay in the ledger for
/// statistics before being pruned.
const LEDGER_RETENTION_MS: u64 = 24 * time_consts::MS_PER_HOUR;

/// Composite ranking score for one candidate.
fn composite_score(rec: &Recommendation) -> f32 {
    rec.priority.weight() * 0.4
        + rec.severity.weight() * 0.3
        + rec.urgency.weight() * 0.2
        + rec.confidence * 0.1
}

/// Ranks recommendations and owns the persisted-alert ledger.
#[derive(Debug, Default)]
pub struct AlertGenerator {
    ledger: Vec<Alert>,
    next_id: u64,
}

impl AlertGenerator {
    /// Score, sort, and truncate candidates to the retained top ten.
    pub fn rank(&self, mut candidates: Vec<Recommendation>) -> Vec<Recommendation> {
        for rec in &mut candidates {
            rec.composite_score = composite_score(rec);
        }
        candidates.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
        candidates.truncate(scoring::RECOMMENDATION_TOP_K);
        candidates
    }

    /// Promote the severe, high-confidence recommendations to alerts.
    ///
    /// Returns only the alerts newly created this cycle; suppressed
    /// duplicates produce nothing.
    pub fn promote(&mut self, recommendations: &[Recommendation], now: Timestamp) -> Vec<Alert> {
        self.prune(now);

        let mut created = Vec::new();
        for rec in recommendations {
            if rec.severity < Level::High || rec.confidence <= scoring::ALERT_CONFIDENCE_BAR {
                continue;
            }
            if self.is_duplicate(rec, now) {
                log::debug!("suppressed duplicate {} alert", rec.alert_type);
                continue;
            }

            self.next_id += 1;
            let alert = Alert::from_recommendation(rec, self.next_id, now);
            log::warn!(
                "alert #{}: {} [{:?}] {}",
                alert.id,
                alert.alert_type,
                alert.severity,
                alert.description
            );
            self.ledger.push(alert.clone());
            created.push(alert);
        }
        created
    }

    /// Acknowledge an alert by id. Returns false for unknown ids and
    /// already-acknowledged alerts.
    pub fn acknowledge(&mut self, alert_id: u64, by: &str) -> bool {
        match self
            .ledger
            .iter_mut()
            .find(|a| a.id == alert_id && !a.acknowledged)
        {
            Some(alert) => {
                alert.acknowledged = true;
                alert.acknowledged_by = Some(by.to_string());
                log::info!("alert #{} acknowledged by {by}", alert_id);
                true
            }
            None => false,
        }
    }

    /// All alerts currently in the ledger, oldest first.
    pub fn ledger(&self) -> &[Alert] {
        &self.ledger
    }

    /// Unacknowledged alerts, oldest first.
    pub fn open_alerts(&self) -> impl Iterator<Item = &Alert> {
        self.ledger.iter().filter(|a| !a.acknowledged)
    }

    /// Ledger counts by severity: (low, medium, high, critical).
    pub fn severity_counts(&self) -> (usize, usize, usize, usize) {
        let mut counts = (0, 0, 0, 0);
        for alert in &self.ledger {
            match alert.severity {
                Level::Low => counts.0 += 1,
                Level::Medium => counts.1 += 1,
                Level::High => counts.2 += 1,
                Level::Critical => counts.3 += 1,
            }
        }
        counts
    }

    fn is_duplicate(&self, rec: &Recommendation, now: Timestamp) -> bool {
        self.ledger.iter().any(|a| {
            a.alert_type == rec.alert_type
                && !a.acknowledged
                && age_ms(a.created_at, now) < time_consts::ALERT_DEDUP_WINDOW_MS
        })
    }

    /// Drop acknowledged alerts past the retention window. Unacknowledged
    /// alerts are never pruned: an unhandled finding stays visible.
    fn prune(&mut self, now: Timestamp) {
        self.ledger
            .retain(|a| !a.acknowledged || age_ms(a.created_at, now) < LEDGER_RETENTION_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{AlertType, Category, Urgency};

    fn rec(alert_type: AlertType, severity: Level, confidence: f32) -> Recommendation {
        Recommendation {
            alert_type,
            category: Category::Health,
            severity,
            priority: severity,
            urgency: Urgency::Immediate,
            description: "test finding".to_string(),
            action: "test action".to_string(),
            confidence,
            composite_score: 0.0,
        }
    }

    #[test]
    fn ranking_orders_by_composite_and_keeps_top_ten() {
        let generator = AlertGenerator::default();
        let mut candidates = Vec::new();
        for _ in 0..8 {
            candidates.push(rec(AlertType::RoutineMaintenance, Level::Low, 0.6));
        }
        for _ in 0..4 {
            candidates.push(rec(AlertType::Overheating, Level::Critical, 0.95));
        }
        let ranked = generator.rank(candidates);

        assert_eq!(ranked.len(), scoring::RECOMMENDATION_TOP_K);
        assert_eq!(ranked[0].alert_type, AlertType::Overheating);
        // All critical entries outrank every low entry.
        assert!(ranked[..4]
            .iter()
            .all(|r| r.alert_type == AlertType::Overheating));
        assert!(ranked[0].composite_score > ranked[9].composite_score);
    }

    #[test]
    fn promotion_requires_severity_and_confidence() {
        let mut generator = AlertGenerator::default();
        let recs = vec![
            rec(AlertType::Overheating, Level::High, 0.95),
            rec(AlertType::HealthDegraded, Level::Medium, 0.95),
            rec(AlertType::Undervoltage, Level::High, 0.5),
        ];
        let created = generator.promote(&recs, 1_000);
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].alert_type, AlertType::Overheating);
    }

    #[test]
    fn duplicate_within_window_is_suppressed() {
        let mut generator = AlertGenerator::default();
        let recs = vec![rec(AlertType::Overheating, Level::High, 0.95)];

        let first = generator.promote(&recs, 0);
        assert_eq!(first.len(), 1);

        // Same condition 10 minutes later: suppressed.
        let second = generator.promote(&recs, 10 * time_consts::MS_PER_MINUTE);
        assert!(second.is_empty());

        // Past the 30-minute window: a fresh alert.
        let third = generator.promote(&recs, 31 * time_consts::MS_PER_MINUTE);
        assert_eq!(third.len(), 1);
        assert_ne!(third[0].id, first[0].id);
    }

    #[test]
    fn acknowledgment_reopens_the_type() {
        let mut generator = AlertGenerator::default();
        let recs = vec![rec(AlertType::Overheating, Level::High, 0.95)];

        let first = generator.promote(&recs, 0);
        assert!(generator.acknowledge(first[0].id, "operator"));

        // Acknowledged: the same condition may page again immediately.
        let second = generator.promote(&recs, 5 * time_consts::MS_PER_MINUTE);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn acknowledge_unknown_id_fails() {
        let mut generator = AlertGenerator::default();
        assert!(!generator.acknowledge(42, "operator"));
    }

    #[test]
    fn double_acknowledge_fails() {
        let mut generator = AlertGenerator::default();
        let recs = vec![rec(AlertType::Overheating, Level::High, 0.95)];
        let created = generator.promote(&recs, 0);
        assert!(generator.acknowledge(created[0].id, "a"));
        assert!(!generator.acknowledge(created[0].id, "b"));
    }

    #[test]
    fn acknowledged_alerts_age_out_of_the_ledger() {
        let mut generator = AlertGenerator::default();
        let recs = vec![rec(AlertType::Overheating, Level::High, 0.95)];
        let created = generator.promote(&recs, 0);
        generator.acknowledge(created[0].id, "operator");

        // Two days later a new promotion prunes the old record.
        generator.promote(&[], 48 * time_consts::MS_PER_HOUR);
        assert!(generator.ledger().is_empty());
    }

    #[test]
    fn severity_counts_tally_the_ledger() {
        let mut generator = AlertGenerator::default();
        generator.promote(
            &[
                rec(AlertType::Overheating, Level::High, 0.95),
                rec(AlertType::HealthCritical, Level::Critical, 0.95),
            ],
            0,
        );
        assert_eq!(generator.severity_counts(), (0, 0, 1, 1));
    }
}
