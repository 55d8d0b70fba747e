//! Maintenance Alerts and Recommendations
//!
//! ## Overview
//!
//! Every evaluation cycle ends here. A fixed, ordered list of independent
//! rule predicates ([`rules`]) looks at the cycle's `HealthResult`, the
//! working dataset, and the source states, and produces candidate
//! [`Recommendation`]s, several at once when several things are wrong,
//! because predicates never short-circuit each other. The
//! [`generator`] then ranks candidates by a composite urgency score,
//! keeps the top ten, and promotes the severe, high-confidence subset to
//! persisted [`Alert`]s with 30-minute same-type deduplication.
//!
//! ## Alerts versus recommendations
//!
//! A recommendation is ephemeral advice, rebuilt from scratch every cycle
//! and never stored. An alert is a record: it has an id, it lives in the
//! engine's ledger until acknowledged and aged out, and it suppresses
//! duplicates of itself. Dashboards render recommendations; pagers and
//! maintenance logs consume alerts.

pub mod generator;
pub mod rules;

pub use generator::AlertGenerator;

use crate::time::Timestamp;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Shared level scale for alert severity and priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    Low,
    Medium,
    High,
    Critical,
}

impl Level {
    /// Ranking weight: LOW/MEDIUM/HIGH/CRITICAL map to 1..=4.
    pub const fn weight(&self) -> f32 {
        match self {
            Level::Low => 1.0,
            Level::Medium => 2.0,
            Level::High => 3.0,
            Level::Critical => 4.0,
        }
    }
}

/// How soon the recommended action should happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Immediate,
    #[serde(rename = "within_24h")]
    Within24h,
    WithinWeek,
    WithinMonth,
}

impl Urgency {
    /// Ranking weight: immediate is most urgent.
    pub const fn weight(&self) -> f32 {
        match self {
            Urgency::Immediate => 4.0,
            Urgency::Within24h => 3.0,
            Urgency::WithinWeek => 2.0,
            Urgency::WithinMonth => 1.0,
        }
    }
}

/// Identity of a rule's finding; the deduplication key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    NodeConnectionLost,
    ControllerConnectionLost,
    HealthCritical,
    HealthDegraded,
    ElectricalWarning,
    ThermalWarning,
    MechanicalWarning,
    PredictiveMaintenance,
    Overcurrent,
    Overheating,
    Undervoltage,
    Overvoltage,
    EfficiencyAdvisory,
    LoadImbalance,
    RoutineMaintenance,
    Nominal,
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlertType::NodeConnectionLost => "node_connection_lost",
            AlertType::ControllerConnectionLost => "controller_connection_lost",
            AlertType::HealthCritical => "health_critical",
            AlertType::HealthDegraded => "health_degraded",
            AlertType::ElectricalWarning => "electrical_warning",
            AlertType::ThermalWarning => "thermal_warning",
            AlertType::MechanicalWarning => "mechanical_warning",
            AlertType::PredictiveMaintenance => "predictive_maintenance",
            AlertType::Overcurrent => "overcurrent",
            AlertType::Overheating => "overheating",
            AlertType::Undervoltage => "undervoltage",
            AlertType::Overvoltage => "overvoltage",
            AlertType::EfficiencyAdvisory => "efficiency_advisory",
            AlertType::LoadImbalance => "load_imbalance",
            AlertType::RoutineMaintenance => "routine_maintenance",
            AlertType::Nominal => "nominal",
        };
        f.write_str(name)
    }
}

/// Functional area a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    System,
    Health,
    Electrical,
    Thermal,
    Mechanical,
    Predictive,
    Performance,
    Preventive,
}

/// Ephemeral, ranked advice produced each cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Finding identity.
    pub alert_type: AlertType,
    /// Functional area.
    pub category: Category,
    /// Impact level.
    pub severity: Level,
    /// Handling priority.
    pub priority: Level,
    /// Recommended response window.
    pub urgency: Urgency,
    /// What was observed.
    pub description: String,
    /// What to do about it.
    pub action: String,
    /// Rule confidence, `[0, 1]`.
    pub confidence: f32,
    /// Composite ranking score; filled in by the generator.
    #[serde(default)]
    pub composite_score: f32,
}

/// A persisted maintenance alert. Mutated only by acknowledgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Engine-assigned identifier.
    pub id: u64,
    /// Finding identity; the deduplication key.
    pub alert_type: AlertType,
    /// Functional area.
    pub category: Category,
    /// Impact level.
    pub severity: Level,
    /// Handling priority.
    pub priority: Level,
    /// What was observed.
    pub description: String,
    /// What to do about it.
    pub action: String,
    /// Rule confidence, `[0, 1]`.
    pub confidence: f32,
    /// Creation time.
    pub created_at: Timestamp,
    /// Whether an operator has acknowledged it.
    pub acknowledged: bool,
    /// Who acknowledged it.
    pub acknowledged_by: Option<String>,
}

impl Alert {
    /// Promote a recommendation into a persisted alert.
    pub fn from_recommendation(rec: &Recommendation, id: u64, created_at: Timestamp) -> Self {
        Self {
            id,
            alert_type: rec.alert_type,
            category: rec.category,
            severity: rec.severity,
            priority: rec.priority,
            description: rec.description.clone(),
            action: rec.action.clone(),
            confidence: rec.confidence,
            created_at,
            acknowledged: false,
            acknowledged_by: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_weights_are_ordered() {
        assert!(Level::Critical.weight() > Level::High.weight());
        assert!(Level::High.weight() > Level::Medium.weight());
        assert!(Level::Medium.weight() > Level::Low.weight());
    }

    #[test]
    fn severity_serializes_to_the_literal_set() {
        let json = serde_json::to_string(&Level::High).unwrap();
        assert_eq!(json, "\"HIGH\"");
        let json = serde_json::to_string(&Urgency::Within24h).unwrap();
        assert_eq!(json, "\"within_24h\"");
    }
}
