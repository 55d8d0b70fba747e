//! Composite Health Aggregation
//!
//! ## Overview
//!
//! The aggregator folds the per-domain scores, the oracle's predictive
//! opinion, and the cycle confidence into one bounded, explainable
//! [`HealthResult`]:
//!
//! ```text
//! overall = confidence × Σ(weight_d × score_d) / Σ(weight_d)
//! ```
//!
//! where the sums run over the domains that actually produced a score.
//! A `no_data` domain is excluded and the remaining weights renormalized:
//! absence of evidence is not evidence of health, but it is not evidence
//! of failure either, and the confidence factor already prices in how
//! much of the dataset was live.
//!
//! ## Status
//!
//! Status is a monotone step function of the overall score with
//! system-wide constant boundaries. Consumers compare status buckets, not
//! floats, so two implementations of the same rules agree on what a
//! dashboard shows even if their floating-point differs in the last ulp.

use crate::arbiter::{DataProvenance, WorkingDataset};
use crate::constants::{scoring, thresholds};
use crate::errors::EngineResult;
use crate::scorers::{ComponentScore, Domain};
use crate::time::Timestamp;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Coarse health classification of the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Critical,
    Poor,
    Warning,
    Fair,
    Good,
    Excellent,
}

impl Status {
    /// Classify an overall score.
    pub fn from_overall(overall: f32) -> Self {
        if overall >= scoring::STATUS_EXCELLENT {
            Status::Excellent
        } else if overall >= scoring::STATUS_GOOD {
            Status::Good
        } else if overall >= scoring::STATUS_FAIR {
            Status::Fair
        } else if overall >= scoring::STATUS_WARNING {
            Status::Warning
        } else if overall >= scoring::STATUS_POOR {
            Status::Poor
        } else {
            Status::Critical
        }
    }

    /// Stable lowercase name.
    pub const fn name(&self) -> &'static str {
        match self {
            Status::Excellent => "excellent",
            Status::Good => "good",
            Status::Fair => "fair",
            Status::Warning => "warning",
            Status::Poor => "poor",
            Status::Critical => "critical",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One cycle's complete health picture. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthResult {
    /// Composite score in `[0, 100]`, confidence already applied.
    pub overall: f32,
    /// Electrical domain score; `None` means no usable input.
    pub electrical: Option<f32>,
    /// Thermal domain score.
    pub thermal: Option<f32>,
    /// Mechanical domain score.
    pub mechanical: Option<f32>,
    /// Oracle-backed predictive score; `None` when absent or unavailable.
    pub predictive: Option<f32>,
    /// Operating-efficiency estimate, `[0, 100]`.
    pub efficiency: Option<f32>,
    /// Status bucket of `overall`.
    pub status: Status,
    /// Cycle confidence in `[0, 1]`.
    pub confidence: f32,
    /// Where the data behind this result came from.
    pub provenance: DataProvenance,
    /// Evaluation time.
    pub evaluated_at: Timestamp,
}

impl HealthResult {
    /// Domain score by name, for rule evaluation.
    pub fn domain(&self, domain: Domain) -> Option<f32> {
        match domain {
            Domain::Electrical => self.electrical,
            Domain::Thermal => self.thermal,
            Domain::Mechanical => self.mechanical,
            Domain::Predictive => self.predictive,
        }
    }
}

/// Per-domain composite weights.
#[derive(Debug, Clone, Copy)]
pub struct Weights {
    /// Electrical domain share.
    pub electrical: f32,
    /// Thermal domain share.
    pub thermal: f32,
    /// Mechanical domain share.
    pub mechanical: f32,
    /// Predictive component share when present.
    pub predictive: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            electrical: scoring::WEIGHT_ELECTRICAL,
            thermal: scoring::WEIGHT_THERMAL,
            mechanical: scoring::WEIGHT_MECHANICAL,
            predictive: scoring::WEIGHT_PREDICTIVE,
        }
    }
}

/// Folds domain scores into the composite result.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    weights: Weights,
}

impl Aggregator {
    /// Aggregator with custom weights.
    pub fn with_weights(weights: Weights) -> Self {
        Self { weights }
    }

    /// Build the cycle result.
    ///
    /// `electrical`/`thermal`/`mechanical` carry either a score or the
    /// `MissingData` sentinel from their scorer; `predictive` is the
    /// already-mapped oracle score or `None`.
    #[allow(clippy::too_many_arguments)]
    pub fn aggregate(
        &self,
        electrical: EngineResult<ComponentScore>,
        thermal: EngineResult<ComponentScore>,
        mechanical: EngineResult<ComponentScore>,
        predictive: Option<f32>,
        efficiency: Option<f32>,
        confidence: f32,
        provenance: DataProvenance,
        evaluated_at: Timestamp,
    ) -> HealthResult {
        let electrical = electrical.ok().map(|s| s.value);
        let thermal = thermal.ok().map(|s| s.value);
        let mechanical = mechanical.ok().map(|s| s.value);

        let mut weighted = 0.0;
        let mut weight_sum = 0.0;
        for (score, weight) in [
            (electrical, self.weights.electrical),
            (thermal, self.weights.thermal),
            (mechanical, self.weights.mechanical),
            (predictive, self.weights.predictive),
        ] {
            if let Some(value) = score {
                weighted += value * weight;
                weight_sum += weight;
            }
        }

        let overall = if weight_sum > 0.0 {
            (confidence * weighted / weight_sum).clamp(0.0, 100.0)
        } else {
            // Every domain was no_data; report a floor-level estimate
            // rather than inventing health out of nothing.
            0.0
        };

        let status = Status::from_overall(overall);
        log::debug!(
            "aggregated overall={overall:.1} status={status} confidence={confidence:.2}"
        );

        HealthResult {
            overall,
            electrical,
            thermal,
            mechanical,
            predictive,
            efficiency,
            status,
            confidence,
            provenance,
            evaluated_at,
        }
    }
}

/// Operating-efficiency estimate against the nominal point.
///
/// Blends how close the shaft runs to nominal speed with how the drawn
/// power compares to nominal power. Needs all three electrical inputs;
/// returns `None` otherwise.
pub fn efficiency_score(data: &WorkingDataset) -> Option<f32> {
    let voltage = data.voltage_v()?;
    let current = data.current_a()?;
    let rpm = data.rpm()?;
    if voltage <= 0.0 || current <= 0.0 || rpm <= 0.0 {
        return None;
    }

    let rpm_efficiency = ((rpm / thresholds::OPTIMAL_RPM) * 100.0).min(100.0);

    let actual_power = voltage * current;
    let nominal_power = thresholds::OPTIMAL_VOLTAGE_V * thresholds::OPTIMAL_CURRENT_A;
    let power_efficiency = ((nominal_power / actual_power) * 100.0).min(100.0);

    let combined = rpm_efficiency * scoring::EFFICIENCY_RPM_SHARE
        + power_efficiency * scoring::EFFICIENCY_POWER_SHARE;
    Some(combined.clamp(0.0, 100.0))
}
