//! Core health-scoring engine for MotorGuard
//!
//! Turns two noisy, possibly stale telemetry streams (an ambient/electrical
//! sensor node and a motor-controller register interface) into one bounded,
//! explainable equipment-health score with prioritized, deduplicated
//! maintenance alerts.
//!
//! Key properties:
//! - Every cycle produces a result; failures degrade (historical fallback,
//!   no_data domains, low confidence), they never abort.
//! - Pure core: no async, no I/O, clock passed in. Deterministic under a
//!   [`FixedClock`](time::FixedClock).
//! - Domain scores carry nonzero floors so one bad input cannot collapse
//!   the composite.
//!
//! ```no_run
//! use motorguard_core::{HealthEngine, NodeSample, Fallback};
//!
//! let mut engine = HealthEngine::default();
//!
//! let sample = NodeSample {
//!     current_a: Some(6.25),
//!     voltage_v: Some(24.0),
//!     rpm: Some(2750.0),
//!     ambient_temp_c: Some(24.0),
//!     humidity_pct: Some(40.0),
//! };
//! engine.ingest_node(sample, 1_000)?;
//!
//! let output = engine.evaluate_cycle(2_000, Fallback::Defaults, Fallback::Defaults, None);
//! println!("{} ({:.0}%)", output.result.status, output.result.overall);
//! # Ok::<(), motorguard_core::HealthError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregate;
pub mod alerts;
pub mod arbiter;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod freshness;
pub mod oracle;
pub mod reading;
pub mod scorers;
pub mod time;

// Public API
pub use aggregate::{efficiency_score, Aggregator, HealthResult, Status, Weights};
pub use alerts::{Alert, AlertGenerator, AlertType, Category, Level, Recommendation, Urgency};
pub use arbiter::{DataArbiter, DataProvenance, Fallback, Provenance, WorkingDataset};
pub use engine::{CycleSnapshot, EngineConfig, EvaluationOutput, HealthEngine};
pub use errors::{EngineResult, HealthError};
pub use freshness::{FreshnessConfig, FreshnessTracker, LinkQuality, SourceState, TimeoutEvent};
pub use oracle::{AnomalyOpinion, AnomalyOracle, FaultClass, FaultPrediction, FeatureVector};
pub use reading::{ControllerSample, NodeSample, Reading, Source};
pub use scorers::{
    ComponentScore, Domain, ElectricalScorer, HealthScorer, MechanicalScorer, ThermalScorer,
};
pub use time::{FixedClock, SystemClock, TimeSource, Timestamp};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
