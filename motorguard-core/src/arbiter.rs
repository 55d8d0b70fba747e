//! Live-versus-Historical Data Arbitration
//!
//! ## Overview
//!
//! The arbiter decides, per source, what data this evaluation cycle works
//! with: the live reading if the source is fresh, a historical average if
//! it is not, and the safe-default operating point when the store has no
//! history either. The decision is recorded as a per-source
//! [`Provenance`] tag so alerting can tell a real fault apart from
//! stale-data degradation.
//!
//! ## Confidence
//!
//! The cycle's confidence factor reflects how much of the working dataset
//! is live:
//!
//! | node | controller | confidence |
//! |------|------------|------------|
//! | live | live       | 1.0 exactly |
//! | live | fallback   | 0.8 |
//! | fallback | live   | 0.8 |
//! | fallback | fallback | 0.25 |
//!
//! Confidence multiplies the aggregate score, so the both-live case must
//! be exactly 1.0: two fresh sources leave nothing to discount, and any
//! factor below one would mask trustworthy readings.
//!
//! Fallback resolution (store lookups) happens *before* this module is
//! called; the arbiter itself is pure and never blocks.

use crate::constants::scoring;
use crate::errors::{EngineResult, HealthError};
use crate::freshness::SourceState;
use crate::reading::{ControllerSample, NodeSample};
use serde::{Deserialize, Serialize};

/// Where a field group in the working dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Fresh reading from the source itself.
    Live,
    /// Averaged from persisted readings in a lookback window.
    Historical,
    /// Safe-default operating point; the store had nothing.
    Default,
}

/// Pre-resolved fallback for one source, supplied by the store collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback<S> {
    /// Average over the lookback window (possibly the widened one).
    Historical(S),
    /// No rows even in the widened window; use safe defaults.
    Defaults,
}

/// Provenance summary carried through to the `HealthResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataProvenance {
    /// Where the sensor-node field group came from.
    pub node: Provenance,
    /// Where the controller field group came from.
    pub controller: Provenance,
    /// Set when the oracle was unreachable and the predictive component is
    /// absent for that reason rather than by configuration.
    pub predictive_unavailable: bool,
}

impl DataProvenance {
    /// True when any field group is non-live.
    pub fn degraded(&self) -> bool {
        self.node != Provenance::Live || self.controller != Provenance::Live
    }
}

/// The merged field map one evaluation cycle scores against.
///
/// Field groups stay separated by source so provenance stays meaningful;
/// the accessors implement the cross-source preferences (node voltage over
/// controller voltage, larger of the two rpm readings).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkingDataset {
    /// Sensor-node field group.
    pub node: NodeSample,
    /// Controller field group.
    pub controller: ControllerSample,
    /// Per-group provenance.
    pub provenance: DataProvenance,
}

impl WorkingDataset {
    /// Phase current in amperes.
    pub fn current_a(&self) -> Option<f32> {
        self.node.current_a
    }

    /// Supply voltage, preferring the node's measurement over the
    /// controller's bus-voltage register.
    pub fn voltage_v(&self) -> Option<f32> {
        self.node.voltage_v.or(self.controller.voltage_v)
    }

    /// Shaft speed: the larger of the two redundant readings when both
    /// exist. The pickup that reads low is the one slipping.
    pub fn rpm(&self) -> Option<f32> {
        match (self.node.rpm, self.controller.rpm) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    /// Motor case temperature in °C.
    pub fn motor_temp_c(&self) -> Option<f32> {
        self.controller.motor_temp_c
    }

    /// Ambient temperature in °C.
    pub fn ambient_temp_c(&self) -> Option<f32> {
        self.node.ambient_temp_c
    }

    /// Relative humidity in percent.
    pub fn humidity_pct(&self) -> Option<f32> {
        self.node.humidity_pct
    }
}

/// Builds the working dataset and confidence factor for one cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataArbiter;

impl DataArbiter {
    /// Merge live readings and resolved fallbacks into one dataset.
    ///
    /// `live_node`/`live_controller` are the latest retained samples; they
    /// are only used when the matching state says the source is live.
    pub fn build(
        &self,
        node_state: &SourceState,
        controller_state: &SourceState,
        live_node: Option<NodeSample>,
        live_controller: Option<ControllerSample>,
        node_fallback: Fallback<NodeSample>,
        controller_fallback: Fallback<ControllerSample>,
    ) -> (WorkingDataset, f32) {
        // StaleSource is handled right here, never surfaced upward.
        let (node, node_prov) = match live_sample(node_state, live_node) {
            Ok(sample) => (sample, Provenance::Live),
            Err(_) => resolve(node_fallback, NodeSample::safe_defaults()),
        };
        let (controller, controller_prov) = match live_sample(controller_state, live_controller) {
            Ok(sample) => (sample, Provenance::Live),
            Err(_) => resolve(controller_fallback, ControllerSample::safe_defaults()),
        };

        let confidence = match (node_prov, controller_prov) {
            (Provenance::Live, Provenance::Live) => scoring::CONFIDENCE_BOTH_LIVE,
            (Provenance::Live, _) | (_, Provenance::Live) => scoring::CONFIDENCE_SINGLE_LIVE,
            _ => scoring::CONFIDENCE_NONE_LIVE,
        };

        if confidence < scoring::CONFIDENCE_BOTH_LIVE {
            log::debug!(
                "working dataset degraded: node={node_prov:?} controller={controller_prov:?}"
            );
        }

        let dataset = WorkingDataset {
            node,
            controller,
            provenance: DataProvenance {
                node: node_prov,
                controller: controller_prov,
                predictive_unavailable: false,
            },
        };
        (dataset, confidence)
    }
}

/// The live sample, or `StaleSource` when the source cannot contribute.
///
/// A live state with no retained sample also counts as stale: a timeout
/// zeroing may have raced the snapshot, and the dataset must not invent
/// data for it.
fn live_sample<S>(state: &SourceState, live: Option<S>) -> EngineResult<S> {
    match live {
        Some(sample) if state.is_live() => Ok(sample),
        _ => Err(HealthError::StaleSource {
            source: state.source,
        }),
    }
}

fn resolve<S>(fallback: Fallback<S>, defaults: S) -> (S, Provenance) {
    match fallback {
        Fallback::Historical(sample) => (sample, Provenance::Historical),
        Fallback::Defaults => (defaults, Provenance::Default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freshness::FreshnessTracker;
    use crate::reading::Source;

    fn live_states() -> (SourceState, SourceState) {
        let mut tracker = FreshnessTracker::default();
        tracker.record(Source::SensorNode, 1_000);
        tracker.record(Source::Controller, 1_000);
        (
            *tracker.state(Source::SensorNode),
            *tracker.state(Source::Controller),
        )
    }

    fn dead_states() -> (SourceState, SourceState) {
        let mut tracker = FreshnessTracker::default();
        tracker.record(Source::SensorNode, 0);
        tracker.record(Source::Controller, 0);
        tracker.sweep(120_000);
        (
            *tracker.state(Source::SensorNode),
            *tracker.state(Source::Controller),
        )
    }

    fn node_sample() -> NodeSample {
        NodeSample {
            current_a: Some(6.0),
            voltage_v: Some(24.1),
            rpm: Some(2740.0),
            ambient_temp_c: Some(23.0),
            humidity_pct: Some(45.0),
        }
    }

    #[test]
    fn both_live_confidence_is_exactly_one() {
        let (node, ctrl) = live_states();
        let (dataset, confidence) = DataArbiter.build(
            &node,
            &ctrl,
            Some(node_sample()),
            Some(ControllerSample::safe_defaults()),
            Fallback::Defaults,
            Fallback::Defaults,
        );
        assert_eq!(confidence, 1.0);
        assert_eq!(dataset.provenance.node, Provenance::Live);
        assert_eq!(dataset.provenance.controller, Provenance::Live);
    }

    #[test]
    fn single_live_uses_reduced_factor() {
        let (node, _) = live_states();
        let (_, ctrl) = dead_states();
        let (dataset, confidence) = DataArbiter.build(
            &node,
            &ctrl,
            Some(node_sample()),
            None,
            Fallback::Defaults,
            Fallback::Historical(ControllerSample {
                motor_temp_c: Some(42.0),
                voltage_v: None,
                rpm: None,
            }),
        );
        assert_eq!(confidence, 0.8);
        assert_eq!(dataset.provenance.controller, Provenance::Historical);
        assert_eq!(dataset.motor_temp_c(), Some(42.0));
    }

    #[test]
    fn none_live_falls_to_defaults_and_low_confidence() {
        let (node, ctrl) = dead_states();
        let (dataset, confidence) =
            DataArbiter.build(&node, &ctrl, None, None, Fallback::Defaults, Fallback::Defaults);
        assert!(confidence <= 0.3);
        assert_eq!(dataset.provenance.node, Provenance::Default);
        assert_eq!(dataset.voltage_v(), Some(24.0));
        assert!(dataset.provenance.degraded());
    }

    #[test]
    fn live_state_without_retained_sample_still_falls_back() {
        // A source can be marked live with its reading already cleared by a
        // concurrent timeout zeroing; the dataset must not invent data.
        let (node, ctrl) = live_states();
        let (dataset, confidence) =
            DataArbiter.build(&node, &ctrl, None, None, Fallback::Defaults, Fallback::Defaults);
        assert_eq!(dataset.provenance.node, Provenance::Default);
        assert!(confidence <= 0.3);
    }

    #[test]
    fn rpm_prefers_the_larger_redundant_reading() {
        let dataset = WorkingDataset {
            node: NodeSample {
                rpm: Some(2_700.0),
                ..NodeSample::default()
            },
            controller: ControllerSample {
                rpm: Some(2_760.0),
                ..ControllerSample::default()
            },
            provenance: DataProvenance {
                node: Provenance::Live,
                controller: Provenance::Live,
                predictive_unavailable: false,
            },
        };
        assert_eq!(dataset.rpm(), Some(2_760.0));
    }
}
