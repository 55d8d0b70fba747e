//! The Health Engine
//!
//! ## Overview
//!
//! [`HealthEngine`] is the single owner of everything a cycle mutates:
//! the freshness tracker, the latest retained readings, and the alert
//! ledger. There are no module-level singletons; callers hold the engine
//! by handle and whatever discipline guards that handle (a mutex in the
//! service crate, nothing at all in tests) serializes readings, sweeps,
//! evaluations, and acknowledgments in one stroke.
//!
//! ## Cycle protocol
//!
//! Evaluation is split so no I/O ever happens while the engine is held:
//!
//! 1. [`snapshot`](HealthEngine::snapshot): copy source states and the
//!    latest samples out of the engine;
//! 2. resolve: the caller queries the store for historical fallbacks and
//!    the oracle for its opinion, with the engine unlocked (the arbiter
//!    and feature extraction are pure and run anywhere);
//! 3. [`evaluate_prepared`](HealthEngine::evaluate_prepared): score,
//!    aggregate, run rules, rank, promote alerts, publish the result.
//!
//! [`evaluate_cycle`](HealthEngine::evaluate_cycle) composes the three
//! steps for synchronous callers (tests, in-process oracles).
//!
//! A cycle either completes and publishes a new [`HealthResult`], or the
//! previous result stays visible. The engine always answers; there is no
//! path that leaves a caller with nothing.

use crate::aggregate::{efficiency_score, Aggregator, HealthResult};
use crate::alerts::rules::{self, RuleContext};
use crate::alerts::{Alert, AlertGenerator, Recommendation};
use crate::arbiter::{DataArbiter, Fallback, WorkingDataset};
use crate::errors::EngineResult;
use crate::freshness::{FreshnessConfig, FreshnessTracker, SourceState, TimeoutEvent};
use crate::oracle::{AnomalyOpinion, AnomalyOracle, FeatureVector};
use crate::reading::{ControllerSample, NodeSample, Reading, Source};
use crate::scorers::{ElectricalScorer, HealthScorer, MechanicalScorer, ThermalScorer};
use crate::time::Timestamp;
use heapless::Vec as BoundedVec;

/// Engine configuration; everything else defaults from the constants.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    /// Per-source freshness timeouts.
    pub freshness: FreshnessConfig,
}

/// Copy of the shared state one cycle needs, taken under the handle.
#[derive(Debug, Clone, Copy)]
pub struct CycleSnapshot {
    /// Sensor-node liveness.
    pub node_state: SourceState,
    /// Controller liveness.
    pub controller_state: SourceState,
    /// Latest retained node sample, if any.
    pub live_node: Option<NodeSample>,
    /// Latest retained controller sample, if any.
    pub live_controller: Option<ControllerSample>,
}

impl CycleSnapshot {
    /// True when a historical fallback will be needed for the node.
    pub fn node_needs_fallback(&self) -> bool {
        !self.node_state.is_live() || self.live_node.is_none()
    }

    /// True when a historical fallback will be needed for the controller.
    pub fn controller_needs_fallback(&self) -> bool {
        !self.controller_state.is_live() || self.live_controller.is_none()
    }
}

/// Everything one completed cycle produced.
#[derive(Debug, Clone)]
pub struct EvaluationOutput {
    /// The published health picture.
    pub result: HealthResult,
    /// Ranked top-ten recommendations; never empty.
    pub recommendations: Vec<Recommendation>,
    /// Alerts newly created this cycle (after deduplication).
    pub new_alerts: Vec<Alert>,
}

/// Single-owner core of the telemetry health engine.
pub struct HealthEngine {
    tracker: FreshnessTracker,
    latest_node: Option<Reading<NodeSample>>,
    latest_controller: Option<Reading<ControllerSample>>,
    arbiter: DataArbiter,
    electrical: ElectricalScorer,
    thermal: ThermalScorer,
    mechanical: MechanicalScorer,
    aggregator: Aggregator,
    generator: AlertGenerator,
    last_result: Option<HealthResult>,
}

impl Default for HealthEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl HealthEngine {
    /// Create an engine with no data and an empty ledger.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            tracker: FreshnessTracker::new(config.freshness),
            latest_node: None,
            latest_controller: None,
            arbiter: DataArbiter,
            electrical: ElectricalScorer::default(),
            thermal: ThermalScorer::default(),
            mechanical: MechanicalScorer::default(),
            aggregator: Aggregator::default(),
            generator: AlertGenerator::default(),
            last_result: None,
        }
    }

    /// Ingest a sensor-node sample. Validates once; an invalid sample is
    /// rejected whole and does not touch freshness.
    pub fn ingest_node(&mut self, sample: NodeSample, now: Timestamp) -> EngineResult<()> {
        sample.validate()?;
        self.latest_node = Some(Reading::new(sample, now));
        self.tracker.record(Source::SensorNode, now);
        Ok(())
    }

    /// Ingest a controller sample.
    pub fn ingest_controller(
        &mut self,
        sample: ControllerSample,
        now: Timestamp,
    ) -> EngineResult<()> {
        sample.validate()?;
        self.latest_controller = Some(Reading::new(sample, now));
        self.tracker.record(Source::Controller, now);
        Ok(())
    }

    /// Run the timeout sweep. A source crossing its timeout is
    /// disconnected, its retained reading is cleared, and exactly one
    /// event per transition is returned for the caller to publish.
    pub fn sweep(&mut self, now: Timestamp) -> BoundedVec<TimeoutEvent, 2> {
        let events = self.tracker.sweep(now);
        for event in &events {
            match event.source {
                Source::SensorNode => self.latest_node = None,
                Source::Controller => self.latest_controller = None,
            }
        }
        events
    }

    /// Copy out what the resolve phase needs.
    pub fn snapshot(&self) -> CycleSnapshot {
        CycleSnapshot {
            node_state: *self.tracker.state(Source::SensorNode),
            controller_state: *self.tracker.state(Source::Controller),
            live_node: self.latest_node.map(|r| r.sample),
            live_controller: self.latest_controller.map(|r| r.sample),
        }
    }

    /// Score a prepared dataset and publish the cycle.
    ///
    /// `opinion` is the oracle outcome from the resolve phase: `None` when
    /// no oracle is configured, `Some(Err(_))` when it failed (which sets
    /// the `predictive_unavailable` provenance flag), and `Some(Ok(_))`
    /// when it answered.
    pub fn evaluate_prepared(
        &mut self,
        mut dataset: WorkingDataset,
        confidence: f32,
        opinion: Option<EngineResult<AnomalyOpinion>>,
        now: Timestamp,
    ) -> EvaluationOutput {
        let predictive = match opinion {
            Some(Ok(op)) => Some(op.predictive_score()),
            Some(Err(err)) => {
                log::warn!("predictive component unavailable: {err}");
                dataset.provenance.predictive_unavailable = true;
                None
            }
            None => None,
        };

        let result = self.aggregator.aggregate(
            self.electrical.score(&dataset),
            self.thermal.score(&dataset),
            self.mechanical.score(&dataset),
            predictive,
            efficiency_score(&dataset),
            confidence,
            dataset.provenance,
            now,
        );

        let candidates = rules::evaluate(&RuleContext {
            result: &result,
            dataset: &dataset,
            node_state: self.tracker.state(Source::SensorNode),
            controller_state: self.tracker.state(Source::Controller),
        });
        let recommendations = self.generator.rank(candidates);
        let new_alerts = self.generator.promote(&recommendations, now);

        self.last_result = Some(result);
        EvaluationOutput {
            result,
            recommendations,
            new_alerts,
        }
    }

    /// Full synchronous cycle: snapshot, arbitrate, consult the oracle,
    /// evaluate. Fallbacks must already be resolved by the caller.
    pub fn evaluate_cycle(
        &mut self,
        now: Timestamp,
        node_fallback: Fallback<NodeSample>,
        controller_fallback: Fallback<ControllerSample>,
        oracle: Option<&dyn AnomalyOracle>,
    ) -> EvaluationOutput {
        let snapshot = self.snapshot();
        let (dataset, confidence) = self.arbiter.build(
            &snapshot.node_state,
            &snapshot.controller_state,
            snapshot.live_node,
            snapshot.live_controller,
            node_fallback,
            controller_fallback,
        );
        let opinion = oracle.map(|o| o.score(&FeatureVector::from_dataset(&dataset)));
        self.evaluate_prepared(dataset, confidence, opinion, now)
    }

    /// Acknowledge an alert by id.
    pub fn acknowledge(&mut self, alert_id: u64, by: &str) -> bool {
        self.generator.acknowledge(alert_id, by)
    }

    /// The most recently published result, if any cycle has completed.
    pub fn last_result(&self) -> Option<&HealthResult> {
        self.last_result.as_ref()
    }

    /// Liveness state of one source.
    pub fn source_state(&self, source: Source) -> &SourceState {
        self.tracker.state(source)
    }

    /// The persisted-alert ledger.
    pub fn alerts(&self) -> &[Alert] {
        self.generator.ledger()
    }

    /// Ledger counts by severity: (low, medium, high, critical).
    pub fn alert_severity_counts(&self) -> (usize, usize, usize, usize) {
        self.generator.severity_counts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Status;
    use crate::errors::HealthError;

    fn nominal_node() -> NodeSample {
        NodeSample {
            current_a: Some(6.25),
            voltage_v: Some(24.0),
            rpm: Some(2750.0),
            ambient_temp_c: Some(24.0),
            humidity_pct: Some(40.0),
        }
    }

    fn nominal_controller() -> ControllerSample {
        ControllerSample {
            motor_temp_c: Some(40.0),
            voltage_v: Some(24.0),
            rpm: Some(2750.0),
        }
    }

    #[test]
    fn invalid_reading_does_not_touch_freshness() {
        let mut engine = HealthEngine::default();
        let bad = NodeSample {
            voltage_v: Some(f32::NAN),
            ..NodeSample::default()
        };
        assert!(matches!(
            engine.ingest_node(bad, 1_000),
            Err(HealthError::InvalidValue { .. })
        ));
        assert!(!engine.source_state(Source::SensorNode).connected);
        assert!(engine.snapshot().live_node.is_none());
    }

    #[test]
    fn sweep_clears_the_timed_out_reading() {
        let mut engine = HealthEngine::default();
        engine.ingest_node(nominal_node(), 0).unwrap();
        assert!(engine.snapshot().live_node.is_some());

        let events = engine.sweep(35_000);
        assert_eq!(events.len(), 1);
        assert!(engine.snapshot().live_node.is_none());
    }

    #[test]
    fn engine_always_answers_even_empty() {
        // No readings, no history, no oracle: still a result.
        let mut engine = HealthEngine::default();
        let output = engine.evaluate_cycle(0, Fallback::Defaults, Fallback::Defaults, None);
        assert!(output.result.overall <= 30.0);
        assert!(!output.recommendations.is_empty());
        assert_eq!(engine.last_result().unwrap().status, output.result.status);
    }

    #[test]
    fn failed_oracle_sets_the_provenance_flag() {
        struct DeadOracle;
        impl AnomalyOracle for DeadOracle {
            fn score(&self, _: &FeatureVector) -> EngineResult<AnomalyOpinion> {
                Err(HealthError::OracleUnavailable { reason: "down" })
            }
            fn predict_fault(
                &self,
                _: &FeatureVector,
            ) -> EngineResult<crate::oracle::FaultPrediction> {
                Err(HealthError::OracleUnavailable { reason: "down" })
            }
        }

        let mut engine = HealthEngine::default();
        engine.ingest_node(nominal_node(), 0).unwrap();
        engine.ingest_controller(nominal_controller(), 0).unwrap();

        let output =
            engine.evaluate_cycle(1_000, Fallback::Defaults, Fallback::Defaults, Some(&DeadOracle));
        assert_eq!(output.result.predictive, None);
        assert!(output.result.provenance.predictive_unavailable);
        // The physics-based picture is untouched.
        assert_eq!(output.result.status, Status::Excellent);
    }

    #[test]
    fn previous_result_survives_until_replaced() {
        let mut engine = HealthEngine::default();
        engine.ingest_node(nominal_node(), 0).unwrap();
        engine.ingest_controller(nominal_controller(), 0).unwrap();

        let first = engine.evaluate_cycle(1_000, Fallback::Defaults, Fallback::Defaults, None);
        assert_eq!(engine.last_result().unwrap().overall, first.result.overall);

        let second = engine.evaluate_cycle(16_000, Fallback::Defaults, Fallback::Defaults, None);
        assert_eq!(
            engine.last_result().unwrap().evaluated_at,
            second.result.evaluated_at
        );
    }
}
