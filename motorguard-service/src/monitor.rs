//! The Monitor Runtime
//!
//! ## Overview
//!
//! [`Monitor`] wraps a [`HealthEngine`] in the one consistent concurrency
//! discipline the engine requires: a single async mutex. Hardware-adapter
//! collaborators push readings in; the timeout sweep and the evaluation
//! cycle run as periodic tasks against the same handle; transport
//! collaborators subscribe to a broadcast stream of [`EngineEvent`]s and
//! relay them unmodified.
//!
//! ## Lock protocol
//!
//! Nothing awaits while the engine is held. The evaluation cycle is:
//!
//! ```text
//! lock → snapshot → unlock
//!      → store lookups + oracle (no lock)
//! lock → evaluate → unlock
//!      → save result, publish events (no lock)
//! ```
//!
//! A failed save is reported on the outcome and in the log, but the
//! computed result is still published and retained: a stale-but-valid
//! score beats an absent one, and a dead database must never silence the
//! alert stream.

use crate::store::{resolve_controller_fallback, resolve_node_fallback, HealthStore, StoreError};
use motorguard_core::{
    Alert, AnomalyOracle, ControllerSample, DataArbiter, EngineConfig, Fallback, FeatureVector,
    HealthEngine, HealthError, HealthResult, NodeSample, Reading, SystemClock, TimeSource,
    TimeoutEvent,
};
use motorguard_ml::ScoreHistory;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use motorguard_core::constants::time as time_consts;

/// Service-level failures.
///
/// Persistence failures are deliberately absent: a cycle completes and
/// publishes its result whether or not the store accepted it, so store
/// errors travel on [`CycleOutcome::persistence`] instead of failing an
/// operation.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// A pushed reading failed ingestion validation.
    #[error("invalid reading: {0}")]
    InvalidReading(#[from] HealthError),
}

/// Event stream payload relayed to transport collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A newly created maintenance alert.
    Alert(Alert),
    /// A source crossed its freshness timeout.
    Timeout(TimeoutEvent),
}

/// Interval configuration for the periodic tasks.
#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    /// Timeout-sweep interval.
    pub sweep_interval: Duration,
    /// Evaluation-cycle interval.
    pub evaluate_interval: Duration,
    /// Engine configuration passed through.
    pub engine: EngineConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_millis(time_consts::SWEEP_INTERVAL_MS),
            evaluate_interval: Duration::from_millis(time_consts::EVALUATE_INTERVAL_MS),
            engine: EngineConfig::default(),
        }
    }
}

/// What one driven evaluation cycle produced.
#[derive(Debug)]
pub struct CycleOutcome {
    /// The published result.
    pub result: HealthResult,
    /// Whether the store accepted it. The result is valid either way.
    pub persistence: Result<(), StoreError>,
}

impl CycleOutcome {
    /// True when the save side effect succeeded.
    pub fn persisted(&self) -> bool {
        self.persistence.is_ok()
    }
}

/// Owns the engine handle, the collaborators, and the periodic tasks.
pub struct Monitor {
    engine: Mutex<HealthEngine>,
    store: Arc<dyn HealthStore>,
    oracle: Option<Arc<dyn AnomalyOracle + Send + Sync>>,
    clock: Arc<dyn TimeSource + Send + Sync>,
    events: broadcast::Sender<EngineEvent>,
    score_history: Mutex<ScoreHistory<100>>,
    config: MonitorConfig,
}

/// Buffered events per subscriber before lagging.
const EVENT_CHANNEL_CAPACITY: usize = 64;

impl Monitor {
    /// Create a monitor around the given collaborators.
    pub fn new(
        store: Arc<dyn HealthStore>,
        oracle: Option<Arc<dyn AnomalyOracle + Send + Sync>>,
        config: MonitorConfig,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            engine: Mutex::new(HealthEngine::new(config.engine)),
            store,
            oracle,
            clock: Arc::new(SystemClock),
            events,
            score_history: Mutex::new(ScoreHistory::default()),
            config,
        })
    }

    /// Replace the wall clock; tests drive cycles against a fixed one.
    pub fn with_clock(
        store: Arc<dyn HealthStore>,
        oracle: Option<Arc<dyn AnomalyOracle + Send + Sync>>,
        config: MonitorConfig,
        clock: Arc<dyn TimeSource + Send + Sync>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            engine: Mutex::new(HealthEngine::new(config.engine)),
            store,
            oracle,
            clock,
            events,
            score_history: Mutex::new(ScoreHistory::default()),
            config,
        })
    }

    /// Spawn the sweep and evaluation tasks. Call once; the returned
    /// handles stop the loops when aborted or when the monitor is dropped
    /// by the runtime.
    pub fn start(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::with_capacity(2);

        let monitor = Arc::clone(self);
        handles.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(monitor.config.sweep_interval);
            loop {
                ticker.tick().await;
                monitor.sweep().await;
            }
        }));

        let monitor = Arc::clone(self);
        handles.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(monitor.config.evaluate_interval);
            loop {
                ticker.tick().await;
                // A cycle always publishes; save failures are already
                // logged inside.
                let _ = monitor.evaluate_cycle().await;
            }
        }));

        log::info!(
            "monitor started (sweep {:?}, evaluate {:?})",
            self.config.sweep_interval,
            self.config.evaluate_interval
        );
        handles
    }

    /// Push a sensor-node reading. One call per sample, per the hardware
    /// adapter's contract.
    pub async fn ingest_node(&self, sample: NodeSample) -> Result<(), MonitorError> {
        let now = self.clock.now();
        self.engine.lock().await.ingest_node(sample, now)?;
        // Recording feeds future historical averages; a store failure here
        // loses history, not the reading.
        if let Err(err) = self.store.record_node(Reading::new(sample, now)).await {
            log::warn!("failed to record node reading: {err}");
        }
        Ok(())
    }

    /// Push a controller reading.
    pub async fn ingest_controller(&self, sample: ControllerSample) -> Result<(), MonitorError> {
        let now = self.clock.now();
        self.engine.lock().await.ingest_controller(sample, now)?;
        if let Err(err) = self
            .store
            .record_controller(Reading::new(sample, now))
            .await
        {
            log::warn!("failed to record controller reading: {err}");
        }
        Ok(())
    }

    /// Run one timeout sweep and publish any transitions.
    pub async fn sweep(&self) {
        let now = self.clock.now();
        let events = self.engine.lock().await.sweep(now);
        for event in events {
            let _ = self.events.send(EngineEvent::Timeout(event));
        }
    }

    /// Run one evaluation cycle: snapshot, resolve, evaluate, publish.
    ///
    /// Infallible by design: every cycle ends with a published result.
    pub async fn evaluate_cycle(&self) -> CycleOutcome {
        let now = self.clock.now();

        // Phase 1: copy shared state out; nothing else happens under the
        // lock.
        let snapshot = self.engine.lock().await.snapshot();

        // Phase 2: resolve collaborators with the engine unlocked. The
        // arbiter and feature extraction are pure, so the dataset can be
        // built out here too.
        let node_fallback = if snapshot.node_needs_fallback() {
            resolve_node_fallback(self.store.as_ref(), now).await
        } else {
            // Ignored by the arbiter when the source is live.
            Fallback::Defaults
        };
        let controller_fallback = if snapshot.controller_needs_fallback() {
            resolve_controller_fallback(self.store.as_ref(), now).await
        } else {
            Fallback::Defaults
        };

        let (dataset, confidence) = DataArbiter.build(
            &snapshot.node_state,
            &snapshot.controller_state,
            snapshot.live_node,
            snapshot.live_controller,
            node_fallback,
            controller_fallback,
        );

        let features = FeatureVector::from_dataset(&dataset);
        let opinion = self.oracle.as_deref().map(|oracle| oracle.score(&features));
        if let Some(Ok(op)) = &opinion {
            let mut history = self.score_history.lock().await;
            history.add(op);
            if history.is_rising() && history.len() >= 10 {
                log::warn!("anomaly level trending upward (ema {:.2})", history.ema());
            }
            drop(history);

            if op.anomaly {
                // Name the likely fault while the anomaly is live.
                match self.oracle.as_deref().map(|o| o.predict_fault(&features)) {
                    Some(Ok(prediction)) => log::warn!(
                        "anomaly (score {:.2}): likely fault {:?} (p={:.2})",
                        op.score,
                        prediction.class,
                        prediction.probability
                    ),
                    _ => log::warn!("anomaly (score {:.2}): fault class unavailable", op.score),
                }
            }
        }

        // Phase 3: score and publish under the lock, then let go.
        let output = self
            .engine
            .lock()
            .await
            .evaluate_prepared(dataset, confidence, opinion, now);

        for alert in &output.new_alerts {
            let _ = self.events.send(EngineEvent::Alert(alert.clone()));
        }

        // Phase 4: persistence side effect. Failure is reported, not fatal.
        let persistence = self.store.save(&output.result).await;
        if let Err(err) = &persistence {
            log::error!("failed to persist health result: {err}");
        }

        CycleOutcome {
            result: output.result,
            persistence,
        }
    }

    /// Acknowledge an alert by id.
    pub async fn acknowledge(&self, alert_id: u64, by: &str) -> bool {
        self.engine.lock().await.acknowledge(alert_id, by)
    }

    /// The most recently published result.
    pub async fn latest(&self) -> Option<HealthResult> {
        self.engine.lock().await.last_result().copied()
    }

    /// Subscribe to the alert/timeout event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the alert ledger for dashboards.
    pub async fn alert_statistics(&self) -> AlertStatistics {
        let engine = self.engine.lock().await;
        let (low, medium, high, critical) = engine.alert_severity_counts();
        AlertStatistics {
            total: engine.alerts().len(),
            open: engine.alerts().iter().filter(|a| !a.acknowledged).count(),
            low,
            medium,
            high,
            critical,
        }
    }
}

/// Ledger counts by severity and acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertStatistics {
    /// All alerts currently retained.
    pub total: usize,
    /// Unacknowledged alerts.
    pub open: usize,
    /// LOW-severity count.
    pub low: usize,
    /// MEDIUM-severity count.
    pub medium: usize,
    /// HIGH-severity count.
    pub high: usize,
    /// CRITICAL-severity count.
    pub critical: usize,
}
