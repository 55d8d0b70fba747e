//! Persistence Trait and In-Memory Store
//!
//! ## Overview
//!
//! The engine never talks to a database; it talks to [`HealthStore`], an
//! async collaborator that records readings and results and answers
//! historical-average queries. A relational implementation lives with
//! whoever deploys the service; [`MemoryStore`] here backs tests and
//! single-process deployments with bounded ring buffers.
//!
//! ## Fallback resolution
//!
//! [`resolve_node_fallback`] and [`resolve_controller_fallback`] implement
//! the lookback policy: average over the last 24 hours; if that window is
//! empty, widen once to 7 days; if still empty, or the store errors, fall
//! back to the safe-default constants. Store failures on the lookup
//! path degrade, they never fail a cycle.

use async_trait::async_trait;
use motorguard_core::constants::time as time_consts;
use motorguard_core::{
    ControllerSample, Fallback, HealthResult, NodeSample, Reading, Timestamp,
};
use std::collections::VecDeque;
use thiserror::Error;
use tokio::sync::Mutex;

/// Failures of the persistence collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached or rejected the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Async persistence collaborator.
#[async_trait]
pub trait HealthStore: Send + Sync {
    /// Persist one cycle's result.
    async fn save(&self, result: &HealthResult) -> Result<(), StoreError>;

    /// Persist a sensor-node reading.
    async fn record_node(&self, reading: Reading<NodeSample>) -> Result<(), StoreError>;

    /// Persist a controller reading.
    async fn record_controller(
        &self,
        reading: Reading<ControllerSample>,
    ) -> Result<(), StoreError>;

    /// Average node sample over `[now - lookback_ms, now]`, or `None` when
    /// the window holds no readings.
    async fn node_average(
        &self,
        lookback_ms: u64,
        now: Timestamp,
    ) -> Result<Option<NodeSample>, StoreError>;

    /// Average controller sample over the window.
    async fn controller_average(
        &self,
        lookback_ms: u64,
        now: Timestamp,
    ) -> Result<Option<ControllerSample>, StoreError>;
}

/// Resolve the sensor-node fallback for one cycle.
pub async fn resolve_node_fallback(store: &dyn HealthStore, now: Timestamp) -> Fallback<NodeSample> {
    for lookback in [
        time_consts::HISTORY_LOOKBACK_MS,
        time_consts::HISTORY_LOOKBACK_WIDE_MS,
    ] {
        match store.node_average(lookback, now).await {
            Ok(Some(sample)) => return Fallback::Historical(sample),
            Ok(None) => continue,
            Err(err) => {
                log::warn!("node history lookup failed, using defaults: {err}");
                return Fallback::Defaults;
            }
        }
    }
    Fallback::Defaults
}

/// Resolve the controller fallback for one cycle.
pub async fn resolve_controller_fallback(
    store: &dyn HealthStore,
    now: Timestamp,
) -> Fallback<ControllerSample> {
    for lookback in [
        time_consts::HISTORY_LOOKBACK_MS,
        time_consts::HISTORY_LOOKBACK_WIDE_MS,
    ] {
        match store.controller_average(lookback, now).await {
            Ok(Some(sample)) => return Fallback::Historical(sample),
            Ok(None) => continue,
            Err(err) => {
                log::warn!("controller history lookup failed, using defaults: {err}");
                return Fallback::Defaults;
            }
        }
    }
    Fallback::Defaults
}

/// Readings retained per source in the in-memory store.
const MEMORY_CAPACITY: usize = 4_096;

#[derive(Default)]
struct MemoryInner {
    node: VecDeque<Reading<NodeSample>>,
    controller: VecDeque<Reading<ControllerSample>>,
    results: VecDeque<HealthResult>,
}

/// Bounded in-memory store for tests and single-process deployments.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted results.
    pub async fn result_count(&self) -> usize {
        self.inner.lock().await.results.len()
    }
}

fn push_bounded<T>(queue: &mut VecDeque<T>, value: T) {
    if queue.len() == MEMORY_CAPACITY {
        queue.pop_front();
    }
    queue.push_back(value);
}

/// Mean of the present values of one optional field across a window.
fn mean_of<T, F>(items: &VecDeque<Reading<T>>, window_start: Timestamp, field: F) -> Option<f32>
where
    F: Fn(&T) -> Option<f32>,
{
    let mut sum = 0.0;
    let mut count = 0u32;
    for reading in items.iter().filter(|r| r.received_at >= window_start) {
        if let Some(value) = field(&reading.sample) {
            sum += value;
            count += 1;
        }
    }
    (count > 0).then(|| sum / count as f32)
}

#[async_trait]
impl HealthStore for MemoryStore {
    async fn save(&self, result: &HealthResult) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        push_bounded(&mut inner.results, *result);
        Ok(())
    }

    async fn record_node(&self, reading: Reading<NodeSample>) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        push_bounded(&mut inner.node, reading);
        Ok(())
    }

    async fn record_controller(
        &self,
        reading: Reading<ControllerSample>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        push_bounded(&mut inner.controller, reading);
        Ok(())
    }

    async fn node_average(
        &self,
        lookback_ms: u64,
        now: Timestamp,
    ) -> Result<Option<NodeSample>, StoreError> {
        let inner = self.inner.lock().await;
        let start = now.saturating_sub(lookback_ms);
        let any = inner.node.iter().any(|r| r.received_at >= start);
        if !any {
            return Ok(None);
        }
        Ok(Some(NodeSample {
            current_a: mean_of(&inner.node, start, |s| s.current_a),
            voltage_v: mean_of(&inner.node, start, |s| s.voltage_v),
            rpm: mean_of(&inner.node, start, |s| s.rpm),
            ambient_temp_c: mean_of(&inner.node, start, |s| s.ambient_temp_c),
            humidity_pct: mean_of(&inner.node, start, |s| s.humidity_pct),
        }))
    }

    async fn controller_average(
        &self,
        lookback_ms: u64,
        now: Timestamp,
    ) -> Result<Option<ControllerSample>, StoreError> {
        let inner = self.inner.lock().await;
        let start = now.saturating_sub(lookback_ms);
        let any = inner.controller.iter().any(|r| r.received_at >= start);
        if !any {
            return Ok(None);
        }
        Ok(Some(ControllerSample {
            motor_temp_c: mean_of(&inner.controller, start, |s| s.motor_temp_c),
            voltage_v: mean_of(&inner.controller, start, |s| s.voltage_v),
            rpm: mean_of(&inner.controller, start, |s| s.rpm),
        }))
    }
}
