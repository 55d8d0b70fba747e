//! Per-Source Liveness State Machine
//!
//! ## Overview
//!
//! Each telemetry source carries a [`SourceState`] that only this module
//! mutates. The lifecycle:
//!
//! ```text
//! NoData ──reading──▶ Good ──age > warn──▶ Stale ──age > timeout──▶ Timeout
//!                      ▲                     │                        │
//!                      └─────── reading ─────┴──────── reading ───────┘
//! ```
//!
//! A new reading reconnects a source from *any* state. Crossing the timeout
//! boundary disconnects it and emits exactly one [`TimeoutEvent`]; the
//! caller is expected to clear the source's live fields in the same step so
//! a dead source can never contribute "live" data to a later cycle.
//!
//! ## Idempotence
//!
//! `sweep` may run any number of times between readings. A source that is
//! already disconnected is left untouched: no second event, no state
//! churn. The integration tests sweep twice at the same instant and assert
//! bit-identical states.

use crate::constants::time as time_consts;
use crate::reading::Source;
use crate::time::{age_ms, Timestamp};
use heapless::Vec;
use serde::{Deserialize, Serialize};

/// Freshness classification of a source's last reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkQuality {
    /// No reading has ever arrived.
    NoData,
    /// Last reading is within the warn window.
    Good,
    /// Last reading is older than the warn threshold but not timed out.
    Stale,
    /// Source exceeded its timeout and was disconnected.
    Timeout,
}

/// Liveness record for one source. Mutated only by [`FreshnessTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceState {
    /// Which source this record tracks.
    pub source: Source,
    /// Whether the source is currently considered connected.
    pub connected: bool,
    /// Receive time of the most recent reading, if any.
    pub last_seen: Option<Timestamp>,
    /// Freshness classification.
    pub quality: LinkQuality,
}

impl SourceState {
    fn new(source: Source) -> Self {
        Self {
            source,
            connected: false,
            last_seen: None,
            quality: LinkQuality::NoData,
        }
    }

    /// True when the source may contribute live data to a working dataset.
    pub fn is_live(&self) -> bool {
        self.connected && matches!(self.quality, LinkQuality::Good | LinkQuality::Stale)
    }
}

/// Emitted once per timeout transition, for transport collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeoutEvent {
    /// Source that went silent.
    pub source: Source,
    /// How long it had been silent when the sweep caught it.
    pub silent_for_ms: u64,
    /// Sweep time at which the transition happened.
    pub at: Timestamp,
}

/// Per-source timeout configuration.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessConfig {
    /// Sensor-node timeout in milliseconds.
    pub node_timeout_ms: u64,
    /// Controller timeout in milliseconds.
    pub controller_timeout_ms: u64,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            node_timeout_ms: time_consts::NODE_TIMEOUT_MS,
            controller_timeout_ms: time_consts::CONTROLLER_TIMEOUT_MS,
        }
    }
}

impl FreshnessConfig {
    fn timeout_ms(&self, source: Source) -> u64 {
        match source {
            Source::SensorNode => self.node_timeout_ms,
            Source::Controller => self.controller_timeout_ms,
        }
    }

    fn stale_ms(&self, source: Source) -> u64 {
        (self.timeout_ms(source) as f64 * time_consts::STALE_FRACTION) as u64
    }
}

/// Owns both [`SourceState`] records and applies the liveness rules.
#[derive(Debug, Clone)]
pub struct FreshnessTracker {
    config: FreshnessConfig,
    node: SourceState,
    controller: SourceState,
}

impl Default for FreshnessTracker {
    fn default() -> Self {
        Self::new(FreshnessConfig::default())
    }
}

impl FreshnessTracker {
    /// Create a tracker with both sources in the `NoData` state.
    pub fn new(config: FreshnessConfig) -> Self {
        Self {
            config,
            node: SourceState::new(Source::SensorNode),
            controller: SourceState::new(Source::Controller),
        }
    }

    /// Mark a source live: a reading arrived at `now`.
    pub fn record(&mut self, source: Source, now: Timestamp) {
        let state = self.state_mut(source);
        if !state.connected {
            log::info!("{source} connected");
        }
        state.connected = true;
        state.last_seen = Some(now);
        state.quality = LinkQuality::Good;
    }

    /// Apply the timeout rules at `now`.
    ///
    /// Returns the timeout transitions that happened during this sweep; at
    /// most one per source, and none for sources already disconnected.
    pub fn sweep(&mut self, now: Timestamp) -> Vec<TimeoutEvent, 2> {
        let mut events = Vec::new();
        for source in Source::ALL {
            let timeout = self.config.timeout_ms(source);
            let stale = self.config.stale_ms(source);
            let state = self.state_mut(source);

            let Some(last_seen) = state.last_seen else {
                continue;
            };
            if !state.connected {
                continue;
            }

            let age = age_ms(last_seen, now);
            if age > timeout {
                state.connected = false;
                state.quality = LinkQuality::Timeout;
                log::warn!("{source} timed out after {}s of silence", age / 1_000);
                // Capacity is one slot per source; this cannot fail.
                let _ = events.push(TimeoutEvent {
                    source,
                    silent_for_ms: age,
                    at: now,
                });
            } else if age > stale {
                state.quality = LinkQuality::Stale;
            }
        }
        events
    }

    /// State of one source.
    pub fn state(&self, source: Source) -> &SourceState {
        match source {
            Source::SensorNode => &self.node,
            Source::Controller => &self.controller,
        }
    }

    fn state_mut(&mut self, source: Source) -> &mut SourceState {
        match source {
            Source::SensorNode => &mut self.node,
            Source::Controller => &mut self.controller,
        }
    }
}
