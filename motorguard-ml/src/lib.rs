//! Anomaly and Fault Oracle for MotorGuard
//!
//! ## Overview
//!
//! This crate is the concrete model behind `motorguard-core`'s
//! [`AnomalyOracle`](motorguard_core::AnomalyOracle) seam. The engine
//! consults it once per evaluation cycle and treats the answer as a scored
//! opinion; if this crate is absent or errors, the predictive component
//! degrades to `no_data` and the physics-based scores stand alone.
//!
//! ## Why an operating envelope?
//!
//! The telemetry here is five slowly varying physical channels from a
//! machine with a well-known nominal point. An operating-envelope model
//! (per-feature normalized deviation from nominal, combined with emphasis
//! on the worst channel) fits that regime:
//!
//! 1. **Deterministic**: same features, same score; replayable cycles.
//! 2. **No training window**: meaningful from the first reading, while a
//!    learned model would spend days collecting a baseline.
//! 3. **Attributable**: the dominant channel names the fault class, which
//!    is exactly what the maintenance rules want from `predict_fault`.
//!
//! The seam exists so this choice can be revisited without touching the
//! engine: anything implementing the oracle trait can replace it.
//!
//! ## Score semantics
//!
//! Scores are in `[0, 1]`: 0 means squarely inside the envelope, values
//! near 1 mean some channel is at or past its critical boundary. The
//! anomaly flag trips at [`ANOMALY_THRESHOLD`].
//!
//! [`ScoreHistory`] tracks recent scores with an exponential moving
//! average and a short linear trend, so a slow drift toward the envelope
//! edge is visible before any single reading is alarming.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod detector;
mod scoring;

pub use detector::{EnvelopeDetector, ANOMALY_THRESHOLD};
pub use scoring::ScoreHistory;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
