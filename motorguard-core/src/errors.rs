//! Error Types for the Health-Scoring Engine
//!
//! Nothing in this engine is fatal. Every variant here describes a degraded
//! path the caller is expected to take, not a reason to stop producing a
//! `HealthResult`:
//!
//! - `MissingData`: a scorer had no usable input. The aggregator excludes
//!   the domain and renormalizes its weights; the domain is reported as
//!   `no_data`, never as a healthy 100.
//! - `InvalidValue`: a reading failed the ingestion-time finite check and
//!   was rejected before it could reach a scorer.
//! - `StaleSource`: a source was disconnected at evaluation time. The
//!   arbiter substitutes historical data; callers only ever see this if
//!   they ask a source-specific question about a dead source.
//! - `OracleUnavailable`: the anomaly/fault oracle failed or is absent. The
//!   predictive component degrades to `no_data` with a provenance flag.
//!
//! Variants are small and `Copy`, with `&'static str` payloads only, so
//! they can be returned from per-cycle hot paths without allocation.

use crate::scorers::Domain;
use crate::reading::Source;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, HealthError>;

/// Recoverable failure modes of the scoring pipeline.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthError {
    /// A component scorer had no usable input for its domain.
    #[error("no usable {domain} data in working dataset")]
    MissingData {
        /// Domain that could not be scored.
        domain: Domain,
    },

    /// A reading field was NaN or infinite and was rejected at ingestion.
    #[error("invalid value for field {field}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A source was disconnected or timed out at evaluation time.
    #[error("source {source} is stale")]
    StaleSource {
        /// The stale source.
        source: Source,
    },

    /// The anomaly/fault oracle errored or is not configured.
    #[error("anomaly oracle unavailable: {reason}")]
    OracleUnavailable {
        /// Short machine-readable reason.
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_stay_small() {
        // Returned from per-cycle paths; keep them register-sized.
        assert!(core::mem::size_of::<HealthError>() <= 24);
    }

    #[test]
    fn display_names_domain() {
        let err = HealthError::MissingData {
            domain: Domain::Mechanical,
        };
        assert!(err.to_string().contains("mechanical"));
    }
}
