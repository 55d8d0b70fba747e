//! Telemetry Readings and Ingestion-Time Validation
//!
//! ## Overview
//!
//! Two independent producers feed the engine:
//!
//! - the **sensor node**, an ambient/electrical board pushing current,
//!   voltage, shaft speed, and environment readings;
//! - the **controller**, a motor-controller register interface polled for
//!   case temperature, bus voltage, and its own speed reading.
//!
//! Each push becomes one immutable [`Reading`]. Field presence and
//! finiteness are checked exactly once, here, at ingestion; the scorers
//! downstream trust `Some(x)` to be a finite number and never re-validate.
//!
//! ## Samples versus readings
//!
//! The field payloads ([`NodeSample`], [`ControllerSample`]) are separate
//! from the receive timestamp because the same shapes carry three kinds of
//! data through the arbiter: a live reading, a historical average computed
//! by the store, and the safe-default operating point. Only the live case
//! has a meaningful `received_at`.

use crate::constants::thresholds;
use crate::errors::{HealthError, EngineResult};
use crate::time::Timestamp;
use core::fmt;
use serde::{Deserialize, Serialize};

/// One of the two independent telemetry producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Ambient/electrical sensor node.
    SensorNode,
    /// Motor-controller register interface.
    Controller,
}

impl Source {
    /// Human-readable name, stable across serialization.
    pub const fn name(&self) -> &'static str {
        match self {
            Source::SensorNode => "sensor_node",
            Source::Controller => "controller",
        }
    }

    /// Both sources, in a fixed order.
    pub const ALL: [Source; 2] = [Source::SensorNode, Source::Controller];
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::error::Error for Source {}

/// Field payload of a sensor-node push.
///
/// Every field is optional: the node reports what its attached sensors
/// produced this sample, and a missing sensor is normal, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeSample {
    /// Motor phase current in amperes.
    pub current_a: Option<f32>,
    /// Supply voltage in volts.
    pub voltage_v: Option<f32>,
    /// Shaft speed in rpm.
    pub rpm: Option<f32>,
    /// Ambient temperature in °C.
    pub ambient_temp_c: Option<f32>,
    /// Relative humidity in percent.
    pub humidity_pct: Option<f32>,
}

impl NodeSample {
    /// Reject NaN/infinite fields. Called once at ingestion.
    pub fn validate(&self) -> EngineResult<()> {
        check_finite(self.current_a, "current_a")?;
        check_finite(self.voltage_v, "voltage_v")?;
        check_finite(self.rpm, "rpm")?;
        check_finite(self.ambient_temp_c, "ambient_temp_c")?;
        check_finite(self.humidity_pct, "humidity_pct")?;
        Ok(())
    }

    /// Safe-default sample: the optimal operating point.
    ///
    /// Used as the last fallback when a source is dead and the store has no
    /// history at all. The low none-live confidence factor keeps a fully
    /// defaulted cycle out of the healthy status buckets.
    pub const fn safe_defaults() -> Self {
        Self {
            current_a: Some(thresholds::OPTIMAL_CURRENT_A),
            voltage_v: Some(thresholds::OPTIMAL_VOLTAGE_V),
            rpm: Some(thresholds::OPTIMAL_RPM),
            ambient_temp_c: Some(thresholds::OPTIMAL_AMBIENT_TEMP_C),
            humidity_pct: Some(thresholds::OPTIMAL_HUMIDITY_PCT),
        }
    }
}

/// Field payload of a controller register poll.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControllerSample {
    /// Motor case temperature in °C.
    pub motor_temp_c: Option<f32>,
    /// Motor bus voltage in volts.
    pub voltage_v: Option<f32>,
    /// Shaft speed in rpm, redundant with the node's reading.
    pub rpm: Option<f32>,
}

impl ControllerSample {
    /// Reject NaN/infinite fields. Called once at ingestion.
    pub fn validate(&self) -> EngineResult<()> {
        check_finite(self.motor_temp_c, "motor_temp_c")?;
        check_finite(self.voltage_v, "voltage_v")?;
        check_finite(self.rpm, "rpm")?;
        Ok(())
    }

    /// Safe-default sample: the optimal operating point.
    pub const fn safe_defaults() -> Self {
        Self {
            motor_temp_c: Some(thresholds::OPTIMAL_MOTOR_TEMP_C),
            voltage_v: Some(thresholds::OPTIMAL_VOLTAGE_V),
            rpm: Some(thresholds::OPTIMAL_RPM),
        }
    }
}

/// An immutable, validated telemetry reading from one source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading<S> {
    /// Validated field payload.
    pub sample: S,
    /// When the engine received it.
    pub received_at: Timestamp,
}

impl<S> Reading<S> {
    /// Wrap a validated sample with its receive time.
    pub fn new(sample: S, received_at: Timestamp) -> Self {
        Self {
            sample,
            received_at,
        }
    }
}

fn check_finite(value: Option<f32>, field: &'static str) -> EngineResult<()> {
    match value {
        Some(v) if !v.is_finite() => Err(HealthError::InvalidValue { field }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_sample_passes() {
        let sample = NodeSample {
            current_a: Some(6.25),
            voltage_v: Some(24.0),
            rpm: Some(2750.0),
            ambient_temp_c: Some(24.0),
            humidity_pct: None,
        };
        assert!(sample.validate().is_ok());
    }

    #[test]
    fn nan_is_rejected_with_field_name() {
        let sample = NodeSample {
            current_a: Some(f32::NAN),
            ..NodeSample::default()
        };
        assert_eq!(
            sample.validate(),
            Err(HealthError::InvalidValue { field: "current_a" })
        );
    }

    #[test]
    fn infinity_is_rejected() {
        let sample = ControllerSample {
            motor_temp_c: Some(f32::INFINITY),
            ..ControllerSample::default()
        };
        assert!(sample.validate().is_err());
    }

    #[test]
    fn defaults_sit_on_the_optimal_point() {
        let node = NodeSample::safe_defaults();
        assert_eq!(node.voltage_v, Some(24.0));
        assert_eq!(node.rpm, Some(2750.0));

        let ctrl = ControllerSample::safe_defaults();
        assert_eq!(ctrl.motor_temp_c, Some(40.0));
    }
}
