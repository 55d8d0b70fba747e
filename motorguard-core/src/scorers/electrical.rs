//! Electrical health scorer
//!
//! Scores the power-system side of the motor from phase current and supply
//! voltage. Voltage deviation is penalized on both sides of nominal; for
//! current, the interesting failures are asymmetric: overcurrent cooks
//! windings, undercurrent usually means the motor has lost its load.

use crate::arbiter::WorkingDataset;
use crate::constants::{scoring, thresholds};
use crate::errors::{HealthError, EngineResult};
use crate::scorers::utils::{finish, tier_penalty};
use crate::scorers::{ComponentScore, Domain, HealthScorer};

/// Scorer for supply voltage and phase current.
#[derive(Debug, Clone, Copy)]
pub struct ElectricalScorer {
    floor: f32,
}

impl Default for ElectricalScorer {
    fn default() -> Self {
        Self {
            floor: scoring::ELECTRICAL_FLOOR,
        }
    }
}

impl ElectricalScorer {
    fn voltage_penalty(voltage: f32) -> f32 {
        use thresholds::*;

        if voltage < VOLTAGE_MIN_CRITICAL_V {
            tier_penalty(
                VOLTAGE_MIN_CRITICAL_V - voltage,
                scoring::PENALTY_VOLTAGE_CRITICAL,
                scoring::PENALTY_VOLTAGE_SLOPE,
                scoring::PENALTY_VOLTAGE_SLOPE_CAP,
            )
        } else if voltage < VOLTAGE_MIN_WARNING_V {
            tier_penalty(
                VOLTAGE_MIN_WARNING_V - voltage,
                scoring::PENALTY_VOLTAGE_WARNING,
                scoring::PENALTY_VOLTAGE_SLOPE,
                scoring::PENALTY_VOLTAGE_SLOPE_CAP,
            )
        } else if voltage > VOLTAGE_MAX_CRITICAL_V {
            tier_penalty(
                voltage - VOLTAGE_MAX_CRITICAL_V,
                scoring::PENALTY_VOLTAGE_CRITICAL,
                scoring::PENALTY_VOLTAGE_SLOPE,
                scoring::PENALTY_VOLTAGE_SLOPE_CAP,
            )
        } else if voltage > VOLTAGE_MAX_WARNING_V {
            tier_penalty(
                voltage - VOLTAGE_MAX_WARNING_V,
                scoring::PENALTY_VOLTAGE_WARNING,
                scoring::PENALTY_VOLTAGE_SLOPE,
                scoring::PENALTY_VOLTAGE_SLOPE_CAP,
            )
        } else {
            0.0
        }
    }

    fn current_penalty(current: f32) -> f32 {
        use thresholds::*;

        if current > CURRENT_MAX_CRITICAL_A {
            tier_penalty(
                current - CURRENT_MAX_CRITICAL_A,
                scoring::PENALTY_CURRENT_CRITICAL,
                scoring::PENALTY_CURRENT_SLOPE,
                scoring::PENALTY_CURRENT_SLOPE_CAP,
            )
        } else if current > CURRENT_MAX_WARNING_A {
            tier_penalty(
                current - CURRENT_MAX_WARNING_A,
                scoring::PENALTY_CURRENT_WARNING,
                scoring::PENALTY_CURRENT_SLOPE,
                scoring::PENALTY_CURRENT_SLOPE_CAP,
            )
        } else if current < CURRENT_MIN_WARNING_A {
            // Possible no-load condition: belt snapped, coupling sheared.
            tier_penalty(
                CURRENT_MIN_WARNING_A - current,
                scoring::PENALTY_CURRENT_LOW,
                scoring::PENALTY_CURRENT_SLOPE,
                scoring::PENALTY_CURRENT_SLOPE_CAP,
            )
        } else {
            0.0
        }
    }
}

impl HealthScorer for ElectricalScorer {
    fn domain(&self) -> Domain {
        Domain::Electrical
    }

    fn floor(&self) -> f32 {
        self.floor
    }

    fn score(&self, data: &WorkingDataset) -> EngineResult<ComponentScore> {
        let voltage = data.voltage_v();
        let current = data.current_a();

        if voltage.is_none() && current.is_none() {
            return Err(HealthError::MissingData {
                domain: Domain::Electrical,
            });
        }

        let mut raw = 100.0;
        if let Some(v) = voltage {
            raw -= Self::voltage_penalty(v);
        }
        if let Some(c) = current {
            raw -= Self::current_penalty(c);
        }

        Ok(finish(Domain::Electrical, raw, self.floor))
    }
}
