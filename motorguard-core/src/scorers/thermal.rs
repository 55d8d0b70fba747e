//! Thermal health scorer
//!
//! Motor case temperature dominates: winding insulation life roughly
//! halves for every 10 °C above rating, so the tiers ramp hard past the
//! critical boundary. Ambient temperature and humidity contribute minor
//! penalties; they shape how fast the case heats but are not the failure
//! themselves.

use crate::arbiter::WorkingDataset;
use crate::constants::{scoring, thresholds};
use crate::errors::{HealthError, EngineResult};
use crate::scorers::utils::{finish, tier_penalty};
use crate::scorers::{ComponentScore, Domain, HealthScorer};

/// Scorer for motor and ambient temperature plus humidity.
#[derive(Debug, Clone, Copy)]
pub struct ThermalScorer {
    floor: f32,
}

impl Default for ThermalScorer {
    fn default() -> Self {
        Self {
            floor: scoring::THERMAL_FLOOR,
        }
    }
}

impl ThermalScorer {
    fn motor_temp_penalty(temp: f32) -> f32 {
        use thresholds::*;

        if temp > MOTOR_TEMP_CRITICAL_C {
            tier_penalty(
                temp - MOTOR_TEMP_CRITICAL_C,
                scoring::PENALTY_MOTOR_TEMP_CRITICAL,
                scoring::PENALTY_MOTOR_TEMP_SLOPE,
                scoring::PENALTY_MOTOR_TEMP_SLOPE_CAP,
            )
        } else if temp > MOTOR_TEMP_WARNING_C {
            tier_penalty(
                temp - MOTOR_TEMP_WARNING_C,
                scoring::PENALTY_MOTOR_TEMP_WARNING,
                scoring::PENALTY_MOTOR_TEMP_SLOPE,
                scoring::PENALTY_MOTOR_TEMP_SLOPE_CAP,
            )
        } else if temp > MOTOR_TEMP_ELEVATED_C {
            tier_penalty(
                temp - MOTOR_TEMP_ELEVATED_C,
                scoring::PENALTY_MOTOR_TEMP_ELEVATED,
                scoring::PENALTY_MOTOR_TEMP_SLOPE,
                scoring::PENALTY_MOTOR_TEMP_SLOPE_CAP,
            )
        } else {
            0.0
        }
    }

    fn ambient_penalty(temp: f32) -> f32 {
        use thresholds::*;

        if temp > AMBIENT_TEMP_CRITICAL_C {
            scoring::PENALTY_AMBIENT_CRITICAL
        } else if temp > AMBIENT_TEMP_WARNING_C {
            scoring::PENALTY_AMBIENT_WARNING
        } else {
            0.0
        }
    }

    fn humidity_penalty(humidity: f32) -> f32 {
        use thresholds::*;

        if humidity > HUMIDITY_MAX_CRITICAL_PCT {
            scoring::PENALTY_HUMIDITY_CRITICAL
        } else if humidity > HUMIDITY_MAX_WARNING_PCT {
            scoring::PENALTY_HUMIDITY_WARNING
        } else if humidity < HUMIDITY_MIN_WARNING_PCT {
            scoring::PENALTY_HUMIDITY_LOW
        } else {
            0.0
        }
    }
}

impl HealthScorer for ThermalScorer {
    fn domain(&self) -> Domain {
        Domain::Thermal
    }

    fn floor(&self) -> f32 {
        self.floor
    }

    fn score(&self, data: &WorkingDataset) -> EngineResult<ComponentScore> {
        let motor_temp = data.motor_temp_c();
        let ambient = data.ambient_temp_c();

        if motor_temp.is_none() && ambient.is_none() {
            return Err(HealthError::MissingData {
                domain: Domain::Thermal,
            });
        }

        let mut raw = 100.0;
        if let Some(t) = motor_temp {
            raw -= Self::motor_temp_penalty(t);
        }
        if let Some(t) = ambient {
            raw -= Self::ambient_penalty(t);
        }
        if let Some(h) = data.humidity_pct() {
            raw -= Self::humidity_penalty(h);
        }

        Ok(finish(Domain::Thermal, raw, self.floor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbiter::{DataProvenance, Provenance};
    use crate::reading::{ControllerSample, NodeSample};

    fn dataset(motor_temp: Option<f32>, ambient: Option<f32>, humidity: Option<f32>) -> WorkingDataset {
        WorkingDataset {
            node: NodeSample {
                ambient_temp_c: ambient,
                humidity_pct: humidity,
                ..NodeSample::default()
            },
            controller: ControllerSample {
                motor_temp_c: motor_temp,
                ..ControllerSample::default()
            },
            provenance: DataProvenance {
                node: Provenance::Live,
                controller: Provenance::Live,
                predictive_unavailable: false,
            },
        }
    }

    #[test]
    fn nominal_case_temp_scores_perfect() {
        let score = ThermalScorer::default()
            .score(&dataset(Some(40.0), Some(24.0), Some(40.0)))
            .unwrap();
        assert_eq!(score.value, 100.0);
    }

    #[test]
    fn temperature_tiers_escalate() {
        let scorer = ThermalScorer::default();
        let elevated = scorer.score(&dataset(Some(45.0), None, None)).unwrap();
        let warning = scorer.score(&dataset(Some(55.0), None, None)).unwrap();
        let critical = scorer.score(&dataset(Some(65.0), None, None)).unwrap();
        assert!(elevated.value < 100.0);
        assert!(warning.value < elevated.value);
        assert!(critical.value < warning.value);
    }

    #[test]
    fn overheat_collapses_to_floor() {
        // 90°C: 30°C past critical saturates the tier and hits the floor.
        let score = ThermalScorer::default()
            .score(&dataset(Some(90.0), None, None))
            .unwrap();
        assert_eq!(score.value, scoring::THERMAL_FLOOR);
    }

    #[test]
    fn hotter_never_scores_better() {
        let scorer = ThermalScorer::default();
        let mut previous = f32::MAX;
        for temp in (30..=120).step_by(2) {
            let score = scorer
                .score(&dataset(Some(temp as f32), Some(24.0), None))
                .unwrap();
            assert!(
                score.value <= previous,
                "thermal score rose from {previous} at {temp}°C"
            );
            previous = score.value;
        }
    }

    #[test]
    fn extreme_ambient_is_a_minor_penalty() {
        let scorer = ThermalScorer::default();
        let hot_ambient = scorer.score(&dataset(Some(40.0), Some(37.0), None)).unwrap();
        let hot_motor = scorer.score(&dataset(Some(65.0), Some(24.0), None)).unwrap();
        assert!(hot_ambient.value > hot_motor.value);
    }

    #[test]
    fn condensation_risk_is_penalized() {
        let scorer = ThermalScorer::default();
        let humid = scorer.score(&dataset(Some(40.0), Some(24.0), Some(85.0))).unwrap();
        assert!(humid.value < 100.0);
    }

    #[test]
    fn ambient_only_still_scores() {
        // Controller dead, node alive: thermal degrades gracefully to an
        // ambient-only opinion instead of no_data.
        let score = ThermalScorer::default()
            .score(&dataset(None, Some(24.0), Some(40.0)))
            .unwrap();
        assert_eq!(score.value, 100.0);
    }

    #[test]
    fn no_usable_input_is_missing_data() {
        let result = ThermalScorer::default().score(&dataset(None, None, Some(40.0)));
        assert!(matches!(
            result,
            Err(HealthError::MissingData {
                domain: Domain::Thermal
            })
        ));
    }
}
