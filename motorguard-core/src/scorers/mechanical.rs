//! Mechanical health scorer
//!
//! Scores shaft behavior from the redundant rpm readings (the working
//! dataset already resolved them to the larger of the two) plus a
//! current-versus-speed load-balance cross-check. A shaft under the
//! not-running floor is treated as stalled and takes the heaviest penalty;
//! everything else uses the usual two-sided speed tiers.

use crate::arbiter::WorkingDataset;
use crate::constants::{scoring, thresholds};
use crate::errors::{HealthError, EngineResult};
use crate::scorers::utils::{finish, tier_penalty};
use crate::scorers::{ComponentScore, Domain, HealthScorer};

/// Scorer for shaft speed and load balance.
#[derive(Debug, Clone, Copy)]
pub struct MechanicalScorer {
    floor: f32,
}

impl Default for MechanicalScorer {
    fn default() -> Self {
        Self {
            floor: scoring::MECHANICAL_FLOOR,
        }
    }
}

impl MechanicalScorer {
    fn rpm_penalty(rpm: f32) -> f32 {
        use thresholds::*;

        // Slopes are per 100 rpm; scale the excess accordingly.
        let per_100 = |excess: f32| excess / 100.0;

        if rpm < RPM_STOPPED {
            scoring::PENALTY_RPM_STOPPED
        } else if rpm < RPM_MIN_CRITICAL {
            tier_penalty(
                per_100(RPM_MIN_CRITICAL - rpm),
                scoring::PENALTY_RPM_CRITICAL,
                scoring::PENALTY_RPM_SLOPE_PER_100,
                scoring::PENALTY_RPM_SLOPE_CAP,
            )
        } else if rpm < RPM_MIN_WARNING {
            tier_penalty(
                per_100(RPM_MIN_WARNING - rpm),
                scoring::PENALTY_RPM_WARNING,
                scoring::PENALTY_RPM_SLOPE_PER_100,
                scoring::PENALTY_RPM_SLOPE_CAP,
            )
        } else if rpm > RPM_MAX_CRITICAL {
            tier_penalty(
                per_100(rpm - RPM_MAX_CRITICAL),
                scoring::PENALTY_RPM_CRITICAL,
                scoring::PENALTY_RPM_SLOPE_PER_100,
                scoring::PENALTY_RPM_SLOPE_CAP,
            )
        } else if rpm > RPM_MAX_WARNING {
            tier_penalty(
                per_100(rpm - RPM_MAX_WARNING),
                scoring::PENALTY_RPM_WARNING,
                scoring::PENALTY_RPM_SLOPE_PER_100,
                scoring::PENALTY_RPM_SLOPE_CAP,
            )
        } else {
            0.0
        }
    }

    /// Load-balance cross-check: current should track speed roughly
    /// proportionally. A large deviation means the load shifted without
    /// the speed following, which points at binding or a failing coupling.
    fn imbalance_penalty(rpm: f32, current: f32) -> f32 {
        if rpm <= thresholds::RPM_STOPPED {
            return 0.0;
        }
        let expected = (rpm / thresholds::OPTIMAL_RPM) * thresholds::OPTIMAL_CURRENT_A;
        if expected <= 0.0 {
            return 0.0;
        }
        let deviation = (current - expected).abs() / expected;
        if deviation > thresholds::LOAD_IMBALANCE_RATIO {
            scoring::PENALTY_LOAD_IMBALANCE
        } else {
            0.0
        }
    }
}

impl HealthScorer for MechanicalScorer {
    fn domain(&self) -> Domain {
        Domain::Mechanical
    }

    fn floor(&self) -> f32 {
        self.floor
    }

    fn score(&self, data: &WorkingDataset) -> EngineResult<ComponentScore> {
        let Some(rpm) = data.rpm() else {
            return Err(HealthError::MissingData {
                domain: Domain::Mechanical,
            });
        };

        let mut raw = 100.0 - Self::rpm_penalty(rpm);
        if let Some(current) = data.current_a() {
            raw -= Self::imbalance_penalty(rpm, current);
        }

        Ok(finish(Domain::Mechanical, raw, self.floor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbiter::{DataProvenance, Provenance};
    use crate::reading::{ControllerSample, NodeSample};

    fn dataset(rpm_node: Option<f32>, rpm_ctrl: Option<f32>, current: Option<f32>) -> WorkingDataset {
        WorkingDataset {
            node: NodeSample {
                rpm: rpm_node,
                current_a: current,
                ..NodeSample::default()
            },
            controller: ControllerSample {
                rpm: rpm_ctrl,
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
    fn nominal_speed_scores_perfect() {
        let score = MechanicalScorer::default()
            .score(&dataset(Some(2750.0), None, Some(6.25)))
            .unwrap();
        assert_eq!(score.value, 100.0);
    }

    #[test]
    fn stalled_shaft_takes_the_heavy_penalty() {
        let score = MechanicalScorer::default()
            .score(&dataset(Some(0.0), None, None))
            .unwrap();
        assert_eq!(score.value, 100.0 - scoring::PENALTY_RPM_STOPPED);
    }

    #[test]
    fn speed_tiers_escalate_on_both_sides() {
        let scorer = MechanicalScorer::default();
        let slow_warn = scorer.score(&dataset(Some(2500.0), None, None)).unwrap();
        let slow_crit = scorer.score(&dataset(Some(2300.0), None, None)).unwrap();
        let fast_warn = scorer.score(&dataset(Some(3000.0), None, None)).unwrap();
        let fast_crit = scorer.score(&dataset(Some(3200.0), None, None)).unwrap();
        assert!(slow_crit.value < slow_warn.value);
        assert!(fast_crit.value < fast_warn.value);
        assert!(slow_warn.value < 100.0 && fast_warn.value < 100.0);
    }

    #[test]
    fn redundant_readings_use_the_larger() {
        // Node pickup slipping and reading low; controller reads true.
        let score = MechanicalScorer::default()
            .score(&dataset(Some(1200.0), Some(2750.0), None))
            .unwrap();
        assert_eq!(score.value, 100.0);
    }

    #[test]
    fn load_imbalance_is_penalized() {
        // Near-nominal speed but twice the proportional current.
        let balanced = MechanicalScorer::default()
            .score(&dataset(Some(2750.0), None, Some(6.25)))
            .unwrap();
        let imbalanced = MechanicalScorer::default()
            .score(&dataset(Some(2750.0), None, Some(13.0)))
            .unwrap();
        assert!(imbalanced.value < balanced.value);
    }

    #[test]
    fn missing_rpm_is_missing_data() {
        let result = MechanicalScorer::default().score(&dataset(None, None, Some(6.25)));
        assert!(matches!(
            result,
            Err(HealthError::MissingData {
                domain: Domain::Mechanical
            })
        ));
    }

    #[test]
    fn floor_holds_under_combined_penalties() {
        // Critically slow and heavily imbalanced at once.
        let score = MechanicalScorer::default()
            .score(&dataset(Some(2000.0), None, Some(12.0)))
            .unwrap();
        assert_eq!(score.value, scoring::MECHANICAL_FLOOR);
    }
}
