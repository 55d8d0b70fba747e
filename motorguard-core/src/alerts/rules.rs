//! Rule Evaluation
//!
//! A fixed, ordered list of independent predicates. Order matters only for
//! the stable presentation of equal-scoring findings; predicates never
//! short-circuit, so a cycle with a dead source, an overheating motor, and
//! a sagging supply raises all three findings at once.
//!
//! Rule families, in evaluation order:
//!
//! 1. connection loss (per source, against `SourceState`);
//! 2. overall-score bands;
//! 3. per-domain score bands;
//! 4. absolute parameter limits (overcurrent, overheat, under/overvoltage);
//!    these fire on the raw working dataset so a live fault still pages
//!    even if a no_data domain kept it out of the composite;
//! 5. advisory findings (efficiency, load balance, routine maintenance).
//!
//! If nothing fires, a single informational nominal entry is emitted so
//! consumers can tell "evaluated, nothing wrong" from "not evaluated".

use crate::aggregate::HealthResult;
use crate::alerts::{AlertType, Category, Level, Recommendation, Urgency};
use crate::arbiter::WorkingDataset;
use crate::constants::{scoring, thresholds};
use crate::freshness::SourceState;

/// Everything a rule may look at for one cycle.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The cycle's aggregated result.
    pub result: &'a HealthResult,
    /// The dataset the result was scored from.
    pub dataset: &'a WorkingDataset,
    /// Sensor-node liveness at evaluation time.
    pub node_state: &'a SourceState,
    /// Controller liveness at evaluation time.
    pub controller_state: &'a SourceState,
}

/// Run every rule against the cycle. Never returns an empty list.
pub fn evaluate(ctx: &RuleContext<'_>) -> Vec<Recommendation> {
    let mut out = Vec::new();

    connection_rules(ctx, &mut out);
    overall_band_rules(ctx, &mut out);
    domain_rules(ctx, &mut out);
    parameter_rules(ctx, &mut out);
    advisory_rules(ctx, &mut out);

    if out.is_empty() {
        out.push(nominal(ctx));
    }
    out
}

fn connection_rules(ctx: &RuleContext<'_>, out: &mut Vec<Recommendation>) {
    for (state, alert_type, description, action) in [
        (
            ctx.node_state,
            AlertType::NodeConnectionLost,
            "Sensor node is not sending data; electrical and ambient monitoring unavailable.",
            "Check sensor node power supply, network connectivity, and sensor wiring.",
        ),
        (
            ctx.controller_state,
            AlertType::ControllerConnectionLost,
            "Motor controller is not responding; case temperature and bus voltage monitoring unavailable.",
            "Verify controller network settings and power; confirm the register interface is reachable.",
        ),
    ] {
        // NoData means the source was never commissioned this run; only a
        // lost connection pages.
        if !state.connected && state.last_seen.is_some() {
            out.push(Recommendation {
                alert_type,
                category: Category::System,
                severity: Level::High,
                priority: Level::High,
                urgency: Urgency::Immediate,
                description: description.to_string(),
                action: action.to_string(),
                confidence: 1.0,
                composite_score: 0.0,
            });
        }
    }
}

fn overall_band_rules(ctx: &RuleContext<'_>, out: &mut Vec<Recommendation>) {
    let overall = ctx.result.overall;
    let degraded_data = ctx.result.provenance.degraded();

    if overall < scoring::HEALTH_CRITICAL_BAND {
        // Stale-data degradation reads differently from a live fault; the
        // provenance decides the wording and how sure we are.
        let (description, confidence) = if degraded_data {
            (
                format!(
                    "Overall motor health estimate is {overall:.0}% on partially historical data."
                ),
                0.85,
            )
        } else {
            (
                format!("Overall motor health is {overall:.0}%. Multiple systems degraded."),
                0.95,
            )
        };
        out.push(Recommendation {
            alert_type: AlertType::HealthCritical,
            category: Category::Health,
            severity: Level::Critical,
            priority: Level::Critical,
            urgency: Urgency::Immediate,
            description,
            action: "Stop motor operation and perform a comprehensive inspection.".to_string(),
            confidence,
            composite_score: 0.0,
        });
    } else if overall < scoring::HEALTH_DEGRADED_BAND {
        out.push(Recommendation {
            alert_type: AlertType::HealthDegraded,
            category: Category::Health,
            severity: Level::Medium,
            priority: Level::High,
            urgency: Urgency::Within24h,
            description: format!(
                "Overall motor health is {overall:.0}%. Preventive action recommended."
            ),
            action: "Schedule a maintenance inspection within 24-48 hours.".to_string(),
            confidence: 0.8,
            composite_score: 0.0,
        });
    }
}

fn domain_rules(ctx: &RuleContext<'_>, out: &mut Vec<Recommendation>) {
    if let Some(score) = ctx.result.electrical {
        if score < scoring::DOMAIN_WARNING_BAND {
            out.push(Recommendation {
                alert_type: AlertType::ElectricalWarning,
                category: Category::Electrical,
                severity: Level::Medium,
                priority: Level::Medium,
                urgency: Urgency::WithinWeek,
                description: format!("Electrical health is {score:.0}%."),
                action: "Check motor power connections, measure supply voltage and current, inspect contactors and wiring.".to_string(),
                confidence: 0.8,
                composite_score: 0.0,
            });
        }
    }
    if let Some(score) = ctx.result.thermal {
        if score < scoring::DOMAIN_WARNING_BAND {
            out.push(Recommendation {
                alert_type: AlertType::ThermalWarning,
                category: Category::Thermal,
                severity: Level::Medium,
                priority: Level::Medium,
                urgency: Urgency::Within24h,
                description: format!("Thermal health is {score:.0}%."),
                action: "Improve ventilation, clean cooling vents, check fan operation.".to_string(),
                confidence: 0.85,
                composite_score: 0.0,
            });
        }
    }
    if let Some(score) = ctx.result.mechanical {
        if score < scoring::DOMAIN_WARNING_BAND {
            out.push(Recommendation {
                alert_type: AlertType::MechanicalWarning,
                category: Category::Mechanical,
                severity: Level::Medium,
                priority: Level::Medium,
                urgency: Urgency::WithinWeek,
                description: format!("Mechanical health is {score:.0}%."),
                action: "Inspect bearings, check coupling alignment, verify load conditions.".to_string(),
                confidence: 0.8,
                composite_score: 0.0,
            });
        }
    }
    if let Some(score) = ctx.result.predictive {
        if score < scoring::PREDICTIVE_WARNING_BAND {
            out.push(Recommendation {
                alert_type: AlertType::PredictiveMaintenance,
                category: Category::Predictive,
                severity: Level::Medium,
                priority: Level::Medium,
                urgency: Urgency::WithinWeek,
                description: format!(
                    "Predictive analysis scores {score:.0}%; declining operating pattern."
                ),
                action: "Schedule preventive maintenance within the next 7 days.".to_string(),
                confidence: 0.75,
                composite_score: 0.0,
            });
        }
    }
}

fn parameter_rules(ctx: &RuleContext<'_>, out: &mut Vec<Recommendation>) {
    let data = ctx.dataset;

    if let Some(current) = data.current_a() {
        if current > thresholds::CURRENT_MAX_CRITICAL_A {
            out.push(Recommendation {
                alert_type: AlertType::Overcurrent,
                category: Category::Electrical,
                severity: Level::Critical,
                priority: Level::Critical,
                urgency: Urgency::Immediate,
                description: format!(
                    "Phase current {current:.1}A exceeds the {:.0}A limit.",
                    thresholds::CURRENT_MAX_CRITICAL_A
                ),
                action: "Reduce load immediately; check for a seized load or winding fault.".to_string(),
                confidence: 0.95,
                composite_score: 0.0,
            });
        }
    }
    if let Some(temp) = data.motor_temp_c() {
        if temp > thresholds::MOTOR_TEMP_CRITICAL_C {
            out.push(Recommendation {
                alert_type: AlertType::Overheating,
                category: Category::Thermal,
                severity: Level::High,
                priority: Level::Critical,
                urgency: Urgency::Immediate,
                description: format!(
                    "Motor case temperature {temp:.1}°C exceeds the {:.0}°C limit.",
                    thresholds::MOTOR_TEMP_CRITICAL_C
                ),
                action: "Reduce load or stop the motor; verify cooling before restarting.".to_string(),
                confidence: 0.95,
                composite_score: 0.0,
            });
        }
    }
    if let Some(voltage) = data.voltage_v() {
        if voltage < thresholds::VOLTAGE_MIN_CRITICAL_V {
            out.push(Recommendation {
                alert_type: AlertType::Undervoltage,
                category: Category::Electrical,
                severity: Level::High,
                priority: Level::High,
                urgency: Urgency::Immediate,
                description: format!(
                    "Supply voltage {voltage:.1}V is below the {:.0}V minimum.",
                    thresholds::VOLTAGE_MIN_CRITICAL_V
                ),
                action: "Check supply, wiring resistance, and upstream breakers.".to_string(),
                confidence: 0.9,
                composite_score: 0.0,
            });
        } else if voltage > thresholds::VOLTAGE_MAX_CRITICAL_V {
            out.push(Recommendation {
                alert_type: AlertType::Overvoltage,
                category: Category::Electrical,
                severity: Level::High,
                priority: Level::High,
                urgency: Urgency::Immediate,
                description: format!(
                    "Supply voltage {voltage:.1}V is above the {:.0}V maximum.",
                    thresholds::VOLTAGE_MAX_CRITICAL_V
                ),
                action: "Check the supply regulator before insulation damage accumulates.".to_string(),
                confidence: 0.9,
                composite_score: 0.0,
            });
        }
    }
}

fn advisory_rules(ctx: &RuleContext<'_>, out: &mut Vec<Recommendation>) {
    if let Some(efficiency) = ctx.result.efficiency {
        if efficiency < scoring::EFFICIENCY_ADVISORY {
            out.push(Recommendation {
                alert_type: AlertType::EfficiencyAdvisory,
                category: Category::Performance,
                severity: Level::Low,
                priority: Level::Medium,
                urgency: Urgency::WithinMonth,
                description: format!("Operating efficiency is {efficiency:.0}%."),
                action: "Review load distribution, duty cycle, and speed settings.".to_string(),
                confidence: 0.7,
                composite_score: 0.0,
            });
        }
    }

    // Load imbalance: the same cross-check the mechanical scorer applies,
    // surfaced as its own advisory finding.
    if let (Some(rpm), Some(current)) = (ctx.dataset.rpm(), ctx.dataset.current_a()) {
        if rpm > thresholds::RPM_STOPPED {
            let expected = (rpm / thresholds::OPTIMAL_RPM) * thresholds::OPTIMAL_CURRENT_A;
            if expected > 0.0
                && (current - expected).abs() / expected > thresholds::LOAD_IMBALANCE_RATIO
            {
                out.push(Recommendation {
                    alert_type: AlertType::LoadImbalance,
                    category: Category::Performance,
                    severity: Level::Low,
                    priority: Level::Medium,
                    urgency: Urgency::WithinMonth,
                    description: format!(
                        "Current {current:.1}A deviates from the {expected:.1}A expected at {rpm:.0} rpm."
                    ),
                    action: "Check for binding in driven equipment and verify belt tension.".to_string(),
                    confidence: 0.75,
                    composite_score: 0.0,
                });
            }
        }
    }

    // Routine maintenance window: healthy but not pristine.
    let overall = ctx.result.overall;
    if (scoring::HEALTH_DEGRADED_BAND..scoring::STATUS_EXCELLENT).contains(&overall) {
        out.push(Recommendation {
            alert_type: AlertType::RoutineMaintenance,
            category: Category::Preventive,
            severity: Level::Low,
            priority: Level::Low,
            urgency: Urgency::WithinMonth,
            description: "System performing well; routine maintenance will keep it that way."
                .to_string(),
            action: "Schedule routine lubrication, cleaning, and connection tightening.".to_string(),
            confidence: 0.6,
            composite_score: 0.0,
        });
    }
}

fn nominal(ctx: &RuleContext<'_>) -> Recommendation {
    Recommendation {
        alert_type: AlertType::Nominal,
        category: Category::Health,
        severity: Level::Low,
        priority: Level::Low,
        urgency: Urgency::WithinMonth,
        description: format!(
            "All systems nominal; overall health {:.0}%.",
            ctx.result.overall
        ),
        action: "No action required.".to_string(),
        confidence: 1.0,
        composite_score: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Status;
    use crate::arbiter::{DataProvenance, Provenance};
    use crate::freshness::{FreshnessTracker, LinkQuality};
    use crate::reading::{ControllerSample, NodeSample, Source};

    fn live_provenance() -> DataProvenance {
        DataProvenance {
            node: Provenance::Live,
            controller: Provenance::Live,
            predictive_unavailable: false,
        }
    }

    fn nominal_dataset() -> WorkingDataset {
        WorkingDataset {
            node: NodeSample::safe_defaults(),
            controller: ControllerSample::safe_defaults(),
            provenance: live_provenance(),
        }
    }

    fn result_with(overall: f32, thermal: f32) -> HealthResult {
        HealthResult {
            overall,
            electrical: Some(100.0),
            thermal: Some(thermal),
            mechanical: Some(100.0),
            predictive: None,
            efficiency: Some(100.0),
            status: Status::from_overall(overall),
            confidence: 1.0,
            provenance: live_provenance(),
            evaluated_at: 0,
        }
    }

    fn live_states() -> (SourceState, SourceState) {
        let mut t = FreshnessTracker::default();
        t.record(Source::SensorNode, 0);
        t.record(Source::Controller, 0);
        (*t.state(Source::SensorNode), *t.state(Source::Controller))
    }

    #[test]
    fn nominal_cycle_yields_exactly_the_nominal_entry() {
        let result = result_with(97.0, 100.0);
        let dataset = nominal_dataset();
        let (node, ctrl) = live_states();
        let recs = evaluate(&RuleContext {
            result: &result,
            dataset: &dataset,
            node_state: &node,
            controller_state: &ctrl,
        });
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].alert_type, AlertType::Nominal);
    }

    #[test]
    fn rules_do_not_short_circuit() {
        // Dead node + overheat + low overall: three families fire together.
        let mut result = result_with(55.0, 20.0);
        result.thermal = Some(20.0);
        let mut dataset = nominal_dataset();
        dataset.controller.motor_temp_c = Some(90.0);

        let (_, ctrl) = live_states();
        let mut tracker = FreshnessTracker::default();
        tracker.record(Source::SensorNode, 0);
        tracker.sweep(60_000);
        let node = *tracker.state(Source::SensorNode);
        assert_eq!(node.quality, LinkQuality::Timeout);

        let recs = evaluate(&RuleContext {
            result: &result,
            dataset: &dataset,
            node_state: &node,
            controller_state: &ctrl,
        });
        let types: Vec<_> = recs.iter().map(|r| r.alert_type).collect();
        assert!(types.contains(&AlertType::NodeConnectionLost));
        assert!(types.contains(&AlertType::HealthCritical));
        assert!(types.contains(&AlertType::Overheating));
        assert!(types.contains(&AlertType::ThermalWarning));
    }

    #[test]
    fn never_commissioned_source_does_not_page() {
        let result = result_with(97.0, 100.0);
        let dataset = nominal_dataset();
        let tracker = FreshnessTracker::default();
        let node = *tracker.state(Source::SensorNode);
        let (_, ctrl) = live_states();

        let recs = evaluate(&RuleContext {
            result: &result,
            dataset: &dataset,
            node_state: &node,
            controller_state: &ctrl,
        });
        assert!(recs
            .iter()
            .all(|r| r.alert_type != AlertType::NodeConnectionLost));
    }

    #[test]
    fn overheating_fires_on_the_raw_parameter() {
        // Even with a healthy-looking composite the absolute limit pages.
        let result = result_with(85.0, 80.0);
        let mut dataset = nominal_dataset();
        dataset.controller.motor_temp_c = Some(65.0);
        let (node, ctrl) = live_states();

        let recs = evaluate(&RuleContext {
            result: &result,
            dataset: &dataset,
            node_state: &node,
            controller_state: &ctrl,
        });
        assert!(recs.iter().any(|r| r.alert_type == AlertType::Overheating
            && r.severity >= Level::High));
    }

    #[test]
    fn stale_data_lowers_critical_confidence() {
        let mut result = result_with(30.0, 100.0);
        result.provenance.node = Provenance::Historical;
        let dataset = nominal_dataset();
        let (node, ctrl) = live_states();

        let recs = evaluate(&RuleContext {
            result: &result,
            dataset: &dataset,
            node_state: &node,
            controller_state: &ctrl,
        });
        let critical = recs
            .iter()
            .find(|r| r.alert_type == AlertType::HealthCritical)
            .unwrap();
        assert!(critical.confidence < 0.95);
    }
}
