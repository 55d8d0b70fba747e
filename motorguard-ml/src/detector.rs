//! Operating-envelope anomaly detector
//!
//! Each feature is scored as a normalized deviation from the nominal
//! operating point: 0 at nominal, 1 at the critical boundary for that
//! channel, saturating beyond. The combined anomaly score emphasizes the
//! worst channel (a single saturated channel *is* an anomaly) while the
//! mean term keeps broad mild drift visible.

use motorguard_core::constants::thresholds;
use motorguard_core::{
    AnomalyOpinion, AnomalyOracle, EngineResult, FaultClass, FaultPrediction, FeatureVector,
    HealthError,
};

/// Combined score above which the opinion flags an anomaly.
pub const ANOMALY_THRESHOLD: f32 = 0.6;

/// Weight of the worst channel versus the mean of all channels.
const WORST_CHANNEL_SHARE: f32 = 0.6;

/// One feature's envelope: nominal center and the deviation that counts
/// as critical.
#[derive(Debug, Clone, Copy)]
struct Envelope {
    center: f32,
    critical_span: f32,
}

impl Envelope {
    /// Normalized deviation: 0 at center, 1 at the critical boundary.
    fn deviation(&self, value: f32) -> f32 {
        ((value - self.center).abs() / self.critical_span).min(1.0)
    }
}

/// Feature order matches [`FeatureVector`]: current, voltage, rpm, motor
/// temperature, ambient temperature.
const ENVELOPES: [Envelope; 5] = [
    Envelope {
        center: thresholds::OPTIMAL_CURRENT_A,
        critical_span: thresholds::CURRENT_MAX_CRITICAL_A - thresholds::OPTIMAL_CURRENT_A,
    },
    Envelope {
        center: thresholds::OPTIMAL_VOLTAGE_V,
        critical_span: thresholds::VOLTAGE_MAX_CRITICAL_V - thresholds::OPTIMAL_VOLTAGE_V,
    },
    Envelope {
        center: thresholds::OPTIMAL_RPM,
        critical_span: thresholds::RPM_MAX_CRITICAL - thresholds::OPTIMAL_RPM,
    },
    Envelope {
        center: thresholds::OPTIMAL_MOTOR_TEMP_C,
        critical_span: thresholds::MOTOR_TEMP_CRITICAL_C - thresholds::OPTIMAL_MOTOR_TEMP_C,
    },
    Envelope {
        center: thresholds::OPTIMAL_AMBIENT_TEMP_C,
        critical_span: thresholds::AMBIENT_TEMP_CRITICAL_C - thresholds::OPTIMAL_AMBIENT_TEMP_C,
    },
];

/// Fault class attributed to each feature channel when it dominates.
const CHANNEL_FAULTS: [FaultClass; 5] = [
    FaultClass::Overload,
    FaultClass::VoltageFault,
    FaultClass::MechanicalFault,
    FaultClass::Overheating,
    FaultClass::Overheating,
];

/// Deterministic operating-envelope oracle.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeDetector;

impl EnvelopeDetector {
    /// Per-channel deviations for the finite features; NaN channels are
    /// skipped (a missing sensor is the engine's business, not a fault).
    fn deviations(features: &FeatureVector) -> impl Iterator<Item = (usize, f32)> + '_ {
        features
            .0
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, &v)| (i, ENVELOPES[i].deviation(v)))
    }
}

impl AnomalyOracle for EnvelopeDetector {
    fn score(&self, features: &FeatureVector) -> EngineResult<AnomalyOpinion> {
        let mut worst = 0.0f32;
        let mut sum = 0.0f32;
        let mut count = 0usize;
        for (_, deviation) in Self::deviations(features) {
            worst = worst.max(deviation);
            sum += deviation;
            count += 1;
        }
        if count == 0 {
            return Err(HealthError::OracleUnavailable {
                reason: "no finite features",
            });
        }

        let mean = sum / count as f32;
        let score = WORST_CHANNEL_SHARE * worst + (1.0 - WORST_CHANNEL_SHARE) * mean;
        let anomaly = score > ANOMALY_THRESHOLD;
        if anomaly {
            log::debug!("operating point outside envelope: score {score:.2}");
        }
        Ok(AnomalyOpinion { anomaly, score })
    }

    fn predict_fault(&self, features: &FeatureVector) -> EngineResult<FaultPrediction> {
        let mut dominant: Option<(usize, f32)> = None;
        for (index, deviation) in Self::deviations(features) {
            match dominant {
                Some((_, best)) if deviation <= best => {}
                _ => dominant = Some((index, deviation)),
            }
        }
        let Some((index, deviation)) = dominant else {
            return Err(HealthError::OracleUnavailable {
                reason: "no finite features",
            });
        };

        if deviation < ANOMALY_THRESHOLD {
            return Ok(FaultPrediction {
                class: FaultClass::Normal,
                probability: 1.0 - deviation,
            });
        }
        Ok(FaultPrediction {
            class: CHANNEL_FAULTS[index],
            probability: deviation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(values: [f32; 5]) -> FeatureVector {
        FeatureVector(values)
    }

    fn nominal() -> FeatureVector {
        features([6.25, 24.0, 2750.0, 40.0, 24.0])
    }

    #[test]
    fn nominal_point_scores_near_zero() {
        let opinion = EnvelopeDetector.score(&nominal()).unwrap();
        assert!(opinion.score < 0.05);
        assert!(!opinion.anomaly);
    }

    #[test]
    fn critical_temperature_flags_an_anomaly() {
        let opinion = EnvelopeDetector
            .score(&features([6.25, 24.0, 2750.0, 90.0, 24.0]))
            .unwrap();
        assert!(opinion.anomaly, "score was {}", opinion.score);
        assert!(opinion.score > ANOMALY_THRESHOLD);
    }

    #[test]
    fn score_grows_with_deviation() {
        let detector = EnvelopeDetector;
        let warm = detector
            .score(&features([6.25, 24.0, 2750.0, 50.0, 24.0]))
            .unwrap();
        let hot = detector
            .score(&features([6.25, 24.0, 2750.0, 70.0, 24.0]))
            .unwrap();
        assert!(hot.score > warm.score);
    }

    #[test]
    fn missing_channels_are_skipped() {
        let opinion = EnvelopeDetector
            .score(&features([6.25, f32::NAN, f32::NAN, 40.0, f32::NAN]))
            .unwrap();
        assert!(!opinion.anomaly);
    }

    #[test]
    fn all_missing_is_unavailable_not_a_guess() {
        let result = EnvelopeDetector.score(&features([f32::NAN; 5]));
        assert!(matches!(
            result,
            Err(HealthError::OracleUnavailable { .. })
        ));
    }

    #[test]
    fn dominant_channel_names_the_fault() {
        let detector = EnvelopeDetector;

        let overheat = detector
            .predict_fault(&features([6.25, 24.0, 2750.0, 95.0, 24.0]))
            .unwrap();
        assert_eq!(overheat.class, FaultClass::Overheating);

        let overload = detector
            .predict_fault(&features([13.0, 24.0, 2750.0, 40.0, 24.0]))
            .unwrap();
        assert_eq!(overload.class, FaultClass::Overload);

        let undervolt = detector
            .predict_fault(&features([6.25, 19.0, 2750.0, 40.0, 24.0]))
            .unwrap();
        assert_eq!(undervolt.class, FaultClass::VoltageFault);
    }

    #[test]
    fn inside_envelope_predicts_normal() {
        let prediction = EnvelopeDetector.predict_fault(&nominal()).unwrap();
        assert_eq!(prediction.class, FaultClass::Normal);
        assert!(prediction.probability > 0.9);
    }
}
