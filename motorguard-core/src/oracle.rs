//! Pluggable Anomaly/Fault Oracle Interface
//!
//! The engine treats machine-learned anomaly detection as an external
//! opinion, not a dependency: one capability trait, consulted once per
//! evaluation cycle, whose absence or failure degrades the predictive
//! component to `no_data` instead of touching the physics-based scores.
//! Concrete models live behind this seam (the `motorguard-ml` crate ships
//! one); the engine never knows which.
//!
//! Oracle calls happen during the resolve phase of a cycle, outside the
//! engine lock, alongside store lookups.

use crate::arbiter::WorkingDataset;
use crate::errors::EngineResult;
use serde::{Deserialize, Serialize};

/// Number of features in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 5;

/// Fixed-order feature vector handed to the oracle.
///
/// Order: current, voltage, rpm, motor temperature, ambient temperature.
/// Missing fields are encoded as NaN; oracles decide how to treat gaps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f32; FEATURE_COUNT]);

impl FeatureVector {
    /// Extract features from a working dataset.
    pub fn from_dataset(data: &WorkingDataset) -> Self {
        let f = |v: Option<f32>| v.unwrap_or(f32::NAN);
        Self([
            f(data.current_a()),
            f(data.voltage_v()),
            f(data.rpm()),
            f(data.motor_temp_c()),
            f(data.ambient_temp_c()),
        ])
    }

    /// True when every feature is present.
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

/// The oracle's scored opinion about the current operating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyOpinion {
    /// Whether the oracle considers the point anomalous.
    pub anomaly: bool,
    /// Anomaly score in `[0, 1]`; 0 is nominal, 1 is maximally anomalous.
    pub score: f32,
}

impl AnomalyOpinion {
    /// Map the opinion onto the predictive health scale.
    pub fn predictive_score(&self) -> f32 {
        ((1.0 - self.score) * 100.0).clamp(0.0, 100.0)
    }
}

/// Fault classes the oracle can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultClass {
    Normal,
    Overheating,
    Overload,
    VoltageFault,
    MechanicalFault,
}

/// A classified fault with its probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaultPrediction {
    /// Most likely fault class.
    pub class: FaultClass,
    /// Probability assigned to that class, `[0, 1]`.
    pub probability: f32,
}

/// Capability interface for anomaly scoring and fault classification.
///
/// Both methods return `Err(OracleUnavailable)` rather than panicking or
/// blocking when the model cannot answer; callers degrade the predictive
/// component and move on.
pub trait AnomalyOracle {
    /// Score how anomalous the feature vector is.
    fn score(&self, features: &FeatureVector) -> EngineResult<AnomalyOpinion>;

    /// Classify the most likely fault for the feature vector.
    fn predict_fault(&self, features: &FeatureVector) -> EngineResult<FaultPrediction>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opinion_maps_onto_predictive_scale() {
        let nominal = AnomalyOpinion {
            anomaly: false,
            score: 0.05,
        };
        assert!((nominal.predictive_score() - 95.0).abs() < 1e-3);

        let anomalous = AnomalyOpinion {
            anomaly: true,
            score: 1.0,
        };
        assert_eq!(anomalous.predictive_score(), 0.0);
    }

    #[test]
    fn missing_fields_become_nan() {
        use crate::arbiter::{DataProvenance, Provenance, WorkingDataset};
        use crate::reading::{ControllerSample, NodeSample};

        let data = WorkingDataset {
            node: NodeSample {
                current_a: Some(6.0),
                ..NodeSample::default()
            },
            controller: ControllerSample::default(),
            provenance: DataProvenance {
                node: Provenance::Live,
                controller: Provenance::Live,
                predictive_unavailable: false,
            },
        };
        let features = FeatureVector::from_dataset(&data);
        assert!(features.0[0].is_finite());
        assert!(features.0[3].is_nan());
        assert!(!features.is_complete());
    }
}
